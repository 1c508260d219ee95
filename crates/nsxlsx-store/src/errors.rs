//! Error handling for nsxlsx-store
//!
//! Wraps nsxlsx-core ExError with store-specific helpers

use std::path::Path;

use nsxlsx_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Store path whose extension names no known format
pub fn unsupported_format(path: &Path) -> ExError {
    ExError::new(ExErrorKind::Configuration)
        .with_op("store_format")
        .with_message(format!(
            "Unsupported store format for '{}': expected a .xlsx or .json path",
            path.display()
        ))
}

/// Create a decode error for a store that exists but cannot be read
pub fn decode_error(path: &Path, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("load_store")
        .with_message(format!("Cannot read store '{}': {}", path.display(), reason))
}

/// Create an encode error for a workbook that cannot be serialized
pub fn encode_error(reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("encode_store")
        .with_message(reason.to_string())
}

/// Create an encode error tied to one sheet
pub fn sheet_encode_error(sheet: &str, reason: impl std::fmt::Display) -> ExError {
    encode_error(reason).with_sheet(sheet)
}
