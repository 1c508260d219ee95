use thiserror::Error;

/// Result type alias using NsxError
pub type Result<T> = std::result::Result<T, NsxError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (and the CLI exit path)
/// can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration/Input
    /// A required option is missing or has an invalid value
    Configuration,
    /// The snapshot tree does not have the sheet/field shape the engine expects
    InvalidInput,

    // Acquisition
    /// The provider could not produce a snapshot
    Acquisition,

    // Reconciliation
    /// An existing header disagrees with the field intended for its column
    SchemaMismatch,
    /// No usable column was found within the resolver's scan bound
    SchemaExhausted,

    // Integration/IO
    Io,
    Serialization,
    /// The store file could be read but not decoded, or not saved
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Acquisition => "ERR_ACQUISITION",
            ExErrorKind::SchemaMismatch => "ERR_SCHEMA_MISMATCH",
            ExErrorKind::SchemaExhausted => "ERR_SCHEMA_EXHAUSTED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Carries a stable kind plus optional sheet/cell context so a failure can be
/// located in the store without re-running.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    sheet: Option<String>,
    row: Option<usize>,
    column: Option<usize>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            sheet: None,
            row: None,
            column: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add sheet context
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Add row context
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Add column context
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the sheet context, if any
    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    /// Get the row context, if any
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    /// Get the column context, if any
    pub fn column(&self) -> Option<usize> {
        self.column
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(sheet) = &self.sheet {
            write!(f, " (sheet: {})", sheet)?;
        }
        match (self.row, self.column) {
            (Some(row), Some(column)) => write!(f, " (cell: row {}, column {})", row, column)?,
            (Some(row), None) => write!(f, " (row: {})", row)?,
            (None, Some(column)) => write!(f, " (column: {})", column)?,
            (None, None) => {}
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for snapshot construction and reconciliation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NsxError {
    // ===== Reconciliation Errors =====
    /// Existing header content disagrees with the intended field name
    #[error("Header mismatch in sheet '{sheet}' at row {row}, column {column}: expected '{expected}', found '{found}'")]
    SchemaMismatch {
        sheet: String,
        row: usize,
        column: usize,
        expected: String,
        found: String,
    },

    /// Column scan passed its bound without finding a usable column
    #[error("No usable column for field '{field}' in sheet '{sheet}' within {bound} columns")]
    SchemaExhausted {
        sheet: String,
        field: String,
        bound: usize,
    },

    /// Two fields in one sheet normalize to the same header
    #[error("Fields '{first}' and '{second}' in sheet '{sheet}' resolve to the same column {column}")]
    DuplicateField {
        sheet: String,
        first: String,
        second: String,
        column: usize,
    },

    // ===== Snapshot Shape Errors =====
    /// The snapshot tree violates the sheet/field shape
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    // ===== Configuration Errors =====
    /// A required option was not supplied
    #[error("Missing required option: {key}")]
    MissingOption { key: String },

    /// An option was supplied with an unusable value
    #[error("Invalid value for option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    // ===== Serialization Errors =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<NsxError> for ExError {
    fn from(err: NsxError) -> Self {
        match err {
            NsxError::SchemaMismatch {
                sheet,
                row,
                column,
                expected,
                found,
            } => ExError::new(ExErrorKind::SchemaMismatch)
                .with_op("verify_header")
                .with_sheet(sheet)
                .with_row(row)
                .with_column(column)
                .with_message(format!(
                    "header '{}' does not match field '{}'",
                    found, expected
                )),

            NsxError::SchemaExhausted {
                sheet,
                field,
                bound,
            } => ExError::new(ExErrorKind::SchemaExhausted)
                .with_op("resolve_column")
                .with_sheet(sheet)
                .with_message(format!(
                    "no usable column for field '{}' within {} columns",
                    field, bound
                )),

            NsxError::DuplicateField {
                sheet,
                first,
                second,
                column,
            } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("plan_sheet")
                .with_sheet(sheet)
                .with_column(column)
                .with_message(format!(
                    "fields '{}' and '{}' share one column",
                    first, second
                )),

            NsxError::InvalidSnapshot { reason } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("validate_snapshot")
                .with_message(reason),

            NsxError::MissingOption { key } => ExError::new(ExErrorKind::Configuration)
                .with_op("configure")
                .with_message(format!("missing required option '{}'", key)),

            NsxError::InvalidOption { key, reason } => ExError::new(ExErrorKind::Configuration)
                .with_op("configure")
                .with_message(format!("invalid option '{}': {}", key, reason)),

            NsxError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for NsxError {
    fn from(err: serde_json::Error) -> Self {
        NsxError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::Configuration, "ERR_CONFIGURATION"),
            (ExErrorKind::Acquisition, "ERR_ACQUISITION"),
            (ExErrorKind::SchemaMismatch, "ERR_SCHEMA_MISMATCH"),
            (ExErrorKind::SchemaExhausted, "ERR_SCHEMA_EXHAUSTED"),
            (ExErrorKind::Io, "ERR_IO"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_schema_mismatch_conversion_keeps_cell() {
        let err = NsxError::SchemaMismatch {
            sheet: "Economy".to_string(),
            row: 1,
            column: 0,
            expected: "GDP".to_string(),
            found: "Timestamp".to_string(),
        };
        let ex: ExError = err.into();

        assert_eq!(ex.kind(), ExErrorKind::SchemaMismatch);
        assert_eq!(ex.sheet(), Some("Economy"));
        assert_eq!(ex.row(), Some(1));
        assert_eq!(ex.column(), Some(0));
        assert!(ex.message().contains("Timestamp"));
    }

    #[test]
    fn test_missing_option_is_configuration_error() {
        let ex: ExError = NsxError::MissingOption {
            key: "store_path".to_string(),
        }
        .into();
        assert_eq!(ex.code(), "ERR_CONFIGURATION");
        assert!(ex.to_string().contains("store_path"));
    }

    #[test]
    fn test_display_includes_source_chain() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk full");
        let outer = ExError::new(ExErrorKind::Persistence)
            .with_op("save_store")
            .with_source(inner);

        let text = outer.to_string();
        assert!(text.starts_with("[ERR_PERSISTENCE] in operation 'save_store'"));
        assert!(text.contains("[ERR_IO]: disk full"));
        assert!(std::error::Error::source(&outer).is_some());
    }
}
