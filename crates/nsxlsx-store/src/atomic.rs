//! Atomic write primitives
//!
//! Uses temp→rename pattern to ensure no partial writes

use crate::errors::{io_error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Sibling path used while a save is in flight
pub fn temp_path(target_path: &Path) -> PathBuf {
    let mut name = OsString::from(target_path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Atomically write bytes to a file
///
/// Uses temp file + rename to ensure atomic write
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error("create_store_dir", e))?;
        }
    }

    let temp_path = temp_path(target_path);

    fs::write(&temp_path, content).map_err(|e| io_error("write_store_temp", e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        fs::remove_file(&temp_path).ok();
        return Err(io_error("rename_store_temp", e));
    }

    Ok(())
}
