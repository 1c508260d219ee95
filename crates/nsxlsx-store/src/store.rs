//! Store open/save
//!
//! `SheetStore` binds a path to its format. Opening never creates anything
//! on disk; saving replaces the whole file at once.

use std::path::{Path, PathBuf};

use nsxlsx_core::errors::{ExError, ExErrorKind};
use nsxlsx_core::grid::Workbook;
use nsxlsx_core::reconcile::StoreHandle;

use crate::atomic::atomic_write;
use crate::codec::StoreFormat;
use crate::errors::Result;

/// A store file and the codec that reads and writes it
#[derive(Debug, Clone)]
pub struct SheetStore {
    path: PathBuf,
    format: StoreFormat,
}

impl SheetStore {
    /// Bind `path`, picking the format from its extension
    ///
    /// # Errors
    ///
    /// `ERR_CONFIGURATION` when the extension names no supported format.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = StoreFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn with_format(path: impl Into<PathBuf>, format: StoreFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    /// Current state of the store: `New` when the path is absent
    pub fn open(&self) -> Result<StoreHandle> {
        if !self.path.exists() {
            tracing::debug!(
                store_path = %self.path.display(),
                "store absent"
            );
            return Ok(StoreHandle::New);
        }
        let workbook = self.format.codec().load(&self.path)?;
        tracing::debug!(
            store_path = %self.path.display(),
            store_format = self.format.as_str(),
            sheets = workbook.sheets().len(),
            "store loaded"
        );
        Ok(StoreHandle::Existing(workbook))
    }

    /// Encode and atomically replace the store file
    ///
    /// # Errors
    ///
    /// `ERR_PERSISTENCE` when the workbook cannot be encoded, or when the
    /// file cannot be written (the underlying `ERR_IO` is the source).
    pub fn save(&self, workbook: &Workbook) -> Result<()> {
        let bytes = self.format.codec().encode(workbook)?;
        atomic_write(&self.path, &bytes).map_err(|e| {
            ExError::new(ExErrorKind::Persistence)
                .with_op("save_store")
                .with_message(format!("Cannot write store '{}'", self.path.display()))
                .with_source(e)
        })?;
        tracing::debug!(
            store_path = %self.path.display(),
            bytes = bytes.len(),
            "store saved"
        );
        Ok(())
    }
}
