use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dashboard_logging::dash_info;
use fraudscope_core::AnalysisResult;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::codec::{export_csv, export_filename};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("export directory missing or not writable: {0}")]
    ExportDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Create the export directory if missing and check it accepts files.
pub fn ensure_export_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::ExportDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::ExportDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::ExportDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::ExportDir(e.to_string()))?;
    Ok(())
}

/// Writes CSV exports into one directory. Each file lands via temp file and
/// rename, so a reader never sees a partial export.
#[derive(Debug, Clone)]
pub struct ExportWriter {
    dir: PathBuf,
}

impl ExportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Exports the full result under a timestamped name and returns its path.
    pub fn write_result(
        &self,
        result: &AnalysisResult,
        unix_millis: i64,
    ) -> Result<PathBuf, PersistError> {
        let path = self.write(&export_filename(unix_millis), &export_csv(result))?;
        dash_info!(
            "Exported {} rows from {:?} to {}",
            result.transactions.len(),
            result.filename,
            path.display()
        );
        Ok(path)
    }

    fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_export_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
