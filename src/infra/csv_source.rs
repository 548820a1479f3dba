use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::app::ports::RawSourcePort;
use crate::error::{RegistryError, Result};

/// Raw registry export on the local filesystem
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RawSourcePort for CsvFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<Vec<u8>> {
        if !self.path.is_file() {
            return Err(RegistryError::SourceNotFound(self.path.clone()));
        }
        let bytes = fs::read(&self.path)?;
        debug!("Read {} bytes from {}", bytes.len(), self.path.display());
        Ok(bytes)
    }
}
