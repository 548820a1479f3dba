use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::app::ports::CanonicalStorePort;
use crate::constants::CANONICAL_COLUMNS;
use crate::domain::{AccommodationEntity, CanonicalTable};
use crate::error::{RegistryError, Result};

/// Canonical store kept as a single CSV file
#[derive(Debug, Clone)]
pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CanonicalStorePort for CsvFileStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn publish(&self, table: &CanonicalTable) -> Result<()> {
        let rows = write_atomic(&self.path, &table.columns, table.rows())?;
        info!("Published {} rows to {}", rows, self.path.display());
        Ok(())
    }
}

/// Write a header and rows to a temporary file next to `path`, then rename it
/// over `path`. Readers see either the old file or the complete new one.
fn write_atomic<I>(path: &Path, header: &[String], rows: I) -> Result<usize>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let staged = NamedTempFile::new_in(dir)?;
    let mut count = 0;
    {
        let mut writer = csv::Writer::from_writer(staged.as_file());
        writer.write_record(header)?;
        for row in rows {
            writer.write_record(&row)?;
            count += 1;
        }
        writer.flush()?;
    }
    staged.as_file().sync_all()?;

    staged.persist(path).map_err(|e| RegistryError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    debug!("Renamed staged file onto {}", path.display());
    Ok(count)
}

/// Load the canonical store. Columns beyond the canonical set are ignored.
pub fn load_entities(path: &Path) -> Result<Vec<AccommodationEntity>> {
    if !path.is_file() {
        return Err(RegistryError::SourceNotFound(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let entities = reader
        .deserialize::<AccommodationEntity>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    debug!("Loaded {} entities from {}", entities.len(), path.display());
    Ok(entities)
}

/// Write `entities` with the canonical column set, atomically
pub fn export_entities(path: &Path, entities: &[&AccommodationEntity]) -> Result<usize> {
    let header: Vec<String> = CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect();
    let rows = entities.iter().map(|entity| {
        CANONICAL_COLUMNS
            .iter()
            .map(|column| entity.field(column).unwrap_or_default())
            .collect()
    });
    write_atomic(path, &header, rows)
}
