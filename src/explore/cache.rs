use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;
use tracing::debug;

use crate::domain::AccommodationEntity;
use crate::error::{RegistryError, Result};
use crate::infra::load_entities;

/// Identity of a canonical store file at the time it was loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl CacheKey {
    pub fn for_path(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RegistryError::SourceNotFound(path.to_path_buf()),
            _ => RegistryError::Io(e),
        })?;
        Ok(Self {
            path: fs::canonicalize(path)?,
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

/// Session cache of the canonical table.
///
/// The table is loaded once and reused while the file keeps the same path,
/// modification time and length. A change in any of those, or an explicit
/// `invalidate`, causes the next `get_or_load` to read the file again.
#[derive(Debug, Default)]
pub struct CanonicalCache {
    entry: Option<(CacheKey, Rc<Vec<AccommodationEntity>>)>,
}

impl CanonicalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Rc<Vec<AccommodationEntity>>> {
        let key = CacheKey::for_path(path)?;

        if let Some((cached_key, entities)) = &self.entry {
            if *cached_key == key {
                debug!("Canonical cache hit for {}", key.path.display());
                return Ok(Rc::clone(entities));
            }
        }

        debug!("Canonical cache miss for {}, loading", key.path.display());
        let entities = Rc::new(load_entities(path)?);
        self.entry = Some((key, Rc::clone(&entities)));
        Ok(entities)
    }

    /// Drop the cached table; the next read goes to disk
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("Canonical cache invalidated");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.entry.is_some()
    }
}
