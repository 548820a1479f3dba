use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::*;
use crate::error::{RegistryError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub normalize: NormalizeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Raw registry export
    pub source: PathBuf,
    /// Canonical store written by the normalizer
    pub output: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Literal text treated as a missing coordinate
    pub null_placeholder: String,
    pub id_prefix: String,
    /// Minimum zero-padded width of the id sequence number
    pub id_width: usize,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            null_placeholder: DEFAULT_NULL_PLACEHOLDER.to_string(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            id_width: DEFAULT_ID_WIDTH,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from `registry.toml` when no path is
    /// given. An explicit path must exist; the default one is optional.
    /// Environment overrides are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
                    Self::default()
                }
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RegistryError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `REGISTRY_*` overrides using the given lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup(ENV_SOURCE).filter(|v| !v.trim().is_empty()) {
            self.paths.source = PathBuf::from(source);
        }
        if let Some(output) = lookup(ENV_OUTPUT).filter(|v| !v.trim().is_empty()) {
            self.paths.output = PathBuf::from(output);
        }
        if let Some(log_dir) = lookup(ENV_LOG_DIR).filter(|v| !v.trim().is_empty()) {
            self.paths.log_dir = PathBuf::from(log_dir);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.normalize.id_prefix.is_empty() {
            return Err(RegistryError::Config("normalize.id_prefix must not be empty".to_string()));
        }
        if self.normalize.id_width == 0 {
            return Err(RegistryError::Config("normalize.id_width must be at least 1".to_string()));
        }
        if self.paths.output.as_os_str().is_empty() {
            return Err(RegistryError::Config("paths.output must not be empty".to_string()));
        }
        Ok(())
    }
}
