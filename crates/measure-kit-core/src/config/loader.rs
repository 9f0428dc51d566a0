//! Configuration file discovery and loading

use super::measure_kit_config::MeasureKitConfig;
use crate::error::MeasureKitError;
use crate::result::Result;
use std::path::{Path, PathBuf};

/// Config file names in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".measurekitrc.json",
    ".measurekitrc.toml",
    "measure-kit.yaml",
    "measure-kit.yml",
    "measure-kit.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Starts from the given directory and moves up the directory tree until
    /// a config is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| MeasureKitError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<MeasureKitConfig> {
        if !path.exists() {
            return Err(MeasureKitError::config_error(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        MeasureKitConfig::load(path)
    }

    /// Load config from path or auto-discover
    ///
    /// Unlike an explicit path, a failed discovery is not an error: the
    /// defaults are returned instead.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<MeasureKitConfig> {
        if let Some(path) = custom_path {
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(MeasureKitConfig::default()),
        }
    }
}
