//! Project configuration file structure

use crate::error::MeasureKitError;
use crate::result::Result;
use crate::template::{EngineVersion, MeasurementPeriod};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory and package name of a generated project
pub const DEFAULT_PROJECT_NAME: &str = "my-execution";

/// Settings that shape a generated execution project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureKitConfig {
    /// Output directory (relative paths resolve against the working directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// `name` written into the generated package.json
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<EngineVersion>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_period: Option<MeasurementPeriod>,
}

impl MeasureKitConfig {
    /// Load configuration from a `.json`, `.toml`, `.yaml` or `.yml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| MeasureKitError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let parsed: std::result::Result<Self, String> = match ext {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            _ => Err(
                "Unsupported file extension (expected .json, .toml, .yaml or .yml)".to_string(),
            ),
        };

        let config = parsed.map_err(|message| {
            MeasureKitError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                message
            ))
        })?;

        if let Some(period) = &config.measurement_period {
            period.validate()?;
        }

        Ok(config)
    }

    /// Output directory, falling back to the project name
    pub fn output_dir(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.project_name()))
    }

    /// Package name, falling back to the output directory's final component
    pub fn project_name(&self) -> String {
        if let Some(name) = &self.project_name {
            return name.clone();
        }
        self.output
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string())
    }

    pub fn engine_version(&self) -> EngineVersion {
        self.engine_version.unwrap_or_default()
    }

    pub fn measurement_period(&self) -> MeasurementPeriod {
        self.measurement_period.clone().unwrap_or_default()
    }

    /// Overlay values from `other` that are set
    pub fn merge(mut self, other: MeasureKitConfig) -> Self {
        if other.output.is_some() {
            self.output = other.output;
        }
        if other.project_name.is_some() {
            self.project_name = other.project_name;
        }
        if other.engine_version.is_some() {
            self.engine_version = other.engine_version;
        }
        if other.measurement_period.is_some() {
            self.measurement_period = other.measurement_period;
        }
        self
    }
}
