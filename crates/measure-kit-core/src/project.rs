//! Assembling an execution project from a measure bundle
//!
//! Everything here is in memory: the bundle is validated, the terminology
//! index built, every library extracted and the templates rendered. Only
//! then does [`crate::writer::ArtifactWriter`] touch the file system, so a
//! bundle that cannot run never leaves a half-written directory behind.

use crate::artifact::{LibraryArtifact, extract_all};
use crate::config::{DEFAULT_PROJECT_NAME, MeasureKitConfig};
use crate::measure_bundle::MeasureBundle;
use crate::result::Result;
use crate::template::{EngineVersion, MeasurementPeriod, render_index_js, render_package_json};
use crate::terminology::{TerminologyIndex, build_index};
use tracing::{info, warn};

/// Options for one conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    pub project_name: String,
    pub engine_version: EngineVersion,
    pub measurement_period: MeasurementPeriod,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            engine_version: EngineVersion::default(),
            measurement_period: MeasurementPeriod::default(),
        }
    }
}

impl From<&MeasureKitConfig> for ConversionOptions {
    fn from(config: &MeasureKitConfig) -> Self {
        Self {
            project_name: config.project_name(),
            engine_version: config.engine_version(),
            measurement_period: config.measurement_period(),
        }
    }
}

/// In-memory contents of an execution project
#[derive(Debug, Clone)]
pub struct ExecutionProject {
    pub terminology: TerminologyIndex,
    pub libraries: Vec<LibraryArtifact>,
    pub package_json: String,
    /// Runner script, present when the measure's main library is in the bundle
    pub index_js: Option<String>,
}

impl ExecutionProject {
    /// Build the project for a validated bundle
    pub fn build(bundle: &MeasureBundle, options: &ConversionOptions) -> Result<Self> {
        let terminology = build_index(bundle.value_sets());
        info!(
            "Indexed {} value sets ({} codes)",
            terminology.len(),
            terminology.code_count()
        );

        let libraries = extract_all(bundle)?;
        info!("Extracted {} libraries", libraries.len());

        let package_json = render_package_json(&options.project_name, options.engine_version)?;

        let index_js = match libraries.iter().find(|lib| lib.is_entry_point) {
            Some(entry) => {
                info!("Entry point library: {}", entry.artifact.base_name);
                Some(render_index_js(
                    &entry.artifact.elm_file_name(),
                    &options.measurement_period,
                )?)
            }
            None => {
                warn!(
                    "Main library {} is not in the bundle; index.js will not be generated",
                    bundle.main_library_url()
                );
                None
            }
        };

        Ok(Self {
            terminology,
            libraries,
            package_json,
            index_js,
        })
    }

    /// The artifact selected as the measure's entry point
    pub fn entry_point(&self) -> Option<&LibraryArtifact> {
        self.libraries.iter().find(|lib| lib.is_entry_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{BundleBuilder, elm_library};

    #[test]
    fn test_build_selects_entry_point() {
        let bundle = BundleBuilder::new("http://example.org/Library/Main")
            .library(elm_library("Main", "{\"main\":true}", None))
            .library(elm_library("Helper", "{}", Some("define X: 1")))
            .build();

        let project = ExecutionProject::build(&bundle, &ConversionOptions::default()).unwrap();
        let entry = project.entry_point().unwrap();
        assert_eq!(entry.artifact.base_name, "Main");

        let index_js = project.index_js.unwrap();
        assert!(index_js.contains(r#""Main.json""#));
        assert!(project.package_json.contains("\"my-execution\""));
    }

    #[test]
    fn test_build_without_matching_main_library() {
        let bundle = BundleBuilder::new("http://example.org/Library/Elsewhere")
            .library(elm_library("Main", "{}", None))
            .build();

        let project = ExecutionProject::build(&bundle, &ConversionOptions::default()).unwrap();
        assert!(project.entry_point().is_none());
        assert!(project.index_js.is_none());
    }

    #[test]
    fn test_options_from_config() {
        let config = MeasureKitConfig {
            project_name: Some("cms122".to_string()),
            engine_version: Some(EngineVersion::V3Beta),
            ..Default::default()
        };

        let options = ConversionOptions::from(&config);
        assert_eq!(options.project_name, "cms122");
        assert_eq!(options.engine_version, EngineVersion::V3Beta);
        assert_eq!(options.measurement_period, MeasurementPeriod::default());
    }
}
