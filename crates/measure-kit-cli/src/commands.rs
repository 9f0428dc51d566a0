//! CLI command implementations

use measure_kit_core::{
    ArtifactWriter, ConfigLoader, ConversionOptions, EngineVersion, MeasureBundle,
    MeasureKitConfig, MeasureKitError, MeasurementPeriod, Result, build_index, convert,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::output;

/// Values given on the command line for `generate`
#[derive(Debug, Default)]
pub struct GenerateOverrides {
    pub output: Option<PathBuf>,
    pub name: Option<String>,
    pub engine_version: Option<EngineVersion>,
    pub period: Option<(String, String)>,
    pub clean: bool,
}

impl GenerateOverrides {
    fn as_config(&self) -> MeasureKitConfig {
        MeasureKitConfig {
            output: self.output.clone(),
            project_name: self.name.clone(),
            engine_version: self.engine_version,
            measurement_period: self.period.clone().map(|(start, end)| MeasurementPeriod {
                start,
                end,
            }),
        }
    }
}

/// Resolve the effective configuration: defaults < config file < flags
fn resolve_config(
    config_path: Option<PathBuf>,
    search_dir: &Path,
    overrides: &GenerateOverrides,
) -> Result<MeasureKitConfig> {
    let file_config = ConfigLoader::load(config_path.as_deref(), Some(search_dir))?;
    let config = file_config.merge(overrides.as_config());
    if let Some(period) = &config.measurement_period {
        period.validate()?;
    }
    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

/// Generate command implementation
pub fn generate_command(
    measure_bundle: PathBuf,
    patient_bundle: PathBuf,
    overrides: GenerateOverrides,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let start_time = Instant::now();

    let config = resolve_config(config_path, Path::new("."), &overrides)?;
    let output_dir = config.output_dir();
    let options = ConversionOptions::from(&config);

    info!("Generating execution project");
    info!("  Measure bundle: {}", measure_bundle.display());
    info!("  Patient bundle: {}", patient_bundle.display());
    info!("  Output: {}", output_dir.display());
    info!("  cql-execution: {}", options.engine_version);

    let writer = ArtifactWriter::new(&output_dir).with_clean(overrides.clean);
    let stats = convert(&measure_bundle, &patient_bundle, &writer, &options)?;

    output::print_generate_summary(&output_dir, &stats, start_time.elapsed());
    Ok(())
}

/// Valuesets command implementation
pub fn valuesets_command(measure_bundle: PathBuf, pretty: bool) -> Result<()> {
    let bundle = MeasureBundle::from_file(&measure_bundle)?;
    let index = build_index(bundle.value_sets());

    let json = if pretty {
        index.to_json_string_pretty()
    } else {
        index.to_json_string()
    }
    .map_err(|e| MeasureKitError::template_error(e.to_string()))?;

    println!("{json}");
    Ok(())
}

/// Inspect command implementation
pub fn inspect_command(measure_bundle: PathBuf) -> Result<()> {
    let bundle = MeasureBundle::from_file(&measure_bundle)?;
    let index = build_index(bundle.value_sets());
    output::print_bundle_summary(&bundle, &index);
    Ok(())
}
