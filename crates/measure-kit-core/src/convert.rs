//! One end-to-end conversion run

use crate::error::MeasureKitError;
use crate::measure_bundle::MeasureBundle;
use crate::project::{ConversionOptions, ExecutionProject};
use crate::result::Result;
use crate::writer::{ArtifactWriter, SourceBundles, WriteStats};
use std::path::Path;
use tracing::info;

/// Convert a measure bundle plus patient bundle into an execution project
///
/// All validation (bundle structure, ELM presence, patient bundle
/// existence) happens before the first file is written.
pub fn convert(
    measure_bundle: &Path,
    patient_bundle: &Path,
    writer: &ArtifactWriter,
    options: &ConversionOptions,
) -> Result<WriteStats> {
    info!("Reading measure bundle {}", measure_bundle.display());
    let bundle = MeasureBundle::from_file(measure_bundle)?;

    if !patient_bundle.is_file() {
        return Err(MeasureKitError::io_error(
            patient_bundle,
            std::io::Error::new(std::io::ErrorKind::NotFound, "patient bundle not found"),
        ));
    }

    let project = ExecutionProject::build(&bundle, options)?;

    info!("Writing execution project to {}", writer.root().display());
    writer.write_project(
        &project,
        &SourceBundles {
            measure_bundle: measure_bundle.to_path_buf(),
            patient_bundle: patient_bundle.to_path_buf(),
        },
    )
}
