//! measure-kit core
//!
//! Turns a FHIR measure bundle into a runnable CQL execution project:
//! a terminology index for the engine's code service, the ELM (and CQL)
//! of every logic library, and a small runner that evaluates the measure's
//! entry-point library against a patient bundle.

pub mod artifact;
pub mod config;
pub mod convert;
pub mod error;
pub mod measure_bundle;
pub mod models;
pub mod project;
pub mod result;
pub mod template;
pub mod terminology;
pub mod test_helpers;
pub mod writer;

// Re-export commonly used types
pub use artifact::{
    CQL_CONTENT_TYPE, ELM_JSON_CONTENT_TYPE, ExtractedArtifact, LibraryArtifact,
    artifact_base_name, extract_all, extract_library,
};
pub use config::{ConfigLoader, MeasureKitConfig};
pub use convert::convert;
pub use error::{ErrorKind, MeasureKitError};
pub use measure_bundle::MeasureBundle;
pub use project::{ConversionOptions, ExecutionProject};
pub use result::Result;
pub use template::{EngineVersion, MeasurementPeriod};
pub use terminology::{Code, TerminologyIndex, build_index, flatten_expansion, normalize_version};
pub use writer::{ArtifactWriter, SourceBundles, WriteStats};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("measure_kit=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Initialize JSON-formatted tracing output, one event per line
pub fn init_json_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("measure_kit=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
