//! Configuration for measure-kit
//!
//! Settings can live in a project file so repeated conversions do not need
//! the same flags every time:
//!
//! ```yaml
//! # measure-kit.yaml
//! output: my-execution
//! projectName: my-execution
//! engineVersion: 3.0.0-beta.X
//! measurementPeriod:
//!   start: 2023-01-01
//!   end: 2023-12-31
//! ```
//!
//! Command-line flags override file values, and file values override the
//! built-in defaults.

mod loader;
mod measure_kit_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use measure_kit_config::{DEFAULT_PROJECT_NAME, MeasureKitConfig};
