//! Execution project templates
//!
//! The generated project is a small Node package that runs the measure's
//! ELM with `cql-execution`. Its `package.json` and `index.js` are rendered
//! from templates embedded in this crate.

use crate::error::MeasureKitError;
use crate::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PACKAGE_JSON_TEMPLATE: &str = include_str!("../templates/package.json");
const INDEX_JS_TEMPLATE: &str = include_str!("../templates/index.js");

const PROJECT_NAME: &str = "{{ PROJECT_NAME }}";
const CQL_EXECUTION_VERSION: &str = "{{ CQL_EXECUTION_VERSION }}";
const MAIN_LIB_FILE_NAME: &str = "{{ MAIN_LIB_FILE_NAME }}";
const MEASUREMENT_PERIOD_START: &str = "{{ MEASUREMENT_PERIOD_START }}";
const MEASUREMENT_PERIOD_END: &str = "{{ MEASUREMENT_PERIOD_END }}";

/// Major line of the `cql-execution` engine to target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineVersion {
    #[default]
    #[serde(rename = "2.X", alias = "2.x")]
    V2,
    #[serde(rename = "3.0.0-beta.X", alias = "3.0.0-beta.x")]
    V3Beta,
}

impl EngineVersion {
    /// npm dependency range written into `package.json`
    pub fn dependency_range(self) -> &'static str {
        match self {
            EngineVersion::V2 => "^2.4.4",
            EngineVersion::V3Beta => "^3.0.0-beta.3",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EngineVersion::V2 => "2.X",
            EngineVersion::V3Beta => "3.0.0-beta.X",
        }
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineVersion {
    type Err = MeasureKitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "2" | "2.X" => Ok(EngineVersion::V2),
            "3" | "3.0.0-BETA.X" => Ok(EngineVersion::V3Beta),
            _ => Err(MeasureKitError::config_error(format!(
                "Unknown cql-execution version '{s}'. Expected '2.X' or '3.0.0-beta.X'"
            ))),
        }
    }
}

/// The "Measurement Period" parameter passed to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementPeriod {
    pub start: String,
    pub end: String,
}

impl Default for MeasurementPeriod {
    fn default() -> Self {
        Self {
            start: "2022-01-01".to_string(),
            end: "2022-12-31".to_string(),
        }
    }
}

impl MeasurementPeriod {
    /// Check both bounds look like `YYYY-MM-DD` and are ordered
    pub fn validate(&self) -> Result<()> {
        for bound in [&self.start, &self.end] {
            if !is_iso_date(bound) {
                return Err(MeasureKitError::config_error(format!(
                    "Measurement period bound '{bound}' is not a YYYY-MM-DD date"
                )));
            }
        }
        // Lexical order matches chronological order for fixed-width dates.
        if self.start > self.end {
            return Err(MeasureKitError::config_error(format!(
                "Measurement period start {} is after end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

fn is_iso_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

/// Escape `value` for a double-quoted JSON or JavaScript string literal,
/// without the surrounding quotes
fn string_literal_body(value: &str) -> Result<String> {
    let quoted =
        serde_json::to_string(value).map_err(|e| MeasureKitError::template_error(e.to_string()))?;
    Ok(quoted[1..quoted.len() - 1].to_string())
}

/// Render `package.json` for the execution project
pub fn render_package_json(project_name: &str, engine: EngineVersion) -> Result<String> {
    Ok(PACKAGE_JSON_TEMPLATE
        .replace(PROJECT_NAME, &string_literal_body(project_name)?)
        .replace(CQL_EXECUTION_VERSION, engine.dependency_range()))
}

/// Render `index.js`, pointing it at the entry-point ELM file
pub fn render_index_js(main_lib_file_name: &str, period: &MeasurementPeriod) -> Result<String> {
    period.validate()?;

    Ok(INDEX_JS_TEMPLATE
        .replace(MAIN_LIB_FILE_NAME, &string_literal_body(main_lib_file_name)?)
        .replace(MEASUREMENT_PERIOD_START, &period.start)
        .replace(MEASUREMENT_PERIOD_END, &period.end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version_ranges() {
        assert_eq!(EngineVersion::V2.dependency_range(), "^2.4.4");
        assert_eq!(EngineVersion::V3Beta.dependency_range(), "^3.0.0-beta.3");
        assert_eq!(EngineVersion::default(), EngineVersion::V2);
    }

    #[test]
    fn test_engine_version_parsing() {
        assert_eq!("2.X".parse::<EngineVersion>().unwrap(), EngineVersion::V2);
        assert_eq!("2.x".parse::<EngineVersion>().unwrap(), EngineVersion::V2);
        assert_eq!(
            "3.0.0-beta.x".parse::<EngineVersion>().unwrap(),
            EngineVersion::V3Beta
        );
        assert!("4".parse::<EngineVersion>().is_err());
    }

    #[test]
    fn test_engine_version_serde() {
        let v: EngineVersion = serde_json::from_str(r#""3.0.0-beta.X""#).unwrap();
        assert_eq!(v, EngineVersion::V3Beta);
        assert_eq!(serde_json::to_string(&EngineVersion::V2).unwrap(), r#""2.X""#);
    }

    #[test]
    fn test_render_package_json() {
        let rendered = render_package_json("my-execution", EngineVersion::V3Beta).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(json["name"], "my-execution");
        assert_eq!(json["dependencies"]["cql-execution"], "^3.0.0-beta.3");
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_render_package_json_escapes_name() {
        let rendered = render_package_json("odd\"name", EngineVersion::V2).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["name"], "odd\"name");
    }

    #[test]
    fn test_render_index_js() {
        let rendered = render_index_js("Main.json", &MeasurementPeriod::default()).unwrap();

        assert!(rendered.contains(r#"const MAIN_LIB_FILE_NAME = "Main.json";"#));
        assert!(rendered.contains(r#"new Date("2022-01-01")"#));
        assert!(rendered.contains(r#"new Date("2022-12-31")"#));
        assert!(rendered.contains("./vsmap.json"));
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_render_index_js_escapes_file_name() {
        let rendered = render_index_js("odd\"na\\me.json", &MeasurementPeriod::default()).unwrap();
        assert!(rendered.contains(r#"const MAIN_LIB_FILE_NAME = "odd\"na\\me.json";"#));
    }

    #[test]
    fn test_measurement_period_validation() {
        let reversed = MeasurementPeriod {
            start: "2023-12-31".to_string(),
            end: "2023-01-01".to_string(),
        };
        assert!(reversed.validate().is_err());

        let malformed = MeasurementPeriod {
            start: "01/01/2023".to_string(),
            end: "2023-12-31".to_string(),
        };
        assert!(malformed.validate().is_err());

        assert!(MeasurementPeriod::default().validate().is_ok());
    }
}
