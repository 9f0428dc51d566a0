//! Measure model

use serde::{Deserialize, Serialize};

/// FHIR Measure resource
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Canonical references to logic libraries; the first is the entry point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<Vec<String>>,
}

impl Measure {
    /// Canonical of the library that holds the measure's population logic
    pub fn main_library(&self) -> Option<&str> {
        self.library.as_deref()?.first().map(String::as_str)
    }
}
