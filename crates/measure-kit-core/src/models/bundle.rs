//! Bundle model

use super::FhirResource;
use serde::{Deserialize, Serialize};

/// FHIR Bundle resource
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Bundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Vec<BundleEntry>>,
}

/// Bundle entry
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<FhirResource>,
}
