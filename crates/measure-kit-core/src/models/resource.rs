//! FHIR resource enum for deserialization

use super::{Library, Measure, ValueSet};
use serde::{Deserialize, Serialize};

/// FHIR resource discriminated union
///
/// Uses Serde's tag-based deserialization to determine resource type
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "resourceType")]
pub enum FhirResource {
    Measure(Measure),
    Library(Library),
    ValueSet(ValueSet),
    #[serde(other)]
    Other,
}

impl FhirResource {
    /// Get resource type as string
    pub fn resource_type(&self) -> &'static str {
        match self {
            FhirResource::Measure(_) => "Measure",
            FhirResource::Library(_) => "Library",
            FhirResource::ValueSet(_) => "ValueSet",
            FhirResource::Other => "Other",
        }
    }
}
