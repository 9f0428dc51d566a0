//! Measure bundle partitioning and validation
//!
//! A measure bundle is split by resource kind into the measure, its logic
//! libraries and the value sets they reference. Structural problems are
//! reported here, before any output is produced.

use crate::error::MeasureKitError;
use crate::models::{Bundle, FhirResource, Library, Measure, ValueSet};
use crate::result::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A validated measure bundle
#[derive(Debug, Clone)]
pub struct MeasureBundle {
    measure: Measure,
    libraries: Vec<Library>,
    value_sets: Vec<ValueSet>,
}

impl MeasureBundle {
    /// Partition and validate a parsed Bundle
    pub fn from_bundle(bundle: Bundle) -> Result<Self> {
        let entries = bundle.entry.unwrap_or_default();
        if entries.is_empty() {
            return Err(MeasureKitError::invalid_bundle(
                "Measure Bundle cannot be empty",
            ));
        }

        let mut measure = None;
        let mut libraries = Vec::new();
        let mut value_sets = Vec::new();

        for resource in entries.into_iter().filter_map(|entry| entry.resource) {
            match resource {
                FhirResource::Measure(m) => {
                    if measure.is_none() {
                        measure = Some(m);
                    } else {
                        debug!("Ignoring additional Measure {:?}", m.url);
                    }
                }
                FhirResource::Library(library) => libraries.push(library),
                FhirResource::ValueSet(value_set) => value_sets.push(value_set),
                FhirResource::Other => {}
            }
        }

        let measure = measure.ok_or_else(|| {
            MeasureKitError::invalid_bundle("Measure Bundle must contain a measure resource")
        })?;

        if libraries.is_empty() {
            return Err(MeasureKitError::invalid_bundle(
                "No libraries found in Measure Bundle",
            ));
        }

        if measure.main_library().is_none() {
            return Err(MeasureKitError::invalid_bundle(
                "Measure must reference a main library",
            ));
        }

        debug!(
            "Partitioned bundle: {} libraries, {} value sets",
            libraries.len(),
            value_sets.len()
        );

        Ok(Self {
            measure,
            libraries,
            value_sets,
        })
    }

    /// Parse and validate a bundle from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let bundle: Bundle = serde_json::from_str(json)
            .map_err(|e| MeasureKitError::parse_error("<input>", e.to_string()))?;
        Self::from_bundle(bundle)
    }

    /// Read, parse and validate a bundle file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| MeasureKitError::io_error(path, e))?;
        let bundle: Bundle = serde_json::from_str(&content)
            .map_err(|e| MeasureKitError::parse_error(path, e.to_string()))?;
        Self::from_bundle(bundle)
    }

    pub fn measure(&self) -> &Measure {
        &self.measure
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    pub fn value_sets(&self) -> &[ValueSet] {
        &self.value_sets
    }

    /// Canonical of the entry-point library named by the measure
    pub fn main_library_url(&self) -> &str {
        // Presence is checked in `from_bundle`.
        self.measure.main_library().unwrap_or_default()
    }

    /// Whether `library` is the measure's entry point
    pub fn is_entry_point(&self, library: &Library) -> bool {
        library.url.as_deref() == Some(self.main_library_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn bundle_message(json: &str) -> String {
        match MeasureBundle::from_json_str(json) {
            Err(MeasureKitError::InvalidBundle { message }) => message,
            other => panic!("Expected InvalidBundle, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_bundle_rejected() {
        assert_eq!(
            bundle_message(r#"{"resourceType": "Bundle"}"#),
            "Measure Bundle cannot be empty"
        );
        assert_eq!(
            bundle_message(r#"{"resourceType": "Bundle", "entry": []}"#),
            "Measure Bundle cannot be empty"
        );
    }

    #[test]
    fn test_missing_measure_rejected() {
        let json = r#"{"entry": [{"resource": {"resourceType": "Library", "name": "Main"}}]}"#;
        assert_eq!(
            bundle_message(json),
            "Measure Bundle must contain a measure resource"
        );
    }

    #[test]
    fn test_missing_libraries_rejected() {
        let json = r#"{"entry": [{"resource": {"resourceType": "Measure", "library": ["Main"]}}]}"#;
        assert_eq!(bundle_message(json), "No libraries found in Measure Bundle");
    }

    #[test]
    fn test_measure_without_library_reference_rejected() {
        let json = r#"{"entry": [
            {"resource": {"resourceType": "Measure"}},
            {"resource": {"resourceType": "Library", "name": "Main"}}
        ]}"#;
        assert_eq!(bundle_message(json), "Measure must reference a main library");
    }

    #[test]
    fn test_partitions_by_kind() {
        let json = r#"{"entry": [
            {"resource": {"resourceType": "ValueSet", "url": "http://example.org/vs"}},
            {"resource": {"resourceType": "Library", "url": "Main", "name": "Main"}},
            {"resource": {"resourceType": "Patient", "id": "p1"}},
            {"resource": {"resourceType": "Measure", "library": ["Main"]}},
            {"resource": {"resourceType": "Library", "url": "Helper", "name": "Helper"}},
            {"fullUrl": "urn:uuid:no-resource"}
        ]}"#;

        let bundle = MeasureBundle::from_json_str(json).unwrap();
        assert_eq!(bundle.libraries().len(), 2);
        assert_eq!(bundle.value_sets().len(), 1);
        assert_eq!(bundle.main_library_url(), "Main");
        assert!(bundle.is_entry_point(&bundle.libraries()[0]));
        assert!(!bundle.is_entry_point(&bundle.libraries()[1]));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = MeasureBundle::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
