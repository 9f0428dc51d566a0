//! Test data builders for measure bundles
//!
//! Used by the unit tests in this crate and by the integration tests of the
//! workspace crates.

use crate::artifact::{CQL_CONTENT_TYPE, ELM_JSON_CONTENT_TYPE};
use crate::measure_bundle::MeasureBundle;
use crate::models::*;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

/// Canonical used for libraries built by [`elm_library`]
pub fn library_url(name: &str) -> String {
    format!("http://example.org/Library/{name}")
}

/// Base64-encode a text payload the way FHIR attachments carry it
pub fn encode(text: &str) -> String {
    BASE64.encode(text)
}

/// A named Library with an ELM attachment and optional CQL source
pub fn elm_library(name: &str, elm: &str, cql: Option<&str>) -> Library {
    let mut content = vec![Attachment {
        content_type: Some(ELM_JSON_CONTENT_TYPE.to_string()),
        data: Some(encode(elm)),
    }];
    if let Some(cql) = cql {
        content.push(Attachment {
            content_type: Some(CQL_CONTENT_TYPE.to_string()),
            data: Some(encode(cql)),
        });
    }

    Library {
        id: Some(name.to_lowercase()),
        url: Some(library_url(name)),
        name: Some(name.to_string()),
        version: Some("1.0.0".to_string()),
        content: Some(content),
    }
}

/// An expansion entry for a code
pub fn code_node(system: &str, code: &str) -> ValueSetExpansionContains {
    ValueSetExpansionContains {
        system: Some(system.to_string()),
        code: Some(code.to_string()),
        display: Some(format!("Display {code}")),
        ..Default::default()
    }
}

/// A ValueSet with a pre-computed expansion
pub fn expansion_value_set(url: &str, contains: Vec<ValueSetExpansionContains>) -> ValueSet {
    ValueSet {
        url: Some(url.to_string()),
        expansion: Some(ValueSetExpansion {
            contains: Some(contains),
        }),
        ..Default::default()
    }
}

/// Builder for measure bundles
pub struct BundleBuilder {
    main_library: String,
    entries: Vec<FhirResource>,
}

impl BundleBuilder {
    /// Start a bundle whose measure points at `main_library`
    pub fn new(main_library: &str) -> Self {
        Self {
            main_library: main_library.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn library(mut self, library: Library) -> Self {
        self.entries.push(FhirResource::Library(library));
        self
    }

    pub fn value_set(mut self, value_set: ValueSet) -> Self {
        self.entries.push(FhirResource::ValueSet(value_set));
        self
    }

    /// The raw FHIR Bundle, measure first
    pub fn bundle(&self) -> Bundle {
        let measure = FhirResource::Measure(Measure {
            id: Some("test-measure".to_string()),
            url: Some("http://example.org/Measure/test-measure".to_string()),
            name: Some("TestMeasure".to_string()),
            library: Some(vec![self.main_library.clone()]),
        });

        let entry = std::iter::once(measure)
            .chain(self.entries.iter().cloned())
            .map(|resource| BundleEntry {
                resource: Some(resource),
            })
            .collect();

        Bundle { entry: Some(entry) }
    }

    /// The bundle as JSON text, as it would be read from disk
    pub fn to_json(&self) -> String {
        let mut value = serde_json::to_value(self.bundle()).unwrap_or_default();
        value["resourceType"] = serde_json::Value::from("Bundle");
        value["type"] = serde_json::Value::from("collection");
        value.to_string()
    }

    /// The validated bundle
    ///
    /// # Panics
    ///
    /// Panics if the builder produced an invalid bundle.
    pub fn build(&self) -> MeasureBundle {
        MeasureBundle::from_bundle(self.bundle()).expect("builder produced an invalid bundle")
    }
}

#[cfg(test)]
mod test_helpers_tests {
    use super::*;

    #[test]
    fn test_json_round_trips_through_loader() {
        let json = BundleBuilder::new(&library_url("Main"))
            .library(elm_library("Main", "{}", None))
            .to_json();

        let bundle = MeasureBundle::from_json_str(&json).unwrap();
        assert_eq!(bundle.libraries().len(), 1);
        assert!(bundle.is_entry_point(&bundle.libraries()[0]));
    }
}
