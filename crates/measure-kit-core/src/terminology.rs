//! Terminology index for the CQL code service
//!
//! Converts ValueSet resources into the nested lookup table consumed by the
//! execution engine's code service:
//!
//! ```json
//! {
//!   "http://example.org/ValueSet/diabetes": {
//!     "": [{ "system": "http://snomed.info/sct", "code": "44054006" }]
//!   }
//! }
//! ```
//!
//! Indexing never fails. Value sets without a `url`, or with neither an
//! expansion nor a compose definition, degrade to missing or empty entries.

use crate::models::{ValueSet, ValueSetCompose, ValueSetExpansionContains};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Version marker some terminology servers emit for unversioned value sets
pub const UNVERSIONED_MARKER: &str = "N/A";

/// A single code as understood by the code service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Code {
    pub system: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Value set url → version → member codes
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TerminologyIndex {
    value_sets: IndexMap<String, IndexMap<String, Vec<Code>>>,
}

impl TerminologyIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Codes for a value set url and (already normalized) version key
    pub fn get(&self, url: &str, version: &str) -> Option<&[Code]> {
        self.value_sets
            .get(url)
            .and_then(|versions| versions.get(version))
            .map(Vec::as_slice)
    }

    /// All versions indexed for a value set url
    pub fn versions(&self, url: &str) -> Option<&IndexMap<String, Vec<Code>>> {
        self.value_sets.get(url)
    }

    /// Whether any version of the value set contains `system|code`
    pub fn contains_code(&self, url: &str, system: &str, code: &str) -> bool {
        self.value_sets.get(url).is_some_and(|versions| {
            versions
                .values()
                .flatten()
                .any(|c| c.system == system && c.code == code)
        })
    }

    /// Number of value set urls in the index
    pub fn len(&self) -> usize {
        self.value_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value_sets.is_empty()
    }

    /// Total number of codes across every url and version
    pub fn code_count(&self) -> usize {
        self.value_sets
            .values()
            .flat_map(|versions| versions.values())
            .map(Vec::len)
            .sum()
    }

    /// Iterate over `(url, versions)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndexMap<String, Vec<Code>>)> {
        self.value_sets.iter()
    }

    /// Serialize to compact JSON
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON
    pub fn to_json_string_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Reset the slot for `(url, version)` to an empty list and return it
    fn reset_slot(&mut self, url: &str, version: String) -> &mut Vec<Code> {
        let slot = self
            .value_sets
            .entry(url.to_string())
            .or_default()
            .entry(version)
            .or_default();
        slot.clear();
        slot
    }
}

/// Map a ValueSet version to its index key
///
/// Absent and `"N/A"` both become the empty string.
pub fn normalize_version(version: Option<&str>) -> String {
    match version {
        None | Some(UNVERSIONED_MARKER) => String::new(),
        Some(v) => v.to_string(),
    }
}

/// Build the code service index from a list of ValueSets
///
/// Resources are processed in order. A later resource with the same url and
/// version replaces the earlier entry.
pub fn build_index(value_sets: &[ValueSet]) -> TerminologyIndex {
    let mut index = TerminologyIndex::new();

    for value_set in value_sets {
        let Some(url) = value_set.url.as_deref() else {
            warn!(
                "Skipping ValueSet without url (id: {})",
                value_set.id.as_deref().unwrap_or("<none>")
            );
            continue;
        };

        let version = normalize_version(value_set.version.as_deref());
        let slot = index.reset_slot(url, version);

        if let Some(contains) = value_set
            .expansion
            .as_ref()
            .and_then(|expansion| expansion.non_empty_contains())
        {
            *slot = flatten_expansion(contains);
            debug!("Indexed {} expansion codes for {}", slot.len(), url);
        } else if let Some(compose) = &value_set.compose {
            slot.extend(compose_codes(compose));
            debug!("Indexed {} compose codes for {}", slot.len(), url);
        } else {
            warn!("ValueSet {} has neither expansion nor compose", url);
        }
    }

    index
}

/// Flatten a hierarchical expansion in depth-first pre-order
///
/// Abstract and inactive entries are not emitted, but their descendants
/// still are.
pub fn flatten_expansion(contains: &[ValueSetExpansionContains]) -> Vec<Code> {
    let mut codes = Vec::new();
    // Reversed so that popping yields document order.
    let mut stack: Vec<&ValueSetExpansionContains> = contains.iter().rev().collect();

    while let Some(entry) = stack.pop() {
        if entry.is_selectable()
            && let (Some(code), Some(system)) = (&entry.code, &entry.system)
        {
            codes.push(Code {
                system: system.clone(),
                code: code.clone(),
                display: entry.display.clone(),
                version: entry.version.clone(),
            });
        }

        if let Some(children) = &entry.contains {
            stack.extend(children.iter().rev());
        }
    }

    codes
}

/// Codes explicitly enumerated by `compose.include[].concept[]`
fn compose_codes(compose: &ValueSetCompose) -> impl Iterator<Item = Code> + '_ {
    compose.include.iter().flat_map(|include| {
        include
            .concept
            .iter()
            .flatten()
            .filter_map(move |concept| {
                let system = include.system.as_ref()?;
                let code = concept.code.as_ref()?;
                Some(Code {
                    system: system.clone(),
                    code: code.clone(),
                    display: concept.display.clone(),
                    version: include.version.clone(),
                })
            })
    })
}
