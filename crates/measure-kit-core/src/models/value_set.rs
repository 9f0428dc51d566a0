//! ValueSet model for FHIR terminology

use serde::{Deserialize, Serialize};

/// FHIR ValueSet resource
///
/// Every field is optional: terminology content from upstream servers is of
/// uneven quality and the indexer degrades instead of rejecting it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose: Option<ValueSetCompose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expansion: Option<ValueSetExpansion>,
}

/// ValueSet compose element
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValueSetCompose {
    #[serde(default)]
    pub include: Vec<ValueSetInclude>,
}

/// ValueSet include element
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValueSetInclude {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<Vec<ValueSetConcept>>,
}

/// ValueSet concept
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValueSetConcept {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// ValueSet expansion (for pre-expanded value sets)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValueSetExpansion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<Vec<ValueSetExpansionContains>>,
}

/// ValueSet expansion contains
///
/// Entries nest: a grouping entry (often `abstract`) carries its members in
/// its own `contains`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValueSetExpansionContains {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<Vec<ValueSetExpansionContains>>,
}

impl ValueSetExpansion {
    /// Expansion entries, if there is at least one
    pub fn non_empty_contains(&self) -> Option<&[ValueSetExpansionContains]> {
        self.contains.as_deref().filter(|c| !c.is_empty())
    }
}

impl ValueSetExpansionContains {
    /// Whether this entry names a selectable code
    pub fn is_selectable(&self) -> bool {
        !self.is_abstract.unwrap_or(false) && !self.inactive.unwrap_or(false)
    }
}
