//! Library model for CQL logic libraries

use serde::{Deserialize, Serialize};

/// FHIR Library resource
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Attachment>>,
}

/// FHIR Attachment (inline base64 payload)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl Library {
    /// Human-readable identity for log and error messages
    pub fn display_identity(&self) -> &str {
        self.url
            .as_deref()
            .or(self.name.as_deref())
            .or(self.id.as_deref())
            .unwrap_or("<unknown>")
    }

    /// First attachment with the given content type
    pub fn find_content(&self, content_type: &str) -> Option<&Attachment> {
        self.content.as_deref()?.iter().find(|attachment| {
            attachment.content_type.as_deref() == Some(content_type)
        })
    }
}
