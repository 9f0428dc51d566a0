//! Library artifact extraction
//!
//! Pulls the compiled ELM JSON and the optional CQL source out of a Library
//! resource's base64 attachments.

use crate::error::MeasureKitError;
use crate::measure_bundle::MeasureBundle;
use crate::models::Library;
use crate::result::Result;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use tracing::debug;

/// Content type of compiled logic (ELM JSON)
pub const ELM_JSON_CONTENT_TYPE: &str = "application/elm+json";

/// Content type of human-readable CQL source
pub const CQL_CONTENT_TYPE: &str = "text/cql";

/// Standard alphabet, padding optional
const ATTACHMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decoded logic for one library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArtifact {
    /// File stem used when the artifact is written out
    pub base_name: String,
    pub compiled_logic: String,
    pub source_logic: Option<String>,
}

impl ExtractedArtifact {
    /// File name of the ELM JSON output
    pub fn elm_file_name(&self) -> String {
        format!("{}.json", self.base_name)
    }

    /// File name of the CQL output
    pub fn cql_file_name(&self) -> String {
        format!("{}.cql", self.base_name)
    }
}

/// An extracted artifact together with where it came from in the bundle
#[derive(Debug, Clone)]
pub struct LibraryArtifact {
    pub url: Option<String>,
    pub artifact: ExtractedArtifact,
    pub is_entry_point: bool,
}

/// Output file stem for a library: `name`, then `id`, then `library-<index>`
pub fn artifact_base_name(library: &Library, index: usize) -> String {
    library
        .name
        .clone()
        .or_else(|| library.id.clone())
        .unwrap_or_else(|| format!("library-{index}"))
}

/// Extract ELM and CQL from a library
///
/// `index` is the library's position in the bundle and only matters when the
/// library has neither a name nor an id.
pub fn extract_library(library: &Library, index: usize) -> Result<ExtractedArtifact> {
    let identity = library.display_identity();

    let compiled_logic = match attachment_data(library, ELM_JSON_CONTENT_TYPE) {
        Some(data) => decode_attachment(identity, ELM_JSON_CONTENT_TYPE, data)?,
        None => return Err(MeasureKitError::missing_compiled_logic(identity)),
    };

    let source_logic = attachment_data(library, CQL_CONTENT_TYPE)
        .map(|data| decode_attachment(identity, CQL_CONTENT_TYPE, data))
        .transpose()?;

    let base_name = artifact_base_name(library, index);
    if !is_safe_file_stem(&base_name) {
        return Err(MeasureKitError::invalid_bundle(format!(
            "Library {identity} has name '{base_name}', which cannot be used as a file name"
        )));
    }

    debug!(
        "Extracted {} (ELM {} bytes, CQL {})",
        base_name,
        compiled_logic.len(),
        if source_logic.is_some() { "present" } else { "absent" }
    );

    Ok(ExtractedArtifact {
        base_name,
        compiled_logic,
        source_logic,
    })
}

/// Extract every library in the bundle, flagging the entry point
///
/// Fails on the first library without ELM so nothing gets written for a
/// bundle that cannot run.
pub fn extract_all(bundle: &MeasureBundle) -> Result<Vec<LibraryArtifact>> {
    bundle
        .libraries()
        .iter()
        .enumerate()
        .map(|(index, library)| -> Result<LibraryArtifact> {
            Ok(LibraryArtifact {
                url: library.url.clone(),
                artifact: extract_library(library, index)?,
                is_entry_point: bundle.is_entry_point(library),
            })
        })
        .collect()
}

/// Payload of the first attachment with `content_type`, if it has one
fn attachment_data<'a>(library: &'a Library, content_type: &str) -> Option<&'a str> {
    library
        .find_content(content_type)?
        .data
        .as_deref()
        .filter(|data| !data.is_empty())
}

/// A stem that stays a single path component below `elm/` and `cql/`
fn is_safe_file_stem(stem: &str) -> bool {
    !stem.is_empty()
        && stem != "."
        && stem != ".."
        && !stem.contains(['/', '\\', '\0'])
}

/// Decode a `base64Binary` payload, which may be line-wrapped or unpadded
fn decode_attachment(library: &str, content_type: &str, data: &str) -> Result<String> {
    let invalid = |message: String| MeasureKitError::InvalidAttachment {
        library: library.to_string(),
        content_type: content_type.to_string(),
        message,
    };

    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = ATTACHMENT_ENGINE
        .decode(compact)
        .map_err(|e| invalid(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| invalid(e.to_string()))
}
