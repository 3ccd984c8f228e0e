use indexmap::IndexMap;
use serde::Deserialize;
use serde_with::{MapPreventDuplicates, serde_as};

use crate::error::SuppressionError;

const MAX_INPUT_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SuppressionEntry {
    pub package: String,
    #[serde(default, rename = "breaking-changes")]
    pub breaking_changes: Vec<String>,
}

/// Pre-approved breaking changes, keyed by SDK repository name.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SuppressionDocument {
    #[serde_as(as = "Option<MapPreventDuplicates<_, _>>")]
    suppressions: Option<IndexMap<String, Vec<SuppressionEntry>>>,
}

impl SuppressionDocument {
    #[must_use]
    pub fn entries_for(&self, sdk_name: &str) -> Option<&[SuppressionEntry]> {
        self.suppressions
            .as_ref()
            .and_then(|map| map.get(sdk_name))
            .map(Vec::as_slice)
    }

    /// The first entry declared for `package` in `sdk_name`'s list.
    #[must_use]
    pub fn entry(&self, sdk_name: &str, package: &str) -> Option<&SuppressionEntry> {
        self.entries_for(sdk_name)?
            .iter()
            .find(|entry| entry.package == package)
    }

    pub fn sdk_names(&self) -> impl Iterator<Item = &str> {
        self.suppressions
            .iter()
            .flat_map(IndexMap::keys)
            .map(String::as_str)
    }
}

/// # Errors
///
/// Returns an error if the content is too large, is not valid YAML, or
/// declares the same SDK twice.
#[must_use = "parsing result should be handled"]
pub fn parse_suppressions(content: &str) -> Result<SuppressionDocument, SuppressionError> {
    if content.len() > MAX_INPUT_SIZE {
        return Err(SuppressionError::InputTooLarge {
            max_bytes: MAX_INPUT_SIZE,
        });
    }
    if content.trim().is_empty() {
        return Ok(SuppressionDocument::default());
    }
    Ok(serde_yml::from_str(content)?)
}
