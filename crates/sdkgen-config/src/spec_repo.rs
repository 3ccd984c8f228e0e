use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;

pub const SPEC_REPO_CONFIG_FILE: &str = "specificationRepositoryConfiguration.json";

const DEFAULT_EMITTER_MAPPING: [(&str, &str); 9] = [
    ("@azure-tools/typespec-python", "azure-sdk-for-python"),
    ("@azure-tools/typespec-java", "azure-sdk-for-java"),
    ("@azure-tools/typespec-csharp", "azure-sdk-for-net"),
    ("@azure-tools/typespec-ts", "azure-sdk-for-js"),
    ("@azure-tools/typespec-go", "azure-sdk-for-go"),
    ("@azure-typespec/http-client-csharp", "azure-sdk-for-net"),
    ("@azure-typespec/http-client-csharp-mgmt", "azure-sdk-for-net"),
    ("@azure-typespec/http-client-java", "azure-sdk-for-java"),
    ("@azure-tools/typespec-rust", "azure-sdk-for-rust"),
];

/// The spec repository's own configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecRepoConfig {
    #[serde(default = "default_emitter_mapping")]
    typespec_emitter_to_sdk_repository_mapping: IndexMap<String, String>,
}

impl Default for SpecRepoConfig {
    fn default() -> Self {
        Self {
            typespec_emitter_to_sdk_repository_mapping: default_emitter_mapping(),
        }
    }
}

impl SpecRepoConfig {
    /// Maps a TypeSpec emitter package name to the SDK repository it generates.
    #[must_use]
    pub fn emitter_mapping(&self) -> &IndexMap<String, String> {
        &self.typespec_emitter_to_sdk_repository_mapping
    }

    #[must_use]
    pub fn with_emitter_mapping(mut self, mapping: IndexMap<String, String>) -> Self {
        self.typespec_emitter_to_sdk_repository_mapping = mapping;
        self
    }
}

fn default_emitter_mapping() -> IndexMap<String, String> {
    DEFAULT_EMITTER_MAPPING
        .iter()
        .map(|(emitter, repo)| ((*emitter).to_string(), (*repo).to_string()))
        .collect()
}

/// Loads the spec repository configuration, using the built-in emitter table
/// when the repository does not ship one.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_spec_repo_config(spec_repo: &Path) -> crate::Result<SpecRepoConfig> {
    let path = spec_repo.join(SPEC_REPO_CONFIG_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no spec repository configuration, using defaults");
            return Ok(SpecRepoConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    serde_json::from_str(&content).map_err(|source| ConfigError::Json { path, source })
}
