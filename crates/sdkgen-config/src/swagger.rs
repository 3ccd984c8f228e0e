//! The SDK repository's `swagger_to_sdk_config.json`.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use sdkgen_script::{LineFilter, RunOptions};
use serde::Deserialize;

use crate::error::ConfigError;

const CONFIG_FILE_NAME: &str = "swagger_to_sdk_config.json";

/// A regular expression read from configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct Pattern(Regex);

impl TryFrom<String> for Pattern {
    type Error = ConfigError;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        Regex::new(&pattern)
            .map(Self)
            .map_err(|source| ConfigError::InvalidPattern { pattern, source })
    }
}

impl Pattern {
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOptions {
    #[serde(default)]
    pub init_script: Option<RunOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    #[serde(default)]
    pub generate_script: Option<RunOptions>,
    /// The generate script also builds, so the package build stage is skipped.
    #[serde(default)]
    pub generate_and_build: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogScriptOptions {
    #[serde(flatten)]
    pub run: RunOptions,
    #[serde(default)]
    pub breaking_change_detect: LineFilter,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageOptions {
    #[serde(default)]
    pub build_script: Option<RunOptions>,
    #[serde(default)]
    pub changelog_script: Option<ChangelogScriptOptions>,
    #[serde(default)]
    pub breaking_changes_label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSearch {
    pub search_regex: Pattern,
    #[serde(default)]
    pub search_folder: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactOptions {
    #[serde(default)]
    pub artifact_path_from_file_search: Option<ArtifactSearch>,
    #[serde(default)]
    pub install_instruction_script: Option<RunOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwaggerToSdkConfig {
    #[serde(default)]
    init_options: Option<InitOptions>,
    #[serde(default)]
    generate_options: GenerateOptions,
    #[serde(default)]
    package_options: PackageOptions,
    #[serde(default)]
    artifact_options: ArtifactOptions,
}

impl SwaggerToSdkConfig {
    /// `None` when the SDK repository does not declare an init step at all.
    #[must_use]
    pub fn init_options(&self) -> Option<&InitOptions> {
        self.init_options.as_ref()
    }

    #[must_use]
    pub fn generate_options(&self) -> &GenerateOptions {
        &self.generate_options
    }

    #[must_use]
    pub fn package_options(&self) -> &PackageOptions {
        &self.package_options
    }

    #[must_use]
    pub fn artifact_options(&self) -> &ArtifactOptions {
        &self.artifact_options
    }

    #[must_use]
    pub fn breaking_changes_label(&self) -> &str {
        self.package_options
            .breaking_changes_label
            .as_deref()
            .unwrap_or("BreakingChange")
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_init_options(mut self, init_options: InitOptions) -> Self {
        self.init_options = Some(init_options);
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_generate_options(mut self, generate_options: GenerateOptions) -> Self {
        self.generate_options = generate_options;
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_package_options(mut self, package_options: PackageOptions) -> Self {
        self.package_options = package_options;
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_artifact_options(mut self, artifact_options: ArtifactOptions) -> Self {
        self.artifact_options = artifact_options;
        self
    }
}

/// # Errors
///
/// Returns an error if the content is not valid JSON for the configuration schema.
pub fn parse_swagger_to_sdk_config(content: &str, path: &Path) -> crate::Result<SwaggerToSdkConfig> {
    serde_json::from_str(content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads `eng/swagger_to_sdk_config.json`, falling back to the repository root.
///
/// # Errors
///
/// Returns an error if neither file exists or the file found cannot be parsed.
pub fn load_swagger_to_sdk_config(sdk_repo: &Path) -> crate::Result<SwaggerToSdkConfig> {
    let path = config_path(sdk_repo).ok_or_else(|| ConfigError::SwaggerToSdkConfigNotFound {
        sdk_repo: sdk_repo.to_path_buf(),
    })?;
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded SDK repository configuration");
    parse_swagger_to_sdk_config(&content, &path)
}

fn config_path(sdk_repo: &Path) -> Option<PathBuf> {
    [
        sdk_repo.join("eng").join(CONFIG_FILE_NAME),
        sdk_repo.join(CONFIG_FILE_NAME),
    ]
    .into_iter()
    .find(|candidate| candidate.is_file())
}
