use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use sdkgen_script::DEFAULT_SCRIPT_TIMEOUT;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    #[default]
    Local,
    SpecPullRequest,
    Release,
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum RunEnv {
    #[default]
    Local,
    #[value(name = "azureDevOps")]
    AzureDevOps,
    /// Skips copying artifacts.
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SdkReleaseType {
    #[default]
    Beta,
    Stable,
}

impl fmt::Display for SdkReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beta => f.write_str("beta"),
            Self::Stable => f.write_str("stable"),
        }
    }
}

/// Everything one generation run is told from the outside.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub spec_repo: PathBuf,
    pub sdk_repo: PathBuf,
    /// SDK repository name, e.g. `azure-sdk-for-net`.
    pub sdk_name: String,
    pub working_folder: PathBuf,
    /// Relative to `spec_repo`.
    pub tsp_config_path: Option<String>,
    /// Relative to `spec_repo`.
    pub readme_path: Option<String>,
    pub head_sha: Option<String>,
    pub head_ref: Option<String>,
    pub spec_repo_https_url: Option<String>,
    pub pull_number: Option<u64>,
    pub api_version: Option<String>,
    pub sdk_release_type: SdkReleaseType,
    pub run_mode: RunMode,
    pub run_env: RunEnv,
    pub changed_files: Vec<String>,
    pub script_timeout: Duration,
}

impl RunConfig {
    #[must_use]
    pub fn new(
        spec_repo: impl Into<PathBuf>,
        sdk_repo: impl Into<PathBuf>,
        sdk_name: impl Into<String>,
        working_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            spec_repo: spec_repo.into(),
            sdk_repo: sdk_repo.into(),
            sdk_name: sdk_name.into(),
            working_folder: working_folder.into(),
            tsp_config_path: None,
            readme_path: None,
            head_sha: None,
            head_ref: None,
            spec_repo_https_url: None,
            pull_number: None,
            api_version: None,
            sdk_release_type: SdkReleaseType::default(),
            run_mode: RunMode::default(),
            run_env: RunEnv::default(),
            changed_files: Vec::new(),
            script_timeout: DEFAULT_SCRIPT_TIMEOUT,
        }
    }

    /// The enabled-config path used to name this run's logs, TypeSpec first.
    #[must_use]
    pub fn spec_config_path(&self) -> Option<&str> {
        self.tsp_config_path
            .as_deref()
            .or(self.readme_path.as_deref())
    }

    /// The SDK repository name without the `azure-sdk-for-` prefix.
    #[must_use]
    pub fn sdk_short_name(&self) -> &str {
        self.sdk_name
            .strip_prefix("azure-sdk-for-")
            .unwrap_or(&self.sdk_name)
    }

    #[must_use]
    pub fn tmp_folder(&self) -> PathBuf {
        self.working_folder.join(format!("{}_tmp", self.sdk_name))
    }
}

/// Display name of the SDK language a repository holds.
#[must_use]
pub fn language_for_repo(sdk_name: &str) -> String {
    let short = sdk_name.strip_prefix("azure-sdk-for-").unwrap_or(sdk_name);
    let short = short.strip_suffix("-pr").unwrap_or(short);
    match short {
        "net" => ".Net".to_string(),
        "js" => "JavaScript".to_string(),
        "python" => "Python".to_string(),
        "java" => "Java".to_string(),
        "go" => "Go".to_string(),
        "rust" => "Rust".to_string(),
        other => other.to_string(),
    }
}

/// Derives a file name prefix from a spec config path.
///
/// `specification/foo.Management/tspconfig.yaml` becomes `foo-management` and
/// `specification/foo/resource-manager/readme.md` becomes
/// `foo-resource-manager`. Returns `None` when the path is not under
/// `specification/`.
#[must_use]
pub fn spec_config_prefix(spec_config_path: &str) -> Option<String> {
    let normalized = spec_config_path.replace('\\', "/");
    let (_, rest) = normalized.split_once("specification/")?;
    let folder = if rest.ends_with(".yaml") || rest.ends_with(".md") {
        rest.rsplit_once('/').map_or("", |(folder, _)| folder)
    } else {
        rest.trim_end_matches('/')
    };
    if folder.is_empty() {
        return None;
    }
    Some(folder.replace(['/', '.'], "-").to_lowercase())
}

/// File locations for one run's logs and summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    pub folder: PathBuf,
    pub full: PathBuf,
    pub filtered: PathBuf,
    pub vso: PathBuf,
    pub html: PathBuf,
    pub package_report: PathBuf,
}

impl LogPaths {
    /// `fallback_stamp` names the logs when no spec config path is known.
    #[must_use]
    pub fn new(working_folder: &Path, spec_config_path: Option<&str>, fallback_stamp: &str) -> Self {
        let prefix = spec_config_path
            .and_then(spec_config_prefix)
            .unwrap_or_else(|| format!("no-readme-tspconfig-{fallback_stamp}"));
        let folder = working_folder.join("out").join("logs");
        Self {
            full: folder.join(format!("{prefix}-full.log")),
            filtered: folder.join(format!("{prefix}-filtered.log")),
            vso: folder.join(format!("{prefix}-vso.log")),
            html: folder.join(format!("{prefix}-gen-result.html")),
            package_report: folder.join(format!("{prefix}-package-report.md")),
            folder,
        }
    }
}
