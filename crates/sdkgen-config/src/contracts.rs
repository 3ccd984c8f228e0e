//! JSON files exchanged with the SDK repository's scripts.

use std::collections::HashSet;

use indexmap::IndexMap;
use sdkgen_core::SdkAutoStatus;
use serde::{Deserialize, Serialize};

use crate::error::ContractError;
use crate::run::{RunMode, SdkReleaseType};

pub const INIT_INPUT_FILE: &str = "initInput.json";
pub const INIT_OUTPUT_FILE: &str = "initOutput.json";
pub const GENERATE_INPUT_FILE: &str = "generateInput.json";
pub const GENERATE_OUTPUT_FILE: &str = "generateOutput.json";
pub const INSTALL_INSTRUCTION_INPUT_FILE: &str = "installInstructionInput.json";
pub const INSTALL_INSTRUCTION_OUTPUT_FILE: &str = "installInstructionOutput.json";

#[derive(Debug, Clone, Default, Serialize)]
pub struct InitScriptInput {}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitScriptOutput {
    /// Variables added to every later script's environment.
    #[serde(default)]
    pub envs: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallInstructionScriptInput {
    pub is_public: bool,
    pub download_url_prefix: String,
    pub download_command_template: String,
    pub package_name: String,
    pub artifacts: Vec<String>,
    pub trigger: String,
}

impl InstallInstructionScriptInput {
    /// Input for an instruction set built from pull request artifacts.
    #[must_use]
    pub fn for_pull_request(package_name: impl Into<String>, artifacts: Vec<String>) -> Self {
        Self {
            is_public: false,
            download_url_prefix: String::new(),
            download_command_template: String::new(),
            package_name: package_name.into(),
            artifacts,
            trigger: "pullRequest".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstallInstructionScriptOutput {
    pub full: String,
    #[serde(default)]
    pub lite: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScriptInput {
    pub spec_folder: String,
    pub head_sha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_ref: Option<String>,
    pub repo_https_url: String,
    pub changed_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_readme_md_files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_type_spec_project_folder: Option<Vec<String>>,
    pub install_instruction_input: InstallInstructionScriptInput,
    pub run_mode: RunMode,
    pub sdk_release_type: SdkReleaseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedChangelog {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub has_breaking_change: bool,
    #[serde(default)]
    pub breaking_change_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPackage {
    pub package_name: String,
    pub path: Vec<String>,
    pub result: SdkAutoStatus,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub readme_md: Vec<String>,
    #[serde(default)]
    pub typespec_project: Vec<String>,
    #[serde(default)]
    pub changelog: Option<GeneratedChangelog>,
    #[serde(default)]
    pub artifacts: Vec<String>,
    #[serde(default)]
    pub api_view_artifact: Option<String>,
    #[serde(default)]
    pub installation_instructions: Option<InstallInstructionScriptOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateScriptOutput {
    pub packages: Vec<GeneratedPackage>,
}

impl GenerateScriptOutput {
    /// Checks what the schema alone cannot.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ContractError> {
        let mut seen = HashSet::new();
        for (index, package) in self.packages.iter().enumerate() {
            if package.package_name.trim().is_empty() {
                return Err(ContractError::EmptyPackageName { index });
            }
            if package.path.iter().all(|p| p.trim().is_empty()) {
                return Err(ContractError::MissingPath {
                    package: package.package_name.clone(),
                });
            }
            if !seen.insert(package.package_name.as_str()) {
                return Err(ContractError::DuplicatePackage {
                    package: package.package_name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Metadata written next to each staged APIView artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiViewArtifactMeta {
    pub package_name: String,
    pub api_view_artifact: String,
    pub spec_commit_sha: Option<String>,
    pub language: String,
    pub artifact_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateScriptOutput {
        serde_json::from_str(json).expect("valid generate output")
    }

    #[test]
    fn parses_minimal_package() {
        let output = parse(
            r#"{"packages": [{"packageName": "azure-foo", "path": ["sdk/foo"], "result": "succeeded"}]}"#,
        );
        assert_eq!(output.packages.len(), 1);
        let pkg = &output.packages[0];
        assert_eq!(pkg.package_name, "azure-foo");
        assert_eq!(pkg.result, SdkAutoStatus::Succeeded);
        assert!(pkg.changelog.is_none());
        assert!(output.validate().is_ok());
    }

    #[test]
    fn parses_optional_fields() {
        let output = parse(
            r#"{"packages": [{
                "packageName": "azure-mgmt-foo",
                "path": ["sdk/foo/azure-mgmt-foo"],
                "result": "failed",
                "serviceName": "foo",
                "version": "1.0.0b1",
                "readmeMd": ["specification/foo/resource-manager/readme.md"],
                "changelog": {"content": "x", "hasBreakingChange": true, "breakingChangeItems": ["Removed Y"]},
                "artifacts": ["dist/a.whl"],
                "apiViewArtifact": "dist/a.json",
                "installationInstructions": {"full": "pip install a"}
            }]}"#,
        );
        let pkg = &output.packages[0];
        assert_eq!(pkg.result, SdkAutoStatus::Failed);
        let changelog = pkg.changelog.as_ref().expect("changelog");
        assert!(changelog.has_breaking_change);
        assert_eq!(changelog.breaking_change_items, vec!["Removed Y"]);
        assert_eq!(
            pkg.installation_instructions.as_ref().map(|i| i.full.as_str()),
            Some("pip install a")
        );
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let result = serde_json::from_str::<GenerateScriptOutput>(
            r#"{"packages": [{"packageName": "azure-foo", "result": "succeeded"}]}"#,
        );
        assert!(result.is_err());
        assert!(serde_json::from_str::<GenerateScriptOutput>("{}").is_err());
    }

    #[test]
    fn empty_path_list_violates_contract() {
        let output = parse(r#"{"packages": [{"packageName": "a", "path": [], "result": "succeeded"}]}"#);
        assert_eq!(
            output.validate(),
            Err(ContractError::MissingPath {
                package: "a".to_string()
            })
        );
    }

    #[test]
    fn duplicate_package_violates_contract() {
        let output = parse(
            r#"{"packages": [
                {"packageName": "a", "path": ["x"], "result": "succeeded"},
                {"packageName": "a", "path": ["y"], "result": "succeeded"}
            ]}"#,
        );
        assert!(matches!(
            output.validate(),
            Err(ContractError::DuplicatePackage { .. })
        ));
    }

    #[test]
    fn install_input_serializes_camel_case() {
        let input = InstallInstructionScriptInput::for_pull_request("azure-foo", vec!["a.tgz".into()]);
        let json = serde_json::to_value(&input).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "isPublic": false,
                "downloadUrlPrefix": "",
                "downloadCommandTemplate": "",
                "packageName": "azure-foo",
                "artifacts": ["a.tgz"],
                "trigger": "pullRequest"
            })
        );
    }
}
