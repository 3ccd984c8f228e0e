use std::path::PathBuf;

use sdkgen_core::{PackageData, SdkAutoStatus};
use serde::Serialize;

use crate::error::{ReportError, Result};

pub const EXECUTION_REPORT_FILE: &str = "execution-report.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageReport {
    pub service_name: Option<String>,
    pub package_name: String,
    pub result: SdkAutoStatus,
    pub artifact_paths: Vec<String>,
    pub readme_md: Vec<String>,
    pub typespec_project: Vec<String>,
    pub version: Option<String>,
    pub api_view_artifact: Option<String>,
    pub language: Option<String>,
    pub has_breaking_change: bool,
    pub breaking_change_label: String,
    pub should_label_breaking_change: bool,
    pub are_breaking_change_suppressed: bool,
    pub present_breaking_change_suppressions: Vec<String>,
    pub absent_breaking_change_suppressions: Vec<String>,
    pub install_instructions: Option<String>,
}

impl PackageReport {
    #[must_use]
    pub fn new(package: &PackageData, breaking_change_label: &str) -> Self {
        Self {
            service_name: package.service_name.clone(),
            package_name: package.name.clone(),
            result: package.status,
            artifact_paths: package.artifact_paths.clone(),
            readme_md: package.readme_md.clone(),
            typespec_project: package.typespec_project.clone(),
            version: package.version.clone(),
            api_view_artifact: package.api_view_artifact_path.clone(),
            language: package.language.clone(),
            has_breaking_change: package.has_breaking_change,
            breaking_change_label: breaking_change_label.to_string(),
            should_label_breaking_change: package.should_label_breaking_change(),
            are_breaking_change_suppressed: package.are_breaking_changes_suppressed(),
            present_breaking_change_suppressions: package.present_suppression_lines.clone(),
            absent_breaking_change_suppressions: package.absent_suppression_lines.clone(),
            install_instructions: package.installation_instructions.clone(),
        }
    }
}

/// The machine-readable result of one run, consumed by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub packages: Vec<PackageReport>,
    pub execution_result: SdkAutoStatus,
    pub is_sdk_config_duplicated: bool,
    pub full_log_path: PathBuf,
    pub filtered_log_path: PathBuf,
    pub staged_artifacts_folder: Option<PathBuf>,
    pub sdk_artifact_folder: Option<PathBuf>,
    pub generate_from_type_spec: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vso_log_path: Option<PathBuf>,
}

impl ExecutionReport {
    /// # Errors
    ///
    /// Returns an error if the report cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| ReportError::Serialize {
            what: "execution report",
            source,
        })
    }
}

/// Whether the run generated from a TypeSpec project.
///
/// The .NET repository decides per package, so for it any package carrying
/// a TypeSpec project counts. Every other repository goes by the enabled
/// spec config file.
#[must_use]
pub fn generated_from_typespec(
    sdk_name: &str,
    spec_config_path: Option<&str>,
    packages: &[PackageData],
) -> bool {
    if sdk_name.contains("net") {
        packages.iter().any(|pkg| !pkg.typespec_project.is_empty())
    } else {
        spec_config_path.is_some_and(|path| path.ends_with("tspconfig.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdkgen_core::NO_SUPPRESSION_FILE;

    fn breaking_package() -> PackageData {
        let mut pkg = PackageData::new("azure-mgmt-foo", "sdk/foo/azure-mgmt-foo");
        pkg.status = SdkAutoStatus::Succeeded;
        pkg.has_breaking_change = true;
        pkg.version = Some("2.0.0".to_string());
        pkg.present_suppression_lines = vec![NO_SUPPRESSION_FILE.to_string()];
        pkg.absent_suppression_lines = vec!["+\tRemoved Y".to_string()];
        pkg
    }

    #[test]
    fn package_report_carries_labeling_decision() {
        let report = PackageReport::new(&breaking_package(), "BreakingChange");
        assert!(report.should_label_breaking_change);
        assert!(!report.are_breaking_change_suppressed);
        assert_eq!(report.breaking_change_label, "BreakingChange");
    }

    #[test]
    fn report_serializes_with_camel_case_keys() -> anyhow::Result<()> {
        let report = ExecutionReport {
            packages: vec![PackageReport::new(&breaking_package(), "BreakingChange")],
            execution_result: SdkAutoStatus::Succeeded,
            is_sdk_config_duplicated: false,
            full_log_path: PathBuf::from("out/logs/foo-full.log"),
            filtered_log_path: PathBuf::from("out/logs/foo-filtered.log"),
            staged_artifacts_folder: None,
            sdk_artifact_folder: None,
            generate_from_type_spec: true,
            vso_log_path: None,
        };

        let json: serde_json::Value = serde_json::from_str(&report.to_json()?)?;

        assert_eq!(json["executionResult"], "succeeded");
        assert_eq!(json["generateFromTypeSpec"], true);
        assert_eq!(json["fullLogPath"], "out/logs/foo-full.log");
        assert!(json.get("vsoLogPath").is_none());
        let pkg = &json["packages"][0];
        assert_eq!(pkg["packageName"], "azure-mgmt-foo");
        assert_eq!(pkg["result"], "succeeded");
        assert_eq!(pkg["shouldLabelBreakingChange"], true);
        assert_eq!(pkg["absentBreakingChangeSuppressions"][0], "+\tRemoved Y");
        Ok(())
    }

    #[test]
    fn vso_log_path_is_written_when_set() -> anyhow::Result<()> {
        let report = ExecutionReport {
            packages: Vec::new(),
            execution_result: SdkAutoStatus::Failed,
            is_sdk_config_duplicated: true,
            full_log_path: PathBuf::from("full.log"),
            filtered_log_path: PathBuf::from("filtered.log"),
            staged_artifacts_folder: None,
            sdk_artifact_folder: None,
            generate_from_type_spec: false,
            vso_log_path: Some(PathBuf::from("vso.log")),
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json()?)?;
        assert_eq!(json["vsoLogPath"], "vso.log");
        assert_eq!(json["isSdkConfigDuplicated"], true);
        Ok(())
    }

    #[test]
    fn typespec_detection_follows_config_path_outside_net() {
        assert!(generated_from_typespec(
            "azure-sdk-for-python",
            Some("specification/foo/Foo.Management/tspconfig.yaml"),
            &[]
        ));
        assert!(!generated_from_typespec(
            "azure-sdk-for-python",
            Some("specification/foo/resource-manager/readme.md"),
            &[]
        ));
    }

    #[test]
    fn typespec_detection_for_net_looks_at_packages() {
        let mut pkg = PackageData::new("Azure.Foo", "sdk/foo/Azure.Foo");
        assert!(!generated_from_typespec(
            "azure-sdk-for-net",
            Some("specification/foo/Foo/tspconfig.yaml"),
            std::slice::from_ref(&pkg)
        ));
        pkg.typespec_project = vec!["specification/foo/Foo".to_string()];
        assert!(generated_from_typespec("azure-sdk-for-net", None, &[pkg]));
    }
}
