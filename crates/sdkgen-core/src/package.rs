use crate::status::{SdkAutoStatus, StatusContainer};
use crate::version::{VersionKind, classify_version};

pub const NO_SUPPRESSION_FILE: &str = "No suppression file added.";
pub const NO_SUPPRESSIONS_DEFINED: &str = "This package has no defined suppressions.";

/// One SDK package produced, or attempted, by a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageData {
    pub name: String,
    pub service_name: Option<String>,
    pub relative_folder_path: String,
    pub extra_relative_folder_paths: Vec<String>,
    pub status: SdkAutoStatus,
    pub messages: Vec<String>,
    pub has_breaking_change: bool,
    pub breaking_change_items: Vec<String>,
    pub is_beta_mgmt_sdk: bool,
    pub is_data_plane: bool,
    pub version: Option<String>,
    pub changelogs: Vec<String>,
    pub artifact_paths: Vec<String>,
    pub present_suppression_lines: Vec<String>,
    pub absent_suppression_lines: Vec<String>,
    pub installation_instructions: Option<String>,
    pub lite_installation_instruction: Option<String>,
    pub api_view_artifact_path: Option<String>,
    pub readme_md: Vec<String>,
    pub typespec_project: Vec<String>,
    pub language: Option<String>,
}

impl PackageData {
    #[must_use]
    pub fn new(name: impl Into<String>, relative_folder_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relative_folder_path: relative_folder_path.into(),
            is_data_plane: true,
            ..Self::default()
        }
    }

    /// All folders the package occupies, primary folder first.
    pub fn folders(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.relative_folder_path.as_str())
            .chain(self.extra_relative_folder_paths.iter().map(String::as_str))
    }

    /// Derives the plane and beta flags from the source paths and version.
    pub fn classify(&mut self) {
        self.is_data_plane = self
            .readme_md
            .iter()
            .chain(&self.typespec_project)
            .all(|path| is_data_plane_path(path));
        let is_beta = self
            .version
            .as_deref()
            .is_some_and(|version| classify_version(version) == VersionKind::Beta);
        self.is_beta_mgmt_sdk = !self.is_data_plane && is_beta;
    }

    /// True when the present suppression lines hold at least one declared
    /// suppression rather than a placeholder message.
    #[must_use]
    pub fn are_breaking_changes_suppressed(&self) -> bool {
        self.has_breaking_change
            && self
                .present_suppression_lines
                .iter()
                .any(|line| line != NO_SUPPRESSION_FILE && line != NO_SUPPRESSIONS_DEFINED)
    }

    #[must_use]
    pub fn should_label_breaking_change(&self) -> bool {
        self.has_breaking_change && !self.are_breaking_changes_suppressed() && !self.is_beta_mgmt_sdk
    }
}

impl StatusContainer for PackageData {
    fn status(&self) -> SdkAutoStatus {
        self.status
    }

    fn set_status(&mut self, status: SdkAutoStatus) {
        self.status = status;
    }
}

#[must_use]
pub fn is_data_plane_path(path: &str) -> bool {
    !path.contains("resource-manager") && !path.contains(".Management")
}
