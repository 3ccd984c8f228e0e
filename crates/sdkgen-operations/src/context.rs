use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use sdkgen_config::{LogPaths, RunConfig, SpecRepoConfig, SwaggerToSdkConfig, language_for_repo};
use sdkgen_core::{FailureType, PackageData, SdkAutoStatus, StatusContainer, VsoLogs};
use sdkgen_report::CommentView;
use sdkgen_suppression::SuppressionDocument;

/// Process variables every script sees, before any script-specific pass-through.
pub const DEFAULT_SCRIPT_ENVS: [&str; 5] = ["USER", "HOME", "PATH", "SHELL", "NODE_OPTIONS"];

/// VSO log task for messages about the run as a whole.
pub const RUN_TASK: &str = "SpecGenSdk";

/// State of one generation run, threaded through every stage.
#[derive(Debug)]
pub struct WorkflowContext {
    pub config: RunConfig,
    pub swagger_to_sdk_config: SwaggerToSdkConfig,
    pub spec_repo_config: SpecRepoConfig,
    pub status: SdkAutoStatus,
    pub failure_type: Option<FailureType>,
    pub pending_packages: Vec<PackageData>,
    /// Packages in the order they finished.
    pub handled_packages: Vec<PackageData>,
    pub vso_logs: VsoLogs,
    pub tmp_folder: PathBuf,
    pub script_envs: IndexMap<String, String>,
    /// The TypeSpec or readme path that enabled generation.
    pub spec_config_path: Option<String>,
    pub is_sdk_config_duplicated: bool,
    pub suppressions: Option<SuppressionDocument>,
    /// Run-level lines shown in the pull request comment.
    pub messages: Vec<String>,
    pub log_paths: LogPaths,
    pub staged_artifacts_folder: Option<PathBuf>,
    pub sdk_artifact_folder: Option<PathBuf>,
    /// Azure DevOps variables to publish when the run ends.
    pub pipeline_variables: IndexMap<String, String>,
}

impl WorkflowContext {
    #[must_use]
    pub fn new(
        config: RunConfig,
        swagger_to_sdk_config: SwaggerToSdkConfig,
        spec_repo_config: SpecRepoConfig,
        log_paths: LogPaths,
    ) -> Self {
        let tmp_folder = config.tmp_folder();
        let spec_config_path = config.spec_config_path().map(ToString::to_string);
        Self {
            config,
            swagger_to_sdk_config,
            spec_repo_config,
            status: SdkAutoStatus::Succeeded,
            failure_type: None,
            pending_packages: Vec::new(),
            handled_packages: Vec::new(),
            vso_logs: VsoLogs::new(),
            tmp_folder,
            script_envs: IndexMap::new(),
            spec_config_path,
            is_sdk_config_duplicated: false,
            suppressions: None,
            messages: Vec::new(),
            log_paths,
            staged_artifacts_folder: None,
            sdk_artifact_folder: None,
            pipeline_variables: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn sdk_folder(&self) -> &Path {
        &self.config.sdk_repo
    }

    #[must_use]
    pub fn tmp_file(&self, name: &str) -> PathBuf {
        self.tmp_folder.join(name)
    }

    /// Display name of the SDK language, e.g. `Python`.
    #[must_use]
    pub fn language(&self) -> String {
        language_for_repo(&self.config.sdk_name)
    }

    /// Raises the failure type; `CodegenFailed` is never replaced.
    pub fn escalate_failure(&mut self, failure_type: FailureType) {
        self.failure_type = FailureType::escalate(self.failure_type, failure_type);
    }

    pub fn set_variable(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!(name, value = %value, "pipeline variable");
        self.pipeline_variables.insert(name.to_string(), value);
    }

    /// Logs an error that also surfaces as a pipeline annotation.
    pub fn report_error(&mut self, task: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(task, "{message}");
        self.vso_logs.add_error(task, message);
    }

    pub fn report_warning(&mut self, task: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(task, "{message}");
        self.vso_logs.add_warning(task, message);
    }

    #[must_use]
    pub fn comment_view(&self) -> CommentView<'_> {
        CommentView {
            sdk_name: &self.config.sdk_name,
            spec_config_path: self.spec_config_path.as_deref(),
            status: self.status,
            failure_type: self.failure_type,
            messages: &self.messages,
            packages: &self.handled_packages,
            breaking_change_label: self.swagger_to_sdk_config.breaking_changes_label(),
            is_sdk_config_duplicated: self.is_sdk_config_duplicated,
        }
    }
}

impl StatusContainer for WorkflowContext {
    fn status(&self) -> SdkAutoStatus {
        self.status
    }

    fn set_status(&mut self, status: SdkAutoStatus) {
        self.status = status;
    }
}

/// The environment scripts start from: selected process variables plus
/// `TMPDIR` pointing at the run's temp folder.
#[must_use]
pub fn default_script_envs(tmp_folder: &Path) -> IndexMap<String, String> {
    let mut envs: IndexMap<String, String> = DEFAULT_SCRIPT_ENVS
        .iter()
        .filter_map(|name| {
            std::env::var(name)
                .ok()
                .map(|value| ((*name).to_string(), value))
        })
        .collect();
    envs.insert("TMPDIR".to_string(), tmp_folder.display().to_string());
    envs
}
