use indexmap::IndexMap;
use sdkgen_config::{LogPaths, RunConfig, load_spec_repo_config, load_swagger_to_sdk_config};
use sdkgen_core::{FailureType, PackageData, SdkAutoStatus, VsoLogs};
use sdkgen_suppression::{SuppressionDocument, load_suppressions};
use tracing::{Instrument, info, info_span};

use super::finalize::{ReportFiles, detect_leftover_pending, finalize};
use super::generate::run_generate_script;
use super::init::run_init_script;
use super::package::{PackageWorkflow, StageProviders, process_packages};
use super::validate::validate_sdk_config;
use crate::Result;
use crate::context::{WorkflowContext, default_script_envs};
use crate::traits::{ScriptRunner, WorkspaceIo};

/// What a finished run leaves behind for the caller.
#[derive(Debug)]
pub struct WorkflowOutcome {
    pub status: SdkAutoStatus,
    pub failure_type: Option<FailureType>,
    pub packages: Vec<PackageData>,
    pub pipeline_variables: IndexMap<String, String>,
    pub vso_logs: VsoLogs,
    pub reports: ReportFiles,
}

impl WorkflowOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status.is_failed()
    }
}

/// Builds the run context, reading both repositories' configuration from disk.
///
/// # Errors
///
/// Returns an error if `swagger_to_sdk_config.json` is missing or either
/// configuration file is malformed.
pub fn prepare_context(config: RunConfig, log_paths: LogPaths) -> Result<WorkflowContext> {
    let swagger_to_sdk_config = load_swagger_to_sdk_config(&config.sdk_repo)?;
    let spec_repo_config = load_spec_repo_config(&config.spec_repo)?;
    let mut ctx = WorkflowContext::new(config, swagger_to_sdk_config, spec_repo_config, log_paths);
    ctx.script_envs = default_script_envs(&ctx.tmp_folder);
    Ok(ctx)
}

/// Drives one SDK generation run from validation to the final reports.
pub struct WorkflowOperation<R, W> {
    runner: R,
    workspace: W,
    packages: PackageWorkflow,
}

impl<R, W> WorkflowOperation<R, W>
where
    R: ScriptRunner,
    W: WorkspaceIo,
{
    pub fn new(runner: R, workspace: W) -> Self {
        Self {
            runner,
            workspace,
            packages: PackageWorkflow::standard(),
        }
    }

    #[must_use]
    pub fn with_package_workflow(mut self, packages: PackageWorkflow) -> Self {
        self.packages = packages;
        self
    }

    /// Runs the whole workflow. Reports are always written once validation
    /// has passed, even when generation fails.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration problems: no spec config path, an
    /// `initOptions` without a script, no generate script, or an unreadable
    /// suppression file. I/O failures while preparing script input are also
    /// returned; no reports are written in these cases.
    pub async fn execute(&self, mut ctx: WorkflowContext) -> Result<WorkflowOutcome> {
        self.workspace.create_dir_all(&ctx.tmp_folder)?;
        validate_sdk_config(&self.workspace, &mut ctx)?;

        if ctx.status == SdkAutoStatus::NotEnabled {
            info!(sdk = %ctx.config.sdk_name, "generation is not enabled, skipping to reports");
        } else {
            run_init_script(&self.runner, &self.workspace, &mut ctx)
                .instrument(info_span!("init"))
                .await?;
            ctx.suppressions = load_suppression_document(&ctx)?;
            run_generate_script(&self.runner, &self.workspace, &mut ctx)
                .instrument(info_span!("generate"))
                .await?;
            let providers = StageProviders {
                runner: &self.runner,
                workspace: &self.workspace,
            };
            process_packages(&self.packages, providers, &mut ctx).await;
        }

        detect_leftover_pending(&mut ctx);
        let reports = finalize(&self.workspace, &mut ctx);
        info!(status = %ctx.status, failure_type = ?ctx.failure_type, "run finished");

        Ok(WorkflowOutcome {
            status: ctx.status,
            failure_type: ctx.failure_type,
            packages: ctx.handled_packages,
            pipeline_variables: ctx.pipeline_variables,
            vso_logs: ctx.vso_logs,
            reports,
        })
    }
}

fn load_suppression_document(ctx: &WorkflowContext) -> Result<Option<SuppressionDocument>> {
    let Some(spec_config_path) = &ctx.spec_config_path else {
        return Ok(None);
    };
    let loaded = load_suppressions(&ctx.config.spec_repo, spec_config_path)?;
    Ok(loaded.map(|(path, document)| {
        info!(path = %path.display(), "loaded breaking change suppressions");
        document
    }))
}
