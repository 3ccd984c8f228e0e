//! The pipeline every generated package goes through.

mod artifacts;
mod build;
mod changelog;
mod install;
mod staging;

use async_trait::async_trait;
use sdkgen_core::{PackageData, SdkAutoStatus, StatusContainer};
use tracing::{Instrument, info, info_span};

use crate::Result;
use crate::context::WorkflowContext;
use crate::traits::{ScriptRunner, WorkspaceIo};

pub use artifacts::DetectArtifactsStage;
pub use build::BuildStage;
pub use changelog::ChangelogStage;
pub use install::InstallInstructionStage;
pub use staging::{API_VIEW_ARTIFACT_FOLDER, SDK_ARTIFACT_FOLDER, StageArtifactsStage};

#[derive(Clone, Copy)]
pub struct StageProviders<'a> {
    pub runner: &'a dyn ScriptRunner,
    pub workspace: &'a dyn WorkspaceIo,
}

/// One step of the package pipeline.
///
/// Script failures are recorded on the package or the run. An `Err` means
/// the stage could not do its bookkeeping at all.
#[async_trait]
pub trait PackageStage: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns an error if a file the stage needs cannot be read, written or copied.
    async fn execute(
        &self,
        providers: StageProviders<'_>,
        ctx: &mut WorkflowContext,
        package: &mut PackageData,
    ) -> Result<()>;
}

pub struct PackageWorkflow {
    stages: Vec<Box<dyn PackageStage>>,
}

impl PackageWorkflow {
    #[must_use]
    pub fn new(stages: Vec<Box<dyn PackageStage>>) -> Self {
        Self { stages }
    }

    /// Build, changelog, artifact discovery, install instructions, staging.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(BuildStage),
            Box::new(ChangelogStage),
            Box::new(DetectArtifactsStage),
            Box::new(InstallInstructionStage),
            Box::new(StageArtifactsStage),
        ])
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Runs every stage in order.
    ///
    /// A script that fails only merges `failed` into the package status, and
    /// the later stages still run. An I/O error inside a stage stops the
    /// package on the spot: no later stage runs, the status is not settled,
    /// and leftover pending detection reports the package at the end of the run.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the stage that stopped the package.
    pub async fn run(
        &self,
        providers: StageProviders<'_>,
        ctx: &mut WorkflowContext,
        package: &mut PackageData,
    ) -> Result<()> {
        for stage in &self.stages {
            let span = info_span!("stage", name = stage.name(), package = %package.name);
            stage
                .execute(providers, ctx, &mut *package)
                .instrument(span)
                .await?;
        }
        package.merge_status(SdkAutoStatus::Succeeded);
        info!(package = %package.name, status = %package.status, "package handled");
        Ok(())
    }
}

/// Pulls packages off the pending queue in generation order.
///
/// Handled packages move to `handled_packages`; a package whose pipeline
/// errored is logged and left pending.
pub async fn process_packages(
    workflow: &PackageWorkflow,
    providers: StageProviders<'_>,
    ctx: &mut WorkflowContext,
) {
    let mut unfinished = Vec::new();
    while !ctx.pending_packages.is_empty() {
        let mut package = ctx.pending_packages.remove(0);
        let span = info_span!("package", name = %package.name);
        let result = workflow
            .run(providers, ctx, &mut package)
            .instrument(span)
            .await;
        match result {
            Ok(()) => ctx.handled_packages.push(package),
            Err(err) => {
                let message = format!(
                    "package {} was not handled: {}",
                    package.name,
                    super::tmp_json::describe(&err)
                );
                ctx.report_error(&package.name, message);
                unfinished.push(package);
            }
        }
    }
    ctx.pending_packages = unfinished;
}
