use std::path::Path;

use async_trait::async_trait;
use sdkgen_config::RunEnv;
use sdkgen_config::contracts::ApiViewArtifactMeta;
use sdkgen_core::PackageData;
use tracing::info;

use super::{PackageStage, StageProviders};
use crate::context::WorkflowContext;
use crate::error::OperationError;
use crate::{Result, traits::WorkspaceIo};

/// Folder under the working folder that collects SDK artifacts.
pub const SDK_ARTIFACT_FOLDER: &str = "generatedSdkArtifacts";

/// Folder under the working folder that collects APIView artifacts and their metadata.
pub const API_VIEW_ARTIFACT_FOLDER: &str = "sdkApiViewArtifacts";

/// Copies the package's artifacts where the pipeline publishes them from.
pub struct StageArtifactsStage;

#[async_trait]
impl PackageStage for StageArtifactsStage {
    fn name(&self) -> &'static str {
        "stage_artifacts"
    }

    async fn execute(
        &self,
        providers: StageProviders<'_>,
        ctx: &mut WorkflowContext,
        package: &mut PackageData,
    ) -> Result<()> {
        let language = package.language.clone().unwrap_or_else(|| ctx.language());
        stage_sdk_artifacts(providers.workspace, ctx, package, &language)?;
        stage_api_view_artifact(providers.workspace, ctx, package, &language)
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |name| name.to_string_lossy().into_owned())
}

fn stage_sdk_artifacts(
    workspace: &dyn WorkspaceIo,
    ctx: &mut WorkflowContext,
    package: &PackageData,
    language: &str,
) -> Result<()> {
    info!(count = package.artifact_paths.len(), "staging SDK artifacts");
    ctx.set_variable("sdkLanguage", language);
    let destination = ctx.config.working_folder.join(SDK_ARTIFACT_FOLDER);
    // Go builds stage their own output; only the expected location is recorded.
    if language.eq_ignore_ascii_case("go") {
        ctx.sdk_artifact_folder = Some(destination);
        return Ok(());
    }
    if package.artifact_paths.is_empty() {
        return Ok(());
    }

    workspace.create_dir_all(&destination)?;
    ctx.sdk_artifact_folder = Some(destination.clone());
    ctx.set_variable("HasSDKArtifact", "true");
    ctx.set_variable("sdkArtifactName", format!("SDK_Artifact_{language}"));

    if ctx.config.run_env == RunEnv::Test {
        return Ok(());
    }
    for artifact in &package.artifact_paths {
        let from = ctx.sdk_folder().join(artifact);
        let to = destination.join(file_name(artifact));
        info!(from = %from.display(), to = %to.display(), "copying SDK artifact");
        workspace.copy_file(&from, &to)?;
    }
    Ok(())
}

fn stage_api_view_artifact(
    workspace: &dyn WorkspaceIo,
    ctx: &mut WorkflowContext,
    package: &PackageData,
    language: &str,
) -> Result<()> {
    let Some(api_view) = &package.api_view_artifact_path else {
        return Ok(());
    };

    let destination = ctx.config.working_folder.join(API_VIEW_ARTIFACT_FOLDER);
    workspace.create_dir_all(&destination)?;
    ctx.staged_artifacts_folder = Some(destination.clone());
    let artifact_name = format!("sdkApiViewArtifact_{language}");
    ctx.set_variable("HasApiViewArtifact", "true");
    ctx.set_variable("ArtifactName", artifact_name.as_str());

    let name = file_name(api_view);
    let from = ctx.sdk_folder().join(api_view);
    let to = destination.join(&name);
    info!(from = %from.display(), to = %to.display(), "copying APIView artifact");
    workspace.copy_file(&from, &to)?;

    let meta = ApiViewArtifactMeta {
        package_name: package.name.clone(),
        api_view_artifact: name.clone(),
        spec_commit_sha: ctx.config.head_sha.clone(),
        language: language.to_string(),
        artifact_name,
    };
    let content = serde_json::to_string_pretty(&meta).map_err(|source| {
        OperationError::Serialize {
            what: "APIView artifact metadata",
            source,
        }
    })?;
    workspace.write_file(&destination.join(format!("_meta_{name}.json")), &content)
}
