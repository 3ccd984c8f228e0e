use std::path::Path;

use async_trait::async_trait;
use sdkgen_config::contracts::{
    INSTALL_INSTRUCTION_INPUT_FILE, INSTALL_INSTRUCTION_OUTPUT_FILE, InstallInstructionScriptInput,
    InstallInstructionScriptOutput,
};
use sdkgen_core::PackageData;
use tracing::{info, warn};

use super::{PackageStage, StageProviders};
use crate::Result;
use crate::context::WorkflowContext;
use crate::operations::tmp_json::{describe, read_tmp_json, write_tmp_json};
use crate::script::{CustomScript, StatusTarget, run_custom_script};

const TASK: &str = "Inst";

/// Asks the SDK repository how to install the package's artifacts.
///
/// The script runs against the run's status. When it fails or its output
/// cannot be used, instructions from the generate output are kept.
pub struct InstallInstructionStage;

#[async_trait]
impl PackageStage for InstallInstructionStage {
    fn name(&self) -> &'static str {
        "install_instructions"
    }

    async fn execute(
        &self,
        providers: StageProviders<'_>,
        ctx: &mut WorkflowContext,
        package: &mut PackageData,
    ) -> Result<()> {
        let Some(script) = ctx
            .swagger_to_sdk_config
            .artifact_options()
            .install_instruction_script
            .clone()
        else {
            info!("installInstructionScript is not configured, skipping");
            return Ok(());
        };

        let artifacts = package
            .artifact_paths
            .iter()
            .map(|artifact| {
                Path::new(artifact)
                    .file_name()
                    .map_or_else(|| artifact.clone(), |name| name.to_string_lossy().into_owned())
            })
            .collect();
        let input = InstallInstructionScriptInput::for_pull_request(package.name.clone(), artifacts);
        write_tmp_json(
            providers.workspace,
            ctx,
            INSTALL_INSTRUCTION_INPUT_FILE,
            "install instruction input",
            &input,
        )?;
        providers
            .workspace
            .remove_file(&ctx.tmp_file(INSTALL_INSTRUCTION_OUTPUT_FILE))?;

        let run = run_custom_script(
            providers.runner,
            ctx,
            StatusTarget::Run,
            CustomScript::new(&script, TASK)
                .with_tmp_files(&[INSTALL_INSTRUCTION_INPUT_FILE, INSTALL_INSTRUCTION_OUTPUT_FILE]),
        )
        .await;
        if run.outcome.is_none() || run.is_failed() {
            warn!(package = %package.name, "keeping existing install instructions");
            return Ok(());
        }

        match read_tmp_json::<_, InstallInstructionScriptOutput>(
            providers.workspace,
            ctx,
            INSTALL_INSTRUCTION_OUTPUT_FILE,
            "install instruction",
        )? {
            Ok(output) => {
                package.installation_instructions = Some(output.full);
                if output.lite.is_some() {
                    package.lite_installation_instruction = output.lite;
                }
            }
            Err(err) => {
                let script_name = script.prefix_or(TASK).to_string();
                ctx.report_warning(&script_name, describe(&err));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockResponse, MockScriptRunner, MockWorkspace, test_context};
    use sdkgen_config::{ArtifactOptions, SwaggerToSdkConfig};
    use sdkgen_core::SdkAutoStatus;
    use sdkgen_script::RunOptions;

    fn install_context() -> WorkflowContext {
        let mut ctx = test_context();
        ctx.swagger_to_sdk_config =
            SwaggerToSdkConfig::default().with_artifact_options(ArtifactOptions {
                artifact_path_from_file_search: None,
                install_instruction_script: Some(RunOptions::new("eng/install.sh")),
            });
        ctx
    }

    fn seeded_package() -> PackageData {
        let mut pkg = PackageData::new("azure-foo", "sdk/foo");
        pkg.artifact_paths = vec!["sdk/foo/dist/azure_foo-1.0.0.whl".to_string()];
        pkg.installation_instructions = Some("seeded full".to_string());
        pkg.lite_installation_instruction = Some("seeded lite".to_string());
        pkg
    }

    async fn run_stage(
        runner: &MockScriptRunner,
        workspace: &MockWorkspace,
        ctx: &mut WorkflowContext,
        pkg: &mut PackageData,
    ) {
        InstallInstructionStage
            .execute(StageProviders { runner, workspace }, ctx, pkg)
            .await
            .expect("install stage");
    }

    #[tokio::test]
    async fn script_output_replaces_instructions() {
        let workspace = MockWorkspace::new();
        let runner = MockScriptRunner::new()
            .with_workspace(workspace.clone())
            .with_response(
                "eng/install.sh",
                MockResponse::exited(0).writes(
                    INSTALL_INSTRUCTION_OUTPUT_FILE,
                    r#"{"full": "pip install azure_foo-1.0.0.whl", "lite": "pip install"}"#,
                ),
            );
        let mut ctx = install_context();
        let mut pkg = seeded_package();

        run_stage(&runner, &workspace, &mut ctx, &mut pkg).await;

        assert_eq!(
            pkg.installation_instructions.as_deref(),
            Some("pip install azure_foo-1.0.0.whl")
        );
        assert_eq!(pkg.lite_installation_instruction.as_deref(), Some("pip install"));
        let input: serde_json::Value = serde_json::from_str(
            &workspace
                .file("/work/azure-sdk-for-python_tmp/installInstructionInput.json")
                .expect("input written"),
        )
        .expect("valid json");
        assert_eq!(input["packageName"], "azure-foo");
        assert_eq!(input["artifacts"], serde_json::json!(["azure_foo-1.0.0.whl"]));
        assert_eq!(input["trigger"], "pullRequest");
    }

    #[tokio::test]
    async fn failed_script_keeps_seeded_instructions() {
        let workspace = MockWorkspace::new();
        let runner = MockScriptRunner::new()
            .with_response("eng/install.sh", MockResponse::exited(3));
        let mut ctx = install_context();
        let mut pkg = seeded_package();

        run_stage(&runner, &workspace, &mut ctx, &mut pkg).await;

        assert_eq!(pkg.installation_instructions.as_deref(), Some("seeded full"));
        assert_eq!(pkg.lite_installation_instruction.as_deref(), Some("seeded lite"));
        assert_eq!(ctx.status, SdkAutoStatus::Failed);
    }

    #[tokio::test]
    async fn malformed_output_keeps_seeded_instructions() {
        let workspace = MockWorkspace::new();
        let runner = MockScriptRunner::new()
            .with_workspace(workspace.clone())
            .with_response(
                "eng/install.sh",
                MockResponse::exited(0).writes(INSTALL_INSTRUCTION_OUTPUT_FILE, "not json"),
            );
        let mut ctx = install_context();
        let mut pkg = seeded_package();

        run_stage(&runner, &workspace, &mut ctx, &mut pkg).await;

        assert_eq!(pkg.installation_instructions.as_deref(), Some("seeded full"));
        assert_eq!(ctx.vso_logs.get("Inst").expect("warning").warnings.len(), 1);
        assert_eq!(ctx.status, SdkAutoStatus::Succeeded);
    }

    #[tokio::test]
    async fn failed_run_skips_instructions() {
        let runner = MockScriptRunner::new();
        let mut ctx = install_context();
        ctx.status = SdkAutoStatus::Failed;
        let mut pkg = seeded_package();

        run_stage(&runner, &MockWorkspace::new(), &mut ctx, &mut pkg).await;

        assert!(runner.calls().is_empty());
        assert_eq!(pkg.installation_instructions.as_deref(), Some("seeded full"));
    }
}
