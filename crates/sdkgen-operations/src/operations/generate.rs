use sdkgen_config::contracts::{
    GENERATE_INPUT_FILE, GENERATE_OUTPUT_FILE, GenerateScriptInput, GenerateScriptOutput,
    GeneratedPackage, InstallInstructionScriptInput,
};
use sdkgen_config::TSPCONFIG_FILE_NAME;
use sdkgen_core::{FailureType, PackageData, SdkAutoStatus, StatusContainer};
use tracing::info;

use super::tmp_json::{describe, read_tmp_json, write_tmp_json};
use crate::Result;
use crate::context::{RUN_TASK, WorkflowContext};
use crate::error::{OperationError, OutputProblem};
use crate::script::{CustomScript, StatusTarget, run_custom_script};
use crate::traits::{ScriptRunner, WorkspaceIo};

/// Runs the generate script and queues every package it reports.
///
/// A failed script blames the code generator. Output that is missing or
/// breaks the contract fails the run without queueing anything.
///
/// # Errors
///
/// Returns an error if no generate script is configured, or if the script's
/// files cannot be written or read.
pub async fn run_generate_script<R, W>(runner: &R, workspace: &W, ctx: &mut WorkflowContext) -> Result<()>
where
    R: ScriptRunner + ?Sized,
    W: WorkspaceIo + ?Sized,
{
    let Some(script) = ctx
        .swagger_to_sdk_config
        .generate_options()
        .generate_script
        .clone()
    else {
        return Err(OperationError::MissingGenerateScript);
    };

    let input = generate_input(ctx);
    write_tmp_json(workspace, ctx, GENERATE_INPUT_FILE, "generate script input", &input)?;
    workspace.remove_file(&ctx.tmp_file(GENERATE_OUTPUT_FILE))?;

    let run = run_custom_script(
        runner,
        ctx,
        StatusTarget::Run,
        CustomScript::new(&script, "Generate")
            .with_tmp_files(&[GENERATE_INPUT_FILE, GENERATE_OUTPUT_FILE]),
    )
    .await;
    if run.outcome.is_none() {
        return Ok(());
    }
    if run.is_failed() {
        ctx.escalate_failure(FailureType::CodegenFailed);
    }

    let output = match read_tmp_json::<_, GenerateScriptOutput>(workspace, ctx, GENERATE_OUTPUT_FILE, "generate")? {
        Ok(output) => output,
        Err(err) => {
            fail_on_malformed_output(ctx, &err);
            return Ok(());
        }
    };
    if let Err(violation) = output.validate() {
        let err = OperationError::MalformedScriptOutput {
            script: "generate",
            path: ctx.tmp_file(GENERATE_OUTPUT_FILE),
            source: OutputProblem::Contract(violation),
        };
        fail_on_malformed_output(ctx, &err);
        return Ok(());
    }

    info!(count = output.packages.len(), "generate script reported packages");
    for generated in output.packages {
        let package = package_from_output(generated);
        if package.status.is_failed() {
            ctx.escalate_failure(FailureType::CodegenFailed);
        }
        info!(
            package = %package.name,
            result = %package.status,
            folders = ?package.folders().collect::<Vec<_>>(),
            "queued package"
        );
        ctx.pending_packages.push(package);
    }
    Ok(())
}

fn fail_on_malformed_output(ctx: &mut WorkflowContext, err: &OperationError) {
    ctx.report_error(RUN_TASK, describe(err));
    ctx.set_status(SdkAutoStatus::Failed);
    ctx.escalate_failure(FailureType::SpecGenSdkFailed);
}

fn generate_input(ctx: &WorkflowContext) -> GenerateScriptInput {
    let config = &ctx.config;
    let from_typespec = config.tsp_config_path.is_some()
        && ctx.spec_config_path.as_deref() == config.tsp_config_path.as_deref();
    let (related_readme_md_files, related_type_spec_project_folder) = match &ctx.spec_config_path {
        Some(path) if from_typespec => (None, Some(vec![typespec_project_folder(path)])),
        Some(path) => (Some(vec![path.clone()]), None),
        None => (None, None),
    };

    GenerateScriptInput {
        spec_folder: config.spec_repo.display().to_string(),
        head_sha: config.head_sha.clone().unwrap_or_default(),
        head_ref: config.head_ref.clone(),
        repo_https_url: config.spec_repo_https_url.clone().unwrap_or_default(),
        changed_files: config.changed_files.clone(),
        related_readme_md_files,
        related_type_spec_project_folder,
        install_instruction_input: InstallInstructionScriptInput::for_pull_request(
            String::new(),
            Vec::new(),
        ),
        run_mode: config.run_mode,
        sdk_release_type: config.sdk_release_type,
        api_version: config.api_version.clone(),
    }
}

fn typespec_project_folder(path: &str) -> String {
    path.strip_suffix(TSPCONFIG_FILE_NAME)
        .unwrap_or(path)
        .trim_end_matches('/')
        .to_string()
}

fn package_from_output(generated: GeneratedPackage) -> PackageData {
    let mut folders = generated
        .path
        .into_iter()
        .filter(|path| !path.trim().is_empty());
    let primary = folders.next().unwrap_or_default();

    let mut package = PackageData::new(generated.package_name, primary);
    package.extra_relative_folder_paths = folders.collect();
    package.service_name = generated.service_name;
    package.version = generated.version;
    package.language = generated.language;
    package.readme_md = generated.readme_md;
    package.typespec_project = generated.typespec_project;
    package.artifact_paths = generated.artifacts;
    package.api_view_artifact_path = generated.api_view_artifact;

    if let Some(changelog) = generated.changelog {
        package.changelogs = changelog
            .content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        package.has_breaking_change = changelog.has_breaking_change;
        package.breaking_change_items = changelog.breaking_change_items;
    }
    if let Some(instructions) = generated.installation_instructions {
        package.installation_instructions = Some(instructions.full);
        package.lite_installation_instruction = instructions.lite;
    }

    package.classify();
    package.merge_status(generated.result);
    package
}
