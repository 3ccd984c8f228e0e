use sdkgen_config::contracts::{INIT_INPUT_FILE, INIT_OUTPUT_FILE, InitScriptInput, InitScriptOutput};
use sdkgen_core::{FailureType, SdkAutoStatus, StatusContainer};
use tracing::{info, warn};

use super::tmp_json::{describe, read_tmp_json, write_tmp_json};
use crate::Result;
use crate::context::{RUN_TASK, WorkflowContext};
use crate::error::OperationError;
use crate::script::{CustomScript, StatusTarget, run_custom_script};
use crate::traits::{ScriptRunner, WorkspaceIo};

/// Runs the SDK repository's init script and adopts the variables it reports.
///
/// # Errors
///
/// Returns an error if `initOptions` is declared without an `initScript`, or
/// if the script's files cannot be written or read.
pub async fn run_init_script<R, W>(runner: &R, workspace: &W, ctx: &mut WorkflowContext) -> Result<()>
where
    R: ScriptRunner + ?Sized,
    W: WorkspaceIo + ?Sized,
{
    let Some(init_options) = ctx.swagger_to_sdk_config.init_options() else {
        info!("initOptions is not configured, skipping init");
        return Ok(());
    };
    let Some(script) = init_options.init_script.clone() else {
        return Err(OperationError::MissingInitScript);
    };

    write_tmp_json(workspace, ctx, INIT_INPUT_FILE, "init script input", &InitScriptInput::default())?;
    workspace.remove_file(&ctx.tmp_file(INIT_OUTPUT_FILE))?;

    let run = run_custom_script(
        runner,
        ctx,
        StatusTarget::Run,
        CustomScript::new(&script, "Init").with_tmp_files(&[INIT_INPUT_FILE, INIT_OUTPUT_FILE]),
    )
    .await;
    if run.is_failed() {
        ctx.escalate_failure(FailureType::CodegenFailed);
        return Ok(());
    }

    match read_tmp_json::<_, InitScriptOutput>(workspace, ctx, INIT_OUTPUT_FILE, "init")? {
        Ok(output) => {
            for (name, value) in output.envs {
                info!(name = %name, "init script set environment variable");
                ctx.script_envs.insert(name, value);
            }
        }
        Err(OperationError::MalformedScriptOutput {
            source: crate::error::OutputProblem::Missing,
            ..
        }) => warn!("init script wrote no output, keeping the environment as is"),
        Err(err) => {
            ctx.report_error(RUN_TASK, describe(&err));
            ctx.set_status(SdkAutoStatus::Failed);
            ctx.escalate_failure(FailureType::SpecGenSdkFailed);
        }
    }
    Ok(())
}
