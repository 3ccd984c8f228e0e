//! Running configured scripts on behalf of the run or one package.

use sdkgen_core::{FailureType, PackageData, SdkAutoStatus, StatusContainer};
use sdkgen_script::{
    ExitCodePolicy, LineLevel, RunOptions, ScriptInvocation, ScriptOutcome, Termination,
};
use tracing::warn;

use crate::context::WorkflowContext;
use crate::traits::ScriptRunner;

/// Whose status a script's result is merged into, and whose comment
/// messages receive its flagged lines.
pub enum StatusTarget<'a> {
    Run,
    Package(&'a mut PackageData),
}

pub struct CustomScript<'a> {
    pub options: &'a RunOptions,
    /// Log prefix when the options do not set one.
    pub fallback_name: &'a str,
    pub args: Vec<String>,
    /// File names in the run's temp folder, appended to `args` as absolute paths.
    pub tmp_files: &'a [&'a str],
    pub continue_on_failed: bool,
}

impl<'a> CustomScript<'a> {
    #[must_use]
    pub fn new(options: &'a RunOptions, fallback_name: &'a str) -> Self {
        Self {
            options,
            fallback_name,
            args: Vec::new(),
            tmp_files: &[],
            continue_on_failed: false,
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    #[must_use]
    pub fn with_tmp_files(mut self, tmp_files: &'a [&'a str]) -> Self {
        self.tmp_files = tmp_files;
        self
    }

    #[must_use]
    pub fn continue_on_failed(mut self) -> Self {
        self.continue_on_failed = true;
        self
    }
}

#[derive(Debug)]
pub struct ScriptRun {
    pub status: SdkAutoStatus,
    /// `None` when the script was skipped.
    pub outcome: Option<ScriptOutcome>,
}

impl ScriptRun {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status.is_failed()
    }
}

/// Runs a configured script and folds its outcome into the run.
///
/// A target that has already failed skips the script unless
/// `continue_on_failed` is set. Error and warning lines go to the VSO log
/// under the script's prefix, flagged lines go to the target's comment
/// messages, and the result is merged into the target's status.
pub async fn run_custom_script<R>(
    runner: &R,
    ctx: &mut WorkflowContext,
    mut target: StatusTarget<'_>,
    script: CustomScript<'_>,
) -> ScriptRun
where
    R: ScriptRunner + ?Sized,
{
    let prefix = script.options.prefix_or(script.fallback_name).to_string();
    let current = match &target {
        StatusTarget::Run => ctx.status,
        StatusTarget::Package(pkg) => pkg.status,
    };
    if current.is_failed() && !script.continue_on_failed {
        warn!(
            script = %script.options.path,
            "skipping {prefix} script because the status is already failed"
        );
        return ScriptRun {
            status: SdkAutoStatus::Failed,
            outcome: None,
        };
    }

    let mut args = script.args;
    args.extend(
        script
            .tmp_files
            .iter()
            .map(|name| ctx.tmp_file(name).display().to_string()),
    );

    let outcome = {
        let invocation = ScriptInvocation {
            options: script.options,
            cwd: ctx.sdk_folder(),
            args: &args,
            envs: &ctx.script_envs,
            fallback_name: script.fallback_name,
            timeout: ctx.config.script_timeout,
        };
        runner.run(&invocation).await
    };

    for line in outcome.lines_at(LineLevel::Error) {
        ctx.vso_logs.add_error(&prefix, line);
    }
    for line in outcome.lines_at(LineLevel::Warning) {
        ctx.vso_logs.add_warning(&prefix, line);
    }
    if !outcome.termination.is_success() {
        record_termination(ctx, &prefix, script.options.exit_code.result, &outcome);
    }
    if outcome.fatal {
        ctx.escalate_failure(FailureType::CodegenFailed);
    }

    let mut comment_lines: Vec<String> = outcome.comment_lines().map(ToString::to_string).collect();
    if outcome.summary_in_comment {
        comment_lines.push(outcome.summary.clone());
    }

    let status = outcome.status;
    match &mut target {
        StatusTarget::Run => {
            ctx.messages.extend(comment_lines);
            ctx.merge_status(status);
        }
        StatusTarget::Package(pkg) => {
            pkg.messages.extend(comment_lines);
            pkg.merge_status(status);
        }
    }

    ScriptRun {
        status,
        outcome: Some(outcome),
    }
}

fn record_termination(
    ctx: &mut WorkflowContext,
    prefix: &str,
    policy: ExitCodePolicy,
    outcome: &ScriptOutcome,
) {
    match (&outcome.termination, policy) {
        (Termination::Exited(_) | Termination::Signaled, ExitCodePolicy::Ignore) => {}
        (Termination::Exited(_) | Termination::Signaled, ExitCodePolicy::Warning) => {
            ctx.vso_logs.add_warning(prefix, outcome.summary.clone());
        }
        _ => ctx.vso_logs.add_error(prefix, outcome.summary.clone()),
    }
}
