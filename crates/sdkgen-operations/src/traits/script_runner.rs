use async_trait::async_trait;
use sdkgen_script::{ScriptInvocation, ScriptOutcome};

#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Runs one script to completion.
    ///
    /// Failures to start, non-zero exits and timeouts are all reported
    /// through the outcome rather than as errors.
    async fn run(&self, invocation: &ScriptInvocation<'_>) -> ScriptOutcome;
}
