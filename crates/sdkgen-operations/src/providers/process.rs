use async_trait::async_trait;
use sdkgen_script::{ScriptInvocation, ScriptOutcome, run_script};

use crate::traits::ScriptRunner;

/// Runs scripts as child processes of this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessScriptRunner;

impl ProcessScriptRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScriptRunner for ProcessScriptRunner {
    async fn run(&self, invocation: &ScriptInvocation<'_>) -> ScriptOutcome {
        run_script(invocation).await
    }
}
