//! JSON files handed to and read back from scripts through the temp folder.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Result;
use crate::context::WorkflowContext;
use crate::error::{OperationError, OutputProblem};
use crate::traits::WorkspaceIo;

/// Writes `value` as `name` in the temp folder.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized or the file written.
pub fn write_tmp_json<W, T>(
    workspace: &W,
    ctx: &WorkflowContext,
    name: &str,
    what: &'static str,
    value: &T,
) -> Result<()>
where
    W: WorkspaceIo + ?Sized,
    T: Serialize,
{
    let content = serde_json::to_string_pretty(value)
        .map_err(|source| OperationError::Serialize { what, source })?;
    workspace.write_file(&ctx.tmp_file(name), &content)
}

/// Reads a script's output file.
///
/// The outer error is an I/O failure; the inner one means the file was
/// missing or did not match the schema.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_tmp_json<W, T>(
    workspace: &W,
    ctx: &WorkflowContext,
    name: &str,
    script: &'static str,
) -> Result<std::result::Result<T, OperationError>>
where
    W: WorkspaceIo + ?Sized,
    T: DeserializeOwned,
{
    let path = ctx.tmp_file(name);
    let Some(content) = workspace.read_file(&path)? else {
        return Ok(Err(OperationError::MalformedScriptOutput {
            script,
            path,
            source: OutputProblem::Missing,
        }));
    };
    Ok(serde_json::from_str(&content).map_err(|e| OperationError::MalformedScriptOutput {
        script,
        path,
        source: OutputProblem::Json(e),
    }))
}

/// One line naming an error and each of its causes.
#[must_use]
pub fn describe(err: &OperationError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
