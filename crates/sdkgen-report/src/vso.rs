//! Azure DevOps logging commands and the VSO log file.

use std::path::Path;

use sdkgen_core::VsoLogs;

use crate::error::{ReportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Error,
    Warning,
}

#[must_use]
pub fn set_variable(name: &str, value: &str) -> String {
    format!("##vso[task.setVariable variable={name}]{value}")
}

#[must_use]
pub fn log_issue(kind: IssueKind, message: &str) -> String {
    let kind = match kind {
        IssueKind::Error => "error",
        IssueKind::Warning => "warning",
    };
    // A logging command must fit on one line.
    let message = message.replace('\r', "%0D").replace('\n', "%0A");
    format!("##vso[task.logissue type={kind}]{message}")
}

/// Attaches a markdown file to the pipeline run's summary tab.
#[must_use]
pub fn upload_summary(name: &str, path: &Path) -> String {
    format!(
        "##vso[task.addattachment type=Distributedtask.Core.Summary;name={name};]{}",
        path.display()
    )
}

/// # Errors
///
/// Returns an error if the logs cannot be serialized.
pub fn vso_log_json(logs: &VsoLogs) -> Result<String> {
    serde_json::to_string_pretty(logs).map_err(|source| ReportError::Serialize {
        what: "VSO log",
        source,
    })
}

/// One `logissue` command per recorded error and warning.
#[must_use]
pub fn issue_lines(logs: &VsoLogs) -> Vec<String> {
    logs.iter()
        .flat_map(|(task, entry)| {
            let errors = entry
                .errors
                .iter()
                .map(move |msg| log_issue(IssueKind::Error, &format!("[{task}] {msg}")));
            let warnings = entry
                .warnings
                .iter()
                .map(move |msg| log_issue(IssueKind::Warning, &format!("[{task}] {msg}")));
            errors.chain(warnings)
        })
        .collect()
}
