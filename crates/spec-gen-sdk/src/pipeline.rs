//! What the run prints for the Azure DevOps agent and for whoever launched it.

use std::fmt::Write;

use sdkgen_operations::operations::WorkflowOutcome;
use sdkgen_report::vso;

/// Logging commands for the agent: variables first, then one issue per
/// recorded error or warning, then the package summary attachment.
pub fn commands(outcome: &WorkflowOutcome) -> Vec<String> {
    let mut commands: Vec<String> = outcome
        .pipeline_variables
        .iter()
        .map(|(name, value)| vso::set_variable(name, value))
        .collect();
    commands.extend(vso::issue_lines(&outcome.vso_logs));
    if let Some(summary) = &outcome.reports.package_summary {
        commands.push(vso::upload_summary(&summary.name, &summary.path));
    }
    commands
}

pub fn summary_line(outcome: &WorkflowOutcome) -> String {
    let mut line = format!(
        "spec-gen-sdk finished with status [{}], {} package(s)",
        outcome.status,
        outcome.packages.len()
    );
    if let Some(failure_type) = outcome.failure_type {
        let _ = write!(line, " ({})", failure_type.as_str());
    }
    if let Some(report) = &outcome.reports.execution_report {
        let _ = write!(line, ", report: {}", report.display());
    }
    line
}
