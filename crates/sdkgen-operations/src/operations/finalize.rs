//! Turns the run's final state into the files the pipeline and reviewers read.

use std::path::PathBuf;

use chrono::Utc;
use sdkgen_config::RunEnv;
use sdkgen_core::{FailureType, SdkAutoStatus, StatusContainer};
use sdkgen_report::{
    EXECUTION_REPORT_FILE, ExecutionReport, MessageRecord, PackageReport, generated_from_typespec,
    package_summary, render_comment, render_html, vso,
};
use tracing::info;

use super::tmp_json::describe;
use crate::Result;
use crate::context::{RUN_TASK, WorkflowContext};
use crate::error::OperationError;
use crate::traits::WorkspaceIo;

/// A markdown file to attach to the pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryAttachment {
    pub name: String,
    pub path: PathBuf,
}

/// Files finalization managed to write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFiles {
    pub execution_report: Option<PathBuf>,
    pub package_summary: Option<SummaryAttachment>,
    pub filtered_log: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub vso_log: Option<PathBuf>,
}

/// Fails the run if any package never left the pending queue.
///
/// Leftover packages are moved to the handled list so they still show up in
/// the reports.
pub fn detect_leftover_pending(ctx: &mut WorkflowContext) {
    if ctx.pending_packages.is_empty() {
        return;
    }
    ctx.set_status(SdkAutoStatus::Failed);
    ctx.escalate_failure(FailureType::SpecGenSdkFailed);
    ctx.report_error(
        RUN_TASK,
        "The following packages are still pending in code generation.",
    );
    let leftovers = std::mem::take(&mut ctx.pending_packages);
    for package in leftovers {
        ctx.report_error(RUN_TASK, format!("\t{}", package.name));
        ctx.handled_packages.push(package);
    }
}

/// Writes every report for the run.
///
/// A report that cannot be written is recorded as an error and the rest are
/// still attempted.
pub fn finalize<W: WorkspaceIo + ?Sized>(workspace: &W, ctx: &mut WorkflowContext) -> ReportFiles {
    let statuses: Vec<SdkAutoStatus> = ctx.handled_packages.iter().map(|p| p.status).collect();
    for status in statuses {
        ctx.merge_status(status);
    }
    if let Err(err) = workspace.create_dir_all(&ctx.log_paths.folder) {
        ctx.report_error(RUN_TASK, describe(&err));
    }

    let mut files = ReportFiles {
        package_summary: attempt(ctx, "package summary", |ctx| {
            write_package_summary(workspace, ctx)
        })
        .flatten(),
        execution_report: attempt(ctx, "execution report", |ctx| {
            write_execution_report(workspace, ctx)
        }),
        ..ReportFiles::default()
    };
    report_final_status(ctx);

    files.filtered_log = attempt(ctx, "filtered log", |ctx| write_filtered_log(workspace, ctx));
    if files.filtered_log.is_some() {
        files.html = attempt(ctx, "html log", |ctx| write_html(workspace, ctx));
    }
    files.vso_log = attempt(ctx, "vso log", |ctx| write_vso_log(workspace, ctx));
    files
}

fn attempt<T>(
    ctx: &mut WorkflowContext,
    what: &str,
    write: impl FnOnce(&mut WorkflowContext) -> Result<T>,
) -> Option<T> {
    match write(ctx) {
        Ok(value) => Some(value),
        Err(err) => {
            ctx.report_error(RUN_TASK, format!("failed to write {what}: {}", describe(&err)));
            None
        }
    }
}

fn spec_config_label(ctx: &WorkflowContext) -> String {
    ctx.spec_config_path
        .as_deref()
        .unwrap_or_default()
        .replace('/', "-")
}

fn write_package_summary<W: WorkspaceIo + ?Sized>(
    workspace: &W,
    ctx: &mut WorkflowContext,
) -> Result<Option<SummaryAttachment>> {
    if ctx.config.pull_number.is_none() || ctx.handled_packages.is_empty() {
        return Ok(None);
    }
    let path = ctx.log_paths.package_report.clone();
    info!(path = %path.display(), "writing package summary");
    workspace.remove_file(&path)?;
    workspace.write_file(&path, &package_summary(&ctx.handled_packages))?;
    Ok(Some(SummaryAttachment {
        name: format!("Generation Summary for {}", spec_config_label(ctx)),
        path,
    }))
}

fn write_execution_report<W: WorkspaceIo + ?Sized>(
    workspace: &W,
    ctx: &mut WorkflowContext,
) -> Result<PathBuf> {
    let label = ctx.swagger_to_sdk_config.breaking_changes_label();
    let packages: Vec<PackageReport> = ctx
        .handled_packages
        .iter()
        .map(|pkg| {
            let report = PackageReport::new(pkg, label);
            info!(
                package = %pkg.name,
                result = %pkg.status,
                language = pkg.language.as_deref().unwrap_or_default(),
                has_breaking_change = pkg.has_breaking_change,
                is_data_plane = pkg.is_data_plane,
                is_beta_mgmt_sdk = pkg.is_beta_mgmt_sdk,
                should_label = report.should_label_breaking_change,
                "package result"
            );
            report
        })
        .collect();
    let report = ExecutionReport {
        packages,
        execution_result: ctx.status,
        is_sdk_config_duplicated: ctx.is_sdk_config_duplicated,
        full_log_path: ctx.log_paths.full.clone(),
        filtered_log_path: ctx.log_paths.filtered.clone(),
        staged_artifacts_folder: ctx.staged_artifacts_folder.clone(),
        sdk_artifact_folder: ctx.sdk_artifact_folder.clone(),
        generate_from_type_spec: generated_from_typespec(
            &ctx.config.sdk_name,
            ctx.spec_config_path.as_deref(),
            &ctx.handled_packages,
        ),
        vso_log_path: (ctx.config.run_env == RunEnv::AzureDevOps)
            .then(|| ctx.log_paths.vso.clone()),
    };

    let path = ctx.tmp_file(EXECUTION_REPORT_FILE);
    workspace.remove_file(&path)?;
    workspace.write_file(&path, &report.to_json()?)?;
    Ok(path)
}

fn report_final_status(ctx: &mut WorkflowContext) {
    let label = spec_config_label(ctx);
    match ctx.status {
        SdkAutoStatus::Failed => ctx.report_error(
            RUN_TASK,
            format!("The generation process failed for {label}. Refer to the full log for details."),
        ),
        SdkAutoStatus::NotEnabled => ctx.report_warning(
            RUN_TASK,
            format!(
                "SDK configuration is not enabled for {label}. Refer to the full log for details."
            ),
        ),
        status => info!(%status, "main status"),
    }
}

fn write_filtered_log<W: WorkspaceIo + ?Sized>(
    workspace: &W,
    ctx: &mut WorkflowContext,
) -> Result<PathBuf> {
    let record = MessageRecord::new(ctx.status, render_comment(&ctx.comment_view())?, Utc::now());
    let path = ctx.log_paths.filtered.clone();
    info!(path = %path.display(), "writing filtered log");
    workspace.write_file(&path, &record.to_json()?)?;
    Ok(path)
}

fn write_html<W: WorkspaceIo + ?Sized>(workspace: &W, ctx: &mut WorkflowContext) -> Result<PathBuf> {
    let filtered = &ctx.log_paths.filtered;
    let Some(content) = workspace.read_file(filtered)? else {
        return Err(OperationError::Read {
            path: filtered.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "filtered log is missing"),
        });
    };
    let record = MessageRecord::from_json(&content)?;
    let path = ctx.log_paths.html.clone();
    info!(path = %path.display(), "writing html log");
    workspace.write_file(&path, &render_html(&record.message, &ctx.config.sdk_name)?)?;
    Ok(path)
}

fn write_vso_log<W: WorkspaceIo + ?Sized>(
    workspace: &W,
    ctx: &mut WorkflowContext,
) -> Result<PathBuf> {
    let path = ctx.log_paths.vso.clone();
    info!(path = %path.display(), "writing vso log");
    workspace.write_file(&path, &vso::vso_log_json(&ctx.vso_logs)?)?;
    Ok(path)
}
