mod error;
mod logging;
mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use sdkgen_config::{LogPaths, RunConfig, RunEnv, RunMode, SdkReleaseType};
use sdkgen_operations::operations::{WorkflowOperation, WorkflowOutcome, prepare_context};
use sdkgen_operations::providers::{FileSystemWorkspace, ProcessScriptRunner};

use crate::error::{CliError, Result};

#[derive(Parser)]
#[command(name = "spec-gen-sdk")]
#[command(version)]
#[command(about = "Generate SDK packages for a specification change", long_about = None)]
struct Cli {
    /// Local clone of the specification repository
    #[arg(long)]
    spec_repo: PathBuf,

    /// Local clone of the SDK repository
    #[arg(long)]
    sdk_repo: PathBuf,

    /// SDK repository name, e.g. azure-sdk-for-python
    #[arg(long)]
    sdk_name: String,

    /// Folder for temp files, logs and staged artifacts
    #[arg(long)]
    working_folder: PathBuf,

    /// tspconfig.yaml (or its project folder) relative to the spec repository
    #[arg(long)]
    tsp_config_path: Option<String>,

    /// readme.md relative to the spec repository
    #[arg(long)]
    readme_path: Option<String>,

    #[arg(long)]
    head_sha: Option<String>,

    #[arg(long)]
    head_ref: Option<String>,

    /// Pull request number; enables the package summary attachment
    #[arg(long = "pr-number")]
    pull_number: Option<u64>,

    #[arg(long)]
    api_version: Option<String>,

    #[arg(long, value_enum, default_value_t = SdkReleaseType::Beta)]
    sdk_release_type: SdkReleaseType,

    #[arg(long, value_enum, default_value_t = RunMode::Local)]
    run_mode: RunMode,

    #[arg(long, value_enum, default_value_t = RunEnv::Local)]
    run_env: RunEnv,

    /// HTTPS URL of the specification repository
    #[arg(long = "spec-repo-url")]
    spec_repo_https_url: Option<String>,

    /// A file changed by the specification change; repeatable
    #[arg(long = "changed-file")]
    changed_files: Vec<String>,

    /// Kill scripts that run longer than this
    #[arg(long)]
    script_timeout_secs: Option<u64>,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::new(
            self.spec_repo,
            self.sdk_repo,
            self.sdk_name,
            self.working_folder,
        );
        config.tsp_config_path = self.tsp_config_path;
        config.readme_path = self.readme_path;
        config.head_sha = self.head_sha;
        config.head_ref = self.head_ref;
        config.pull_number = self.pull_number;
        config.api_version = self.api_version;
        config.sdk_release_type = self.sdk_release_type;
        config.run_mode = self.run_mode;
        config.run_env = self.run_env;
        config.spec_repo_https_url = self.spec_repo_https_url;
        config.changed_files = self.changed_files;
        if let Some(secs) = self.script_timeout_secs {
            config.script_timeout = Duration::from_secs(secs);
        }
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.into_config()).await {
        Ok(outcome) if outcome.is_failed() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: RunConfig) -> Result<WorkflowOutcome> {
    let stamp = Utc::now().timestamp_millis().to_string();
    let log_paths = LogPaths::new(&config.working_folder, config.spec_config_path(), &stamp);
    let _log_guard = logging::init(&log_paths)?;
    tracing::info!(
        sdk = %config.sdk_name,
        spec_config = ?config.spec_config_path(),
        full_log = %log_paths.full.display(),
        "starting SDK generation"
    );

    let run_env = config.run_env;
    let ctx = prepare_context(config, log_paths)?;
    let outcome = WorkflowOperation::new(ProcessScriptRunner::new(), FileSystemWorkspace::new())
        .execute(ctx)
        .await?;

    if run_env == RunEnv::AzureDevOps {
        for command in pipeline::commands(&outcome) {
            println!("{command}");
        }
    }
    println!("{}", pipeline::summary_line(&outcome));
    Ok(outcome)
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
