mod finalize;
mod generate;
mod init;
pub mod package;
mod tmp_json;
mod validate;
mod workflow;

pub use finalize::{ReportFiles, SummaryAttachment, detect_leftover_pending, finalize};
pub use generate::run_generate_script;
pub use init::run_init_script;
pub use package::{PackageStage, PackageWorkflow, StageProviders, process_packages};
pub use tmp_json::{describe, read_tmp_json, write_tmp_json};
pub use validate::validate_sdk_config;
pub use workflow::{WorkflowOperation, WorkflowOutcome, prepare_context};
