mod context;
mod error;
pub mod operations;
pub mod providers;
pub mod script;
pub mod traits;

#[cfg(test)]
pub mod mocks;

pub use context::{DEFAULT_SCRIPT_ENVS, RUN_TASK, WorkflowContext, default_script_envs};
pub use error::{OperationError, OutputProblem, Result};
