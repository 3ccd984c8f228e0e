mod script_runner;
mod workspace;

pub use script_runner::ScriptRunner;
pub use workspace::WorkspaceIo;
