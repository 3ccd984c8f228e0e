mod process;
mod workspace;

pub use process::ProcessScriptRunner;
pub use workspace::FileSystemWorkspace;
