mod ansi;
mod classify;
mod error;
mod options;
mod runner;

pub use ansi::strip_ansi;
pub use classify::{LineLevel, LineVerdict};
pub use error::{Result, ScriptError};
pub use options::{ExitCodeOptions, ExitCodePolicy, LineFilter, RunOptions, StreamOptions};
pub use runner::{
    DEFAULT_SCRIPT_TIMEOUT, OutputLine, ScriptInvocation, ScriptOutcome, StreamKind, Termination,
    run_script,
};
