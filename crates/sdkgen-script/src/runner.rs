use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use indexmap::IndexMap;
use sdkgen_core::{SdkAutoStatus, merge};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::ScriptError;
use crate::ansi::strip_ansi;
use crate::classify::{LineLevel, LineVerdict};
use crate::options::{ExitCodePolicy, RunOptions};

/// Full SDK builds routinely take tens of minutes.
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: StreamKind,
    pub text: String,
    pub verdict: LineVerdict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    Exited(i32),
    Signaled,
    TimedOut(Duration),
    /// The process never started; reported as exit code `-1`.
    SpawnFailed(String),
}

impl Termination {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }

    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exited(code) => Some(*code),
            Self::SpawnFailed(_) => Some(-1),
            Self::Signaled | Self::TimedOut(_) => None,
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "code [{code}]"),
            Self::Signaled => f.write_str("terminated by signal"),
            Self::TimedOut(limit) => write!(f, "timed out after {}s", limit.as_secs()),
            Self::SpawnFailed(reason) => write!(f, "code [-1] failed to start: {reason}"),
        }
    }
}

pub struct ScriptInvocation<'a> {
    pub options: &'a RunOptions,
    pub cwd: &'a Path,
    pub args: &'a [String],
    /// Environment the script starts from. The process environment is not inherited.
    pub envs: &'a IndexMap<String, String>,
    /// Log prefix used when the options do not name one.
    pub fallback_name: &'a str,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ScriptOutcome {
    pub status: SdkAutoStatus,
    pub termination: Termination,
    pub lines: Vec<OutputLine>,
    /// One line describing how the script ended.
    pub summary: String,
    pub summary_in_comment: bool,
    /// Set when the exit code policy blames the code generator.
    pub fatal: bool,
}

impl ScriptOutcome {
    pub fn stream_lines(&self, stream: StreamKind) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(move |line| line.stream == stream)
            .map(|line| line.text.as_str())
    }

    /// Both streams in arrival order.
    pub fn all_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }

    pub fn comment_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|line| line.verdict.show_in_comment)
            .map(|line| line.text.as_str())
    }

    pub fn lines_at(&self, level: LineLevel) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(move |line| line.verdict.level == level)
            .map(|line| line.text.as_str())
    }
}

/// Runs a script to completion, classifying its output as it streams.
///
/// Never fails: a script that cannot be started, exits non-zero or runs past
/// its timeout is reported through [`ScriptOutcome::status`].
pub async fn run_script(invocation: &ScriptInvocation<'_>) -> ScriptOutcome {
    let prefix = invocation.options.prefix_or(invocation.fallback_name);
    let mut collector = Collector::new(invocation.options, prefix);

    let mut child = match build_command(invocation).and_then(|mut command| {
        command.spawn().map_err(|source| SpawnError::Io { source })
    }) {
        Ok(child) => child,
        Err(err) => {
            error!(script = prefix, error = %err, "failed to start script");
            return collector.finish(Termination::SpawnFailed(err.to_string()), invocation);
        }
    };
    let pid = child.id();
    debug!(script = prefix, pid, path = %invocation.options.path, "script started");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(forward_lines(stdout, StreamKind::Stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(forward_lines(stderr, StreamKind::Stderr, tx.clone()));
    }
    drop(tx);

    let waited = tokio::time::timeout(invocation.timeout, async {
        while let Some((stream, line)) = rx.recv().await {
            collector.push(stream, &line);
        }
        child.wait().await
    })
    .await;

    let termination = match waited {
        Ok(Ok(status)) => termination_of(status),
        Ok(Err(err)) => {
            error!(script = prefix, error = %err, "failed to wait for script");
            Termination::SpawnFailed(err.to_string())
        }
        Err(_) => {
            warn!(
                script = prefix,
                timeout_secs = invocation.timeout.as_secs(),
                "script timed out, killing its process group"
            );
            for reader in &readers {
                reader.abort();
            }
            kill_process_tree(&mut child, pid).await;
            Termination::TimedOut(invocation.timeout)
        }
    };

    collector.finish(termination, invocation)
}

#[derive(Debug, thiserror::Error)]
enum SpawnError {
    #[error(transparent)]
    Config(#[from] ScriptError),

    #[error("{source}")]
    Io { source: std::io::Error },
}

fn build_command(invocation: &ScriptInvocation<'_>) -> Result<Command, SpawnError> {
    let mut parts = invocation.options.path.split_whitespace();
    let program = parts.next().ok_or(ScriptError::EmptyPath)?;
    let program = if program.contains('/') && Path::new(program).is_relative() {
        invocation.cwd.join(program)
    } else {
        PathBuf::from(program)
    };

    let mut command = std::process::Command::new(program);
    command
        .args(parts)
        .args(invocation.args)
        .current_dir(invocation.cwd)
        .env_clear()
        .envs(invocation.envs)
        .env("PWD", invocation.cwd);
    for name in &invocation.options.envs {
        if let Some(value) = std::env::var_os(name) {
            command.env(name, value);
        }
    }
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let mut command = Command::from(command);
    command.kill_on_drop(true);
    Ok(command)
}

fn forward_lines<R>(
    reader: R,
    stream: StreamKind,
    tx: mpsc::UnboundedSender<(StreamKind, String)>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    if tx.send((stream, line)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    debug!(%stream, error = %err, "stopped reading script output");
                    break;
                }
            }
        }
    })
}

fn termination_of(status: ExitStatus) -> Termination {
    status
        .code()
        .map_or(Termination::Signaled, Termination::Exited)
}

async fn kill_process_tree(child: &mut Child, pid: Option<u32>) {
    kill_process_group(pid);
    if let Err(err) = child.start_kill() {
        debug!(error = %err, "script already exited");
    }
    if let Err(err) = child.wait().await {
        debug!(error = %err, "failed to reap killed script");
    }
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(pgid) = pid.and_then(|pid| i32::try_from(pid).ok()) else {
        return;
    };
    if let Err(err) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        debug!(pgid, error = %err, "failed to kill script process group");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

struct Collector<'a> {
    options: &'a RunOptions,
    prefix: &'a str,
    status: SdkAutoStatus,
    lines: Vec<OutputLine>,
}

impl<'a> Collector<'a> {
    fn new(options: &'a RunOptions, prefix: &'a str) -> Self {
        Self {
            options,
            prefix,
            status: SdkAutoStatus::Succeeded,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, stream: StreamKind, raw: &str) {
        let text = strip_ansi(raw).into_owned();
        let stream_options = match stream {
            StreamKind::Stdout => &self.options.stdout,
            StreamKind::Stderr => &self.options.stderr,
        };
        let verdict = stream_options.classify(&text);
        match verdict.level {
            LineLevel::Error => error!(script = self.prefix, %stream, "{text}"),
            LineLevel::Warning => warn!(script = self.prefix, %stream, "{text}"),
            LineLevel::Normal => info!(script = self.prefix, %stream, "{text}"),
        }
        self.status = merge(self.status, verdict.level.status());
        self.lines.push(OutputLine {
            stream,
            text,
            verdict,
        });
    }

    fn finish(self, termination: Termination, invocation: &ScriptInvocation<'_>) -> ScriptOutcome {
        let exit_code = self.options.exit_code;
        let mut status = self.status;
        let mut fatal = false;

        if !termination.is_success() {
            match exit_code.result {
                ExitCodePolicy::Ignore => {}
                ExitCodePolicy::Warning => status = merge(status, SdkAutoStatus::Warning),
                ExitCodePolicy::Error => status = merge(status, SdkAutoStatus::Failed),
                ExitCodePolicy::Fatal => {
                    status = merge(status, SdkAutoStatus::Failed);
                    fatal = true;
                }
            }
            if matches!(
                termination,
                Termination::TimedOut(_) | Termination::SpawnFailed(_)
            ) {
                status = merge(status, SdkAutoStatus::Failed);
            }
        }

        let summary = format!(
            "Script return with result [{status}] {termination} cwd [{}]: {}",
            invocation.cwd.display(),
            self.options.path
        );
        match status {
            SdkAutoStatus::Failed => error!(script = self.prefix, "{summary}"),
            SdkAutoStatus::Warning => warn!(script = self.prefix, "{summary}"),
            _ => info!(script = self.prefix, "{summary}"),
        }

        ScriptOutcome {
            status,
            summary_in_comment: exit_code.show_in_comment && !termination.is_success(),
            termination,
            lines: self.lines,
            summary,
            fatal,
        }
    }
}
