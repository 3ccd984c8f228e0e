use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use indexmap::IndexMap;
use sdkgen_config::{LogPaths, Pattern, RunConfig, SpecRepoConfig, SwaggerToSdkConfig};
use sdkgen_core::{SdkAutoStatus, merge};
use sdkgen_script::{
    ExitCodePolicy, OutputLine, ScriptInvocation, ScriptOutcome, StreamKind, Termination,
};

use crate::Result;
use crate::context::WorkflowContext;
use crate::error::OperationError;
use crate::traits::{ScriptRunner, WorkspaceIo};

/// A Python run against `/spec` and `/sdk`, working in `/work`.
#[must_use]
pub fn test_context() -> WorkflowContext {
    let config = RunConfig::new("/spec", "/sdk", "azure-sdk-for-python", "/work");
    WorkflowContext::new(
        config,
        SwaggerToSdkConfig::default(),
        SpecRepoConfig::default(),
        LogPaths::new(Path::new("/work"), None, "test"),
    )
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    termination: Termination,
    lines: Vec<(StreamKind, String)>,
    fatal: bool,
    outputs: Vec<(String, String)>,
}

impl MockResponse {
    #[must_use]
    pub fn exited(code: i32) -> Self {
        Self {
            termination: Termination::Exited(code),
            lines: Vec::new(),
            fatal: false,
            outputs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    #[must_use]
    pub fn with_stdout(mut self, line: &str) -> Self {
        self.lines.push((StreamKind::Stdout, line.to_string()));
        self
    }

    #[must_use]
    pub fn with_stderr(mut self, line: &str) -> Self {
        self.lines.push((StreamKind::Stderr, line.to_string()));
        self
    }

    /// Behaves as if the exit code policy were `fatal`.
    #[must_use]
    pub fn fatal(mut self) -> Self {
        self.fatal = true;
        self
    }

    /// Writes `content` to the argument ending in `file_name`.
    #[must_use]
    pub fn writes(mut self, file_name: &str, content: &str) -> Self {
        self.outputs
            .push((file_name.to_string(), content.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub path: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub envs: IndexMap<String, String>,
}

/// Answers scripts by path. Unknown scripts exit `0` silently.
pub struct MockScriptRunner {
    responses: Vec<(String, Option<String>, MockResponse)>,
    workspace: Option<MockWorkspace>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockScriptRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            workspace: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_response(mut self, path: &str, response: MockResponse) -> Self {
        self.responses.push((path.to_string(), None, response));
        self
    }

    /// Like [`Self::with_response`], but only for calls with `arg` among the arguments.
    #[must_use]
    pub fn with_response_for_arg(mut self, path: &str, arg: &str, response: MockResponse) -> Self {
        self.responses
            .push((path.to_string(), Some(arg.to_string()), response));
        self
    }

    /// Output files are written into this workspace.
    #[must_use]
    pub fn with_workspace(mut self, workspace: MockWorkspace) -> Self {
        self.workspace = Some(workspace);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.path == path)
            .collect()
    }

    fn response_for(&self, path: &str, args: &[String]) -> MockResponse {
        self.responses
            .iter()
            .find(|(p, arg, _)| p == path && arg.as_ref().is_none_or(|a| args.contains(a)))
            .map_or_else(|| MockResponse::exited(0), |(_, _, response)| response.clone())
    }
}

impl Default for MockScriptRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScriptRunner for MockScriptRunner {
    async fn run(&self, invocation: &ScriptInvocation<'_>) -> ScriptOutcome {
        let options = invocation.options;
        self.calls.lock().expect("lock poisoned").push(RecordedCall {
            path: options.path.clone(),
            args: invocation.args.to_vec(),
            cwd: invocation.cwd.to_path_buf(),
            envs: invocation.envs.clone(),
        });
        let response = self.response_for(&options.path, invocation.args);

        if let Some(workspace) = &self.workspace {
            for (file_name, content) in &response.outputs {
                if let Some(target) = invocation.args.iter().find(|a| a.ends_with(file_name.as_str())) {
                    workspace
                        .write_file(Path::new(target), content)
                        .expect("mock output write");
                }
            }
        }

        let mut status = SdkAutoStatus::Succeeded;
        let lines: Vec<OutputLine> = response
            .lines
            .into_iter()
            .map(|(stream, text)| {
                let stream_options = match stream {
                    StreamKind::Stdout => &options.stdout,
                    StreamKind::Stderr => &options.stderr,
                };
                let verdict = stream_options.classify(&text);
                status = merge(status, verdict.level.status());
                OutputLine {
                    stream,
                    text,
                    verdict,
                }
            })
            .collect();

        let termination = response.termination;
        let mut fatal = response.fatal;
        if !termination.is_success() {
            match options.exit_code.result {
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
        if fatal {
            status = merge(status, SdkAutoStatus::Failed);
        }

        let summary = format!(
            "Script return with result [{status}] {termination} cwd [{}]: {}",
            invocation.cwd.display(),
            options.path
        );
        ScriptOutcome {
            status,
            summary_in_comment: options.exit_code.show_in_comment && !termination.is_success(),
            termination,
            lines,
            summary,
            fatal,
        }
    }
}

/// In-memory files. Clones share state, so a test can keep a handle while
/// the operation owns another.
#[derive(Clone, Default)]
pub struct MockWorkspace {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    dirs: Arc<Mutex<BTreeSet<PathBuf>>>,
    copies: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
    fail_copies: bool,
    failing_writes: Arc<Mutex<BTreeSet<PathBuf>>>,
}

impl MockWorkspace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files
            .lock()
            .expect("lock poisoned")
            .insert(path.into(), content.to_string());
        self
    }

    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.dirs.lock().expect("lock poisoned").insert(path.into());
        self
    }

    #[must_use]
    pub fn with_failing_copies(mut self) -> Self {
        self.fail_copies = true;
        self
    }

    #[must_use]
    pub fn with_failing_write(self, path: impl Into<PathBuf>) -> Self {
        self.failing_writes
            .lock()
            .expect("lock poisoned")
            .insert(path.into());
        self
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .expect("lock poisoned")
            .get(path.as_ref())
            .cloned()
    }

    pub fn copies(&self) -> Vec<(PathBuf, PathBuf)> {
        self.copies.lock().expect("lock poisoned").clone()
    }

    pub fn created_dirs(&self) -> Vec<PathBuf> {
        self.dirs.lock().expect("lock poisoned").iter().cloned().collect()
    }
}

impl WorkspaceIo for MockWorkspace {
    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.file(path))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if self
            .failing_writes
            .lock()
            .expect("lock poisoned")
            .contains(path)
        {
            return Err(OperationError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.files
            .lock()
            .expect("lock poisoned")
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.files.lock().expect("lock poisoned").remove(path);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.dirs
            .lock()
            .expect("lock poisoned")
            .insert(path.to_path_buf());
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        let content = if self.fail_copies {
            None
        } else {
            self.file(from)
        };
        let Some(content) = content else {
            return Err(OperationError::Copy {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        };
        self.copies
            .lock()
            .expect("lock poisoned")
            .push((from.to_path_buf(), to.to_path_buf()));
        self.files
            .lock()
            .expect("lock poisoned")
            .insert(to.to_path_buf(), content);
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.lock().expect("lock poisoned").contains(path)
            || self
                .files
                .lock()
                .expect("lock poisoned")
                .keys()
                .any(|file| file.starts_with(path) && file != path)
    }

    fn find_files(&self, roots: &[PathBuf], pattern: &Pattern) -> Result<Vec<PathBuf>> {
        let files = self.files.lock().expect("lock poisoned");
        let mut found = Vec::new();
        for root in roots {
            for path in files.keys() {
                let matches = path.starts_with(root)
                    && path
                        .file_name()
                        .is_some_and(|name| pattern.is_match(&name.to_string_lossy()));
                if matches {
                    found.push(path.clone());
                }
            }
        }
        Ok(found)
    }
}
