use regex::Regex;
use serde::Deserialize;

use crate::ScriptError;

/// Matches a line of script output.
///
/// Configured in JSON as `true`/`false` or as a regular expression string.
/// An absent filter never matches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "RawFilter")]
pub enum LineFilter {
    #[default]
    Never,
    Always,
    Pattern(Regex),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFilter {
    Flag(bool),
    Pattern(String),
}

impl TryFrom<RawFilter> for LineFilter {
    type Error = ScriptError;

    fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
        match raw {
            RawFilter::Flag(true) => Ok(Self::Always),
            RawFilter::Flag(false) => Ok(Self::Never),
            RawFilter::Pattern(pattern) => Self::pattern(&pattern),
        }
    }
}

impl LineFilter {
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regular expression.
    pub fn pattern(pattern: &str) -> crate::Result<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| ScriptError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::Pattern(regex) => regex.is_match(line),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamOptions {
    #[serde(default)]
    pub show_in_comment: LineFilter,
    #[serde(default)]
    pub script_error: LineFilter,
    #[serde(default)]
    pub script_warning: LineFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitCodePolicy {
    Ignore,
    Warning,
    #[default]
    Error,
    /// Like `Error`, and blames the code generator for the run's failure.
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitCodeOptions {
    #[serde(default = "default_true")]
    pub show_in_comment: bool,
    #[serde(default)]
    pub result: ExitCodePolicy,
}

impl Default for ExitCodeOptions {
    fn default() -> Self {
        Self {
            show_in_comment: true,
            result: ExitCodePolicy::Error,
        }
    }
}

const fn default_true() -> bool {
    true
}

/// How to run one configured script and how to read its output.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    pub path: String,
    /// Names of process environment variables passed through to the script.
    #[serde(default)]
    pub envs: Vec<String>,
    #[serde(default)]
    pub log_prefix: Option<String>,
    #[serde(default)]
    pub stdout: StreamOptions,
    #[serde(default)]
    pub stderr: StreamOptions,
    #[serde(default)]
    pub exit_code: ExitCodeOptions,
}

impl RunOptions {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// The prefix to log script output with, falling back to `fallback`.
    #[must_use]
    pub fn prefix_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.log_prefix.as_deref().unwrap_or(fallback)
    }
}
