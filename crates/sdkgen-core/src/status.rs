//! Run and package status model.
//!
//! Statuses only ever get worse: [`merge`] keeps whichever side is more
//! severe, so a later `succeeded` cannot hide an earlier `failed`.
//! [`SdkAutoStatus::NotEnabled`] sits outside the severity scale and is only
//! reachable through an explicit assignment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::StatusParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SdkAutoStatus {
    #[default]
    Pending,
    InProgress,
    Succeeded,
    Warning,
    Failed,
    NotEnabled,
}

/// Severity scale for every status except [`SdkAutoStatus::NotEnabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Pending = -2,
    InProgress = -1,
    Succeeded = 0,
    Warning = 1,
    Failed = 2,
}

impl Severity {
    #[must_use]
    pub const fn rank(self) -> i8 {
        self as i8
    }

    #[must_use]
    pub const fn status(self) -> SdkAutoStatus {
        match self {
            Self::Pending => SdkAutoStatus::Pending,
            Self::InProgress => SdkAutoStatus::InProgress,
            Self::Succeeded => SdkAutoStatus::Succeeded,
            Self::Warning => SdkAutoStatus::Warning,
            Self::Failed => SdkAutoStatus::Failed,
        }
    }
}

impl SdkAutoStatus {
    /// Returns `None` for [`SdkAutoStatus::NotEnabled`].
    #[must_use]
    pub const fn severity(self) -> Option<Severity> {
        match self {
            Self::Pending => Some(Severity::Pending),
            Self::InProgress => Some(Severity::InProgress),
            Self::Succeeded => Some(Severity::Succeeded),
            Self::Warning => Some(Severity::Warning),
            Self::Failed => Some(Severity::Failed),
            Self::NotEnabled => None,
        }
    }

    /// A terminal status is one a package can be reported with.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::InProgress)
    }

    #[must_use]
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "inProgress",
            Self::Succeeded => "succeeded",
            Self::Warning => "warning",
            Self::Failed => "failed",
            Self::NotEnabled => "notEnabled",
        }
    }
}

impl fmt::Display for SdkAutoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SdkAutoStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "inProgress" => Ok(Self::InProgress),
            "succeeded" => Ok(Self::Succeeded),
            "warning" => Ok(Self::Warning),
            "failed" => Ok(Self::Failed),
            "notEnabled" => Ok(Self::NotEnabled),
            other => Err(StatusParseError::UnknownStatus(other.to_string())),
        }
    }
}

/// Combines `current` with `candidate`, keeping the more severe one.
///
/// Ties keep `current`. A `current` of `NotEnabled` is kept, and a
/// `NotEnabled` candidate is ignored.
#[must_use]
pub fn merge(current: SdkAutoStatus, candidate: SdkAutoStatus) -> SdkAutoStatus {
    match (current.severity(), candidate.severity()) {
        (Some(cur), Some(cand)) if cand > cur => candidate,
        _ => current,
    }
}

/// Anything that carries a status merged from the results of the scripts it runs.
pub trait StatusContainer {
    fn status(&self) -> SdkAutoStatus;

    /// Replaces the status outright. This is the only way into `NotEnabled`.
    fn set_status(&mut self, status: SdkAutoStatus);

    fn merge_status(&mut self, candidate: SdkAutoStatus) -> SdkAutoStatus {
        let merged = merge(self.status(), candidate);
        self.set_status(merged);
        merged
    }
}
