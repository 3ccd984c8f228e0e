use chrono::{DateTime, Utc};
use sdkgen_core::SdkAutoStatus;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageLevel {
    Error,
    Warning,
    Info,
}

impl MessageLevel {
    /// Unfinished runs report as errors since they never reached a result.
    #[must_use]
    pub fn for_status(status: SdkAutoStatus) -> Self {
        match status {
            SdkAutoStatus::Pending | SdkAutoStatus::InProgress | SdkAutoStatus::Failed => {
                Self::Error
            }
            SdkAutoStatus::Warning | SdkAutoStatus::NotEnabled => Self::Warning,
            SdkAutoStatus::Succeeded => Self::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MessageType {
    #[default]
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageMode {
    #[default]
    Replace,
}

/// The filtered log: a single record whose message is the rendered comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub mode: MessageMode,
    pub level: MessageLevel,
    pub message: String,
    pub time: DateTime<Utc>,
}

impl MessageRecord {
    #[must_use]
    pub fn new(status: SdkAutoStatus, message: String, time: DateTime<Utc>) -> Self {
        Self {
            kind: MessageType::Markdown,
            mode: MessageMode::Replace,
            level: MessageLevel::for_status(status),
            message,
            time,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|source| ReportError::Serialize {
            what: "filtered log",
            source,
        })
    }

    /// # Errors
    ///
    /// Returns an error if `content` is not a message record.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(ReportError::MessageRecord)
    }
}
