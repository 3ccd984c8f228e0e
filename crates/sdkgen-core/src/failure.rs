use std::fmt;

use serde::{Deserialize, Serialize};

/// Who is to blame for a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureType {
    /// A generation or build script failed. Never overwritten once set.
    #[serde(rename = "Code Generator Failed")]
    CodegenFailed,
    /// The orchestrator lost track of packages the generator reported.
    #[serde(rename = "Spec-Gen-Sdk Failed")]
    SpecGenSdkFailed,
    #[serde(rename = "Pipeline Framework Failed")]
    PipelineFrameworkFailed,
}

impl FailureType {
    /// Computes the failure type after `candidate` is reported.
    #[must_use]
    pub fn escalate(current: Option<Self>, candidate: Self) -> Option<Self> {
        match current {
            Some(Self::CodegenFailed) => current,
            _ => Some(candidate),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CodegenFailed => "Code Generator Failed",
            Self::SpecGenSdkFailed => "Spec-Gen-Sdk Failed",
            Self::PipelineFrameworkFailed => "Pipeline Framework Failed",
        }
    }
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
