use sdkgen_core::SdkAutoStatus;

use crate::options::StreamOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineLevel {
    #[default]
    Normal,
    Warning,
    Error,
}

impl LineLevel {
    #[must_use]
    pub const fn status(self) -> SdkAutoStatus {
        match self {
            Self::Normal => SdkAutoStatus::Succeeded,
            Self::Warning => SdkAutoStatus::Warning,
            Self::Error => SdkAutoStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineVerdict {
    pub level: LineLevel,
    pub show_in_comment: bool,
}

impl StreamOptions {
    /// Classifies one line. Error filters win over warning filters and any
    /// escalated line is shown in the comment.
    #[must_use]
    pub fn classify(&self, line: &str) -> LineVerdict {
        let level = if self.script_error.matches(line) {
            LineLevel::Error
        } else if self.script_warning.matches(line) {
            LineLevel::Warning
        } else {
            LineLevel::Normal
        };
        LineVerdict {
            level,
            show_in_comment: level != LineLevel::Normal || self.show_in_comment.matches(line),
        }
    }
}
