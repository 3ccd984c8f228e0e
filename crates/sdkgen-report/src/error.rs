use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize {what}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to render the {template} template")]
    Render {
        template: &'static str,
        #[source]
        source: minijinja::Error,
    },

    #[error("filtered log is not a valid message record")]
    MessageRecord(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
