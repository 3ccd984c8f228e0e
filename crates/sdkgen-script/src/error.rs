use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("invalid line filter pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("script path is empty")]
    EmptyPath,
}

pub type Result<T> = std::result::Result<T, ScriptError>;
