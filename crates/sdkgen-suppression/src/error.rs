use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuppressionError {
    #[error("failed to parse suppression YAML: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("suppression file exceeds maximum size of {max_bytes} bytes")]
    InputTooLarge { max_bytes: usize },

    #[error("failed to read suppression file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid suppression file '{path}'")]
    Invalid {
        path: PathBuf,
        #[source]
        source: Box<SuppressionError>,
    },
}
