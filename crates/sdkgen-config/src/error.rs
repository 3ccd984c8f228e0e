use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no swagger_to_sdk_config.json found in SDK repository '{sdk_repo}'")]
    SwaggerToSdkConfigNotFound { sdk_repo: PathBuf },

    #[error("failed to read '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in '{path}'")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse YAML in '{path}'")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("failed to parse the $(swagger-to-sdk) block in '{path}'")]
    ReadmeBlock {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("invalid regular expression '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A script's output file parsed but broke the contract it must follow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("package entry {index} has an empty packageName")]
    EmptyPackageName { index: usize },

    #[error("package '{package}' lists no path")]
    MissingPath { package: String },

    #[error("package '{package}' is listed more than once")]
    DuplicatePackage { package: String },
}
