use std::path::PathBuf;

use sdkgen_config::ContractError;
use thiserror::Error;

/// What was wrong with a file a script was expected to write.
#[derive(Debug, Error)]
pub enum OutputProblem {
    #[error("the script did not write its output file")]
    Missing,

    #[error("output is not valid JSON for the expected schema")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Contract(#[from] ContractError),
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Config(#[from] sdkgen_config::ConfigError),

    #[error(transparent)]
    Suppression(#[from] sdkgen_suppression::SuppressionError),

    #[error(transparent)]
    Report(#[from] sdkgen_report::ReportError),

    #[error("'tspConfigPath' and 'readmePath' are not provided")]
    MissingSpecConfig,

    #[error("initOptions is declared in swagger_to_sdk_config.json but has no initScript")]
    MissingInitScript,

    #[error("generateOptions.generateScript is not configured in swagger_to_sdk_config.json")]
    MissingGenerateScript,

    #[error("malformed output from the {script} script in '{path}'")]
    MalformedScriptOutput {
        script: &'static str,
        path: PathBuf,
        #[source]
        source: OutputProblem,
    },

    #[error("failed to serialize {what}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove '{path}'")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory '{path}'")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy '{from}' to '{to}'")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to search '{path}' for artifacts")]
    ArtifactSearch {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

pub type Result<T> = std::result::Result<T, OperationError>;
