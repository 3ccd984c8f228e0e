use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("generation run could not complete")]
    Operation(#[from] sdkgen_operations::OperationError),

    #[error("failed to create log folder '{path}'")]
    LogFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open full log '{path}'")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use sdkgen_operations::OperationError;

    use super::CliError;

    #[test]
    fn operation_error_converts_via_from() {
        let cli_err: CliError = OperationError::MissingSpecConfig.into();

        assert!(matches!(cli_err, CliError::Operation(_)));
    }

    #[test]
    fn operation_error_is_the_cause() {
        let cli_err: CliError = OperationError::MissingSpecConfig.into();

        let source = std::error::Error::source(&cli_err).expect("has a source");

        assert!(
            source
                .to_string()
                .contains("'tspConfigPath' and 'readmePath' are not provided")
        );
    }

    #[test]
    fn log_file_error_includes_path() {
        let err = CliError::LogFile {
            path: PathBuf::from("/work/out/logs/foo-full.log"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };

        assert!(err.to_string().contains("/work/out/logs/foo-full.log"));
    }
}
