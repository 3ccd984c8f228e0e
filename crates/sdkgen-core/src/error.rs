use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatusParseError {
    #[error("unknown status '{0}'")]
    UnknownStatus(String),
}

pub type Result<T> = std::result::Result<T, StatusParseError>;
