//! Error types for schoolgate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("Unknown permission: {0}")]
    UnknownPermission(String),

    #[error("Permission store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Malformed permission record: {0}")]
    MalformedRecord(String),

    #[error("Lookup timed out after {0} ms")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, GateError>;
