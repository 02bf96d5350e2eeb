//! Error types for taskdeck
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad input, unknown id, invalid config)
//! - 4: Operation failed (store unavailable, IO, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskdeck CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskdeck operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid task: {0}")]
    Validation(String),

    #[error("Invalid task id: {0}")]
    InvalidIdentifier(String),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Task not found or no changes made: {0}")]
    NoChangeOrNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::Validation(_)
            | Error::InvalidIdentifier(_)
            | Error::NotFound(_)
            | Error::NoChangeOrNotFound(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            // Operation failures
            Error::StoreUnavailable(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for taskdeck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_map_to_exit_code_2() {
        let errs = [
            Error::Validation("title cannot be empty".to_string()),
            Error::InvalidIdentifier("nope".to_string()),
            Error::NotFound("x".to_string()),
            Error::NoChangeOrNotFound("x".to_string()),
            Error::InvalidConfig("bad".to_string()),
        ];
        for err in errs {
            assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        }
    }

    #[test]
    fn store_errors_map_to_exit_code_4() {
        let err = Error::StoreUnavailable("disk gone".to_string());
        assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
        let err = Error::LockFailed(PathBuf::from("/tmp/tasks.json.lock"));
        assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    }

    #[test]
    fn json_error_carries_message_and_code() {
        let err = Error::NotFound("abc".to_string());
        let json = JsonError::from(&err);
        assert!(json.error.contains("abc"));
        assert_eq!(json.code, 2);
    }
}
