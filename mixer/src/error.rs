//! Mixer service error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use shared::SharedError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MixerError {
    #[error("Failed to spawn mixing pipe '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Mixing pipe {0} stream was not captured")]
    MissingStream(&'static str),

    #[error("Mixing pipe input is closed")]
    PipeClosed,

    #[error("Failed to write to mixing pipe: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Write to mixing pipe timed out after {0:?}")]
    WriteTimeout(Duration),

    #[error("Command is empty")]
    EmptyCommand,

    #[error("Command contains a line break")]
    InvalidCommand,

    #[error("No filename parameter")]
    MissingFilename,

    #[error("Failed to read music directory {path}: {source}")]
    MediaDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Shared component error")]
    SharedError(#[from] SharedError),
}

impl MixerError {
    /// Create configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for failures writing to the child's input
    pub fn is_write_failure(&self) -> bool {
        matches!(
            self,
            MixerError::PipeClosed | MixerError::WriteFailed(_) | MixerError::WriteTimeout(_)
        )
    }

    /// HTTP status an API caller sees for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            MixerError::EmptyCommand | MixerError::InvalidCommand | MixerError::MissingFilename => {
                StatusCode::BAD_REQUEST
            }
            e if e.is_write_failure() => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MixerError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}

pub type MixerResult<T> = Result<T, MixerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_client_errors() {
        assert_eq!(MixerError::MissingFilename.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(MixerError::EmptyCommand.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(MixerError::InvalidCommand.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_write_failures_are_unavailable() {
        let broken = std::io::Error::from(std::io::ErrorKind::BrokenPipe);
        assert_eq!(MixerError::PipeClosed.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(MixerError::WriteFailed(broken).status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            MixerError::WriteTimeout(Duration::from_secs(1)).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_missing_filename_message() {
        assert_eq!(MixerError::MissingFilename.to_string(), "No filename parameter");
    }
}
