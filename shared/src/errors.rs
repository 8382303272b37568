//! Shared error types for the mixing service workspace

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Logging initialization failed: {message}")]
    LoggingInit { message: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
