//! Shared types for the mixing web service
//!
//! Contains the process identity and logging helpers used by both the
//! HTTP service and the pipe simulator it can supervise.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
