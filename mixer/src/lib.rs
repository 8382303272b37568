//! Mixing web service library
//!
//! An HTTP front for a long-running mixing pipe process: list songs, queue
//! a song by filename, and poll the pipe's latest status line.

pub mod config;
pub mod core;
pub mod error;
pub mod server_impl;
pub mod services;
pub mod traits;
pub mod web;

// Re-export main types
pub use config::{MixerConfig, PipeConfig};
pub use crate::core::{ProcessSupervisor, StatusCache};
pub use error::{MixerError, MixerResult};
pub use server_impl::MixerServer;

// Re-export trait definitions
pub use traits::{LineSource, MediaLibrary, MixerControl};

// Re-export service implementations
pub use services::RealMediaLibrary;
