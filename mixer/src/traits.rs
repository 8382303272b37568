//! Service trait definitions for dependency injection
//!
//! Pipe I/O and filesystem access sit behind these traits so handlers and
//! the line reader can be driven without a real subprocess.

use async_trait::async_trait;
use std::io;
use tokio::sync::mpsc;

use crate::error::MixerResult;

/// Producer of text lines, one status report per line
///
/// Byte streams go through `core::PipeLines`; scripted output can come from a channel.
#[mockall::automock]
#[async_trait]
pub trait LineSource: Send {
    /// Next complete line without its terminator, `None` once the source is exhausted
    async fn next_line(&mut self) -> io::Result<Option<String>>;
}

#[async_trait]
impl LineSource for mpsc::Receiver<String> {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.recv().await)
    }
}

/// Control surface of the supervised mixing pipe
#[mockall::automock]
#[async_trait]
pub trait MixerControl: Send + Sync {
    /// Forward a command line to the mixing pipe
    async fn submit(&self, command: &str) -> MixerResult<()>;

    /// Most recent status line reported by the mixing pipe
    async fn status(&self) -> String;
}

/// Read access to the music directory
#[mockall::automock]
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// File names in the music directory, sorted
    async fn list_songs(&self) -> MixerResult<Vec<String>>;
}
