//! Serialized, newline-terminated writes into the mixing pipe's stdin

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use shared::{ProcessId, process_debug, process_warn};

use crate::error::{MixerError, MixerResult};

type BoxedSink = Box<dyn AsyncWrite + Send + Unpin>;

/// Observable state of the pipe's input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeState {
    Open,
    /// Terminal: entered on the first failed write, never left
    Closed,
}

/// Turn a raw command into exactly one protocol line
///
/// One trailing `\n` or `\r\n` is accepted and normalized. Blank commands
/// and commands with an interior line break are rejected.
pub fn normalize_command(command: &str) -> MixerResult<String> {
    let body = command
        .strip_suffix("\r\n")
        .or_else(|| command.strip_suffix('\n'))
        .unwrap_or(command);

    if body.trim().is_empty() {
        return Err(MixerError::EmptyCommand);
    }
    if body.contains(['\n', '\r']) {
        return Err(MixerError::InvalidCommand);
    }

    Ok(format!("{body}\n"))
}

/// Writes commands to the pipe one at a time
pub struct CommandWriter {
    sink: Mutex<BoxedSink>,
    closed: AtomicBool,
    write_timeout: Option<Duration>,
}

impl CommandWriter {
    pub fn new<W>(sink: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            sink: Mutex::new(Box::new(sink)),
            closed: AtomicBool::new(false),
            write_timeout: None,
        }
    }

    /// Bound each write+flush; `None` waits as long as the pipe needs
    pub fn with_timeout(mut self, write_timeout: Option<Duration>) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    pub fn state(&self) -> PipeState {
        if self.closed.load(Ordering::Acquire) {
            PipeState::Closed
        } else {
            PipeState::Open
        }
    }

    /// Write one command line and flush it
    pub async fn write(&self, command: &str) -> MixerResult<()> {
        let line = normalize_command(command)?;

        if self.state() == PipeState::Closed {
            return Err(MixerError::PipeClosed);
        }

        let mut sink = self.sink.lock().await;

        // A writer ahead of us may have failed while we waited
        if self.state() == PipeState::Closed {
            return Err(MixerError::PipeClosed);
        }

        let io = async {
            sink.write_all(line.as_bytes()).await?;
            sink.flush().await
        };

        let result = match self.write_timeout {
            Some(limit) => match tokio::time::timeout(limit, io).await {
                Ok(written) => written.map_err(MixerError::WriteFailed),
                Err(_) => Err(MixerError::WriteTimeout(limit)),
            },
            None => io.await.map_err(MixerError::WriteFailed),
        };

        match &result {
            Ok(()) => {
                process_debug!(ProcessId::current(), "📤 Sent command to mixing pipe: {}", line.trim_end());
            }
            Err(e) => {
                // A partial line may be in the pipe, so nothing further can be framed safely
                self.closed.store(true, Ordering::Release);
                process_warn!(ProcessId::current(), "Mixing pipe input closed: {}", e);
            }
        }

        result
    }
}
