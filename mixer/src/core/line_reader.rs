//! Background draining of the mixing pipe's output streams

use async_trait::async_trait;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;

use shared::{ProcessId, process_debug, process_info, process_warn};

use crate::core::status_cache::StatusCache;
use crate::traits::LineSource;

/// Longest line kept before the pending bytes are published as a line of their own
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Splits a child's byte stream into status lines
///
/// Lines end at `\n`, `\r\n` or a lone `\r` (progress meters). Bytes are
/// decoded lossily, so output that is not UTF-8 never stops the stream.
pub struct PipeLines<R> {
    reader: R,
    line: Vec<u8>,
    after_cr: bool,
    /// A capped chunk was just published; its terminator, if next, ends nothing
    after_cap: bool,
    max_line: usize,
}

impl<R> PipeLines<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            after_cr: false,
            after_cap: false,
            max_line: MAX_LINE_BYTES,
        }
    }

    /// Configure the line length cap (fluent API)
    pub fn with_max_line(mut self, max_line: usize) -> Self {
        self.max_line = max_line.max(1);
        self
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.line).into_owned();
        self.line.clear();
        line
    }

    /// Publish a chunk at the cap, keeping a split UTF-8 character for the next one
    fn take_capped(&mut self) -> String {
        let rest = self.line.split_off(char_boundary(&self.line));
        let chunk = self.take_line();
        self.line = rest;
        self.after_cap = self.line.is_empty();
        chunk
    }
}

/// Length of `bytes` without a trailing, incomplete UTF-8 sequence
///
/// Returns the full length when nothing is cut or when cutting would leave
/// an empty chunk.
fn char_boundary(bytes: &[u8]) -> usize {
    let len = bytes.len();
    for start in (len.saturating_sub(3)..len).rev() {
        let byte = bytes[start];
        if byte & 0xC0 == 0x80 {
            continue;
        }
        let width = match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if start > 0 && width > len - start { start } else { len };
    }
    len
}

#[async_trait]
impl<R> LineSource for PipeLines<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            let available = self.reader.fill_buf().await?;
            if available.is_empty() {
                if self.line.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(self.take_line()));
            }

            let mut used = 0;
            let mut complete = false;
            let mut capped = false;
            for &byte in available {
                used += 1;
                if std::mem::take(&mut self.after_cap) {
                    match byte {
                        b'\n' => continue,
                        b'\r' => {
                            self.after_cr = true;
                            continue;
                        }
                        _ => {}
                    }
                }
                if std::mem::take(&mut self.after_cr) && byte == b'\n' {
                    continue;
                }
                match byte {
                    b'\n' => complete = true,
                    b'\r' => {
                        self.after_cr = true;
                        complete = true;
                    }
                    _ => {
                        self.line.push(byte);
                        capped = self.line.len() >= self.max_line;
                    }
                }
                if complete || capped {
                    break;
                }
            }
            self.reader.consume(used);

            if complete {
                return Ok(Some(self.take_line()));
            }
            if capped {
                return Ok(Some(self.take_capped()));
            }
        }
    }
}

/// Publishes every line from a source into the status cache
pub struct LineReader<S: LineSource> {
    source: S,
    cache: Arc<StatusCache>,
}

impl<S> LineReader<S>
where
    S: LineSource + 'static,
{
    pub fn new(source: S, cache: Arc<StatusCache>) -> Self {
        Self { source, cache }
    }

    /// Drain on a dedicated task for the lifetime of the source
    pub fn spawn(self) -> JoinHandle<u64> {
        tokio::spawn(self.run())
    }

    /// Read until EOF or a read error, returning the number of lines published
    ///
    /// Termination is never an error: the cache keeps the last value.
    pub async fn run(mut self) -> u64 {
        let mut published = 0u64;

        loop {
            match self.source.next_line().await {
                Ok(Some(line)) => {
                    process_debug!(ProcessId::current(), "📥 Mixing pipe status: {}", line);
                    self.cache.write(line).await;
                    published += 1;
                }
                Ok(None) => {
                    process_info!(
                        ProcessId::current(),
                        "Mixing pipe output closed after {} lines, status is now frozen",
                        published
                    );
                    break;
                }
                Err(e) => {
                    process_warn!(
                        ProcessId::current(),
                        "Mixing pipe output unreadable after {} lines: {}",
                        published,
                        e
                    );
                    break;
                }
            }
        }

        published
    }
}

/// Drain the child's stderr into the service log so the pipe never fills
///
/// Returns the number of lines forwarded once the stream ends.
pub fn forward_stderr<S>(mut source: S, program: String) -> JoinHandle<u64>
where
    S: LineSource + 'static,
{
    tokio::spawn(async move {
        let mut forwarded = 0u64;
        loop {
            match source.next_line().await {
                Ok(Some(line)) => {
                    process_warn!(ProcessId::current(), program = %program, "mixing pipe stderr: {}", line);
                    forwarded += 1;
                }
                Ok(None) => break,
                Err(e) => {
                    process_debug!(ProcessId::current(), "Mixing pipe stderr unreadable: {}", e);
                    break;
                }
            }
        }
        process_debug!(ProcessId::current(), "Mixing pipe stderr closed after {} lines", forwarded);
        forwarded
    })
}
