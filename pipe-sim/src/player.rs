//! Simulated playback reporting in the mixing pipe's line format

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::time::{Instant, interval_at};

use shared::{ProcessId, process_debug, process_info};

/// Shortest interval between position reports; `interval_at` rejects zero
pub const MIN_TICK: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub track_length: Duration,
    pub tick: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            track_length: Duration::from_secs(180),
            tick: Duration::from_secs(1),
        }
    }
}

/// `MM:SS.ss`
pub fn format_clock(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor();
    let rest = seconds - 60.0 * minutes;
    format!("{:02}:{:05.2}", minutes as u64, rest)
}

pub fn position_line(position: Duration, length: Duration) -> String {
    format!(
        "Position: {}/{}",
        format_clock(position.as_secs_f64()),
        format_clock(length.as_secs_f64())
    )
}

/// Title is the file stem, as a tag-less file would report it
pub fn now_playing_line(filename: &str) -> String {
    let title = Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    format!("Now playing: {title}")
}

/// Plays queued files one after another, reporting on `output`
pub struct Player<R, W> {
    config: PlayerConfig,
    requests: Lines<R>,
    output: W,
    queue: VecDeque<String>,
    input_open: bool,
}

impl<R, W> Player<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(mut config: PlayerConfig, input: R, output: W) -> Self {
        config.tick = config.tick.max(MIN_TICK);
        Self {
            config,
            requests: input.lines(),
            output,
            queue: VecDeque::new(),
            input_open: true,
        }
    }

    /// Run until input is closed and the queue is drained; returns tracks played
    pub async fn run(mut self) -> io::Result<u32> {
        let mut played = 0;

        loop {
            match self.queue.pop_front() {
                Some(song) => {
                    self.play(&song).await?;
                    played += 1;
                }
                None if self.input_open => {
                    let request = self.requests.next_line().await?;
                    self.accept(request);
                }
                None => break,
            }
        }

        process_info!(ProcessId::current(), "Input closed, played {} tracks", played);
        Ok(played)
    }

    fn accept(&mut self, request: Option<String>) {
        match request {
            Some(line) if line.trim().is_empty() => {}
            Some(line) => {
                process_debug!(ProcessId::current(), "Queued {}", line);
                self.queue.push_back(line);
            }
            None => self.input_open = false,
        }
    }

    async fn play(&mut self, song: &str) -> io::Result<()> {
        process_info!(ProcessId::current(), "▶️  Playing {}", song);
        self.emit(&now_playing_line(song)).await?;

        let tick = self.config.tick;
        let length = self.config.track_length;
        let mut ticker = interval_at(Instant::now() + tick, tick);
        let mut position = Duration::ZERO;

        while position < length {
            tokio::select! {
                _ = ticker.tick() => {
                    position = (position + tick).min(length);
                    self.emit(&position_line(position, length)).await?;
                }
                request = self.requests.next_line(), if self.input_open => {
                    let request = request?;
                    self.accept(request);
                }
            }
        }

        Ok(())
    }

    async fn emit(&mut self, line: &str) -> io::Result<()> {
        self.output.write_all(line.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }
}
