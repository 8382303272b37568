//! Ownership of the single long-lived mixing pipe process
//!
//! The supervisor spawns the pipe once, keeps its handle for the life of the
//! service, feeds stdout into the status cache on a background task, drains
//! stderr into the log, and serializes commands into stdin. There is no
//! restart: once the pipe exits, submits fail and the status freezes.

use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncWrite, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use shared::{ProcessId, process_info};

use crate::config::PipeConfig;
use crate::core::command_writer::{CommandWriter, PipeState};
use crate::core::line_reader::{LineReader, PipeLines, forward_stderr};
use crate::core::status_cache::StatusCache;
use crate::error::{MixerError, MixerResult};
use crate::traits::{LineSource, MixerControl};

pub struct ProcessSupervisor {
    /// Held so the handle lives as long as the service; never killed
    child: Option<Child>,
    pid: Option<u32>,
    writer: CommandWriter,
    cache: Arc<StatusCache>,
    reader: JoinHandle<u64>,
    stderr: Option<JoinHandle<u64>>,
}

impl ProcessSupervisor {
    /// Spawn the mixing pipe with all standard streams piped
    ///
    /// Must run inside a tokio runtime. Spawn failures are returned to the
    /// caller, which is expected to abort startup.
    pub fn start(config: &PipeConfig, cache: Arc<StatusCache>) -> MixerResult<Self> {
        let program = config.display_name();

        let mut cmd = Command::new(&config.program);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false);
        if let Some(dir) = &config.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| MixerError::SpawnFailed {
            program: program.clone(),
            source,
        })?;

        let stdin = child.stdin.take().ok_or(MixerError::MissingStream("stdin"))?;
        let stdout = child.stdout.take().ok_or(MixerError::MissingStream("stdout"))?;
        let stderr = child.stderr.take().ok_or(MixerError::MissingStream("stderr"))?;

        let pid = child.id();
        process_info!(
            ProcessId::current(),
            "🎛️  Mixing pipe started: {} (PID: {})",
            program,
            pid.map(|id| id.to_string()).unwrap_or_else(|| "unknown".to_string())
        );

        let writer = CommandWriter::new(stdin).with_timeout(config.write_timeout);
        let reader = LineReader::new(PipeLines::new(BufReader::new(stdout)), cache.clone()).spawn();
        let stderr = forward_stderr(PipeLines::new(BufReader::new(stderr)), program);

        Ok(Self {
            child: Some(child),
            pid,
            writer,
            cache,
            reader,
            stderr: Some(stderr),
        })
    }

    /// Wire a supervisor to arbitrary streams instead of a subprocess
    pub fn from_streams<W, S>(stdin: W, stdout: S, cache: Arc<StatusCache>) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
        S: LineSource + 'static,
    {
        let reader = LineReader::new(stdout, cache.clone()).spawn();

        Self {
            child: None,
            pid: None,
            writer: CommandWriter::new(stdin),
            cache,
            reader,
            stderr: None,
        }
    }

    /// OS process id of the pipe as reported at spawn
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Whether a real subprocess backs this supervisor
    pub fn has_child(&self) -> bool {
        self.child.is_some()
    }

    pub fn pipe_state(&self) -> PipeState {
        self.writer.state()
    }

    /// True once the pipe's stdout has closed and the status has frozen
    pub fn output_closed(&self) -> bool {
        self.reader.is_finished()
    }
}

#[async_trait]
impl MixerControl for ProcessSupervisor {
    async fn submit(&self, command: &str) -> MixerResult<()> {
        self.writer.write(command).await
    }

    async fn status(&self) -> String {
        self.cache.read().await
    }
}

impl Drop for ProcessSupervisor {
    fn drop(&mut self) {
        self.reader.abort();
        if let Some(stderr) = &self.stderr {
            stderr.abort();
        }
    }
}
