//! Service configuration assembled from the command line

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{MixerError, MixerResult};

/// Default bound on a single command write
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// How to launch the mixing pipe
#[derive(Debug, Clone)]
pub struct PipeConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub write_timeout: Option<Duration>,
}

impl PipeConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            write_timeout: Some(DEFAULT_WRITE_TIMEOUT),
        }
    }

    /// Configure arguments (fluent API)
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Configure the child's working directory (fluent API)
    pub fn with_working_dir(mut self, working_dir: Option<PathBuf>) -> Self {
        self.working_dir = working_dir;
        self
    }

    /// Configure the write timeout from milliseconds, zero disables it (fluent API)
    pub fn with_write_timeout_ms(mut self, millis: u64) -> Self {
        self.write_timeout = (millis > 0).then(|| Duration::from_millis(millis));
        self
    }

    /// Program name as shown in logs and errors
    pub fn display_name(&self) -> String {
        self.program.display().to_string()
    }
}

/// Everything the service needs to start
#[derive(Debug, Clone)]
pub struct MixerConfig {
    pub bind: String,
    pub port: u16,
    pub music_dir: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub pipe: PipeConfig,
}

impl MixerConfig {
    /// Address the HTTP listener binds to
    pub fn socket_addr(&self) -> MixerResult<SocketAddr> {
        let ip: IpAddr = self
            .bind
            .parse()
            .map_err(|e| MixerError::config(format!("Invalid bind address '{}': {}", self.bind, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
