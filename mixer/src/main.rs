//! Mixing service entry point
//!
//! Spawns the mixing pipe once, then serves the HTTP API until Ctrl+C.
//! The pipe is left running on shutdown; it exits on its own when its
//! stdin closes with this process.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;

use mixer::{MixerConfig, MixerResult, MixerServer, PipeConfig, ProcessSupervisor, RealMediaLibrary, StatusCache};
use shared::{ProcessId, logging, process_info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "mixer")]
#[command(about = "HTTP front end for a long-running mixing pipe")]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Port for the HTTP server
    #[arg(long, default_value = "5000")]
    port: u16,

    /// Directory whose files are offered by /v1/mixer/getSongs
    #[arg(long)]
    music_dir: PathBuf,

    /// Mixing pipe executable
    #[arg(long, default_value = "../mixing-pipe")]
    pipe: PathBuf,

    /// Extra argument for the mixing pipe (repeatable)
    #[arg(long = "pipe-arg", allow_hyphen_values = true)]
    pipe_args: Vec<String>,

    /// Working directory for the mixing pipe
    #[arg(long)]
    pipe_dir: Option<PathBuf>,

    /// Directory with index.html and other static assets
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Bound on a single command write in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> MixerConfig {
        let pipe = PipeConfig::new(self.pipe)
            .with_args(self.pipe_args)
            .with_working_dir(self.pipe_dir)
            .with_write_timeout_ms(self.write_timeout_ms);

        MixerConfig {
            bind: self.bind,
            port: self.port,
            music_dir: self.music_dir,
            static_dir: self.static_dir,
            pipe,
        }
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(ProcessId::current(), "Received Ctrl+C signal"),
        Err(err) => {
            logging::log_error(ProcessId::current(), "Signal handling", &err);
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> MixerResult<()> {
    let args = Args::parse();

    ProcessId::init_mixer_service();
    logging::init_tracing_with_level(Some(&args.log_level))?;

    let config = args.into_config();
    let addr = config.socket_addr()?;
    logging::log_startup(ProcessId::current(), "Mixing Web Service");

    // Nothing is served unless the pipe is running
    let supervisor = ProcessSupervisor::start(&config.pipe, Arc::new(StatusCache::new()))
        .inspect_err(|e| logging::log_error(ProcessId::current(), "Mixing pipe startup", e))?;

    process_info!(ProcessId::current(), "📂 Serving songs from {}", config.music_dir.display());
    let library = RealMediaLibrary::new(&config.music_dir);

    let server = MixerServer::new(Arc::new(supervisor), Arc::new(library)).with_static_dir(config.static_dir.clone());
    server.run(addr, shutdown_signal()).await?;

    logging::log_success(ProcessId::current(), "Mixing service stopped gracefully");
    Ok(())
}
