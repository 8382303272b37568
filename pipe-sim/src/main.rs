//! Pipe simulator entry point
//!
//! Spawned by the mixer service in place of the real mixing pipe. Logs go to
//! stderr; stdout carries only status lines.

use anyhow::{Context, ensure};
use clap::Parser;
use std::time::Duration;
use tokio::io::BufReader;

use pipe_sim::{Player, PlayerConfig};
use shared::{ProcessId, logging};

#[derive(Parser, Debug)]
#[command(name = "pipe-sim")]
#[command(about = "Simulated mixing pipe speaking the line protocol")]
struct Args {
    /// Simulated length of every track in seconds
    #[arg(long, default_value = "180")]
    track_seconds: f64,

    /// Interval between position reports in milliseconds
    #[arg(long, default_value = "1000")]
    tick_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    ProcessId::init_pipe_simulator();
    logging::init_tracing_with_level(Some(&args.log_level)).context("initializing logging")?;

    ensure!(
        args.track_seconds.is_finite() && args.track_seconds > 0.0,
        "--track-seconds must be positive"
    );
    ensure!(args.tick_ms > 0, "--tick-ms must be positive");

    let config = PlayerConfig {
        track_length: Duration::from_secs_f64(args.track_seconds),
        tick: Duration::from_millis(args.tick_ms),
    };
    logging::log_startup(ProcessId::current(), "pipe simulator");

    let player = Player::new(config, BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    player.run().await.context("pipe I/O failed")?;

    logging::log_success(ProcessId::current(), "Pipe simulator finished");
    Ok(())
}
