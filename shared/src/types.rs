//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global process ID singleton
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Reported when no binary has claimed an identity (library tests, embedding)
static UNINITIALIZED: ProcessId = ProcessId::MixerService;

/// Process identifier for any component in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// HTTP service supervising the mixing pipe
    MixerService,
    /// Stand-in mixing pipe spawned as a child process
    PipeSimulator,
}

impl ProcessId {
    /// Initialize the global process ID for the mixer service
    pub fn init_mixer_service() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::MixerService)
    }

    /// Initialize the global process ID for the pipe simulator
    pub fn init_pipe_simulator() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::PipeSimulator)
    }

    /// Get the global process ID
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get().unwrap_or(&UNINITIALIZED)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::MixerService => write!(f, "mixer"),
            ProcessId::PipeSimulator => write!(f, "pipe-sim"),
        }
    }
}
