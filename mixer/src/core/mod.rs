//! Pipe supervision core: status cache, line reader, command writer

pub mod command_writer;
pub mod line_reader;
pub mod status_cache;
pub mod supervisor;

pub use command_writer::{CommandWriter, PipeState, normalize_command};
pub use line_reader::{LineReader, MAX_LINE_BYTES, PipeLines, forward_stderr};
pub use status_cache::{INITIAL_STATUS, StatusCache};
pub use supervisor::ProcessSupervisor;
