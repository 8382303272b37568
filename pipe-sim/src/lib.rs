//! Stand-in for the mixing pipe
//!
//! Speaks the pipe's line protocol without touching audio: filenames in on
//! stdin, `Now playing:` and `Position:` reports out on stdout.

pub mod player;

pub use player::{MIN_TICK, Player, PlayerConfig};
