//! Latest status line reported by the mixing pipe

use tokio::sync::RwLock;

/// Value held before the pipe has reported anything
pub const INITIAL_STATUS: &str = "Ready";

/// Single guarded slot holding the most recent status line
///
/// Written by the line reader, read by any number of HTTP handlers. The
/// guard is only held for the duration of one string copy or swap.
#[derive(Debug)]
pub struct StatusCache {
    current: RwLock<String>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self::with_initial(INITIAL_STATUS)
    }

    pub fn with_initial(initial: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(initial.into()),
        }
    }

    /// Replace the cached status
    pub async fn write(&self, line: impl Into<String>) {
        let line = line.into();
        let mut current = self.current.write().await;
        *current = line;
    }

    /// Copy of the cached status
    pub async fn read(&self) -> String {
        self.current.read().await.clone()
    }
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::new()
    }
}
