//! Injected logging handle for output renderers.

use std::sync::{Mutex, PoisonError};

/// Sink for diagnostic messages emitted while rendering command output.
///
/// Renderers receive this as a dependency so tests can capture what would
/// otherwise go to the global subscriber.
pub trait RenderLog: Send + Sync {
    /// Record a debug-level message.
    fn debug(&self, message: &str);
    /// Record a trace-level message.
    fn trace(&self, message: &str);
}

/// Forwards every message to the global `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl RenderLog for TracingLog {
    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn trace(&self, message: &str) {
        tracing::trace!("{message}");
    }
}

/// Keeps messages in memory, tagged with their level.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<(tracing::Level, String)>>,
}

impl MemoryLog {
    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn entries(&self) -> Vec<(tracing::Level, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages recorded at debug level.
    #[must_use]
    pub fn debug_messages(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(level, _)| *level == tracing::Level::DEBUG)
            .map(|(_, message)| message)
            .collect()
    }

    fn push(&self, level: tracing::Level, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

impl RenderLog for MemoryLog {
    fn debug(&self, message: &str) {
        self.push(tracing::Level::DEBUG, message);
    }

    fn trace(&self, message: &str) {
        self.push(tracing::Level::TRACE, message);
    }
}
