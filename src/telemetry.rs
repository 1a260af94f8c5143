//! Telemetry utilities for command timing and dispatch correlation.

use std::time::Instant;

/// Guard for timing command execution.
///
/// Logs the command latency when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(command = %self.command, elapsed_ms, "Command finished");
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Create a span for one dispatch.
    pub fn dispatch(command: &str, author: &str, guild: Option<u64>) -> Span {
        match guild {
            Some(guild) => debug_span!("dispatch", command = %command, author = %author, guild),
            None => debug_span!("dispatch", command = %command, author = %author),
        }
    }

    /// Create a span for a gateway session.
    pub fn gateway(kind: &str, identity: &str) -> Span {
        info_span!("gateway", kind = %kind, identity = %identity)
    }
}
