//! Destinations for audit lines.

use tracing::{info, warn};

/// Tracing target used by [`TracingSink`].
pub const AUDIT_TARGET: &str = "warden::audit";

/// Line-oriented log destination with warning and info levels.
///
/// Writes are fire-and-forget. Implementations serialize concurrent writes
/// themselves and must not panic on failure.
pub trait AuditSink: Send + Sync {
    /// Write a warning-level line.
    fn warn(&self, line: &str);

    /// Write an info-level line.
    fn info(&self, line: &str);
}

/// Sink backed by the process-wide `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn warn(&self, line: &str) {
        warn!(target: AUDIT_TARGET, "{}", line);
    }

    fn info(&self, line: &str) {
        info!(target: AUDIT_TARGET, "{}", line);
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemorySink;

#[cfg(any(test, feature = "test-utils"))]
mod memory {
    use super::AuditSink;
    use std::sync::Mutex;
    use tracing::Level;

    /// Sink that keeps every line in memory, for assertions in tests.
    #[derive(Debug, Default)]
    pub struct MemorySink {
        lines: Mutex<Vec<(Level, String)>>,
    }

    impl MemorySink {
        /// Create an empty sink.
        pub fn new() -> Self {
            Self::default()
        }

        /// All lines in write order.
        pub fn lines(&self) -> Vec<(Level, String)> {
            self.lines.lock().map(|l| l.clone()).unwrap_or_default()
        }

        /// Warning-level lines.
        pub fn warnings(&self) -> Vec<String> {
            self.at(Level::WARN)
        }

        /// Info-level lines.
        pub fn infos(&self) -> Vec<String> {
            self.at(Level::INFO)
        }

        /// Whether nothing was written.
        pub fn is_empty(&self) -> bool {
            self.lines().is_empty()
        }

        /// Everything written, one line per entry.
        pub fn contents(&self) -> String {
            self.lines()
                .into_iter()
                .map(|(_, line)| line)
                .collect::<Vec<_>>()
                .join("\n")
        }

        fn at(&self, level: Level) -> Vec<String> {
            self.lines()
                .into_iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, line)| line)
                .collect()
        }

        fn push(&self, level: Level, line: &str) {
            if let Ok(mut lines) = self.lines.lock() {
                lines.push((level, line.to_string()));
            }
        }
    }

    impl AuditSink for MemorySink {
        fn warn(&self, line: &str) {
            self.push(Level::WARN, line);
        }

        fn info(&self, line: &str) {
            self.push(Level::INFO, line);
        }
    }
}
