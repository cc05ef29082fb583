//! In-memory log capture for tests.
//!
//! [`CapturedLogs`] is a [`MakeWriter`] that appends formatted output to a
//! shared buffer, so tests can assert on exactly what a real subscriber would
//! print.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::Subscriber;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

/// Shared buffer of formatted log output.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A compact, ANSI-free subscriber writing into this buffer at `trace`.
    ///
    /// Use with [`tracing::subscriber::with_default`] or
    /// [`tracing::subscriber::set_default`].
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_target(true)
            .with_env_filter(EnvFilter::new("trace"))
            .compact()
            .finish()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buf
            .lock()
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default()
    }

    /// Lines containing `needle`.
    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .map(String::from)
            .collect()
    }
}

/// Per-event writer handed out by [`CapturedLogs`].
pub struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self
            .buf
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "capture buffer poisoned"))?;
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buf: Arc::clone(&self.buf),
        }
    }
}
