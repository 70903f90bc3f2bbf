//! Output sinks for rendered records
//!
//! Each rendered record is handed to a sink in a single call, so concurrent
//! requests cannot interleave within one record.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Destination stream for a rendered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Receives fully rendered records.
pub trait EventSink: Send + Sync {
    /// Write one rendered record to `stream`.
    fn write(&self, stream: Stream, output: &str) -> io::Result<()>;
}

/// Writes to the process standard output and error streams.
///
/// The stream lock is held for the whole record.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioSink;

impl EventSink for StdioSink {
    fn write(&self, stream: Stream, output: &str) -> io::Result<()> {
        match stream {
            Stream::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(output.as_bytes())?;
                out.flush()
            }
            Stream::Stderr => {
                let mut err = io::stderr().lock();
                err.write_all(output.as_bytes())?;
                err.flush()
            }
        }
    }
}

/// Captures records in memory, for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(Stream, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured records, in write order.
    pub fn entries(&self) -> Vec<(Stream, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Captured records written to `stream`.
    pub fn output(&self, stream: Stream) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, output)| output)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn write(&self, stream: Stream, output: &str) -> io::Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((stream, output.to_string()));
        Ok(())
    }
}
