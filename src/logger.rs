//! The operational journal: timestamped lines written to a file and mirrored to the console.
//!
//! Every line has the shape `[<timestamp>] <message>`, where the timestamp is the
//! UTC instant of the call formatted by [`format_timestamp`].

use crate::clock::{Clock, SystemClock};
use crate::utils::format_timestamp;
use log::error;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to open log file '{0}'")]
    LogFileOpen(PathBuf, #[source] io::Error),
}

/// A destination for finished journal lines.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Appends lines to a file, creating it if necessary.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    pub fn open(path: &Path) -> Result<Self, LoggerError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| LoggerError::LogFileOpen(path.to_path_buf(), e))?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        writeln!(file, "{line}")?;
        file.flush()
    }
}

/// Mirrors lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")
    }
}

/// Keeps lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Number of lines whose message part contains `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines()
            .iter()
            .filter(|line| message_of(line).contains(needle))
            .count()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory sink lock poisoned"))?
            .push(line.to_string());
        Ok(())
    }
}

/// Strips the `[timestamp] ` prefix from a journal line.
fn message_of(line: &str) -> &str {
    line.split_once("] ").map(|(_, message)| message).unwrap_or(line)
}

/// Fan-out journal writer shared by every component of the pipeline.
#[derive(Clone)]
pub struct Logger {
    sinks: Arc<Vec<Box<dyn LogSink>>>,
    clock: Arc<dyn Clock>,
}

impl Logger {
    pub fn new(sinks: Vec<Box<dyn LogSink>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sinks: Arc::new(sinks),
            clock,
        }
    }

    /// The production journal: `path` on disk plus the console, stamped by the system clock.
    pub fn to_file_and_console(path: &Path) -> Result<Self, LoggerError> {
        let file = FileSink::open(path)?;
        Ok(Self::new(
            vec![Box::new(file) as Box<dyn LogSink>, Box::new(ConsoleSink)],
            Arc::new(SystemClock),
        ))
    }

    pub fn log(&self, message: impl AsRef<str>) {
        let line = format!(
            "[{}] {}",
            format_timestamp(&self.clock.now()),
            message.as_ref()
        );
        for sink in self.sinks.iter() {
            if let Err(e) = sink.write_line(&line) {
                error!("Failed to write journal line: {}", e);
            }
        }
    }
}
