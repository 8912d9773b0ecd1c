//! Line-oriented run log: `<timestamp> - <LEVEL> - <message>`
//!
//! Every line goes to all configured sinks. A sink that fails to write is reported through
//! the `log` facade and otherwise ignored; logging never changes how a run proceeds.

use chrono::{DateTime, Local};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Fixed set of run log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format one log line. Line breaks inside `message` are folded into spaces.
pub fn format_line(timestamp: DateTime<Local>, level: LogLevel, message: &str) -> String {
    let message = message
        .split(['\r', '\n'])
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{} - {} - {}",
        timestamp.format("%Y-%m-%d %H:%M:%S,%3f"),
        level,
        message
    )
}

/// Destination for formatted log lines
pub trait LogSink: Send + Sync {
    fn write_line(&mut self, level: LogLevel, line: &str) -> io::Result<()>;
}

/// Appends lines to a log file, flushing after each one
pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn write_line(&mut self, _level: LogLevel, line: &str) -> io::Result<()> {
        writeln!(self.file, "{}", line)?;
        self.file.flush()
    }
}

/// Prints lines to stdout, coloring them by level
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write_line(&mut self, level: LogLevel, line: &str) -> io::Result<()> {
        let colored = match level {
            LogLevel::Info => line.normal(),
            LogLevel::Success => line.green(),
            LogLevel::Error => line.red(),
        };
        writeln!(io::stdout().lock(), "{}", colored)
    }
}

/// Keeps lines in a shared buffer
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn write_line(&mut self, level: LogLevel, line: &str) -> io::Result<()> {
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory sink poisoned"))?;
        lines.push((level, line.to_string()));
        Ok(())
    }
}

/// Run log fanning out to any number of sinks
#[derive(Default)]
pub struct RunLog {
    sinks: Vec<Box<dyn LogSink>>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Log to a file and to the console
    pub fn file_and_console(path: &Path) -> io::Result<Self> {
        let file = FileSink::open(path)?;
        Ok(Self::new().with_sink(file).with_sink(ConsoleSink))
    }

    pub fn info(&mut self, message: &str) {
        self.emit(LogLevel::Info, message);
    }

    pub fn success(&mut self, message: &str) {
        self.emit(LogLevel::Success, message);
    }

    pub fn error(&mut self, message: &str) {
        self.emit(LogLevel::Error, message);
    }

    pub fn emit(&mut self, level: LogLevel, message: &str) {
        let line = format_line(Local::now(), level, message);
        for sink in &mut self.sinks {
            if let Err(e) = sink.write_line(level, &line) {
                log::warn!("run log sink failed: {}", e);
            }
        }
    }
}
