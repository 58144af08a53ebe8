//! Append-only event log.
//!
//! Each call opens the file in append mode, writes exactly one line and closes
//! it again. Persisted lines are plain text:
//!
//! ```text
//! 2026-10-18T09:30:12.123456Z | warning | Could not open output directory
//! ```
//!
//! Colour is only applied when a line is rendered for a terminal.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crossterm::style::Stylize;
use thiserror::Error;

const SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Critical,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = EventLogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            other => Err(EventLogError::UnknownLevel {
                level: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("failed to format log timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("failed to write log at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read log at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown log level '{level}'")]
    UnknownLevel { level: String },
    #[error("malformed log line: {line}")]
    Malformed { line: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn to_line(&self) -> String {
        format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.timestamp, self.level, self.message
        )
    }

    pub fn parse(line: &str) -> Result<Self, EventLogError> {
        let malformed = || EventLogError::Malformed {
            line: line.to_string(),
        };

        let mut parts = line.trim_end_matches(['\r', '\n']).splitn(3, SEPARATOR);
        let timestamp = parts.next().filter(|value| !value.is_empty()).ok_or_else(malformed)?;
        let level = parts.next().ok_or_else(malformed)?.parse::<LogLevel>()?;
        let message = parts.next().ok_or_else(malformed)?;

        crate::time::parse_rfc3339(timestamp).map_err(|_| malformed())?;

        Ok(Self {
            timestamp: timestamp.to_string(),
            level,
            message: message.to_string(),
        })
    }

    /// Renders the entry for a terminal, colouring warnings yellow and critical entries red.
    pub fn render_colored(&self) -> String {
        let line = self.to_line();
        match self.level {
            LogLevel::Info => line,
            LogLevel::Warning => line.as_str().yellow().to_string(),
            LogLevel::Critical => line.as_str().red().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self, message: impl AsRef<str>) -> Result<LogEntry, EventLogError> {
        self.log(LogLevel::Info, message)
    }

    pub fn warning(&self, message: impl AsRef<str>) -> Result<LogEntry, EventLogError> {
        self.log(LogLevel::Warning, message)
    }

    pub fn critical(&self, message: impl AsRef<str>) -> Result<LogEntry, EventLogError> {
        self.log(LogLevel::Critical, message)
    }

    pub fn log(
        &self,
        level: LogLevel,
        message: impl AsRef<str>,
    ) -> Result<LogEntry, EventLogError> {
        let entry = LogEntry {
            timestamp: crate::time::now_utc_rfc3339()?,
            level,
            message: single_line(message.as_ref()),
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| self.write_error(source))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.write_error(source))?;
        writeln!(file, "{}", entry.to_line()).map_err(|source| self.write_error(source))?;

        Ok(entry)
    }

    /// Reads every line of the log. Lines that do not parse are returned as errors in place.
    pub fn read_lines(&self) -> Result<Vec<Result<LogEntry, String>>, EventLogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| EventLogError::Read {
            path: self.path.clone(),
            source,
        })?;

        Ok(raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| LogEntry::parse(line).map_err(|_| line.to_string()))
            .collect())
    }

    fn write_error(&self, source: std::io::Error) -> EventLogError {
        EventLogError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

fn single_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log() -> (tempfile::TempDir, EventLog) {
        let temp = tempfile::tempdir().expect("temp dir");
        let log = EventLog::new(temp.path().join("log.log"));
        (temp, log)
    }

    #[test]
    fn writes_lines_in_call_order_with_non_decreasing_timestamps() {
        let (_temp, log) = temp_log();
        let messages = ["Startup", "Created requirements at /tmp/x", "Compiling"];
        for message in messages {
            log.info(message).expect("log");
        }

        let raw = fs::read_to_string(log.path()).expect("read log");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), messages.len());

        let entries: Vec<LogEntry> = lines
            .iter()
            .map(|line| LogEntry::parse(line).expect("parse"))
            .collect();
        let parsed_messages: Vec<&str> = entries
            .iter()
            .map(|entry| entry.message.as_str())
            .collect();
        assert_eq!(parsed_messages, messages);

        let timestamps: Vec<_> = entries
            .iter()
            .map(|entry| crate::time::parse_rfc3339(&entry.timestamp).expect("timestamp"))
            .collect();
        assert!(timestamps.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn appends_to_existing_file() {
        let (_temp, log) = temp_log();
        fs::write(log.path(), "existing\n").expect("seed log");

        log.warning("second").expect("log");

        let raw = fs::read_to_string(log.path()).expect("read log");
        assert!(raw.starts_with("existing\n"));
        assert!(raw.trim_end().ends_with("| warning | second"));
    }

    #[test]
    fn persisted_lines_carry_no_escape_codes() {
        let (_temp, log) = temp_log();
        log.warning("careful").expect("log");
        log.critical("refused to run").expect("log");

        let raw = fs::read_to_string(log.path()).expect("read log");
        assert!(!raw.contains('\u{1b}'));
    }

    #[test]
    fn colored_rendering_only_styles_warning_and_critical() {
        let entry = |level| LogEntry {
            timestamp: "2026-10-18T09:30:12Z".to_string(),
            level,
            message: "hello".to_string(),
        };

        let info = entry(LogLevel::Info);
        assert_eq!(info.render_colored(), info.to_line());
        assert!(entry(LogLevel::Critical).render_colored().contains("| critical | hello"));

        // crossterm drops styling when NO_COLOR is set
        if std::env::var_os("NO_COLOR").is_none() {
            assert!(entry(LogLevel::Warning).render_colored().contains('\u{1b}'));
            assert!(entry(LogLevel::Critical).render_colored().contains('\u{1b}'));
        }
    }

    #[test]
    fn multi_line_messages_are_flattened() {
        let (_temp, log) = temp_log();
        let entry = log
            .info("Compiling program at /tmp/app.py\n\tOne file: true\n\tShow console: false")
            .expect("log");

        assert_eq!(
            entry.message,
            "Compiling program at /tmp/app.py One file: true Show console: false"
        );
        let raw = fs::read_to_string(log.path()).expect("read log");
        assert_eq!(raw.lines().count(), 1);
    }

    #[test]
    fn write_failure_propagates() {
        let temp = tempfile::tempdir().expect("temp dir");
        let log = EventLog::new(temp.path());

        let error = log.info("cannot land in a directory").expect_err("should fail");
        assert!(matches!(error, EventLogError::Write { .. }));
    }

    #[test]
    fn parse_rejects_malformed_lines() {
        assert!(LogEntry::parse("no separators here").is_err());
        assert!(LogEntry::parse("2026-10-18T09:30:12Z | loud | message").is_err());
        assert!(LogEntry::parse("yesterday | info | message").is_err());
    }

    #[test]
    fn message_may_contain_separator() {
        let entry = LogEntry::parse("2026-10-18T09:30:12Z | info | a | b").expect("parse");
        assert_eq!(entry.message, "a | b");
    }

    #[test]
    fn read_lines_keeps_unparseable_lines() {
        let (_temp, log) = temp_log();
        fs::write(log.path(), "garbage\n").expect("seed log");
        log.info("Startup").expect("log");

        let lines = log.read_lines().expect("read");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], Err("garbage".to_string()));
        assert_eq!(lines[1].as_ref().expect("entry").message, "Startup");
    }

    #[test]
    fn read_lines_on_missing_file_is_empty() {
        let (_temp, log) = temp_log();
        assert!(log.read_lines().expect("read").is_empty());
    }

    #[test]
    fn level_parse_is_case_insensitive() {
        assert_eq!("WARNING".parse::<LogLevel>().expect("level"), LogLevel::Warning);
        assert_eq!(LogLevel::Critical.to_string(), "critical");
    }
}
