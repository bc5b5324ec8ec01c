use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};

/// Logger implementation writing formatted entries to stderr.
pub struct StderrLogger {
    min_level: LogLevel,
}

impl StderrLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn new_production() -> Self {
        Self::new(LogLevel::Info)
    }

    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    fn format_log_entry(&self, entry: &LogEntry) -> String {
        let timestamp = format_clock(entry.timestamp);
        match &entry.metadata {
            Some(metadata) => format!(
                "[{}] {} {} | {} | {}",
                timestamp, entry.level, entry.component, entry.message, metadata
            ),
            None => {
                format!("[{}] {} {} | {}", timestamp, entry.level, entry.component, entry.message)
            }
        }
    }
}

impl Logger for StderrLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level >= self.min_level {
            eprintln!("{}", self.format_log_entry(&entry));
        }
    }
}

/// Time provider backed by the system clock.
pub struct SystemTimeProvider;

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for SystemTimeProvider {
    fn current_timestamp(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        format_clock(timestamp)
    }
}

/// `HH:MM:SS.mmm` wall-clock rendering of a millisecond epoch timestamp.
fn format_clock(timestamp_ms: u64) -> String {
    let ms = timestamp_ms % 1000;
    let seconds_total = timestamp_ms / 1000;
    let seconds = seconds_total % 60;
    let minutes = (seconds_total / 60) % 60;
    let hours = (seconds_total / 3600) % 24;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, ms)
}
