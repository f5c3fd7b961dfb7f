//! Log capture for the `log` facade
//!
//! While the TUI owns the terminal nothing can go to stderr, so records are
//! kept in a bounded in-memory ring instead. The front-end drains the ring
//! after each command and shows the lines in its output pane. In batch mode
//! records at or above the echo level are also written to stderr.

use crate::constants::LOG_CAPACITY;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

/// One captured log record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: Level,
    pub message: String,
}

/// A `log::Log` that stores records in a ring of at most `capacity` lines
pub struct CaptureLogger {
    lines: Mutex<VecDeque<LogLine>>,
    capacity: usize,
    echo: Option<Level>,
}

impl CaptureLogger {
    pub fn new(capacity: usize, echo: Option<Level>) -> Self {
        CaptureLogger {
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            echo,
        }
    }

    /// Take every captured line, oldest first
    pub fn drain(&self) -> Vec<LogLine> {
        match self.lines.lock() {
            Ok(mut lines) => lines.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = LogLine {
            level: record.level(),
            message: record.args().to_string(),
        };
        if self.echo.is_some_and(|echo| line.level <= echo) {
            eprintln!("[{}] {}", line.level, line.message);
        }
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == self.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<CaptureLogger> = OnceLock::new();

/// Install the capture logger. `echo` additionally mirrors records at or
/// above that level to stderr.
pub fn init(level: LevelFilter, echo: Option<Level>) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| CaptureLogger::new(LOG_CAPACITY, echo));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Drain the installed logger; empty if [`init`] was never called
pub fn drain() -> Vec<LogLine> {
    LOGGER.get().map(CaptureLogger::drain).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_drops_oldest() {
        log::set_max_level(LevelFilter::Trace);
        let logger = CaptureLogger::new(2, None);
        for i in 0..3 {
            logger.log(
                &Record::builder()
                    .level(Level::Info)
                    .args(format_args!("line {}", i))
                    .build(),
            );
        }

        let lines = logger.drain();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].message, "line 1");
        assert_eq!(lines[1].message, "line 2");
        assert!(logger.drain().is_empty());
    }
}
