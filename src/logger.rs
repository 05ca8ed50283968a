//! Process-wide logging for nordpilot.
//!
//! Entries go into a bounded in-memory ring buffer. The dashboard renders it
//! as the event log; the CLI prints it to stderr on `--verbose`.
//!
//! Categories in use: `APP`, `CMD` (tool execution), `PARSE`, `CONFIG`.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};
use std::time::SystemTime;

use crate::constants;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Command lines, exit codes, parse details
    Debug = 0,
    /// Normal operation (connects, settings changes)
    Info = 1,
    /// Recoverable problems (timeouts, non-zero exits)
    Warning = 2,
    /// Failures that left the UI on a default value
    Error = 3,
}

impl LogLevel {
    /// Fixed-width label for this level
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warning => "WARN ",
            Self::Error => "ERROR",
        }
    }

    /// Color used by the event log panel
    pub const fn color(self) -> ratatui::style::Color {
        match self {
            Self::Debug => crate::theme::TEXT_MUTED,
            Self::Info => crate::theme::ACCENT_PRIMARY,
            Self::Warning => crate::theme::WARNING,
            Self::Error => crate::theme::ERROR,
        }
    }
}

/// A single log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub level: LogLevel,
    pub category: String,
    pub message: String,
}

impl LogEntry {
    /// `[HH:MM:SS] [LEVEL] CATEGORY: message`
    pub fn format(&self) -> String {
        format!(
            "[{}] [{}] {}: {}",
            crate::utils::format_system_time_local(self.timestamp),
            self.level.prefix(),
            self.category,
            self.message
        )
    }
}

struct Logger {
    entries: VecDeque<LogEntry>,
    max_entries: usize,
    min_level: LogLevel,
}

impl Logger {
    fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(constants::DEFAULT_MAX_LOG_ENTRIES),
            max_entries: constants::DEFAULT_MAX_LOG_ENTRIES,
            min_level: LogLevel::Info,
        }
    }

    fn push(&mut self, level: LogLevel, category: &str, message: String) {
        if level < self.min_level {
            return;
        }
        self.entries.push_back(LogEntry {
            timestamp: SystemTime::now(),
            level,
            category: category.to_string(),
            message,
        });
        self.trim();
    }

    fn trim(&mut self) {
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }
}

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

fn logger() -> &'static Mutex<Logger> {
    LOGGER.get_or_init(|| Mutex::new(Logger::new()))
}

/// Log a message with the specified level and category
pub fn log(level: LogLevel, category: &str, message: impl Into<String>) {
    if let Ok(mut logger) = logger().lock() {
        logger.push(level, category, message.into());
    }
}

/// Snapshot of all retained entries, oldest first
pub fn get_logs() -> Vec<LogEntry> {
    logger()
        .lock()
        .map(|logger| logger.entries.iter().cloned().collect())
        .unwrap_or_default()
}

/// Number of retained entries
pub fn len() -> usize {
    logger().lock().map(|logger| logger.entries.len()).unwrap_or(0)
}

/// Configure the logger from user settings.
///
/// Call once at startup after loading `AppConfig`.
pub fn configure(log_level: &str, max_entries: usize) {
    if let Ok(mut logger) = logger().lock() {
        logger.min_level = parse_log_level(log_level);
        logger.max_entries = max_entries.max(1);
        logger.trim();
    }
}

/// Set the minimum log level.
pub fn set_min_level(level: LogLevel) {
    if let Ok(mut logger) = logger().lock() {
        logger.min_level = level;
    }
}

/// Parse a log level string (case-insensitive) into a `LogLevel`.
///
/// Falls back to `LogLevel::Info` for unrecognised values.
#[must_use]
pub fn parse_log_level(s: &str) -> LogLevel {
    match s.trim().to_ascii_lowercase().as_str() {
        "debug" => LogLevel::Debug,
        "warning" | "warn" => LogLevel::Warning,
        "error" | "err" => LogLevel::Error,
        _ => LogLevel::Info,
    }
}

/// Clear all logs
pub fn clear_logs() {
    if let Ok(mut logger) = logger().lock() {
        logger.entries.clear();
    }
}

#[macro_export]
macro_rules! log_debug {
    ($category:expr, $($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Debug, $category, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Info, $category, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($category:expr, $($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Warning, $category, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Error, $category, format!($($arg)*))
    };
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Tests that inspect the global buffer must hold this lock.
    pub(crate) static TEST_MUTEX: Mutex<()> = Mutex::new(());

    /// Other tests log concurrently, so assertions look at one category only.
    fn entries_in(category: &str) -> Vec<LogEntry> {
        get_logs()
            .into_iter()
            .filter(|e| e.category == category)
            .collect()
    }

    #[test]
    fn test_logging() {
        let _lock = TEST_MUTEX.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        set_min_level(LogLevel::Debug);
        clear_logs();

        log(LogLevel::Info, "TEST_BASIC", "Test message");

        let logs = entries_in("TEST_BASIC");
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, LogLevel::Info);
        assert_eq!(logs[0].message, "Test message");
    }

    #[test]
    fn test_log_level_filtering() {
        let _lock = TEST_MUTEX.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        clear_logs();
        set_min_level(LogLevel::Warning);

        crate::log_debug!("TEST_FILTER", "Debug");
        crate::log_info!("TEST_FILTER", "Info");
        crate::log_warning!("TEST_FILTER", "Warning");
        crate::log_error!("TEST_FILTER", "Error {}", 42);

        let logs = entries_in("TEST_FILTER");
        assert_eq!(logs.len(), 2); // Only Warning and Error
        assert_eq!(logs[1].message, "Error 42");

        set_min_level(LogLevel::Debug);
    }

    #[test]
    fn test_configure_caps_entries() {
        let _lock = TEST_MUTEX.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        clear_logs();
        configure("debug", 10);

        for i in 0..25 {
            log(LogLevel::Info, "TEST_CAP", format!("Message {i}"));
        }

        assert!(len() <= 10);
        let logs = entries_in("TEST_CAP");
        assert!(logs.len() <= 10);
        assert!(logs.iter().all(|e| e.message != "Message 0"));

        configure("debug", constants::DEFAULT_MAX_LOG_ENTRIES);
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG"), LogLevel::Debug);
        assert_eq!(parse_log_level(" warn "), LogLevel::Warning);
        assert_eq!(parse_log_level("err"), LogLevel::Error);
        assert_eq!(parse_log_level("verbose"), LogLevel::Info);
    }

    #[test]
    fn test_entry_format() {
        let entry = LogEntry {
            timestamp: SystemTime::now(),
            level: LogLevel::Warning,
            category: "CMD".to_string(),
            message: "timed out".to_string(),
        };
        let line = entry.format();
        assert!(line.ends_with("[WARN ] CMD: timed out"));
        assert!(line.starts_with('['));
    }
}
