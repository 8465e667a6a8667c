//! Log entry structure

use super::log_level::LogLevel;
use super::timestamp::{self, format_timestamp};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: NaiveDateTime,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// A newline terminates an entry on disk, so raw line breaks are replaced
    /// with escape sequences to keep every entry on one line.
    fn sanitize_message(message: &str) -> String {
        message.replace('\n', "\\n").replace('\r', "\\r")
    }

    /// Create an entry stamped with the current time
    pub fn new(level: LogLevel, message: impl AsRef<str>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(message.as_ref()),
            timestamp: timestamp::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Render the entry as one persisted line, including the trailing newline
    ///
    /// The layout is `[YYYY-MM-DD HH:MM:SS] [LEVEL] message`.
    pub fn to_line(&self) -> String {
        format!(
            "[{}] [{}] {}\n",
            format_timestamp(&self.timestamp),
            self.level.to_str(),
            self.message
        )
    }
}
