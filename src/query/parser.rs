//! Parsing of persisted log lines
//!
//! The inverse of [`LogEntry::to_line`](crate::core::LogEntry::to_line).
//! Anything that does not fit the layout yields `None`; callers skip such
//! lines rather than fail.

use crate::core::timestamp::{format_timestamp, parse_timestamp};
use chrono::NaiveDateTime;
use serde::Serialize;

/// A borrowed view of one well-formed log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub raw: &'a str,
    pub timestamp: NaiveDateTime,
    /// Text between the brackets of the level token, if present
    pub level: Option<&'a str>,
    pub message: &'a str,
}

impl ParsedLine<'_> {
    pub fn to_record(&self) -> LogRecord {
        LogRecord {
            timestamp: format_timestamp(&self.timestamp),
            level: self.level.map(str::to_owned),
            message: self.message.to_owned(),
        }
    }
}

/// Owned, serializable form of a parsed line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub message: String,
}

/// Parse `[YYYY-MM-DD HH:MM:SS] [LEVEL] message`
///
/// # Examples
///
/// ```
/// use fg_logger::query::parse_line;
///
/// let line = parse_line("[2024-05-01 12:00:00] [WARN] low disk [sda1]").unwrap();
/// assert_eq!(line.level, Some("WARN"));
/// assert_eq!(line.message, "low disk [sda1]");
///
/// assert!(parse_line("[2024-05-01 12:00:00]").is_none());
/// ```
pub fn parse_line(line: &str) -> Option<ParsedLine<'_>> {
    let mut parts = line.splitn(3, ' ');
    let date = parts.next()?;
    let time = parts.next()?;
    let rest = parts.next()?;

    let date = date.strip_prefix('[')?;
    let time = time.strip_suffix(']')?;
    let timestamp = parse_timestamp(&format!("{} {}", date, time))?;

    let (level, message) = split_level(rest);

    Some(ParsedLine {
        raw: line,
        timestamp,
        level,
        message,
    })
}

fn split_level(rest: &str) -> (Option<&str>, &str) {
    let Some(inner) = rest.strip_prefix('[') else {
        return (None, rest);
    };
    match inner.find(']') {
        Some(end) => {
            let message = &inner[end + 1..];
            (Some(&inner[..end]), message.strip_prefix(' ').unwrap_or(message))
        }
        None => (None, rest),
    }
}
