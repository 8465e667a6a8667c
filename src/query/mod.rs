//! Log query engine
//!
//! Reads a log file written by [`LogService`](crate::LogService), keeps the
//! lines that satisfy the time bounds and level filter, and returns the most
//! recent `limit` of them in file order.
//!
//! Filtering rules:
//! - `since` and `until` are inclusive.
//! - The level filter is a case-sensitive *substring* match on the level
//!   token, so `"R"` selects both `WARN` and `ERROR`.
//! - Lines that do not parse are skipped silently; a truncated final line
//!   from an in-progress write is one of them.

mod parser;

pub use parser::{parse_line, LogRecord, ParsedLine};

use crate::core::timestamp::parse_timestamp;
use crate::core::{LoggerError, Result};
use chrono::NaiveDateTime;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Default number of lines returned by a query
pub const DEFAULT_LIMIT: usize = 100;

/// Parsed, inclusive time window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeBounds {
    pub since: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
}

impl TimeBounds {
    /// Parse optional bound strings, naming the offending bound on error
    pub fn parse(since: Option<&str>, until: Option<&str>) -> Result<Self> {
        Ok(Self {
            since: Self::parse_bound("since", since)?,
            until: Self::parse_bound("until", until)?,
        })
    }

    fn parse_bound(bound: &'static str, value: Option<&str>) -> Result<Option<NaiveDateTime>> {
        match value {
            None => Ok(None),
            Some(text) => parse_timestamp(text)
                .map(Some)
                .ok_or_else(|| LoggerError::invalid_time_bound(bound, text)),
        }
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        if self.since.is_some_and(|since| *timestamp < since) {
            return false;
        }
        if self.until.is_some_and(|until| *timestamp > until) {
            return false;
        }
        true
    }
}

/// Result of running a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Nothing has been logged at this path yet
    NoLogFile(PathBuf),
    /// Matching lines, oldest first
    Lines(Vec<String>),
}

impl QueryOutcome {
    pub fn lines(&self) -> &[String] {
        match self {
            QueryOutcome::NoLogFile(_) => &[],
            QueryOutcome::Lines(lines) => lines,
        }
    }

    /// Parsed view of the matching lines
    pub fn records(&self) -> Vec<LogRecord> {
        self.lines()
            .iter()
            .filter_map(|line| parse_line(line))
            .map(|parsed| parsed.to_record())
            .collect()
    }
}

/// Filter and tail parameters for one query
///
/// # Example
///
/// ```no_run
/// use fg_logger::query::{LogQuery, QueryOutcome};
///
/// let outcome = LogQuery::new()
///     .limit(20)
///     .level("ERROR")
///     .since("2024-05-01 00:00:00")
///     .run("/home/ana/.fg/logs/app.log")
///     .unwrap();
///
/// if let QueryOutcome::Lines(lines) = outcome {
///     for line in lines {
///         println!("{}", line);
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    limit: usize,
    level: Option<String>,
    since: Option<String>,
    until: Option<String>,
}

impl LogQuery {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            level: None,
            since: None,
            until: None,
        }
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Substring to look for in the level token; empty means no filter
    #[must_use]
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into()).filter(|l| !l.is_empty());
        self
    }

    /// Inclusive lower bound, `YYYY-MM-DD HH:MM:SS`
    #[must_use]
    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// Inclusive upper bound, `YYYY-MM-DD HH:MM:SS`
    #[must_use]
    pub fn until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }

    /// Run against the file at `path`
    ///
    /// Bounds are validated before the file is touched. A missing file is
    /// [`QueryOutcome::NoLogFile`], not an error.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<QueryOutcome> {
        let path = path.as_ref();
        let bounds = self.bounds()?;

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(QueryOutcome::NoLogFile(path.to_path_buf()));
            }
            Err(e) => {
                return Err(LoggerError::io_operation(
                    "reading log file",
                    format!("cannot open '{}'", path.display()),
                    e,
                ));
            }
        };

        let lines = self
            .collect_matching(BufReader::new(file), &bounds)
            .map_err(|e| {
                LoggerError::io_operation(
                    "reading log file",
                    format!("cannot read '{}'", path.display()),
                    e,
                )
            })?;
        Ok(QueryOutcome::Lines(lines))
    }

    /// Run against any buffered source of log text
    pub fn filter_reader<R: BufRead>(&self, reader: R) -> Result<Vec<String>> {
        let bounds = self.bounds()?;
        Ok(self.collect_matching(reader, &bounds)?)
    }

    fn bounds(&self) -> Result<TimeBounds> {
        TimeBounds::parse(self.since.as_deref(), self.until.as_deref())
    }

    /// Whether a single line passes every filter
    pub fn matches(&self, line: &str, bounds: &TimeBounds) -> bool {
        let Some(parsed) = parse_line(line) else {
            return false;
        };
        if !bounds.contains(&parsed.timestamp) {
            return false;
        }
        match self.level.as_deref() {
            None => true,
            Some(wanted) => parsed.level.is_some_and(|token| token.contains(wanted)),
        }
    }

    fn collect_matching<R: BufRead>(
        &self,
        mut reader: R,
        bounds: &TimeBounds,
    ) -> io::Result<Vec<String>> {
        if self.limit == 0 {
            return Ok(Vec::new());
        }
        let mut tail: VecDeque<String> = VecDeque::with_capacity(self.limit.min(DEFAULT_LIMIT));

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
            }
            if buf.is_empty() {
                continue;
            }

            let line = String::from_utf8_lossy(&buf);
            if !self.matches(&line, bounds) {
                continue;
            }

            if tail.len() == self.limit {
                tail.pop_front();
            }
            tail.push_back(line.into_owned());
        }

        Ok(tail.into())
    }
}

impl Default for LogQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
[2024-01-01 10:00:00] [DEBUG] boot
[2024-01-01 10:00:05] [INFO] listening on :8080
[2024-01-01 10:01:00] [WARN] slow request
[2024-01-01 10:02:00] [ERROR] upstream timeout
";

    fn run(query: &LogQuery) -> Vec<String> {
        query.filter_reader(Cursor::new(SAMPLE)).unwrap()
    }

    #[test]
    fn test_no_filters_returns_everything_in_order() {
        let lines = run(&LogQuery::new());
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("boot"));
        assert!(lines[3].ends_with("upstream timeout"));
    }

    #[test]
    fn test_level_filter_is_substring_match() {
        let lines = run(&LogQuery::new().level("R"));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[WARN]"));
        assert!(lines[1].contains("[ERROR]"));

        let lines = run(&LogQuery::new().level("INFO"));
        assert_eq!(lines.len(), 1);

        // Case-sensitive
        assert!(run(&LogQuery::new().level("info")).is_empty());
    }

    #[test]
    fn test_empty_level_means_no_filter() {
        assert_eq!(run(&LogQuery::new().level("")).len(), 4);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let lines = run(
            &LogQuery::new()
                .since("2024-01-01 10:00:05")
                .until("2024-01-01 10:01:00"),
        );
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("listening"));
        assert!(lines[1].contains("slow request"));

        let lines = run(&LogQuery::new().since("2024-01-01 10:00:06"));
        assert_eq!(lines.len(), 2);
        let lines = run(&LogQuery::new().until("2024-01-01 10:00:04"));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_limit_keeps_most_recent() {
        let lines = run(&LogQuery::new().limit(2));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("slow request"));
        assert!(lines[1].contains("upstream timeout"));

        assert!(run(&LogQuery::new().limit(0)).is_empty());
    }

    #[test]
    fn test_malformed_bounds_fail() {
        let err = LogQuery::new()
            .since("2024-01-01")
            .filter_reader(Cursor::new(SAMPLE))
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidTimeBound { bound: "since", .. }));

        let err = LogQuery::new()
            .until("tomorrow")
            .filter_reader(Cursor::new(SAMPLE))
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidTimeBound { bound: "until", .. }));
        assert!(err.to_string().contains("YYYY-MM-DD HH:MM:SS"));
    }

    #[test]
    fn test_non_canonical_bounds_fail() {
        for bound in ["2024-1-1 1:0:0", "2024-01-0110:00:00", "2024-01-01 10:00:60"] {
            let err = LogQuery::new()
                .since(bound)
                .filter_reader(Cursor::new(SAMPLE))
                .unwrap_err();
            assert!(
                matches!(err, LoggerError::InvalidTimeBound { bound: "since", .. }),
                "accepted {:?}",
                bound
            );
        }
    }

    #[test]
    fn test_non_canonical_line_timestamp_is_skipped() {
        let text = "[2024-1-1 1:0:0] [INFO] x\n[2024-01-01 01:00:00] [INFO] y\n";
        let lines = LogQuery::new().filter_reader(Cursor::new(text)).unwrap();
        assert_eq!(lines, vec!["[2024-01-01 01:00:00] [INFO] y".to_string()]);
    }

    #[test]
    fn test_lines_without_level_token_and_level_filter() {
        let text = "[2024-01-01 10:00:00] free form\n[2024-01-01 10:00:01] [INFO] ok\n";
        let all = LogQuery::new().filter_reader(Cursor::new(text)).unwrap();
        assert_eq!(all.len(), 2);
        let info = LogQuery::new().level("INFO").filter_reader(Cursor::new(text)).unwrap();
        assert_eq!(info, vec!["[2024-01-01 10:00:01] [INFO] ok".to_string()]);
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut bytes = b"[2024-01-01 10:00:00] [INFO] caf".to_vec();
        bytes.extend_from_slice(&[0xff, b'\n']);
        bytes.extend_from_slice(b"[2024-01-01 10:00:01] [INFO] plain\n");

        let lines = LogQuery::new().filter_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains('\u{FFFD}'));
    }

    #[test]
    fn test_records() {
        let outcome = QueryOutcome::Lines(run(&LogQuery::new().level("ERROR")));
        let records = outcome.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level.as_deref(), Some("ERROR"));
        assert_eq!(records[0].message, "upstream timeout");

        assert!(QueryOutcome::NoLogFile(PathBuf::from("/nope")).records().is_empty());
    }

    #[test]
    fn test_time_bounds_contains() {
        let bounds = TimeBounds::parse(Some("2024-01-01 00:00:00"), None).unwrap();
        assert!(bounds.contains(&parse_timestamp("2024-01-01 00:00:00").unwrap()));
        assert!(!bounds.contains(&parse_timestamp("2023-12-31 23:59:59").unwrap()));
        assert!(TimeBounds::default().contains(&parse_timestamp("1970-01-01 00:00:00").unwrap()));
    }
}
