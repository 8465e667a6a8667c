//! Timestamp formatting utilities
//!
//! Log lines carry a second-resolution local wall-clock time in a single
//! fixed layout. The writer renders it and the query engine parses it back,
//! so both sides go through this module.

use chrono::{Local, NaiveDateTime, Timelike};

/// strftime layout of every persisted timestamp: `2025-01-08 10:30:45`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Human readable form of [`TIMESTAMP_FORMAT`], used in error messages
pub const TIMESTAMP_HINT: &str = "YYYY-MM-DD HH:MM:SS";

/// Current local time truncated to whole seconds
#[must_use]
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Render a timestamp in the persisted layout
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fg_logger::core::timestamp::format_timestamp;
///
/// let ts = NaiveDate::from_ymd_opt(2025, 1, 8)
///     .and_then(|d| d.and_hms_opt(10, 30, 45))
///     .unwrap();
/// assert_eq!(format_timestamp(&ts), "2025-01-08 10:30:45");
/// ```
#[must_use]
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp in the persisted layout, `None` if it does not match
///
/// Only the canonical zero-padded rendering is accepted; chrono alone would
/// also take unpadded fields, stray whitespace, signed years and `:60`.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let ts = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()?;
    // A parsed `:60` is a leap second, carried as nanosecond >= 1e9
    (ts.nanosecond() == 0 && format_timestamp(&ts) == s).then_some(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 8)
            .and_then(|d| d.and_hms_opt(10, 30, 45))
            .expect("valid datetime")
    }

    #[test]
    fn test_format_and_parse_agree() {
        let ts = fixed_datetime();
        let text = format_timestamp(&ts);
        assert_eq!(text, "2025-01-08 10:30:45");
        assert_eq!(parse_timestamp(&text), Some(ts));
    }

    #[test]
    fn test_parse_rejects_other_layouts() {
        assert_eq!(parse_timestamp("2025-01-08T10:30:45"), None);
        assert_eq!(parse_timestamp("2025-01-08"), None);
        assert_eq!(parse_timestamp("[2025-01-08 10:30:45]"), None);
        assert_eq!(parse_timestamp("2025-02-30 10:30:45"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_parse_rejects_non_canonical_text() {
        for text in [
            "2024-1-1 1:0:0",
            "2024-01-0110:00:00",
            " 2024-01-01 10:00:00",
            "2024-01-01   10:00:00",
            "+2024-01-01 10:00:00",
            "2024-01-01 10:00:60",
            "2024-01-01 10:00:00 ",
        ] {
            assert_eq!(parse_timestamp(text), None, "accepted {:?}", text);
        }
        assert!(parse_timestamp("2024-01-01 10:00:00").is_some());
    }

    #[test]
    fn test_now_has_second_resolution() {
        assert_eq!(now().nanosecond(), 0);
    }
}
