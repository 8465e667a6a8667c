//! Property-based tests for fg_logger using proptest

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fg_logger::core::timestamp::{format_timestamp, parse_timestamp};
use fg_logger::prelude::*;
use fg_logger::query::parse_line;
use proptest::prelude::*;
use std::io::Cursor;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
    ]
}

fn any_timestamp() -> impl Strategy<Value = NaiveDateTime> {
    // 2000-01-01 through roughly 2060
    (0i64..1_900_000_000).prop_map(|secs| {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid datetime")
            + Duration::seconds(secs)
    })
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
        prop_assert_eq!(format!("{}", level), level.to_str());
    }

    /// Test that LogLevel ordering matches the discriminants
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        prop_assert_eq!(level1 < level2, val1 < val2);
        prop_assert_eq!(level1 >= level2, val1 >= val2);
    }

    /// Threshold rule: a write survives iff its level is at least the minimum
    #[test]
    fn test_threshold_rule(min in any_level(), level in any_level()) {
        let logger = LogService::builder().min_level(min).build();
        logger.log(level, "threshold check");
        let filtered = logger.metrics().filtered_count() == 1;
        prop_assert_eq!(filtered, level < min);
    }
}

// ============================================================================
// Line Format Tests
// ============================================================================

proptest! {
    /// Whatever the message, a rendered entry parses back to the same parts
    #[test]
    fn test_entry_line_parses_back(
        level in any_level(),
        ts in any_timestamp(),
        message in "[^\n\r]{0,200}",
    ) {
        let entry = LogEntry::new(level, &message).with_timestamp(ts);
        let line = entry.to_line();
        let line = line.strip_suffix('\n').unwrap();

        let parsed = parse_line(line).expect("rendered entries always parse");
        prop_assert_eq!(parsed.timestamp, ts);
        prop_assert_eq!(parsed.level, Some(level.to_str()));
        prop_assert_eq!(parsed.message, message.as_str());
    }

    /// Messages with line breaks still occupy exactly one line
    #[test]
    fn test_entry_is_single_line(message in "\\PC{0,50}(\n|\r\n)\\PC{0,50}") {
        let entry = LogEntry::new(LogLevel::Info, &message);
        prop_assert_eq!(entry.to_line().matches('\n').count(), 1);
        prop_assert!(!entry.to_line().contains('\r'));
    }

    /// Timestamps survive format/parse
    #[test]
    fn test_timestamp_roundtrip(ts in any_timestamp()) {
        prop_assert_eq!(parse_timestamp(&format_timestamp(&ts)), Some(ts));
    }

    /// Arbitrary garbage never makes a query fail
    #[test]
    fn test_query_never_fails_on_garbage(content in "\\PC*(\n\\PC*){0,20}") {
        let result = LogQuery::new().level("R").filter_reader(Cursor::new(content));
        prop_assert!(result.is_ok());
    }
}

// ============================================================================
// Query Tests
// ============================================================================

proptest! {
    /// The result is the last `limit` matches, in file order
    #[test]
    fn test_query_is_tail_of_matches(
        levels in prop::collection::vec(any_level(), 0..120),
        limit in 0usize..150,
    ) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid datetime");

        let mut content = String::new();
        for (i, level) in levels.iter().enumerate() {
            let entry = LogEntry::new(*level, format!("n{}", i))
                .with_timestamp(start + Duration::seconds(i as i64));
            content.push_str(&entry.to_line());
        }

        let matching: Vec<String> = content
            .lines()
            .filter(|l| l.contains("[WARN]") || l.contains("[ERROR]"))
            .map(str::to_owned)
            .collect();
        let expected = matching[matching.len().saturating_sub(limit)..].to_vec();

        let actual = LogQuery::new()
            .level("R")
            .limit(limit)
            .filter_reader(Cursor::new(content))
            .unwrap();
        prop_assert_eq!(actual, expected);
    }
}
