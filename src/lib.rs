//! # fg_logger
//!
//! Leveled application logging to a single file, and a query engine that
//! reads the file back filtered by level and time range.
//!
//! ## Features
//!
//! - **One line per entry**: `[YYYY-MM-DD HH:MM:SS] [LEVEL] message`
//! - **Thread Safe**: one lock serializes writes, threshold changes and close
//! - **Never fails the caller**: write errors go to a replaceable failure callback
//! - **Tolerant reader**: malformed or truncated lines are skipped, not fatal

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;
pub mod query;

pub mod prelude {
    pub use crate::appenders::FileAppender;
    pub use crate::core::{
        Appender, FailureCallback, LogConfig, LogEntry, LogLevel, LogService, LogServiceBuilder,
        LoggerError, LoggerMetrics, Result,
    };
    pub use crate::query::{LogQuery, QueryOutcome};
}

pub use appenders::FileAppender;
pub use core::{
    Appender, FailureCallback, LogConfig, LogEntry, LogLevel, LogService, LogServiceBuilder,
    LoggerError, LoggerMetrics, Result,
};
pub use query::{LogQuery, QueryOutcome};
