//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod failure;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod timestamp;

pub use appender::Appender;
pub use config::LogConfig;
pub use error::{LoggerError, Result};
pub use failure::{stderr_reporter, FailureCallback};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{LogService, LogServiceBuilder};
pub use metrics::LoggerMetrics;
