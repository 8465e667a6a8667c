//! Main logger implementation

use super::{
    appender::Appender,
    config::LogConfig,
    error::{LoggerError, Result},
    failure::{stderr_reporter, FailureCallback},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use crate::appenders::FileAppender;
use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;

struct LoggerState {
    min_level: LogLevel,
    appenders: Vec<Box<dyn Appender>>,
    closed: bool,
}

/// Leveled, thread-safe log sink
///
/// One mutex guards the threshold, the appenders and the closed flag, so a
/// write never interleaves with another write, a threshold change or `close`.
pub struct LogService {
    state: Mutex<LoggerState>,
    metrics: LoggerMetrics,
    on_failure: FailureCallback,
}

impl LogService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LoggerState {
                min_level: LogLevel::default(),
                appenders: Vec::new(),
                closed: false,
            }),
            metrics: LoggerMetrics::new(),
            on_failure: stderr_reporter(),
        }
    }

    /// Service appending to `path`, creating its directory if needed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let appender = FileAppender::create_with_parents(path)?;
        Ok(Self::builder().appender(appender).build())
    }

    /// Service for the configured log file and threshold
    pub fn from_config(config: &LogConfig) -> Result<Self> {
        let appender = FileAppender::create_with_parents(&config.log_path)?;
        Ok(Self::builder()
            .min_level(config.min_level)
            .appender(appender)
            .build())
    }

    /// Service for `~/.fg/logs/app.log`, honouring environment overrides
    pub fn initialize() -> Result<Self> {
        Self::from_config(&LogConfig::from_env()?)
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.state.lock().appenders.push(appender);
    }

    pub fn set_level(&self, level: LogLevel) {
        self.state.lock().min_level = level;
    }

    pub fn min_level(&self) -> LogLevel {
        self.state.lock().min_level
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Write one entry if `level` passes the threshold
    ///
    /// `message` is only rendered after the threshold check, so passing
    /// `format_args!` costs nothing for filtered calls. Write failures go to
    /// the failure callback and are never returned.
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        let mut state = self.state.lock();

        if level < state.min_level {
            self.metrics.record_filtered();
            return;
        }

        if state.closed {
            self.metrics.record_failed();
            (self.on_failure)(&LoggerError::LoggerStopped);
            return;
        }

        let entry = LogEntry::new(level, message.to_string());
        let mut has_error = false;
        for appender in state.appenders.iter_mut() {
            if let Err(e) = appender.append(&entry) {
                (self.on_failure)(&e);
                has_error = true;
            }
        }

        if has_error {
            self.metrics.record_failed();
        } else {
            self.metrics.record_logged();
        }
    }

    #[inline]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message);
    }

    pub fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        for appender in state.appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    /// Release every appender's file handle
    ///
    /// All appenders are closed even if one fails; the first error is
    /// returned. Closing an already closed service yields
    /// [`LoggerError::LoggerStopped`].
    pub fn close(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(LoggerError::LoggerStopped);
        }
        state.closed = true;

        let mut first_err = None;
        for appender in state.appenders.iter_mut() {
            let result = appender.flush().and_then(|()| appender.close());
            if let Err(e) = result {
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Get the logger metrics
    ///
    /// # Example
    ///
    /// ```
    /// use fg_logger::{LogLevel, LogService};
    ///
    /// let logger = LogService::new();
    /// logger.set_level(LogLevel::Warn);
    /// logger.info("below threshold");
    ///
    /// assert_eq!(logger.metrics().filtered_count(), 1);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl Default for LogService {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LogService {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Builder for constructing LogService with a fluent API
///
/// # Example
/// ```no_run
/// use fg_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = LogService::builder()
///     .min_level(LogLevel::Debug)
///     .appender(FileAppender::new("app.log").unwrap())
///     .on_failure(Arc::new(|err| eprintln!("log write failed: {}", err)))
///     .build();
/// logger.debug("ready");
/// ```
pub struct LogServiceBuilder {
    min_level: LogLevel,
    appenders: Vec<Box<dyn Appender>>,
    on_failure: Option<FailureCallback>,
}

impl LogServiceBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::default(),
            appenders: Vec::new(),
            on_failure: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Replace the stderr reporter used for write failures
    #[must_use = "builder methods return a new value"]
    pub fn on_failure(mut self, callback: FailureCallback) -> Self {
        self.on_failure = Some(callback);
        self
    }

    pub fn build(self) -> LogService {
        LogService {
            state: Mutex::new(LoggerState {
                min_level: self.min_level,
                appenders: self.appenders,
                closed: false,
            }),
            metrics: LoggerMetrics::new(),
            on_failure: self.on_failure.unwrap_or_else(stderr_reporter),
        }
    }
}

impl Default for LogServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LogService {
    #[must_use]
    pub fn builder() -> LogServiceBuilder {
        LogServiceBuilder::new()
    }
}
