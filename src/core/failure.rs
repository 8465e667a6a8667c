//! Reporting channel for write failures
//!
//! A failed write must never reach the caller of `log`, but it must not
//! vanish either. The service hands every such error to a callback; the
//! default prints it to stderr, tests can install their own.

use super::error::LoggerError;
use std::sync::Arc;

/// Callback type for write failure notifications
///
/// Invoked with the service lock held, so it must not log through the same
/// service.
pub type FailureCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Default reporter: one `[LOGGER ERROR]` line on stderr per failure
pub fn stderr_reporter() -> FailureCallback {
    Arc::new(|err: &LoggerError| {
        eprintln!("[LOGGER ERROR] Failed to write log: {}", err);
    })
}
