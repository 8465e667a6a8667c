//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

pub trait Appender: Send + Sync {
    /// Persist one entry; implementations must emit the whole line at once
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    /// Release the underlying handle. Later calls to `append` fail.
    fn close(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
