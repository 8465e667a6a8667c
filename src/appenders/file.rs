//! File appender implementation

use crate::core::{Appender, LogEntry, LoggerError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};

#[cfg(unix)]
const DIR_MODE: u32 = 0o700;
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Appends entries to a single file, never truncating it
///
/// The handle is deliberately unbuffered: every entry reaches the OS as one
/// `write_all` of the complete line, so a concurrent reader sees either the
/// whole line or none of it.
#[derive(Debug)]
pub struct FileAppender {
    path: PathBuf,
    file: Option<File>,
}

impl FileAppender {
    /// Open `path` for appending, creating the file if absent
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = Self::open_append(&path)?;

        Ok(Self {
            path,
            file: Some(file),
        })
    }

    /// Like [`FileAppender::new`], but creates missing parent directories first
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fg_logger::appenders::FileAppender;
    ///
    /// let appender = FileAppender::create_with_parents("/tmp/fg/logs/app.log").unwrap();
    /// assert_eq!(appender.path().file_name().unwrap(), "app.log");
    /// ```
    pub fn create_with_parents(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            Self::create_dir(dir)?;
        }
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    fn create_dir(dir: &Path) -> Result<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(DIR_MODE);

        builder.create(dir).map_err(|e| {
            LoggerError::io_operation(
                "creating log directory",
                format!("cannot create '{}'", dir.display()),
                e,
            )
        })
    }

    fn open_append(path: &Path) -> Result<File> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        options.mode(FILE_MODE);

        options.open(path).map_err(|e| {
            LoggerError::io_operation(
                "opening log file",
                format!("cannot open '{}'", path.display()),
                e,
            )
        })
    }
}

impl Appender for FileAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer already closed"))?;

        file.write_all(entry.to_line().as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let file = self
            .file
            .take()
            .ok_or_else(|| LoggerError::writer("File writer already closed"))?;

        file.sync_all().map_err(|e| {
            LoggerError::file_appender(self.path.display().to_string(), e.to_string())
        })
    }

    fn name(&self) -> &str {
        "file"
    }
}
