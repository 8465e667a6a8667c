//! Log file location and threshold configuration

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the log file path
pub const ENV_LOG_FILE: &str = "FG_LOG_FILE";
/// Environment variable overriding the minimum level
pub const ENV_LOG_LEVEL: &str = "FG_LOG_LEVEL";

const APP_DIR: &str = ".fg";
const LOGS_DIR: &str = "logs";
const LOG_FILE_NAME: &str = "app.log";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub log_path: PathBuf,
    #[serde(default)]
    pub min_level: LogLevel,
}

impl LogConfig {
    /// `{home}/.fg/logs/app.log` at the default level
    pub fn from_home() -> Result<Self> {
        let base_dirs = directories::BaseDirs::new().ok_or(LoggerError::HomeDirUnavailable)?;
        Ok(Self::under_home(base_dirs.home_dir()))
    }

    /// Home based defaults with `FG_LOG_FILE` / `FG_LOG_LEVEL` applied
    pub fn from_env() -> Result<Self> {
        Self::from_home()?.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Layout of the log file below an arbitrary home directory
    pub fn under_home(home: &Path) -> Self {
        Self {
            log_path: home.join(APP_DIR).join(LOGS_DIR).join(LOG_FILE_NAME),
            min_level: LogLevel::default(),
        }
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_LOG_FILE).filter(|p| !p.trim().is_empty()) {
            self.log_path = PathBuf::from(path);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.min_level = level
                .parse()
                .map_err(|msg: String| LoggerError::config(ENV_LOG_LEVEL, msg))?;
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Directory holding the log file
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_path.parent()
    }
}
