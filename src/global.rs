//! Process-wide log service
//!
//! Prefer constructing a [`LogService`] at startup and passing it (or an
//! `Arc` of it) to the components that log. This module covers call sites
//! that cannot be reached that way: it holds at most one service per
//! process, built lazily on first use unless one was installed explicitly.

use crate::core::{LogService, Result};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

static SERVICE: OnceLock<Arc<LogService>> = OnceLock::new();
static INIT_GUARD: Mutex<()> = parking_lot::const_mutex(());

/// Install an explicitly constructed service
///
/// Returns the service back if one is already in place.
pub fn install(service: Arc<LogService>) -> std::result::Result<(), Arc<LogService>> {
    let _guard = INIT_GUARD.lock();
    SERVICE.set(service)
}

/// The process-wide service, constructing it from the environment on first use
///
/// Construction happens at most once; concurrent first callers wait on the
/// guard and then share the same instance. On failure nothing is stored, so
/// a later call retries.
pub fn try_global() -> Result<Arc<LogService>> {
    if let Some(service) = SERVICE.get() {
        return Ok(Arc::clone(service));
    }

    let _guard = INIT_GUARD.lock();
    if let Some(service) = SERVICE.get() {
        return Ok(Arc::clone(service));
    }

    let service = Arc::new(LogService::initialize()?);
    // Only this thread can set while holding the guard
    let _ = SERVICE.set(Arc::clone(&service));
    Ok(service)
}

/// Like [`try_global`], but initialization failure is fatal
///
/// # Panics
///
/// Panics if the home directory cannot be resolved, the log directory cannot
/// be created or the log file cannot be opened. Logging is a prerequisite
/// for the rest of the process.
pub fn global() -> Arc<LogService> {
    match try_global() {
        Ok(service) => service,
        Err(e) => panic!("Failed to initialize logging: {}", e),
    }
}
