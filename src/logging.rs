//! Logging for breedview
//!
//! The terminal UI owns stdout and stderr while it runs, so every event goes
//! to a log file instead. Records are written through `tracing`; the level
//! filter comes from `BREEDVIEW_LOG` (default `info`).
//!
//! Fetch failures are only ever reported here, never on screen.

use crate::error::{BreedViewError, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the level filter
pub const LOG_ENV: &str = "BREEDVIEW_LOG";

const LOG_FILE_NAME: &str = "breedview.log";

/// Log file chosen by `init`. `None` when no file could be opened.
static ACTIVE_LOG: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Default log file path (same directory as the executable)
pub fn default_log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}

/// Log file in the working directory, used when the preferred path is not writable
pub fn fallback_log_path() -> PathBuf {
    PathBuf::from(LOG_FILE_NAME)
}

fn open_truncated(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}

/// Open `preferred`, or `fallback` when that fails.
///
/// Returns the file with the path it was opened at, or `None` when neither
/// location is writable.
pub fn open_log_file(preferred: &Path, fallback: &Path) -> Option<(File, PathBuf)> {
    match open_truncated(preferred) {
        Ok(file) => Some((file, preferred.to_path_buf())),
        Err(_) if preferred == fallback => None,
        Err(_) => open_truncated(fallback)
            .ok()
            .map(|file| (file, fallback.to_path_buf())),
    }
}

/// Initialize the global file logger.
///
/// The file is truncated so every session starts fresh. When neither
/// `log_path` nor the working-directory fallback can be opened the program
/// runs without a log file and `Ok(None)` is returned. Calling `init` again
/// keeps the first outcome.
pub fn init(log_path: &Path) -> Result<Option<PathBuf>> {
    if let Some(active) = ACTIVE_LOG.get() {
        return Ok(active.clone());
    }

    let Some((file, opened_at)) = open_log_file(log_path, &fallback_log_path()) else {
        return Ok(ACTIVE_LOG.get_or_init(|| None).clone());
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| BreedViewError::Logging(e.to_string()))?;

    if opened_at != log_path {
        warn(
            "LOG",
            &format!(
                "{} is not writable, logging to {}",
                log_path.display(),
                opened_at.display()
            ),
        );
    }

    Ok(ACTIVE_LOG.get_or_init(|| Some(opened_at)).clone())
}

/// Log debug message
pub fn debug(module: &str, message: &str) {
    tracing::debug!(module = module, "{}", message);
}

/// Log info message
pub fn info(module: &str, message: &str) {
    tracing::info!(module = module, "{}", message);
}

/// Log warning message
pub fn warn(module: &str, message: &str) {
    tracing::warn!(module = module, "{}", message);
}

/// Log error message
pub fn error(module: &str, message: &str) {
    tracing::error!(module = module, "{}", message);
}

// ============================================================================
// Component-specific helpers
// ============================================================================

/// Log an outgoing page request
pub fn log_page_request(page: u32, limit: u32) {
    info("FETCH", &format!("Requesting page {} (limit {})", page, limit));
}

/// Log a page appended to the catalog
pub fn log_page_applied(page: u32, received: usize, total: usize) {
    info(
        "FETCH",
        &format!(
            "Page {}: appended {} records ({} total)",
            page, received, total
        ),
    );
}

/// Log a failed page fetch.
///
/// Recoverable failures only cost the session one page and are logged as
/// warnings.
pub fn log_page_failure(page: u32, err: &BreedViewError) {
    let message = format!("Error fetching page {}: {}", page, err);
    if err.is_recoverable() {
        warn("FETCH", &message);
    } else {
        error("FETCH", &message);
    }
}

/// Log a recomputed search
pub fn log_search(query: &str, matches: usize, total: usize) {
    debug(
        "SEARCH",
        &format!("Query '{}' matched {} of {} records", query, matches, total),
    );
}

/// Log a rating that could not be displayed
pub fn log_invalid_rating(breed: &str, field: &str, err: &BreedViewError) {
    warn("RATING", &format!("{} {}: {}", breed, field, err));
}

/// Write a separator line for readability
pub fn separator(label: &str) {
    let msg = format!("========== {} ==========", label);
    info("---", &msg);
}
