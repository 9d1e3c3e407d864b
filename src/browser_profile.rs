//! Per-launch Chrome profile directories
//!
//! Every scrape launches its own browser, and every browser gets its own
//! UUID-named user data directory. Sharing a profile between concurrent
//! launches makes Chrome fail on its SingletonLock.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Prefix for every profile directory this crate creates under the temp dir
pub const PROFILE_PREFIX: &str = "markscrape_chrome";

/// RAII wrapper for a Chrome profile directory
///
/// Removes the directory on drop. Drop runs on every exit path of a scrape,
/// including cancellation, so profiles never accumulate in temp.
#[derive(Debug)]
pub struct BrowserProfile {
    path: PathBuf,
}

impl BrowserProfile {
    /// Get reference to the profile directory path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BrowserProfile {
    fn drop(&mut self) {
        if self.path.exists() {
            debug!("BrowserProfile cleanup: removing {}", self.path.display());
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                warn!(
                    "Failed to cleanup profile directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Create a unique profile directory using UUID v4
///
/// Uses `create_dir` rather than `create_dir_all` so a (theoretical) UUID
/// collision fails loudly instead of sharing a directory.
pub fn create_unique_profile() -> Result<BrowserProfile> {
    let path = std::env::temp_dir().join(format!("{PROFILE_PREFIX}_{}", Uuid::new_v4()));

    std::fs::create_dir(&path)
        .with_context(|| format!("Failed to create profile directory: {}", path.display()))?;

    debug!("Created Chrome profile directory: {}", path.display());
    Ok(BrowserProfile { path })
}
