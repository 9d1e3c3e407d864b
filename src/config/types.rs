//! Core configuration types for the scrape server
//!
//! This module contains the main `ScraperConfig` struct and the pandoc
//! sub-configuration that define how pages are rendered and converted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::{
    DEFAULT_EVENT_CAPACITY, DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_PANDOC_TIMEOUT_SECS,
    USER_AGENT_SUFFIX,
};

/// Main configuration struct for scraping operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Timeout in seconds for `page.goto()` plus `page.wait_for_navigation()`
    ///
    /// Prevents hangs on slow DNS, unresponsive servers, or streaming content.
    /// A timeout is reported as a renderer failure.
    ///
    /// Default: 30 seconds
    pub(crate) navigation_timeout_secs: u64,

    /// Run Chrome without a window
    ///
    /// Default: true
    pub(crate) headless: bool,

    /// Explicit Chrome/Chromium executable, bypassing discovery
    pub(crate) chrome_executable: Option<PathBuf>,

    /// Appended to the browser's user agent (after stripping "Headless")
    pub(crate) user_agent_suffix: String,

    /// External converter settings
    pub(crate) pandoc: PandocConfig,

    /// Buffer size of the resource event bus
    pub(crate) event_capacity: usize,
}

/// Settings for the external pandoc converter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PandocConfig {
    /// Allow pandoc at all. When false the in-process converter is used directly.
    pub(crate) enabled: bool,

    /// Explicit pandoc binary. When unset, `pandoc` is looked up on `PATH`.
    pub(crate) executable: Option<PathBuf>,

    /// Kill a conversion that runs longer than this
    ///
    /// Default: 60 seconds
    pub(crate) timeout_secs: u64,

    /// Best-effort install command, run once through the shell when the
    /// first probe finds no pandoc. Its failure only disables pandoc.
    pub(crate) install_command: Option<String>,
}

impl Default for PandocConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            executable: None,
            timeout_secs: DEFAULT_PANDOC_TIMEOUT_SECS,
            install_command: None,
        }
    }
}

impl PandocConfig {
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn install_command(&self) -> Option<&str> {
        self.install_command.as_deref()
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            headless: true,
            chrome_executable: None,
            user_agent_suffix: USER_AGENT_SUFFIX.to_string(),
            pandoc: PandocConfig::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ScraperConfig {
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_executable(&self) -> Option<&Path> {
        self.chrome_executable.as_deref()
    }

    #[must_use]
    pub fn user_agent_suffix(&self) -> &str {
        &self.user_agent_suffix
    }

    #[must_use]
    pub fn pandoc(&self) -> &PandocConfig {
        &self.pandoc
    }

    #[must_use]
    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }
}
