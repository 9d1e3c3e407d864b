//! Fluent builder for `ScraperConfig`
//!
//! Every field has a default, so `build()` only validates values instead of
//! checking for required fields.

use anyhow::{Result, bail};
use std::path::PathBuf;

use super::types::{PandocConfig, ScraperConfig};

#[derive(Debug, Clone, Default)]
pub struct ScraperConfigBuilder {
    config: ScraperConfig,
}

impl ScraperConfig {
    /// Start building a configuration from defaults
    #[must_use]
    pub fn builder() -> ScraperConfigBuilder {
        ScraperConfigBuilder::default()
    }
}

impl ScraperConfigBuilder {
    #[must_use]
    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.config.navigation_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_executable(mut self, path: Option<PathBuf>) -> Self {
        self.config.chrome_executable = path;
        self
    }

    #[must_use]
    pub fn user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.user_agent_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn pandoc_enabled(mut self, enabled: bool) -> Self {
        self.config.pandoc.enabled = enabled;
        self
    }

    #[must_use]
    pub fn pandoc_executable(mut self, path: Option<PathBuf>) -> Self {
        self.config.pandoc.executable = path;
        self
    }

    #[must_use]
    pub fn pandoc_timeout_secs(mut self, secs: u64) -> Self {
        self.config.pandoc.timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn pandoc_install_command(mut self, command: Option<String>) -> Self {
        self.config.pandoc.install_command = command.filter(|c| !c.trim().is_empty());
        self
    }

    #[must_use]
    pub fn pandoc(mut self, pandoc: PandocConfig) -> Self {
        self.config.pandoc = pandoc;
        self
    }

    #[must_use]
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    /// Validate and produce the configuration
    ///
    /// # Errors
    ///
    /// Returns an error when a timeout or the event capacity is zero.
    pub fn build(self) -> Result<ScraperConfig> {
        let config = self.config;
        if config.navigation_timeout_secs == 0 {
            bail!("navigation timeout must be at least one second");
        }
        if config.pandoc.timeout_secs == 0 {
            bail!("pandoc timeout must be at least one second");
        }
        if config.event_capacity == 0 {
            bail!("event capacity must be non-zero");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults_match_reference_behavior() {
        let config = ScraperConfig::builder().build().expect("defaults are valid");
        assert_eq!(config.navigation_timeout(), Duration::from_secs(30));
        assert!(config.headless());
        assert!(config.pandoc().enabled());
        assert_eq!(config.pandoc().timeout(), Duration::from_secs(60));
        assert!(config.user_agent_suffix().starts_with("kodegen-markscrape/"));
    }

    #[test]
    fn overrides_apply() {
        let config = ScraperConfig::builder()
            .navigation_timeout_secs(5)
            .headless(false)
            .pandoc_enabled(false)
            .pandoc_install_command(Some("   ".into()))
            .event_capacity(8)
            .build()
            .expect("valid config");
        assert_eq!(config.navigation_timeout(), Duration::from_secs(5));
        assert!(!config.headless());
        assert!(!config.pandoc().enabled());
        assert_eq!(config.pandoc().install_command(), None);
        assert_eq!(config.event_capacity(), 8);
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        assert!(ScraperConfig::builder().navigation_timeout_secs(0).build().is_err());
        assert!(ScraperConfig::builder().pandoc_timeout_secs(0).build().is_err());
        assert!(ScraperConfig::builder().event_capacity(0).build().is_err());
    }
}
