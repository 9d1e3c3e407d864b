//! Configuration module for the scrape server
//!
//! This module provides the `ScraperConfig` struct and its builder for
//! configuring rendering and conversion with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod types;

// Re-exports for public API
pub use builder::ScraperConfigBuilder;
pub use types::{PandocConfig, ScraperConfig};
