//! URL manipulation utilities.
//!
//! This module provides the normalization applied to scrape targets before
//! they reach the renderer.

use super::constants::DEFAULT_URL_SCHEME;

/// Check whether a URL already carries a scheme the renderer understands
///
/// Only `http://` and `https://` count. Anything else (including bare hosts
/// like `example.com` or `localhost:8080`) gets the default scheme prepended.
#[must_use]
pub fn has_web_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Normalize a scrape target by prepending `https://` when no web scheme is present
///
/// The input is otherwise left untouched: no trimming, no path or case
/// rewriting. The caller keeps the original string for the resource record.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    if has_web_scheme(url) {
        url.to_string()
    } else {
        format!("{DEFAULT_URL_SCHEME}{url}")
    }
}

/// Check if a URL is valid for rendering
///
/// Rejects anything `url` cannot parse or that resolves to a non-web scheme.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}
