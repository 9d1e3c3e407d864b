//! Shared configuration constants for markscrape
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// URI scheme owned by this server for scraped resources
///
/// Every resource identity is `scrape://<uuid>`. Reads for any other scheme
/// are rejected at the protocol boundary.
pub const RESOURCE_SCHEME: &str = "scrape";

/// Prefix form of [`RESOURCE_SCHEME`] used when building and checking URIs
pub const RESOURCE_URI_PREFIX: &str = "scrape://";

/// Scheme prepended to scrape targets that carry no `http://` or `https://` prefix
pub const DEFAULT_URL_SCHEME: &str = "https://";

/// MIME type recorded for every resource produced by the scrape tool
pub const MARKDOWN_MIME_TYPE: &str = "text/markdown";

/// Name of the single tool exposed by the server
pub const SCRAPE_TOOL_NAME: &str = "scrape_to_markdown";

/// Default timeout for navigation plus page load: 30 seconds
///
/// Exceeding it is a renderer failure, which the orchestrator turns into a
/// degraded artifact rather than a protocol error.
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 30;

/// Default timeout for one external pandoc conversion: 60 seconds
///
/// Pandoc on a multi-megabyte page normally finishes in a few seconds.
/// When the limit is hit the child is killed and the converter falls through
/// to the in-process backend.
pub const DEFAULT_PANDOC_TIMEOUT_SECS: u64 = 60;

/// Capacity of the resource event broadcast channel
///
/// Events are tiny (a URI plus subscriber tokens) and are drained by a single
/// notifier task, so a few hundred slots absorb any realistic burst.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Title used by the plain-text fallback when the document has no `<title>`
pub const DEFAULT_DOCUMENT_TITLE: &str = "Scraped Content";

/// Suffix appended to the browser user agent so site operators can identify us
pub const USER_AGENT_SUFFIX: &str = concat!("kodegen-markscrape/", env!("CARGO_PKG_VERSION"));
