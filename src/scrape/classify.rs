//! HTML vs. non-HTML classification of rendered content

use regex::RegexSet;
use std::sync::LazyLock;

/// Tokens whose presence anywhere in a body marks it as HTML
static HTML_MARKERS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)<!DOCTYPE\s+html",
        r"(?i)<html",
        r"(?i)<head",
        r"(?i)<body",
        r"(?i)<div",
        r"(?i)<p>",
        r"(?i)<a\s+href=",
    ])
    .expect("HTML_MARKERS: hardcoded regex set is valid")
});

/// Which conversion path a document takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Text,
}

/// Whether a content-type hint names an HTML document
#[must_use]
pub fn is_html_content_type(content_type: &str) -> bool {
    let bare = content_type.split(';').next().unwrap_or_default().trim();
    bare.eq_ignore_ascii_case("text/html") || bare.eq_ignore_ascii_case("application/xhtml+xml")
}

/// Whether the body contains any HTML-indicative token
#[must_use]
pub fn looks_like_html(content: &str) -> bool {
    HTML_MARKERS.is_match(content)
}

/// An HTML hint is trusted; anything else falls through to sniffing the body
#[must_use]
pub fn classify(content: &str, content_type: Option<&str>) -> ContentKind {
    if content_type.is_some_and(is_html_content_type) || looks_like_html(content) {
        ContentKind::Html
    } else {
        ContentKind::Text
    }
}
