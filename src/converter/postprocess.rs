//! Cleanup of pandoc's markdown output
//!
//! Pandoc leaves raw `<div>` wrappers in place for HTML it cannot map to
//! markdown, and keeps runs of whitespace-only lines between blocks.

use regex::Regex;
use std::sync::LazyLock;

/// A newline, any amount of whitespace (including more newlines), a newline
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*\n").expect("BLANK_RUN: hardcoded regex is valid")
});

/// Replace leftover div tags with whitespace and collapse blank-line runs
#[must_use]
pub fn clean_pandoc_markdown(markdown: &str) -> String {
    let without_divs = markdown.replace("</div>", "      ").replace("<div>", "     ");
    BLANK_RUN.replace_all(&without_divs, "\n\n").into_owned()
}
