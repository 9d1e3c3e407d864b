//! Last-resort conversion: document text under a title heading
//!
//! Used when neither pandoc nor the in-process converter produced anything.
//! It cannot fail: any string parses as an HTML document.

use scraper::{Html, Selector};

use crate::utils::DEFAULT_DOCUMENT_TITLE;

/// Elements whose text is never reader-visible
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Render `# {title}\n\n{text}` from an HTML document
///
/// The title is the trimmed `<title>` text, or `Scraped Content` when missing
/// or blank. The text is every visible text node, trimmed, joined by blank lines.
#[must_use]
pub fn extract_plain_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
        })
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| DEFAULT_DOCUMENT_TITLE.to_string());

    let blocks: Vec<&str> = document
        .root_element()
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| INVISIBLE_TAGS.contains(&el.name()))
            })
        })
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect();

    format!("# {title}\n\n{}", blocks.join("\n\n"))
}
