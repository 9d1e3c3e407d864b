//! HTML slimming ahead of markdown conversion
//!
//! Strips the parts of a page that only bloat the markdown: inline SVG,
//! images, `data:` URIs and every attribute other than `href`.

use lol_html::{HtmlRewriter, Settings, element};

use super::ConvertError;

/// Remove SVG, images, `data:` elements and non-`href` attributes
///
/// # Errors
///
/// Returns `ConvertError::Rewrite` if the streaming rewriter rejects the input.
pub fn slim_html(html: &str) -> Result<String, ConvertError> {
    let mut output = Vec::with_capacity(html.len());

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                element!("svg", |el| {
                    el.remove();
                    Ok(())
                }),
                element!("img", |el| {
                    el.remove();
                    Ok(())
                }),
                element!(r#"[href^="data:"]"#, |el| {
                    el.remove();
                    Ok(())
                }),
                element!(r#"[src^="data:"]"#, |el| {
                    el.remove();
                    Ok(())
                }),
                element!("*", |el| {
                    let names: Vec<String> = el
                        .attributes()
                        .iter()
                        .map(|attr| attr.name())
                        .filter(|name| name != "href")
                        .collect();
                    for name in names {
                        el.remove_attribute(&name);
                    }
                    Ok(())
                }),
            ],
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| ConvertError::Rewrite(e.to_string()))?;
    rewriter
        .end()
        .map_err(|e| ConvertError::Rewrite(e.to_string()))?;

    String::from_utf8(output).map_err(|e| ConvertError::Rewrite(format!("Invalid UTF-8 in rewritten HTML: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_svg_and_images() {
        let html = r#"<div><svg viewBox="0 0 10 10"><path d="M0 0"/></svg><p>Text</p><img src="a.png"><img src="b.png"></div>"#;
        let slim = slim_html(html).expect("rewrite");
        assert!(!slim.contains("<svg"));
        assert!(!slim.contains("<path"));
        assert!(!slim.contains("<img"));
        assert!(slim.contains("<p>Text</p>"));
    }

    #[test]
    fn removes_data_uri_elements() {
        let html = r#"<p><a href="data:text/plain,hi">inline</a><a href="/docs">docs</a><source src="data:video/mp4;base64,AAAA"></p>"#;
        let slim = slim_html(html).expect("rewrite");
        assert!(!slim.contains("inline"));
        assert!(!slim.contains("data:"));
        assert!(slim.contains(r#"<a href="/docs">docs</a>"#));
    }

    #[test]
    fn keeps_only_href_attributes() {
        let html = r#"<div class="wrap" id="x" style="color:red"><a href="https://example.com" target="_blank" rel="noopener">link</a></div>"#;
        let slim = slim_html(html).expect("rewrite");
        assert_eq!(
            slim,
            r#"<div><a href="https://example.com">link</a></div>"#
        );
    }
}
