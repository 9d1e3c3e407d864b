//! End-to-end tool calls through `ScrapeServer` with fake collaborators

mod common;

use common::{FakeRenderer, args, result_text, server_with};
use kodegen_tools_markscrape::utils::{MARKDOWN_MIME_TYPE, SCRAPE_TOOL_NAME};
use rmcp::model::ErrorCode;
use serde_json::json;

#[tokio::test]
async fn scheme_less_url_is_rendered_over_https() {
    let renderer = FakeRenderer::page("hello", Some("text/plain"));
    let server = server_with(renderer.clone());

    server
        .call(SCRAPE_TOOL_NAME, args(json!({"url": "example.com"})))
        .await
        .expect("tool call");

    assert_eq!(renderer.urls(), vec!["https://example.com".to_string()]);
}

#[tokio::test]
async fn render_failure_is_stored_as_failure_notice() {
    let server = server_with(FakeRenderer::failing());

    let result = server
        .call(SCRAPE_TOOL_NAME, args(json!({"url": "https://unreachable.test"})))
        .await
        .expect("failures are not protocol errors");

    let expected = "# Failed to retrieve content from https://unreachable.test";
    assert_eq!(result_text(&result), expected);

    let resources = server.registry().list();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].mime_type, MARKDOWN_MIME_TYPE);
    let stored = server.registry().get(&resources[0].uri).expect("stored");
    assert_eq!(stored.content, expected);
    assert_eq!(stored.url, "https://unreachable.test");
}

#[tokio::test]
async fn missing_url_is_a_usage_error_and_stores_nothing() {
    let renderer = FakeRenderer::page("unused", None);
    let server = server_with(renderer.clone());

    let err = server
        .call(SCRAPE_TOOL_NAME, args(json!({"verify_ssl": false})))
        .await
        .expect_err("url is required");

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("URL is required"));
    assert!(server.registry().is_empty());
    assert!(renderer.urls().is_empty());
}

#[tokio::test]
async fn blank_url_is_a_usage_error_and_stores_nothing() {
    let renderer = FakeRenderer::page("unused", None);
    let server = server_with(renderer.clone());

    let err = server
        .call(SCRAPE_TOOL_NAME, args(json!({"url": "  \t "})))
        .await
        .expect_err("blank url is rejected");

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("URL is required"));
    assert!(server.registry().is_empty());
    assert!(renderer.urls().is_empty());
}

#[tokio::test]
async fn whitespace_only_page_is_stored_as_failure_notice() {
    let server = server_with(FakeRenderer::page(" \n\n ", Some("text/plain")));

    let result = server
        .call(SCRAPE_TOOL_NAME, args(json!({"url": "blank.test"})))
        .await
        .expect("tool call");

    assert_eq!(
        result_text(&result),
        "# Failed to retrieve content from https://blank.test"
    );
    assert_eq!(server.registry().len(), 1);
}

#[tokio::test]
async fn unknown_tool_is_rejected() {
    let server = server_with(FakeRenderer::page("unused", None));

    let err = server
        .call("summarize_page", args(json!({"url": "example.com"})))
        .await
        .expect_err("only one tool exists");

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("Unknown tool: summarize_page"));
    assert!(server.registry().is_empty());
}

#[tokio::test]
async fn html_is_converted_and_text_is_fenced() {
    let html_server = server_with(FakeRenderer::page("<html><body><p>x</p></body></html>", None));
    let result = html_server
        .call(SCRAPE_TOOL_NAME, args(json!({"url": "a.test"})))
        .await
        .expect("tool call");
    assert!(result_text(&result).starts_with("MARKDOWN("));

    let text_server = server_with(FakeRenderer::page("name,age\nada,36", Some("text/csv")));
    let result = text_server
        .call(SCRAPE_TOOL_NAME, args(json!({"url": "a.test/people.csv"})))
        .await
        .expect("tool call");
    assert_eq!(result_text(&result), "```\nname,age\nada,36\n```");
}

#[tokio::test]
async fn verify_ssl_reaches_the_renderer() {
    let renderer = FakeRenderer::page("ok", None);
    let server = server_with(renderer.clone());

    server
        .call(SCRAPE_TOOL_NAME, args(json!({"url": "a.test"})))
        .await
        .expect("tool call");
    server
        .call(SCRAPE_TOOL_NAME, args(json!({"url": "a.test", "verify_ssl": false})))
        .await
        .expect("tool call");

    let flags: Vec<bool> = renderer.options().iter().map(|o| o.verify_ssl).collect();
    assert_eq!(flags, vec![true, false]);
}

#[tokio::test]
async fn same_url_twice_yields_two_resources() {
    let server = server_with(FakeRenderer::page("same", None));

    for _ in 0..2 {
        server
            .call(SCRAPE_TOOL_NAME, args(json!({"url": "example.com"})))
            .await
            .expect("tool call");
    }

    let resources = server.registry().list();
    assert_eq!(resources.len(), 2);
    assert_ne!(resources[0].uri, resources[1].uri);
    assert!(resources.iter().all(|r| r.name == "Scraped: example.com"));
}

#[test]
fn tool_listing_has_one_descriptor() {
    let server = server_with(FakeRenderer::page("unused", None));
    let tools = server.tools();

    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, SCRAPE_TOOL_NAME);
    assert_eq!(tools[0].input_schema.get("required"), Some(&json!(["url"])));
}

#[test]
fn prompts_are_unknown() {
    let server = server_with(FakeRenderer::page("unused", None));
    let err = server.prompt("summarize").expect_err("no prompts exist");
    assert!(err.message.contains("Unknown prompt: summarize"));
}
