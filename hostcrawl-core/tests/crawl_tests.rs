// Tests for crawl orchestration and output

use hostcrawl_core::crawl::{CrawlOptions, execute_crawl, extract_url_path};
use hostcrawl_core::report::{generate_crawl_report, save_urls_to_file};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("http://example.com/"), "/");
    assert_eq!(extract_url_path("http://example.com"), "/");
}

#[test]
fn test_extract_url_path_nested() {
    assert_eq!(
        extract_url_path("http://example.com/api/v1/users"),
        "/api/v1/users"
    );
}

#[test]
fn test_extract_url_path_drops_query_and_fragment() {
    assert_eq!(extract_url_path("http://example.com/api?key=value#top"), "/api");
}

#[test]
fn test_extract_url_path_invalid_falls_back() {
    assert_eq!(extract_url_path("not a url"), "not a url");
}

// ============================================================================
// JSON output
// ============================================================================

#[test]
fn test_save_urls_writes_json_array() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let out = dir.path().join("results.json");
    let urls = vec![
        "https://ex.com/".to_string(),
        "https://ex.com/a".to_string(),
    ];

    save_urls_to_file(&urls, &out)?;

    let written = fs::read_to_string(&out)?;
    assert!(written.ends_with('\n'));
    let parsed: Vec<String> = serde_json::from_str(written.trim_end())?;
    assert_eq!(parsed, urls);
    Ok(())
}

#[test]
fn test_save_urls_creates_parent_directories() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let out = dir.path().join("nested").join("deeper").join("results.json");

    save_urls_to_file(&[], &out)?;

    assert_eq!(fs::read_to_string(&out)?, "[]\n");
    Ok(())
}

#[test]
fn test_save_urls_reports_unwritable_path() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    // A directory cannot be opened as a file
    let err = save_urls_to_file(&[], dir.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to write"));
    Ok(())
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn test_execute_crawl_collects_site() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(r##"<a href="/a">A</a><a href="/a#part">A</a><a href="https://other.com/">X</a>"##),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(r#"<a href="/">Home</a>"#),
        )
        .mount(&mock_server)
        .await;

    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();

    let mut options = CrawlOptions::new(format!("{}/", mock_server.uri()));
    options.workers = 2;
    options.timeout_secs = 5;

    let result = execute_crawl(
        options,
        CancellationToken::new(),
        Some(Arc::new(move |msg: String| {
            messages_clone.lock().unwrap().push(msg);
        })),
    )
    .await
    .unwrap();

    assert!(result.is_complete());
    assert_eq!(
        result.urls(),
        vec![
            format!("{}/", mock_server.uri()),
            format!("{}/a", mock_server.uri()),
        ]
    );
    assert_eq!(messages.lock().unwrap().len(), 2);

    let report = generate_crawl_report(&result);
    assert!(report.contains("Pages found: 2"));
}

#[tokio::test]
async fn test_execute_crawl_rejects_bad_seed() {
    let result = execute_crawl(
        CrawlOptions::new("definitely not a url"),
        CancellationToken::new(),
        None,
    )
    .await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid seed URL"));
}
