//! Integration tests for the harvester
//!
//! These tests use wiremock to serve topic pages over HTTP and run the
//! full harvest cycle end-to-end with the plain HTTP renderer.

use sozluk_harvester::config::Config;
use sozluk_harvester::crawler::{harvest, Coordinator, HttpFetcher, NullProgress};
use sozluk_harvester::output::read_entries;
use sozluk_harvester::{FetchError, HarvestError, StopReason};
use std::path::Path;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOPIC_PATH: &str = "/python--12345";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output: &Path, max_pages: Option<u32>) -> Config {
    let mut config = Config::default();
    config.harvest.base_url = base_url.to_string();
    config.harvest.output_path = output.to_string_lossy().into_owned();
    config.harvest.max_pages = max_pages;
    config.harvest.delay_ms = 0; // No politeness delay for testing
    config.harvest.settle_ms = 0;
    config.browser.enabled = false;
    config
}

/// Renders a topic page with the given entry ids and optional next page
fn topic_page(ids: &[&str], next: Option<u32>) -> String {
    let entries: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<li data-id="{id}" data-author="yazar{id}">
                     <div class="content">entry {id}<br>ikinci satır</div>
                     <footer>
                       <a class="entry-date permalink" href="/entry/{id}">01.01.2024 12:00</a>
                       <a class="entry-author" href="/biri/yazar{id}">yazar{id}</a>
                     </footer>
                   </li>"#
            )
        })
        .collect();

    let pager = match next {
        Some(n) => format!(
            r#"<div class="pager"><a class="next" href="{}?p={}">»</a></div>"#,
            TOPIC_PATH, n
        ),
        None => String::new(),
    };

    format!(
        r#"<html><head><title>python - sozluk</title></head><body>
           <ul id="entry-item-list">{}</ul>{}
           </body></html>"#,
        entries, pager
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

/// Mounts the three-page fixture: {1,2,3}, {3,4,5}, {6}
async fn mount_three_pages(mock_server: &MockServer) {
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .and(query_param("p", "1"))
        .and(header("referer", format!("{}/", base_url).as_str()))
        .respond_with(html(topic_page(&["1", "2", "3"], Some(2))))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .and(query_param("p", "2"))
        .and(header(
            "referer",
            format!("{}{}?p=1", base_url, TOPIC_PATH).as_str(),
        ))
        .respond_with(html(topic_page(&["3", "4", "5"], Some(3))))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .and(query_param("p", "3"))
        .and(header(
            "referer",
            format!("{}{}?p=2", base_url, TOPIC_PATH).as_str(),
        ))
        .respond_with(html(topic_page(&["6"], None)))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_three_pages() {
    let mock_server = MockServer::start().await;
    mount_three_pages(&mock_server).await;

    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("entries.json");
    let config = create_test_config(&mock_server.uri(), &output, None);

    let outcome = harvest(&config, "python--12345", None)
        .await
        .expect("Harvest failed");

    let ids: Vec<&str> = outcome.records.iter().map(|r| r.entry_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    assert_eq!(outcome.pages_visited, 3);
    assert_eq!(outcome.stop_reason, StopReason::EndOfPagination);

    let first = &outcome.records[0];
    assert_eq!(first.author, "yazar1");
    assert_eq!(first.author_url, format!("{}/biri/yazar1", mock_server.uri()));
    assert_eq!(first.permalink, format!("{}/entry/1", mock_server.uri()));
    assert_eq!(first.date, "01.01.2024 12:00");
    assert_eq!(first.content, "entry 1\nikinci satır");

    // The written file matches the in-memory result
    let saved = read_entries(&output).expect("Failed to read output");
    assert_eq!(saved, outcome.records);

    let raw = std::fs::read_to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let array = value.as_array().expect("Output is not an array");
    assert_eq!(array.len(), outcome.records.len());
    for element in array {
        let mut keys: Vec<&String> = element.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["author", "author_url", "content", "date", "entry_id", "permalink"]
        );
    }
    assert!(raw.contains("ikinci satır"));
}

#[tokio::test]
async fn test_page_budget_stops_early() {
    let mock_server = MockServer::start().await;
    mount_three_pages(&mock_server).await;

    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("entries.json");
    let config = create_test_config(&mock_server.uri(), &output, Some(1));

    let outcome = harvest(&config, &format!("{}{}?p=5", mock_server.uri(), TOPIC_PATH), None)
        .await
        .expect("Harvest failed");

    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.pages_visited, 1);
    assert_eq!(outcome.stop_reason, StopReason::PageBudget);
    assert_eq!(read_entries(&output).unwrap().len(), 3);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_cookie_header_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .and(header("cookie", "session=abc; theme=dark"))
        .respond_with(html(topic_page(&["10"], None)))
        .mount(&mock_server)
        .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("entries.json");
    let config = create_test_config(&mock_server.uri(), &output, None);

    let outcome = harvest(&config, "python--12345", Some("session=abc; broken; theme=dark"))
        .await
        .expect("Harvest failed");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].entry_id, "10");
}

#[tokio::test]
async fn test_fetch_failure_is_fatal_and_writes_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .and(query_param("p", "1"))
        .respond_with(html(topic_page(&["1", "2"], Some(2))))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .and(query_param("p", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("entries.json");
    let config = create_test_config(&mock_server.uri(), &output, None);

    let result = harvest(&config, "python--12345", None).await;

    assert!(matches!(
        result,
        Err(HarvestError::Fetch(FetchError::Status { status: 503, .. }))
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_write_failure_is_not_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .respond_with(html(topic_page(&["1"], None)))
        .mount(&mock_server)
        .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("no-such-dir").join("entries.json");
    let config = create_test_config(&mock_server.uri(), &output, None);

    let outcome = harvest(&config, "python--12345", None)
        .await
        .expect("Write failure should not fail the run");

    assert_eq!(outcome.records.len(), 1);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_empty_topic_writes_empty_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .respond_with(html(topic_page(&[], None)))
        .mount(&mock_server)
        .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("entries.json");
    let config = create_test_config(&mock_server.uri(), &output, None);

    let outcome = harvest(&config, "/python--12345/", None)
        .await
        .expect("Harvest failed");

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.stop_reason, StopReason::EndOfPagination);
    assert!(read_entries(&output).unwrap().is_empty());
}

#[tokio::test]
async fn test_coordinator_with_http_fetcher() {
    let mock_server = MockServer::start().await;
    mount_three_pages(&mock_server).await;

    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("entries.json");
    let config = create_test_config(&mock_server.uri(), &output, Some(2));

    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let mut fetcher = HttpFetcher::new(&config.browser).expect("Failed to build fetcher");

    let outcome = coordinator
        .run("python--12345", None, &mut fetcher, &mut NullProgress)
        .await
        .expect("Harvest failed");

    assert_eq!(outcome.records.len(), 5);
    assert_eq!(outcome.duplicates, 1);
    assert_eq!(outcome.stop_reason, StopReason::PageBudget);
    // Coordinator alone never writes output
    assert!(!output.exists());
}
