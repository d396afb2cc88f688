//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full harvest cycle end-to-end against real stores on disk.

use article_harvest::config::{Config, SinkKind, UserAgentConfig};
use article_harvest::crawler::{harvest, user_agent_string, FetchError, StopReason};
use article_harvest::storage::{RunStatus, SqliteStore};
use article_harvest::HarvestError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, db_path: &Path, sink: SinkKind) -> Config {
    let mut config = Config::default();
    config.crawler.base_url = base_url.to_string();
    config.crawler.start_cursor = "/list".to_string();
    config.crawler.page_delay_ms = 0;
    config.user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    };
    config.output.database_path = db_path.display().to_string();
    config.output.sink = sink;
    config
}

/// Listing markup with one summary per (path, title, reads)
fn listing_page(items: &[(&str, &str, u64)], next: Option<&str>) -> String {
    let mut html = String::from(r#"<html><body><ul class="article-list">"#);
    for (href, title, reads) in items {
        html.push_str(&format!(
            r#"<li><div class="content">
                 <a class="author-name" href="/u/writer">writer</a>
                 <h4 class="title"><a href="{}">{}</a></h4>
                 <div class="list-footer"><a>阅读 {}</a><a>· 评论 2</a><span>· 喜欢 3</span></div>
               </div></li>"#,
            href, title, reads
        ));
    }
    html.push_str("</ul>");
    if let Some(next) = next {
        html.push_str(&format!(
            r#"<div class="load-more"><button data-url="{}">more</button></div>"#,
            next
        ));
    }
    html.push_str("</body></html>");
    html
}

fn detail_page(text: &str) -> String {
    format!(
        r#"<html><body><div class="article"><div class="show-content"><p>{}</p></div></div></body></html>"#,
        text
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_two_pages() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("harvest.db");
    let config = create_test_config(&server.uri(), &db_path, SinkKind::Sqlite);

    // Every request carries the configured user agent
    Mock::given(method("GET"))
        .and(path("/list"))
        .and(header(
            "user-agent",
            user_agent_string(&config.user_agent).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[("/p/a", "Article A", 10), ("/p/b", "Article B", 5)],
            Some("/page2"),
        )))
        .expect(1)
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/page2",
        listing_page(&[("/p/a", "Article A", 50)], None),
        1,
    )
    .await;
    mount_html(&server, "/p/a", detail_page("hello"), 1).await;
    Mock::given(method("GET"))
        .and(path("/p/b"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let report = harvest(&config).await.unwrap();

    assert_eq!(report.stop, StopReason::Exhausted);
    assert_eq!(report.totals.pages, 2);
    assert_eq!(report.totals.inserted, 2);
    assert_eq!(report.totals.refreshed, 1);
    assert_eq!(report.totals.content_missing, 1);

    let store = SqliteStore::new(&db_path).unwrap();
    let url_a = format!("{}/p/a", server.uri());
    let url_b = format!("{}/p/b", server.uri());

    let a = store.get_record(&url_a).unwrap().unwrap();
    assert_eq!(a.title, "Article A");
    assert_eq!(a.author, "writer");
    assert_eq!(a.counters.read, 50);
    assert_eq!(a.counters.comment, 2);
    assert_eq!(store.get_content(&url_a).unwrap().unwrap().text, "hello");

    assert!(store.get_record(&url_b).unwrap().is_some());
    assert!(store.get_content(&url_b).unwrap().unwrap().is_empty());

    let run = store.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.totals, report.totals);
}

#[tokio::test]
async fn test_rerun_refreshes_counters_without_refetching() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("harvest.db");
    let config = create_test_config(&server.uri(), &db_path, SinkKind::Sqlite);

    mount_html(
        &server,
        "/list",
        listing_page(&[("/p/a", "Article A", 10)], None),
        1,
    )
    .await;
    mount_html(&server, "/p/a", detail_page("hello"), 1).await;

    harvest(&config).await.unwrap();
    server.verify().await;

    // Second run sees new counters and a changed title; the body must not be requested
    server.reset().await;
    mount_html(
        &server,
        "/list",
        listing_page(&[("/p/a", "Renamed", 99)], None),
        1,
    )
    .await;
    mount_html(&server, "/p/a", detail_page("changed"), 0).await;

    let report = harvest(&config).await.unwrap();
    assert_eq!(report.totals.inserted, 0);
    assert_eq!(report.totals.refreshed, 1);

    let store = SqliteStore::new(&db_path).unwrap();
    let url_a = format!("{}/p/a", server.uri());
    let a = store.get_record(&url_a).unwrap().unwrap();
    assert_eq!(a.title, "Article A");
    assert_eq!(a.counters.read, 99);
    assert_eq!(store.get_content(&url_a).unwrap().unwrap().text, "hello");
    assert_eq!(store.count_runs().unwrap(), 2);
}

#[tokio::test]
async fn test_listing_failure_aborts_run() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("harvest.db");
    let config = create_test_config(&server.uri(), &db_path, SinkKind::Sqlite);

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = harvest(&config).await;
    assert!(matches!(
        result,
        Err(HarvestError::Fetch(FetchError::Status { status: 500, .. }))
    ));

    let store = SqliteStore::new(&db_path).unwrap();
    assert_eq!(store.count_records().unwrap(), 0);
    let run = store.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Failed);
    assert!(run.finished_at.is_some());
}

#[tokio::test]
async fn test_page_budget_limits_listing_fetches() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("harvest.db");
    let mut config = create_test_config(&server.uri(), &db_path, SinkKind::Sqlite);
    config.crawler.max_pages = 1;

    mount_html(&server, "/list", listing_page(&[], Some("/page2")), 1).await;
    mount_html(&server, "/page2", listing_page(&[], None), 0).await;

    let report = harvest(&config).await.unwrap();
    assert_eq!(report.stop, StopReason::BudgetReached);
    assert_eq!(report.totals.pages, 1);
}

#[tokio::test]
async fn test_jsonl_sink_appends_every_encounter() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("harvest.jsonl");
    let config = create_test_config(&server.uri(), &log_path, SinkKind::Jsonl);

    mount_html(
        &server,
        "/list",
        listing_page(&[("/p/a", "Article A", 10)], None),
        2,
    )
    .await;
    mount_html(&server, "/p/a", detail_page("hello"), 2).await;

    harvest(&config).await.unwrap();
    let report = harvest(&config).await.unwrap();
    assert_eq!(report.totals.inserted, 1);
    assert_eq!(report.totals.refreshed, 0);

    let log = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<serde_json::Value> = log
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert_eq!(line["url"], format!("{}/p/a", server.uri()));
        assert_eq!(line["title"], "Article A");
        assert_eq!(line["read"], 10);
        assert_eq!(line["content"]["text"], "hello");
    }
}
