//! Integration tests for the crawl pipeline
//!
//! These tests use wiremock to serve a small documentation site and run the
//! full listing → detail → catalog cycle end-to-end.

use serde_json::{json, Value};
use stack_cartographer::config::{Config, FetcherConfig, SiteConfig};
use stack_cartographer::crawler::{
    crawl, run_to_file, CatalogBuilder, CrawlEvent, FailurePolicy, EXIT_PARTIAL,
};
use stack_cartographer::output::{render, write_catalog, Catalog, GENERATOR};
use stack_cartographer::CartographerError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            listing_path: "/docs".to_string(),
        },
        fetcher: FetcherConfig {
            user_agent: "TestCartographer/1.0".to_string(),
            min_request_interval: 10, // Very short for testing
            request_timeout: 5,
        },
        ..Config::default()
    }
}

fn listing_page(methods: &[(&str, &str)]) -> String {
    let mut html = String::from("<html><head><title>API Docs</title></head><body><div class=\"methods\">");
    for (name, href) in methods {
        html.push_str(&format!(
            "<div class=\"method-name\"><a href=\"{}\">{}</a></div>\n",
            href, name
        ));
    }
    html.push_str("</div></body></html>");
    html
}

fn detail_page(description: &str, parameters: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>Method</title></head><body>
<div class="indented"><p>{}</p><p>Usage notes.</p></div>
<script type="text/javascript">
    var parameters = {};
    render(parameters);
</script>
</body></html>"#,
        description, parameters
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a listing of /answers and /badges with both detail pages
async fn mount_two_method_site(server: &MockServer) {
    mount_page(
        server,
        "/docs",
        listing_page(&[("/answers", "/docs/answers"), ("/badges", "/docs/badges")]),
    )
    .await;
    mount_page(
        server,
        "/docs/answers",
        detail_page(
            "Returns all the undeleted answers in the system.",
            r#"{"page":{"type":"number"},"sort":{"type":"string","default":"activity"}}"#,
        ),
    )
    .await;
    mount_page(
        server,
        "/docs/badges",
        detail_page("Returns all badges.", r#"{"inname":{"type":"string"}}"#),
    )
    .await;
}

/// Mounts /answers and /comments fine with /badges returning 404
async fn mount_site_with_failing_method(server: &MockServer) {
    mount_page(
        server,
        "/docs",
        listing_page(&[
            ("/answers", "/docs/answers"),
            ("/badges", "/docs/badges"),
            ("/comments", "/docs/comments"),
        ]),
    )
    .await;
    mount_page(
        server,
        "/docs/answers",
        detail_page("Returns answers.", r#"{"id":{"type":"int"}}"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/badges"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
    mount_page(
        server,
        "/docs/comments",
        detail_page("Returns comments.", "{}"),
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_writes_catalog() {
    let mock_server = MockServer::start().await;
    mount_two_method_site(&mock_server).await;

    let config = create_test_config(&mock_server.uri());
    let mut builder = CatalogBuilder::new(&config).expect("Failed to create builder");

    let mut events = Vec::new();
    let report = crawl(&mut builder, FailurePolicy::Abort, |event| {
        events.push(format!("{:?}", event));
    })
    .await
    .expect("Crawl failed");

    assert!(report.is_complete());
    assert_eq!(events.len(), 3, "expected Listed + 2 Method events: {:?}", events);

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("map.json");
    let catalog = Catalog::new(report.methods, chrono::Utc::now());
    write_catalog(&output_path, &catalog).expect("Failed to write catalog");

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();

    assert_eq!(written["meta"]["generator"], GENERATOR);
    let methods = written["methods"].as_array().unwrap();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0]["path"], "/answers");
    assert_eq!(
        methods[0]["description"],
        "Returns all the undeleted answers in the system."
    );
    assert_eq!(
        methods[0]["parameters"],
        json!({"page": {"type": "number"}, "sort": {"type": "string", "default": "activity"}})
    );
    assert_eq!(methods[1]["path"], "/badges");
    assert_eq!(methods[1]["parameters"], json!({"inname": {"type": "string"}}));
}

#[tokio::test]
async fn test_rendered_catalog_is_stable_across_runs() {
    let mock_server = MockServer::start().await;
    mount_two_method_site(&mock_server).await;

    let config = create_test_config(&mock_server.uri());
    let generated_at = chrono::Utc::now();

    let mut rendered = Vec::new();
    for _ in 0..2 {
        let mut builder = CatalogBuilder::new(&config).unwrap();
        let report = crawl(&mut builder, FailurePolicy::Abort, |_| {}).await.unwrap();
        rendered.push(render(&Catalog::new(report.methods, generated_at)).unwrap());
    }

    assert_eq!(rendered[0], rendered[1]);
}

#[tokio::test]
async fn test_duplicate_listing_entries_use_last_link() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/docs",
        listing_page(&[
            ("/answers", "/docs/answers-old"),
            ("/badges", "/docs/badges"),
            ("/answers", "/docs/answers"),
        ]),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let mut builder = CatalogBuilder::new(&config).unwrap();
    let methods = builder.list_methods().await.unwrap();

    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0].name, "/answers");
    assert_eq!(methods[0].detail_url, "/docs/answers");
    assert_eq!(methods[1].name, "/badges");
}

#[tokio::test]
async fn test_empty_listing_fails() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/docs",
        "<html><body><p>Maintenance</p></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let mut builder = CatalogBuilder::new(&config).unwrap();
    let result = crawl(&mut builder, FailurePolicy::Abort, |_| {}).await;

    assert!(matches!(result, Err(CartographerError::NotFound { .. })));
}

#[tokio::test]
async fn test_failing_method_aborts_run() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/docs",
        listing_page(&[
            ("/answers", "/docs/answers"),
            ("/badges", "/docs/badges"),
            ("/comments", "/docs/comments"),
        ]),
    )
    .await;
    mount_page(
        &mock_server,
        "/docs/answers",
        detail_page("Returns answers.", "{}"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/badges"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    // Processing stops at the first failure
    Mock::given(method("GET"))
        .and(path("/docs/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("x", "{}")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let mut builder = CatalogBuilder::new(&config).unwrap();
    let result = crawl(&mut builder, FailurePolicy::Abort, |_| {}).await;

    match result {
        Err(CartographerError::Method { name, source }) => {
            assert_eq!(name, "/badges");
            assert!(matches!(*source, CartographerError::Transport { .. }));
        }
        other => panic!("expected Method error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_keep_going_collects_failures() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/docs",
        listing_page(&[
            ("/answers", "/docs/answers"),
            ("/badges", "/docs/badges"),
            ("/comments", "/docs/comments"),
        ]),
    )
    .await;
    mount_page(
        &mock_server,
        "/docs/answers",
        detail_page("Returns answers.", r#"{"id":{"type":"int"}}"#),
    )
    .await;
    // Marker present but no assignment
    mount_page(
        &mock_server,
        "/docs/badges",
        r#"<html><body><div class="indented"><p>Badges.</p></div>
        <script>var parameters; load()</script></body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/docs/comments",
        detail_page("Returns comments.", "{}"),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let mut builder = CatalogBuilder::new(&config).unwrap();

    let mut skipped = Vec::new();
    let report = crawl(&mut builder, FailurePolicy::Skip, |event| {
        if let CrawlEvent::Skipped { name, .. } = event {
            skipped.push(name.to_string());
        }
    })
    .await
    .expect("Crawl should continue past failures");

    assert!(!report.is_complete());
    assert_eq!(skipped, vec!["/badges"]);

    let paths: Vec<&str> = report.methods.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, vec!["/answers", "/comments"]);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "/badges");
    assert_eq!(report.failures[0].detail_url, "/docs/badges");
    assert!(matches!(
        report.failures[0].error,
        CartographerError::Extraction { .. }
    ));
}

#[tokio::test]
async fn test_absolute_detail_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let absolute = format!("{}/docs/users", base_url);

    mount_page(
        &mock_server,
        "/docs",
        listing_page(&[("/users", absolute.as_str())]),
    )
    .await;
    mount_page(
        &mock_server,
        "/docs/users",
        detail_page("Returns users.", r#"{"order":{"type":"string"}}"#),
    )
    .await;

    let config = create_test_config(&base_url);
    let mut builder = CatalogBuilder::new(&config).unwrap();
    let report = crawl(&mut builder, FailurePolicy::Abort, |_| {}).await.unwrap();

    assert_eq!(report.methods.len(), 1);
    assert_eq!(report.methods[0].description, "Returns users.");
}

#[tokio::test]
async fn test_run_to_file_writes_complete_catalog() {
    let mock_server = MockServer::start().await;
    mount_two_method_site(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&mock_server.uri());
    config.output.path = dir.path().join("map.json");

    let report = run_to_file(&config, |_| {}).await.expect("Run failed");
    assert!(report.is_complete());
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.methods.len(), 2);

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&config.output.path).unwrap()).unwrap();
    assert_eq!(written["methods"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_aborted_run_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_site_with_failing_method(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&mock_server.uri());
    config.output.path = dir.path().join("map.json");
    config.crawl.on_failure = FailurePolicy::Abort;

    let result = run_to_file(&config, |_| {}).await;

    assert!(matches!(result, Err(CartographerError::Method { .. })));
    assert!(!config.output.path.exists(), "aborted run left a catalog behind");
}

#[tokio::test]
async fn test_skipping_run_writes_partial_catalog() {
    let mock_server = MockServer::start().await;
    mount_site_with_failing_method(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&mock_server.uri());
    config.output.path = dir.path().join("map.json");
    config.crawl.on_failure = FailurePolicy::Skip;

    let report = run_to_file(&config, |_| {}).await.expect("Run should succeed");

    assert!(!report.failures.is_empty());
    assert_eq!(report.failures[0].name, "/badges");
    assert_eq!(report.exit_code(), EXIT_PARTIAL);

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&config.output.path).unwrap()).unwrap();
    let paths: Vec<&str> = written["methods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["/answers", "/comments"]);
}
