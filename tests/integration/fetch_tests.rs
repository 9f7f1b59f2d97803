//! HTTP fetcher tests against a mock server.

use std::time::{Duration, Instant};

use hostbound::config::CrawlConfig;
use hostbound::crawler::{Fetcher, HttpFetcher};
use hostbound::{ErrorCategory, PageError};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_for(server: &MockServer) -> HttpFetcher {
    let config = CrawlConfig::new(format!("{}/", server.uri()));
    HttpFetcher::new(&config).expect("failed to build HTTP client")
}

#[tokio::test]
async fn test_fetch_success() {
    let server = MockServer::start().await;
    let url = format!("{}/page", server.uri());

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html>hello</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetched = fetcher_for(&server)
        .fetch(&CancellationToken::new(), &url)
        .await
        .expect("fetch failed");

    assert_eq!(fetched.body, b"<html>hello</html>");
    assert_eq!(fetched.final_url, url);
    assert_eq!(fetched.content_type, "text/html; charset=utf-8");
}

#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "hostbound/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    fetcher_for(&server)
        .fetch(&CancellationToken::new(), &format!("{}/", server.uri()))
        .await
        .expect("fetch failed");
}

#[tokio::test]
async fn test_fetch_missing_content_type_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let fetched = fetcher_for(&server)
        .fetch(&CancellationToken::new(), &format!("{}/", server.uri()))
        .await
        .expect("fetch failed");

    assert_eq!(fetched.content_type, "");
    assert!(fetched.body.is_empty());
}

#[tokio::test]
async fn test_fetch_error_statuses() {
    let cases = [
        (404u16, ErrorCategory::DeadLink),
        (500, ErrorCategory::ServerError),
        (503, ErrorCategory::ServerError),
        (408, ErrorCategory::Timeout),
        (504, ErrorCategory::Timeout),
        (403, ErrorCategory::ClientError),
    ];

    let server = MockServer::start().await;
    for (status, _) in cases {
        Mock::given(method("GET"))
            .and(path(format!("/status/{}", status)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
    }

    let fetcher = fetcher_for(&server);
    for (status, category) in cases {
        let url = format!("{}/status/{}", server.uri(), status);
        let err = fetcher
            .fetch(&CancellationToken::new(), &url)
            .await
            .expect_err("expected an error");

        match &err {
            PageError::Http {
                status: got_status,
                url: got_url,
            } => {
                assert_eq!(*got_status, status);
                assert_eq!(got_url, &url);
            }
            other => panic!("expected Http error for {}, got {:?}", status, other),
        }
        assert_eq!(err.category(), category, "status {}", status);
    }
}

#[tokio::test]
async fn test_fetch_follows_redirects_and_reports_final_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("landed", "text/html"),
        )
        .mount(&server)
        .await;

    let fetched = fetcher_for(&server)
        .fetch(&CancellationToken::new(), &format!("{}/old", base))
        .await
        .expect("fetch failed");

    assert_eq!(fetched.final_url, format!("{}/new", base));
    assert_eq!(fetched.body, b"landed");
}

#[tokio::test]
async fn test_fetch_caps_body_size() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(1000)))
        .mount(&server)
        .await;

    let mut config = CrawlConfig::new(format!("{}/", server.uri()));
    config.max_body_bytes = 64;
    let fetcher = HttpFetcher::new(&config).expect("failed to build HTTP client");

    let fetched = fetcher
        .fetch(
            &CancellationToken::new(),
            &format!("{}/big", server.uri()),
        )
        .await
        .expect("oversize body must not be an error");

    assert_eq!(fetched.body.len(), 64);
}

#[tokio::test]
async fn test_fetch_network_error() {
    // Nothing listens on this port.
    let config = CrawlConfig::new("http://127.0.0.1:1/");
    let fetcher = HttpFetcher::new(&config).expect("failed to build HTTP client");

    let err = fetcher
        .fetch(&CancellationToken::new(), "http://127.0.0.1:1/")
        .await
        .expect_err("expected a connection error");

    assert_eq!(err.category(), ErrorCategory::NetworkError);
}

#[tokio::test]
async fn test_rate_gate_spaces_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let mut config = CrawlConfig::new(format!("{}/", server.uri()));
    config.rate = Some(Duration::from_millis(50));
    let fetcher = HttpFetcher::new(&config).expect("failed to build HTTP client");

    let url = format!("{}/", server.uri());
    let cancel = CancellationToken::new();

    let started = Instant::now();
    fetcher.fetch(&cancel, &url).await.expect("first fetch failed");
    fetcher.fetch(&cancel, &url).await.expect("second fetch failed");

    // First tick at +50ms, second at +100ms.
    assert!(
        started.elapsed() >= Duration::from_millis(90),
        "requests were not paced: {:?}",
        started.elapsed()
    );
}
