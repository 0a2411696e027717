//! Unit tests for registry client

use super::*;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        multiplier: 2.0,
    }
}

#[tokio::test]
async fn test_registry_client_creation() {
    let client = RegistryClient::new().unwrap();
    assert_eq!(client.pypi_url, "https://pypi.org");
    assert_eq!(client.github_url, "https://api.github.com");
    assert_eq!(client.retry_config.max_retries, 3);
}

#[tokio::test]
async fn test_base_urls_are_normalized() {
    let client = RegistryClient::new()
        .unwrap()
        .with_pypi_url("http://localhost:8080/")
        .with_github_url("http://localhost:9090//");
    assert_eq!(client.pypi_url, "http://localhost:8080");
    assert_eq!(client.github_url, "http://localhost:9090");
}

#[test]
fn test_retry_config_default() {
    let config = RetryConfig::default();
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.initial_delay, Duration::from_millis(100));
    assert_eq!(config.max_delay, Duration::from_secs(10));
    assert_eq!(config.multiplier, 2.0);
}

#[tokio::test]
async fn test_fetch_json_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "feu" })))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::with_config(fast_retry(0), DEFAULT_TIMEOUT).unwrap();
    let body = client
        .fetch_json(&format!("{}/data", mock_server.uri()), &HeaderMap::new())
        .await
        .unwrap();
    assert_eq!(body["name"], "feu");
}

#[tokio::test]
async fn test_fetch_json_invalid_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::with_config(fast_retry(0), DEFAULT_TIMEOUT).unwrap();
    let err = client
        .fetch_json(&format!("{}/data", mock_server.uri()), &HeaderMap::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid JSON"), "{err}");
}

#[tokio::test]
async fn test_fetch_json_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = RegistryClient::with_config(fast_retry(0), Duration::from_millis(100)).unwrap();
    let err = client
        .fetch_json(&format!("{}/slow", mock_server.uri()), &HeaderMap::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("timed out"), "{err}");
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::with_config(fast_retry(3), DEFAULT_TIMEOUT).unwrap();
    let err = client
        .fetch_json(&format!("{}/missing", mock_server.uri()), &HeaderMap::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Network or HTTP error"), "{err}");
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::with_config(fast_retry(3), DEFAULT_TIMEOUT).unwrap();
    let body = client
        .fetch_json(&format!("{}/flaky", mock_server.uri()), &HeaderMap::new())
        .await
        .unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::with_config(fast_retry(2), DEFAULT_TIMEOUT).unwrap();
    let result = client
        .fetch_json(&format!("{}/down", mock_server.uri()), &HeaderMap::new())
        .await;
    assert!(matches!(result, Err(FeuError::Network { .. })));
}

#[tokio::test]
async fn test_fetch_json_cached_skips_second_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2, 3])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::with_config(fast_retry(0), DEFAULT_TIMEOUT).unwrap();
    let url = format!("{}/cached", mock_server.uri());
    let first = client.fetch_json_cached(&url, &HeaderMap::new()).await.unwrap();
    let second = client.fetch_json_cached(&url, &HeaderMap::new()).await.unwrap();
    assert_eq!(first, second);
    assert!(client.cache().contains_fresh(&url));
}
