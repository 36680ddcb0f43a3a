//! Retry behavior exercised end to end against a mock server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use cursor_sdk::{CursorClient, ErrorKind, RetryPolicy, with_retry};

fn client_for(server: &mockito::ServerGuard) -> CursorClient {
    CursorClient::builder("test_key")
        .base_url(server.url())
        .build()
        .unwrap()
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::default().with_initial_delay(Duration::from_millis(1))
}

#[tokio::test]
async fn test_successful_request_hits_server_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v0/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"apiKeyName": "ci"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let me = with_retry(&RetryPolicy::default(), "get_v0_me", || client.get_v0_me())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(me["apiKeyName"], "ci");
}

#[test_log::test(tokio::test)]
async fn test_rate_limited_request_retries_until_exhaustion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v0/agents")
        .with_status(429)
        .with_header("retry-after", "0.01")
        .with_body(r#"{"message": "rate limited"}"#)
        .expect(3)
        .create_async()
        .await;

    let client = client_for(&server);
    let policy = fast_policy().with_max_retries(2);
    let result = with_retry(&policy, "get_v0_agents", || client.get_v0_agents()).await;

    // max_retries = 2 means exactly three requests on the wire.
    mock.assert_async().await;
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimit);
    assert_eq!(err.status_code(), Some(429));
}

#[tokio::test]
async fn test_auth_error_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v0/me")
        .with_status(401)
        .with_body(r#"{"error": "invalid api key"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let result = with_retry(&RetryPolicy::default(), "get_v0_me", || client.get_v0_me()).await;

    mock.assert_async().await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Auth);
}

#[tokio::test]
async fn test_retry_after_overrides_backoff() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v0/models")
        .with_status(429)
        .with_header("retry-after", "0.05")
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    // The schedule would wait 5s between attempts; the hint says 50ms.
    let policy = RetryPolicy::default()
        .with_max_retries(1)
        .with_initial_delay(Duration::from_secs(5));

    let start = Instant::now();
    let result = with_retry(&policy, "get_v0_models", || client.get_v0_models()).await;
    let elapsed = start.elapsed();

    mock.assert_async().await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::RateLimit);
    assert!(elapsed >= Duration::from_millis(50));
    assert!(elapsed < Duration::from_secs(5));
}

#[tokio::test]
async fn test_invalid_retry_after_falls_back_to_backoff() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v0/models")
        .with_status(429)
        .with_header("retry-after", "soon")
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    let policy = RetryPolicy::default()
        .with_max_retries(1)
        .with_initial_delay(Duration::from_millis(100));

    let start = Instant::now();
    let result = with_retry(&policy, "get_v0_models", || client.get_v0_models()).await;

    mock.assert_async().await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::RateLimit);
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_delays_are_capped_at_max_delay() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v0/models")
        .with_status(429)
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    let policy = RetryPolicy::default()
        .with_max_retries(1)
        .with_initial_delay(Duration::from_secs(2))
        .with_max_delay(Duration::from_millis(50));

    let start = Instant::now();
    let result = with_retry(&policy, "get_v0_models", || client.get_v0_models()).await;
    let elapsed = start.elapsed();

    mock.assert_async().await;
    assert!(result.is_err());
    assert!(elapsed >= Duration::from_millis(50));
    assert!(elapsed < Duration::from_secs(1));
}

#[test_log::test(tokio::test)]
async fn test_connection_refused_maps_to_network_and_retries() {
    // Bind a port and drop the listener so nothing is listening there.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = CursorClient::builder("test_key")
        .base_url(format!("http://{}", addr))
        .build()
        .unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);
    let policy = fast_policy().with_max_retries(2);

    let client_ref = &client;
    let result = with_retry(&policy, "get_v0_me", || {
        let calls = Arc::clone(&calls_clone);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            client_ref.get_v0_me().await
        }
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
