use super::*;

#[test]
fn test_transient_statuses() {
    assert!(is_transient_status(StatusCode::SERVICE_UNAVAILABLE));
    assert!(is_transient_status(StatusCode::BAD_GATEWAY));
    assert!(is_transient_status(StatusCode::GATEWAY_TIMEOUT));
    assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));

    assert!(!is_transient_status(StatusCode::OK));
    assert!(!is_transient_status(StatusCode::BAD_REQUEST));
    assert!(!is_transient_status(StatusCode::NOT_FOUND));
    assert!(!is_transient_status(StatusCode::INTERNAL_SERVER_ERROR));
}

#[test]
fn test_delay_doubles_until_cap() {
    let policy = RetryPolicy {
        initial_delay: Duration::from_millis(100),
        max_delay: Duration::from_millis(1_000),
        ..Default::default()
    };

    assert_eq!(policy.delay_for(0), Duration::from_millis(100));
    assert_eq!(policy.delay_for(1), Duration::from_millis(200));
    assert_eq!(policy.delay_for(3), Duration::from_millis(800));
    assert_eq!(policy.delay_for(4), Duration::from_millis(1_000));
    assert_eq!(policy.delay_for(60), Duration::from_millis(1_000));
}

#[test]
fn test_timeout_retry_follows_flag() {
    let timeout = OpensearchClientError::Timeout {
        method: Some("bulk_index".to_string()),
    };

    let retrying = RetryPolicy::default();
    assert!(retrying.should_retry_error(&timeout));

    let not_retrying = RetryPolicy {
        retry_on_timeout: false,
        ..Default::default()
    };
    assert!(!not_retrying.should_retry_error(&timeout));
}

#[test]
fn test_connection_failures_always_retry() {
    let policy = RetryPolicy {
        retry_on_timeout: false,
        ..Default::default()
    };
    let err = OpensearchClientError::ConnectionFailed {
        details: "connection refused".to_string(),
        method: None,
    };
    assert!(policy.should_retry_error(&err));

    let not_transport = OpensearchClientError::NetworkError {
        status_code: 400,
        message: "bad request".to_string(),
    };
    assert!(!policy.should_retry_error(&not_transport));
}

mod send_loop {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::Instant;

    use super::*;
    use crate::{ConnectionConfig, OpensearchClient, stub_server::serve_status};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            retry_on_timeout: true,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
        }
    }

    fn client(url: &str, retry: RetryPolicy) -> OpensearchClient {
        OpensearchClient::new(ConnectionConfig {
            url: url.to_string(),
            timeout: Duration::from_secs(2),
            retry,
            ..ConnectionConfig::from_parts("http", "127.0.0.1", 1)
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_refused_connection_retries_then_fails() {
        let policy = fast_policy(3);
        let client = client("http://127.0.0.1:1", policy.clone());
        let attempts = AtomicU32::new(0);

        let started = Instant::now();
        let err = policy
            .send("info", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                client.inner.info().send()
            })
            .await
            .unwrap_err();
        let elapsed = started.elapsed();

        assert!(
            matches!(err, OpensearchClientError::ConnectionFailed { .. }),
            "{err:?}"
        );
        assert!(err.is_unavailable());
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        // 50 + 100 + 200 ms of backoff
        assert!(elapsed >= Duration::from_millis(350), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(10), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_ping_against_refused_port_is_unavailable() {
        let client = client("http://127.0.0.1:1", fast_policy(2));

        let err = client.ping().await.unwrap_err();

        assert!(
            matches!(err, OpensearchClientError::ConnectionFailed { .. }),
            "{err:?}"
        );
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_transient_status_is_returned_after_retries() {
        let policy = fast_policy(2);
        let client = client(&serve_status("503 Service Unavailable").await, policy.clone());
        let attempts = AtomicU32::new(0);

        let response = policy
            .send("info", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                client.inner.info().send()
            })
            .await
            .unwrap();

        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);

        let err = client.info().await.unwrap_err();
        assert!(
            matches!(
                err,
                OpensearchClientError::NetworkError {
                    status_code: 503,
                    ..
                }
            ),
            "{err:?}"
        );
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_client_error_status_is_not_retried() {
        let policy = fast_policy(5);
        let client = client(&serve_status("400 Bad Request").await, policy.clone());
        let attempts = AtomicU32::new(0);

        let response = policy
            .send("info", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                client.inner.info().send()
            })
            .await
            .unwrap();

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
