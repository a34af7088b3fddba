//! Task delivery over HTTP with bounded retry.
//!
//! Retries target transport unreliability only: a completed HTTP response of
//! any status ends the attempt sequence, so a 4xx/5xx from the endpoint is
//! never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::payload::TaskPayload;

/// Default number of delivery attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Per-request timeout for one delivery attempt.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of one delivery attempt sequence.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    /// True only when a response arrived with a 2xx status.
    pub succeeded: bool,
    /// Status of the completed response, if one arrived.
    pub http_status: Option<u16>,
    /// The last transport error observed, if any.
    pub last_error: Option<String>,
    /// Attempts performed; never exceeds the configured retry ceiling.
    pub attempts_made: u32,
}

/// Transport seam for the round dispatcher.
#[async_trait]
pub trait Deliver: Send + Sync {
    async fn deliver(&self, endpoint: &str, payload: &TaskPayload) -> DeliveryOutcome;
}

/// HTTP delivery client with exponential backoff between failed attempts.
pub struct HttpDelivery {
    client: Client,
    max_retries: u32,
    backoff_base: Duration,
    request_timeout: Duration,
}

impl HttpDelivery {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: Duration::from_secs(1),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the retry ceiling and backoff base unit.
    pub fn with_limits(max_retries: u32, backoff_base: Duration) -> Self {
        Self {
            max_retries,
            backoff_base,
            ..Self::new()
        }
    }

    async fn attempt(&self, endpoint: &str, payload: &TaskPayload) -> Result<u16, reqwest::Error> {
        let response = self
            .client
            .post(endpoint)
            .timeout(self.request_timeout)
            .json(payload)
            .send()
            .await?;
        Ok(response.status().as_u16())
    }
}

impl Default for HttpDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Deliver for HttpDelivery {
    async fn deliver(&self, endpoint: &str, payload: &TaskPayload) -> DeliveryOutcome {
        let mut last_error = None;

        for attempt in 0..self.max_retries {
            match self.attempt(endpoint, payload).await {
                Ok(status) => {
                    let succeeded = (200..300).contains(&status);
                    if !succeeded {
                        tracing::warn!(endpoint, status, "delivery completed with error status");
                    }
                    return DeliveryOutcome {
                        succeeded,
                        http_status: Some(status),
                        last_error,
                        attempts_made: attempt + 1,
                    };
                }
                Err(e) => {
                    tracing::warn!(endpoint, attempt = attempt + 1, error = %e, "delivery attempt failed");
                    last_error = Some(e.to_string());
                    if attempt + 1 < self.max_retries {
                        // Attempt k backs off 2^k base units before the retry.
                        tokio::time::sleep(self.backoff_base * 2u32.pow(attempt)).await;
                    }
                }
            }
        }

        DeliveryOutcome {
            succeeded: false,
            http_status: None,
            last_error,
            attempts_made: self.max_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::TaskTemplate;

    use axum::{http::StatusCode, routing::post, Router};
    use std::net::SocketAddr;

    fn sample_payload() -> TaskPayload {
        TaskTemplate::SalesSummary.build(Some(81234), "a@example.com", "s", "http://cb")
    }

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    /// Reserve a port with nothing listening on it.
    async fn dead_addr() -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let addr = serve(Router::new().route("/intake", post(|| async { StatusCode::OK }))).await;
        let client = HttpDelivery::with_limits(3, Duration::from_millis(50));

        let outcome = client
            .deliver(&format!("http://{addr}/intake"), &sample_payload())
            .await;

        assert!(outcome.succeeded);
        assert_eq!(outcome.http_status, Some(200));
        assert_eq!(outcome.attempts_made, 1);
        assert!(outcome.last_error.is_none());
    }

    #[tokio::test]
    async fn test_http_error_response_is_not_retried() {
        let addr = serve(Router::new().route(
            "/intake",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;
        let client = HttpDelivery::with_limits(3, Duration::from_millis(50));

        let outcome = client
            .deliver(&format!("http://{addr}/intake"), &sample_payload())
            .await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.http_status, Some(500));
        assert_eq!(outcome.attempts_made, 1);
    }

    #[tokio::test]
    async fn test_transport_failure_retried_until_endpoint_appears() {
        let addr = dead_addr().await;
        // First two attempts hit a closed port; the endpoint comes up before
        // the third (attempts land at roughly 0ms, 200ms, and 600ms).
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(350)).await;
            let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
            let app = Router::new().route("/intake", post(|| async { StatusCode::OK }));
            axum::serve(listener, app).await.unwrap();
        });

        let client = HttpDelivery::with_limits(3, Duration::from_millis(200));
        let outcome = client
            .deliver(&format!("http://{addr}/intake"), &sample_payload())
            .await;

        assert!(outcome.succeeded);
        assert_eq!(outcome.attempts_made, 3);
        assert_eq!(outcome.http_status, Some(200));
    }

    #[tokio::test]
    async fn test_exhaustion_reports_last_error() {
        let addr = dead_addr().await;
        let client = HttpDelivery::with_limits(3, Duration::from_millis(10));

        let outcome = client
            .deliver(&format!("http://{addr}/intake"), &sample_payload())
            .await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.http_status, None);
        assert_eq!(outcome.attempts_made, 3);
        assert!(outcome.last_error.is_some());
    }
}
