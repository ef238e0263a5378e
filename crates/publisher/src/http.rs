//! HTTP endpoint sink.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use schema::CanonicalEvent;

use crate::EventPublisher;

/// Upper bound on one outbound publish, so a slow or unreachable
/// downstream cannot stall the handler indefinitely.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers each event as a single JSON POST to a configured endpoint.
///
/// Any non-2xx response or transport error (timeout, connection refused,
/// DNS failure) is reported as `false`; nothing is retried here.
pub struct HttpPublisher {
    client: Client,
    endpoint_url: String,
    bearer_token: Option<String>,
    extra_headers: Vec<(String, String)>,
}

impl HttpPublisher {
    /// Creates a publisher targeting `endpoint_url`.
    ///
    /// The underlying client enforces the publish timeout and is reused
    /// across deliveries (connection pooling).
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(PUBLISH_TIMEOUT)
            .build()
            // Builder only fails on TLS backend misconfiguration, which is
            // a programming error rather than a runtime condition.
            .expect("HTTP client construction");
        Self {
            client,
            endpoint_url: endpoint_url.into(),
            bearer_token: None,
            extra_headers: Vec::new(),
        }
    }

    /// Sends `Authorization: Bearer <token>` with every delivery.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Adds a header to every delivery (may be called repeatedly).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }
}

#[async_trait]
impl EventPublisher for HttpPublisher {
    async fn publish(&self, event: &CanonicalEvent) -> bool {
        let mut request = self.client.post(&self.endpoint_url).json(event);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        for (name, value) in &self.extra_headers {
            request = request.header(name, value);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!(
                    event_id = %event.id,
                    endpoint = %self.endpoint_url,
                    status = %response.status(),
                    "event endpoint rejected publish"
                );
                false
            }
            Err(e) => {
                warn!(
                    event_id = %event.id,
                    endpoint = %self.endpoint_url,
                    error = %e,
                    "failed to reach event endpoint"
                );
                false
            }
        }
    }
}
