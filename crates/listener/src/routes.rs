//! HTTP routes: health check and the GitHub webhook endpoint.
//!
//! The webhook route is a thin translation layer: it lifts the three
//! GitHub routing headers and the raw body into a
//! [`github::WebhookRequest`], runs the handler, publishes the resulting
//! event, and maps pipeline outcomes onto HTTP status codes. All pipeline
//! semantics live in the `github` and `publisher` crates.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};
use tracing::error;

use github::{WebhookHandler, WebhookRequest};
use publisher::EventPublisher;
use schema::WebhookError;

/// GitHub's signature header.
const SIGNATURE_HEADER: &str = "x-hub-signature-256";
/// GitHub's event category header.
const EVENT_HEADER: &str = "x-github-event";
/// GitHub's delivery id header.
const DELIVERY_HEADER: &str = "x-github-delivery";

/// Shared application state injected into every request.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<WebhookHandler>,
    pub publisher: Arc<dyn EventPublisher>,
}

/// `GET /health`
pub async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({"status": "healthy"})))
}

/// `POST /webhooks/github`
pub async fn github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let request = WebhookRequest {
        signature: header_str(&headers, SIGNATURE_HEADER),
        category: header_str(&headers, EVENT_HEADER),
        delivery_id: header_str(&headers, DELIVERY_HEADER),
        body: &body,
    };

    let event = match state.handler.handle(&request) {
        Ok(Some(event)) => event,
        Ok(None) => {
            return (
                StatusCode::OK,
                Json(json!({
                    "status": "ignored",
                    "message": "Event type not supported"
                })),
            );
        }
        Err(e) => return error_response(&e),
    };

    if state.publisher.publish(&event).await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "event_id": event.id,
                "event_type": event.event_type,
            })),
        )
    } else {
        let e = WebhookError::PublishFailure {
            event_id: event.id.clone(),
        };
        error!(error = %e, "publish failed");
        error_response(&e)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Maps pipeline failures onto client/server error responses.
fn error_response(error: &WebhookError) -> (StatusCode, Json<Value>) {
    let status = match error {
        WebhookError::Unauthorized => StatusCode::UNAUTHORIZED,
        WebhookError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
        WebhookError::MappingFailure { .. } | WebhookError::PublishFailure { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(json!({"status": "error", "message": error.to_string()})),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{DeliveryId, EventCategory};

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let (status, _) = error_response(&WebhookError::Unauthorized);
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = error_response(&WebhookError::MalformedPayload {
            reason: "missing header".to_string(),
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(&WebhookError::MappingFailure {
            category: EventCategory::new("push").unwrap(),
            delivery_id: DeliveryId::new("d-1").unwrap(),
            reason: "missing field".to_string(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = error_response(&WebhookError::PublishFailure {
            event_id: DeliveryId::new("d-1").unwrap(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn header_lookup_is_case_insensitive_and_total() {
        let mut headers = HeaderMap::new();
        headers.insert("X-GitHub-Event", "push".parse().unwrap());
        assert_eq!(header_str(&headers, EVENT_HEADER), Some("push"));
        assert_eq!(header_str(&headers, DELIVERY_HEADER), None);
    }
}
