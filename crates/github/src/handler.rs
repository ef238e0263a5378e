//! Webhook request orchestration.
//!
//! [`WebhookHandler`] is the single entry point the transport layer calls.
//! Per request it runs: verify signature → parse body → identify category
//! and delivery id → dispatch to the registered mapper → map. No state is
//! retained across requests, so one handler instance can serve any number
//! of concurrent requests without locking.

use serde_json::Value;
use tracing::{debug, error, warn};

use schema::{CanonicalEvent, DeliveryId, EventCategory, WebhookError};

use crate::mappers::{
    map_issue_comment_event, map_issue_event, map_pull_request_event,
    map_pull_request_review_event, map_push_event, map_release_event, MapperFn,
};
use crate::signature::verify_signature;

/// Returns the mapper registered for an inbound event category.
///
/// Supporting a new category means writing one mapper in [`crate::mappers`]
/// and adding one arm here; no other component changes.
fn registered_mapper(category: &str) -> Option<MapperFn> {
    match category {
        "push" => Some(map_push_event),
        "pull_request" => Some(map_pull_request_event),
        "issues" => Some(map_issue_event),
        "issue_comment" => Some(map_issue_comment_event),
        "pull_request_review" => Some(map_pull_request_review_event),
        "release" => Some(map_release_event),
        _ => None,
    }
}

/// One inbound webhook delivery, as handed over by the transport layer.
///
/// The three header values are GitHub's `X-Hub-Signature-256`,
/// `X-GitHub-Event`, and `X-GitHub-Delivery`. `body` is the raw, unparsed
/// byte stream — signature verification depends on the exact bytes.
#[derive(Debug, Clone, Copy)]
pub struct WebhookRequest<'a> {
    /// Algorithm-tagged signature header value, if present.
    pub signature: Option<&'a str>,
    /// Event category header value, if present.
    pub category: Option<&'a str>,
    /// Delivery identifier header value, if present.
    pub delivery_id: Option<&'a str>,
    /// Raw request body.
    pub body: &'a [u8],
}

/// Handles incoming GitHub webhook deliveries.
pub struct WebhookHandler {
    secret: Vec<u8>,
}

impl WebhookHandler {
    /// Creates a handler that verifies deliveries against `secret`.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Processes one complete webhook delivery.
    ///
    /// Returns `Ok(Some(event))` for a mapped delivery, `Ok(None)` when the
    /// category has no registered mapper (unsupported categories are
    /// ignorable, not errors — the caller should acknowledge receipt).
    ///
    /// # Errors
    ///
    /// - [`WebhookError::Unauthorized`] — signature missing or invalid.
    /// - [`WebhookError::MalformedPayload`] — body not valid JSON, or the
    ///   category / delivery-id header absent.
    /// - [`WebhookError::MappingFailure`] — the registered mapper hit a
    ///   payload shape it did not anticipate.
    pub fn handle(&self, request: &WebhookRequest<'_>) -> Result<Option<CanonicalEvent>, WebhookError> {
        if !verify_signature(
            request.body,
            request.signature.unwrap_or_default(),
            &self.secret,
        ) {
            return Err(WebhookError::Unauthorized);
        }

        let payload: Value =
            serde_json::from_slice(request.body).map_err(|e| WebhookError::MalformedPayload {
                reason: format!("body is not valid JSON: {e}"),
            })?;

        let category = request
            .category
            .and_then(EventCategory::new)
            .ok_or_else(|| WebhookError::MalformedPayload {
                reason: "missing event category header".to_string(),
            })?;
        let delivery_id = request
            .delivery_id
            .and_then(DeliveryId::new)
            .ok_or_else(|| WebhookError::MalformedPayload {
                reason: "missing delivery id header".to_string(),
            })?;

        self.process(&category, &payload, &delivery_id)
    }

    /// Dispatches an already-parsed payload to the registered mapper.
    ///
    /// For callers that have done their own transport handling; [`handle`]
    /// delegates here after verification and parsing.
    ///
    /// [`handle`]: WebhookHandler::handle
    pub fn process(
        &self,
        category: &EventCategory,
        payload: &Value,
        delivery_id: &DeliveryId,
    ) -> Result<Option<CanonicalEvent>, WebhookError> {
        let Some(mapper) = registered_mapper(category.as_str()) else {
            warn!(category = %category, delivery_id = %delivery_id, "unsupported event category, ignoring");
            return Ok(None);
        };

        match mapper(payload, delivery_id) {
            Ok(event) => {
                debug!(
                    category = %category,
                    delivery_id = %delivery_id,
                    event_type = %event.event_type,
                    "mapped webhook delivery"
                );
                Ok(Some(event))
            }
            Err(e) => {
                error!(category = %category, delivery_id = %delivery_id, error = %e, "mapper failed");
                Err(WebhookError::MappingFailure {
                    category: category.clone(),
                    delivery_id: delivery_id.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}
