//! Cross-crate error taxonomy for the webhook pipeline.
//!
//! [`WebhookError`] covers the conditions the listener must translate into
//! HTTP responses. Component-level errors (e.g. the mapper crate's field
//! extraction errors) are defined in their respective modules and wrapped
//! into this taxonomy at the handler boundary.
//!
//! One outcome is deliberately *not* an error: an event category with no
//! registered mapper. The handler reports it as "no event produced"
//! (`Ok(None)`) so callers acknowledge receipt without failing the request.

use thiserror::Error;

use crate::{DeliveryId, EventCategory};

/// Errors surfaced by the verification / mapping / publishing pipeline.
///
/// The variants map onto distinct caller responses: [`Unauthorized`] and
/// [`MalformedPayload`] are client errors, [`MappingFailure`] and
/// [`PublishFailure`] are server errors. None of them are retried by the
/// core; at-least-once redelivery from the source platform is the retry
/// mechanism.
///
/// [`Unauthorized`]: WebhookError::Unauthorized
/// [`MalformedPayload`]: WebhookError::MalformedPayload
/// [`MappingFailure`]: WebhookError::MappingFailure
/// [`PublishFailure`]: WebhookError::PublishFailure
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request signature was missing or did not match the shared secret.
    ///
    /// Produced before the body is ever parsed; an unauthenticated payload
    /// never reaches a mapper.
    #[error("webhook signature missing or invalid")]
    Unauthorized,

    /// The body was not parseable as JSON, or a required routing header
    /// (event category, delivery id) was absent.
    #[error("malformed webhook payload: {reason}")]
    MalformedPayload {
        /// What was missing or unparseable.
        reason: String,
    },

    /// A registered mapper hit a payload shape it did not anticipate
    /// (e.g. an unexpectedly absent required field).
    ///
    /// Carries the category and delivery id so the failing delivery can be
    /// found in the source platform's redelivery UI. Retrying the identical
    /// payload would fail identically, so the core never retries these.
    #[error("failed to map '{category}' event (delivery {delivery_id}): {reason}")]
    MappingFailure {
        /// Inbound event category whose mapper failed.
        category: EventCategory,
        /// Delivery the failure occurred on.
        delivery_id: DeliveryId,
        /// Description of the unexpected payload shape.
        reason: String,
    },

    /// A sink (or the composite aggregate) reported delivery failure.
    ///
    /// Mapping is pure, so there is nothing to roll back; the caller decides
    /// whether to surface the failure or accept platform redelivery.
    #[error("failed to publish event {event_id}")]
    PublishFailure {
        /// Id of the event that could not be delivered.
        event_id: DeliveryId,
    },
}
