//! HookRelay GitHub infrastructure adapter.
//!
//! Turns raw GitHub webhook deliveries into [`schema::CanonicalEvent`]
//! values. Three concerns live here:
//!
//! - [`signature`] — HMAC-SHA256 verification of the raw request body
//!   against the `X-Hub-Signature-256` header.
//! - [`mappers`] — one pure function per supported event category,
//!   translating the GitHub payload shape into the canonical schema.
//! - [`handler`] — the orchestration entry point external collaborators
//!   call: verify, parse, identify, dispatch, map.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** All GitHub wire details (header names, payload
//! shapes, signature scheme) are contained here; the [`schema`] crate never
//! sees them, and sinks only ever receive fully constructed canonical
//! events.

pub mod handler;
pub mod mappers;
pub mod signature;

pub use handler::{WebhookHandler, WebhookRequest};
pub use signature::verify_signature;
