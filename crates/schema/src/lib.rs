//! Canonical event domain for HookRelay.
//!
//! This crate contains the platform-agnostic event schema every other crate
//! reads and writes: the closed event-type enumeration, the canonical event
//! record, newtype identifiers, and the cross-cutting error taxonomy.
//! Infrastructure crates (`github`, `publisher`, the listener binary) depend
//! on this crate; it depends on nothing but serialisation and time.
//!
//! ## Architectural Layer
//!
//! **Domain.** This crate has no I/O dependencies. Adapters produce and
//! consume [`CanonicalEvent`] values; nothing here knows about HTTP, HMAC,
//! or any concrete source platform beyond the `source` label carried on
//! each event.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`DeliveryId`, `EventCategory`) |
//! | [`event`] | Canonical event records and enumerations |
//! | [`errors`] | The cross-crate error taxonomy (`WebhookError`) |

pub mod errors;
pub mod event;
pub mod identifiers;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::WebhookError;
pub use event::{
    Actor, CanonicalEvent, Change, ChangeType, EventMetadata, EventType, Repository,
};
pub use identifiers::{DeliveryId, EventCategory};
