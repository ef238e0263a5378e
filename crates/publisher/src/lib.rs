//! HookRelay event sinks.
//!
//! A sink accepts a fully constructed [`schema::CanonicalEvent`] and
//! reports delivery success as a plain `bool`: `true` means delivered,
//! `false` means a recoverable delivery failure. Ordinary transport
//! failures never surface as errors or panics — the core performs no
//! retries, so a failed publish is reported up and the source platform's
//! at-least-once redelivery acts as the retry mechanism.
//!
//! Three sinks are provided:
//!
//! - [`ConsolePublisher`] — human-readable rendering to stdout, always
//!   succeeds. For observability and local debugging.
//! - [`HttpPublisher`] — single JSON POST to a configured endpoint with a
//!   bounded timeout.
//! - [`CompositePublisher`] — ordered fan-out over any number of sinks
//!   with all-or-nothing aggregate semantics.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Sinks only consume the canonical schema; nothing
//! here knows where an event came from.

mod composite;
mod console;
mod http;

use async_trait::async_trait;

use schema::CanonicalEvent;

pub use composite::CompositePublisher;
pub use console::ConsolePublisher;
pub use http::HttpPublisher;

/// A delivery target for canonical events.
///
/// Implementations must be shareable across concurrent requests
/// (`Send + Sync`); the pipeline is stateless, so sinks are the only place
/// shared resources (e.g. an HTTP connection pool) live.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Delivers one event to the target.
    ///
    /// Returns `true` on success, `false` on a recoverable delivery
    /// failure. Implementations must not panic or propagate errors for
    /// ordinary transport failures.
    async fn publish(&self, event: &CanonicalEvent) -> bool;
}
