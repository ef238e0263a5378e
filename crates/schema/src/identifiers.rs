//! Newtype domain identifiers.
//!
//! Identifiers that travel between crates are distinct newtypes wrapping a
//! `String`. This prevents accidentally interchanging — for example — a
//! [`DeliveryId`] with an [`EventCategory`] even though both are strings
//! under the hood.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Unique identifier the source platform assigns to one webhook delivery
    /// attempt (GitHub's `X-GitHub-Delivery` header).
    ///
    /// Used verbatim as [`crate::CanonicalEvent`]'s `id`. Uniqueness is the
    /// platform's responsibility; HookRelay does not deduplicate redeliveries.
    DeliveryId
}

string_id! {
    /// Inbound event classification as sent by the source platform
    /// (GitHub's `X-GitHub-Event` header, e.g. `"push"`, `"pull_request"`).
    ///
    /// Selects which mapper handles a payload. Distinct from the canonical
    /// [`crate::EventType`] the mapper ultimately emits.
    EventCategory
}
