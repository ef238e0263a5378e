//! Console sink.

use async_trait::async_trait;

use schema::CanonicalEvent;

use crate::EventPublisher;

/// Writes a human-readable rendering of each event to stdout.
///
/// Always succeeds. The rendering is deterministic for a given event:
/// type, source, actor, repository, and timestamp header lines followed by
/// the full serialised body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePublisher;

impl ConsolePublisher {
    /// Renders the event exactly as [`publish`] prints it.
    ///
    /// [`publish`]: EventPublisher::publish
    fn render(event: &CanonicalEvent) -> String {
        let rule = "=".repeat(80);
        let body = serde_json::to_string_pretty(&event.to_json())
            .unwrap_or_else(|_| event.to_json().to_string());
        format!(
            "{rule}\n\
             Event: {}\n\
             Source: {}\n\
             Actor: {}\n\
             Repository: {}\n\
             Timestamp: {}\n\
             {}\n\
             {body}\n\
             {rule}",
            event.event_type,
            event.source,
            event.actor.username,
            event.repository.full_name,
            event.timestamp.to_rfc3339(),
            "-".repeat(80),
        )
    }
}

#[async_trait]
impl EventPublisher for ConsolePublisher {
    async fn publish(&self, event: &CanonicalEvent) -> bool {
        println!("{}", Self::render(event));
        true
    }
}
