//! Ordered fan-out over multiple sinks.

use async_trait::async_trait;
use tracing::warn;

use schema::CanonicalEvent;

use crate::EventPublisher;

/// Publishes each event to an ordered sequence of sinks.
///
/// All sinks are attempted in order even if an earlier one fails — no
/// short-circuit — and the aggregate result is `true` only when every sink
/// succeeded. The aggregate bool deliberately hides which sink failed;
/// each failure is logged with its position so operators still see the
/// detail.
#[derive(Default)]
pub struct CompositePublisher {
    publishers: Vec<Box<dyn EventPublisher>>,
}

impl CompositePublisher {
    /// Creates a composite over the given sinks, attempted in order.
    pub fn new(publishers: Vec<Box<dyn EventPublisher>>) -> Self {
        Self { publishers }
    }

    /// Appends a sink after the existing ones.
    pub fn push(&mut self, publisher: Box<dyn EventPublisher>) {
        self.publishers.push(publisher);
    }

    /// Number of configured sinks.
    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    /// Returns `true` if no sinks are configured.
    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }
}

#[async_trait]
impl EventPublisher for CompositePublisher {
    async fn publish(&self, event: &CanonicalEvent) -> bool {
        let mut all_delivered = true;
        for (index, publisher) in self.publishers.iter().enumerate() {
            if !publisher.publish(event).await {
                warn!(event_id = %event.id, sink = index, "sink reported delivery failure");
                all_delivered = false;
            }
        }
        all_delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_event;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Sink stub that records how often it was invoked.
    struct RecordingPublisher {
        calls: Arc<AtomicUsize>,
        succeed: bool,
    }

    impl RecordingPublisher {
        fn boxed(calls: &Arc<AtomicUsize>, succeed: bool) -> Box<dyn EventPublisher> {
            Box::new(Self {
                calls: Arc::clone(calls),
                succeed,
            })
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, _event: &CanonicalEvent) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.succeed
        }
    }

    #[tokio::test]
    async fn all_sinks_are_attempted_and_one_failure_fails_the_aggregate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let composite = CompositePublisher::new(vec![
            RecordingPublisher::boxed(&calls, true),
            RecordingPublisher::boxed(&calls, false),
            RecordingPublisher::boxed(&calls, true),
        ]);

        assert!(!composite.publish(&sample_event()).await);
        // The failing middle sink must not short-circuit the third.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn aggregate_succeeds_when_every_sink_succeeds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let composite = CompositePublisher::new(vec![
            RecordingPublisher::boxed(&calls, true),
            RecordingPublisher::boxed(&calls, true),
        ]);

        assert!(composite.publish(&sample_event()).await);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_composite_vacuously_succeeds() {
        let composite = CompositePublisher::default();
        assert!(composite.is_empty());
        assert!(composite.publish(&sample_event()).await);
    }
}
