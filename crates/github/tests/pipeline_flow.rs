//! Full pipeline flow over the public API: a signed GitHub delivery is
//! verified, mapped to a canonical event, and handed to a publisher stack.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use github::signature::sign;
use github::{WebhookHandler, WebhookRequest};
use publisher::{CompositePublisher, ConsolePublisher, EventPublisher};
use schema::{CanonicalEvent, EventType};

const SECRET: &[u8] = b"integration-secret";

struct CountingSink {
    delivered: Arc<AtomicUsize>,
}

#[async_trait]
impl EventPublisher for CountingSink {
    async fn publish(&self, event: &CanonicalEvent) -> bool {
        assert_eq!(event.source, "github");
        self.delivered.fetch_add(1, Ordering::SeqCst);
        true
    }
}

fn signed_push_request<'a>(body: &'a [u8], signature: &'a str) -> WebhookRequest<'a> {
    WebhookRequest {
        signature: Some(signature),
        category: Some("push"),
        delivery_id: Some("flow-delivery-1"),
        body,
    }
}

#[tokio::test]
async fn signed_push_flows_from_wire_bytes_to_sinks() {
    let body = serde_json::to_vec(&json!({
        "ref": "refs/heads/main",
        "before": "abc123",
        "after": "def456",
        "pusher": {"id": 1, "login": "testuser"},
        "repository": {
            "id": 123,
            "name": "test-repo",
            "full_name": "testuser/test-repo",
            "owner": {"login": "testuser"},
            "html_url": "https://github.com/testuser/test-repo",
            "default_branch": "main"
        },
        "commits": [{
            "id": "def456",
            "message": "Test commit",
            "timestamp": "2026-02-27T21:00:00Z",
            "author": {"username": "testuser", "name": "Test User", "email": "test@example.com"},
            "added": ["file1.txt"],
            "modified": ["file2.txt"],
            "removed": []
        }]
    }))
    .unwrap();
    let signature = sign(&body, SECRET);

    let handler = WebhookHandler::new(SECRET);
    let event = handler
        .handle(&signed_push_request(&body, &signature))
        .expect("pipeline should accept a signed push")
        .expect("push is a registered category");

    assert_eq!(event.event_type, EventType::CodePush);
    assert_eq!(event.id.as_str(), "flow-delivery-1");
    assert_eq!(event.changes.len(), 1);
    assert_eq!(event.metadata.r#ref.as_deref(), Some("refs/heads/main"));

    let delivered = Arc::new(AtomicUsize::new(0));
    let publisher = CompositePublisher::new(vec![
        Box::new(ConsolePublisher),
        Box::new(CountingSink {
            delivered: Arc::clone(&delivered),
        }),
    ]);
    assert!(publisher.publish(&event).await);
    assert_eq!(delivered.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn tampered_body_never_reaches_mapping_or_publishing() {
    let body = serde_json::to_vec(&json!({"ref": "refs/heads/main"})).unwrap();
    let signature = sign(&body, SECRET);

    let mut tampered = body.clone();
    tampered[0] ^= 0x01;

    let handler = WebhookHandler::new(SECRET);
    let outcome = handler.handle(&signed_push_request(&tampered, &signature));
    assert!(matches!(outcome, Err(schema::WebhookError::Unauthorized)));
}
