//! Canonical event records and enumerations.
//!
//! One inbound webhook delivery normalises to exactly one [`CanonicalEvent`].
//! Every record here is constructed fresh per delivery, lives only for the
//! duration of mapping + publishing, and is never retained — HookRelay is
//! stateless across requests.
//!
//! ## Serialisation contract
//!
//! The JSON rendering is the outbound wire format consumed by sinks:
//! enumeration values render as their dotted string codes (never numeric
//! indices), nested records render as objects, ordered sequences keep their
//! order, and unset optional fields render as `null` so consumers can
//! distinguish "absent" from "empty string / zero".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DeliveryId;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Closed enumeration of canonical event types across all source platforms.
///
/// The inbound event *category* (`push`, `issues`, ...) selects a mapper;
/// the mapper then emits one of these types, which may depend on payload
/// content (e.g. a `pull_request` category with action `closed` becomes
/// [`EventType::PrMerged`] or [`EventType::PrClosed`] depending on the
/// pull request's `merged` flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    // Code events
    #[serde(rename = "code.push")]
    CodePush,
    #[serde(rename = "code.commit")]
    CodeCommit,

    // Pull request events
    #[serde(rename = "pr.opened")]
    PrOpened,
    #[serde(rename = "pr.closed")]
    PrClosed,
    #[serde(rename = "pr.merged")]
    PrMerged,
    #[serde(rename = "pr.reopened")]
    PrReopened,
    #[serde(rename = "pr.updated")]
    PrUpdated,
    #[serde(rename = "pr.reviewed")]
    PrReviewed,
    #[serde(rename = "pr.review_requested")]
    PrReviewRequested,
    #[serde(rename = "pr.comment")]
    PrComment,

    // Issue events
    #[serde(rename = "issue.opened")]
    IssueOpened,
    #[serde(rename = "issue.closed")]
    IssueClosed,
    #[serde(rename = "issue.reopened")]
    IssueReopened,
    #[serde(rename = "issue.updated")]
    IssueUpdated,
    #[serde(rename = "issue.comment")]
    IssueComment,

    // Release events
    #[serde(rename = "release.published")]
    ReleasePublished,
    #[serde(rename = "release.created")]
    ReleaseCreated,
    #[serde(rename = "release.deleted")]
    ReleaseDeleted,

    // Deployment events
    #[serde(rename = "deployment.started")]
    DeploymentStarted,
    #[serde(rename = "deployment.completed")]
    DeploymentCompleted,
    #[serde(rename = "deployment.failed")]
    DeploymentFailed,
}

impl EventType {
    /// Returns the dotted string code used on the wire (e.g. `"code.push"`).
    pub fn code(self) -> &'static str {
        match self {
            Self::CodePush => "code.push",
            Self::CodeCommit => "code.commit",
            Self::PrOpened => "pr.opened",
            Self::PrClosed => "pr.closed",
            Self::PrMerged => "pr.merged",
            Self::PrReopened => "pr.reopened",
            Self::PrUpdated => "pr.updated",
            Self::PrReviewed => "pr.reviewed",
            Self::PrReviewRequested => "pr.review_requested",
            Self::PrComment => "pr.comment",
            Self::IssueOpened => "issue.opened",
            Self::IssueClosed => "issue.closed",
            Self::IssueReopened => "issue.reopened",
            Self::IssueUpdated => "issue.updated",
            Self::IssueComment => "issue.comment",
            Self::ReleasePublished => "release.published",
            Self::ReleaseCreated => "release.created",
            Self::ReleaseDeleted => "release.deleted",
            Self::DeploymentStarted => "deployment.started",
            Self::DeploymentCompleted => "deployment.completed",
            Self::DeploymentFailed => "deployment.failed",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------

/// Kind of a single [`Change`] within an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    #[serde(rename = "commit")]
    Commit,
    #[serde(rename = "file.add")]
    FileAdd,
    #[serde(rename = "file.modify")]
    FileModify,
    #[serde(rename = "file.delete")]
    FileDelete,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Person or system that triggered an event.
///
/// Copied by value into events; carries no ownership semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Platform-assigned identifier, stringified.
    pub id: String,
    /// Platform login / username.
    pub username: String,
    /// Display name, when the payload carries one.
    pub name: Option<String>,
    /// Email address, when the payload carries one.
    pub email: Option<String>,
    /// Avatar image URL, when the payload carries one.
    pub avatar_url: Option<String>,
}

impl Actor {
    /// Creates an actor with only the required fields set.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            name: None,
            email: None,
            avatar_url: None,
        }
    }
}

// ---------------------------------------------------------------------------

/// Repository context for an event. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// Platform-assigned identifier, stringified.
    pub id: String,
    /// Short repository name (e.g. `"test-repo"`).
    pub name: String,
    /// Owner-qualified name (e.g. `"testuser/test-repo"`).
    pub full_name: String,
    /// Owner login.
    pub owner: String,
    /// Web URL of the repository.
    pub url: String,
    /// Default branch; `"main"` when the payload does not say.
    pub default_branch: String,
}

// ---------------------------------------------------------------------------

/// One atomic modification unit (a commit, or a single file change).
///
/// A push event carries its changes in delivery order; consumers must not
/// assume any other ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// What kind of change this is.
    #[serde(rename = "type")]
    pub kind: ChangeType,
    /// Change identifier (commit SHA for [`ChangeType::Commit`]).
    pub id: String,
    /// Commit message, when applicable.
    pub message: Option<String>,
    /// Source platform's timestamp for the change, passed through verbatim.
    pub timestamp: Option<String>,
    /// Author of the change, when the payload identifies one.
    pub author: Option<Actor>,
    /// Paths added, in payload order.
    pub files_added: Vec<String>,
    /// Paths modified, in payload order.
    pub files_modified: Vec<String>,
    /// Paths removed, in payload order.
    pub files_removed: Vec<String>,
}

// ---------------------------------------------------------------------------

/// Category-specific metadata bag.
///
/// A wide record of optional fields: mappers populate only the fields
/// relevant to the event's category and leave everything else unset, so the
/// serialised form distinguishes "absent" (`null`) from "empty". `labels`
/// and `assignees` are sets by meaning but kept as ordered sequences for
/// stable serialisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    // Git / branch metadata
    pub r#ref: Option<String>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub created: Option<bool>,
    pub deleted: Option<bool>,
    pub forced: Option<bool>,
    pub base_ref: Option<String>,
    pub compare_url: Option<String>,

    // Pull request metadata
    pub pr_number: Option<u64>,
    pub pr_title: Option<String>,
    pub pr_state: Option<String>,
    pub pr_url: Option<String>,
    pub pr_merged: Option<bool>,
    pub pr_draft: Option<bool>,
    pub pr_base_ref: Option<String>,
    pub pr_head_ref: Option<String>,
    pub pr_author: Option<String>,

    // Issue metadata
    pub issue_number: Option<u64>,
    pub issue_title: Option<String>,
    pub issue_state: Option<String>,
    pub issue_url: Option<String>,
    pub issue_author: Option<String>,

    // Comment metadata
    pub comment_id: Option<u64>,
    pub comment_body: Option<String>,
    pub comment_url: Option<String>,

    // Review metadata
    pub review_id: Option<u64>,
    pub review_state: Option<String>,
    pub review_body: Option<String>,
    pub review_url: Option<String>,

    // Release metadata
    pub release_id: Option<u64>,
    pub release_name: Option<String>,
    pub release_tag: Option<String>,
    pub release_url: Option<String>,
    pub release_draft: Option<bool>,
    pub release_prerelease: Option<bool>,

    // Common metadata
    pub action: Option<String>,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,

    // Free-form extension point for platform-specific extras.
    pub custom: serde_json::Map<String, Value>,
}

// ---------------------------------------------------------------------------

/// The platform-agnostic normalised representation of one inbound webhook
/// occurrence. Root of the canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    /// The platform's delivery identifier. Unique per delivery attempt;
    /// uniqueness (and redelivery) is the platform's responsibility.
    pub id: DeliveryId,
    /// Canonical event type.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Source platform identifier (e.g. `"github"`).
    pub source: String,
    /// Time of *processing* (system clock at mapping time), not the
    /// platform's original event time. Serialises as RFC 3339 UTC.
    pub timestamp: DateTime<Utc>,
    /// Who triggered the event.
    pub actor: Actor,
    /// Repository context.
    pub repository: Repository,
    /// Category-specific metadata.
    pub metadata: EventMetadata,
    /// Ordered list of changes; empty for events that carry none.
    pub changes: Vec<Change>,
    /// Opaque passthrough of the original payload, for audit and debugging.
    pub raw_payload: Value,
}

impl CanonicalEvent {
    /// Renders the event as the JSON mapping defined by the serialisation
    /// contract.
    pub fn to_json(&self) -> Value {
        // Infallible: every field serialises to JSON (string-keyed maps only).
        serde_json::to_value(self).expect("canonical event serialises to JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_event() -> CanonicalEvent {
        CanonicalEvent {
            id: DeliveryId::new("delivery-1").unwrap(),
            event_type: EventType::CodePush,
            source: "github".to_string(),
            timestamp: Utc::now(),
            actor: Actor::new("1", "testuser"),
            repository: Repository {
                id: "123".to_string(),
                name: "test-repo".to_string(),
                full_name: "testuser/test-repo".to_string(),
                owner: "testuser".to_string(),
                url: "https://github.com/testuser/test-repo".to_string(),
                default_branch: "main".to_string(),
            },
            metadata: EventMetadata {
                r#ref: Some("refs/heads/main".to_string()),
                ..EventMetadata::default()
            },
            changes: vec![
                Change {
                    kind: ChangeType::Commit,
                    id: "abc".to_string(),
                    message: Some("first".to_string()),
                    timestamp: None,
                    author: None,
                    files_added: vec!["a.txt".to_string(), "b.txt".to_string()],
                    files_modified: vec![],
                    files_removed: vec![],
                },
                Change {
                    kind: ChangeType::Commit,
                    id: "def".to_string(),
                    message: Some("second".to_string()),
                    timestamp: None,
                    author: None,
                    files_added: vec![],
                    files_modified: vec!["a.txt".to_string()],
                    files_removed: vec![],
                },
            ],
            raw_payload: json!({"ref": "refs/heads/main"}),
        }
    }

    #[test]
    fn event_types_render_as_dotted_codes() {
        assert_eq!(
            serde_json::to_string(&EventType::CodePush).unwrap(),
            "\"code.push\""
        );
        assert_eq!(
            serde_json::to_string(&EventType::PrReviewRequested).unwrap(),
            "\"pr.review_requested\""
        );
        assert_eq!(
            serde_json::to_string(&ChangeType::FileModify).unwrap(),
            "\"file.modify\""
        );
        assert_eq!(EventType::IssueComment.code(), "issue.comment");
    }

    #[test]
    fn unset_metadata_fields_serialize_as_null() {
        let value = sample_event().to_json();
        let metadata = &value["metadata"];
        assert_eq!(metadata["ref"], json!("refs/heads/main"));
        // Absent fields are present as null, never dropped or zero-valued.
        assert!(metadata.get("pr_number").unwrap().is_null());
        assert!(metadata.get("issue_title").unwrap().is_null());
        assert_eq!(metadata["labels"], json!([]));
    }

    #[test]
    fn serialization_preserves_change_order_and_file_lists() {
        let value = sample_event().to_json();
        let changes = value["changes"].as_array().unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0]["id"], json!("abc"));
        assert_eq!(changes[1]["id"], json!("def"));
        assert_eq!(changes[0]["type"], json!("commit"));
        assert_eq!(changes[0]["files_added"], json!(["a.txt", "b.txt"]));
    }

    #[test]
    fn root_fields_match_the_wire_contract() {
        let value = sample_event().to_json();
        for field in [
            "id",
            "type",
            "source",
            "timestamp",
            "actor",
            "repository",
            "metadata",
            "changes",
            "raw_payload",
        ] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(value["id"], json!("delivery-1"));
        assert_eq!(value["type"], json!("code.push"));
        assert_eq!(value["raw_payload"]["ref"], json!("refs/heads/main"));
    }

    #[test]
    fn canonical_event_round_trips_through_json() {
        let event = sample_event();
        let text = serde_json::to_string(&event).unwrap();
        let back: CanonicalEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(back, event);
    }
}
