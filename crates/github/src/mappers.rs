//! GitHub payload-to-canonical-event mappers.
//!
//! One pure function per supported event category. Each mapper is total
//! over the payload shape it claims to handle: a required field that is
//! absent produces a [`MapError`] instead of a silently defaulted event.
//! Fields the GitHub format itself marks optional map to unset metadata
//! fields. Every mapper stamps the event with the processing time and
//! copies the full original payload into `raw_payload` for downstream
//! audit.
//!
//! Where an inbound `action` value selects the canonical type, the mapping
//! is an explicit table with a named permissive default: unrecognised
//! actions become an "updated" event rather than failing, so unknown but
//! related actions do not break the pipeline as GitHub grows its API.

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

use schema::{
    Actor, CanonicalEvent, Change, ChangeType, DeliveryId, EventMetadata, EventType, Repository,
};

/// Signature shared by every registered mapper.
pub type MapperFn = fn(&Value, &DeliveryId) -> Result<CanonicalEvent, MapError>;

/// A payload shape the mapper did not anticipate.
///
/// Wrapped into [`schema::WebhookError::MappingFailure`] (with category and
/// delivery context) at the handler boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// A field the mapper requires was absent from the payload.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A field was present but carried an unexpected JSON type.
    #[error("field '{0}' has an unexpected type")]
    WrongType(&'static str),
}

// ---------------------------------------------------------------------------
// Field access helpers
// ---------------------------------------------------------------------------

fn required<'a>(value: &'a Value, field: &'static str) -> Result<&'a Value, MapError> {
    value.get(field).ok_or(MapError::MissingField(field))
}

fn required_str<'a>(value: &'a Value, field: &'static str) -> Result<&'a str, MapError> {
    required(value, field)?
        .as_str()
        .ok_or(MapError::WrongType(field))
}

fn required_u64(value: &Value, field: &'static str) -> Result<u64, MapError> {
    required(value, field)?
        .as_u64()
        .ok_or(MapError::WrongType(field))
}

fn required_bool(value: &Value, field: &'static str) -> Result<bool, MapError> {
    required(value, field)?
        .as_bool()
        .ok_or(MapError::WrongType(field))
}

/// GitHub ids arrive as JSON numbers; the canonical schema carries them as
/// strings. Accepts either representation.
fn required_id(value: &Value, field: &'static str) -> Result<String, MapError> {
    match required(value, field)? {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        _ => Err(MapError::WrongType(field)),
    }
}

fn optional_str(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(String::from)
}

fn optional_bool(value: &Value, field: &str) -> Option<bool> {
    value.get(field).and_then(Value::as_bool)
}

fn bool_or_false(value: &Value, field: &str) -> bool {
    optional_bool(value, field).unwrap_or(false)
}

fn string_array(value: &Value, field: &str) -> Vec<String> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Projects an array of objects (labels, assignees) to the given string
/// field of each element. Absent array maps to empty.
fn projected_names(value: &Value, field: &str, name_field: &str) -> Vec<String> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get(name_field).and_then(Value::as_str))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Shared extractors
// ---------------------------------------------------------------------------

/// Extracts an [`Actor`] from a GitHub user object (`sender`, `pusher`).
///
/// `id` and `login` are required; display name, email, and avatar are
/// optional in the GitHub format.
pub fn extract_actor(user: &Value) -> Result<Actor, MapError> {
    Ok(Actor {
        id: required_id(user, "id")?,
        username: required_str(user, "login")?.to_string(),
        name: optional_str(user, "name"),
        email: optional_str(user, "email"),
        avatar_url: optional_str(user, "avatar_url"),
    })
}

/// Extracts a [`Repository`] from a GitHub repository object.
///
/// `default_branch` is optional in the GitHub format and falls back to
/// `"main"`.
pub fn extract_repository(repo: &Value) -> Result<Repository, MapError> {
    Ok(Repository {
        id: required_id(repo, "id")?,
        name: required_str(repo, "name")?.to_string(),
        full_name: required_str(repo, "full_name")?.to_string(),
        owner: required_str(required(repo, "owner")?, "login")?.to_string(),
        url: required_str(repo, "html_url")?.to_string(),
        default_branch: optional_str(repo, "default_branch").unwrap_or_else(|| "main".to_string()),
    })
}

fn build_event(
    delivery_id: &DeliveryId,
    event_type: EventType,
    actor: Actor,
    repository: Repository,
    metadata: EventMetadata,
    changes: Vec<Change>,
    payload: &Value,
) -> CanonicalEvent {
    CanonicalEvent {
        id: delivery_id.clone(),
        event_type,
        source: "github".to_string(),
        timestamp: Utc::now(),
        actor,
        repository,
        metadata,
        changes,
        raw_payload: payload.clone(),
    }
}

// ---------------------------------------------------------------------------
// Push
// ---------------------------------------------------------------------------

/// Maps a `push` delivery to a [`EventType::CodePush`] event.
///
/// Each inbound commit becomes one [`Change`] of kind
/// [`ChangeType::Commit`], with the added/modified/removed file lists
/// preserved verbatim and in order. Zero commits is valid (branch create
/// and delete pushes) and yields an event with an empty change list.
pub fn map_push_event(payload: &Value, delivery_id: &DeliveryId) -> Result<CanonicalEvent, MapError> {
    let commits = payload
        .get("commits")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut changes = Vec::with_capacity(commits.len());
    for commit in commits {
        let author = required(commit, "author")?;
        changes.push(Change {
            kind: ChangeType::Commit,
            id: required_str(commit, "id")?.to_string(),
            message: Some(required_str(commit, "message")?.to_string()),
            timestamp: Some(required_str(commit, "timestamp")?.to_string()),
            author: Some(Actor {
                // Commit authors are identified by git metadata, not by a
                // platform account id.
                id: String::new(),
                username: required_str(author, "username")?.to_string(),
                name: optional_str(author, "name"),
                email: optional_str(author, "email"),
                avatar_url: None,
            }),
            files_added: string_array(commit, "added"),
            files_modified: string_array(commit, "modified"),
            files_removed: string_array(commit, "removed"),
        });
    }

    let metadata = EventMetadata {
        r#ref: Some(required_str(payload, "ref")?.to_string()),
        before: Some(required_str(payload, "before")?.to_string()),
        after: Some(required_str(payload, "after")?.to_string()),
        created: Some(bool_or_false(payload, "created")),
        deleted: Some(bool_or_false(payload, "deleted")),
        forced: Some(bool_or_false(payload, "forced")),
        base_ref: optional_str(payload, "base_ref"),
        compare_url: optional_str(payload, "compare"),
        ..EventMetadata::default()
    };

    Ok(build_event(
        delivery_id,
        EventType::CodePush,
        extract_actor(required(payload, "pusher")?)?,
        extract_repository(required(payload, "repository")?)?,
        metadata,
        changes,
        payload,
    ))
}

// ---------------------------------------------------------------------------
// Pull request
// ---------------------------------------------------------------------------

/// Fallback for inbound actions with no table entry: unknown but related
/// actions become "updated" instead of breaking the pipeline.
const UNRECOGNIZED_PR_ACTION: EventType = EventType::PrUpdated;

/// Action-to-type table for `pull_request` deliveries.
///
/// `closed` is ambiguous on its own: GitHub sends the same action whether
/// the pull request was merged or discarded, so it is disambiguated by the
/// pull request's `merged` flag.
fn pull_request_event_type(action: &str, merged: bool) -> EventType {
    match action {
        "opened" => EventType::PrOpened,
        "closed" if merged => EventType::PrMerged,
        "closed" => EventType::PrClosed,
        "reopened" => EventType::PrReopened,
        "synchronize" | "edited" => EventType::PrUpdated,
        "review_requested" => EventType::PrReviewRequested,
        _ => UNRECOGNIZED_PR_ACTION,
    }
}

/// Maps a `pull_request` delivery to the canonical pull-request event
/// selected by [`pull_request_event_type`].
pub fn map_pull_request_event(
    payload: &Value,
    delivery_id: &DeliveryId,
) -> Result<CanonicalEvent, MapError> {
    let pr = required(payload, "pull_request")?;
    let action = required_str(payload, "action")?;
    let merged = bool_or_false(pr, "merged");

    let metadata = EventMetadata {
        pr_number: Some(required_u64(pr, "number")?),
        pr_title: Some(required_str(pr, "title")?.to_string()),
        pr_state: Some(required_str(pr, "state")?.to_string()),
        pr_url: Some(required_str(pr, "html_url")?.to_string()),
        pr_merged: Some(merged),
        pr_draft: Some(bool_or_false(pr, "draft")),
        pr_base_ref: Some(required_str(required(pr, "base")?, "ref")?.to_string()),
        pr_head_ref: Some(required_str(required(pr, "head")?, "ref")?.to_string()),
        pr_author: Some(required_str(required(pr, "user")?, "login")?.to_string()),
        action: Some(action.to_string()),
        labels: projected_names(pr, "labels", "name"),
        ..EventMetadata::default()
    };

    Ok(build_event(
        delivery_id,
        pull_request_event_type(action, merged),
        extract_actor(required(payload, "sender")?)?,
        extract_repository(required(payload, "repository")?)?,
        metadata,
        Vec::new(),
        payload,
    ))
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

const UNRECOGNIZED_ISSUE_ACTION: EventType = EventType::IssueUpdated;

/// Action-to-type table for `issues` deliveries.
fn issue_event_type(action: &str) -> EventType {
    match action {
        "opened" => EventType::IssueOpened,
        "closed" => EventType::IssueClosed,
        "reopened" => EventType::IssueReopened,
        "edited" | "assigned" | "labeled" => EventType::IssueUpdated,
        _ => UNRECOGNIZED_ISSUE_ACTION,
    }
}

/// Maps an `issues` delivery to the canonical issue event.
///
/// Labels and assignees are projected to plain name/login strings; the
/// nested GitHub objects stay behind in `raw_payload`.
pub fn map_issue_event(payload: &Value, delivery_id: &DeliveryId) -> Result<CanonicalEvent, MapError> {
    let issue = required(payload, "issue")?;
    let action = required_str(payload, "action")?;

    let metadata = EventMetadata {
        issue_number: Some(required_u64(issue, "number")?),
        issue_title: Some(required_str(issue, "title")?.to_string()),
        issue_state: Some(required_str(issue, "state")?.to_string()),
        issue_url: Some(required_str(issue, "html_url")?.to_string()),
        issue_author: Some(required_str(required(issue, "user")?, "login")?.to_string()),
        action: Some(action.to_string()),
        labels: projected_names(issue, "labels", "name"),
        assignees: projected_names(issue, "assignees", "login"),
        ..EventMetadata::default()
    };

    Ok(build_event(
        delivery_id,
        issue_event_type(action),
        extract_actor(required(payload, "sender")?)?,
        extract_repository(required(payload, "repository")?)?,
        metadata,
        Vec::new(),
        payload,
    ))
}

// ---------------------------------------------------------------------------
// Issue comments
// ---------------------------------------------------------------------------

/// Maps an `issue_comment` delivery.
///
/// GitHub sends the same category for comments on issues and on pull
/// requests; the parent issue object carries a `pull_request` linkage only
/// in the latter case, which selects [`EventType::PrComment`] over
/// [`EventType::IssueComment`].
pub fn map_issue_comment_event(
    payload: &Value,
    delivery_id: &DeliveryId,
) -> Result<CanonicalEvent, MapError> {
    let comment = required(payload, "comment")?;
    let issue = required(payload, "issue")?;

    let event_type = if issue.get("pull_request").is_some() {
        EventType::PrComment
    } else {
        EventType::IssueComment
    };

    let metadata = EventMetadata {
        comment_id: Some(required_u64(comment, "id")?),
        comment_body: Some(required_str(comment, "body")?.to_string()),
        comment_url: Some(required_str(comment, "html_url")?.to_string()),
        issue_number: Some(required_u64(issue, "number")?),
        issue_title: Some(required_str(issue, "title")?.to_string()),
        action: Some(required_str(payload, "action")?.to_string()),
        ..EventMetadata::default()
    };

    Ok(build_event(
        delivery_id,
        event_type,
        extract_actor(required(payload, "sender")?)?,
        extract_repository(required(payload, "repository")?)?,
        metadata,
        Vec::new(),
        payload,
    ))
}

// ---------------------------------------------------------------------------
// Pull request reviews
// ---------------------------------------------------------------------------

/// Maps a `pull_request_review` delivery to [`EventType::PrReviewed`].
///
/// Carries the review id/state/body plus the parent pull request's number
/// and title for correlation.
pub fn map_pull_request_review_event(
    payload: &Value,
    delivery_id: &DeliveryId,
) -> Result<CanonicalEvent, MapError> {
    let review = required(payload, "review")?;
    let pr = required(payload, "pull_request")?;

    let metadata = EventMetadata {
        review_id: Some(required_u64(review, "id")?),
        review_state: Some(required_str(review, "state")?.to_string()),
        review_body: Some(optional_str(review, "body").unwrap_or_default()),
        review_url: Some(required_str(review, "html_url")?.to_string()),
        pr_number: Some(required_u64(pr, "number")?),
        pr_title: Some(required_str(pr, "title")?.to_string()),
        action: Some(required_str(payload, "action")?.to_string()),
        ..EventMetadata::default()
    };

    Ok(build_event(
        delivery_id,
        EventType::PrReviewed,
        extract_actor(required(payload, "sender")?)?,
        extract_repository(required(payload, "repository")?)?,
        metadata,
        Vec::new(),
        payload,
    ))
}

// ---------------------------------------------------------------------------
// Releases
// ---------------------------------------------------------------------------

/// Maps a `release` delivery.
///
/// TODO: every release action (`published`, `created`, `deleted`,
/// `edited`, ...) currently collapses to [`EventType::ReleasePublished`];
/// the `release.created` / `release.deleted` types exist in the schema but
/// are never emitted. Distinguishing them needs agreement with downstream
/// consumers on which actions they want to see.
pub fn map_release_event(
    payload: &Value,
    delivery_id: &DeliveryId,
) -> Result<CanonicalEvent, MapError> {
    let release = required(payload, "release")?;

    let metadata = EventMetadata {
        release_id: Some(required_u64(release, "id")?),
        release_name: optional_str(release, "name"),
        release_tag: Some(required_str(release, "tag_name")?.to_string()),
        release_url: Some(required_str(release, "html_url")?.to_string()),
        release_draft: Some(required_bool(release, "draft")?),
        release_prerelease: Some(required_bool(release, "prerelease")?),
        action: Some(required_str(payload, "action")?.to_string()),
        ..EventMetadata::default()
    };

    Ok(build_event(
        delivery_id,
        EventType::ReleasePublished,
        extract_actor(required(payload, "sender")?)?,
        extract_repository(required(payload, "repository")?)?,
        metadata,
        Vec::new(),
        payload,
    ))
}
