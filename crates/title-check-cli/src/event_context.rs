use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use title_check_core::{IssueRef, TitleCheckError};

#[derive(Debug, Default, Deserialize)]
struct EventUser {
    #[serde(default)]
    login: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EventIssue {
    #[serde(default)]
    number: Option<u64>,
    /// Kept untyped so a non-string title is reported as missing, not fatal.
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    user: Option<EventUser>,
}

#[derive(Debug, Default, Deserialize)]
struct EventRepository {
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IssueEventPayload {
    #[serde(default)]
    issue: Option<EventIssue>,
    #[serde(default)]
    repository: Option<EventRepository>,
    #[serde(default)]
    sender: Option<EventUser>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The parts of an `issues` event payload the title check needs.
pub(crate) struct IssueEventContext {
    pub issue: IssueRef,
    pub title: Option<String>,
    /// Issue author, falling back to the event sender and then `GITHUB_ACTOR`.
    pub actor: String,
}

pub(crate) fn load_issue_event_context(
    event_path: &Path,
    fallback_repository: Option<&str>,
    fallback_actor: Option<&str>,
) -> Result<IssueEventContext, TitleCheckError> {
    let raw = std::fs::read_to_string(event_path).map_err(|error| {
        TitleCheckError::MalformedPayload(format!(
            "failed to read event payload {}: {error}",
            event_path.display()
        ))
    })?;
    parse_issue_event_context(&raw, fallback_repository, fallback_actor)
}

pub(crate) fn parse_issue_event_context(
    raw: &str,
    fallback_repository: Option<&str>,
    fallback_actor: Option<&str>,
) -> Result<IssueEventContext, TitleCheckError> {
    let payload = serde_json::from_str::<IssueEventPayload>(raw).map_err(|error| {
        TitleCheckError::MalformedPayload(format!("event payload is not valid JSON: {error}"))
    })?;
    let issue = payload.issue.unwrap_or_default();
    let number = issue.number.ok_or_else(|| {
        TitleCheckError::MalformedPayload("event payload has no issue number".to_string())
    })?;

    let slug = payload
        .repository
        .and_then(|repository| repository.full_name)
        .filter(|value| !value.trim().is_empty())
        .or_else(|| fallback_repository.map(ToOwned::to_owned))
        .ok_or_else(|| {
            TitleCheckError::MalformedPayload(
                "repository is missing from the payload and GITHUB_REPOSITORY".to_string(),
            )
        })?;
    let issue_ref = IssueRef::from_slug(&slug, number)?;

    let actor = [
        issue.user.and_then(|user| user.login),
        payload.sender.and_then(|user| user.login),
        fallback_actor.map(ToOwned::to_owned),
    ]
    .into_iter()
    .flatten()
    .map(|login| login.trim().to_string())
    .find(|login| !login.is_empty())
    .ok_or_else(|| {
        TitleCheckError::MalformedPayload("no issue author or actor available".to_string())
    })?;

    let title = issue
        .title
        .and_then(|value| value.as_str().map(ToOwned::to_owned));

    Ok(IssueEventContext {
        issue: issue_ref,
        title,
        actor,
    })
}
