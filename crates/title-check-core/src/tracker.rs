use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::TitleCheckError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl IssueRef {
    /// Builds a reference from an `owner/repo` slug.
    pub fn from_slug(slug: &str, number: u64) -> Result<Self, TitleCheckError> {
        let trimmed = slug.trim();
        let (owner, repo) = trimmed.split_once('/').ok_or_else(|| {
            TitleCheckError::MalformedPayload(format!(
                "invalid repository '{trimmed}', expected owner/repo"
            ))
        })?;
        let owner = owner.trim();
        let repo = repo.trim();
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(TitleCheckError::MalformedPayload(format!(
                "invalid repository '{trimmed}', expected owner/repo"
            )));
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        })
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerComment {
    pub id: u64,
    /// Numeric platform identity of the author; `None` for deleted accounts.
    pub author_id: Option<u64>,
    pub author_login: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedComment {
    pub id: u64,
}

/// Remote issue tracker operations needed to reconcile one issue.
///
/// Implementations own transport concerns (auth, timeouts, pagination).
/// Removing a label or deleting a comment that is already gone must succeed.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn list_comments(&self, issue: &IssueRef) -> Result<Vec<TrackerComment>>;
    async fn list_labels(&self, issue: &IssueRef) -> Result<Vec<String>>;
    async fn add_labels(&self, issue: &IssueRef, labels: &[String]) -> Result<()>;
    async fn remove_label(&self, issue: &IssueRef, label: &str) -> Result<()>;
    async fn create_comment(&self, issue: &IssueRef, body: &str) -> Result<CreatedComment>;
    async fn delete_comment(&self, issue: &IssueRef, comment_id: u64) -> Result<()>;
}
