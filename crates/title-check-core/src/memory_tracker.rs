//! In-process [`IssueTracker`] backed by a single issue snapshot.
//!
//! Test double only: compiled for this crate's tests and for dependents that
//! enable the `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::reconcile::RemoteIssueState;
use crate::tracker::{CreatedComment, IssueRef, IssueTracker, TrackerComment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    ListComments,
    ListLabels,
    AddLabels(Vec<String>),
    RemoveLabel(String),
    CreateComment(String),
    DeleteComment(u64),
}

impl TrackerCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::ListComments | Self::ListLabels)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    issue: RemoteIssueState,
    calls: Vec<TrackerCall>,
    next_comment_id: u64,
    fail_operation: Option<&'static str>,
}

#[derive(Debug)]
/// Single-issue tracker holding labels and comments in memory and recording
/// every call it receives.
pub struct InMemoryIssueTracker {
    bot_user_id: u64,
    state: Mutex<MemoryState>,
}

impl InMemoryIssueTracker {
    pub fn new(bot_user_id: u64, issue: RemoteIssueState) -> Self {
        let next_comment_id = issue
            .comments
            .iter()
            .map(|comment| comment.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        Self {
            bot_user_id,
            state: Mutex::new(MemoryState {
                issue,
                next_comment_id,
                ..MemoryState::default()
            }),
        }
    }

    /// Makes the named operation (`"create comment"`, ...) fail from now on.
    pub fn fail_on(&self, operation: &'static str) {
        self.lock().fail_operation = Some(operation);
    }

    pub fn snapshot(&self) -> RemoteIssueState {
        self.lock().issue.clone()
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.lock().calls.clone()
    }

    pub fn mutation_calls(&self) -> Vec<TrackerCall> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panicking test thread must not hide the recorded calls.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(
        &self,
        operation: &'static str,
        call: TrackerCall,
    ) -> Result<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.fail_operation == Some(operation) {
            bail!("in-memory tracker {operation} failed");
        }
        Ok(state)
    }
}

#[async_trait]
impl IssueTracker for InMemoryIssueTracker {
    async fn list_comments(&self, _issue: &IssueRef) -> Result<Vec<TrackerComment>> {
        let state = self.record("list comments", TrackerCall::ListComments)?;
        Ok(state.issue.comments.clone())
    }

    async fn list_labels(&self, _issue: &IssueRef) -> Result<Vec<String>> {
        let state = self.record("list labels", TrackerCall::ListLabels)?;
        Ok(state.issue.labels.clone())
    }

    async fn add_labels(&self, _issue: &IssueRef, labels: &[String]) -> Result<()> {
        let mut state = self.record("add labels", TrackerCall::AddLabels(labels.to_vec()))?;
        for label in labels {
            if !state
                .issue
                .labels
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(label))
            {
                state.issue.labels.push(label.clone());
            }
        }
        Ok(())
    }

    async fn remove_label(&self, _issue: &IssueRef, label: &str) -> Result<()> {
        let mut state =
            self.record("remove label", TrackerCall::RemoveLabel(label.to_string()))?;
        state
            .issue
            .labels
            .retain(|existing| !existing.eq_ignore_ascii_case(label));
        Ok(())
    }

    async fn create_comment(&self, _issue: &IssueRef, body: &str) -> Result<CreatedComment> {
        let mut state =
            self.record("create comment", TrackerCall::CreateComment(body.to_string()))?;
        let id = state.next_comment_id;
        state.next_comment_id = id.saturating_add(1);
        let author_id = Some(self.bot_user_id);
        state.issue.comments.push(TrackerComment {
            id,
            author_id,
            author_login: Some("github-actions[bot]".to_string()),
            body: body.to_string(),
        });
        Ok(CreatedComment { id })
    }

    async fn delete_comment(&self, _issue: &IssueRef, comment_id: u64) -> Result<()> {
        let mut state = self.record("delete comment", TrackerCall::DeleteComment(comment_id))?;
        state.issue.comments.retain(|comment| comment.id != comment_id);
        Ok(())
    }
}
