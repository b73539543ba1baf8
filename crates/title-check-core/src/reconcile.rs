use std::collections::HashSet;

use crate::comment_template::{CommentTemplate, RenderedComment};
use crate::tracker::TrackerComment;
use crate::validation::ValidationVerdict;

/// User id of `github-actions[bot]`, the identity comments are posted under
/// when the workflow uses the default `GITHUB_TOKEN`.
pub const GITHUB_ACTIONS_BOT_USER_ID: u64 = 41_898_282;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotIdentity {
    pub user_id: u64,
}

impl Default for BotIdentity {
    fn default() -> Self {
        Self {
            user_id: GITHUB_ACTIONS_BOT_USER_ID,
        }
    }
}

impl BotIdentity {
    pub fn owns(&self, comment: &TrackerComment) -> bool {
        comment.author_id == Some(self.user_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Snapshot of the issue as fetched at the start of an invocation.
pub struct RemoteIssueState {
    pub labels: Vec<String>,
    /// Oldest first.
    pub comments: Vec<TrackerComment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceState {
    Compliant,
    NonCompliant,
}

impl ComplianceState {
    pub fn from_verdict(verdict: &ValidationVerdict) -> Self {
        if verdict.passed {
            Self::Compliant
        } else {
            Self::NonCompliant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NonCompliant => "non_compliant",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Tracker mutations for one invocation: at most one comment created and
/// one comment deleted.
pub struct MutationSet {
    pub labels_to_add: Vec<String>,
    pub labels_to_remove: Vec<String>,
    pub comment_to_create: Option<String>,
    pub comment_to_delete: Option<u64>,
}

impl MutationSet {
    pub fn is_empty(&self) -> bool {
        self.labels_to_add.is_empty()
            && self.labels_to_remove.is_empty()
            && self.comment_to_create.is_none()
            && self.comment_to_delete.is_none()
    }

    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "none".to_string();
        }
        let mut parts = Vec::new();
        if !self.labels_to_add.is_empty() {
            parts.push(format!("add_labels=[{}]", self.labels_to_add.join(",")));
        }
        if !self.labels_to_remove.is_empty() {
            parts.push(format!("remove_labels=[{}]", self.labels_to_remove.join(",")));
        }
        if self.comment_to_create.is_some() {
            parts.push("create_comment".to_string());
        }
        if let Some(comment_id) = self.comment_to_delete {
            parts.push(format!("delete_comment={comment_id}"));
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReconcileContext<'a> {
    pub template: &'a CommentTemplate,
    pub actor: &'a str,
    pub labels_to_apply: &'a [String],
    pub bot: BotIdentity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub state: ComplianceState,
    pub comment: RenderedComment,
    pub mutations: MutationSet,
    /// Bot comments matching the template, oldest first.
    pub bot_comment_ids: Vec<u64>,
    /// Comments by other authors whose body matches the template. Reported
    /// only; they are never mutated.
    pub foreign_comment_ids: Vec<u64>,
}

fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn configured_labels(labels_to_apply: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    labels_to_apply
        .iter()
        .map(|label| label.trim())
        .filter(|label| !label.is_empty())
        .filter(|label| seen.insert(normalize_label(label)))
        .map(ToOwned::to_owned)
        .collect()
}

/// Computes the mutations that bring `remote` in line with `verdict`.
///
/// Running it again against the state produced by applying its result
/// yields an empty [`MutationSet`].
pub fn reconcile(
    verdict: &ValidationVerdict,
    remote: &RemoteIssueState,
    context: &ReconcileContext<'_>,
) -> ReconcilePlan {
    let state = ComplianceState::from_verdict(verdict);
    let comment = context.template.render(context.actor, &verdict.reasons);

    let mut bot_comment_ids = Vec::new();
    let mut foreign_comment_ids = Vec::new();
    for existing in &remote.comments {
        if !comment.matches_body(&existing.body) {
            continue;
        }
        if context.bot.owns(existing) {
            bot_comment_ids.push(existing.id);
        } else {
            foreign_comment_ids.push(existing.id);
        }
    }

    let present = remote
        .labels
        .iter()
        .map(|label| (normalize_label(label), label.trim().to_string()))
        .collect::<Vec<_>>();
    let find_present = |label: &str| {
        let wanted = normalize_label(label);
        present
            .iter()
            .find(|(normalized, _)| *normalized == wanted)
            .map(|(_, original)| original.clone())
    };

    let mut mutations = MutationSet::default();
    match state {
        ComplianceState::NonCompliant => {
            mutations.labels_to_add = configured_labels(context.labels_to_apply)
                .into_iter()
                .filter(|label| find_present(label.as_str()).is_none())
                .collect();
            match bot_comment_ids.as_slice() {
                [] => mutations.comment_to_create = Some(comment.body.clone()),
                [_keep] => {}
                [_keep, .., newest] => mutations.comment_to_delete = Some(*newest),
            }
        }
        ComplianceState::Compliant => {
            mutations.labels_to_remove = configured_labels(context.labels_to_apply)
                .iter()
                .filter_map(|label| find_present(label.as_str()))
                .collect();
            mutations.comment_to_delete = bot_comment_ids.first().copied();
        }
    }

    ReconcilePlan {
        state,
        comment,
        mutations,
        bot_comment_ids,
        foreign_comment_ids,
    }
}
