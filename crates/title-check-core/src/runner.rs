use tracing::{info, warn};

use crate::comment_template::CommentTemplate;
use crate::error::TitleCheckError;
use crate::reconcile::{
    reconcile, BotIdentity, MutationSet, ReconcileContext, ReconcilePlan, RemoteIssueState,
};
use crate::tracker::{IssueRef, IssueTracker};
use crate::validation::{evaluate, ValidationRule, ValidationVerdict};

/// Event name the CI platform reports for issue activity.
pub const GITHUB_ISSUES_EVENT: &str = "issues";

/// Rejects every event other than issue events.
pub fn ensure_issue_event(event_name: Option<&str>) -> Result<(), TitleCheckError> {
    match event_name.map(str::trim) {
        Some(GITHUB_ISSUES_EVENT) => Ok(()),
        Some(other) if !other.is_empty() => {
            Err(TitleCheckError::UnsupportedEvent(other.to_string()))
        }
        _ => Err(TitleCheckError::UnsupportedEvent("<unset>".to_string())),
    }
}

#[derive(Debug, Clone)]
pub struct IssueTitleCheckRequest<'a> {
    pub issue: &'a IssueRef,
    /// `None` when the event payload carried no title.
    pub title: Option<&'a str>,
    pub actor: &'a str,
    pub rule: &'a ValidationRule,
    pub template: &'a CommentTemplate,
    pub labels_to_apply: &'a [String],
    pub bot: BotIdentity,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTitleCheckReport {
    pub verdict: ValidationVerdict,
    pub plan: ReconcilePlan,
    /// False for dry runs and for empty mutation sets.
    pub applied: bool,
}

/// Validates the issue title and reconciles labels and the bot comment.
///
/// The rule is checked before any tracker call, so configuration errors
/// never reach the tracker. Partially applied mutation sets are not rolled
/// back; a later run converges from whatever state was left behind.
pub async fn run_issue_title_check<T>(
    tracker: &T,
    request: IssueTitleCheckRequest<'_>,
) -> Result<IssueTitleCheckReport, TitleCheckError>
where
    T: IssueTracker + ?Sized,
{
    let issue = request.issue;
    info!(
        issue = %issue,
        title = request.title.unwrap_or("<missing>"),
        actor = request.actor,
        rule = %request.rule.describe(),
        "checking issue title"
    );

    let verdict = evaluate(request.title, request.rule, request.actor)?;
    if request.title.is_none() {
        warn!(issue = %issue, "event payload has no issue title; treating it as invalid");
    }
    info!(
        issue = %issue,
        passed = verdict.passed,
        reasons = verdict.reasons.len(),
        "title evaluated"
    );

    let comments = tracker
        .list_comments(issue)
        .await
        .map_err(|error| TitleCheckError::remote("list comments", error))?;
    let labels = tracker
        .list_labels(issue)
        .await
        .map_err(|error| TitleCheckError::remote("list labels", error))?;
    let remote = RemoteIssueState { labels, comments };

    let context = ReconcileContext {
        template: request.template,
        actor: request.actor,
        labels_to_apply: request.labels_to_apply,
        bot: request.bot,
    };
    let plan = reconcile(&verdict, &remote, &context);
    for comment_id in &plan.foreign_comment_ids {
        warn!(
            issue = %issue,
            comment_id,
            "comment matches the bot template but has another author; leaving it untouched"
        );
    }
    info!(
        issue = %issue,
        state = plan.state.as_str(),
        mutations = %plan.mutations.summary(),
        "reconciliation planned"
    );

    let applied = if plan.mutations.is_empty() {
        false
    } else if request.dry_run {
        info!(issue = %issue, "dry run; skipping tracker mutations");
        false
    } else {
        apply_mutations(tracker, issue, &plan.mutations).await?;
        true
    };

    Ok(IssueTitleCheckReport {
        verdict,
        plan,
        applied,
    })
}

/// Applies labels first, then the comment create, then the comment delete.
pub async fn apply_mutations<T>(
    tracker: &T,
    issue: &IssueRef,
    mutations: &MutationSet,
) -> Result<(), TitleCheckError>
where
    T: IssueTracker + ?Sized,
{
    if !mutations.labels_to_add.is_empty() {
        tracker
            .add_labels(issue, &mutations.labels_to_add)
            .await
            .map_err(|error| TitleCheckError::remote("add labels", error))?;
        info!(issue = %issue, labels = %mutations.labels_to_add.join(","), "added labels");
    }
    for label in &mutations.labels_to_remove {
        tracker
            .remove_label(issue, label)
            .await
            .map_err(|error| TitleCheckError::remote("remove label", error))?;
        info!(issue = %issue, label = %label, "removed label");
    }
    if let Some(body) = &mutations.comment_to_create {
        let created = tracker
            .create_comment(issue, body)
            .await
            .map_err(|error| TitleCheckError::remote("create comment", error))?;
        info!(issue = %issue, comment_id = created.id, "created comment");
    }
    if let Some(comment_id) = mutations.comment_to_delete {
        tracker
            .delete_comment(issue, comment_id)
            .await
            .map_err(|error| TitleCheckError::remote("delete comment", error))?;
        info!(issue = %issue, comment_id, "removed comment");
    }
    Ok(())
}
