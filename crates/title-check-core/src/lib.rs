//! Issue title validation and label/comment reconciliation.
//!
//! `validation` decides whether a title passes a rule, `reconcile` turns that
//! verdict plus a snapshot of the issue into the smallest set of tracker
//! mutations, and `runner` drives both against an [`IssueTracker`].

pub mod comment_template;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod memory_tracker;
pub mod reconcile;
pub mod runner;
pub mod tracker;
pub mod validation;

pub use comment_template::{CommentTemplate, RenderedComment, DEFAULT_COMMENT_TEMPLATE};
pub use error::TitleCheckError;
#[cfg(any(test, feature = "test-support"))]
pub use memory_tracker::{InMemoryIssueTracker, TrackerCall};
pub use reconcile::{
    reconcile, BotIdentity, ComplianceState, MutationSet, ReconcileContext, ReconcilePlan,
    RemoteIssueState, GITHUB_ACTIONS_BOT_USER_ID,
};
pub use runner::{
    apply_mutations, ensure_issue_event, run_issue_title_check, IssueTitleCheckReport,
    IssueTitleCheckRequest, GITHUB_ISSUES_EVENT,
};
pub use tracker::{CreatedComment, IssueRef, IssueTracker, TrackerComment};
pub use validation::{
    evaluate, evaluate_with_exemption, strip_title_prefix, TitlePattern, ValidationRule,
    ValidationVerdict, DEFAULT_PATTERN, DEFAULT_PATTERN_FLAGS,
};
