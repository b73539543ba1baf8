//! GitHub REST transport for the issue title check.
//! Implements `title_check_core::IssueTracker` on top of reqwest.

mod github_api_client;
mod github_transport_helpers;

pub use github_api_client::{
    GithubApiClient, GithubCommentCreateResponse, GithubIssueComment, GithubIssueLabel,
    GithubUser, DEFAULT_GITHUB_API_BASE,
};
pub use github_transport_helpers::truncate_for_error;
