use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use title_check_core::{CreatedComment, IssueRef, IssueTracker, TrackerComment};
use tracing::{debug, warn};

use crate::github_transport_helpers::{is_already_gone_status, truncate_for_error};

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const PAGE_SIZE: usize = 100;
const ERROR_BODY_MAX_CHARS: usize = 800;

#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    pub id: u64,
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubIssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
    /// Null for comments whose author account was deleted.
    #[serde(default)]
    pub user: Option<GithubUser>,
}

impl From<GithubIssueComment> for TrackerComment {
    fn from(comment: GithubIssueComment) -> Self {
        let (author_id, author_login) = match comment.user {
            Some(user) => (Some(user.id), Some(user.login)),
            None => (None, None),
        };
        Self {
            id: comment.id,
            author_id,
            author_login,
            body: comment.body.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubIssueLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubCommentCreateResponse {
    pub id: u64,
    pub html_url: Option<String>,
}

#[derive(Clone)]
/// Authenticated client for the issue endpoints of the GitHub REST API.
///
/// Every call is issued once; retries are left to the invoking platform.
pub struct GithubApiClient {
    http: reqwest::Client,
    api_base: reqwest::Url,
}

impl GithubApiClient {
    pub fn new(api_base: &str, token: &str, request_timeout_ms: u64) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("issue-title-check"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let auth_header = format!("Bearer {}", token.trim());
        let mut auth_value = reqwest::header::HeaderValue::from_str(&auth_header)
            .context("invalid github authorization header")?;
        auth_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create github api client")?;
        let api_base = reqwest::Url::parse(api_base.trim().trim_end_matches('/'))
            .with_context(|| format!("invalid github api base '{api_base}'"))?;
        Ok(Self { http, api_base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("github api base '{}' cannot carry a path", self.api_base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn issue_endpoint(&self, issue: &IssueRef, tail: &[&str]) -> Result<reqwest::Url> {
        let number = issue.number.to_string();
        let mut segments = vec![
            "repos",
            issue.owner.as_str(),
            issue.repo.as_str(),
            "issues",
            number.as_str(),
        ];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    pub async fn list_issue_comments(&self, issue: &IssueRef) -> Result<Vec<GithubIssueComment>> {
        let url = self.issue_endpoint(issue, &["comments"])?;
        self.list_paginated("list issue comments", url).await
    }

    pub async fn list_issue_labels(&self, issue: &IssueRef) -> Result<Vec<GithubIssueLabel>> {
        let url = self.issue_endpoint(issue, &["labels"])?;
        self.list_paginated("list issue labels", url).await
    }

    pub async fn add_issue_labels(
        &self,
        issue: &IssueRef,
        labels: &[String],
    ) -> Result<Vec<GithubIssueLabel>> {
        let url = self.issue_endpoint(issue, &["labels"])?;
        let payload = json!({ "labels": labels });
        self.request_json("add issue labels", self.http.post(url).json(&payload))
            .await
    }

    /// Returns false when the label was not on the issue.
    pub async fn remove_issue_label(&self, issue: &IssueRef, label: &str) -> Result<bool> {
        let url = self.issue_endpoint(issue, &["labels", label])?;
        self.request_allow_gone("remove issue label", self.http.delete(url))
            .await
    }

    pub async fn create_issue_comment(
        &self,
        issue: &IssueRef,
        body: &str,
    ) -> Result<GithubCommentCreateResponse> {
        let url = self.issue_endpoint(issue, &["comments"])?;
        let payload = json!({ "body": body });
        self.request_json("create issue comment", self.http.post(url).json(&payload))
            .await
    }

    /// Returns false when the comment was already deleted.
    pub async fn delete_issue_comment(&self, issue: &IssueRef, comment_id: u64) -> Result<bool> {
        let comment_id = comment_id.to_string();
        let url = self.endpoint(&[
            "repos",
            issue.owner.as_str(),
            issue.repo.as_str(),
            "issues",
            "comments",
            comment_id.as_str(),
        ])?;
        self.request_allow_gone("delete issue comment", self.http.delete(url))
            .await
    }

    async fn list_paginated<T>(&self, operation: &str, url: reqwest::Url) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut page = 1_u32;
        let mut rows = Vec::new();
        loop {
            let page_value = page.to_string();
            let per_page = PAGE_SIZE.to_string();
            let request = self.http.get(url.clone()).query(&[
                ("per_page", per_page.as_str()),
                ("page", page_value.as_str()),
            ]);
            let chunk: Vec<T> = self.request_json(operation, request).await?;
            let chunk_len = chunk.len();
            rows.extend(chunk);
            if chunk_len < PAGE_SIZE {
                break;
            }
            page = page.saturating_add(1);
        }
        debug!(operation, rows = rows.len(), pages = page, "github list complete");
        Ok(rows)
    }

    async fn request_json<T>(&self, operation: &str, request: reqwest::RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .with_context(|| format!("github api {operation} request failed"))?;
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .with_context(|| format!("failed to decode github {operation}"));
        }
        let body = response.text().await.unwrap_or_default();
        bail!(
            "github api {operation} failed with status {}: {}",
            status.as_u16(),
            truncate_for_error(&body, ERROR_BODY_MAX_CHARS)
        );
    }

    async fn request_allow_gone(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<bool> {
        let response = request
            .send()
            .await
            .with_context(|| format!("github api {operation} request failed"))?;
        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if is_already_gone_status(status.as_u16()) {
            warn!(
                operation,
                status = status.as_u16(),
                "github target already gone; nothing to remove"
            );
            return Ok(false);
        }
        let body = response.text().await.unwrap_or_default();
        bail!(
            "github api {operation} failed with status {}: {}",
            status.as_u16(),
            truncate_for_error(&body, ERROR_BODY_MAX_CHARS)
        );
    }
}

#[async_trait]
impl IssueTracker for GithubApiClient {
    async fn list_comments(&self, issue: &IssueRef) -> Result<Vec<TrackerComment>> {
        let comments = self.list_issue_comments(issue).await?;
        Ok(comments.into_iter().map(TrackerComment::from).collect())
    }

    async fn list_labels(&self, issue: &IssueRef) -> Result<Vec<String>> {
        let labels = self.list_issue_labels(issue).await?;
        Ok(labels.into_iter().map(|label| label.name).collect())
    }

    async fn add_labels(&self, issue: &IssueRef, labels: &[String]) -> Result<()> {
        self.add_issue_labels(issue, labels).await?;
        Ok(())
    }

    async fn remove_label(&self, issue: &IssueRef, label: &str) -> Result<()> {
        self.remove_issue_label(issue, label).await?;
        Ok(())
    }

    async fn create_comment(&self, issue: &IssueRef, body: &str) -> Result<CreatedComment> {
        let created = self.create_issue_comment(issue, body).await?;
        if let Some(url) = created.html_url.as_deref() {
            debug!(comment_id = created.id, url, "github comment created");
        }
        Ok(CreatedComment { id: created.id })
    }

    async fn delete_comment(&self, issue: &IssueRef, comment_id: u64) -> Result<()> {
        self.delete_issue_comment(issue, comment_id).await?;
        Ok(())
    }
}
