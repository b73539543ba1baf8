use std::path::PathBuf;

use clap::Parser;
use title_check_github::DEFAULT_GITHUB_API_BASE;

// Action inputs arrive as `INPUT_*` variables that are present but empty when
// unset, so value-bearing inputs are taken raw and normalised in
// `startup_config`.
#[derive(Debug, Parser)]
#[command(
    name = "title-check",
    about = "Validate an issue title and reconcile its labels and bot comment",
    version
)]
pub(crate) struct Cli {
    #[arg(
        long = "token",
        env = "INPUT_TOKEN",
        hide_env_values = true,
        help = "GitHub token used for issue label and comment calls"
    )]
    pub token: Option<String>,

    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        hide = true,
        hide_env_values = true,
        help = "Fallback token when --token is not provided"
    )]
    pub github_token: Option<String>,

    #[arg(
        long = "issues-pattern",
        env = "INPUT_ISSUES_PATTERN",
        help = "Regular expression the issue title must match",
        long_help = "Regular expression the issue title must match. Takes precedence over \
            length bounds. Lookaround and backreferences are supported. Unlike JavaScript, \
            \\w, \\d and \\b are always Unicode-aware; use [A-Za-z0-9_] for an ASCII-only \
            word class."
    )]
    pub issues_pattern: Option<String>,

    #[arg(
        long = "issues-pattern-flags",
        env = "INPUT_ISSUES_PATTERN_FLAGS",
        help = "Pattern flags (i, m, s, x; u, g and d are accepted and ignored). Defaults to gmi"
    )]
    pub issues_pattern_flags: Option<String>,

    #[arg(
        long = "issues-min-length",
        env = "INPUT_ISSUES_MIN_LENGTH",
        help = "Minimum title length in characters when no pattern is configured"
    )]
    pub issues_min_length: Option<String>,

    #[arg(
        long = "issues-max-length",
        env = "INPUT_ISSUES_MAX_LENGTH",
        help = "Maximum title length in characters when no pattern is configured"
    )]
    pub issues_max_length: Option<String>,

    #[arg(
        long = "issues-labels",
        env = "INPUT_ISSUES_LABELS",
        help = "Comma-separated labels applied while the title is invalid"
    )]
    pub issues_labels: Option<String>,

    #[arg(
        long = "issues-comment",
        env = "INPUT_ISSUES_COMMENT",
        help = "Comment template posted while the title is invalid; {actor} expands to the author"
    )]
    pub issues_comment: Option<String>,

    #[arg(
        long = "issues-prefixes",
        env = "INPUT_ISSUES_PREFIXES",
        help = "Newline-separated title prefixes stripped before validation"
    )]
    pub issues_prefixes: Option<String>,

    #[arg(
        long = "issues-no-limit-actors",
        env = "INPUT_ISSUES_NO_LIMIT_ACTORS",
        help = "Newline-separated actors exempt from length limits"
    )]
    pub issues_no_limit_actors: Option<String>,

    #[arg(
        long = "bot-user-id",
        env = "INPUT_BOT_USER_ID",
        help = "Numeric user id the automation comments as (default: github-actions[bot])"
    )]
    pub bot_user_id: Option<String>,

    #[arg(
        long = "dry-run",
        env = "INPUT_DRY_RUN",
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Compute and log the reconciliation plan without mutating the issue"
    )]
    pub dry_run: Option<String>,

    #[arg(
        long = "request-timeout-ms",
        env = "INPUT_REQUEST_TIMEOUT_MS",
        help = "HTTP timeout in milliseconds for GitHub API calls (default 10000)"
    )]
    pub request_timeout_ms: Option<String>,

    #[arg(
        long = "event-name",
        env = "GITHUB_EVENT_NAME",
        help = "Name of the event that triggered the workflow"
    )]
    pub event_name: Option<String>,

    #[arg(
        long = "event-path",
        env = "GITHUB_EVENT_PATH",
        help = "Path to the JSON payload of the triggering event"
    )]
    pub event_path: Option<PathBuf>,

    #[arg(
        long = "repository",
        env = "GITHUB_REPOSITORY",
        help = "Repository in owner/repo format, used when the payload lacks it"
    )]
    pub repository: Option<String>,

    #[arg(
        long = "actor",
        env = "GITHUB_ACTOR",
        help = "Actor handle used when the payload lacks the issue author"
    )]
    pub actor: Option<String>,

    #[arg(
        long = "api-base",
        env = "GITHUB_API_URL",
        default_value = DEFAULT_GITHUB_API_BASE,
        help = "GitHub API base URL"
    )]
    pub api_base: String,

    #[arg(
        long = "github-output",
        env = "GITHUB_OUTPUT",
        help = "File receiving step outputs (valid, state)"
    )]
    pub github_output: Option<PathBuf>,
}
