mod action_outputs;
mod bootstrap_helpers;
mod cli_args;
mod event_context;
mod startup_config;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use title_check_core::{
    ensure_issue_event, run_issue_title_check, IssueTitleCheckReport, IssueTitleCheckRequest,
    TitleCheckError,
};
use title_check_github::GithubApiClient;
use tracing::info;

use crate::action_outputs::{emit_error, emit_notice, write_action_output};
use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::Cli;
use crate::event_context::load_issue_event_context;
use crate::startup_config::TitleCheckConfig;

async fn run_cli(cli: Cli) -> Result<IssueTitleCheckReport> {
    let event_name = cli.event_name.as_deref().unwrap_or_default().trim();
    emit_notice(&format!("Event name: {event_name}"));
    ensure_issue_event(cli.event_name.as_deref())?;

    let config = TitleCheckConfig::from_cli(&cli)?;
    let event_path = cli.event_path.as_deref().ok_or_else(|| {
        TitleCheckError::MalformedPayload("GITHUB_EVENT_PATH is not set".to_string())
    })?;
    let context =
        load_issue_event_context(event_path, cli.repository.as_deref(), cli.actor.as_deref())?;

    let client = GithubApiClient::new(&config.api_base, &config.token, config.request_timeout_ms)?;
    let report = run_issue_title_check(
        &client,
        IssueTitleCheckRequest {
            issue: &context.issue,
            title: context.title.as_deref(),
            actor: &context.actor,
            rule: &config.rule,
            template: &config.template,
            labels_to_apply: &config.labels,
            bot: config.bot,
            dry_run: config.dry_run,
        },
    )
    .await?;

    let valid = if report.verdict.passed { "true" } else { "false" };
    write_action_output(cli.github_output.as_deref(), "valid", valid)?;
    write_action_output(
        cli.github_output.as_deref(),
        "state",
        report.plan.state.as_str(),
    )?;
    info!(
        issue = %context.issue,
        valid,
        applied = report.applied,
        "title check complete"
    );
    Ok(report)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run_cli(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            emit_error(&format!("{error:#}"));
            ExitCode::FAILURE
        }
    }
}
