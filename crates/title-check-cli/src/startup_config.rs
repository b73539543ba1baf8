use title_check_core::{
    BotIdentity, CommentTemplate, TitleCheckError, TitlePattern, ValidationRule,
    DEFAULT_PATTERN_FLAGS, GITHUB_ACTIONS_BOT_USER_ID,
};
use tracing::{info, warn};

use crate::cli_args::Cli;

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
/// Inputs resolved once at startup.
pub(crate) struct TitleCheckConfig {
    pub token: String,
    pub api_base: String,
    pub request_timeout_ms: u64,
    pub rule: ValidationRule,
    pub template: CommentTemplate,
    pub labels: Vec<String>,
    pub bot: BotIdentity,
    pub dry_run: bool,
}

impl TitleCheckConfig {
    pub(crate) fn from_cli(cli: &Cli) -> Result<Self, TitleCheckError> {
        let rule = build_validation_rule(cli)?;
        rule.ensure_valid()?;
        if rule.pattern.is_some() && rule.has_length_bounds() {
            warn!("both a pattern and length bounds are configured; length bounds are ignored");
        }

        let bot_user_id =
            parse_optional_number::<u64>("bot user id", cli.bot_user_id.as_deref())?
                .unwrap_or(GITHUB_ACTIONS_BOT_USER_ID);
        let request_timeout_ms =
            parse_optional_number::<u64>("request timeout", cli.request_timeout_ms.as_deref())?
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);
        let token = resolve_token(cli.token.as_deref(), cli.github_token.as_deref())?;

        let config = Self {
            token,
            api_base: cli.api_base.trim().to_string(),
            request_timeout_ms,
            rule,
            template: CommentTemplate::new(cli.issues_comment.as_deref()),
            labels: split_comma_list(cli.issues_labels.as_deref()),
            bot: BotIdentity {
                user_id: bot_user_id,
            },
            dry_run: parse_bool_input("dry run", cli.dry_run.as_deref())?,
        };
        info!(
            rule = %config.rule.describe(),
            labels = %config.labels.join(","),
            bot_user_id = config.bot.user_id,
            dry_run = config.dry_run,
            "configuration loaded"
        );
        Ok(config)
    }
}

fn build_validation_rule(cli: &Cli) -> Result<ValidationRule, TitleCheckError> {
    let pattern = non_blank(cli.issues_pattern.as_deref()).map(|source| {
        let flags =
            non_blank(cli.issues_pattern_flags.as_deref()).unwrap_or(DEFAULT_PATTERN_FLAGS);
        TitlePattern::new(source, flags)
    });
    Ok(ValidationRule {
        pattern,
        min_length: parse_optional_number("minimum length", cli.issues_min_length.as_deref())?,
        max_length: parse_optional_number("maximum length", cli.issues_max_length.as_deref())?,
        prefixes_to_strip: split_line_list(cli.issues_prefixes.as_deref()),
        length_exempt_actors: split_line_list(cli.issues_no_limit_actors.as_deref()),
    })
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.trim().is_empty())
}

fn resolve_token(token: Option<&str>, fallback: Option<&str>) -> Result<String, TitleCheckError> {
    non_blank(token)
        .or_else(|| non_blank(fallback))
        .map(|value| value.trim().to_string())
        .ok_or_else(|| {
            TitleCheckError::configuration(
                "missing GitHub token: set the token input or GITHUB_TOKEN",
            )
        })
}

fn parse_optional_number<T>(name: &str, raw: Option<&str>) -> Result<Option<T>, TitleCheckError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = non_blank(raw) else {
        return Ok(None);
    };
    value.trim().parse::<T>().map(Some).map_err(|error| {
        TitleCheckError::configuration(format!("invalid {name} '{}': {error}", value.trim()))
    })
}

fn parse_bool_input(name: &str, raw: Option<&str>) -> Result<bool, TitleCheckError> {
    let Some(value) = non_blank(raw) else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(TitleCheckError::configuration(format!(
            "invalid {name} '{other}': expected true or false"
        ))),
    }
}

fn split_comma_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn split_line_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .lines()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use title_check_core::{DEFAULT_PATTERN_FLAGS, GITHUB_ACTIONS_BOT_USER_ID};

    use super::{
        parse_bool_input, parse_optional_number, resolve_token, split_comma_list,
        split_line_list, TitleCheckConfig,
    };
    use crate::cli_args::Cli;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["title-check", "--token", "test-token"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("parse cli")
    }

    #[test]
    fn unit_split_lists_trim_and_drop_blank_entries() {
        assert_eq!(
            split_comma_list(Some(" invalid-title ,, needs-triage,")),
            vec!["invalid-title".to_string(), "needs-triage".to_string()]
        );
        assert!(split_comma_list(Some("")).is_empty());
        assert_eq!(
            split_line_list(Some("[Bug]: \n\n  [Feature Request]: \r\n")),
            vec!["[Bug]:".to_string(), "[Feature Request]:".to_string()]
        );
    }

    #[test]
    fn unit_parse_optional_number_treats_blank_as_unset() {
        let blank = parse_optional_number::<usize>("minimum length", Some("  ")).expect("blank");
        assert_eq!(blank, None);
        let parsed = parse_optional_number::<usize>("minimum length", Some(" 12 ")).expect("num");
        assert_eq!(parsed, Some(12));
        let error = parse_optional_number::<usize>("minimum length", Some("ten"))
            .expect_err("not a number");
        assert!(error.is_configuration());
        assert!(error.to_string().contains("minimum length"));
    }

    #[test]
    fn unit_parse_bool_input_accepts_common_spellings() {
        assert!(parse_bool_input("dry run", Some("TRUE")).expect("true"));
        assert!(!parse_bool_input("dry run", Some("")).expect("blank"));
        assert!(!parse_bool_input("dry run", None).expect("unset"));
        assert!(parse_bool_input("dry run", Some("maybe")).is_err());
    }

    #[test]
    fn unit_resolve_token_prefers_input_over_fallback() {
        assert_eq!(resolve_token(Some(" a "), Some("b")).expect("token"), "a");
        assert_eq!(resolve_token(Some(""), Some("b")).expect("token"), "b");
        assert!(resolve_token(None, Some("  ")).expect_err("missing").is_configuration());
    }

    #[test]
    fn functional_pattern_defaults_flags_and_bot_identity() {
        let config = TitleCheckConfig::from_cli(&parse(&[
            "--issues-pattern",
            "^feat",
            "--issues-pattern-flags",
            "",
            "--bot-user-id",
            "",
        ]))
        .expect("config");
        let pattern = config.rule.pattern.expect("pattern");
        assert_eq!(pattern.flags, DEFAULT_PATTERN_FLAGS);
        assert_eq!(config.bot.user_id, GITHUB_ACTIONS_BOT_USER_ID);
    }

    #[test]
    fn functional_length_only_configuration_is_accepted() {
        let config = TitleCheckConfig::from_cli(&parse(&[
            "--issues-min-length",
            "10",
            "--issues-max-length",
            "50",
            "--issues-no-limit-actors",
            "dependabot[bot]\nrenovate[bot]",
            "--dry-run",
            "true",
        ]))
        .expect("config");
        assert!(config.rule.pattern.is_none());
        assert_eq!(config.rule.min_length, Some(10));
        assert_eq!(config.rule.max_length, Some(50));
        assert!(config.rule.is_length_exempt("renovate[bot]"));
        assert!(config.dry_run);
    }

    #[test]
    fn regression_blank_pattern_and_lengths_are_a_configuration_error() {
        let error = TitleCheckConfig::from_cli(&parse(&[
            "--issues-pattern",
            " ",
            "--issues-min-length",
            "",
            "--issues-max-length",
            "",
        ]))
        .expect_err("nothing configured");
        assert!(error.is_configuration());
    }

    #[test]
    fn regression_invalid_pattern_is_rejected_at_startup() {
        let error = TitleCheckConfig::from_cli(&parse(&["--issues-pattern", "(["]))
            .expect_err("bad regex");
        assert!(error.to_string().contains("invalid title pattern"));
    }
}
