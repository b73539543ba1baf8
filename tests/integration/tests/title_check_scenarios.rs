use title_check_core::{
    run_issue_title_check, BotIdentity, CommentTemplate, ComplianceState, InMemoryIssueTracker,
    IssueRef, IssueTitleCheckReport, IssueTitleCheckRequest, RemoteIssueState, TitleCheckError,
    TitlePattern, TrackerCall, TrackerComment, ValidationRule, DEFAULT_PATTERN,
    DEFAULT_PATTERN_FLAGS, GITHUB_ACTIONS_BOT_USER_ID,
};

struct Scenario {
    issue: IssueRef,
    rule: ValidationRule,
    template: CommentTemplate,
    labels: Vec<String>,
}

impl Scenario {
    fn new(rule: ValidationRule) -> Self {
        Self {
            issue: IssueRef {
                owner: "octo".to_string(),
                repo: "widgets".to_string(),
                number: 5,
            },
            rule,
            template: CommentTemplate::default(),
            labels: vec!["invalid-title".to_string(), "needs-triage".to_string()],
        }
    }

    async fn run(
        &self,
        tracker: &InMemoryIssueTracker,
        title: &str,
        actor: &str,
    ) -> Result<IssueTitleCheckReport, TitleCheckError> {
        run_issue_title_check(
            tracker,
            IssueTitleCheckRequest {
                issue: &self.issue,
                title: Some(title),
                actor,
                rule: &self.rule,
                template: &self.template,
                labels_to_apply: &self.labels,
                bot: BotIdentity::default(),
                dry_run: false,
            },
        )
        .await
    }
}

fn length_rule(exempt: &[&str]) -> ValidationRule {
    ValidationRule {
        min_length: Some(10),
        max_length: Some(50),
        length_exempt_actors: exempt.iter().map(|actor| actor.to_string()).collect(),
        ..ValidationRule::default()
    }
}

fn default_pattern_rule() -> ValidationRule {
    ValidationRule {
        pattern: Some(TitlePattern::new(DEFAULT_PATTERN, DEFAULT_PATTERN_FLAGS)),
        ..ValidationRule::default()
    }
}

fn tracker(issue: RemoteIssueState) -> InMemoryIssueTracker {
    InMemoryIssueTracker::new(GITHUB_ACTIONS_BOT_USER_ID, issue)
}

#[tokio::test]
async fn scenario_a_default_pattern_accepts_title_without_mutations() {
    let scenario = Scenario::new(default_pattern_rule());
    let tracker = tracker(RemoteIssueState::default());

    let report = scenario.run(&tracker, "fix bug", "alice").await.expect("run");

    assert!(report.verdict.passed);
    assert!(report.verdict.reasons.is_empty());
    assert!(report.plan.mutations.is_empty());
    assert!(tracker.mutation_calls().is_empty());
}

#[tokio::test]
async fn scenario_b_short_title_is_labelled_and_commented_once() {
    let scenario = Scenario::new(length_rule(&[]));
    let tracker = tracker(RemoteIssueState::default());

    let report = scenario.run(&tracker, "bug", "alice").await.expect("run");
    assert!(!report.verdict.passed);
    assert!(report.verdict.reasons[0].contains("minLength=10"));

    let state = tracker.snapshot();
    assert_eq!(state.labels, scenario.labels);
    assert_eq!(state.comments.len(), 1);
    assert!(state.comments[0].body.contains("minLength=10"));

    tracker.clear_calls();
    let again = scenario.run(&tracker, "bug", "alice").await.expect("rerun");
    assert!(again.plan.mutations.is_empty());
    assert!(tracker.mutation_calls().is_empty());
}

#[tokio::test]
async fn scenario_c_exempt_actor_passes_regardless_of_length() {
    let scenario = Scenario::new(length_rule(&["alice"]));
    let tracker = tracker(RemoteIssueState::default());

    let report = scenario.run(&tracker, "b", "alice").await.expect("run");

    assert!(report.verdict.passed);
    assert!(tracker.mutation_calls().is_empty());
}

#[tokio::test]
async fn scenario_d_fixed_title_clears_previous_state_then_settles() {
    let scenario = Scenario::new(ValidationRule {
        pattern: Some(TitlePattern::new(r"^(feat|fix|docs): .+", "i")),
        ..ValidationRule::default()
    });
    let human = TrackerComment {
        id: 1,
        author_id: Some(4242),
        author_login: Some("carol".to_string()),
        body: "Please fix the title".to_string(),
    };
    let tracker = tracker(RemoteIssueState {
        labels: vec!["bug".to_string()],
        comments: vec![human.clone()],
    });

    let first = scenario.run(&tracker, "broken", "alice").await.expect("run");
    assert_eq!(first.plan.state, ComplianceState::NonCompliant);
    assert_eq!(tracker.snapshot().comments.len(), 2);

    tracker.clear_calls();
    let fixed = scenario
        .run(&tracker, "fix: crash on start", "alice")
        .await
        .expect("fixed run");
    assert_eq!(fixed.plan.state, ComplianceState::Compliant);
    let calls = tracker.mutation_calls();
    assert!(calls.contains(&TrackerCall::RemoveLabel("invalid-title".to_string())));
    assert!(calls.contains(&TrackerCall::RemoveLabel("needs-triage".to_string())));
    assert!(calls
        .iter()
        .any(|call| matches!(call, TrackerCall::DeleteComment(_))));
    let state = tracker.snapshot();
    assert_eq!(state.labels, vec!["bug".to_string()]);
    assert_eq!(state.comments, vec![human]);

    tracker.clear_calls();
    let settled = scenario
        .run(&tracker, "fix: crash on start", "alice")
        .await
        .expect("settled run");
    assert!(settled.plan.mutations.is_empty());
    assert!(tracker.mutation_calls().is_empty());
}

#[tokio::test]
async fn scenario_e_missing_rule_is_configuration_error_without_calls() {
    let scenario = Scenario::new(ValidationRule::default());
    let tracker = tracker(RemoteIssueState::default());

    let error = scenario
        .run(&tracker, "anything", "alice")
        .await
        .expect_err("configuration error");

    assert!(error.is_configuration());
    assert!(tracker.calls().is_empty());
}
