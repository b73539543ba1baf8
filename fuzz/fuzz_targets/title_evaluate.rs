#![no_main]

use libfuzzer_sys::fuzz_target;
use title_check_core::{
    evaluate, reconcile, strip_title_prefix, BotIdentity, CommentTemplate, ReconcileContext,
    RemoteIssueState, TitlePattern, ValidationRule,
};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let mut parts = raw.splitn(3, '\u{0}');
    let title = parts.next().unwrap_or_default();
    let pattern = parts.next();
    let prefix = parts.next().unwrap_or_default();

    let rule = ValidationRule {
        pattern: pattern.map(|source| TitlePattern::new(source, "i")),
        min_length: Some(3),
        max_length: Some(64),
        prefixes_to_strip: vec![prefix.to_string()],
        length_exempt_actors: Vec::new(),
    };
    let stripped = strip_title_prefix(title, &rule.prefixes_to_strip);
    assert!(stripped.len() <= title.len());

    let Ok(verdict) = evaluate(Some(title), &rule, "fuzzer") else {
        return;
    };
    assert_eq!(verdict.passed, verdict.reasons.is_empty());

    let template = CommentTemplate::default();
    let labels = vec!["invalid-title".to_string()];
    let context = ReconcileContext {
        template: &template,
        actor: "fuzzer",
        labels_to_apply: &labels,
        bot: BotIdentity::default(),
    };
    let plan = reconcile(&verdict, &RemoteIssueState::default(), &context);
    assert_eq!(plan.mutations.comment_to_create.is_some(), !verdict.passed);
});
