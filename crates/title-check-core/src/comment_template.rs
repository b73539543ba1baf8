pub const ACTOR_PLACEHOLDER: &str = "{actor}";
pub const DEFAULT_COMMENT_TEMPLATE: &str = "Hi @{actor}! The title is insufficient!";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Template for the bot comment posted on non-compliant issues.
///
/// `{actor}` is replaced by the issue author's handle. A blank template falls
/// back to [`DEFAULT_COMMENT_TEMPLATE`], which greets the author itself.
pub struct CommentTemplate {
    template: String,
}

impl Default for CommentTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_COMMENT_TEMPLATE.to_string(),
        }
    }
}

impl CommentTemplate {
    pub fn new(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(template) if !template.is_empty() => Self {
                template: template.to_string(),
            },
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Renders the part of the comment that stays stable across runs.
    pub fn render_head(&self, actor: &str) -> String {
        self.template.replace(ACTOR_PLACEHOLDER, actor.trim())
    }

    pub fn render(&self, actor: &str, reasons: &[String]) -> RenderedComment {
        let head = self.render_head(actor);
        let mut body = head.clone();
        let reasons = reasons
            .iter()
            .map(|reason| reason.trim())
            .filter(|reason| !reason.is_empty())
            .collect::<Vec<_>>();
        if !reasons.is_empty() {
            body.push_str("\n\n");
            body.push_str(&render_reason_block(&reasons));
        }
        RenderedComment { head, body }
    }
}

fn render_reason_block(reasons: &[&str]) -> String {
    reasons
        .iter()
        .map(|reason| format!("- {reason}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedComment {
    /// Rendered template without the failure-reason block.
    pub head: String,
    pub body: String,
}

impl RenderedComment {
    /// Identity check against an existing comment body: equal to the head or
    /// starting with it, so changed failure reasons still match.
    pub fn matches_body(&self, body: &str) -> bool {
        let head = self.head.trim_end();
        if head.is_empty() {
            return false;
        }
        let body = body.replace("\r\n", "\n");
        body.trim_end() == head || body.starts_with(head)
    }
}

#[cfg(test)]
mod tests {
    use super::{CommentTemplate, DEFAULT_COMMENT_TEMPLATE};

    #[test]
    fn unit_blank_template_falls_back_to_default_greeting() {
        assert_eq!(CommentTemplate::new(None).as_str(), DEFAULT_COMMENT_TEMPLATE);
        assert_eq!(
            CommentTemplate::new(Some("   ")).render_head("alice"),
            "Hi @alice! The title is insufficient!"
        );
    }

    #[test]
    fn unit_custom_template_without_placeholder_is_used_verbatim() {
        let template = CommentTemplate::new(Some("Please follow the title guide."));
        assert_eq!(template.render_head("alice"), "Please follow the title guide.");
    }

    #[test]
    fn functional_render_appends_reason_block_after_head() {
        let template = CommentTemplate::new(Some("Hey @{actor}, fix the title."));
        let rendered = template.render(
            "bob",
            &["title shorter than minimum length 10".to_string(), " ".to_string()],
        );
        assert_eq!(rendered.head, "Hey @bob, fix the title.");
        assert_eq!(
            rendered.body,
            "Hey @bob, fix the title.\n\n- title shorter than minimum length 10"
        );
    }

    #[test]
    fn functional_matches_body_ignores_changed_reason_suffix() {
        let template = CommentTemplate::default();
        let earlier = template.render("bob", &["reason one".to_string()]);
        let current = template.render("bob", &["reason two".to_string()]);
        assert!(current.matches_body(&earlier.body));
        assert!(current.matches_body(&current.head));
        assert!(!current.matches_body("Hi @carol! The title is insufficient!"));
    }

    #[test]
    fn regression_matches_body_tolerates_crlf_and_trailing_whitespace() {
        let rendered = CommentTemplate::new(Some("line one\nline two")).render("bob", &[]);
        assert!(rendered.matches_body("line one\r\nline two\r\n"));
    }

    #[test]
    fn regression_empty_head_never_matches() {
        let rendered = CommentTemplate::new(Some("{actor}")).render("", &[]);
        assert!(!rendered.matches_body("anything"));
    }
}
