use fancy_regex::Regex;

use crate::error::TitleCheckError;

/// Pattern that accepts every title. Configuring it effectively disables the
/// pattern check while still counting as "a pattern is configured".
pub const DEFAULT_PATTERN: &str = "^.*$";
pub const DEFAULT_PATTERN_FLAGS: &str = "gmi";

const MISSING_TITLE_REASON: &str = "issue title is missing from the event payload";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Regular expression source plus JavaScript-style flags (`gmi`, ...).
pub struct TitlePattern {
    pub source: String,
    pub flags: String,
}

impl TitlePattern {
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
        }
    }

    /// Compiles the pattern with its flags turned into a leading inline group.
    ///
    /// Lookaround and backreferences are supported. Classes such as `\w`, `\d`
    /// and `\b` are always Unicode-aware, with or without the `u` flag.
    pub fn compile(&self) -> Result<Regex, TitleCheckError> {
        let mut inline = String::new();
        for flag in self.flags.chars() {
            match flag {
                'i' | 'm' | 's' | 'x' => {
                    if !inline.contains(flag) {
                        inline.push(flag);
                    }
                }
                // Unicode is always on; global and indices do not change a single match test.
                'u' | 'g' | 'd' => {}
                other if other.is_whitespace() => {}
                other => {
                    return Err(TitleCheckError::configuration(format!(
                        "unsupported pattern flag '{other}' in '{}'",
                        self.flags
                    )));
                }
            }
        }
        let source = if inline.is_empty() {
            self.source.clone()
        } else {
            format!("(?{inline}){}", self.source)
        };
        Regex::new(&source).map_err(|error| {
            TitleCheckError::configuration(format!(
                "invalid title pattern `{}`: {error}",
                self.source
            ))
        })
    }

    fn is_match(&self, title: &str) -> Result<bool, TitleCheckError> {
        self.compile()?.is_match(title).map_err(|error| {
            TitleCheckError::configuration(format!(
                "title pattern `{}` could not be evaluated: {error}",
                self.source
            ))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Title validation rule.
///
/// When `pattern` is set only the pattern is evaluated; length bounds apply
/// when no pattern is configured. At least one criterion must be present.
pub struct ValidationRule {
    pub pattern: Option<TitlePattern>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub prefixes_to_strip: Vec<String>,
    pub length_exempt_actors: Vec<String>,
}

impl ValidationRule {
    pub fn has_criteria(&self) -> bool {
        self.pattern.is_some() || self.min_length.is_some() || self.max_length.is_some()
    }

    pub fn has_length_bounds(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }

    /// Checks the rule without evaluating any title.
    pub fn ensure_valid(&self) -> Result<(), TitleCheckError> {
        if !self.has_criteria() {
            return Err(TitleCheckError::configuration(
                "no validation rule configured: set a pattern or a length bound",
            ));
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(TitleCheckError::configuration(format!(
                    "minimum length {min} is greater than maximum length {max}"
                )));
            }
        }
        if let Some(pattern) = &self.pattern {
            pattern.compile()?;
        }
        Ok(())
    }

    /// GitHub logins are case-insensitive, so the exemption list is too.
    pub fn is_length_exempt(&self, actor: &str) -> bool {
        let actor = actor.trim();
        !actor.is_empty()
            && self
                .length_exempt_actors
                .iter()
                .any(|exempt| exempt.trim().eq_ignore_ascii_case(actor))
    }

    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(pattern) = &self.pattern {
            parts.push(format!("pattern=/{}/{}", pattern.source, pattern.flags));
        }
        if let Some(min) = self.min_length {
            parts.push(format!("minLength={min}"));
        }
        if let Some(max) = self.max_length {
            parts.push(format!("maxLength={max}"));
        }
        if !self.prefixes_to_strip.is_empty() {
            parts.push(format!("prefixes={}", self.prefixes_to_strip.len()));
        }
        if !self.length_exempt_actors.is_empty() {
            parts.push(format!("exempt_actors={}", self.length_exempt_actors.len()));
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub passed: bool,
    pub reasons: Vec<String>,
}

impl ValidationVerdict {
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            passed: reasons.is_empty(),
            reasons,
        }
    }
}

/// Removes the first configured prefix the trimmed title starts with.
///
/// Titles that match no prefix are returned untouched.
pub fn strip_title_prefix<'a>(title: &'a str, prefixes: &[String]) -> &'a str {
    let trimmed = title.trim();
    prefixes
        .iter()
        .map(|prefix| prefix.trim())
        .filter(|prefix| !prefix.is_empty())
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .map(str::trim)
        .unwrap_or(title)
}

/// Evaluates `title` for `actor`, resolving the length exemption once.
pub fn evaluate(
    title: Option<&str>,
    rule: &ValidationRule,
    actor: &str,
) -> Result<ValidationVerdict, TitleCheckError> {
    let length_exempt = rule.is_length_exempt(actor);
    evaluate_with_exemption(title, rule, length_exempt)
}

pub fn evaluate_with_exemption(
    title: Option<&str>,
    rule: &ValidationRule,
    length_exempt: bool,
) -> Result<ValidationVerdict, TitleCheckError> {
    rule.ensure_valid()?;
    let Some(raw_title) = title else {
        return Ok(ValidationVerdict::from_reasons(vec![
            MISSING_TITLE_REASON.to_string()
        ]));
    };
    let title = strip_title_prefix(raw_title, &rule.prefixes_to_strip);

    let mut reasons = Vec::new();
    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(title)? {
            reasons.push(format!(
                "title does not match the required pattern `{}`",
                pattern.source
            ));
        }
    } else if !length_exempt {
        let length = title.chars().count();
        if let Some(min) = rule.min_length {
            if length < min {
                reasons.push(format!(
                    "title shorter than minimum length {min} (minLength={min}, actual {length})"
                ));
            }
        }
        if let Some(max) = rule.max_length {
            if length > max {
                reasons.push(format!(
                    "title longer than maximum length {max} (maxLength={max}, actual {length})"
                ));
            }
        }
    }
    Ok(ValidationVerdict::from_reasons(reasons))
}
