//! Pattern rules

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::{Validation, ValidationContext};
use crate::error::ValidationFault;
use crate::status::{StatusCode, ValidationResult};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}$")
        .unwrap()
});

/// Full-string match against a regular expression.
///
/// The pattern is anchored on both ends, so `"[0-9]+"` rejects `"12a"`.
/// An `Empty` value fails without attempting the match.
#[derive(Debug, Clone)]
pub struct MatchRegex {
    pattern: Regex,
}

impl MatchRegex {
    /// Compiles `pattern` as a full-string match.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&format!("^(?:{pattern})$"))?,
        })
    }

    /// The anchored pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

#[async_trait]
impl Validation for MatchRegex {
    async fn validate(&self, ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault> {
        let Some(text) = ctx.value().as_text() else {
            return Ok(ValidationResult::new(StatusCode::MatchRegexUnsatisfied));
        };
        Ok(ValidationResult::check(
            self.pattern.is_match(&text),
            StatusCode::MatchRegexUnsatisfied,
        ))
    }

    fn name(&self) -> &'static str {
        "match_regex"
    }
}

/// Basic `local@domain.tld` shape check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicEmailFormat;

impl BasicEmailFormat {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Validation for BasicEmailFormat {
    async fn validate(&self, ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault> {
        let ok = ctx
            .value()
            .as_text()
            .is_some_and(|text| EMAIL_REGEX.is_match(&text));
        Ok(ValidationResult::check(ok, StatusCode::BasicEmailFormatUnsatisfied))
    }

    fn name(&self) -> &'static str {
        "basic_email_format"
    }
}
