//! Cross-field equality

use async_trait::async_trait;
use serde_json::json;

use super::{Validation, ValidationContext};
use crate::error::ValidationFault;
use crate::status::{StatusCode, ValidationResult};

/// The value must equal the current value of another field.
///
/// The target is looked up by name when the rule runs. A target that does
/// not exist is reported as `MATCH_UNSATISFIED`, not as a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchField {
    target: String,
}

impl MatchField {
    /// Creates the rule for the field named `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Name of the field compared against.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl Validation for MatchField {
    async fn validate(&self, ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault> {
        let matches = ctx
            .value_of(&self.target)
            .is_some_and(|other| &other == ctx.value());
        let result = ValidationResult::check(matches, StatusCode::MatchUnsatisfied);
        Ok(if matches {
            result
        } else {
            result.with_extra(json!({ "target": self.target }))
        })
    }

    fn name(&self) -> &'static str {
        "match_field"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn equal_values_match() {
        let ctx = ValidationContext::with_siblings("abc123", [("password", "abc123")]);
        let result = MatchField::new("password").validate(&ctx).await.unwrap();
        assert!(result.is_correct());
    }

    #[tokio::test]
    async fn different_values_do_not_match() {
        let ctx = ValidationContext::with_siblings("abc124", [("password", "abc123")]);
        let result = MatchField::new("password").validate(&ctx).await.unwrap();
        assert_eq!(result.code(), StatusCode::MatchUnsatisfied);
        assert_eq!(result.extra(), Some(&json!({ "target": "password" })));
    }

    #[tokio::test]
    async fn nan_confirms_nan() {
        let ctx = ValidationContext::with_siblings(f64::NAN, [("amount", f64::NAN)]);
        let result = MatchField::new("amount").validate(&ctx).await.unwrap();
        assert!(result.is_correct());
    }

    #[tokio::test]
    async fn missing_target_is_unsatisfied() {
        let ctx = ValidationContext::for_value("abc");
        let result = MatchField::new("ghost").validate(&ctx).await.unwrap();
        assert_eq!(result.code(), StatusCode::MatchUnsatisfied);
    }
}
