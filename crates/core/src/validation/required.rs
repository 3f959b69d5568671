//! Presence rules

use async_trait::async_trait;

use super::{Validation, ValidationContext};
use crate::error::ValidationFault;
use crate::status::{StatusCode, ValidationResult};

/// The value must be present: not `Empty` and not blank text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Required;

impl Required {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Validation for Required {
    async fn validate(&self, ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault> {
        Ok(ValidationResult::check(
            !ctx.value().is_empty(),
            StatusCode::RequiredUnsatisfied,
        ))
    }

    fn name(&self) -> &'static str {
        "required"
    }
}

/// The value must be boolean `true` (terms acceptance, opt-in boxes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequiredTrue;

impl RequiredTrue {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Validation for RequiredTrue {
    async fn validate(&self, ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault> {
        Ok(ValidationResult::check(
            ctx.value().as_bool() == Some(true),
            StatusCode::RequiredTrueUnsatisfied,
        ))
    }

    fn name(&self) -> &'static str {
        "required_true"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;
    use rstest::rstest;

    #[rstest]
    #[case(FieldValue::Empty, StatusCode::RequiredUnsatisfied)]
    #[case(FieldValue::from(" \t"), StatusCode::RequiredUnsatisfied)]
    #[case(FieldValue::from("x"), StatusCode::Correct)]
    #[case(FieldValue::from(0_i64), StatusCode::Correct)]
    #[case(FieldValue::from(false), StatusCode::Correct)]
    #[tokio::test]
    async fn required(#[case] value: FieldValue, #[case] expected: StatusCode) {
        let result = Required.validate(&ValidationContext::for_value(value)).await.unwrap();
        assert_eq!(result.code(), expected);
    }

    #[rstest]
    #[case(FieldValue::from(true), StatusCode::Correct)]
    #[case(FieldValue::from(false), StatusCode::RequiredTrueUnsatisfied)]
    #[case(FieldValue::from("true"), StatusCode::RequiredTrueUnsatisfied)]
    #[case(FieldValue::Empty, StatusCode::RequiredTrueUnsatisfied)]
    #[tokio::test]
    async fn required_true(#[case] value: FieldValue, #[case] expected: StatusCode) {
        let result = RequiredTrue.validate(&ValidationContext::for_value(value)).await.unwrap();
        assert_eq!(result.code(), expected);
    }
}
