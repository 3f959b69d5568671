//! Length rules

use async_trait::async_trait;
use serde_json::json;

use super::{Validation, ValidationContext};
use crate::error::ValidationFault;
use crate::status::{StatusCode, ValidationResult};

/// The text rendering of the value must have at least `min` characters.
///
/// Length is counted in Unicode scalar values. An `Empty` value fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinLength {
    min: usize,
}

impl MinLength {
    /// Creates the rule.
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self { min }
    }

    /// The configured minimum.
    #[must_use]
    pub fn min(&self) -> usize {
        self.min
    }
}

#[async_trait]
impl Validation for MinLength {
    async fn validate(&self, ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault> {
        let actual = ctx.value().as_text().map_or(0, |text| text.chars().count());
        let result = ValidationResult::check(actual >= self.min, StatusCode::MinLengthUnsatisfied);
        Ok(if result.is_correct() {
            result
        } else {
            result.with_extra(json!({ "min": self.min, "actual": actual }))
        })
    }

    fn name(&self) -> &'static str {
        "min_length"
    }
}
