//! Validation rules
//!
//! A [`Validation`] inspects the value of the field it is attached to (and,
//! for cross-field rules, the values of siblings) through a
//! [`ValidationContext`] and returns a [`ValidationResult`]. Rules never know
//! which field they belong to: the same rule value can be attached to any
//! number of fields.
//!
//! ## Built-in rules
//!
//! - [`Required`], [`RequiredTrue`]
//! - [`MinLength`]
//! - [`MatchRegex`], [`BasicEmailFormat`]
//! - [`MatchField`]
//! - [`Custom`] for caller-supplied logic, sync or async

mod custom;
mod length;
mod matching;
mod pattern;
mod required;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::json;

use crate::error::ValidationFault;
use crate::status::{StatusCode, ValidationResult};
use crate::value::{FieldValue, ValueStore};

pub use custom::Custom;
pub use length::MinLength;
pub use matching::MatchField;
pub use pattern::{BasicEmailFormat, MatchRegex};
pub use required::{Required, RequiredTrue};

// ============================================================================
// CORE TRAIT
// ============================================================================

/// A single validation rule.
///
/// Implementations may suspend (e.g. to call a remote service). They must
/// not mutate engine state and do not need to handle cancellation: a field
/// discards the result of any run it has superseded.
///
/// # Examples
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use flowforms_core::prelude::*;
///
/// struct NoSpaces;
///
/// #[async_trait]
/// impl Validation for NoSpaces {
///     async fn validate(&self, ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault> {
///         let ok = ctx.value().as_text().is_some_and(|t| !t.contains(' '));
///         Ok(ValidationResult::check(ok, StatusCode::Custom("NO_SPACES_UNSATISFIED")))
///     }
/// }
/// ```
#[async_trait]
pub trait Validation: Send + Sync {
    /// Evaluates the rule.
    ///
    /// Returning `Err` (or panicking) yields a `CATASTROPHIC_ERROR` result
    /// for this rule; it never propagates past the field.
    async fn validate(&self, ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault>;

    /// Whether a failure of this rule ends the run.
    ///
    /// When `false`, later rules are still evaluated and their results
    /// recorded, but the field's code stays the first failing one.
    fn fail_fast(&self) -> bool {
        true
    }

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Value accessor handed to a rule at evaluation time.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    field: Arc<str>,
    value: FieldValue,
    values: Arc<ValueStore>,
}

impl ValidationContext {
    pub(crate) fn new(field: Arc<str>, value: FieldValue, values: Arc<ValueStore>) -> Self {
        Self {
            field,
            value,
            values,
        }
    }

    /// A context for a lone value with no siblings, for exercising rules
    /// outside a form.
    pub fn for_value(value: impl Into<FieldValue>) -> Self {
        Self::with_siblings(value, std::iter::empty::<(&str, FieldValue)>())
    }

    /// A context for a lone value with the given sibling values.
    pub fn with_siblings<I, K, V>(value: impl Into<FieldValue>, siblings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let store = ValueStore::new(
            siblings
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
        Self::new(Arc::from(""), value.into(), Arc::new(store))
    }

    /// Name of the field under validation (empty for detached contexts).
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The value this run was started for.
    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Current value of another field of the same form.
    #[must_use]
    pub fn value_of(&self, field: &str) -> Option<FieldValue> {
        self.values.get(field)
    }
}

// ============================================================================
// EXTENSION TRAIT
// ============================================================================

/// Combinators available on every rule.
pub trait ValidationExt: Validation + Sized {
    /// Keep evaluating later rules when this one fails.
    fn continue_on_failure(self) -> ContinueOnFailure<Self> {
        ContinueOnFailure { inner: self }
    }
}

impl<V: Validation> ValidationExt for V {}

/// Rule wrapper returned by [`ValidationExt::continue_on_failure`].
#[derive(Debug, Clone)]
pub struct ContinueOnFailure<V> {
    inner: V,
}

#[async_trait]
impl<V: Validation> Validation for ContinueOnFailure<V> {
    async fn validate(&self, ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault> {
        self.inner.validate(ctx).await
    }

    fn fail_fast(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

// ============================================================================
// GUARDED EVALUATION
// ============================================================================

/// Runs a rule, converting faults, panics and reserved codes into
/// `CATASTROPHIC_ERROR`.
pub(crate) async fn evaluate(rule: &dyn Validation, ctx: &ValidationContext) -> ValidationResult {
    let (fault, reserved) = match AssertUnwindSafe(rule.validate(ctx)).catch_unwind().await {
        Ok(Ok(result)) if !result.code().is_reserved() => return result,
        Ok(Ok(result)) => (
            ValidationFault::new(format!("rule reported reserved code {}", result.code())),
            Some(result.code()),
        ),
        Ok(Err(fault)) => (fault, None),
        Err(payload) => (ValidationFault::from_panic(payload.as_ref()), None),
    };
    tracing::warn!(
        field = ctx.field(),
        rule = rule.name(),
        error = %fault,
        "validation rule faulted"
    );
    let mut extra = json!({ "error": fault.to_string() });
    if let Some(code) = reserved {
        extra["reserved"] = json!(code.as_str());
    }
    ValidationResult::new(StatusCode::CatastrophicError).with_extra(extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Faulty;

    #[async_trait]
    impl Validation for Faulty {
        async fn validate(&self, _ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault> {
            Err(ValidationFault::new("service unavailable"))
        }
    }

    struct Panicky;

    #[async_trait]
    impl Validation for Panicky {
        async fn validate(&self, _ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault> {
            panic!("rule exploded")
        }
    }

    #[tokio::test]
    async fn fault_becomes_catastrophic() {
        let result = evaluate(&Faulty, &ValidationContext::for_value("x")).await;
        assert_eq!(result.code(), StatusCode::CatastrophicError);
        assert_eq!(result.extra(), Some(&json!({ "error": "service unavailable" })));
    }

    #[tokio::test]
    async fn panic_becomes_catastrophic() {
        let result = evaluate(&Panicky, &ValidationContext::for_value("x")).await;
        assert_eq!(result.code(), StatusCode::CatastrophicError);
    }

    struct Impostor(StatusCode);

    #[async_trait]
    impl Validation for Impostor {
        async fn validate(&self, _ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault> {
            Ok(ValidationResult::new(self.0))
        }
    }

    #[tokio::test]
    async fn reserved_code_becomes_catastrophic() {
        for code in [StatusCode::Unmodified, StatusCode::InProgress, StatusCode::Custom("CORRECT")] {
            let result = evaluate(&Impostor(code), &ValidationContext::for_value("x")).await;
            assert_eq!(result.code(), StatusCode::CatastrophicError);
            assert_eq!(result.extra().unwrap()["reserved"], json!(code.as_str()));
        }

        let result = evaluate(&Impostor(StatusCode::Correct), &ValidationContext::for_value("x")).await;
        assert!(result.is_correct());
    }

    #[tokio::test]
    async fn continue_on_failure_only_flips_fail_fast() {
        let rule = Required::new().continue_on_failure();
        assert!(!rule.fail_fast());
        assert!(Required::new().fail_fast());
        let result = rule.validate(&ValidationContext::for_value("")).await.unwrap();
        assert_eq!(result.code(), StatusCode::RequiredUnsatisfied);
    }

    #[test]
    fn context_reads_siblings() {
        let ctx = ValidationContext::with_siblings("a", [("other", "b")]);
        assert_eq!(ctx.value(), &FieldValue::from("a"));
        assert_eq!(ctx.value_of("other"), Some(FieldValue::from("b")));
        assert_eq!(ctx.value_of("missing"), None);
        assert_eq!(ctx.field(), "");
    }
}
