//! Caller-supplied rules

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;

use super::{Validation, ValidationContext};
use crate::error::ValidationFault;
use crate::status::{StatusCode, ValidationResult};
use crate::value::FieldValue;

type Predicate =
    Box<dyn Fn(ValidationContext) -> BoxFuture<'static, Result<bool, ValidationFault>> + Send + Sync>;

/// A rule backed by a caller-supplied predicate.
///
/// The predicate answers "is the value acceptable?". A `false` answer
/// yields the rule's code (`CUSTOM_UNSATISFIED` unless changed with
/// [`Custom::with_code`]); an error or a panic yields `CATASTROPHIC_ERROR`.
///
/// # Examples
///
/// ```rust,ignore
/// // Synchronous
/// let even = Custom::new(|v| v.as_number().is_some_and(|n| n % 2.0 == 0.0))
///     .with_code(StatusCode::Custom("EVEN_UNSATISFIED"));
///
/// // Asynchronous, e.g. a remote availability check
/// let available = Custom::from_async(|ctx| async move {
///     let name = ctx.value().to_string();
///     directory.is_free(&name).await.map_err(|e| ValidationFault::new(e.to_string()))
/// })
/// .with_code(StatusCode::Custom("USERNAME_TAKEN"));
/// ```
pub struct Custom {
    predicate: Predicate,
    code: StatusCode,
}

impl Custom {
    /// Default code reported when the predicate answers `false`.
    pub const UNSATISFIED: StatusCode = StatusCode::Custom("CUSTOM_UNSATISFIED");

    /// A synchronous predicate over the field's value.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        Self::fallible(move |value| Ok::<_, ValidationFault>(predicate(value)))
    }

    /// A synchronous predicate that may fail.
    pub fn fallible<F, E>(predicate: F) -> Self
    where
        F: Fn(&FieldValue) -> Result<bool, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self::from_async(move |ctx| {
            let verdict = predicate(ctx.value()).map_err(|e| ValidationFault::new(e.to_string()));
            async move { verdict }
        })
    }

    /// An asynchronous predicate; it receives an owned context so it can
    /// outlive the borrow across await points.
    pub fn from_async<F, Fut>(predicate: F) -> Self
    where
        F: Fn(ValidationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, ValidationFault>> + Send + 'static,
    {
        Self {
            predicate: Box::new(move |ctx| predicate(ctx).boxed()),
            code: Self::UNSATISFIED,
        }
    }

    /// Sets the code reported when the predicate answers `false`.
    ///
    /// The code must be an unsatisfied one (see
    /// [`StatusCode::is_unsatisfied`]); with any other code a `false`
    /// answer is reported as `CATASTROPHIC_ERROR`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_code(mut self, code: StatusCode) -> Self {
        self.code = code;
        self
    }
}

impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom")
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Validation for Custom {
    async fn validate(&self, ctx: &ValidationContext) -> Result<ValidationResult, ValidationFault> {
        let ok = (self.predicate)(ctx.clone()).await?;
        if !ok && !self.code.is_unsatisfied() {
            return Err(ValidationFault::new(format!(
                "{} cannot report a failed check",
                self.code
            )));
        }
        Ok(ValidationResult::check(ok, self.code))
    }

    fn name(&self) -> &'static str {
        "custom"
    }
}
