//! Status codes and the values that carry them.
//!
//! [`StatusCode`] is the closed vocabulary every rule, field and form speaks.
//! [`ValidationResult`] is what one rule produces, [`FieldStatus`] is what a
//! field publishes and [`FormStatus`] is the aggregate over all fields.

use std::fmt;

use serde_json::Value;

// ============================================================================
// STATUS CODE
// ============================================================================

/// Outcome of validating a field (or a whole form).
///
/// Ordering among the unsatisfied codes only matters for display; the
/// engine never compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum StatusCode {
    /// Initial state, no validation has ever run.
    Unmodified,
    /// A validation run is executing.
    InProgress,
    /// Every validation passed.
    Correct,
    /// `Required` failed: the value is absent or blank.
    RequiredUnsatisfied,
    /// `RequiredTrue` failed: the value is not boolean `true`.
    RequiredTrueUnsatisfied,
    /// `MinLength` failed.
    MinLengthUnsatisfied,
    /// `BasicEmailFormat` failed.
    BasicEmailFormatUnsatisfied,
    /// `MatchRegex` failed.
    MatchRegexUnsatisfied,
    /// `MatchField` failed (e.g. password confirmation mismatch).
    MatchUnsatisfied,
    /// A rule faulted instead of producing a verdict.
    CatastrophicError,
    /// Caller-defined unsatisfied code, used by custom rules. The name must
    /// not be one of the built-in names; a rule reporting such a code
    /// yields `CATASTROPHIC_ERROR` instead.
    Custom(&'static str),
}

impl StatusCode {
    /// Stable SCREAMING_SNAKE_CASE name, suitable as an i18n key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unmodified => "UNMODIFIED",
            Self::InProgress => "IN_PROGRESS",
            Self::Correct => "CORRECT",
            Self::RequiredUnsatisfied => "REQUIRED_UNSATISFIED",
            Self::RequiredTrueUnsatisfied => "REQUIRED_TRUE_UNSATISFIED",
            Self::MinLengthUnsatisfied => "MIN_LENGTH_UNSATISFIED",
            Self::BasicEmailFormatUnsatisfied => "BASIC_EMAIL_FORMAT_UNSATISFIED",
            Self::MatchRegexUnsatisfied => "MATCH_REGEX_UNSATISFIED",
            Self::MatchUnsatisfied => "MATCH_UNSATISFIED",
            Self::CatastrophicError => "CATASTROPHIC_ERROR",
            Self::Custom(code) => code,
        }
    }

    /// Returns `true` for [`StatusCode::Correct`].
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }

    /// Returns `true` for [`StatusCode::InProgress`].
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Whether a field in this state keeps its form from being `Correct`.
    ///
    /// Untouched fields do not block; anything other than `Correct` and
    /// `Unmodified` does.
    #[must_use]
    pub fn blocks_form(&self) -> bool {
        !matches!(self, Self::Correct | Self::Unmodified)
    }

    /// Whether rules are barred from reporting this code.
    ///
    /// `UNMODIFIED` and `IN_PROGRESS` belong to the engine, and a custom
    /// code may not reuse the name of a built-in one.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        match self {
            Self::Unmodified | Self::InProgress => true,
            Self::Custom(name) => BUILT_IN.iter().any(|code| code.as_str() == *name),
            _ => false,
        }
    }

    /// Whether a rule may use this code to report a failed check.
    #[must_use]
    pub fn is_unsatisfied(&self) -> bool {
        self.blocks_form() && !self.is_reserved()
    }
}

const BUILT_IN: [StatusCode; 10] = [
    StatusCode::Unmodified,
    StatusCode::InProgress,
    StatusCode::Correct,
    StatusCode::RequiredUnsatisfied,
    StatusCode::RequiredTrueUnsatisfied,
    StatusCode::MinLengthUnsatisfied,
    StatusCode::BasicEmailFormatUnsatisfied,
    StatusCode::MatchRegexUnsatisfied,
    StatusCode::MatchUnsatisfied,
    StatusCode::CatastrophicError,
];

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

/// The verdict of a single rule evaluation. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    code: StatusCode,
    extra: Option<Value>,
}

impl ValidationResult {
    /// A result with the given code and no payload.
    #[must_use]
    pub fn new(code: StatusCode) -> Self {
        Self { code, extra: None }
    }

    /// Shorthand for a passing result.
    #[must_use]
    pub fn correct() -> Self {
        Self::new(StatusCode::Correct)
    }

    /// Passing when `ok`, otherwise `code`.
    #[must_use]
    pub fn check(ok: bool, code: StatusCode) -> Self {
        Self::new(if ok { StatusCode::Correct } else { code })
    }

    /// Attaches a payload (rule parameters, fault details, ...).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }

    /// The status code.
    #[must_use]
    pub fn code(&self) -> StatusCode {
        self.code
    }

    /// The optional payload.
    #[must_use]
    pub fn extra(&self) -> Option<&Value> {
        self.extra.as_ref()
    }

    /// Returns `true` if the rule passed.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.code.is_correct()
    }
}

// ============================================================================
// FIELD STATUS
// ============================================================================

/// What a field publishes: its code plus the results of the run behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStatus {
    code: StatusCode,
    results: Vec<ValidationResult>,
}

impl FieldStatus {
    pub(crate) fn unmodified() -> Self {
        Self {
            code: StatusCode::Unmodified,
            results: Vec::new(),
        }
    }

    pub(crate) fn in_progress() -> Self {
        Self {
            code: StatusCode::InProgress,
            results: Vec::new(),
        }
    }

    /// Settles a run: the code is the first non-correct result, or `Correct`.
    pub(crate) fn settled(results: Vec<ValidationResult>) -> Self {
        let code = results
            .iter()
            .map(ValidationResult::code)
            .find(|code| !code.is_correct())
            .unwrap_or(StatusCode::Correct);
        Self { code, results }
    }

    /// The field's status code.
    #[must_use]
    pub fn code(&self) -> StatusCode {
        self.code
    }

    /// Results of the run that produced this status, in evaluation order.
    ///
    /// Empty while `Unmodified` or `InProgress`.
    #[must_use]
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }
}

// ============================================================================
// FORM STATUS
// ============================================================================

/// Aggregate status of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStatus {
    code: StatusCode,
    field: Option<String>,
}

impl FormStatus {
    /// Aggregates field codes given in declaration order.
    ///
    /// - any field `InProgress` → `InProgress`, naming the first such field;
    /// - else the first field whose code blocks the form, with its name;
    /// - else `Correct`.
    ///
    /// The result depends only on the snapshot, never on which field
    /// changed last.
    pub fn aggregate<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, StatusCode)>,
    {
        let mut first_blocking: Option<(&str, StatusCode)> = None;
        for (name, code) in fields {
            if code.is_in_progress() {
                return Self {
                    code,
                    field: Some(name.to_owned()),
                };
            }
            if first_blocking.is_none() && code.blocks_form() {
                first_blocking = Some((name, code));
            }
        }
        match first_blocking {
            Some((name, code)) => Self {
                code,
                field: Some(name.to_owned()),
            },
            None => Self {
                code: StatusCode::Correct,
                field: None,
            },
        }
    }

    /// The aggregate code.
    #[must_use]
    pub fn code(&self) -> StatusCode {
        self.code
    }

    /// The field responsible for the code, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns `true` when the form may be submitted.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.code.is_correct()
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{} ({field})", self.code),
            None => write!(f, "{}", self.code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn settled_reports_first_failure() {
        let status = FieldStatus::settled(vec![
            ValidationResult::correct(),
            ValidationResult::new(StatusCode::MinLengthUnsatisfied),
            ValidationResult::new(StatusCode::MatchUnsatisfied),
        ]);
        assert_eq!(status.code(), StatusCode::MinLengthUnsatisfied);
        assert_eq!(status.results().len(), 3);
    }

    #[test]
    fn settled_without_rules_is_correct() {
        assert_eq!(FieldStatus::settled(Vec::new()).code(), StatusCode::Correct);
    }

    #[test]
    fn aggregate_skips_unmodified_fields() {
        let status = FormStatus::aggregate([
            ("name", StatusCode::Unmodified),
            ("email", StatusCode::BasicEmailFormatUnsatisfied),
            ("password", StatusCode::Correct),
        ]);
        assert_eq!(status.code(), StatusCode::BasicEmailFormatUnsatisfied);
        assert_eq!(status.field(), Some("email"));
    }

    #[test]
    fn aggregate_prefers_in_progress() {
        let status = FormStatus::aggregate([
            ("a", StatusCode::RequiredUnsatisfied),
            ("b", StatusCode::InProgress),
        ]);
        assert_eq!(status.code(), StatusCode::InProgress);
        assert_eq!(status.field(), Some("b"));
    }

    #[test]
    fn aggregate_of_untouched_form_is_correct() {
        let status = FormStatus::aggregate([("a", StatusCode::Unmodified)]);
        assert!(status.is_correct());
        assert_eq!(status.field(), None);
        assert_eq!(status.to_string(), "CORRECT");
    }

    #[rstest]
    #[case(StatusCode::Unmodified, true, false)]
    #[case(StatusCode::InProgress, true, false)]
    #[case(StatusCode::Correct, false, false)]
    #[case(StatusCode::MatchUnsatisfied, false, true)]
    #[case(StatusCode::CatastrophicError, false, true)]
    #[case(StatusCode::Custom("USERNAME_TAKEN"), false, true)]
    #[case(StatusCode::Custom("CORRECT"), true, false)]
    #[case(StatusCode::Custom("IN_PROGRESS"), true, false)]
    #[case(StatusCode::Custom("REQUIRED_UNSATISFIED"), true, false)]
    fn reserved_codes(#[case] code: StatusCode, #[case] reserved: bool, #[case] unsatisfied: bool) {
        assert_eq!(code.is_reserved(), reserved);
        assert_eq!(code.is_unsatisfied(), unsatisfied);
    }

    #[test]
    fn custom_code_string() {
        assert_eq!(StatusCode::Custom("USERNAME_TAKEN").to_string(), "USERNAME_TAKEN");
        assert!(StatusCode::Custom("X").blocks_form());
    }
}
