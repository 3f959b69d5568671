//! Error types for form construction, ingestion and rule evaluation.

use thiserror::Error;

use crate::status::FormStatus;

/// Result type for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

/// Errors returned by [`Form`](crate::Form) and [`FormBuilder`](crate::FormBuilder).
///
/// Everything except [`FormError::Rejected`] is a programming error in the
/// form declaration or in the caller, reported as soon as it is detected.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A field name was referenced that the form does not declare.
    #[error("Field not declared: {name}")]
    UnknownField {
        /// The referenced name
        name: String,
    },

    /// Two fields were declared with the same name.
    #[error("Field declared twice: {name}")]
    DuplicateField {
        /// The duplicated name
        name: String,
    },

    /// A confirmation field points at a field that does not exist.
    #[error("Confirmation field '{field}' targets undeclared field '{target}'")]
    UnknownConfirmationTarget {
        /// The confirmation field
        field: String,
        /// The missing target
        target: String,
    },

    /// A confirmation field points at itself.
    #[error("Confirmation field '{field}' cannot confirm itself")]
    SelfConfirmation {
        /// The confirmation field
        field: String,
    },

    /// No tokio runtime was supplied and none is running.
    #[error("No tokio runtime available to run validations")]
    NoRuntime,

    /// `submit()` settled on a status other than `CORRECT`.
    #[error("Submit rejected: {status}")]
    Rejected {
        /// The settled form status
        status: FormStatus,
    },
}

impl FormError {
    pub(crate) fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }
}

/// A rule failed to produce a verdict.
///
/// Faults never reach the caller: the field converts them into a
/// `CATASTROPHIC_ERROR` result.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFault {
    /// The rule reported an error (e.g. a remote check failed).
    #[error("{0}")]
    Failed(String),

    /// The rule panicked.
    #[error("Validation panicked: {0}")]
    Panicked(String),
}

impl ValidationFault {
    /// Creates a [`ValidationFault::Failed`].
    pub fn new(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        Self::Panicked(message)
    }
}

impl From<String> for ValidationFault {
    fn from(message: String) -> Self {
        Self::Failed(message)
    }
}

impl From<&str> for ValidationFault {
    fn from(message: &str) -> Self {
        Self::Failed(message.to_owned())
    }
}
