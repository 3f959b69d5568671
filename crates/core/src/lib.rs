//! # flowforms-core
//!
//! A reactive validation engine for structured forms.
//!
//! A [`Form`] owns a fixed, ordered set of fields. Each field holds a value,
//! an ordered list of [`Validation`] rules and a [`TriggerPolicy`], and
//! publishes a live [`FieldStatus`]. The form aggregates the field statuses
//! into a [`FormStatus`] every time one of them changes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flowforms_core::prelude::*;
//!
//! let form = Form::builder()
//!     .field(FieldSpec::new("email").validation(Required::new()).validation(BasicEmailFormat::new()))
//!     .field(FieldSpec::new("password").validation(Required::new()).validation(MinLength::new(8)))
//!     .field(FieldSpec::confirmation("confirm", "password"))
//!     .build()?;
//!
//! let mut status = form.watch();
//! form.set_value("email", "user@example.com")?;
//!
//! match form.submit().await {
//!     Ok(_) => println!("submitted"),
//!     Err(FormError::Rejected { status }) => println!("fix {:?}", status.field()),
//!     Err(other) => return Err(other.into()),
//! }
//! ```
//!
//! ## Runs and cancellation
//!
//! Every trigger starts a validation run on the form's tokio runtime. A new
//! run for a field supersedes the one in flight: the old run may keep
//! executing, but its result is never published. Rules in a run execute
//! strictly in order and stop at the first failure (see
//! [`ValidationExt::continue_on_failure`] to opt out per rule). Runs of
//! different fields are independent.
//!
//! ## Faults
//!
//! A rule that returns [`ValidationFault`] or panics produces a
//! `CATASTROPHIC_ERROR` result; the rest of the form keeps working. Misuse,
//! such as naming an undeclared field, is returned as [`FormError`]
//! immediately.

mod board;
pub mod config;
pub mod error;
pub mod event;
pub mod field;
pub mod form;
pub mod prelude;
pub mod status;
pub mod trigger;
pub mod validation;
pub mod value;

pub use config::FormConfig;
pub use error::{FormError, Result, ValidationFault};
pub use event::FormEvent;
pub use field::{Field, FieldKind, FieldSpec};
pub use form::{Binding, Form, FormBuilder};
pub use status::{FieldStatus, FormStatus, StatusCode, ValidationResult};
pub use trigger::TriggerPolicy;
pub use validation::{Validation, ValidationContext, ValidationExt};
pub use value::FieldValue;
