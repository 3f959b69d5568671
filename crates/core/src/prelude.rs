//! Common imports.
//!
//! ```rust,ignore
//! use flowforms_core::prelude::*;
//! ```

pub use crate::config::FormConfig;
pub use crate::error::{FormError, ValidationFault};
pub use crate::event::FormEvent;
pub use crate::field::{Field, FieldKind, FieldSpec};
pub use crate::form::{Binding, Form, FormBuilder};
pub use crate::status::{FieldStatus, FormStatus, StatusCode, ValidationResult};
pub use crate::trigger::TriggerPolicy;
pub use crate::validation::{
    BasicEmailFormat, Custom, MatchField, MatchRegex, MinLength, Required, RequiredTrue,
    Validation, ValidationContext, ValidationExt,
};
pub use crate::value::FieldValue;
