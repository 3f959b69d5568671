//! Fields: declaration, observation and validation runs.

use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;

use crate::board::StatusBoard;
use crate::event::FormEvent;
use crate::status::FieldStatus;
use crate::trigger::TriggerPolicy;
use crate::validation::{self, MatchField, Validation, ValidationContext};
use crate::value::{FieldValue, ValueStore};

/// Role of a field within its form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldKind {
    /// An ordinary field.
    #[default]
    Normal,
    /// Must repeat the value of `target` (e.g. "confirm password").
    Confirmation {
        /// Name of the confirmed field
        target: String,
    },
}

impl FieldKind {
    /// The confirmed field, for confirmation fields.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Normal => None,
            Self::Confirmation { target } => Some(target),
        }
    }
}

// ============================================================================
// DECLARATION
// ============================================================================

/// Declaration of one field, handed to [`FormBuilder::field`](crate::FormBuilder::field).
///
/// # Examples
///
/// ```rust,ignore
/// let password = FieldSpec::new("password")
///     .validation(Required::new())
///     .validation(MinLength::new(8));
///
/// let confirm = FieldSpec::confirmation("confirm_password", "password")
///     .validation(Required::new());
/// ```
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) initial: FieldValue,
    pub(crate) validations: Vec<Arc<dyn Validation>>,
    pub(crate) trigger: TriggerPolicy,
    pub(crate) kind: FieldKind,
}

impl FieldSpec {
    /// A normal field with no rules, an empty value and the default trigger.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: FieldValue::Empty,
            validations: Vec::new(),
            trigger: TriggerPolicy::default(),
            kind: FieldKind::Normal,
        }
    }

    /// A confirmation of `target`. A [`MatchField`] rule against the target
    /// is appended after the declared rules.
    pub fn confirmation(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Confirmation {
                target: target.into(),
            },
            ..Self::new(name)
        }
    }

    /// Sets the value the field starts with. Does not trigger validation.
    #[must_use = "builder methods must be chained or built"]
    pub fn initial_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.initial = value.into();
        self
    }

    /// Appends a rule. Rules run in the order they are added.
    #[must_use = "builder methods must be chained or built"]
    pub fn validation(mut self, rule: impl Validation + 'static) -> Self {
        self.validations.push(Arc::new(rule));
        self
    }

    /// Appends a rule shared with other fields.
    #[must_use = "builder methods must be chained or built"]
    pub fn shared_validation(mut self, rule: Arc<dyn Validation>) -> Self {
        self.validations.push(rule);
        self
    }

    /// Sets the trigger policy.
    #[must_use = "builder methods must be chained or built"]
    pub fn trigger(mut self, trigger: TriggerPolicy) -> Self {
        self.trigger = trigger;
        self
    }

    /// The declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("initial", &self.initial)
            .field("validations", &self.validations.len())
            .field("trigger", &self.trigger)
            .field("kind", &self.kind)
            .finish()
    }
}

// ============================================================================
// HOST
// ============================================================================

/// What a field needs from the form that owns it, without the form itself.
#[derive(Debug)]
pub(crate) struct FieldHost {
    pub(crate) values: Arc<ValueStore>,
    pub(crate) board: StatusBoard,
    pub(crate) runtime: Handle,
    pub(crate) shutdown: CancellationToken,
}

// ============================================================================
// FIELD
// ============================================================================

struct FieldCore {
    name: Arc<str>,
    index: usize,
    kind: FieldKind,
    trigger: TriggerPolicy,
    validations: Vec<Arc<dyn Validation>>,
    host: Arc<FieldHost>,
}

/// Handle to a field of a [`Form`](crate::Form).
///
/// Read-only from the outside: values and triggers are fed through the
/// form, which owns every field.
#[derive(Clone)]
pub struct Field {
    core: Arc<FieldCore>,
}

impl Field {
    pub(crate) fn new(spec: FieldSpec, name: Arc<str>, index: usize, host: Arc<FieldHost>) -> Self {
        let mut validations = spec.validations;
        if let FieldKind::Confirmation { target } = &spec.kind {
            validations.push(Arc::new(MatchField::new(target.clone())));
        }
        Self {
            core: Arc::new(FieldCore {
                name,
                index,
                kind: spec.kind,
                trigger: spec.trigger,
                validations,
                host,
            }),
        }
    }

    /// The field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Normal or confirmation.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.core.kind
    }

    /// When the field validates on its own.
    #[must_use]
    pub fn trigger_policy(&self) -> TriggerPolicy {
        self.core.trigger
    }

    /// Number of rules, including the implicit confirmation match.
    #[must_use]
    pub fn validation_count(&self) -> usize {
        self.core.validations.len()
    }

    /// The current value.
    #[must_use]
    pub fn value(&self) -> FieldValue {
        self.core.host.values.get(&self.core.name).unwrap_or_default()
    }

    /// The current status.
    #[must_use]
    pub fn status(&self) -> FieldStatus {
        self.core.host.board.field_status(self.core.index)
    }

    /// A receiver of status changes. Its initial value is the current status
    /// (`UNMODIFIED` before any interaction); dropping it unsubscribes.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<FieldStatus> {
        self.core.host.board.watch_field(self.core.index)
    }

    /// Status changes as a stream, starting with the current status.
    #[must_use]
    pub fn subscribe(&self) -> WatchStream<FieldStatus> {
        WatchStream::new(self.watch())
    }

    pub(crate) fn index(&self) -> usize {
        self.core.index
    }

    /// Stores `value` and validates if the policy asks for it.
    pub(crate) fn set_value(&self, value: FieldValue) {
        let host = &self.core.host;
        let stored = host.values.set(&self.core.name, value.clone());
        debug_assert!(stored, "field `{}` has no value slot", self.core.name);
        host.board.events().emit(FormEvent::ValueChanged {
            field: self.core.name.to_string(),
            value,
        });
        if self.core.trigger.contains(TriggerPolicy::ON_VALUE_CHANGE) {
            self.start_run();
        }
    }

    /// Focus left the field.
    pub(crate) fn blur(&self) {
        if self.core.trigger.contains(TriggerPolicy::ON_BLUR) {
            self.start_run();
        }
    }

    /// Starts a run unconditionally, superseding any run in flight.
    pub(crate) fn start_run(&self) -> u64 {
        let host = &self.core.host;
        let (generation, value) = host.board.begin_run(self.core.index, || self.value());
        tracing::trace!(field = %self.core.name, generation, "validation run started");

        let field = self.clone();
        let shutdown = host.shutdown.clone();
        host.runtime.spawn(async move {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {}
                () = field.run(generation, value) => {}
            }
        });
        generation
    }

    async fn run(&self, generation: u64, value: FieldValue) {
        let core = &self.core;
        let board = &core.host.board;
        let ctx = ValidationContext::new(Arc::clone(&core.name), value, Arc::clone(&core.host.values));

        let mut results = Vec::with_capacity(core.validations.len());
        for rule in &core.validations {
            if !board.is_current(core.index, generation) {
                return;
            }
            let result = validation::evaluate(rule.as_ref(), &ctx).await;
            let stop = !result.is_correct() && rule.fail_fast();
            results.push(result);
            if stop {
                break;
            }
        }

        let status = FieldStatus::settled(results);
        let code = status.code();
        if board.complete_run(core.index, generation, status) {
            tracing::debug!(field = %core.name, generation, %code, "validation run completed");
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.core.name)
            .field("kind", &self.core.kind)
            .field("trigger", &self.core.trigger)
            .field("status", &self.status().code())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{MinLength, Required};

    #[test]
    fn confirmation_spec_records_target() {
        let spec = FieldSpec::confirmation("confirm", "password").validation(Required::new());
        assert_eq!(spec.kind.target(), Some("password"));
        assert_eq!(spec.validations.len(), 1);
        assert_eq!(spec.trigger, TriggerPolicy::ON_VALUE_CHANGE);
    }

    fn detached(slots: &[&str], name: &str) -> Field {
        let host = Arc::new(FieldHost {
            values: Arc::new(ValueStore::new(
                slots.iter().map(|slot| ((*slot).to_owned(), FieldValue::Empty)),
            )),
            board: StatusBoard::new(vec![Arc::from(name)], 8),
            runtime: Handle::current(),
            shutdown: CancellationToken::new(),
        });
        Field::new(FieldSpec::new(name).trigger(TriggerPolicy::MANUAL), Arc::from(name), 0, host)
    }

    #[tokio::test]
    async fn set_value_stores_and_announces() {
        let field = detached(&["name"], "name");
        let mut events = field.core.host.board.events().subscribe();
        field.set_value(FieldValue::from("Ada"));

        assert_eq!(field.value(), FieldValue::from("Ada"));
        assert_eq!(
            events.try_recv().unwrap(),
            FormEvent::ValueChanged {
                field: "name".into(),
                value: FieldValue::from("Ada"),
            }
        );
    }

    #[cfg(debug_assertions)]
    #[tokio::test]
    #[should_panic(expected = "has no value slot")]
    async fn set_value_without_slot_is_a_bug() {
        detached(&[], "ghost").set_value(FieldValue::from("boo"));
    }

    #[test]
    fn spec_builder() {
        let spec = FieldSpec::new("name")
            .initial_value("bob")
            .validation(Required::new())
            .validation(MinLength::new(2))
            .trigger(TriggerPolicy::MANUAL);
        assert_eq!(spec.name(), "name");
        assert_eq!(spec.initial, FieldValue::from("bob"));
        assert_eq!(spec.validations.len(), 2);
        assert_eq!(spec.kind, FieldKind::Normal);
        assert!(format!("{spec:?}").contains("validations: 2"));
    }
}
