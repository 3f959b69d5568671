//! The form: a fixed, ordered set of fields and their aggregate status.

use std::fmt;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use indexmap::IndexMap;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;

use crate::board::StatusBoard;
use crate::config::FormConfig;
use crate::error::{FormError, Result};
use crate::event::FormEvent;
use crate::field::{Field, FieldHost, FieldKind, FieldSpec};
use crate::status::{FormStatus, StatusCode};
use crate::trigger::TriggerPolicy;
use crate::value::{FieldValue, ValueStore};

// ============================================================================
// BUILDER
// ============================================================================

/// Declares the fields of a [`Form`].
///
/// # Examples
///
/// ```rust,ignore
/// let form = Form::builder()
///     .field(FieldSpec::new("email").validation(Required::new()).validation(BasicEmailFormat::new()))
///     .field(FieldSpec::new("password").validation(MinLength::new(8)))
///     .field(FieldSpec::confirmation("confirm", "password"))
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct FormBuilder {
    specs: Vec<FieldSpec>,
    config: FormConfig,
    runtime: Option<Handle>,
}

impl FormBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field. Declaration order is the form's iteration,
    /// submission and aggregation order.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Declares several fields in order.
    #[must_use = "builder methods must be chained or built"]
    pub fn fields(mut self, specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Replaces the configuration.
    #[must_use = "builder methods must be chained or built"]
    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Runtime that validation runs are spawned on. Defaults to the runtime
    /// `build` is called from.
    #[must_use = "builder methods must be chained or built"]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Checks the declaration and creates the form. Every field starts
    /// `UNMODIFIED`.
    pub fn build(self) -> Result<Form> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| FormError::NoRuntime)?,
        };

        let mut positions: IndexMap<&str, usize> = IndexMap::with_capacity(self.specs.len());
        for (index, spec) in self.specs.iter().enumerate() {
            if positions.insert(spec.name(), index).is_some() {
                return Err(FormError::DuplicateField {
                    name: spec.name().to_owned(),
                });
            }
        }

        let mut dependents = vec![Vec::new(); self.specs.len()];
        for (index, spec) in self.specs.iter().enumerate() {
            let FieldKind::Confirmation { target } = &spec.kind else {
                continue;
            };
            if target == spec.name() {
                return Err(FormError::SelfConfirmation {
                    field: spec.name().to_owned(),
                });
            }
            let Some(&target_index) = positions.get(target.as_str()) else {
                return Err(FormError::UnknownConfirmationTarget {
                    field: spec.name().to_owned(),
                    target: target.clone(),
                });
            };
            dependents[target_index].push(index);
        }

        let names: Vec<Arc<str>> = self.specs.iter().map(|spec| Arc::from(spec.name())).collect();
        let values = ValueStore::new(
            self.specs
                .iter()
                .map(|spec| (spec.name.clone(), spec.initial.clone())),
        );
        let host = Arc::new(FieldHost {
            values: Arc::new(values),
            board: StatusBoard::new(names.clone(), self.config.event_capacity),
            runtime,
            shutdown: CancellationToken::new(),
        });

        let fields: IndexMap<String, Field> = self
            .specs
            .into_iter()
            .zip(names)
            .enumerate()
            .map(|(index, (spec, name))| {
                let key = spec.name.clone();
                (key, Field::new(spec, name, index, Arc::clone(&host)))
            })
            .collect();

        tracing::debug!(fields = fields.len(), "form built");

        Ok(Form {
            inner: Arc::new(FormInner {
                fields,
                dependents,
                host,
                config: self.config,
            }),
        })
    }
}

// ============================================================================
// FORM
// ============================================================================

struct FormInner {
    fields: IndexMap<String, Field>,
    /// For each field, the confirmation fields that target it.
    dependents: Vec<Vec<usize>>,
    host: Arc<FieldHost>,
    config: FormConfig,
}

impl FormInner {
    fn field(&self, name: &str) -> Result<&Field> {
        self.fields
            .get(name)
            .ok_or_else(|| FormError::unknown_field(name))
    }

    fn apply_value(&self, field: &Field, value: FieldValue) {
        field.set_value(value);
        if !self.config.revalidate_confirmations {
            return;
        }
        for &index in &self.dependents[field.index()] {
            let dependent = &self.fields[index];
            if dependent
                .trigger_policy()
                .contains(TriggerPolicy::ON_VALUE_CHANGE)
                && dependent.status().code() != StatusCode::Unmodified
            {
                dependent.start_run();
            }
        }
    }
}

/// A set of fields validated reactively.
///
/// All ingestion methods take `&self`; a form can be shared behind an `Arc`
/// and fed from several tasks. Dropping the form cancels every validation
/// run and [`Binding`] still in flight.
pub struct Form {
    inner: Arc<FormInner>,
}

impl Form {
    /// Starts a declaration.
    #[must_use]
    pub fn builder() -> FormBuilder {
        FormBuilder::new()
    }

    /// The field called `name`.
    pub fn field(&self, name: &str) -> Result<&Field> {
        self.inner.field(name)
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.inner.fields.values()
    }

    /// The configuration the form was built with.
    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.inner.config
    }

    /// Current value of `name`.
    pub fn value(&self, name: &str) -> Result<FieldValue> {
        self.inner.field(name).map(Field::value)
    }

    /// Sets the value of `name`, validating it if its policy includes
    /// [`TriggerPolicy::ON_VALUE_CHANGE`].
    pub fn set_value(&self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        let field = self.inner.field(name)?;
        self.inner.apply_value(field, value.into());
        Ok(())
    }

    /// Validates `name` now, whatever its policy.
    pub fn validate_now(&self, name: &str) -> Result<()> {
        self.inner.field(name)?.start_run();
        Ok(())
    }

    /// Reports that `name` lost focus; validates if its policy includes
    /// [`TriggerPolicy::ON_BLUR`].
    pub fn blur(&self, name: &str) -> Result<()> {
        self.inner.field(name)?.blur();
        Ok(())
    }

    /// Validates every field in declaration order and waits for the form to
    /// settle.
    ///
    /// Untouched fields are validated too, so an empty `Required` field
    /// turns `REQUIRED_UNSATISFIED` here. Returns the settled status when it
    /// is `CORRECT`, [`FormError::Rejected`] otherwise.
    pub async fn submit(&self) -> Result<FormStatus> {
        let board = &self.inner.host.board;
        let mut rx = board.watch_form();
        tracing::debug!(fields = self.inner.fields.len(), "submitting form");

        for field in self.inner.fields.values() {
            field.start_run();
        }

        let settled = rx
            .wait_for(|status| !status.code().is_in_progress())
            .await
            .map(|status| status.clone());
        let status = settled.unwrap_or_else(|_| board.form_status());

        board.events().emit(FormEvent::Submitted {
            status: status.clone(),
        });
        tracing::debug!(%status, "submit settled");

        if status.is_correct() {
            Ok(status)
        } else {
            Err(FormError::Rejected { status })
        }
    }

    /// The current aggregate status.
    #[must_use]
    pub fn status(&self) -> FormStatus {
        self.inner.host.board.form_status()
    }

    /// A receiver of aggregate changes, starting with the current status.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<FormStatus> {
        self.inner.host.board.watch_form()
    }

    /// Aggregate changes as a stream, starting with the current status.
    #[must_use]
    pub fn subscribe(&self) -> WatchStream<FormStatus> {
        WatchStream::new(self.watch())
    }

    /// Every value change and status commit, in commit order.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<FormEvent> {
        self.inner.host.board.events().subscribe()
    }

    /// Feeds every item of `values` into `name` as if passed to
    /// [`set_value`](Self::set_value), until the stream ends, the returned
    /// [`Binding`] is dropped, or the form is dropped.
    pub fn bind<S>(&self, name: &str, values: S) -> Result<Binding>
    where
        S: Stream + Send + 'static,
        S::Item: Into<FieldValue> + Send,
    {
        let index = self.inner.field(name)?.index();
        let token = self.inner.host.shutdown.child_token();
        let inner = Arc::clone(&self.inner);
        let stop = token.clone();

        self.inner.host.runtime.spawn(async move {
            let mut values = std::pin::pin!(values);
            loop {
                tokio::select! {
                    biased;
                    () = stop.cancelled() => break,
                    next = values.next() => match next {
                        Some(value) => inner.apply_value(&inner.fields[index], value.into()),
                        None => break,
                    },
                }
            }
        });

        Ok(Binding {
            field: name.to_owned(),
            token,
        })
    }
}

impl Drop for Form {
    fn drop(&mut self) {
        self.inner.host.shutdown.cancel();
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("fields", &self.inner.fields.values().collect::<Vec<_>>())
            .field("status", &self.status())
            .finish()
    }
}

/// Live connection between a value source and a field, see [`Form::bind`].
///
/// Dropping it stops forwarding.
#[derive(Debug)]
pub struct Binding {
    field: String,
    token: CancellationToken,
}

impl Binding {
    /// The bound field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Stops forwarding; same as dropping.
    pub fn unbind(self) {}
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Required;

    #[tokio::test]
    async fn duplicate_names_are_rejected() {
        let err = Form::builder()
            .field(FieldSpec::new("a"))
            .field(FieldSpec::new("a"))
            .build()
            .unwrap_err();
        assert_eq!(err, FormError::DuplicateField { name: "a".into() });
    }

    #[tokio::test]
    async fn confirmation_target_must_exist() {
        let err = Form::builder()
            .field(FieldSpec::confirmation("confirm", "password"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            FormError::UnknownConfirmationTarget {
                field: "confirm".into(),
                target: "password".into(),
            }
        );
    }

    #[tokio::test]
    async fn confirmation_cannot_target_itself() {
        let err = Form::builder()
            .field(FieldSpec::confirmation("confirm", "confirm"))
            .build()
            .unwrap_err();
        assert_eq!(err, FormError::SelfConfirmation { field: "confirm".into() });
    }

    #[test]
    fn build_outside_runtime_fails() {
        let err = Form::builder().field(FieldSpec::new("a")).build().unwrap_err();
        assert_eq!(err, FormError::NoRuntime);
    }

    #[test]
    fn explicit_runtime_handle() {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let form = Form::builder()
            .runtime(runtime.handle().clone())
            .field(FieldSpec::new("a").validation(Required::new()))
            .build()
            .unwrap();
        assert_eq!(form.field("a").unwrap().validation_count(), 1);
    }

    #[tokio::test]
    async fn unknown_field_fails_fast() {
        let form = Form::builder().field(FieldSpec::new("a")).build().unwrap();
        assert_eq!(
            form.set_value("b", "x").unwrap_err(),
            FormError::UnknownField { name: "b".into() }
        );
        assert!(form.validate_now("b").is_err());
        assert!(form.blur("b").is_err());
        assert!(form.value("b").is_err());
        assert!(form.bind("b", futures::stream::empty::<String>()).is_err());
    }

    #[tokio::test]
    async fn confirmation_gets_implicit_match_rule() {
        let form = Form::builder()
            .field(FieldSpec::new("password"))
            .field(FieldSpec::confirmation("confirm", "password").validation(Required::new()))
            .build()
            .unwrap();
        let confirm = form.field("confirm").unwrap();
        assert_eq!(confirm.validation_count(), 2);
        assert_eq!(confirm.kind().target(), Some("password"));
    }

    #[tokio::test]
    async fn initial_values_are_visible() {
        let form = Form::builder()
            .field(FieldSpec::new("name").initial_value("bob"))
            .build()
            .unwrap();
        assert_eq!(form.value("name").unwrap(), FieldValue::from("bob"));
        assert_eq!(
            form.fields().map(Field::name).collect::<Vec<_>>(),
            vec!["name"]
        );
    }
}
