//! Status bookkeeping shared by the fields of one form.
//!
//! The board owns every field's status channel, the per-field run
//! generation and the form's aggregate channel. All of them change under one
//! lock, in this order:
//!
//! 1. a run is started: the field's generation is bumped and `IN_PROGRESS`
//!    is committed;
//! 2. a run completes: its result is committed only if its generation is
//!    still the field's current one, otherwise it is dropped silently.
//!
//! A commit publishes the field status first and the recomputed form status
//! second, so a form observer never sees an aggregate built from a field
//! status that has not been published yet.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::event::{EventBus, FormEvent};
use crate::status::{FieldStatus, FormStatus, StatusCode};
use crate::value::FieldValue;

#[derive(Debug)]
struct BoardState {
    codes: Vec<StatusCode>,
    generations: Vec<u64>,
}

#[derive(Debug)]
pub(crate) struct StatusBoard {
    names: Vec<Arc<str>>,
    state: Mutex<BoardState>,
    fields: Vec<watch::Sender<FieldStatus>>,
    form: watch::Sender<FormStatus>,
    events: EventBus,
}

impl StatusBoard {
    pub(crate) fn new(names: Vec<Arc<str>>, event_capacity: usize) -> Self {
        let codes = vec![StatusCode::Unmodified; names.len()];
        let initial = FormStatus::aggregate(names.iter().map(|name| &**name).zip(codes.iter().copied()));
        let fields = names
            .iter()
            .map(|_| watch::Sender::new(FieldStatus::unmodified()))
            .collect();
        Self {
            state: Mutex::new(BoardState {
                generations: vec![0; names.len()],
                codes,
            }),
            names,
            fields,
            form: watch::Sender::new(initial),
            events: EventBus::new(event_capacity),
        }
    }

    /// Starts a run for field `index`, superseding any run in flight.
    ///
    /// `read` is called under the board lock to snapshot the value the run
    /// evaluates, so the newest run always sees the newest value.
    pub(crate) fn begin_run<F>(&self, index: usize, read: F) -> (u64, FieldValue)
    where
        F: FnOnce() -> FieldValue,
    {
        let mut state = self.state.lock();
        state.generations[index] += 1;
        let generation = state.generations[index];
        let value = read();
        self.commit(&mut state, index, FieldStatus::in_progress());
        (generation, value)
    }

    /// Publishes the outcome of a run. Returns `false` (and publishes
    /// nothing) if the run has been superseded.
    pub(crate) fn complete_run(&self, index: usize, generation: u64, status: FieldStatus) -> bool {
        let mut state = self.state.lock();
        if state.generations[index] != generation {
            return false;
        }
        self.commit(&mut state, index, status);
        true
    }

    /// Whether `generation` is still the latest run of field `index`.
    pub(crate) fn is_current(&self, index: usize, generation: u64) -> bool {
        self.state.lock().generations[index] == generation
    }

    fn commit(&self, state: &mut BoardState, index: usize, status: FieldStatus) {
        let changed = self.fields[index].send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status.clone();
                true
            }
        });
        if !changed {
            return;
        }

        state.codes[index] = status.code();
        let aggregate = FormStatus::aggregate(
            self.names
                .iter()
                .map(|name| &**name)
                .zip(state.codes.iter().copied()),
        );

        self.events.emit(FormEvent::FieldStatusChanged {
            field: self.names[index].to_string(),
            status,
        });
        self.form.send_replace(aggregate.clone());
        self.events.emit(FormEvent::FormStatusChanged { status: aggregate });
    }

    pub(crate) fn field_status(&self, index: usize) -> FieldStatus {
        self.fields[index].borrow().clone()
    }

    pub(crate) fn watch_field(&self, index: usize) -> watch::Receiver<FieldStatus> {
        self.fields[index].subscribe()
    }

    pub(crate) fn form_status(&self) -> FormStatus {
        self.form.borrow().clone()
    }

    pub(crate) fn watch_form(&self) -> watch::Receiver<FormStatus> {
        self.form.subscribe()
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ValidationResult;
    use pretty_assertions::assert_eq;

    fn board() -> StatusBoard {
        StatusBoard::new(vec![Arc::from("a"), Arc::from("b")], 16)
    }

    fn failing(code: StatusCode) -> FieldStatus {
        FieldStatus::settled(vec![ValidationResult::new(code)])
    }

    #[test]
    fn starts_unmodified_and_correct() {
        let board = board();
        assert_eq!(board.field_status(0).code(), StatusCode::Unmodified);
        assert!(board.form_status().is_correct());
    }

    #[test]
    fn superseded_run_is_discarded() {
        let board = board();
        let (first, _) = board.begin_run(0, FieldValue::default);
        let (second, _) = board.begin_run(0, FieldValue::default);

        assert!(!board.complete_run(0, first, failing(StatusCode::RequiredUnsatisfied)));
        assert_eq!(board.field_status(0).code(), StatusCode::InProgress);

        assert!(board.complete_run(0, second, FieldStatus::settled(Vec::new())));
        assert_eq!(board.field_status(0).code(), StatusCode::Correct);
        assert!(!board.is_current(0, first));
        assert!(board.is_current(0, second));
    }

    #[test]
    fn generations_are_per_field() {
        let board = board();
        let (a, _) = board.begin_run(0, FieldValue::default);
        let (b, _) = board.begin_run(1, FieldValue::default);
        assert!(board.complete_run(0, a, failing(StatusCode::MatchUnsatisfied)));
        assert!(board.complete_run(1, b, failing(StatusCode::RequiredUnsatisfied)));

        let status = board.form_status();
        assert_eq!(status.code(), StatusCode::MatchUnsatisfied);
        assert_eq!(status.field(), Some("a"));
    }

    #[tokio::test]
    async fn field_commit_precedes_form_commit() {
        let board = board();
        let mut events = board.events().subscribe();
        let (generation, _) = board.begin_run(1, FieldValue::default);
        board.complete_run(1, generation, failing(StatusCode::RequiredUnsatisfied));

        let mut kinds = Vec::new();
        while let Ok(event) = events.try_recv() {
            kinds.push(match event {
                FormEvent::FieldStatusChanged { status, .. } => format!("field:{}", status.code()),
                FormEvent::FormStatusChanged { status } => format!("form:{}", status.code()),
                other => format!("{other:?}"),
            });
        }
        assert_eq!(
            kinds,
            vec![
                "field:IN_PROGRESS",
                "form:IN_PROGRESS",
                "field:REQUIRED_UNSATISFIED",
                "form:REQUIRED_UNSATISFIED",
            ]
        );
    }

    #[test]
    fn repeated_in_progress_is_not_republished() {
        let board = board();
        let mut rx = board.watch_field(0);
        rx.mark_unchanged();
        board.begin_run(0, FieldValue::default);
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();
        board.begin_run(0, FieldValue::default);
        assert!(!rx.has_changed().unwrap());
    }
}
