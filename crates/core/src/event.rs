//! Event broadcasting for form observability.
//!
//! Every value change and status commit is mirrored onto a
//! `tokio::sync::broadcast` channel. Unlike the status watches, which only
//! keep the latest value, the event stream preserves each emission in commit
//! order.

use tokio::sync::broadcast;

use crate::status::{FieldStatus, FormStatus};
use crate::value::FieldValue;

/// Events emitted by a [`Form`](crate::Form).
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// A field's value was set.
    ValueChanged {
        /// The field name
        field: String,
        /// The new value
        value: FieldValue,
    },
    /// A field published a new status.
    FieldStatusChanged {
        /// The field name
        field: String,
        /// The published status
        status: FieldStatus,
    },
    /// The form aggregate was recomputed.
    FormStatusChanged {
        /// The new aggregate
        status: FormStatus,
    },
    /// A submit settled.
    Submitted {
        /// The settled aggregate
        status: FormStatus,
    },
}

impl FormEvent {
    /// The field this event is about, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValueChanged { field, .. } | Self::FieldStatusChanged { field, .. } => Some(field),
            Self::FormStatusChanged { .. } | Self::Submitted { .. } => None,
        }
    }
}

/// Fire-and-forget broadcast of [`FormEvent`]s.
pub(crate) struct EventBus {
    sender: broadcast::Sender<FormEvent>,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Emits to current subscribers; dropped if there are none.
    pub(crate) fn emit(&self, event: FormEvent) {
        let _ = self.sender.send(event);
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.sender.subscribe()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}
