//! Client event bus.
//!
//! Broadcast channel for notifying observers (UI layers, tests) of note
//! lifecycle changes and of mutation failures. Failure events carry the
//! user-facing message for the operation that failed; each mutation has
//! its own message so a listener can tell them apart.

use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Mutation kinds, used to derive user-facing failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOp {
    Create,
    Update,
    Delete,
    Summarize,
}

impl MutationOp {
    /// User-facing message emitted when this mutation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            MutationOp::Create => "Couldn't create note",
            MutationOp::Update => "Couldn't update note",
            MutationOp::Delete => "Couldn't delete note",
            MutationOp::Summarize => "Couldn't generate summary",
        }
    }
}

/// Events published by the client.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    NoteCreated { id: Uuid },
    NoteUpdated { id: Uuid },
    NoteDeleted { id: Uuid },
    SummarySaved { id: Uuid },
    OperationFailed { op: MutationOp, message: String },
}

/// Broadcast bus for [`ClientEvent`]s.
///
/// Emission never blocks and never fails: with no subscribers the event is
/// dropped, matching `tokio::sync::broadcast` semantics.
#[derive(Clone)]
pub struct ClientEventBus {
    tx: broadcast::Sender<ClientEvent>,
}

impl ClientEventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Lagging or absent receivers are ignored.
    pub fn emit(&self, event: ClientEvent) {
        debug!(?event, "Emitting client event");
        let _ = self.tx.send(event);
    }

    /// Publish a failure event for `op` with its standard message.
    pub fn emit_failure(&self, op: MutationOp) {
        self.emit(ClientEvent::OperationFailed {
            op,
            message: op.failure_message().to_string(),
        });
    }
}

impl Default for ClientEventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
