//! Per-run progress emitter backed by a bounded tokio mpsc channel

use thiserror::Error;
use tokio::sync::mpsc;

use crate::types::{Event, EventEnvelope};

/// Capacity for a run's event channel
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("event receiver was dropped")]
    Closed,

    #[error("run already emitted its terminal event")]
    AlreadyTerminated,
}

/// Ordered, append-only event sink owned by exactly one run.
///
/// `emit` awaits channel capacity, so a slow observer slows the run down
/// instead of events being dropped or reordered.
#[derive(Debug)]
pub struct ProgressEmitter {
    sender: Option<mpsc::Sender<EventEnvelope>>,
    next_seq: u64,
    terminated: bool,
}

impl ProgressEmitter {
    /// Create an emitter and the stream its events are delivered to
    pub fn channel(capacity: usize) -> (Self, EventStream) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let emitter = Self {
            sender: Some(sender),
            next_seq: 0,
            terminated: false,
        };
        (emitter, EventStream { receiver })
    }

    /// Emitter with no observer; events are numbered and discarded
    pub fn detached() -> Self {
        Self {
            sender: None,
            next_seq: 0,
            terminated: false,
        }
    }

    pub async fn emit(&mut self, event: Event) -> Result<(), EmitError> {
        if self.terminated {
            return Err(EmitError::AlreadyTerminated);
        }

        let terminal = event.is_terminal();
        let envelope = EventEnvelope::new(self.next_seq, event);
        self.next_seq += 1;

        if let Some(sender) = &self.sender {
            sender.send(envelope).await.map_err(|_| EmitError::Closed)?;
        }

        if terminal {
            self.terminated = true;
        }
        Ok(())
    }

    /// True once the observer has gone away. Detached emitters are never closed.
    pub fn is_closed(&self) -> bool {
        self.sender.as_ref().is_some_and(|s| s.is_closed())
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Get the total number of events emitted
    pub fn event_count(&self) -> u64 {
        self.next_seq
    }
}

/// Receiving side of a run's events
#[derive(Debug)]
pub struct EventStream {
    receiver: mpsc::Receiver<EventEnvelope>,
}

impl EventStream {
    /// Next event, or `None` once the run has dropped its emitter
    pub async fn next(&mut self) -> Option<EventEnvelope> {
        self.receiver.recv().await
    }

    /// Drain every event until the emitter is dropped
    pub async fn collect(mut self) -> Vec<EventEnvelope> {
        let mut events = Vec::new();
        while let Some(envelope) = self.receiver.recv().await {
            events.push(envelope);
        }
        events
    }

    pub fn into_inner(self) -> mpsc::Receiver<EventEnvelope> {
        self.receiver
    }
}
