//! Event types for the search progress protocol

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tot_core::{RunResult, StateId, TaskKind, Verdict};

/// Envelope wrapping every emitted event with its position in the run's log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Position in the run's event log, starting at 0
    pub seq: u64,
    /// When the event was emitted
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: Event,
}

impl EventEnvelope {
    pub fn new(seq: u64, event: Event) -> Self {
        Self {
            seq,
            timestamp: Utc::now(),
            event,
        }
    }
}

/// All events a run can emit, in the wire shape the tree renderer consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum Event {
    /// Run accepted; echoes the normalized input
    Init { task: TaskKind, payload: Value },

    /// A new beam round is starting
    Round { round: u32 },

    /// A new tree node was created
    Node {
        id: StateId,
        parent_id: Option<StateId>,
        label: String,
        depth: usize,
    },

    /// A verdict was assigned to a node
    Evaluate { node_id: StateId, verdict: Verdict },

    /// A node was marked dead
    Prune { node_id: StateId },

    /// Terminal outcome of the run
    Solution { result: RunResult },

    /// Unrecoverable failure; also terminal
    Error { message: String },
}

impl Event {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Wire name of the event (the `type` tag)
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Init { .. } => "init",
            Event::Round { .. } => "round",
            Event::Node { .. } => "node",
            Event::Evaluate { .. } => "evaluate",
            Event::Prune { .. } => "prune",
            Event::Solution { .. } => "solution",
            Event::Error { .. } => "error",
        }
    }

    /// Whether this event ends the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Solution { .. } | Event::Error { .. })
    }

    /// Get the tree node this event refers to, if any
    pub fn node_id(&self) -> Option<StateId> {
        match self {
            Event::Node { id, .. } => Some(*id),
            Event::Evaluate { node_id, .. } => Some(*node_id),
            Event::Prune { node_id } => Some(*node_id),
            Event::Init { .. }
            | Event::Round { .. }
            | Event::Solution { .. }
            | Event::Error { .. } => None,
        }
    }
}
