//! Progress event protocol for search runs
//!
//! This crate provides the event types a remote observer replays into a
//! search tree, and the per-run emitter that delivers them in order.

mod emitter;
mod types;

pub use emitter::{EmitError, EventStream, ProgressEmitter, DEFAULT_CAPACITY};
pub use types::*;
