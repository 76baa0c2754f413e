//! Tree-of-thoughts beam search engine
//!
//! The engine is generic over a [`TaskAdapter`]; the adapters in [`tasks`]
//! turn oracle answers into validated candidates and verdicts, and
//! [`SearchService`] drives one run from a validated input to its terminal
//! event.

pub mod adapter;
pub mod error;
pub mod frontier;
pub mod phase;
pub mod prompts;
pub mod runner;
pub mod search;
pub mod tasks;
pub mod validator;

pub use adapter::{Candidate, TaskAdapter};
pub use error::{EngineError, Result};
pub use phase::{RunPhase, RunStateMachine};
pub use runner::SearchService;
pub use search::{BeamSearch, SearchConfig, SearchReport, SearchStats};
pub use tasks::{Task, TaskSettings};
