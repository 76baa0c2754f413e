pub mod outcome;
pub mod request;
pub mod state;
pub mod verdict;

pub use outcome::{RunResult, SearchOutcome, NO_SOLUTION};
pub use request::{
    CreativeWritingRequest, Game24Request, RunRequest, TaskInput, TaskKind, SEED_COUNT,
};
pub use state::{IdGenerator, SearchState, StateId};
pub use verdict::Verdict;
