use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Solution text reported when a run finds neither a goal nor a graded partial.
pub const NO_SOLUTION: &str = "No solution found within budget";

/// Terminal result of a search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A goal state was reached.
    Success {
        path: Vec<String>,
        steps: usize,
        solution: String,
    },
    /// No goal, but a `sure`-graded state was tracked as best partial.
    Partial {
        path: Vec<String>,
        steps: usize,
        solution: String,
    },
    /// No goal and no graded partial.
    Exhausted,
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn steps(&self) -> usize {
        match self {
            Self::Success { steps, .. } | Self::Partial { steps, .. } => *steps,
            Self::Exhausted => 0,
        }
    }

    pub fn path(&self) -> &[String] {
        match self {
            Self::Success { path, .. } | Self::Partial { path, .. } => path,
            Self::Exhausted => &[],
        }
    }
}

/// Wire shape of a finished run, shared by the `solution` event and the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RunResult {
    pub success: bool,
    /// Newline-joined path steps, or a fixed sentinel when nothing was found.
    pub solution: String,
    pub steps: usize,
    #[serde(default)]
    pub partial: bool,
}

impl From<&SearchOutcome> for RunResult {
    fn from(outcome: &SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Success {
                steps, solution, ..
            } => Self {
                success: true,
                solution: solution.clone(),
                steps: *steps,
                partial: false,
            },
            SearchOutcome::Partial {
                steps, solution, ..
            } => Self {
                success: false,
                solution: solution.clone(),
                steps: *steps,
                partial: true,
            },
            SearchOutcome::Exhausted => Self {
                success: false,
                solution: NO_SOLUTION.to_string(),
                steps: 0,
                partial: false,
            },
        }
    }
}

impl From<SearchOutcome> for RunResult {
    fn from(outcome: SearchOutcome) -> Self {
        Self::from(&outcome)
    }
}
