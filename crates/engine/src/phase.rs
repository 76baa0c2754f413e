use crate::error::{EngineError, Result};

/// Lifecycle of a single search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Solved,
    PartialFound,
    Exhausted,
    Errored,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Solved => "solved",
            Self::PartialFound => "partial_found",
            Self::Exhausted => "exhausted",
            Self::Errored => "errored",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Solved | Self::PartialFound | Self::Exhausted | Self::Errored
        )
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct RunStateMachine;

impl RunStateMachine {
    pub fn validate_transition(from: &RunPhase, to: &RunPhase) -> Result<()> {
        let allowed = Self::allowed_transitions(from);

        if allowed.contains(to) {
            Ok(())
        } else {
            Err(EngineError::InvalidTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }

    fn allowed_transitions(from: &RunPhase) -> Vec<RunPhase> {
        match from {
            RunPhase::Idle => vec![RunPhase::Running],
            RunPhase::Running => vec![
                RunPhase::Solved,
                RunPhase::PartialFound,
                RunPhase::Exhausted,
                RunPhase::Errored,
            ],
            RunPhase::Solved | RunPhase::PartialFound | RunPhase::Exhausted | RunPhase::Errored => {
                vec![]
            }
        }
    }

    pub fn can_transition(from: &RunPhase, to: &RunPhase) -> bool {
        Self::validate_transition(from, to).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(RunStateMachine::can_transition(
            &RunPhase::Idle,
            &RunPhase::Running
        ));
        for end in [
            RunPhase::Solved,
            RunPhase::PartialFound,
            RunPhase::Exhausted,
            RunPhase::Errored,
        ] {
            assert!(RunStateMachine::can_transition(&RunPhase::Running, &end));
        }
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!RunStateMachine::can_transition(
            &RunPhase::Idle,
            &RunPhase::Solved
        ));
        assert!(!RunStateMachine::can_transition(
            &RunPhase::Running,
            &RunPhase::Idle
        ));
    }

    #[test]
    fn test_terminal_phases_are_final() {
        for end in [
            RunPhase::Solved,
            RunPhase::PartialFound,
            RunPhase::Exhausted,
            RunPhase::Errored,
        ] {
            assert!(end.is_terminal());
            assert!(!RunStateMachine::can_transition(&end, &RunPhase::Running));
            assert!(!RunStateMachine::can_transition(&end, &RunPhase::Errored));
        }
        assert!(!RunPhase::Running.is_terminal());
    }

    #[test]
    fn test_transition_error_names_phases() {
        let err = RunStateMachine::validate_transition(&RunPhase::Solved, &RunPhase::Running)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid run transition from solved to running"
        );
    }
}
