use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::{CoreError, Result};

/// Number of seed values every task payload carries.
pub const SEED_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum TaskKind {
    #[serde(rename = "game24")]
    Game24,
    #[serde(rename = "creativeWriting")]
    CreativeWriting,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Game24 => "game24",
            Self::CreativeWriting => "creativeWriting",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "game24" => Some(Self::Game24),
            "creativeWriting" => Some(Self::CreativeWriting),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generic run request: `{ "task": ..., "payload": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RunRequest {
    pub task: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub payload: Value,
}

impl RunRequest {
    pub fn validate(&self) -> Result<TaskInput> {
        TaskInput::from_request(&self.task, &self.payload)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Game24Request {
    /// Exactly four numbers.
    pub numbers: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreativeWritingRequest {
    /// Exactly four non-empty seed sentences.
    pub sentences: Vec<String>,
}

/// A validated, normalized task input. Constructing one is the only way a run can start.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskInput {
    Game24 { numbers: Vec<f64> },
    CreativeWriting { sentences: Vec<String> },
}

impl TaskInput {
    pub fn from_request(task: &str, payload: &Value) -> Result<Self> {
        match TaskKind::parse(task) {
            Some(TaskKind::Game24) => Self::game24(payload),
            Some(TaskKind::CreativeWriting) => Self::creative_writing(payload),
            None => Err(CoreError::UnknownTask(task.to_string())),
        }
    }

    /// Validate a `game24` payload: `{ "numbers": [n1, n2, n3, n4] }`.
    pub fn game24(payload: &Value) -> Result<Self> {
        let invalid =
            || CoreError::validation("game24 requires payload.numbers (array of 4 numbers)");

        let items = payload
            .get("numbers")
            .and_then(Value::as_array)
            .filter(|items| items.len() == SEED_COUNT)
            .ok_or_else(invalid)?;

        let numbers = items
            .iter()
            .map(|v| v.as_f64().filter(|n| n.is_finite()))
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(invalid)?;

        Ok(Self::Game24 { numbers })
    }

    /// Validate a `creativeWriting` payload: `{ "sentences": [s1, s2, s3, s4] }`.
    pub fn creative_writing(payload: &Value) -> Result<Self> {
        let invalid = || {
            CoreError::validation(
                "creativeWriting requires payload.sentences (array of 4 non-empty strings)",
            )
        };

        let items = payload
            .get("sentences")
            .and_then(Value::as_array)
            .filter(|items| items.len() == SEED_COUNT)
            .ok_or_else(invalid)?;

        let sentences = items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .collect::<Option<Vec<String>>>()
            .ok_or_else(invalid)?;

        Ok(Self::CreativeWriting { sentences })
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Game24 { .. } => TaskKind::Game24,
            Self::CreativeWriting { .. } => TaskKind::CreativeWriting,
        }
    }

    /// Normalized payload echoed back in the `init` event.
    pub fn payload(&self) -> Value {
        match self {
            Self::Game24 { numbers } => json!({ "numbers": numbers }),
            Self::CreativeWriting { sentences } => json!({ "sentences": sentences }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_kind_parse() {
        assert_eq!(TaskKind::parse("game24"), Some(TaskKind::Game24));
        assert_eq!(
            TaskKind::parse("creativeWriting"),
            Some(TaskKind::CreativeWriting)
        );
        assert_eq!(TaskKind::parse("crosswords"), None);
        assert_eq!(
            serde_json::to_string(&TaskKind::CreativeWriting).unwrap(),
            "\"creativeWriting\""
        );
    }

    #[test]
    fn test_game24_valid() {
        let input = TaskInput::from_request("game24", &json!({ "numbers": [4, 9, 10, 13] })).unwrap();
        assert_eq!(
            input,
            TaskInput::Game24 {
                numbers: vec![4.0, 9.0, 10.0, 13.0]
            }
        );
        assert_eq!(input.kind(), TaskKind::Game24);
    }

    #[test]
    fn test_game24_rejects_wrong_count_and_types() {
        for payload in [
            json!({ "numbers": [1, 2, 3] }),
            json!({ "numbers": [1, 2, 3, 4, 5] }),
            json!({ "numbers": [1, 2, "3", 4] }),
            json!({ "nums": [1, 2, 3, 4] }),
            json!(null),
        ] {
            let err = TaskInput::game24(&payload).unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "{payload}");
        }
    }

    #[test]
    fn test_creative_writing_trims_and_rejects_empty() {
        let input = TaskInput::creative_writing(&json!({
            "sentences": [" a ", "b", "c", "d"]
        }))
        .unwrap();
        match input {
            TaskInput::CreativeWriting { sentences } => assert_eq!(sentences[0], "a"),
            other => panic!("unexpected input {other:?}"),
        }

        let err = TaskInput::creative_writing(&json!({ "sentences": ["a", " ", "c", "d"] }));
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_task() {
        let err = TaskInput::from_request("crosswords", &json!({})).unwrap_err();
        assert_eq!(err, CoreError::UnknownTask("crosswords".to_string()));
    }

    #[test]
    fn test_payload_echo() {
        let input = TaskInput::Game24 {
            numbers: vec![1.0, 2.0, 3.0, 4.0],
        };
        assert_eq!(input.payload()["numbers"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_run_request_validate() {
        let request: RunRequest = serde_json::from_value(json!({
            "task": "creativeWriting",
            "payload": { "sentences": ["a", "b", "c", "d"] }
        }))
        .unwrap();
        assert_eq!(request.validate().unwrap().kind(), TaskKind::CreativeWriting);
    }
}
