//! In-memory oracle replaying canned answers, for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{OracleError, OracleResult};
use crate::types::AskParams;
use crate::Oracle;

type Responder = Box<dyn Fn(&str) -> OracleResult<String> + Send + Sync>;

enum Script {
    Queue(VecDeque<OracleResult<String>>),
    Responder(Responder),
}

/// Oracle that answers from a fixed queue or a prompt-inspecting closure,
/// and records every prompt it was asked.
pub struct ScriptedOracle {
    script: Mutex<Script>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    /// Answer calls in order; once the queue is empty every call fails.
    pub fn queue<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::results(answers.into_iter().map(|a| Ok(a.into())))
    }

    /// Like [`ScriptedOracle::queue`], but individual calls may fail.
    pub fn results<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = OracleResult<String>>,
    {
        Self::with_script(Script::Queue(answers.into_iter().collect()))
    }

    /// Answer every call by inspecting its prompt.
    pub fn responder<F>(f: F) -> Self
    where
        F: Fn(&str) -> OracleResult<String> + Send + Sync + 'static,
    {
        Self::with_script(Script::Responder(Box::new(f)))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn ask(&self, prompt: &str, _params: AskParams) -> OracleResult<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        let mut script = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match &mut *script {
            Script::Queue(answers) => answers.pop_front().unwrap_or_else(|| {
                Err(OracleError::Api {
                    message: "scripted oracle has no answers left".to_string(),
                    status_code: None,
                })
            }),
            Script::Responder(f) => f(prompt),
        }
    }
}
