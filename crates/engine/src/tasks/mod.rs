//! Concrete task adapters and the dispatch between them.

pub mod creative_writing;
pub mod game24;

use std::sync::Arc;

use events::ProgressEmitter;
use oracle::Oracle;
use serde::{Deserialize, Serialize};
use tot_core::{TaskInput, TaskKind};

use crate::error::{EngineError, Result};
use crate::search::{BeamSearch, SearchConfig, SearchReport};

pub use creative_writing::{CreativeWritingAdapter, Draft, DEFAULT_TARGET_PARAGRAPHS};
pub use game24::{Game24Adapter, Numbers};

/// Per-task tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskSettings {
    pub creative_target_paragraphs: usize,
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self {
            creative_target_paragraphs: DEFAULT_TARGET_PARAGRAPHS,
        }
    }
}

impl TaskSettings {
    pub fn validate(&self) -> Result<()> {
        if self.creative_target_paragraphs == 0 {
            return Err(EngineError::InvalidConfig(
                "creative_target_paragraphs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A task ready to run: its adapter and the root content.
pub enum Task {
    Game24 {
        adapter: Game24Adapter,
        numbers: Numbers,
    },
    CreativeWriting {
        adapter: CreativeWritingAdapter,
        draft: Draft,
    },
}

impl Task {
    pub fn resolve(input: &TaskInput, oracle: Arc<dyn Oracle>, settings: &TaskSettings) -> Self {
        match input {
            TaskInput::Game24 { numbers } => Task::Game24 {
                adapter: Game24Adapter::new(oracle),
                numbers: Numbers::new(numbers.clone()),
            },
            TaskInput::CreativeWriting { sentences } => Task::CreativeWriting {
                adapter: CreativeWritingAdapter::new(oracle, settings.creative_target_paragraphs),
                draft: Draft::new(sentences.clone()),
            },
        }
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Task::Game24 { .. } => TaskKind::Game24,
            Task::CreativeWriting { .. } => TaskKind::CreativeWriting,
        }
    }

    pub async fn search(
        self,
        config: SearchConfig,
        emitter: &mut ProgressEmitter,
    ) -> Result<SearchReport> {
        match self {
            Task::Game24 { adapter, numbers } => {
                BeamSearch::new(&adapter, config).run(numbers, emitter).await
            }
            Task::CreativeWriting { adapter, draft } => {
                BeamSearch::new(&adapter, config).run(draft, emitter).await
            }
        }
    }
}
