use std::sync::Arc;

use events::{Event, EventStream, ProgressEmitter, DEFAULT_CAPACITY};
use oracle::Oracle;
use tot_core::{RunResult, TaskInput};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::search::SearchConfig;
use crate::tasks::{Task, TaskSettings};

/// Runs validated task inputs end to end: `init`, the search itself, and
/// exactly one terminal event while an observer is listening.
pub struct SearchService {
    oracle: Arc<dyn Oracle>,
    config: SearchConfig,
    settings: TaskSettings,
}

impl SearchService {
    pub fn new(oracle: Arc<dyn Oracle>, config: SearchConfig, settings: TaskSettings) -> Result<Self> {
        config.validate()?;
        settings.validate()?;
        Ok(Self {
            oracle,
            config,
            settings,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn settings(&self) -> &TaskSettings {
        &self.settings
    }

    /// Start a run on the runtime and hand back its event stream. Dropping
    /// the stream cancels the run at its next safe point.
    pub fn spawn(self: &Arc<Self>, input: TaskInput) -> EventStream {
        let (mut emitter, stream) = ProgressEmitter::channel(DEFAULT_CAPACITY);
        let service = Arc::clone(self);
        tokio::spawn(async move {
            // the outcome reaches the observer through the emitter
            let _ = service.run(&input, &mut emitter).await;
        });
        stream
    }

    /// Run without an observer and return the result.
    pub async fn run_detached(&self, input: &TaskInput) -> Result<RunResult> {
        let mut emitter = ProgressEmitter::detached();
        self.run(input, &mut emitter).await
    }

    pub async fn run(&self, input: &TaskInput, emitter: &mut ProgressEmitter) -> Result<RunResult> {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", %run_id, task = %input.kind());
        self.run_in_span(input, emitter).instrument(span).await
    }

    async fn run_in_span(
        &self,
        input: &TaskInput,
        emitter: &mut ProgressEmitter,
    ) -> Result<RunResult> {
        info!(
            beam_width = self.config.beam_width,
            max_depth = self.config.max_depth,
            "Run started"
        );

        emitter
            .emit(Event::Init {
                task: input.kind(),
                payload: input.payload(),
            })
            .await?;

        let task = Task::resolve(input, Arc::clone(&self.oracle), &self.settings);
        match task.search(self.config, emitter).await {
            Ok(report) => {
                let result = RunResult::from(&report.outcome);
                emitter
                    .emit(Event::Solution {
                        result: result.clone(),
                    })
                    .await?;
                info!(
                    success = result.success,
                    partial = result.partial,
                    steps = result.steps,
                    rounds = report.stats.rounds,
                    "Run completed"
                );
                Ok(result)
            }
            Err(EngineError::Cancelled) => {
                debug!("Observer disconnected, run cancelled");
                Err(EngineError::Cancelled)
            }
            Err(err) => {
                match &err {
                    EngineError::Oracle(e) => warn!(error = %e, "Run aborted by oracle failure"),
                    other => error!(error = %other, "Run failed"),
                }
                if let Err(e) = emitter.emit(Event::error(err.public_message())).await {
                    debug!(error = %e, "Could not deliver error event");
                }
                Err(err)
            }
        }
    }
}
