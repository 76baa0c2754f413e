//! Generic beam search over a [`TaskAdapter`].
//!
//! A run proceeds in rounds. Each round takes up to `beam_width` states from
//! the front of the frontier and, in order, either finishes on a goal state,
//! skips states that are too deep or not expandable, or expands them:
//! every proposed candidate becomes a new node, is evaluated, and is either
//! pruned (`impossible`) or appended to the frontier. The frontier is sorted
//! by progress key once at the end of each round.
//!
//! Every step is reported through the run's [`ProgressEmitter`] in the order
//! it happens, so an observer can rebuild the tree incrementally.

use events::{Event, ProgressEmitter};
use serde::{Deserialize, Serialize};
use tot_core::{IdGenerator, SearchOutcome, SearchState, Verdict};
use tracing::{debug, info};

use crate::adapter::TaskAdapter;
use crate::error::{EngineError, Result};
use crate::frontier::{BestPartial, Frontier};
use crate::phase::{RunPhase, RunStateMachine};

pub const DEFAULT_BEAM_WIDTH: usize = 5;
pub const DEFAULT_MAX_DEPTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// States expanded per round
    pub beam_width: usize,
    /// States at this depth are never expanded
    pub max_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            beam_width: DEFAULT_BEAM_WIDTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.beam_width == 0 {
            return Err(EngineError::InvalidConfig(
                "beam_width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Counters collected over one run, for logs and callers that want them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub rounds: u32,
    pub states_created: u64,
    pub expansions: usize,
    pub pruned: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

/// Everything one run owns. Dropped when the run ends, whatever the outcome.
struct RunContext<A: TaskAdapter> {
    ids: IdGenerator,
    frontier: Frontier<A::Content, A::Key>,
    best: BestPartial<A::Content, A::Key>,
    round: u32,
    phase: RunPhase,
    stats: SearchStats,
}

impl<A: TaskAdapter> RunContext<A> {
    fn new() -> Self {
        Self {
            ids: IdGenerator::new(),
            frontier: Frontier::new(),
            best: BestPartial::new(),
            round: 0,
            phase: RunPhase::Idle,
            stats: SearchStats::default(),
        }
    }

    fn transition(&mut self, to: RunPhase) -> Result<()> {
        RunStateMachine::validate_transition(&self.phase, &to)?;
        debug!(from = %self.phase, to = %to, "Run phase transition");
        self.phase = to;
        Ok(())
    }

    fn next_round(&mut self) -> u32 {
        self.round += 1;
        self.stats.rounds = self.round;
        self.round
    }
}

pub struct BeamSearch<'a, A> {
    adapter: &'a A,
    config: SearchConfig,
}

impl<'a, A: TaskAdapter> BeamSearch<'a, A> {
    pub fn new(adapter: &'a A, config: SearchConfig) -> Self {
        Self { adapter, config }
    }

    /// Search from `initial`. Emits every non-terminal event of the run;
    /// the terminal `solution` or `error` event is the caller's to send.
    pub async fn run(
        &self,
        initial: A::Content,
        emitter: &mut ProgressEmitter,
    ) -> Result<SearchReport> {
        self.config.validate()?;

        let mut ctx = RunContext::<A>::new();
        ctx.transition(RunPhase::Running)?;

        match self.search(&mut ctx, initial, emitter).await {
            Ok(outcome) => {
                let phase = match &outcome {
                    SearchOutcome::Success { .. } => RunPhase::Solved,
                    SearchOutcome::Partial { .. } => RunPhase::PartialFound,
                    SearchOutcome::Exhausted => RunPhase::Exhausted,
                };
                ctx.transition(phase)?;
                ctx.stats.states_created = ctx.ids.issued();

                info!(
                    task = self.adapter.name(),
                    phase = %ctx.phase,
                    rounds = ctx.stats.rounds,
                    states = ctx.stats.states_created,
                    steps = outcome.steps(),
                    "Search finished"
                );
                Ok(SearchReport {
                    outcome,
                    stats: ctx.stats,
                })
            }
            Err(err) => {
                ctx.transition(RunPhase::Errored)?;
                debug!(
                    discarded = ctx.frontier.len(),
                    "Discarding frontier of failed run"
                );
                ctx.frontier.clear();
                Err(err)
            }
        }
    }

    async fn search(
        &self,
        ctx: &mut RunContext<A>,
        initial: A::Content,
        emitter: &mut ProgressEmitter,
    ) -> Result<SearchOutcome> {
        let adapter = self.adapter;

        let root = SearchState::root(ctx.ids.next_id(), initial);
        emitter
            .emit(Event::Node {
                id: root.id,
                parent_id: None,
                label: adapter.root_label(&root.content),
                depth: root.depth,
            })
            .await?;
        ctx.frontier.push(adapter.progress_key(&root), root);

        while !ctx.frontier.is_empty() {
            let working = ctx.frontier.take_front(self.config.beam_width);
            let round = ctx.next_round();
            emitter.emit(Event::Round { round }).await?;
            info!(
                round,
                working = working.len(),
                queued = ctx.frontier.len(),
                "Starting round"
            );

            for state in working {
                if adapter.is_goal(&state) {
                    info!(node_id = state.id, depth = state.depth, "Goal reached");
                    return Ok(SearchOutcome::Success {
                        solution: adapter.render_solution(&state),
                        steps: state.steps(),
                        path: state.path,
                    });
                }

                if state.depth >= self.config.max_depth || !adapter.is_expandable(&state) {
                    debug!(node_id = state.id, depth = state.depth, "Skipping state");
                    continue;
                }

                self.expand(ctx, &state, emitter).await?;
            }

            ctx.frontier.sort();
        }

        Ok(match std::mem::take(&mut ctx.best).into_inner() {
            Some(state) => SearchOutcome::Partial {
                solution: adapter.render_partial(&state),
                steps: state.steps(),
                path: state.path,
            },
            None => SearchOutcome::Exhausted,
        })
    }

    async fn expand(
        &self,
        ctx: &mut RunContext<A>,
        state: &SearchState<A::Content>,
        emitter: &mut ProgressEmitter,
    ) -> Result<()> {
        let adapter = self.adapter;

        ensure_observed(emitter)?;
        let candidates = adapter.propose(state).await?;
        ctx.stats.expansions += 1;
        debug!(
            node_id = state.id,
            depth = state.depth,
            candidates = candidates.len(),
            "Expanded state"
        );

        for candidate in candidates {
            let child = state.derive(ctx.ids.next_id(), candidate.step, candidate.content);
            emitter
                .emit(Event::Node {
                    id: child.id,
                    parent_id: child.parent_id,
                    label: candidate.label,
                    depth: child.depth,
                })
                .await?;

            ensure_observed(emitter)?;
            let verdict = adapter.evaluate(&child).await?;
            emitter
                .emit(Event::Evaluate {
                    node_id: child.id,
                    verdict,
                })
                .await?;
            debug!(node_id = child.id, verdict = %verdict, "Evaluated candidate");

            if verdict == Verdict::Impossible {
                emitter.emit(Event::Prune { node_id: child.id }).await?;
                ctx.stats.pruned += 1;
                continue;
            }

            let key = adapter.progress_key(&child);
            // only sure verdicts compete for best partial
            if verdict == Verdict::Sure && ctx.best.offer(key.clone(), child.clone()) {
                debug!(node_id = child.id, key = ?key, "New best partial");
            }
            ctx.frontier.push(key, child);
        }

        Ok(())
    }
}

fn ensure_observed(emitter: &ProgressEmitter) -> Result<()> {
    if emitter.is_closed() {
        return Err(EngineError::Cancelled);
    }
    Ok(())
}
