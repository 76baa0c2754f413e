//! Paragraph-by-paragraph story continuation.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use oracle::{AskParams, Oracle};
use tot_core::{SearchState, Verdict};
use tracing::debug;

use crate::adapter::{Candidate, TaskAdapter};
use crate::error::Result;
use crate::prompts;
use crate::validator::{parse_paragraph_steps, parse_verdict};

pub const DEFAULT_TARGET_PARAGRAPHS: usize = 3;
const LABEL_CHARS: usize = 60;

const PROPOSE_PARAMS: AskParams = AskParams::new(0.9, 400);
const EVALUATE_PARAMS: AskParams = AskParams::new(0.2, 20);

/// Seed sentences plus the paragraphs written so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub seeds: Arc<[String]>,
    pub paragraphs: Vec<String>,
}

impl Draft {
    pub fn new(seeds: Vec<String>) -> Self {
        Self {
            seeds: seeds.into(),
            paragraphs: Vec::new(),
        }
    }

    pub fn with_paragraph(&self, paragraph: impl Into<String>) -> Self {
        let mut paragraphs = self.paragraphs.clone();
        paragraphs.push(paragraph.into());
        Self {
            seeds: Arc::clone(&self.seeds),
            paragraphs,
        }
    }
}

fn label_for(paragraph: &str) -> String {
    let mut chars = paragraph.chars();
    let head: String = chars.by_ref().take(LABEL_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

pub struct CreativeWritingAdapter {
    oracle: Arc<dyn Oracle>,
    target_paragraphs: usize,
}

impl CreativeWritingAdapter {
    pub fn new(oracle: Arc<dyn Oracle>, target_paragraphs: usize) -> Self {
        Self {
            oracle,
            target_paragraphs,
        }
    }

    pub fn target_paragraphs(&self) -> usize {
        self.target_paragraphs
    }
}

#[async_trait]
impl TaskAdapter for CreativeWritingAdapter {
    type Content = Draft;
    type Key = Reverse<usize>;

    fn name(&self) -> &'static str {
        "creativeWriting"
    }

    fn root_label(&self, content: &Draft) -> String {
        format!("{} seed sentences", content.seeds.len())
    }

    fn is_goal(&self, state: &SearchState<Draft>) -> bool {
        state.content.paragraphs.len() >= self.target_paragraphs
    }

    fn is_expandable(&self, state: &SearchState<Draft>) -> bool {
        state.content.paragraphs.len() < self.target_paragraphs
    }

    async fn propose(&self, state: &SearchState<Draft>) -> Result<Vec<Candidate<Draft>>> {
        let draft = &state.content;
        let prompt = prompts::creative_propose(&draft.seeds, &draft.paragraphs);
        let answer = self.oracle.ask(&prompt, PROPOSE_PARAMS).await?;

        let next = draft.paragraphs.len() + 1;
        let candidates: Vec<_> = parse_paragraph_steps(&answer)
            .into_iter()
            .map(|step| {
                let paragraph = step.content.trim();
                Candidate {
                    label: label_for(paragraph),
                    step: format!("P{next}"),
                    content: draft.with_paragraph(paragraph),
                }
            })
            .collect();

        debug!(
            node_id = state.id,
            candidates = candidates.len(),
            "Parsed paragraph proposals"
        );
        Ok(candidates)
    }

    async fn evaluate(&self, state: &SearchState<Draft>) -> Result<Verdict> {
        let draft = &state.content;
        if draft.paragraphs.len() >= self.target_paragraphs {
            let complete = draft.paragraphs.iter().all(|p| !p.trim().is_empty());
            return Ok(if complete {
                Verdict::Sure
            } else {
                Verdict::Impossible
            });
        }

        let prompt = prompts::creative_evaluate(&draft.seeds, &draft.paragraphs);
        let answer = self.oracle.ask(&prompt, EVALUATE_PARAMS).await?;
        Ok(parse_verdict(&answer))
    }

    fn progress_key(&self, state: &SearchState<Draft>) -> Reverse<usize> {
        Reverse(state.content.paragraphs.len())
    }

    fn render_solution(&self, state: &SearchState<Draft>) -> String {
        state.content.paragraphs.join("\n\n")
    }

    fn render_partial(&self, state: &SearchState<Draft>) -> String {
        format!(
            "{}\n\n(best partial → {} paragraphs)",
            self.render_solution(state),
            state.content.paragraphs.len()
        )
    }
}
