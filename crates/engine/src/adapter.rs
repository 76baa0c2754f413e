use std::fmt::Debug;

use async_trait::async_trait;
use tot_core::{SearchState, Verdict};

use crate::error::Result;

/// A proposed derivation of a state.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<C> {
    /// Node label shown in the tree
    pub label: String,
    /// Entry appended to the derived state's path
    pub step: String,
    /// Content of the derived state
    pub content: C,
}

/// Task-specific policy plugged into the beam search.
///
/// `propose` and `evaluate` may consult the oracle and must validate what
/// it says before returning; the other methods are pure functions of the
/// state's content.
#[async_trait]
pub trait TaskAdapter: Send + Sync {
    type Content: Clone + Debug + Send + Sync;
    /// Frontier ranking; smaller sorts first and means closer to the goal.
    type Key: Ord + Clone + Debug + Send + Sync;

    fn name(&self) -> &'static str;

    fn root_label(&self, content: &Self::Content) -> String;

    /// True iff the state is a complete, correct solution.
    fn is_goal(&self, state: &SearchState<Self::Content>) -> bool;

    /// True iff expanding the state further is meaningful.
    fn is_expandable(&self, state: &SearchState<Self::Content>) -> bool;

    /// Up to five validated successors. Unusable oracle output yields an
    /// empty list; only a failed oracle call is an error.
    async fn propose(
        &self,
        state: &SearchState<Self::Content>,
    ) -> Result<Vec<Candidate<Self::Content>>>;

    async fn evaluate(&self, state: &SearchState<Self::Content>) -> Result<Verdict>;

    fn progress_key(&self, state: &SearchState<Self::Content>) -> Self::Key;

    fn render_solution(&self, state: &SearchState<Self::Content>) -> String {
        state.path.join("\n")
    }

    /// Text reported when the run ends with this state as best partial.
    fn render_partial(&self, state: &SearchState<Self::Content>) -> String {
        self.render_solution(state)
    }
}
