use std::collections::VecDeque;

use tot_core::SearchState;

/// Unexpanded states awaiting a round, each carrying its progress key.
#[derive(Debug)]
pub struct Frontier<C, K> {
    entries: VecDeque<(K, SearchState<C>)>,
}

impl<C, K: Ord> Frontier<C, K> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, key: K, state: SearchState<C>) {
        self.entries.push_back((key, state));
    }

    /// Remove and return up to `width` states from the front.
    pub fn take_front(&mut self, width: usize) -> Vec<SearchState<C>> {
        let count = width.min(self.entries.len());
        self.entries.drain(..count).map(|(_, state)| state).collect()
    }

    /// Stable sort, best key first; ties keep insertion order.
    pub fn sort(&mut self) {
        self.entries
            .make_contiguous()
            .sort_by(|(a, _), (b, _)| a.cmp(b));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<C, K: Ord> Default for Frontier<C, K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Best `sure`-graded state seen so far.
#[derive(Debug)]
pub struct BestPartial<C, K> {
    best: Option<(K, SearchState<C>)>,
}

impl<C, K: Ord> BestPartial<C, K> {
    pub fn new() -> Self {
        Self { best: None }
    }

    /// Keep `state` if its key is strictly better than the current one.
    /// Returns whether it was kept.
    pub fn offer(&mut self, key: K, state: SearchState<C>) -> bool {
        let better = match &self.best {
            Some((current, _)) => key < *current,
            None => true,
        };
        if better {
            self.best = Some((key, state));
        }
        better
    }

    pub fn get(&self) -> Option<&SearchState<C>> {
        self.best.as_ref().map(|(_, state)| state)
    }

    pub fn into_inner(self) -> Option<SearchState<C>> {
        self.best.map(|(_, state)| state)
    }
}

impl<C, K: Ord> Default for BestPartial<C, K> {
    fn default() -> Self {
        Self::new()
    }
}
