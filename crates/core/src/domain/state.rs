use serde::{Deserialize, Serialize};

/// Identifier of a node in one run's search tree.
pub type StateId = u64;

/// One node of the search tree.
///
/// States are never mutated after creation; [`SearchState::derive`] produces
/// the child with the next id, one more unit of depth and one more path step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchState<C> {
    pub id: StateId,
    pub parent_id: Option<StateId>,
    pub content: C,
    pub path: Vec<String>,
    pub depth: usize,
}

impl<C> SearchState<C> {
    pub fn root(id: StateId, content: C) -> Self {
        Self {
            id,
            parent_id: None,
            content,
            path: Vec::new(),
            depth: 0,
        }
    }

    pub fn derive(&self, id: StateId, step: impl Into<String>, content: C) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend(self.path.iter().cloned());
        path.push(step.into());

        Self {
            id,
            parent_id: Some(self.id),
            content,
            path,
            depth: self.depth + 1,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Number of derivation steps from the root.
    pub fn steps(&self) -> usize {
        self.path.len()
    }
}

/// Run-scoped id allocator. Ids start at 0 and increase by one per state.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: StateId,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> StateId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}
