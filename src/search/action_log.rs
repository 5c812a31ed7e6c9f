//! Undo log for frontier edits.
//!
//! Every frontier change made while extending a branch is recorded here so it
//! can be reverted exactly, in reverse order, when the branch backtracks. A
//! [`Action::Barrier`] separates the edits of one depth from the next.

use crate::graph::VertexId;

/// One reversible frontier edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// The vertex was pushed onto the frontier.
    Add(VertexId),
    /// The vertex was removed from the frontier.
    Remove {
        /// The removed id.
        vertex: VertexId,
        /// The id that followed it, or [`EMPTY`](crate::graph::EMPTY) if it
        /// was last.
        next: VertexId,
    },
    /// Start of one depth's edits.
    Barrier,
}

/// A stack of [`Action`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionLog {
    actions: Vec<Action>,
}

impl ActionLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty log with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            actions: Vec::with_capacity(capacity),
        }
    }

    /// Opens a new depth.
    #[inline]
    pub fn barrier(&mut self) {
        self.actions.push(Action::Barrier);
    }

    /// Records an edit.
    #[inline]
    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Removes and returns the most recent entry.
    #[inline]
    pub fn pop(&mut self) -> Option<Action> {
        self.actions.pop()
    }

    /// Number of entries, barriers included.
    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the log holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of open depths.
    pub fn depth(&self) -> usize {
        self.actions.iter().filter(|a| **a == Action::Barrier).count()
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Action> + '_ {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_order() {
        let mut log = ActionLog::new();
        log.barrier();
        log.push(Action::Add(4));
        log.push(Action::Remove { vertex: 2, next: 7 });
        assert_eq!(log.len(), 3);
        assert_eq!(log.depth(), 1);
        assert_eq!(log.pop(), Some(Action::Remove { vertex: 2, next: 7 }));
        assert_eq!(log.pop(), Some(Action::Add(4)));
        assert_eq!(log.pop(), Some(Action::Barrier));
        assert_eq!(log.pop(), None);
        assert!(log.is_empty());
    }
}
