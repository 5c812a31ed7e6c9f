//! Per-branch search state and the frontier maintenance step.
//!
//! A [`Branch`] owns everything one line of the search mutates: the induced
//! set, the candidate frontier and the undo log. It is a plain value. Handing
//! work to another thread means forking it, never sharing it.

use std::mem;

use crate::collections::Frontier;
use crate::graph::{Lattice, VertexId, EMPTY};
use crate::subtree::Subtree;

use super::action_log::{Action, ActionLog};

/// State of one search branch.
#[derive(Debug)]
pub struct Branch {
    pub(crate) subtree: Subtree,
    pub(crate) frontier: Frontier,
    pub(crate) log: ActionLog,
    /// Per-depth scratch lists for candidates already tried at that depth.
    spares: Vec<Frontier>,
    /// Branch steps taken by this value since it was seeded or forked.
    pub(crate) visited: u64,
    /// Leaves reached by this value since it was seeded or forked.
    pub(crate) leaves: u64,
}

impl Branch {
    /// Starts a branch at `root`: the subtree holds only `root` and the
    /// frontier holds its neighbours with larger ids.
    pub fn seed(lattice: &Lattice, root: VertexId) -> Self {
        let mut branch = Self {
            subtree: Subtree::new(lattice, root),
            frontier: Frontier::with_universe(lattice.len()),
            log: ActionLog::with_capacity(64),
            spares: Vec::new(),
            visited: 0,
            leaves: 0,
        };
        branch.log.barrier();
        update(
            lattice,
            &mut branch.subtree,
            &mut branch.frontier,
            root,
            &mut branch.log,
        );
        branch
    }

    /// The induced set.
    #[inline]
    pub fn subtree(&self) -> &Subtree {
        &self.subtree
    }

    /// Current candidates, front first.
    #[inline]
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Undo log.
    #[inline]
    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Deep copy for handoff to another worker. Scratch lists and counters are
    /// not copied.
    pub fn fork(&self) -> Self {
        Self {
            subtree: self.subtree.clone(),
            frontier: self.frontier.clone(),
            log: self.log.clone(),
            spares: Vec::new(),
            visited: 0,
            leaves: 0,
        }
    }

    /// Tries to induce `v` and, on success, opens a depth and refreshes the
    /// frontier. Returns whether `v` was added.
    pub fn advance(&mut self, lattice: &Lattice, v: VertexId) -> bool {
        if !self.subtree.add(lattice, v) {
            return false;
        }
        self.log.barrier();
        update(lattice, &mut self.subtree, &mut self.frontier, v, &mut self.log);
        true
    }

    /// Reverts the most recent successful [`advance`](Self::advance) of `v`.
    pub fn retreat(&mut self, lattice: &Lattice, v: VertexId) {
        restore(&mut self.subtree, &mut self.frontier, &mut self.log);
        self.subtree.rem(lattice, v);
    }

    /// Takes the scratch list for `depth`, leaving an empty one behind.
    pub(crate) fn take_spare(&mut self, depth: usize) -> Frontier {
        self.spares.get_mut(depth).map(mem::take).unwrap_or_default()
    }

    /// Returns a scratch list taken with [`take_spare`](Self::take_spare).
    pub(crate) fn put_spare(&mut self, depth: usize, spare: Frontier) {
        debug_assert!(spare.is_empty(), "scratch list returned non-empty");
        if self.spares.len() <= depth {
            self.spares.resize_with(depth + 1, Frontier::new);
        }
        self.spares[depth] = spare;
    }
}

impl Clone for Branch {
    fn clone(&self) -> Self {
        self.fork()
    }
}

/// Refreshes `frontier` after `added` was induced.
///
/// Each neighbour `y` of `added` is handled in neighbour order:
/// - if its degree is now above one, adding it would close a cycle, so it is
///   removed from the frontier (if there) and counted as excluded, with its
///   successor logged so [`restore`] can put it back in place;
/// - otherwise, if `y` is above the root, not induced and not yet a candidate,
///   it is pushed to the front.
///
/// Every change is logged so [`restore`] can undo it.
pub fn update(
    lattice: &Lattice,
    subtree: &mut Subtree,
    frontier: &mut Frontier,
    added: VertexId,
    log: &mut ActionLog,
) {
    for &y in lattice.neighbors(added) {
        if subtree.degree(y) > 1 {
            if frontier.contains(y) {
                let next = frontier.successor(y).unwrap_or(EMPTY);
                frontier.remove(y);
                log.push(Action::Remove { vertex: y, next });
                subtree.note_excluded();
            }
        } else if y > subtree.root() && !subtree.contains(y) && !frontier.contains(y) {
            frontier.push_front(y);
            log.push(Action::Add(y));
        }
    }
}

/// Undoes log entries back to and including the most recent barrier.
///
/// Entries are undone newest first, so a removed candidate's logged successor
/// is back in the frontier when it is reinserted, and the frontier regains
/// its exact prior order.
///
/// # Panics
/// Panics if the log runs out before a barrier, or if a logged addition is no
/// longer in the frontier.
pub fn restore(subtree: &mut Subtree, frontier: &mut Frontier, log: &mut ActionLog) {
    loop {
        match log.pop() {
            Some(Action::Barrier) => return,
            Some(Action::Add(v)) => {
                let removed = frontier.remove(v);
                assert!(removed, "logged candidate {v} missing from frontier on restore");
            }
            Some(Action::Remove { vertex, next }) => {
                frontier.insert_before(vertex, next);
                subtree.note_readmitted();
            }
            None => panic!("restore ran past the start of the action log: missing barrier"),
        }
    }
}
