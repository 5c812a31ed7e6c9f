//! Search counters.

use core::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters shared by every worker of one search. All updates are relaxed;
/// only the final snapshot, taken after the pool has drained, is exact.
///
/// Branch and leaf counts are kept per job and added once the job finishes.
#[derive(Debug, Default)]
pub struct SearchStats {
    roots: AtomicU64,
    branches: AtomicU64,
    leaves: AtomicU64,
    forks: AtomicU64,
    candidates: AtomicU64,
    enclosed: AtomicU64,
    published: AtomicU64,
}

/// Point-in-time copy of [`SearchStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Root vertices searched.
    pub roots: u64,
    /// Calls to the branch step.
    pub branches: u64,
    /// Maximal subtrees reached.
    pub leaves: u64,
    /// Branches handed to idle workers.
    pub forks: u64,
    /// Maximal subtrees larger than the best known size at the time.
    pub candidates: u64,
    /// Candidates rejected for enclosing a void.
    pub enclosed: u64,
    /// Improvements published.
    pub published: u64,
}

impl SearchStats {
    #[inline]
    pub(crate) fn root(&self) {
        self.roots.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds one job's locally counted work.
    pub(crate) fn absorb(&self, branches: u64, leaves: u64) {
        self.branches.fetch_add(branches, Ordering::Relaxed);
        self.leaves.fetch_add(leaves, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn fork(&self) {
        self.forks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn candidate(&self) {
        self.candidates.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn enclosed(&self) {
        self.enclosed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            roots: self.roots.load(Ordering::Relaxed),
            branches: self.branches.load(Ordering::Relaxed),
            leaves: self.leaves.load(Ordering::Relaxed),
            forks: self.forks.load(Ordering::Relaxed),
            candidates: self.candidates.load(Ordering::Relaxed),
            enclosed: self.enclosed.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
        }
    }
}
