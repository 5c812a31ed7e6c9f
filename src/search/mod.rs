//! Parallel exhaustive search for the largest void-free induced subtree.
//!
//! # Algorithm
//!
//! Every enabled vertex is tried as the root of a subtree that may only grow
//! through vertices with larger ids, so each subtree is built from exactly one
//! root. From a root, the search repeatedly takes a candidate off the
//! [`Frontier`], tries to induce it, refreshes the frontier with [`update`],
//! explores the result, then undoes everything with [`restore`] and
//! [`Subtree::rem`](crate::subtree::Subtree::rem). Candidates already tried at
//! a depth are parked in a per-depth side list and swapped back afterwards, so
//! later siblings never revisit them and the parent's frontier comes back in
//! its original order.
//!
//! A subtree that cannot be grown any further is a leaf. Leaves larger than the
//! best known size are checked for enclosed voids and, if free of them, become
//! the new best through [`BestShape::offer`].
//!
//! # Parallelism
//!
//! Each root is one job on a [`WorkerPool`]. While exploring, a branch hands a
//! deep copy of itself to the pool whenever a worker looks idle, and recurses
//! inline otherwise. The lattice is shared read-only; the best-result cell is
//! the only shared mutable state. The search ends when the pool's scope drains.

pub mod action_log;
pub mod best;
pub mod branch;
pub mod stats;

pub use action_log::{Action, ActionLog};
pub use best::{BestShape, Offer};
pub use branch::{restore, update, Branch};
pub use stats::{SearchStats, StatsSnapshot};

use std::fs;
use std::mem;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::collections::Frontier;
use crate::concurrency::WorkerPool;
use crate::error::{Error, Result};
use crate::graph::{Dimensions, Lattice, VertexId};
use crate::io::Publisher;
use crate::subtree::Shape;

/// Child selection policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pruning {
    /// Explore every valid child. Exhaustive.
    #[default]
    None,
    /// Only explore children whose excluded-candidate count equals the minimum
    /// over all valid children at that depth. Faster, but may miss the optimum.
    MinExcluded,
}

/// Tunables for a [`Search`].
///
/// Deserializes from JSON; missing fields take their defaults.
///
/// ```
/// use induced_trees::search::{Pruning, SearchConfig};
///
/// let config = SearchConfig::from_json(r#"{ "threads": 2, "pruning": "min-excluded" }"#).unwrap();
/// assert_eq!(config.threads, 2);
/// assert_eq!(config.pruning, Pruning::MinExcluded);
/// assert_eq!(config.stack_size, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Worker threads. Defaults to the available hardware parallelism.
    pub threads: usize,
    /// Child selection policy.
    pub pruning: Pruning,
    /// Worker stack size in bytes; rayon's default if unset.
    pub stack_size: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            pruning: Pruning::None,
            stack_size: None,
        }
    }
}

impl SearchConfig {
    /// Decodes a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and decodes a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&text)
    }

    /// Sets the worker count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the child selection policy.
    pub fn with_pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }
}

/// Hardware parallelism, or one if it cannot be determined.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Result of a finished search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Extents of the searched lattice.
    pub dims: Dimensions,
    /// Largest void-free subtree found, if the lattice had any enabled vertex.
    pub best: Option<Shape>,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
    /// Worker threads used.
    pub threads: usize,
    /// Work counters.
    pub stats: StatsSnapshot,
}

impl SearchOutcome {
    /// Size of [`best`](Self::best), zero if there is none.
    pub fn best_size(&self) -> usize {
        self.best.as_ref().map_or(0, Shape::len)
    }

    /// Serializable summary of the run.
    pub fn summary(&self) -> SearchSummary {
        SearchSummary {
            dims: self.dims,
            best_size: self.best_size(),
            elapsed_secs: self.elapsed.as_secs_f64(),
            threads: self.threads,
            stats: self.stats,
        }
    }
}

/// Machine-readable run summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSummary {
    /// Extents of the searched lattice.
    pub dims: Dimensions,
    /// Size of the best shape.
    pub best_size: usize,
    /// Wall-clock seconds.
    pub elapsed_secs: f64,
    /// Worker threads used.
    pub threads: usize,
    /// Work counters.
    pub stats: StatsSnapshot,
}

/// A configured search over one lattice.
pub struct Search<'g, P> {
    lattice: &'g Lattice,
    config: SearchConfig,
    pool: WorkerPool,
    publisher: P,
}

impl<'g, P: Publisher> Search<'g, P> {
    /// Prepares a search and starts its worker pool.
    ///
    /// # Errors
    /// [`Error::ZeroThreads`] or [`Error::ThreadPool`] if the pool cannot be
    /// started.
    pub fn new(lattice: &'g Lattice, config: SearchConfig, publisher: P) -> Result<Self> {
        let pool = WorkerPool::with_stack_size(config.threads, config.stack_size)?;
        Ok(Self {
            lattice,
            config,
            pool,
            publisher,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The publisher receiving improvements.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Runs the search to exhaustion.
    ///
    /// # Errors
    /// The first publisher error. Once a publish fails no further branches are
    /// explored and the run winds down.
    pub fn run(&self) -> Result<SearchOutcome> {
        let started = Instant::now();
        let explorer = Explorer {
            lattice: self.lattice,
            pool: &self.pool,
            pruning: self.config.pruning,
            publisher: &self.publisher,
            best: BestShape::started_at(started),
            stats: SearchStats::default(),
            started,
        };

        info!(
            dims = %self.lattice.dims(),
            threads = self.pool.threads(),
            disabled = self.lattice.num_disabled(),
            pruning = ?self.config.pruning,
            "search started"
        );

        let ex = &explorer;
        self.pool.scope(|scope| {
            for root in ex.lattice.enabled_vertices() {
                ex.stats.root();
                ex.pool.submit(scope, move |s| ex.explore_root(s, root));
            }
        });

        let elapsed = started.elapsed();
        let Explorer { best, stats, .. } = explorer;
        let stats = stats.snapshot();
        let best = best.into_result()?;

        let outcome = SearchOutcome {
            dims: self.lattice.dims(),
            best,
            elapsed,
            threads: self.pool.threads(),
            stats,
        };
        info!(
            best_size = outcome.best_size(),
            elapsed_secs = elapsed.as_secs_f64(),
            leaves = stats.leaves,
            forks = stats.forks,
            "search finished"
        );
        Ok(outcome)
    }
}

/// Builds a [`Search`] and runs it.
pub fn search<P: Publisher>(
    lattice: &Lattice,
    config: SearchConfig,
    publisher: P,
) -> Result<SearchOutcome> {
    Search::new(lattice, config, publisher)?.run()
}

/// Shared state of one run.
struct Explorer<'a, P> {
    lattice: &'a Lattice,
    pool: &'a WorkerPool,
    pruning: Pruning,
    publisher: &'a P,
    best: BestShape,
    stats: SearchStats,
    started: Instant,
}

impl<P: Publisher> Explorer<'_, P> {
    fn explore_root<'s>(&'s self, scope: &rayon::Scope<'s>, root: VertexId) {
        if self.best.is_aborted() {
            return;
        }
        trace!(root, elapsed_secs = self.elapsed_secs(), "root started");
        let mut state = Branch::seed(self.lattice, root);
        self.branch(scope, &mut state);
        self.stats.absorb(state.visited, state.leaves);
        trace!(root, elapsed_secs = self.elapsed_secs(), "root finished");
    }

    /// Explores every extension of `state`, leaving it as it was found.
    fn branch<'s>(&'s self, scope: &rayon::Scope<'s>, state: &mut Branch) {
        state.visited += 1;
        if self.best.is_aborted() {
            return;
        }
        if state.frontier.is_empty() {
            self.leaf(state);
            return;
        }

        let depth = state.subtree.len();
        let mut tried = state.take_spare(depth);
        let target = match self.pruning {
            Pruning::None => None,
            Pruning::MinExcluded => Some(self.min_excluded(state, &mut tried)),
        };

        let mut extended = false;
        while let Some(x) = state.frontier.pop_front() {
            tried.push_back(x);
            if !state.advance(self.lattice, x) {
                continue;
            }
            extended = true;
            if target.map_or(true, |min| state.subtree.num_excluded() == min) {
                self.descend(scope, state);
            }
            state.retreat(self.lattice, x);
        }

        mem::swap(&mut state.frontier, &mut tried);
        state.put_spare(depth, tried);

        // Every candidate failed validation: nothing can be added here.
        if !extended {
            self.leaf(state);
        }
    }

    /// First pass of [`Pruning::MinExcluded`]: the smallest excluded count
    /// over all valid children, or `usize::MAX` if there are none. Leaves the
    /// frontier as it was and `tried` empty.
    fn min_excluded(&self, state: &mut Branch, tried: &mut Frontier) -> usize {
        let mut min = usize::MAX;
        while let Some(x) = state.frontier.pop_front() {
            tried.push_back(x);
            if state.advance(self.lattice, x) {
                min = min.min(state.subtree.num_excluded());
                state.retreat(self.lattice, x);
            }
        }
        mem::swap(&mut state.frontier, tried);
        min
    }

    /// Explores the child `state` currently holds, on an idle worker if there
    /// is one.
    fn descend<'s>(&'s self, scope: &rayon::Scope<'s>, state: &mut Branch) {
        if self.pool.idle() == 0 {
            self.branch(scope, state);
            return;
        }

        let mut child = state.fork();
        self.stats.fork();
        debug!(
            root = child.subtree.root(),
            size = child.subtree.len(),
            elapsed_secs = self.elapsed_secs(),
            "branch handed to idle worker"
        );
        self.pool.submit(scope, move |s| {
            self.branch(s, &mut child);
            self.stats.absorb(child.visited, child.leaves);
        });
    }

    fn leaf(&self, state: &mut Branch) {
        state.leaves += 1;
        if state.subtree.len() <= self.best.size() {
            return;
        }
        self.stats.candidate();
        let shape = state.subtree.to_shape(self.lattice);
        let enclosed = shape.has_enclosed_space();
        match self.best.offer(shape, enclosed, self.publisher) {
            Offer::Published => self.stats.published(),
            Offer::Enclosed => self.stats.enclosed(),
            Offer::Stale | Offer::Failed => {}
        }
    }

    fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{Discard, MemoryPublisher};

    fn lattice(x: u32, y: u32, z: u32) -> Lattice {
        Lattice::new(Dimensions::new(x, y, z).unwrap())
    }

    fn single_threaded() -> SearchConfig {
        SearchConfig::default().with_threads(1)
    }

    #[test]
    fn test_single_vertex() {
        let g = lattice(1, 1, 1);
        let outcome = search(&g, single_threaded(), Discard).unwrap();
        assert_eq!(outcome.best_size(), 1);
        assert_eq!(outcome.stats.roots, 1);
        assert_eq!(outcome.stats.leaves, 1);
    }

    #[test]
    fn test_cube_of_two() {
        let g = lattice(2, 2, 2);
        let sink = MemoryPublisher::new();
        let search = Search::new(&g, single_threaded(), sink).unwrap();
        let outcome = search.run().unwrap();
        assert_eq!(outcome.best_size(), 5);
        let best = outcome.best.as_ref().unwrap();
        assert!(!best.has_enclosed_space());
        assert_eq!(search.publisher().last().as_ref(), Some(best));
        assert_eq!(outcome.stats.forks, 0);
        assert_eq!(outcome.stats.enclosed, 0);
    }

    #[test]
    fn test_published_sizes_strictly_increase() {
        let g = lattice(3, 3, 1);
        let search = Search::new(&g, single_threaded(), MemoryPublisher::new()).unwrap();
        let outcome = search.run().unwrap();
        let sizes: Vec<_> = search.publisher().shapes().iter().map(Shape::len).collect();
        assert!(sizes.windows(2).all(|w| w[0] < w[1]), "{sizes:?}");
        assert_eq!(sizes.last().copied(), Some(outcome.best_size()));
        assert_eq!(outcome.stats.published as usize, sizes.len());
    }

    #[test]
    fn test_run_is_repeatable() {
        let g = lattice(3, 2, 2);
        let search = Search::new(&g, SearchConfig::default().with_threads(2), Discard).unwrap();
        let first = search.run().unwrap().best_size();
        let second = search.run().unwrap().best_size();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fully_disabled_lattice() {
        let mut g = lattice(2, 1, 1);
        g.disable(0);
        g.disable(1);
        let outcome = search(&g, single_threaded(), Discard).unwrap();
        assert_eq!(outcome.best, None);
        assert_eq!(outcome.best_size(), 0);
        assert_eq!(outcome.stats.roots, 0);
    }

    #[test]
    fn test_pruned_search_never_beats_exhaustive() {
        let g = lattice(3, 3, 2);
        let full = search(&g, single_threaded(), Discard).unwrap();
        let pruned = search(
            &g,
            single_threaded().with_pruning(Pruning::MinExcluded),
            Discard,
        )
        .unwrap();
        assert!(pruned.best_size() >= 1);
        assert!(pruned.best_size() <= full.best_size());
    }

    fn explorer<'a, P: Publisher>(
        g: &'a Lattice,
        pool: &'a WorkerPool,
        pruning: Pruning,
        publisher: &'a P,
    ) -> Explorer<'a, P> {
        let started = Instant::now();
        Explorer {
            lattice: g,
            pool,
            pruning,
            publisher,
            best: BestShape::started_at(started),
            stats: SearchStats::default(),
            started,
        }
    }

    /// Branch steps and leaves below `state`, recomputed on forked copies
    /// rather than by in-place undo.
    fn model_counts(g: &Lattice, state: &Branch, pruning: Pruning) -> (u64, u64) {
        let candidates: Vec<_> = state.frontier().iter().collect();
        let mut children = Vec::new();
        for (i, &x) in candidates.iter().enumerate() {
            let mut child = state.fork();
            for &tried in &candidates[..=i] {
                child.frontier.remove(tried);
            }
            if child.advance(g, x) {
                children.push(child);
            }
        }
        if children.is_empty() {
            return (1, 1);
        }
        let min = children
            .iter()
            .map(|c| c.subtree().num_excluded())
            .min()
            .unwrap_or(usize::MAX);
        children
            .iter()
            .filter(|c| pruning == Pruning::None || c.subtree().num_excluded() == min)
            .map(|c| model_counts(g, c, pruning))
            .fold((1, 0), |(b, l), (cb, cl)| (b + cb, l + cl))
    }

    #[test]
    fn test_blocked_candidates_make_a_leaf() {
        // A T around 4 in one layer; the only candidate left, 7, would fill
        // both axes at 4.
        let g = lattice(3, 3, 1);
        let mut state = Branch::seed(&g, 1);
        for v in [4, 3, 5] {
            assert!(state.frontier.remove(v));
            assert!(state.advance(&g, v));
        }
        for v in [6, 8] {
            assert!(state.frontier.remove(v));
        }
        assert_eq!(state.frontier().iter().collect::<Vec<_>>(), vec![7]);

        let pool = WorkerPool::new(1).unwrap();
        let sink = MemoryPublisher::new();
        let ex = explorer(&g, &pool, Pruning::None, &sink);
        pool.scope(|s| ex.branch(s, &mut state));

        assert_eq!(state.leaves, 1);
        assert_eq!(state.frontier().iter().collect::<Vec<_>>(), vec![7]);
        assert_eq!(state.subtree().len(), 4);
        let published = sink.last().unwrap();
        assert_eq!(published.iter().collect::<Vec<_>>(), vec![1, 3, 4, 5]);
        assert_eq!(ex.stats.snapshot().published, 1);
        assert_eq!(ex.best.size(), 4);
    }

    #[test]
    fn test_min_excluded_leaves_frontier_in_place() {
        let g = lattice(3, 3, 2);
        let mut state = Branch::seed(&g, 0);
        assert!(state.frontier.remove(9));
        assert!(state.advance(&g, 9));
        let before: Vec<_> = state.frontier().iter().collect();
        assert_eq!(before, vec![12, 10, 3, 1]);

        let pool = WorkerPool::new(1).unwrap();
        let sink = Discard;
        let ex = explorer(&g, &pool, Pruning::MinExcluded, &sink);
        let mut tried = Frontier::new();
        // Children 12 and 10 each cut off a queued candidate; 3 and 1 do not.
        assert_eq!(ex.min_excluded(&mut state, &mut tried), 0);
        assert_eq!(state.frontier().iter().collect::<Vec<_>>(), before);
        assert!(tried.is_empty());
        assert_eq!(state.subtree().len(), 2);
        assert_eq!(state.subtree().num_excluded(), 0);
    }

    #[test]
    fn test_min_excluded_without_valid_children() {
        let g = lattice(3, 3, 1);
        let mut state = Branch::seed(&g, 1);
        for v in [4, 3, 5] {
            assert!(state.frontier.remove(v));
            assert!(state.advance(&g, v));
        }
        for v in [6, 8] {
            assert!(state.frontier.remove(v));
        }

        let pool = WorkerPool::new(1).unwrap();
        let sink = Discard;
        let ex = explorer(&g, &pool, Pruning::MinExcluded, &sink);
        let mut tried = Frontier::new();
        assert_eq!(ex.min_excluded(&mut state, &mut tried), usize::MAX);
        assert_eq!(state.frontier().iter().collect::<Vec<_>>(), vec![7]);
        assert!(tried.is_empty());
    }

    #[test]
    fn test_pruning_descends_only_into_min_excluded_children() {
        let g = lattice(3, 3, 2);
        let count = |pruning: Pruning| {
            g.enabled_vertices()
                .map(|root| model_counts(&g, &Branch::seed(&g, root), pruning))
                .fold((0, 0), |(b, l), (rb, rl)| (b + rb, l + rl))
        };
        let full = count(Pruning::None);
        let pruned = count(Pruning::MinExcluded);
        assert!(pruned.0 < full.0, "pruned {pruned:?} vs full {full:?}");

        for (pruning, (branches, leaves)) in [(Pruning::None, full), (Pruning::MinExcluded, pruned)] {
            let outcome = search(&g, single_threaded().with_pruning(pruning), Discard).unwrap();
            assert_eq!(outcome.stats.branches, branches, "{pruning:?}");
            assert_eq!(outcome.stats.leaves, leaves, "{pruning:?}");
        }
    }

    #[test]
    fn test_publish_failure_is_returned() {
        let g = lattice(2, 2, 2);
        let failing = |_: &Shape| -> Result<()> {
            Err(Error::io(
                "/nonexistent/out.txt",
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
            ))
        };
        let err = search(&g, single_threaded(), failing).unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "{err}");
    }

    #[test]
    fn test_zero_threads_rejected() {
        let g = lattice(2, 2, 2);
        let err = Search::new(&g, SearchConfig::default().with_threads(0), Discard).err();
        assert!(matches!(err, Some(Error::ZeroThreads)));
    }

    #[test]
    fn test_config_defaults_and_unknown_fields() {
        let config = SearchConfig::from_json("{}").unwrap();
        assert_eq!(config, SearchConfig::default());
        assert!(config.threads >= 1);
        assert!(matches!(
            SearchConfig::from_json(r#"{ "thread": 4 }"#),
            Err(Error::Config(_))
        ));
        assert!(SearchConfig::from_json(r#"{ "pruning": "sometimes" }"#).is_err());
    }

    #[test]
    fn test_summary_serializes() {
        let g = lattice(2, 2, 1);
        let outcome = search(&g, single_threaded(), Discard).unwrap();
        let json = serde_json::to_value(outcome.summary()).unwrap();
        assert_eq!(json["best_size"], 3);
        assert_eq!(json["dims"]["x"], 2);
        assert_eq!(json["stats"]["roots"], 4);
    }
}
