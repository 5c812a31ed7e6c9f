//! # `induced-trees` - Largest Induced Subtrees of a Cubic Lattice
//!
//! Exhaustively searches a 3D grid graph for the largest vertex set whose
//! induced subgraph is a tree, rejecting trees that seal off an empty pocket of
//! space. The winning set, read as unit cubes glued face to face, is a polycube
//! with no cycles and no cavities.
//!
//! ## Architecture
//!
//! 1. **Lattice** ([`graph::Lattice`]): the grid graph, built once from its
//!    extents and optionally restricted to a starting shape. Shared read-only
//!    by every worker.
//! 2. **Subtree state** ([`subtree::Subtree`]): the induced set of one branch
//!    with incrementally maintained neighbour counts, so each growth step is
//!    validated locally in O(1).
//! 3. **Frontier** ([`collections::Frontier`]): the candidate list of a branch,
//!    an arena-backed linked list with O(1) removal by vertex id.
//! 4. **Search driver** ([`search::Search`]): depth-first growth with exact
//!    undo through an [`search::ActionLog`], fanning branches out to idle
//!    workers of a [`concurrency::WorkerPool`].
//! 5. **Enclosure check** ([`subtree::enclosure`]): flood fill from the
//!    bounding-box shell, run only on candidates that would beat the best.
//! 6. **I/O** ([`io`]): the text grid format and [`io::Publisher`] sinks for
//!    each new best.
//!
//! ## Invariants
//!
//! - A subtree only grows through vertices with ids above its root, so every
//!   tree is enumerated from exactly one root.
//! - Every frontier edit is logged and undone in reverse order; after a child
//!   is explored its parent's frontier is back in its original order.
//! - The best size only increases, and each increase is published exactly once
//!   while holding the best-result lock.
//!
//! ## Example
//!
//! ```rust
//! use induced_trees::graph::{Dimensions, Lattice};
//! use induced_trees::io::MemoryPublisher;
//! use induced_trees::search::{Search, SearchConfig};
//!
//! let lattice = Lattice::new(Dimensions::new(2, 2, 2).unwrap());
//! let search = Search::new(&lattice, SearchConfig::default(), MemoryPublisher::new()).unwrap();
//! let outcome = search.run().unwrap();
//!
//! assert_eq!(outcome.best_size(), 5);
//! assert!(!outcome.best.unwrap().has_enclosed_space());
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]

pub mod collections;
pub mod concurrency;
pub mod error;
pub mod graph;
pub mod io;
pub mod search;
pub mod subtree;

pub use collections::{Frontier, VertexSet};
pub use concurrency::WorkerPool;
pub use error::{Error, Result};
pub use graph::{Dimensions, Direction, Lattice, VertexId, EMPTY};
pub use io::{Publisher, ShapeFile};
pub use search::{search, Pruning, Search, SearchConfig, SearchOutcome, SearchSummary};
pub use subtree::{Shape, Subtree};

// Compile-time assertions for hot-path layouts
const _: () = {
    use core::mem;

    // Undo-log entries fit in twelve bytes.
    assert!(mem::size_of::<search::Action>() <= 12);

    // Six directional slots take 24 bytes per vertex.
    assert!(mem::size_of::<[VertexId; 6]>() == 24);

    // The sentinel is never a valid id.
    assert!(EMPTY == VertexId::MAX);
};
