//! Error types for configuration and I/O failures.
//!
//! Steady-state search has no recoverable errors. Everything here is raised
//! either before the search starts (bad dimensions, malformed grid files, pool
//! construction) or by the rare best-result write, which aborts the run.
//! Broken internal invariants are not represented here; they panic.

use std::io;
use std::path::PathBuf;

/// Errors reported by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Lattice extents that are zero or too large to index with a `VertexId`.
    #[error("invalid lattice dimensions {x}x{y}x{z}: each extent must be >= 1 and the cell count must fit in u32")]
    InvalidDimensions {
        /// Extent along x.
        x: u64,
        /// Extent along y.
        y: u64,
        /// Extent along z.
        z: u64,
    },

    /// A dimensions string that is not of the form `XxYxZ`.
    #[error("cannot parse dimensions {0:?}: expected XxYxZ, e.g. 3x3x3")]
    DimensionsSyntax(String),

    /// A malformed shape grid.
    #[error("grid line {line}: {reason}")]
    Grid {
        /// 1-based line number of the offending line (0 when the file as a whole is wrong).
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: io::Error,
    },

    /// A JSON configuration file could not be decoded.
    #[error("invalid search configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The worker pool was configured with zero threads.
    #[error("worker pool needs at least one thread")]
    ZeroThreads,

    /// The rayon pool could not be started.
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub(crate) fn grid(line: usize, reason: impl Into<String>) -> Self {
        Error::Grid {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;
