//! Concurrency support for the search driver.
//!
//! The search is embarrassingly parallel by branch: each job owns its whole
//! branch state, so the only shared mutable data are the pool's own counters
//! and the best-result cell in [`crate::search`].

pub mod pool;

pub use pool::WorkerPool;
