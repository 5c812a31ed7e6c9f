//! Destinations for improved results.
//!
//! The search calls [`Publisher::publish`] while holding the best-result lock,
//! once per strict improvement, so implementations see a strictly increasing
//! sequence of shape sizes and never run concurrently with each other.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::Result;
use crate::subtree::Shape;

use super::grid;

/// Receives each new best shape.
pub trait Publisher: Sync {
    /// Persists `shape`. An error aborts the search.
    fn publish(&self, shape: &Shape) -> Result<()>;
}

impl<F> Publisher for F
where
    F: Fn(&Shape) -> Result<()> + Sync,
{
    fn publish(&self, shape: &Shape) -> Result<()> {
        self(shape)
    }
}

/// Rewrites a grid file on every improvement.
#[derive(Debug, Clone)]
pub struct ShapeFile {
    path: PathBuf,
}

impl ShapeFile {
    /// Publishes to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The output path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Publisher for ShapeFile {
    fn publish(&self, shape: &Shape) -> Result<()> {
        grid::write_shape(&self.path, shape)
    }
}

/// Drops every result.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Publisher for Discard {
    fn publish(&self, _shape: &Shape) -> Result<()> {
        Ok(())
    }
}

/// Keeps every published shape in memory, in publication order.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    shapes: Mutex<Vec<Shape>>,
}

impl MemoryPublisher {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far.
    pub fn shapes(&self) -> Vec<Shape> {
        self.shapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent shape, if any.
    pub fn last(&self) -> Option<Shape> {
        self.shapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Publisher for MemoryPublisher {
    fn publish(&self, shape: &Shape) -> Result<()> {
        self.shapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(shape.clone());
        Ok(())
    }
}
