//! The shared best-result cell.
//!
//! One mutex guards the best size, the best shape and the first publish
//! failure; [`BestShape::offer`] is the only way to change them. The size is
//! mirrored in an atomic so branches can discard small leaves without taking
//! the lock. The mirror only ever lags the locked value, so the unlocked
//! pre-check can let a stale candidate through but never drops a real
//! improvement, and the locked re-check settles it.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crossbeam_utils::CachePadded;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::io::Publisher;
use crate::subtree::Shape;

/// What [`BestShape::offer`] did with a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// The candidate is the new best and was published.
    Published,
    /// The candidate was larger but encloses a void.
    Enclosed,
    /// Another branch got there first.
    Stale,
    /// Publishing failed, now or earlier; the search is aborting.
    Failed,
}

#[derive(Debug, Default)]
struct Inner {
    size: usize,
    shape: Option<Shape>,
    failure: Option<Error>,
}

/// Best valid shape found so far.
#[derive(Debug)]
pub struct BestShape {
    size: CachePadded<AtomicUsize>,
    aborted: AtomicBool,
    inner: Mutex<Inner>,
    started: Instant,
}

impl Default for BestShape {
    fn default() -> Self {
        Self::new()
    }
}

impl BestShape {
    /// An empty cell. Elapsed times in progress logs count from now.
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    /// An empty cell whose progress logs count elapsed time from `started`.
    pub fn started_at(started: Instant) -> Self {
        Self {
            size: CachePadded::new(AtomicUsize::new(0)),
            aborted: AtomicBool::new(false),
            inner: Mutex::new(Inner::default()),
            started,
        }
    }

    /// Best published size, possibly slightly stale.
    #[inline]
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    /// Returns `true` once a publish has failed.
    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// Compares `shape` against the best under the lock and publishes it if it
    /// is a strict improvement without an enclosed void.
    ///
    /// `enclosed` is computed by the caller, outside the lock, on its own
    /// snapshot. A publisher error is kept, the cell stops accepting offers,
    /// and [`is_aborted`](Self::is_aborted) turns true.
    pub fn offer<P>(&self, shape: Shape, enclosed: bool, publisher: &P) -> Offer
    where
        P: Publisher + ?Sized,
    {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.failure.is_some() {
            return Offer::Failed;
        }
        let size = shape.len();
        if size <= inner.size {
            return Offer::Stale;
        }
        let elapsed_secs = self.started.elapsed().as_secs_f64();

        if enclosed {
            info!(size, elapsed_secs, "candidate rejected: encloses a void");
            return Offer::Enclosed;
        }

        if let Err(err) = publisher.publish(&shape) {
            error!(size, error = %err, "failed to publish new best; aborting search");
            inner.failure = Some(err);
            self.aborted.store(true, Ordering::Release);
            return Offer::Failed;
        }

        inner.size = size;
        inner.shape = Some(shape);
        self.size.store(size, Ordering::Release);
        info!(size, elapsed_secs, "new best size found");
        Offer::Published
    }

    /// Consumes the cell, returning the best shape or the publish failure.
    pub fn into_result(self) -> Result<Option<Shape>> {
        let inner = self
            .inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        match inner.failure {
            Some(err) => Err(err),
            None => Ok(inner.shape),
        }
    }
}
