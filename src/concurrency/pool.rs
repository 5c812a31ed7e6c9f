//! Fixed-size worker pool with an idle-worker estimate.
//!
//! Wraps a `rayon::ThreadPool`. Work is submitted into a `rayon::Scope`, and
//! scope exit is the completion signal: once [`WorkerPool::scope`] returns,
//! every job submitted under it (transitively) has finished.
//!
//! `in_flight` counts jobs that have been submitted and not yet finished,
//! queued or running. [`WorkerPool::idle`] is `threads - in_flight`, clamped at
//! zero. It is a hint only: another thread may submit between a caller's
//! `idle()` check and its own `submit`, which at worst oversubscribes the queue.

use core::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

use crate::error::{Error, Result};

/// A fixed set of worker threads.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    threads: usize,
    in_flight: CachePadded<AtomicUsize>,
}

/// Decrements the in-flight count when a job finishes, even by unwinding.
struct Completion<'a>(&'a AtomicUsize);

impl Drop for Completion<'_> {
    #[inline]
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl WorkerPool {
    /// Starts `threads` workers with rayon's default stack size.
    pub fn new(threads: usize) -> Result<Self> {
        Self::with_stack_size(threads, None)
    }

    /// Starts `threads` workers, each with `stack_size` bytes of stack if given.
    ///
    /// Deep inline recursion needs roughly one small frame per induced vertex,
    /// so very large lattices may want more than the default.
    pub fn with_stack_size(threads: usize, stack_size: Option<usize>) -> Result<Self> {
        if threads == 0 {
            return Err(Error::ZeroThreads);
        }
        let mut builder = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("search-worker-{i}"));
        if let Some(bytes) = stack_size {
            builder = builder.stack_size(bytes);
        }
        Ok(Self {
            pool: builder.build()?,
            threads,
            in_flight: CachePadded::new(AtomicUsize::new(0)),
        })
    }

    /// Number of worker threads.
    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Jobs submitted and not yet finished.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Estimated number of workers with nothing to do.
    #[inline]
    pub fn idle(&self) -> usize {
        self.threads.saturating_sub(self.in_flight())
    }

    /// Runs `op` inside the pool and waits for every job submitted under the
    /// scope it receives.
    pub fn scope<'scope, OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce(&rayon::Scope<'scope>) -> R + Send,
        R: Send,
    {
        self.pool.scope(op)
    }

    /// Queues `job` on the pool.
    pub fn submit<'scope, F>(&'scope self, scope: &rayon::Scope<'scope>, job: F)
    where
        F: FnOnce(&rayon::Scope<'scope>) + Send + 'scope,
    {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let in_flight: &'scope AtomicUsize = &self.in_flight;
        scope.spawn(move |s| {
            let _done = Completion(in_flight);
            job(s);
        });
    }
}
