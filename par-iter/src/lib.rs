//! A zero-dependency parallel iterator.
//!
//! Work is described by a [`ParallelProducer`] (random access to `len()` items) and executed by
//! splitting the index space `0..len` into contiguous chunks. A fixed number of scoped worker
//! threads claim chunks from a shared cursor until the space is exhausted, and every terminal
//! operation joins all of its workers before returning.

use std::ops::{ControlFlow, Range};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

mod enumerate;
pub use self::enumerate::Enumerate;
mod map;
pub use self::map::Map;
mod zip;
pub use self::zip::Zip;

mod collect;
use self::collect::Collect;

/// A parallel iterator over the items of a producer.
///
/// Adapters (`map`, `enumerate`, `zip`) are lazy and only wrap the producer. The terminal
/// operations `collect` and `try_collect` run the work on worker threads.
pub struct ParIter<P> {
    producer: P,
    config: ExecutionConfig,
}

impl<P> ParIter<P> {
    pub fn new(producer: P) -> Self {
        Self {
            producer,
            config: ExecutionConfig::default(),
        }
    }

    /// Sets the number of threads to use for the parallel computation.
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.config = self.config.with_threads(num_threads);
        self
    }

    /// Sets the chunk size for distributing work to threads.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.config = self.config.with_chunk_size(chunk_size);
        self
    }

    /// Replaces the whole execution config.
    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }
}

impl<P: ParallelProducer> ParIter<P> {
    pub fn enumerate(self) -> ParIter<Enumerate<P>> {
        ParIter {
            producer: Enumerate::new(self.producer),
            config: self.config,
        }
    }

    pub fn map<F, U>(self, f: F) -> ParIter<Map<P, F>>
    where
        F: Fn(P::Item) -> U + Send + Sync,
    {
        ParIter {
            producer: Map::new(self.producer, f),
            config: self.config,
        }
    }

    /// Pairs items by index. The resulting length is the shorter of the two and the config of
    /// `self` is kept.
    pub fn zip<Q: ParallelProducer>(self, other: ParIter<Q>) -> ParIter<Zip<P, Q>> {
        ParIter {
            producer: Zip::new(self.producer, other.producer),
            config: self.config,
        }
    }

    /// Collects all items, preserving the original order.
    pub fn collect<B>(self) -> B
    where
        B: FromIterator<P::Item>,
        P::Item: Send,
    {
        Collect::new(self.producer, self.config).collect()
    }

    /// Collects `Ok` values in order, or returns the observed error with the lowest index.
    /// Values computed before the failure are dropped.
    pub fn try_collect<T, E, B>(self) -> Result<B, E>
    where
        P: ParallelProducer<Item = Result<T, E>>,
        B: FromIterator<T>,
        T: Send,
        E: Send,
    {
        Collect::new(self.producer, self.config).try_collect()
    }
}

/// Configuration for parallel execution.
///
/// When unset, the number of threads is the available parallelism of the machine and the chunk
/// size splits the items evenly between threads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionConfig {
    num_threads: Option<usize>,
    chunk_size: Option<usize>,
}

impl ExecutionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of worker threads, at least one.
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads.max(1));
        self
    }

    /// Sets the number of consecutive items a worker claims at once, at least one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size.max(1));
        self
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
            .unwrap_or_else(|| thread::available_parallelism().map_or(4, |n| n.get()))
    }

    pub fn chunk_size(&self, total_items: usize) -> usize {
        let num_threads = self.num_threads();
        self.chunk_size
            .unwrap_or_else(|| total_items.div_ceil(num_threads).max(1))
    }
}

/// Trait for parallel producers that can be used with `ParIter`.
pub trait ParallelProducer: Send + Sync {
    type Item;

    /// Returns the total number of items to be processed.
    fn len(&self) -> usize;

    /// Returns true if there is nothing to process.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets a single item by its index. Each index is requested at most once per run.
    fn get_item(&self, index: usize) -> Option<Self::Item>;
}

/// Trait for types that can be converted into a parallel iterator.
pub trait IntoParallelIterator {
    type Item;
    type Producer: ParallelProducer<Item = Self::Item>;

    fn into_par_iter(self) -> ParIter<Self::Producer>;
}

/// Trait for slices that can be iterated in parallel.
pub trait ParallelSlice<T: Sync> {
    fn par_iter(&self) -> ParIter<SliceIter<'_, T>>;
}

impl<T: Sync> ParallelSlice<T> for [T] {
    fn par_iter(&self) -> ParIter<SliceIter<'_, T>> {
        ParIter::new(SliceIter { slice: self })
    }
}

impl<T: Sync> ParallelSlice<T> for Vec<T> {
    fn par_iter(&self) -> ParIter<SliceIter<'_, T>> {
        self.as_slice().par_iter()
    }
}

impl IntoParallelIterator for Range<usize> {
    type Item = usize;
    type Producer = RangeProducer;

    fn into_par_iter(self) -> ParIter<Self::Producer> {
        ParIter::new(RangeProducer { range: self })
    }
}

/// Producer for immutable slices.
#[doc(hidden)]
pub struct SliceIter<'a, T> {
    slice: &'a [T],
}

impl<'a, T: Sync> ParallelProducer for SliceIter<'a, T> {
    type Item = &'a T;

    fn len(&self) -> usize {
        self.slice.len()
    }

    fn get_item(&self, index: usize) -> Option<Self::Item> {
        self.slice.get(index)
    }
}

/// Producer for ranges.
#[doc(hidden)]
pub struct RangeProducer {
    range: Range<usize>,
}

impl ParallelProducer for RangeProducer {
    type Item = usize;

    fn len(&self) -> usize {
        self.range.len()
    }

    fn get_item(&self, index: usize) -> Option<Self::Item> {
        let value = self.range.start.checked_add(index)?;
        (value < self.range.end).then_some(value)
    }
}

/// Splits `0..total` into chunks and runs `job` for each chunk on a pool of scoped workers.
///
/// Every worker owns a state created by `init`; the states are returned once all workers are
/// joined. When `job` breaks, no worker claims another chunk. With a single worker the job runs
/// on the calling thread.
pub(crate) fn run_chunked<S, I, F>(
    total: usize,
    config: &ExecutionConfig,
    init: I,
    job: F,
) -> Vec<S>
where
    S: Send,
    I: Fn() -> S + Sync,
    F: Fn(&mut S, Range<usize>) -> ControlFlow<()> + Sync,
{
    if total == 0 {
        return Vec::new();
    }

    let chunk_size = config.chunk_size(total);
    let num_workers = config.num_threads().min(total.div_ceil(chunk_size));

    let cursor = AtomicUsize::new(0);
    let stopped = AtomicBool::new(false);

    let work = || {
        let mut state = init();
        while !stopped.load(Ordering::Relaxed) {
            let start = cursor.fetch_add(chunk_size, Ordering::Relaxed);
            if start >= total {
                break;
            }
            let end = start.saturating_add(chunk_size).min(total);
            if job(&mut state, start..end).is_break() {
                stopped.store(true, Ordering::Relaxed);
                break;
            }
        }
        state
    };

    if num_workers <= 1 {
        return vec![work()];
    }

    thread::scope(|s| {
        let handles = (0..num_workers).map(|_| s.spawn(&work)).collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(state) => state,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    })
}
