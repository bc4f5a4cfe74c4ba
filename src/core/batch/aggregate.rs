//! Shared state written by batch workers.
//!
//! These are the only values mutated concurrently during a batch:
//! - [`ResultBag`] - append-only collection of per-pair records
//! - [`BatchProgress`] - pollable completion counter
//! - [`CancellationToken`] - cooperative stop flag checked between pairs

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Append-only, multi-writer container.
///
/// Any number of threads may [`push`](Self::push) through a shared
/// reference. Contents are only reachable through
/// [`into_vec`](Self::into_vec), which consumes the bag; the borrow checker
/// therefore guarantees every writer has finished before anything is read.
/// Items come back in push order, which across threads is arbitrary.
#[derive(Debug)]
pub struct ResultBag<T> {
    items: Mutex<Vec<T>>,
}

impl<T> ResultBag<T> {
    /// Create an empty bag
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Create an empty bag with room for `capacity` items
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Append an item
    pub fn push(&self, item: T) {
        // A worker that panicked mid-push cannot leave the Vec half-written,
        // so a poisoned lock is still safe to use.
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.push(item);
    }

    /// Number of items appended so far
    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether nothing has been appended yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the contents once all writers are done
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T> Default for ResultBag<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Atomic progress counter for a running batch.
///
/// Shared through an `Arc`; a UI thread can poll it while workers run.
#[derive(Debug, Default)]
pub struct BatchProgress {
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl BatchProgress {
    /// Create a counter at 0/0
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting a new batch of `total` pairs
    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }

    /// Mark one pair finished, returning the new completed count
    pub fn record(&self) -> usize {
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Pairs finished so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Pairs in the current batch
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

/// Cooperative cancellation flag.
///
/// Clones share the same flag. Workers check it before starting each pair;
/// a pair already running finishes normally.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
