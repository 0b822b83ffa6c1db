//! Fixed-capacity sample history.
//!
//! A [`HistoryBuffer`] keeps the most recent `capacity` samples of a single
//! series in a ring. Storage is allocated once, up front, so adding a sample
//! never reallocates. Reads always come back oldest-first regardless of where
//! the write cursor currently sits.

use std::num::NonZeroUsize;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Ring storage guarded by the buffer's lock.
#[derive(Debug)]
struct Ring {
    /// Stored samples. Grows by `push` until full, then is overwritten in place.
    values: Vec<f64>,
    /// Slot holding the oldest sample once the ring is full.
    cursor: usize,
    capacity: usize,
}

impl Ring {
    fn new(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            cursor: 0,
            capacity,
        }
    }

    fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    fn push(&mut self, value: f64) {
        if self.is_full() {
            self.values[self.cursor] = value;
            self.cursor = (self.cursor + 1) % self.capacity;
        } else {
            self.values.push(value);
        }
    }

    /// Iterate over the newest `n` samples, oldest of those first.
    fn newest(&self, n: usize) -> impl Iterator<Item = f64> + '_ {
        let len = self.values.len();
        let n = n.min(len);
        // Chronological position `i` lives at `(cursor + i) % len`; before the
        // ring fills, `cursor` is zero and this is the identity.
        (len - n..len).map(move |i| self.values[(self.cursor + i) % len])
    }

    fn clear(&mut self) {
        self.values.clear();
        self.cursor = 0;
    }
}

/// A thread-safe, fixed-capacity history of numeric samples.
///
/// Writers take an exclusive lock for the whole of [`add`](Self::add), so a
/// concurrent reader sees a sample either fully written or not at all.
#[derive(Debug)]
pub struct HistoryBuffer {
    ring: RwLock<Ring>,
    window: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer holding at most `capacity` samples and
    /// averaging over the newest `window` of them.
    pub fn new(capacity: NonZeroUsize, window: NonZeroUsize) -> Self {
        Self {
            ring: RwLock::new(Ring::new(capacity.get())),
            window: window.get(),
        }
    }

    /// Record a sample, evicting the oldest one once the buffer is full.
    pub fn add(&self, value: f64) {
        self.write().push(value);
    }

    /// All stored samples, oldest first.
    pub fn values(&self) -> Vec<f64> {
        let ring = self.read();
        ring.newest(ring.values.len()).collect()
    }

    /// The `n` most recent samples, oldest first.
    ///
    /// Asking for more samples than are stored returns everything.
    pub fn last(&self, n: usize) -> Vec<f64> {
        self.read().newest(n).collect()
    }

    /// The newest sample, if any.
    pub fn latest(&self) -> Option<f64> {
        self.read().newest(1).next()
    }

    /// Mean of the newest `min(window, len)` samples, or `0.0` when empty.
    pub fn moving_average(&self) -> f64 {
        let ring = self.read();
        let count = self.window.min(ring.values.len());
        if count == 0 {
            return 0.0;
        }
        ring.newest(count).sum::<f64>() / count as f64
    }

    /// Drop every sample. Capacity and window are kept.
    pub fn reset(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.read().capacity
    }

    pub fn window(&self) -> usize {
        self.window
    }

    // A panic while holding the lock cannot leave the ring half-updated:
    // every mutation is a single slot write plus a cursor bump.
    fn read(&self) -> RwLockReadGuard<'_, Ring> {
        self.ring.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Ring> {
        self.ring.write().unwrap_or_else(PoisonError::into_inner)
    }
}
