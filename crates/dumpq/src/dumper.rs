use crate::metrics::MetricsSnapshot;
use crate::ring::Ring;
use crate::slot::SubmitQueue;
use crate::{Config, OverflowPolicy};
use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Error types for dumper operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DumperError {
    /// Queue capacity was zero (or never configured).
    #[error("queue capacity must be nonzero")]
    ZeroCapacity,
    /// Producer slot count was zero.
    #[error("producer count must be nonzero")]
    ZeroProducers,
    /// Every producer slot is already bound to a handle.
    #[error("all producer slots taken (max: {max})")]
    TooManyProducers {
        /// The configured number of producer slots.
        max: usize,
    },
    /// The single consumer handle is already live.
    #[error("consumer handle already taken")]
    ConsumerTaken,
    /// Reconfiguration attempted while producer/drainer handles (or clones
    /// of the dumper) are live.
    #[error("cannot reconfigure while handles are live")]
    Active,
}

/// Multi-producer single-consumer batching queue.
///
/// Owns one [`SubmitQueue`] per producer slot. Producers bind to a slot via
/// [`register`](Dumper::register) and submit through the returned handle;
/// the one consumer takes a [`Drainer`] and periodically sweeps every slot,
/// exchanging whole buffers instead of copying items.
///
/// Producers on different slots share no lock, so they never contend with
/// each other; a producer only ever contends with the drainer, and only for
/// the duration of one O(1) insert or one O(1) buffer swap.
pub struct Dumper<T> {
    inner: Arc<DumperInner<T>>,
}

struct DumperInner<T> {
    /// One submission queue per producer slot, in registration order.
    /// CachePadded so neighboring slots' lock words do not false-share.
    slots: Vec<CachePadded<SubmitQueue<T>>>,
    /// Number of producer handles handed out.
    registered: AtomicUsize,
    /// Whether the single drainer handle is live.
    consumer_taken: AtomicBool,
    /// Completed sweeps over the whole slot collection.
    drain_passes: AtomicU64,
    config: Config,
}

fn build_slots<T>(config: &Config) -> Vec<CachePadded<SubmitQueue<T>>> {
    (0..config.producers)
        .map(|_| {
            let slot = SubmitQueue::new(config.policy, config.full_backoff, config.enable_metrics);
            slot.reserve(config.capacity);
            CachePadded::new(slot)
        })
        .collect()
}

impl<T> Dumper<T> {
    /// Creates a dumper with `config.producers` slots of `config.capacity`
    /// items each.
    ///
    /// Fails fast on a zero capacity or zero producer count instead of
    /// deferring the misuse to the first submit.
    pub fn new(config: Config) -> Result<Self, DumperError> {
        if config.capacity == 0 {
            return Err(DumperError::ZeroCapacity);
        }
        if config.producers == 0 {
            return Err(DumperError::ZeroProducers);
        }

        Ok(Self {
            inner: Arc::new(DumperInner {
                slots: build_slots(&config),
                registered: AtomicUsize::new(0),
                consumer_taken: AtomicBool::new(false),
                drain_passes: AtomicU64::new(0),
                config,
            }),
        })
    }

    /// Recreates the slot collection with `producers` slots, discarding any
    /// buffered items and prior registrations.
    ///
    /// Only valid before any handle (producer or drainer) or clone of this
    /// dumper exists; otherwise returns [`DumperError::Active`]. Exclusive
    /// ownership of the shared state is the guard, so the check cannot
    /// drift from reality.
    pub fn set_producer_count(&mut self, producers: usize) -> Result<(), DumperError> {
        if producers == 0 {
            return Err(DumperError::ZeroProducers);
        }

        let inner = Arc::get_mut(&mut self.inner).ok_or(DumperError::Active)?;
        inner.config.producers = producers;
        inner.slots = build_slots(&inner.config);
        inner.registered.store(0, Ordering::Relaxed);
        Ok(())
    }

    /// Re-reserves every slot (and the scratch geometry) at `capacity`
    /// items, discarding any buffered items.
    ///
    /// Same activity guard as [`set_producer_count`](Self::set_producer_count).
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), DumperError> {
        if capacity == 0 {
            return Err(DumperError::ZeroCapacity);
        }

        let inner = Arc::get_mut(&mut self.inner).ok_or(DumperError::Active)?;
        inner.config.capacity = capacity;
        for slot in &inner.slots {
            slot.reserve(capacity);
        }
        Ok(())
    }

    /// Binds the next free slot and returns its producer handle.
    pub fn register(&self) -> Result<Producer<T>, DumperError> {
        let id = self.inner.registered.fetch_add(1, Ordering::SeqCst);
        if id >= self.inner.config.producers {
            self.inner.registered.fetch_sub(1, Ordering::SeqCst);
            return Err(DumperError::TooManyProducers {
                max: self.inner.config.producers,
            });
        }

        Ok(Producer {
            inner: Arc::clone(&self.inner),
            id,
        })
    }

    /// Takes the single consumer handle, which owns the scratch buffer used
    /// for every exchange.
    ///
    /// A second call fails with [`DumperError::ConsumerTaken`] until the
    /// first drainer is dropped: draining is single-consumer by contract,
    /// and this guard turns a concurrent-drain mistake into an error at
    /// handle creation instead of corrupted buffers at runtime.
    pub fn drainer(&self) -> Result<Drainer<T>, DumperError> {
        if self
            .inner
            .consumer_taken
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(DumperError::ConsumerTaken);
        }

        Ok(Drainer {
            scratch: Ring::with_capacity(self.inner.config.capacity),
            inner: Arc::clone(&self.inner),
        })
    }

    /// Returns the number of producer slots.
    pub fn slot_count(&self) -> usize {
        self.inner.config.producers
    }

    /// Returns the number of producers registered so far.
    pub fn registered_producers(&self) -> usize {
        self.inner
            .registered
            .load(Ordering::Acquire)
            .min(self.inner.config.producers)
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Aggregated counter snapshot across all slots, if metrics are enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        let mut m = MetricsSnapshot::default();
        if !self.inner.config.enable_metrics {
            return m;
        }

        for slot in &self.inner.slots {
            let s = slot.metrics().snapshot();
            m.submitted += s.submitted;
            m.drained += s.drained;
            m.overwritten += s.overwritten;
            m.full_stalls += s.full_stalls;
        }
        m.drain_passes = self.inner.drain_passes.load(Ordering::Relaxed);
        m
    }
}

impl<T> Clone for Dumper<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Producer handle bound to one slot.
///
/// Submitting through the handle is the only way to reach a slot, so the
/// one-producer-per-slot invariant holds by construction.
pub struct Producer<T> {
    inner: Arc<DumperInner<T>>,
    id: usize,
}

// Note: Producer intentionally does NOT implement Clone. Two clones could
// submit to the same slot concurrently; that is safe (the slot lock covers
// it) but silently serializes producers that believe they are independent.

impl<T> Producer<T> {
    /// Returns the slot index this producer is bound to.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the overflow policy in effect for this slot.
    #[inline]
    pub fn policy(&self) -> OverflowPolicy {
        self.inner.slots[self.id].policy()
    }

    /// Transfers `item` into this producer's queue.
    ///
    /// Under [`OverflowPolicy::Bounded`] this blocks (sleep-and-retry) while
    /// the queue is full and never drops an item; liveness depends on the
    /// consumer continuing to drain. Under [`OverflowPolicy::Overwrite`] it
    /// returns immediately, shedding the oldest undrained item when full.
    #[inline]
    pub fn submit(&self, item: T) {
        self.inner.slots[self.id].submit(item);
    }
}

/// The single consumer handle.
///
/// Owns the scratch ring used as the exchange target, so the scratch buffer
/// is single-owner by the type system; `drain(&mut self)` plus the handout
/// guard in [`Dumper::drainer`] make concurrent or re-entrant drains
/// unrepresentable.
pub struct Drainer<T> {
    scratch: Ring<T>,
    inner: Arc<DumperInner<T>>,
}

impl<T> Drainer<T> {
    /// Sweeps every slot in index order: exchange the slot's buffer with the
    /// (empty) scratch ring, feed the collected items to `on_item` oldest
    /// first, and leave the scratch empty again for the next slot.
    ///
    /// `on_item` runs with no lock held, so it may take arbitrary time
    /// without blocking producers on other slots - it only delays the
    /// draining of subsequent slots within this same call. Items submitted
    /// while the sweep is in flight land in this pass or the next one;
    /// there is no cross-slot ordering.
    ///
    /// Returns the number of items delivered.
    pub fn drain<F>(&mut self, mut on_item: F) -> usize
    where
        F: FnMut(T),
    {
        let enable_metrics = self.inner.config.enable_metrics;
        let mut total = 0;

        for slot in &self.inner.slots {
            slot.exchange(&mut self.scratch);

            let batch = self.scratch.len();
            for item in self.scratch.drain() {
                on_item(item);
            }

            if enable_metrics && batch > 0 {
                slot.metrics().add_drained(batch as u64);
            }
            total += batch;
        }

        if enable_metrics {
            self.inner.drain_passes.fetch_add(1, Ordering::Relaxed);
        }
        total
    }

    /// Returns the number of producer slots this drainer sweeps.
    pub fn slot_count(&self) -> usize {
        self.inner.config.producers
    }
}

impl<T> Drop for Drainer<T> {
    fn drop(&mut self) {
        // Release the consumer role so a replacement drainer can be taken.
        self.inner.consumer_taken.store(false, Ordering::Release);
    }
}
