use crate::invariants::debug_assert_capacity_match;
use crate::metrics::Metrics;
use crate::ring::Ring;
use crate::OverflowPolicy;
use parking_lot::Mutex;
use std::thread;
use std::time::Duration;

/// One producer's submission queue: a mutex-guarded ring plus the overflow
/// policy.
///
/// The lock is scoped to this slot alone, so producers bound to different
/// slots never contend with each other; only the owning producer and the
/// drainer ever take it, and both hold it only for an O(1) operation (one
/// insert or one whole-buffer swap). The lock is never held across a sleep
/// or a drain callback.
pub(crate) struct SubmitQueue<T> {
    ring: Mutex<Ring<T>>,
    policy: OverflowPolicy,
    full_backoff: Duration,
    enable_metrics: bool,
    metrics: Metrics,
}

impl<T> SubmitQueue<T> {
    pub(crate) fn new(policy: OverflowPolicy, full_backoff: Duration, enable_metrics: bool) -> Self {
        Self {
            ring: Mutex::new(Ring::new()),
            policy,
            full_backoff,
            enable_metrics,
            metrics: Metrics::new(),
        }
    }

    /// Sets the ring capacity. Pre-activity only; existing items are dropped.
    pub(crate) fn reserve(&self, capacity: usize) {
        self.ring.lock().set_capacity(capacity);
    }

    /// Transfers `item` into the queue according to the overflow policy.
    pub(crate) fn submit(&self, item: T) {
        match self.policy {
            OverflowPolicy::Bounded => self.submit_bounded(item),
            OverflowPolicy::Overwrite => self.submit_overwrite(item),
        }
    }

    /// Bounded policy: sleep-and-retry until the ring has space.
    ///
    /// The full-check and the insert happen under the same lock acquisition,
    /// so the insert needs no re-validation. The lock is released for the
    /// whole sleep interval, leaving the drainer free to exchange.
    fn submit_bounded(&self, item: T) {
        loop {
            {
                let mut ring = self.ring.lock();
                if !ring.is_full() {
                    ring.push_unchecked(item);
                    if self.enable_metrics {
                        self.metrics.add_submitted(1);
                    }
                    return;
                }
            }
            if self.enable_metrics {
                self.metrics.add_full_stall();
            }
            thread::sleep(self.full_backoff);
        }
    }

    /// Overwrite policy: insert unconditionally, shedding the oldest item
    /// when full. The evicted item is dropped after the lock is released so
    /// an expensive `Drop` cannot stretch the critical section.
    fn submit_overwrite(&self, item: T) {
        let evicted = {
            let mut ring = self.ring.lock();
            ring.push_overwrite(item)
        };

        if self.enable_metrics {
            self.metrics.add_submitted(1);
            if evicted.is_some() {
                self.metrics.add_overwritten(1);
            }
        }
    }

    /// Consumer-only: swaps the queue's ring with the drainer's scratch ring
    /// in O(1), regardless of how many items are buffered.
    pub(crate) fn exchange(&self, scratch: &mut Ring<T>) {
        let mut ring = self.ring.lock();
        debug_assert_capacity_match!(ring.capacity(), scratch.capacity());
        ring.swap(scratch);
    }

    pub(crate) fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub(crate) fn policy(&self) -> OverflowPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn micros(n: u64) -> Duration {
        Duration::from_micros(n)
    }

    #[test]
    fn test_submit_then_exchange() {
        let slot = SubmitQueue::new(OverflowPolicy::Bounded, micros(10), false);
        slot.reserve(8);

        slot.submit(1u64);
        slot.submit(2);

        let mut scratch = Ring::with_capacity(8);
        slot.exchange(&mut scratch);

        assert_eq!(scratch.drain().collect::<Vec<_>>(), vec![1, 2]);

        // Queue is empty after the exchange
        let mut scratch2 = Ring::with_capacity(8);
        slot.exchange(&mut scratch2);
        assert!(scratch2.is_empty());
    }

    #[test]
    fn test_overwrite_sheds_oldest() {
        let slot = SubmitQueue::new(OverflowPolicy::Overwrite, micros(10), true);
        slot.reserve(2);

        slot.submit("a");
        slot.submit("b");
        slot.submit("c");

        let mut scratch = Ring::with_capacity(2);
        slot.exchange(&mut scratch);
        assert_eq!(scratch.drain().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(slot.metrics().snapshot().overwritten, 1);
    }

    #[test]
    fn test_bounded_blocks_until_space() {
        let slot = Arc::new(SubmitQueue::new(OverflowPolicy::Bounded, micros(50), false));
        slot.reserve(2);

        slot.submit(1u64);
        slot.submit(2);

        let third_done = Arc::new(AtomicBool::new(false));
        let producer = {
            let slot = Arc::clone(&slot);
            let done = Arc::clone(&third_done);
            thread::spawn(move || {
                slot.submit(3);
                done.store(true, Ordering::SeqCst);
            })
        };

        // The queue is full: the submit cannot have completed, no matter how
        // the threads are scheduled.
        thread::sleep(Duration::from_millis(20));
        assert!(!third_done.load(Ordering::SeqCst), "submit completed with no space");

        let mut scratch = Ring::with_capacity(2);
        slot.exchange(&mut scratch);
        assert_eq!(scratch.drain().collect::<Vec<_>>(), vec![1, 2]);

        producer.join().unwrap();
        assert!(third_done.load(Ordering::SeqCst));

        let mut scratch = Ring::with_capacity(2);
        slot.exchange(&mut scratch);
        assert_eq!(scratch.drain().collect::<Vec<_>>(), vec![3]);
    }
}
