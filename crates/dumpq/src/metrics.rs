use std::sync::atomic::{AtomicU64, Ordering};

/// Per-slot operation counters.
///
/// All accesses use `Ordering::Relaxed`: these are purely statistical
/// counters with no control-flow dependencies and no happens-before
/// requirements, so slightly stale reads are acceptable and no memory
/// barriers land on the submit path.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Items accepted into a queue.
    pub submitted: AtomicU64,
    /// Items handed to the drain callback.
    pub drained: AtomicU64,
    /// Items evicted by the Overwrite policy.
    pub overwritten: AtomicU64,
    /// Sleep intervals taken by blocked Bounded-policy submits.
    pub full_stalls: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add_submitted(&self, n: u64) {
        self.submitted.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_drained(&self, n: u64) {
        self.drained.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_overwritten(&self, n: u64) {
        self.overwritten.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_full_stall(&self) {
        self.full_stalls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            drained: self.drained.load(Ordering::Relaxed),
            overwritten: self.overwritten.load(Ordering::Relaxed),
            full_stalls: self.full_stalls.load(Ordering::Relaxed),
            drain_passes: 0,
        }
    }
}

/// Point-in-time view of the counters, aggregated across all slots by
/// [`Dumper::metrics`](crate::Dumper::metrics).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub submitted: u64,
    pub drained: u64,
    pub overwritten: u64,
    pub full_stalls: u64,
    /// Completed drain passes over the whole slot collection.
    pub drain_passes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counts() {
        let metrics = Metrics::new();
        metrics.add_submitted(3);
        metrics.add_drained(2);
        metrics.add_overwritten(1);
        metrics.add_full_stall();

        let snap = metrics.snapshot();
        assert_eq!(snap.submitted, 3);
        assert_eq!(snap.drained, 2);
        assert_eq!(snap.overwritten, 1);
        assert_eq!(snap.full_stalls, 1);
    }
}
