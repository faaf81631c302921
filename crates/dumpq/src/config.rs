use std::time::Duration;

/// Overflow policy applied when a producer submits into a full queue.
///
/// Selected once at construction; both the producer-side cost model and the
/// delivery guarantee follow from this choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Block the producer until the consumer frees space. Never loses an
    /// item; submit latency is bounded by the consumer's drain cadence.
    #[default]
    Bounded,
    /// Evict the oldest undrained item and insert the new one. Never blocks;
    /// the caller is responsible for sizing the queue against the drain
    /// frequency to keep loss acceptable.
    Overwrite,
}

/// Configuration for [`Dumper`](crate::Dumper) and its submission queues.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Capacity of every per-producer queue and of the drain scratch buffer.
    pub capacity: usize,
    /// Number of producer slots.
    pub producers: usize,
    /// What happens when a producer finds its queue full.
    pub policy: OverflowPolicy,
    /// How long a blocked producer sleeps between full-queue rechecks
    /// (Bounded policy only). After the consumer frees space, a blocked
    /// submit completes within one further interval at worst.
    pub full_backoff: Duration,
    /// Enable counter collection (slight overhead on the submit path).
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a configuration with custom queue geometry and the default
    /// backoff interval.
    pub const fn new(capacity: usize, producers: usize, policy: OverflowPolicy) -> Self {
        Self {
            capacity,
            producers,
            policy,
            full_backoff: Duration::from_micros(10),
            enable_metrics: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(4096, 16, OverflowPolicy::Bounded)
    }
}

/// Lossless configuration: producers stall rather than drop (4K slots each).
pub const LOSSLESS_CONFIG: Config = Config::new(4096, 16, OverflowPolicy::Bounded);

/// Best-effort configuration: producers never stall, oldest data is shed
/// under consumer lag (64K slots each to make that rare).
pub const BEST_EFFORT_CONFIG: Config = Config::new(65536, 16, OverflowPolicy::Overwrite);
