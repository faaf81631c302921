use crate::event::{Event, EventBatch};
use dumpq::{Config, Drainer, Dumper, DumperError, OverflowPolicy, Producer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the event collector.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Events buffered per producer before the overflow policy applies.
    pub queue_capacity: usize,
    /// Maximum number of producers.
    pub max_producers: usize,
    /// What happens when a producer outruns the drain cadence.
    pub policy: OverflowPolicy,
    /// How often the drain loop sweeps the queues.
    pub drain_interval: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 4096,
            max_producers: 16,
            policy: OverflowPolicy::Bounded,
            drain_interval: Duration::from_millis(100), // 10Hz
        }
    }
}

impl From<CollectorConfig> for Config {
    fn from(config: CollectorConfig) -> Self {
        let mut inner = Config::new(config.queue_capacity, config.max_producers, config.policy);
        inner.enable_metrics = true;
        inner
    }
}

/// Counters for the collector pipeline.
///
/// All accesses use `Ordering::Relaxed`: purely statistical counters with no
/// control-flow dependencies, so no memory barriers land on the emit path.
#[derive(Debug, Default)]
pub struct CollectorMetrics {
    /// Events accepted from producers.
    pub events_emitted: AtomicU64,
    /// Events pulled out of the queues by the drain side.
    pub events_collected: AtomicU64,
    /// Batches successfully exported.
    pub batches_exported: AtomicU64,
    /// Batches whose export failed.
    pub export_failures: AtomicU64,
}

impl CollectorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events_emitted(&self) -> u64 {
        self.events_emitted.load(Ordering::Relaxed)
    }

    pub fn events_collected(&self) -> u64 {
        self.events_collected.load(Ordering::Relaxed)
    }

    pub fn batches_exported(&self) -> u64 {
        self.batches_exported.load(Ordering::Relaxed)
    }

    pub fn export_failures(&self) -> u64 {
        self.export_failures.load(Ordering::Relaxed)
    }
}

/// Telemetry event collector: producer threads emit events into
/// per-producer queues; one drain task sweeps them in batches.
pub struct EventCollector {
    dumper: Dumper<Event>,
    config: CollectorConfig,
    metrics: Arc<CollectorMetrics>,
}

impl EventCollector {
    /// Creates a collector with the given configuration.
    pub fn new(config: CollectorConfig) -> Result<Self, DumperError> {
        let dumper = Dumper::new(config.clone().into())?;
        Ok(Self {
            dumper,
            config,
            metrics: Arc::new(CollectorMetrics::new()),
        })
    }

    /// Registers a new event producer.
    pub fn register(&self) -> Result<EventProducer, DumperError> {
        let producer = self.dumper.register()?;
        Ok(EventProducer {
            producer,
            metrics: Arc::clone(&self.metrics),
        })
    }

    /// Takes the single drain handle for this collector.
    pub fn drainer(&self) -> Result<EventDrainer, DumperError> {
        let drainer = self.dumper.drainer()?;
        Ok(EventDrainer {
            drainer,
            metrics: Arc::clone(&self.metrics),
        })
    }

    /// Returns the collector configuration.
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Returns the pipeline counters.
    pub fn metrics(&self) -> &Arc<CollectorMetrics> {
        &self.metrics
    }

    /// Returns the queue-level counters (stalls, overwrites).
    pub fn queue_metrics(&self) -> dumpq::MetricsSnapshot {
        self.dumper.metrics()
    }
}

/// Handle for emitting events from one producer thread.
pub struct EventProducer {
    producer: Producer<Event>,
    metrics: Arc<CollectorMetrics>,
}

impl EventProducer {
    /// Returns the producer's slot id, usable as an event source id.
    pub fn id(&self) -> usize {
        self.producer.id()
    }

    /// Emits an event into this producer's queue.
    ///
    /// Blocking behavior follows the configured policy: `Bounded` parks the
    /// caller while the queue is full; `Overwrite` sheds the oldest
    /// unswept event and returns immediately.
    pub fn emit(&self, event: Event) {
        self.producer.submit(event);
        self.metrics.events_emitted.fetch_add(1, Ordering::Relaxed);
    }
}

/// The consumer-side handle: sweeps every producer queue into batches.
pub struct EventDrainer {
    drainer: Drainer<Event>,
    metrics: Arc<CollectorMetrics>,
}

impl EventDrainer {
    /// Sweeps all queues, appending every collected event to `batch` in
    /// per-producer FIFO order. Returns the number of events collected.
    pub fn collect_into(&mut self, batch: &mut EventBatch) -> usize {
        let collected = self.drainer.drain(|event| batch.add(event));
        if collected > 0 {
            self.metrics
                .events_collected
                .fetch_add(collected as u64, Ordering::Relaxed);
        }
        collected
    }
}
