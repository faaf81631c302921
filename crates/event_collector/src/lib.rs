//! Telemetry event collection over [`dumpq`].
//!
//! Producer threads emit [`Event`]s into per-producer queues; a single
//! tokio task periodically drains every queue and hands the batches to an
//! [`EventExporter`]. Queue backpressure follows the configured
//! [`dumpq::OverflowPolicy`]: `Bounded` never loses an event, `Overwrite`
//! never stalls a producer.
//!
//! # Example
//!
//! ```no_run
//! use event_collector::{CollectorConfig, DrainLoop, Event, EventCollector, Severity, StdoutExporter};
//! use std::sync::Arc;
//!
//! # #[tokio::main] async fn main() {
//! let collector = EventCollector::new(CollectorConfig::default()).unwrap();
//! let drain_loop = DrainLoop::spawn(&collector, Arc::new(StdoutExporter::new(false))).unwrap();
//!
//! let producer = collector.register().unwrap();
//! producer.emit(Event::new(0, 0, Severity::Info, "startup"));
//!
//! drain_loop.shutdown().await.unwrap();
//! # }
//! ```

mod collector;
mod drain_loop;
mod event;
mod exporter;

pub use collector::{CollectorConfig, CollectorMetrics, EventCollector, EventDrainer, EventProducer};
pub use drain_loop::DrainLoop;
pub use event::{Event, EventBatch, Severity};
pub use exporter::{
    EventExporter, ExportError, JsonFileExporter, NullExporter, RecordingExporter, StdoutExporter,
};
