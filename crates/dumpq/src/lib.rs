//! dumpq - Batched Multi-Producer Single-Consumer Submission Queues
//!
//! A queue-decomposed MPSC design where each producer has a dedicated
//! mutex-guarded ring buffer and one consumer periodically drains every
//! queue by exchanging whole buffers in O(1). Producers on different slots
//! never share a lock, and the per-slot lock is held only for one insert or
//! one buffer swap, so contention stays bounded no matter how slow the
//! drain callback is.
//!
//! Built for high-frequency data generation (telemetry, logging, trace
//! events) where the consumer's processing cadence is decoupled from the
//! production rate.
//!
//! # Overflow policies
//!
//! Selected once, at construction:
//!
//! - [`OverflowPolicy::Bounded`] - a producer hitting a full queue sleeps
//!   and retries until the consumer frees space. No item is ever dropped.
//! - [`OverflowPolicy::Overwrite`] - a producer hitting a full queue evicts
//!   the oldest undrained item and never stalls. Size the queue against the
//!   drain frequency to keep loss acceptable.
//!
//! # Example
//!
//! ```
//! use dumpq::{Config, Dumper, OverflowPolicy};
//!
//! let dumper = Dumper::new(Config::new(1024, 4, OverflowPolicy::Bounded)).unwrap();
//! let producer = dumper.register().unwrap();
//! let mut drainer = dumper.drainer().unwrap();
//!
//! producer.submit(42u64);
//! producer.submit(43);
//!
//! let mut received = Vec::new();
//! drainer.drain(|item| received.push(item));
//! assert_eq!(received, vec![42, 43]);
//! ```

mod config;
mod dumper;
mod invariants;
mod metrics;
mod ring;
mod slot;

pub use config::{Config, OverflowPolicy, BEST_EFFORT_CONFIG, LOSSLESS_CONFIG};
pub use dumper::{Drainer, Dumper, DumperError, Producer};
pub use metrics::{Metrics, MetricsSnapshot};
pub use ring::{Drain, Ring};
