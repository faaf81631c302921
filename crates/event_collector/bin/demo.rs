//! Demo: four producer threads emitting bursty telemetry while the drain
//! loop exports batches to stdout.
//!
//! Run with: cargo run --bin demo

use event_collector::{
    CollectorConfig, DrainLoop, Event, EventCollector, Severity, StdoutExporter,
};
use rand::Rng;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const PRODUCERS: usize = 4;
const EVENTS_PER_PRODUCER: u64 = 5_000;

#[tokio::main]
async fn main() {
    let config = CollectorConfig {
        queue_capacity: 1024,
        max_producers: PRODUCERS,
        drain_interval: Duration::from_millis(20),
        ..Default::default()
    };
    let collector = Arc::new(EventCollector::new(config).unwrap());
    let drain_loop = DrainLoop::spawn(&collector, Arc::new(StdoutExporter::new(false))).unwrap();

    let mut handles = vec![];
    for _ in 0..PRODUCERS {
        let collector = Arc::clone(&collector);
        handles.push(thread::spawn(move || {
            let producer = collector.register().unwrap();
            let source = producer.id() as u32;
            let mut rng = rand::thread_rng();

            for seq in 0..EVENTS_PER_PRODUCER {
                let severity = if rng.gen_ratio(1, 100) {
                    Severity::Warn
                } else {
                    Severity::Info
                };
                producer.emit(
                    Event::new(source, seq, severity, "request_handled")
                        .with_value(rng.gen_range(0.1..50.0)),
                );

                // Bursty traffic: occasional pauses between runs of emits
                if rng.gen_ratio(1, 500) {
                    thread::sleep(Duration::from_millis(rng.gen_range(1..5)));
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    drain_loop.shutdown().await.unwrap();

    let metrics = collector.metrics();
    let queue_metrics = collector.queue_metrics();
    println!(
        "emitted={} collected={} batches={} stalls={}",
        metrics.events_emitted(),
        metrics.events_collected(),
        metrics.batches_exported(),
        queue_metrics.full_stalls,
    );
    assert_eq!(metrics.events_emitted(), metrics.events_collected());
}
