//! Minimal end-to-end usage: four producer threads, one draining consumer.
//!
//! Run with: cargo run --example basic

use dumpq::{Config, Dumper, OverflowPolicy};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    let mut config = Config::new(256, 4, OverflowPolicy::Bounded);
    config.enable_metrics = true;
    let dumper = Arc::new(Dumper::new(config).unwrap());

    let mut handles = vec![];
    for _ in 0..4 {
        let dumper = Arc::clone(&dumper);
        handles.push(thread::spawn(move || {
            let producer = dumper.register().unwrap();
            for i in 0..1000u64 {
                producer.submit((producer.id(), i));
            }
        }));
    }

    let mut drainer = dumper.drainer().unwrap();
    let mut total = 0;
    while total < 4000 {
        total += drainer.drain(|(producer_id, value)| {
            if value % 250 == 0 {
                println!("producer {producer_id}: reached {value}");
            }
        });
        thread::sleep(Duration::from_millis(1));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let metrics = dumper.metrics();
    println!(
        "done: {} submitted, {} drained over {} passes ({} stalls)",
        metrics.submitted, metrics.drained, metrics.drain_passes, metrics.full_stalls
    );
}
