use crate::collector::{CollectorMetrics, EventCollector};
use crate::event::EventBatch;
use crate::exporter::EventExporter;
use dumpq::DumperError;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};

/// Periodic drain task: sweeps the collector's queues on a fixed interval
/// and hands each non-empty batch to the exporter.
///
/// Producers stay plain OS threads; only the consumer side lives on the
/// runtime. The sweep itself never blocks beyond the per-slot lock hold, so
/// it is safe to run directly on a worker thread.
pub struct DrainLoop {
    task: Option<JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl DrainLoop {
    /// Takes the collector's drain handle and spawns the loop.
    ///
    /// Fails if the drain handle is already taken ([`DumperError::ConsumerTaken`]).
    pub fn spawn(
        collector: &EventCollector,
        exporter: Arc<dyn EventExporter>,
    ) -> Result<Self, DumperError> {
        let mut drainer = collector.drainer()?;
        let metrics = Arc::clone(collector.metrics());
        let interval = collector.config().drain_interval;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut batch = EventBatch::new();

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        drainer.collect_into(&mut batch);
                        export_batch(&*exporter, &metrics, &mut batch).await;
                    }
                    _ = &mut shutdown_rx => {
                        // Final sweep so nothing buffered is lost on shutdown
                        drainer.collect_into(&mut batch);
                        export_batch(&*exporter, &metrics, &mut batch).await;
                        break;
                    }
                }
            }
        });

        Ok(Self {
            task: Some(task),
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Stops the loop after one final drain-and-export sweep.
    pub async fn shutdown(mut self) -> Result<(), JoinError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await?;
        }
        Ok(())
    }
}

async fn export_batch(
    exporter: &dyn EventExporter,
    metrics: &CollectorMetrics,
    batch: &mut EventBatch,
) {
    if batch.is_empty() {
        return;
    }

    let full = std::mem::take(batch);
    match exporter.export(full).await {
        Ok(()) => {
            metrics.batches_exported.fetch_add(1, Ordering::Relaxed);
        }
        Err(e) => {
            metrics.export_failures.fetch_add(1, Ordering::Relaxed);
            eprintln!("export via {} failed: {e}", exporter.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::CollectorConfig;
    use crate::event::{Event, Severity};
    use crate::exporter::{FailingExporter, RecordingExporter};
    use std::time::Duration;

    fn fast_config() -> CollectorConfig {
        CollectorConfig {
            drain_interval: Duration::from_millis(10),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_loop_exports_emitted_events() {
        let collector = EventCollector::new(fast_config()).unwrap();
        let exporter = Arc::new(RecordingExporter::new());
        let drain_loop = DrainLoop::spawn(&collector, exporter.clone()).unwrap();

        let producer = collector.register().unwrap();
        for i in 0..25u64 {
            producer.emit(Event::new(0, i, Severity::Info, "tick"));
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        drain_loop.shutdown().await.unwrap();

        assert_eq!(exporter.exported_count(), 25);
        assert!(collector.metrics().batches_exported() >= 1);
    }

    #[tokio::test]
    async fn test_shutdown_sweeps_pending_events() {
        // A long interval: events are still pending when shutdown arrives.
        let config = CollectorConfig {
            drain_interval: Duration::from_secs(3600),
            ..Default::default()
        };
        let collector = EventCollector::new(config).unwrap();
        let exporter = Arc::new(RecordingExporter::new());
        let drain_loop = DrainLoop::spawn(&collector, exporter.clone()).unwrap();

        let producer = collector.register().unwrap();
        for i in 0..10u64 {
            producer.emit(Event::new(0, i, Severity::Info, "pending"));
        }

        drain_loop.shutdown().await.unwrap();
        assert_eq!(exporter.exported_count(), 10);
    }

    #[tokio::test]
    async fn test_export_failures_are_counted() {
        let collector = EventCollector::new(fast_config()).unwrap();
        let drain_loop = DrainLoop::spawn(&collector, Arc::new(FailingExporter)).unwrap();

        let producer = collector.register().unwrap();
        producer.emit(Event::new(0, 0, Severity::Error, "doomed"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        drain_loop.shutdown().await.unwrap();

        assert!(collector.metrics().export_failures() >= 1);
    }

    #[tokio::test]
    async fn test_second_loop_is_rejected() {
        let collector = EventCollector::new(fast_config()).unwrap();
        let exporter = Arc::new(RecordingExporter::new());

        let drain_loop = DrainLoop::spawn(&collector, exporter.clone()).unwrap();
        assert!(matches!(
            DrainLoop::spawn(&collector, exporter.clone()).err(),
            Some(DumperError::ConsumerTaken)
        ));

        drain_loop.shutdown().await.unwrap();
    }
}
