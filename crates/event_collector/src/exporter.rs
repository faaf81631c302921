use crate::event::EventBatch;
use async_trait::async_trait;
use thiserror::Error;

/// Error types for batch export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Transport-layer error (network, filesystem).
    #[error("transport error: {0}")]
    Transport(String),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Trait for exporting event batches to a backend.
///
/// `#[async_trait]` because exporters are held as `Arc<dyn EventExporter>`
/// by the drain loop.
#[async_trait]
pub trait EventExporter: Send + Sync {
    /// Exports one batch of events.
    async fn export(&self, batch: EventBatch) -> Result<(), ExportError>;

    /// Returns the exporter name for diagnostics.
    fn name(&self) -> &str;
}

/// Stdout exporter for development and debugging.
pub struct StdoutExporter {
    verbose: bool,
}

impl StdoutExporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

#[async_trait]
impl EventExporter for StdoutExporter {
    async fn export(&self, batch: EventBatch) -> Result<(), ExportError> {
        println!("=== exporting {} events ===", batch.len());
        if self.verbose {
            for event in &batch.events {
                println!(
                    "event: source={} seq={} severity={:?} name={} value={:?}",
                    event.source, event.seq, event.severity, event.name, event.value
                );
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

/// JSON-lines file exporter: appends one JSON object per event.
pub struct JsonFileExporter {
    file_path: String,
}

impl JsonFileExporter {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

#[async_trait]
impl EventExporter for JsonFileExporter {
    async fn export(&self, batch: EventBatch) -> Result<(), ExportError> {
        let mut lines = String::new();
        for event in &batch.events {
            let line = serde_json::to_string(event)
                .map_err(|e| ExportError::Serialization(e.to_string()))?;
            lines.push_str(&line);
            lines.push('\n');
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .await
            .map_err(|e| ExportError::Transport(e.to_string()))?;

        tokio::io::AsyncWriteExt::write_all(&mut file, lines.as_bytes())
            .await
            .map_err(|e| ExportError::Transport(e.to_string()))?;

        Ok(())
    }

    fn name(&self) -> &str {
        "json_file"
    }
}

/// Null exporter that discards all events (for benchmarking).
#[derive(Default)]
pub struct NullExporter;

impl NullExporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventExporter for NullExporter {
    async fn export(&self, _batch: EventBatch) -> Result<(), ExportError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Test exporter that records every exported event for verification.
pub struct RecordingExporter {
    events: std::sync::Mutex<Vec<crate::event::Event>>,
}

impl Default for RecordingExporter {
    fn default() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl RecordingExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exported_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn events_from(&self, source: u32) -> Vec<crate::event::Event> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.source == source)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventExporter for RecordingExporter {
    async fn export(&self, batch: EventBatch) -> Result<(), ExportError> {
        self.events.lock().unwrap().extend(batch.events);
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Exporter that always fails (for failure-path tests).
#[cfg(test)]
pub struct FailingExporter;

#[cfg(test)]
#[async_trait]
impl EventExporter for FailingExporter {
    async fn export(&self, _batch: EventBatch) -> Result<(), ExportError> {
        Err(ExportError::Transport("backend unreachable".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
