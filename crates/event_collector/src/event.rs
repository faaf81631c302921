use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Severity of a telemetry event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// A single telemetry event as emitted by one producer thread.
///
/// Constructed on the producing thread and moved into the queue whole, so
/// the submit critical section never allocates or formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Identifier of the emitting source (producer slot, subsystem id).
    pub source: u32,
    /// Per-source sequence number, assigned at emission.
    pub seq: u64,
    /// Event time (Unix nanoseconds).
    pub timestamp: u64,
    /// Severity level.
    pub severity: Severity,
    /// Short event name.
    pub name: String,
    /// Optional numeric payload (duration, count, gauge value).
    pub value: Option<f64>,
}

impl Event {
    /// Creates an event stamped with the current time.
    pub fn new(source: u32, seq: u64, severity: Severity, name: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64);

        Self {
            source,
            seq,
            timestamp,
            severity,
            name: name.into(),
            value: None,
        }
    }

    /// Attaches a numeric payload.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

/// A batch of events handed to an exporter after one drain pass.
#[derive(Debug, Default)]
pub struct EventBatch {
    /// All events in this batch, in drain order.
    pub events: Vec<Event>,
    /// When the batch was assembled.
    pub assembled_at: Option<SystemTime>,
}

impl EventBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event to the batch.
    pub fn add(&mut self, event: Event) {
        if self.assembled_at.is_none() {
            self.assembled_at = Some(SystemTime::now());
        }
        self.events.push(event);
    }

    /// Returns the number of events in the batch.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the batch holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Empties the batch, returning the accumulated events.
    pub fn take(&mut self) -> Vec<Event> {
        self.assembled_at = None;
        std::mem::take(&mut self.events)
    }
}
