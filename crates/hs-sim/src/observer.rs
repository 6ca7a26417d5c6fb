//! Observer sinks receiving the structured event log as it is written.
//!
//! The driver owns one boxed observer; choosing the sink is how output is
//! enabled, silenced or captured.

use crate::record::{LogEntry, Sample, SimEvent};
use std::sync::{Arc, Mutex};

pub trait SimObserver: Send {
    /// Called once per log entry, in order.
    fn on_event(&mut self, entry: &LogEntry);

    /// Called for every trajectory sample, intermediate points included.
    fn on_sample(&mut self, _sample: &Sample) {}
}

/// Forwards log entries to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SimObserver for TracingObserver {
    fn on_event(&mut self, entry: &LogEntry) {
        match &entry.event {
            SimEvent::TimeLimitReached { .. } => {
                tracing::warn!(time_s = entry.time_s, "{}", entry.event)
            }
            _ => tracing::info!(time_s = entry.time_s, "{}", entry.event),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SimObserver for NullObserver {
    fn on_event(&mut self, _entry: &LogEntry) {}
}

/// Collects entries behind a shared handle so callers can read them back.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    samples: Arc<Mutex<usize>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Number of samples observed.
    pub fn sample_count(&self) -> usize {
        self.samples.lock().map(|g| *g).unwrap_or(0)
    }
}

impl SimObserver for RecordingObserver {
    fn on_event(&mut self, entry: &LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.clone());
        }
    }

    fn on_sample(&mut self, _sample: &Sample) {
        if let Ok(mut n) = self.samples.lock() {
            *n += 1;
        }
    }
}
