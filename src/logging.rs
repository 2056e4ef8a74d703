//! Trial audit logging
//!
//! Every construction, reconfiguration, animation change and frame of a
//! star field is reported as a `(trial_id, key, value)` entry so that a
//! trial can be replayed afterwards. Sinks implement [`TrialLogger`].

use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;

pub trait TrialLogger: Send + Sync {
    /// Record one entry. Must not panic; sinks deal with their own failures.
    fn log(&self, trial_id: u64, key: &str, value: &Value);
}

/// Forwards audit entries to `tracing` under the `starshell::audit` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TrialLogger for TracingLogger {
    fn log(&self, trial_id: u64, key: &str, value: &Value) {
        tracing::info!(target: "starshell::audit", trial_id, key, %value);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub trial_id: u64,
    pub key: String,
    pub value: Value,
}

/// Keeps every entry in memory, in arrival order
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// All values recorded under `key`, oldest first
    pub fn values(&self, key: &str) -> Vec<Value> {
        self.entries()
            .into_iter()
            .filter(|e| e.key == key)
            .map(|e| e.value)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Entries as JSON lines, one object per line
    pub fn to_json_lines(&self) -> String {
        self.entries()
            .iter()
            .filter_map(|e| serde_json::to_string(e).ok())
            .map(|line| line + "\n")
            .collect()
    }
}

impl TrialLogger for MemoryLogger {
    fn log(&self, trial_id: u64, key: &str, value: &Value) {
        let entry = LogEntry {
            trial_id,
            key: key.to_string(),
            value: value.clone(),
        };
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

/// Optional sink plus the current trial id
///
/// With no sink attached every call is a no-op.
#[derive(Clone, Default)]
pub(crate) struct AuditLog {
    sink: Option<Arc<dyn TrialLogger>>,
    trial_id: u64,
}

impl AuditLog {
    pub fn set_sink(&mut self, sink: Option<Arc<dyn TrialLogger>>) {
        self.sink = sink;
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    pub fn trial_id(&self) -> u64 {
        self.trial_id
    }

    pub fn set_trial_id(&mut self, trial_id: u64) {
        self.trial_id = trial_id;
    }

    pub fn record<V: Serialize>(&self, key: &str, value: V) {
        let Some(sink) = &self.sink else {
            return;
        };
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        sink.log(self.trial_id, key, &value);
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog")
            .field("has_sink", &self.has_sink())
            .field("trial_id", &self.trial_id)
            .finish()
    }
}
