//! Injected log service with a bounded retention buffer.
//!
//! Entries are forwarded to `tracing` for normal emission and additionally
//! kept in an in-memory ring so recent history stays queryable by level,
//! component, scenario, agent, or recency. The service is constructed by the
//! embedder and passed into the engine; there is no global singleton.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::entry::{LogEntry, LogLevel};
use crate::core::services::ServiceError;

/// Default number of entries retained before the oldest are evicted.
pub const DEFAULT_RETENTION: usize = 1000;

/// Component-scoped, leveled logging with timing helpers and the
/// error-boundary wrapper used at the public API.
#[derive(Clone)]
pub struct LogService {
    buffer: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl Default for LogService {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl LogService {
    /// Create a service retaining up to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(64)))),
            capacity: capacity.max(1),
        }
    }

    /// Record an entry: forward to `tracing` and retain it in the buffer.
    pub fn record(&self, entry: LogEntry) {
        self.forward_to_tracing(&entry);

        let mut buffer = self.buffer.lock();
        if buffer.len() == self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(entry);
    }

    fn forward_to_tracing(&self, entry: &LogEntry) {
        let scenario = entry.scenario_id.map(|id| id.to_string());
        match entry.level {
            LogLevel::Debug => tracing::debug!(
                component = entry.component,
                scenario_id = scenario.as_deref(),
                agent_id = entry.agent_id.as_deref(),
                duration_ms = entry.duration_ms,
                "{}",
                entry.message
            ),
            LogLevel::Info => tracing::info!(
                component = entry.component,
                scenario_id = scenario.as_deref(),
                agent_id = entry.agent_id.as_deref(),
                duration_ms = entry.duration_ms,
                "{}",
                entry.message
            ),
            LogLevel::Warn => tracing::warn!(
                component = entry.component,
                scenario_id = scenario.as_deref(),
                agent_id = entry.agent_id.as_deref(),
                duration_ms = entry.duration_ms,
                "{}",
                entry.message
            ),
            LogLevel::Error | LogLevel::Critical => tracing::error!(
                component = entry.component,
                scenario_id = scenario.as_deref(),
                agent_id = entry.agent_id.as_deref(),
                duration_ms = entry.duration_ms,
                critical = entry.level == LogLevel::Critical,
                "{}",
                entry.message
            ),
        }
    }

    /// Convenience: record a plain info entry.
    pub fn info(&self, component: &'static str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Info, component, message));
    }

    /// Convenience: record a plain debug entry.
    pub fn debug(&self, component: &'static str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Debug, component, message));
    }

    /// Convenience: record a plain warn entry.
    pub fn warn(&self, component: &'static str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Warn, component, message));
    }

    /// Convenience: record a plain error entry.
    pub fn error(&self, component: &'static str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Error, component, message));
    }

    /// The `n` most recent entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<LogEntry> {
        let buffer = self.buffer.lock();
        let skip = buffer.len().saturating_sub(n);
        buffer.iter().skip(skip).cloned().collect()
    }

    /// All retained entries at the given level.
    pub fn by_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.buffer
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    /// All retained entries from the given component.
    pub fn by_component(&self, component: &str) -> Vec<LogEntry> {
        self.buffer
            .lock()
            .iter()
            .filter(|e| e.component == component)
            .cloned()
            .collect()
    }

    /// All retained entries correlated with the given scenario.
    pub fn by_scenario(&self, scenario_id: Uuid) -> Vec<LogEntry> {
        self.buffer
            .lock()
            .iter()
            .filter(|e| e.scenario_id == Some(scenario_id))
            .cloned()
            .collect()
    }

    /// All retained entries correlated with the given agent.
    pub fn by_agent(&self, agent_id: &str) -> Vec<LogEntry> {
        self.buffer
            .lock()
            .iter()
            .filter(|e| e.agent_id.as_deref() == Some(agent_id))
            .cloned()
            .collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Drop all retained entries.
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }

    /// Start a timer for an operation; finishing it records an info entry
    /// carrying the elapsed duration.
    pub fn start_timer(&self, component: &'static str, operation: &'static str) -> OperationTimer {
        OperationTimer {
            logs: self.clone(),
            component,
            operation,
            started: Instant::now(),
        }
    }

    /// Run `f` inside the error boundary.
    ///
    /// On success the result is returned as `Some`; on failure the error is
    /// recorded with component/operation/scenario context and elapsed
    /// duration, and `None` is returned. No error crosses this call.
    pub fn with_error_boundary<T>(
        &self,
        component: &'static str,
        operation: &'static str,
        scenario_id: Option<Uuid>,
        f: impl FnOnce() -> Result<T, ServiceError>,
    ) -> Option<T> {
        let started = Instant::now();
        match f() {
            Ok(value) => Some(value),
            Err(err) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let mut entry = LogEntry::new(
                    LogLevel::Error,
                    component,
                    format!("{} failed: {}", operation, err),
                )
                .with_duration_ms(elapsed_ms)
                .with_data(serde_json::json!({
                    "operation": operation,
                    "kind": err.kind(),
                }));
                if let Some(id) = scenario_id {
                    entry = entry.with_scenario(id);
                }
                self.record(entry);
                None
            }
        }
    }
}

/// Completion handle returned by [`LogService::start_timer`].
pub struct OperationTimer {
    logs: LogService,
    component: &'static str,
    operation: &'static str,
    started: Instant,
}

impl OperationTimer {
    /// Record the elapsed duration and return it.
    pub fn finish(self) -> Duration {
        let elapsed = self.started.elapsed();
        self.logs.record(
            LogEntry::new(
                LogLevel::Info,
                self.component,
                format!("{} completed", self.operation),
            )
            .with_duration_ms(elapsed.as_millis() as u64),
        );
        elapsed
    }
}
