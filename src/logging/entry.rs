//! Structured log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }
}

/// A single structured log entry retained in the diagnostic buffer.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,
    /// Severity
    pub level: LogLevel,
    /// Component that produced the entry
    pub component: &'static str,
    /// Human-readable message
    pub message: String,
    /// Optional structured payload
    pub data: Option<serde_json::Value>,
    /// Elapsed time for timed operations, in milliseconds
    pub duration_ms: Option<u64>,
    /// Correlated scenario, when known
    pub scenario_id: Option<Uuid>,
    /// Correlated agent, when known
    pub agent_id: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, component: &'static str, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            component,
            message: message.into(),
            data: None,
            duration_ms: None,
            scenario_id: None,
            agent_id: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_scenario(mut self, scenario_id: Uuid) -> Self {
        self.scenario_id = Some(scenario_id);
        self
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }
}
