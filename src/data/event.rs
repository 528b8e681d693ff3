//! Timeline event data access object

use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::models::TimelineEvent;

/// Data access object for timeline event operations.
///
/// Events are append-only: there is no update or delete path.
#[derive(Clone)]
pub struct EventStore {
    conn: Arc<Mutex<Connection>>,
}

impl EventStore {
    /// Create a new EventStore
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Append a single event row.
    pub fn insert(&self, event: &TimelineEvent) -> SqliteResult<()> {
        let data = event.data.to_string();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO timeline_events (id, scenario_id, timestamp, agent_id, event_type, data, branch_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                event.id.to_string(),
                event.scenario_id.to_string(),
                event.timestamp,
                event.agent_id,
                event.event_type,
                data,
                event.branch_id.map(|id| id.to_string()),
            ],
        )?;
        Ok(())
    }

    /// All events for a scenario on the given line, ordered by timestamp ascending.
    ///
    /// `branch_id = None` selects the main line. The result is a finite
    /// snapshot; callers re-invoke to observe later appends.
    pub fn query_by_scenario(
        &self,
        scenario_id: Uuid,
        branch_id: Option<Uuid>,
    ) -> SqliteResult<Vec<TimelineEvent>> {
        let conn = self.conn.lock().unwrap();
        match branch_id {
            Some(branch) => {
                let mut stmt = conn.prepare(
                    "SELECT id, scenario_id, timestamp, agent_id, event_type, data, branch_id
                     FROM timeline_events
                     WHERE scenario_id = ?1 AND branch_id = ?2
                     ORDER BY timestamp ASC",
                )?;
                let events = stmt
                    .query_map(
                        params![scenario_id.to_string(), branch.to_string()],
                        Self::row_to_event,
                    )?
                    .collect::<SqliteResult<Vec<_>>>()?;
                Ok(events)
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, scenario_id, timestamp, agent_id, event_type, data, branch_id
                     FROM timeline_events
                     WHERE scenario_id = ?1 AND branch_id IS NULL
                     ORDER BY timestamp ASC",
                )?;
                let events = stmt
                    .query_map(params![scenario_id.to_string()], Self::row_to_event)?
                    .collect::<SqliteResult<Vec<_>>>()?;
                Ok(events)
            }
        }
    }

    /// Number of events on a line.
    pub fn count_by_branch(&self, scenario_id: Uuid, branch_id: Option<Uuid>) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        match branch_id {
            Some(branch) => conn.query_row(
                "SELECT COUNT(*) FROM timeline_events WHERE scenario_id = ?1 AND branch_id = ?2",
                params![scenario_id.to_string(), branch.to_string()],
                |row| row.get(0),
            ),
            None => conn.query_row(
                "SELECT COUNT(*) FROM timeline_events WHERE scenario_id = ?1 AND branch_id IS NULL",
                params![scenario_id.to_string()],
                |row| row.get(0),
            ),
        }
    }

    /// Convert a database row to a TimelineEvent
    pub(super) fn row_to_event(row: &rusqlite::Row) -> SqliteResult<TimelineEvent> {
        let id_str: String = row.get(0)?;
        let scenario_id_str: String = row.get(1)?;
        let data_str: String = row.get(5)?;
        let branch_id_str: Option<String> = row.get(6)?;

        Ok(TimelineEvent {
            id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
            scenario_id: Uuid::parse_str(&scenario_id_str).unwrap_or_else(|_| Uuid::new_v4()),
            timestamp: row.get(2)?,
            agent_id: row.get(3)?,
            event_type: row.get(4)?,
            data: serde_json::from_str(&data_str).unwrap_or(serde_json::Value::Null),
            branch_id: branch_id_str.and_then(|s| Uuid::parse_str(&s).ok()),
        })
    }
}
