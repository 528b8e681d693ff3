//! Scenario data access object

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::models::{AgentConfig, Scenario, ScenarioState};
use super::world_state::WorldState;

/// The serialized payload stored in the `config` column.
#[derive(Serialize, Deserialize)]
struct ScenarioConfig {
    agents: Vec<AgentConfig>,
    world_state: WorldState,
}

/// Data access object for scenario operations
#[derive(Clone)]
pub struct ScenarioStore {
    conn: Arc<Mutex<Connection>>,
}

impl ScenarioStore {
    /// Create a new ScenarioStore
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Insert a new scenario.
    ///
    /// The agents and world state are serialized into the `config` column in a
    /// single pass; the caller is expected to have validated the record.
    pub fn create(&self, scenario: &Scenario) -> SqliteResult<()> {
        let config = serde_json::to_string(&ScenarioConfig {
            agents: scenario.agents.clone(),
            world_state: scenario.world_state.clone(),
        })
        .map_err(|e| {
            rusqlite::Error::ToSqlConversionFailure(Box::new(e))
        })?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO scenarios (id, name, description, config, state, sim_time, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                scenario.id.to_string(),
                scenario.name,
                scenario.description,
                config,
                scenario.state.as_str(),
                scenario.current_time,
                scenario.created_at.to_rfc3339(),
                scenario.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a scenario by ID.
    ///
    /// The returned record has empty `events` and `branches`; both are
    /// populated lazily by the timeline service.
    pub fn get_by_id(&self, id: Uuid) -> SqliteResult<Option<Scenario>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, config, state, sim_time, created_at, updated_at
             FROM scenarios WHERE id = ?1",
        )?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::row_to_scenario(row)?))
        } else {
            Ok(None)
        }
    }

    /// Number of persisted scenarios.
    pub fn count(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM scenarios", [], |row| row.get(0))
    }

    /// Convert a database row to a Scenario
    fn row_to_scenario(row: &rusqlite::Row) -> SqliteResult<Scenario> {
        let id_str: String = row.get(0)?;
        let config_str: String = row.get(3)?;
        let state_str: String = row.get(4)?;
        let created_at_str: String = row.get(6)?;
        let updated_at_str: String = row.get(7)?;

        let config: ScenarioConfig = serde_json::from_str(&config_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Scenario {
            id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
            name: row.get(1)?,
            description: row.get(2)?,
            agents: config.agents,
            world_state: config.world_state,
            state: ScenarioState::from_str(&state_str).unwrap_or(ScenarioState::Created),
            events: Vec::new(),
            branches: Vec::new(),
            current_time: row.get(5)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}
