//! Branch data access object

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::models::Branch;

/// Data access object for branch operations
#[derive(Clone)]
pub struct BranchStore {
    conn: Arc<Mutex<Connection>>,
}

impl BranchStore {
    /// Create a new BranchStore
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Register a branch, copy its seed events, and bump the owning
    /// scenario's `updated_at`, all in one transaction.
    ///
    /// Every event on the source line (the parent branch, or the main line when
    /// `parent_branch_id` is `None`) with `timestamp <= branch_point` is
    /// re-inserted under a fresh id with `branch_id` set to the new branch.
    /// The transaction runs while holding the connection lock, so a fork at
    /// time T contains exactly the source-line events with `timestamp <= T`
    /// present at the moment of the fork and never picks up later appends.
    /// Either everything lands or nothing does; a failed fork leaves no
    /// partial state behind.
    ///
    /// Returns the number of copied events.
    pub fn create_with_copied_events(&self, branch: &Branch) -> SqliteResult<usize> {
        let conn = self.conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO branches (id, scenario_id, parent_branch_id, branch_point, name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                branch.id.to_string(),
                branch.scenario_id.to_string(),
                branch.parent_branch_id.map(|id| id.to_string()),
                branch.branch_point,
                branch.name,
                branch.created_at.to_rfc3339(),
            ],
        )?;

        // Copies, not references: each seed event gets its own row and id so
        // the branch and its source line never interact after the fork.
        let copied = {
            let mut select = match branch.parent_branch_id {
                Some(_) => tx.prepare(
                    "SELECT scenario_id, timestamp, agent_id, event_type, data
                     FROM timeline_events
                     WHERE scenario_id = ?1 AND branch_id = ?2 AND timestamp <= ?3
                     ORDER BY timestamp ASC",
                )?,
                None => tx.prepare(
                    "SELECT scenario_id, timestamp, agent_id, event_type, data
                     FROM timeline_events
                     WHERE scenario_id = ?1 AND branch_id IS NULL AND timestamp <= ?2
                     ORDER BY timestamp ASC",
                )?,
            };
            let mut insert = tx.prepare(
                "INSERT INTO timeline_events (id, scenario_id, timestamp, agent_id, event_type, data, branch_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;

            let mut rows = match branch.parent_branch_id {
                Some(parent) => select.query(params![
                    branch.scenario_id.to_string(),
                    parent.to_string(),
                    branch.branch_point,
                ])?,
                None => select.query(params![
                    branch.scenario_id.to_string(),
                    branch.branch_point,
                ])?,
            };

            let mut copied = 0usize;
            while let Some(row) = rows.next()? {
                let scenario_id: String = row.get(0)?;
                let timestamp: i64 = row.get(1)?;
                let agent_id: Option<String> = row.get(2)?;
                let event_type: String = row.get(3)?;
                let data: String = row.get(4)?;
                insert.execute(params![
                    Uuid::new_v4().to_string(),
                    scenario_id,
                    timestamp,
                    agent_id,
                    event_type,
                    data,
                    branch.id.to_string(),
                ])?;
                copied += 1;
            }
            copied
        };

        tx.execute(
            "UPDATE scenarios SET updated_at = ?2 WHERE id = ?1",
            params![
                branch.scenario_id.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        tx.commit()?;
        Ok(copied)
    }

    /// Get a branch by ID
    pub fn get_by_id(&self, id: Uuid) -> SqliteResult<Option<Branch>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, scenario_id, parent_branch_id, branch_point, name, created_at
             FROM branches WHERE id = ?1",
        )?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::row_to_branch(row)?))
        } else {
            Ok(None)
        }
    }

    /// All branches forked from a scenario, oldest first.
    pub fn get_by_scenario(&self, scenario_id: Uuid) -> SqliteResult<Vec<Branch>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, scenario_id, parent_branch_id, branch_point, name, created_at
             FROM branches WHERE scenario_id = ?1 ORDER BY created_at ASC",
        )?;

        let branches = stmt
            .query_map(params![scenario_id.to_string()], Self::row_to_branch)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(branches)
    }

    /// Convert a database row to a Branch
    fn row_to_branch(row: &rusqlite::Row) -> SqliteResult<Branch> {
        let id_str: String = row.get(0)?;
        let scenario_id_str: String = row.get(1)?;
        let parent_str: Option<String> = row.get(2)?;
        let created_at_str: String = row.get(5)?;

        Ok(Branch {
            id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
            scenario_id: Uuid::parse_str(&scenario_id_str).unwrap_or_else(|_| Uuid::new_v4()),
            parent_branch_id: parent_str.and_then(|s| Uuid::parse_str(&s).ok()),
            branch_point: row.get(3)?,
            name: row.get(4)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}
