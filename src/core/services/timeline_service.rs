//! Timeline appends, reads, and branch forking

use uuid::Uuid;

use crate::core::services::error::ServiceError;
use crate::core::ScenarioCore;
use crate::data::{Branch, TimelineEvent};

/// Input for [`TimelineService::record_event`].
#[derive(Debug, Clone)]
pub struct RecordEventParams {
    pub scenario_id: Uuid,
    /// Event time in epoch milliseconds
    pub timestamp: i64,
    /// Originating agent, if any (weak reference)
    pub agent_id: Option<String>,
    pub event_type: String,
    pub data: serde_json::Value,
    /// Target line; `None` appends to the main line
    pub branch_id: Option<Uuid>,
}

impl RecordEventParams {
    pub fn new(scenario_id: Uuid, timestamp: i64, event_type: impl Into<String>) -> Self {
        Self {
            scenario_id,
            timestamp,
            agent_id: None,
            event_type: event_type.into(),
            data: serde_json::Value::Null,
            branch_id: None,
        }
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn on_branch(mut self, branch_id: Uuid) -> Self {
        self.branch_id = Some(branch_id);
        self
    }
}

/// Input for [`TimelineService::create_branch`].
#[derive(Debug, Clone)]
pub struct CreateBranchParams {
    pub scenario_id: Uuid,
    /// Inclusive fork cutoff in epoch milliseconds
    pub branch_point: i64,
    /// Line to fork from; `None` forks the main line
    pub parent_branch_id: Option<Uuid>,
    /// Caller-supplied name; a UTC time label is derived when absent
    pub name: Option<String>,
}

impl CreateBranchParams {
    pub fn new(scenario_id: Uuid, branch_point: i64) -> Self {
        Self {
            scenario_id,
            branch_point,
            parent_branch_id: None,
            name: None,
        }
    }

    pub fn from_branch(mut self, parent_branch_id: Uuid) -> Self {
        self.parent_branch_id = Some(parent_branch_id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

pub struct TimelineService;

impl TimelineService {
    /// Append a single event.
    ///
    /// This is the hot path: required-field presence only, no further
    /// validation, one insert statement.
    pub fn record_event(
        core: &ScenarioCore,
        params: RecordEventParams,
    ) -> Result<TimelineEvent, ServiceError> {
        if params.event_type.is_empty() {
            return Err(ServiceError::Validation(
                "event type must not be empty".to_string(),
            ));
        }

        let store = core.event_store().ok_or(ServiceError::Unavailable)?;
        let mut event = TimelineEvent::new(
            params.scenario_id,
            params.timestamp,
            params.event_type,
            params.data,
        );
        event.agent_id = params.agent_id;
        event.branch_id = params.branch_id;

        store.insert(&event)?;
        Ok(event)
    }

    /// All events for a scenario on one line, timestamp-ascending.
    pub fn timeline(
        core: &ScenarioCore,
        scenario_id: Uuid,
        branch_id: Option<Uuid>,
    ) -> Result<Vec<TimelineEvent>, ServiceError> {
        let store = core.event_store().ok_or(ServiceError::Unavailable)?;
        Ok(store.query_by_scenario(scenario_id, branch_id)?)
    }

    /// Fork a scenario's history at a point in time.
    ///
    /// The branch row, the value-copies of every source-line event with
    /// `timestamp <= branch_point`, and the scenario's `updated_at` bump are
    /// written in a single transaction, so concurrent appends can land
    /// strictly before or strictly after the fork but never inside it, and a
    /// failed fork persists nothing. Returns the branch and the number of
    /// copied events.
    pub fn create_branch(
        core: &ScenarioCore,
        params: CreateBranchParams,
    ) -> Result<(Branch, usize), ServiceError> {
        let scenarios = core.scenario_store().ok_or(ServiceError::Unavailable)?;
        if scenarios.get_by_id(params.scenario_id)?.is_none() {
            return Err(ServiceError::Validation(format!(
                "unknown scenario {}",
                params.scenario_id
            )));
        }

        let branches = core.branch_store().ok_or(ServiceError::Unavailable)?;
        let branch = Branch::new(
            params.scenario_id,
            params.parent_branch_id,
            params.branch_point,
            params.name,
        );
        let copied = branches.create_with_copied_events(&branch)?;

        core.logs().record(
            crate::logging::LogEntry::new(
                crate::logging::LogLevel::Info,
                ScenarioCore::COMPONENT_TIMELINE,
                "branch created",
            )
            .with_scenario(branch.scenario_id)
            .with_data(serde_json::json!({
                "branch_id": branch.id,
                "branch_point": branch.branch_point,
                "copied_events": copied,
            })),
        );

        Ok((branch, copied))
    }
}
