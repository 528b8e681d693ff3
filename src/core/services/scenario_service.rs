//! Scenario creation and lookup

use std::collections::HashSet;

use crate::core::services::error::ServiceError;
use crate::core::ScenarioCore;
use crate::data::{AgentConfig, Scenario, WorldState};
use uuid::Uuid;

/// Input for [`ScenarioService::create_scenario`].
#[derive(Debug, Clone)]
pub struct CreateScenarioParams {
    /// Display name; must be non-empty after trimming
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Participants; at least one, ids unique within the scenario
    pub agents: Vec<AgentConfig>,
    /// Caller-supplied world context, converted through the typed payload
    pub world_state: serde_json::Value,
}

impl CreateScenarioParams {
    pub fn new(name: impl Into<String>, agents: Vec<AgentConfig>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            agents,
            world_state: serde_json::Value::Null,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_world_state(mut self, world_state: serde_json::Value) -> Self {
        self.world_state = world_state;
        self
    }
}

pub struct ScenarioService;

impl ScenarioService {
    /// Validate and persist a new scenario.
    ///
    /// All validation happens before any store I/O, and the agents plus world
    /// state are serialized exactly once on the way into the `config` column.
    pub fn create_scenario(
        core: &ScenarioCore,
        params: CreateScenarioParams,
    ) -> Result<Scenario, ServiceError> {
        Self::validate(&params)?;

        // Depth-guarded conversion; rejects pathological payloads up front.
        let world_state = WorldState::from_value(&params.world_state)?;

        let store = core.scenario_store().ok_or(ServiceError::Unavailable)?;
        let scenario = Scenario::new(
            params.name.trim().to_string(),
            params.description,
            params.agents,
            world_state,
        );
        store.create(&scenario)?;

        core.logs().record(
            crate::logging::LogEntry::new(
                crate::logging::LogLevel::Info,
                ScenarioCore::COMPONENT_ENGINE,
                "scenario created",
            )
            .with_scenario(scenario.id)
            .with_data(serde_json::json!({ "agents": scenario.agents.len() })),
        );

        Ok(scenario)
    }

    /// Reload a scenario record together with its branch ids.
    pub fn get_scenario(core: &ScenarioCore, id: Uuid) -> Result<Scenario, ServiceError> {
        let store = core.scenario_store().ok_or(ServiceError::Unavailable)?;
        let mut scenario = store
            .get_by_id(id)?
            .ok_or_else(|| ServiceError::Validation(format!("unknown scenario {}", id)))?;

        let branches = core.branch_store().ok_or(ServiceError::Unavailable)?;
        scenario.branches = branches
            .get_by_scenario(id)?
            .into_iter()
            .map(|b| b.id)
            .collect();

        Ok(scenario)
    }

    fn validate(params: &CreateScenarioParams) -> Result<(), ServiceError> {
        if params.name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "scenario name must not be empty".to_string(),
            ));
        }
        if params.agents.is_empty() {
            return Err(ServiceError::Validation(
                "scenario requires at least one agent".to_string(),
            ));
        }

        // Single pass over the agents: empty ids and duplicates in one sweep.
        let mut seen = HashSet::with_capacity(params.agents.len());
        for agent in &params.agents {
            if agent.id.is_empty() {
                return Err(ServiceError::Validation(
                    "agent id must not be empty".to_string(),
                ));
            }
            if !seen.insert(agent.id.as_str()) {
                return Err(ServiceError::Validation(format!(
                    "duplicate agent id '{}'",
                    agent.id
                )));
            }
        }
        Ok(())
    }
}
