//! Data models for scenarios, timeline events, and branches

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use super::world_state::WorldState;
use crate::util::timestamp_ms;

/// Lifecycle state of a scenario.
///
/// Only `Created` is ever produced by this crate; the remaining states belong
/// to an external orchestrator and exist so persisted rows round-trip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioState {
    Created,
    Running,
    Paused,
    Completed,
}

impl ScenarioState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioState::Created => "created",
            ScenarioState::Running => "running",
            ScenarioState::Paused => "paused",
            ScenarioState::Completed => "completed",
        }
    }
}

impl FromStr for ScenarioState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(ScenarioState::Created),
            "running" => Ok(ScenarioState::Running),
            "paused" => Ok(ScenarioState::Paused),
            "completed" => Ok(ScenarioState::Completed),
            _ => Err(()),
        }
    }
}

/// Error raised when a personality trait score falls outside [0.0, 1.0].
#[derive(Error, Debug, Clone, PartialEq)]
#[error("personality score {0} is outside [0.0, 1.0]")]
pub struct ScoreOutOfRange(pub f64);

/// A single personality trait score, strictly within [0.0, 1.0].
///
/// The bound is enforced at construction and at deserialization; out-of-range
/// values are an error, never a clamp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "f64", into = "f64")]
pub struct PersonalityScore(f64);

impl PersonalityScore {
    pub fn new(value: f64) -> Result<Self, ScoreOutOfRange> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(ScoreOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// The exact stored value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for PersonalityScore {
    type Error = ScoreOutOfRange;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PersonalityScore> for f64 {
    fn from(score: PersonalityScore) -> f64 {
        score.0
    }
}

/// The five-factor trait vector attached to every agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalityTraits {
    pub openness: PersonalityScore,
    pub conscientiousness: PersonalityScore,
    pub extraversion: PersonalityScore,
    pub agreeableness: PersonalityScore,
    pub neuroticism: PersonalityScore,
}

impl PersonalityTraits {
    /// Build a trait vector from raw floats, failing if any score is out of range.
    pub fn new(
        openness: f64,
        conscientiousness: f64,
        extraversion: f64,
        agreeableness: f64,
        neuroticism: f64,
    ) -> Result<Self, ScoreOutOfRange> {
        Ok(Self {
            openness: PersonalityScore::new(openness)?,
            conscientiousness: PersonalityScore::new(conscientiousness)?,
            extraversion: PersonalityScore::new(extraversion)?,
            agreeableness: PersonalityScore::new(agreeableness)?,
            neuroticism: PersonalityScore::new(neuroticism)?,
        })
    }

    /// A mid-scale vector, handy for callers that don't care about traits.
    pub fn neutral() -> Self {
        Self {
            openness: PersonalityScore(0.5),
            conscientiousness: PersonalityScore(0.5),
            extraversion: PersonalityScore(0.5),
            agreeableness: PersonalityScore(0.5),
            neuroticism: PersonalityScore(0.5),
        }
    }
}

/// A participant definition within a scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// Caller-supplied identifier, unique within the scenario
    pub id: String,
    /// Human-readable role label
    pub role: String,
    /// Bounded five-factor trait vector
    pub personality: PersonalityTraits,
    /// Ordered goals, may be empty
    #[serde(default)]
    pub goals: Vec<String>,
}

impl AgentConfig {
    pub fn new(id: impl Into<String>, role: impl Into<String>, personality: PersonalityTraits) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            personality,
            goals: Vec::new(),
        }
    }

    pub fn with_goals(mut self, goals: Vec<String>) -> Self {
        self.goals = goals;
        self
    }
}

/// A simulation instance: agents, world state, and an event history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique identifier, assigned at creation and never reused
    pub id: Uuid,
    /// Display name (non-empty)
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Participants, insertion order preserved across reload
    pub agents: Vec<AgentConfig>,
    /// Opaque world context
    pub world_state: WorldState,
    /// Lifecycle state; always `Created` when produced here
    pub state: ScenarioState,
    /// Main-line events, populated lazily via the timeline service
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
    /// Identifiers of branches forked from this scenario
    #[serde(default)]
    pub branches: Vec<Uuid>,
    /// Simulation clock in epoch milliseconds
    pub current_time: i64,
    /// When the scenario was created
    pub created_at: DateTime<Utc>,
    /// Last time the scenario row was modified
    pub updated_at: DateTime<Utc>,
}

impl Scenario {
    /// Create a new scenario record with a fresh id and timestamps set to now.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        agents: Vec<AgentConfig>,
        world_state: WorldState,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            agents,
            world_state,
            state: ScenarioState::Created,
            events: Vec::new(),
            branches: Vec::new(),
            current_time: timestamp_ms(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// An immutable fact appended to a scenario's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEvent {
    /// Unique identifier across the whole store
    pub id: Uuid,
    /// Owning scenario
    pub scenario_id: Uuid,
    /// Event time in epoch milliseconds
    pub timestamp: i64,
    /// Weak reference to the originating agent (lookup only)
    pub agent_id: Option<String>,
    /// Event type tag
    pub event_type: String,
    /// Arbitrary JSON payload
    pub data: serde_json::Value,
    /// Owning branch; `None` for the main line
    pub branch_id: Option<Uuid>,
}

impl TimelineEvent {
    /// Create a main-line event with a fresh id.
    pub fn new(
        scenario_id: Uuid,
        timestamp: i64,
        event_type: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            scenario_id,
            timestamp,
            agent_id: None,
            event_type: event_type.into(),
            data,
            branch_id: None,
        }
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn on_branch(mut self, branch_id: Uuid) -> Self {
        self.branch_id = Some(branch_id);
        self
    }
}

/// A forked copy of a scenario's history at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    /// Unique identifier
    pub id: Uuid,
    /// The scenario being forked
    pub scenario_id: Uuid,
    /// Branch this fork was taken from; `None` when forked from the main line
    pub parent_branch_id: Option<Uuid>,
    /// Inclusive fork cutoff in epoch milliseconds
    pub branch_point: i64,
    /// Caller-supplied or derived name
    pub name: String,
    /// When the branch was created
    pub created_at: DateTime<Utc>,
}

impl Branch {
    /// Create a new branch record, deriving a UTC time-label name when none is given.
    pub fn new(
        scenario_id: Uuid,
        parent_branch_id: Option<Uuid>,
        branch_point: i64,
        name: Option<String>,
    ) -> Self {
        let name = name.unwrap_or_else(|| {
            let label = DateTime::<Utc>::from_timestamp_millis(branch_point)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_else(|| branch_point.to_string());
            format!("Branch at {}", label)
        });
        Self {
            id: Uuid::new_v4(),
            scenario_id,
            parent_branch_id,
            branch_point,
            name,
            created_at: Utc::now(),
        }
    }
}
