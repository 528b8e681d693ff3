pub mod core;
pub mod data;
pub mod logging;
pub mod util;

pub use crate::core::services::{
    CreateBranchParams, CreateScenarioParams, RecordEventParams, ScenarioService, ServiceError,
    TimelineService,
};
pub use crate::core::ScenarioCore;
pub use data::{
    AgentConfig, Branch, Database, DatabaseError, PersonalityScore, PersonalityTraits, Scenario,
    ScenarioState, TimelineEvent, WorldState, WorldValue,
};
pub use logging::{init_tracing, LogEntry, LogLevel, LogService};
pub use util::{new_uuid, timestamp_ms};
