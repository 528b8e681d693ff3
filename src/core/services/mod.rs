//! Scenario and timeline services
//!
//! Services carry the real operation logic and report failures through
//! [`ServiceError`]; the sentinel-shaped public API on `ScenarioCore` wraps
//! them in the error boundary.

mod error;
mod scenario_service;
mod timeline_service;

pub use error::ServiceError;
pub use scenario_service::{CreateScenarioParams, ScenarioService};
pub use timeline_service::{CreateBranchParams, RecordEventParams, TimelineService};
