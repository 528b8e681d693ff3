//! Data persistence layer for the simulation core
//!
//! This module provides SQLite-based storage for scenarios, timeline events,
//! and branches behind narrow DAO stores.

mod branch;
mod database;
mod event;
mod migrations;
mod models;
mod scenario;
mod world_state;

pub use branch::BranchStore;
pub use database::{Database, DatabaseError};
pub use event::EventStore;
pub use models::{
    AgentConfig, Branch, PersonalityScore, PersonalityTraits, Scenario, ScenarioState,
    ScoreOutOfRange, TimelineEvent,
};
pub use scenario::ScenarioStore;
pub use world_state::{WorldState, WorldStateError, WorldValue, MAX_DEPTH};
