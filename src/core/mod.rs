//! Core module containing the engine façade and its services.
//!
//! - `ScenarioCore`: owns the database, DAO stores, and log service, and
//!   exposes the sentinel-shaped public operations
//! - `services`: the scenario and timeline services with the internal
//!   error taxonomy

mod scenario_core;
pub mod services;

pub use scenario_core::ScenarioCore;
