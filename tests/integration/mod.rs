//! Integration test modules

#[path = "../common/mod.rs"]
pub mod common;

pub mod branching;
pub mod concurrency;
pub mod scenario_flow;
