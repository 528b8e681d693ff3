//! Shared test utilities
//!
//! Helpers for standing up a temp-database-backed core and building
//! well-formed scenario configurations.

use chronicle::data::Database;
use chronicle::{AgentConfig, CreateScenarioParams, LogService, PersonalityTraits, ScenarioCore};
use tempfile::TempDir;

/// A core backed by a fresh database in a temp directory.
///
/// The TempDir must stay alive for the duration of the test.
pub fn test_core() -> (TempDir, ScenarioCore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Database::open(dir.path().join("test.db")).expect("open database");
    let core = ScenarioCore::new(db, LogService::default());
    (dir, core)
}

/// `n` agents with distinct ids and neutral traits.
pub fn sample_agents(n: usize) -> Vec<AgentConfig> {
    (0..n)
        .map(|i| {
            AgentConfig::new(
                format!("agent-{}", i),
                format!("role-{}", i),
                PersonalityTraits::neutral(),
            )
        })
        .collect()
}

/// A minimal valid single-agent configuration.
pub fn basic_params(name: &str) -> CreateScenarioParams {
    CreateScenarioParams::new(name, sample_agents(1))
}
