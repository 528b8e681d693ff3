//! Scenario creation flow: happy path, failure sentinels, and reload fidelity.

use super::common::{basic_params, sample_agents, test_core};
use chronicle::{CreateScenarioParams, LogLevel, LogService, ScenarioCore, ScenarioState};
use serde_json::json;

#[test]
fn valid_config_round_trips_through_creation() {
    let (_dir, core) = test_core();

    let params = CreateScenarioParams::new("summit", sample_agents(3))
        .with_description("three-party negotiation")
        .with_world_state(json!({ "location": "geneva", "stakes": 9 }));

    let scenario = core.create_scenario(params).expect("creation succeeds");

    assert_eq!(scenario.name, "summit");
    assert_eq!(scenario.description, "three-party negotiation");
    assert_eq!(scenario.agents.len(), 3);
    assert_eq!(scenario.state, ScenarioState::Created);
    assert!(scenario.events.is_empty());
    assert!(scenario.branches.is_empty());
    assert!(scenario.current_time > 0);

    // The persisted row deep-equals the returned record.
    let reloaded = core.scenario(scenario.id).expect("reload succeeds");
    assert_eq!(reloaded.name, scenario.name);
    assert_eq!(reloaded.agents, scenario.agents);
    assert_eq!(reloaded.world_state, scenario.world_state);
}

#[test]
fn empty_name_yields_sentinel() {
    let (_dir, core) = test_core();
    assert!(core.create_scenario(basic_params("")).is_none());
    assert!(core.create_scenario(basic_params("   ")).is_none());
}

#[test]
fn empty_agents_yields_sentinel() {
    let (_dir, core) = test_core();
    let params = CreateScenarioParams::new("no crew", vec![]);
    assert!(core.create_scenario(params).is_none());
}

#[test]
fn failures_are_logged_with_context() {
    let (_dir, core) = test_core();
    core.create_scenario(basic_params(""));

    let errors = core.logs().by_level(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].component, "scenario_engine");
    assert!(errors[0].message.contains("create_scenario"));
    assert_eq!(errors[0].data.as_ref().unwrap()["kind"], json!("validation"));
}

#[test]
fn unavailable_store_yields_sentinel_not_panic() {
    let core = ScenarioCore::detached(LogService::default());
    assert!(core.create_scenario(basic_params("orphaned")).is_none());

    let errors = core.logs().by_level(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].data.as_ref().unwrap()["kind"], json!("persistence"));
}

#[test]
fn pathological_world_state_yields_sentinel() {
    let (_dir, core) = test_core();

    // Nesting far past the depth guard stands in for the cyclic payloads the
    // typed tree makes unrepresentable.
    let mut value = json!(0);
    for _ in 0..200 {
        value = json!({ "next": value });
    }
    let params = basic_params("too deep").with_world_state(json!({ "chain": value }));

    assert!(core.create_scenario(params).is_none());
    let errors = core.logs().by_level(LogLevel::Error);
    assert_eq!(errors[0].data.as_ref().unwrap()["kind"], json!("serialization"));
}

#[test]
fn distinct_scenarios_get_distinct_ids() {
    let (_dir, core) = test_core();
    let a = core.create_scenario(basic_params("first")).unwrap();
    let b = core.create_scenario(basic_params("second")).unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn world_state_must_be_an_object() {
    let (_dir, core) = test_core();
    let params = basic_params("list world").with_world_state(json!([1, 2, 3]));
    assert!(core.create_scenario(params).is_none());
}
