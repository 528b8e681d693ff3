//! Timeline reads and branch fork semantics.

use super::common::{basic_params, test_core};
use chronicle::{CreateBranchParams, RecordEventParams};
use serde_json::json;
use uuid::Uuid;

#[test]
fn timeline_read_is_idempotent() {
    let (_dir, core) = test_core();
    let scenario = core.create_scenario(basic_params("steady")).unwrap();

    for ts in [10, 20, 30] {
        core.record_event(
            RecordEventParams::new(scenario.id, ts, "tick").with_data(json!({ "t": ts })),
        )
        .unwrap();
    }

    let first = core.timeline(scenario.id, None);
    let second = core.timeline(scenario.id, None);
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn branch_contains_exactly_events_up_to_cutoff() {
    let (_dir, core) = test_core();
    let scenario = core.create_scenario(basic_params("fork me")).unwrap();

    for ts in [1, 2, 3, 4] {
        core.record_event(RecordEventParams::new(scenario.id, ts, "tick"))
            .unwrap();
    }

    let branch = core
        .create_branch(CreateBranchParams::new(scenario.id, 2))
        .expect("fork succeeds");

    let branched = core.timeline(scenario.id, Some(branch.id));
    let stamps: Vec<i64> = branched.iter().map(|e| e.timestamp).collect();
    assert_eq!(stamps, vec![1, 2]);

    // Copies, not references: new ids, correct branch tag.
    let main = core.timeline(scenario.id, None);
    for copy in &branched {
        assert_eq!(copy.branch_id, Some(branch.id));
        assert!(main.iter().all(|orig| orig.id != copy.id));
    }
}

#[test]
fn post_fork_appends_never_cross_lines() {
    let (_dir, core) = test_core();
    let scenario = core.create_scenario(basic_params("isolation")).unwrap();

    for ts in [1, 2, 3, 4] {
        core.record_event(RecordEventParams::new(scenario.id, ts, "tick"))
            .unwrap();
    }
    let branch = core
        .create_branch(CreateBranchParams::new(scenario.id, 2))
        .unwrap();

    core.record_event(RecordEventParams::new(scenario.id, 5, "main-only"))
        .unwrap();
    core.record_event(RecordEventParams::new(scenario.id, 6, "branch-only").on_branch(branch.id))
        .unwrap();

    let main = core.timeline(scenario.id, None);
    assert_eq!(main.len(), 5);
    assert!(main.iter().all(|e| e.event_type != "branch-only"));

    let branched = core.timeline(scenario.id, Some(branch.id));
    assert_eq!(branched.len(), 3);
    assert!(branched.iter().all(|e| e.event_type != "main-only"));
}

#[test]
fn branch_of_unknown_scenario_yields_sentinel() {
    let (_dir, core) = test_core();
    assert!(core
        .create_branch(CreateBranchParams::new(Uuid::new_v4(), 10))
        .is_none());
}

#[test]
fn branch_names_default_and_override() {
    let (_dir, core) = test_core();
    let scenario = core.create_scenario(basic_params("names")).unwrap();

    let derived = core
        .create_branch(CreateBranchParams::new(scenario.id, 0))
        .unwrap();
    assert!(derived.name.starts_with("Branch at "));

    let named = core
        .create_branch(CreateBranchParams::new(scenario.id, 0).with_name("counterfactual"))
        .unwrap();
    assert_eq!(named.name, "counterfactual");
}

#[test]
fn forking_a_branch_copies_its_divergence() {
    let (_dir, core) = test_core();
    let scenario = core.create_scenario(basic_params("nested")).unwrap();

    for ts in [1, 2] {
        core.record_event(RecordEventParams::new(scenario.id, ts, "tick"))
            .unwrap();
    }
    let first = core
        .create_branch(CreateBranchParams::new(scenario.id, 2))
        .unwrap();
    core.record_event(
        RecordEventParams::new(scenario.id, 3, "divergence").on_branch(first.id),
    )
    .unwrap();

    let second = core
        .create_branch(CreateBranchParams::new(scenario.id, 3).from_branch(first.id))
        .unwrap();
    assert_eq!(second.parent_branch_id, Some(first.id));

    let nested = core.timeline(scenario.id, Some(second.id));
    assert_eq!(nested.len(), 3);
    assert_eq!(nested.last().unwrap().event_type, "divergence");
}

#[test]
fn event_agent_reference_survives_fork() {
    let (_dir, core) = test_core();
    let scenario = core.create_scenario(basic_params("attribution")).unwrap();

    core.record_event(
        RecordEventParams::new(scenario.id, 1, "speech")
            .with_agent("agent-0")
            .with_data(json!({ "text": "hello" })),
    )
    .unwrap();

    let branch = core
        .create_branch(CreateBranchParams::new(scenario.id, 1))
        .unwrap();
    let branched = core.timeline(scenario.id, Some(branch.id));
    assert_eq!(branched[0].agent_id.as_deref(), Some("agent-0"));
    assert_eq!(branched[0].data, json!({ "text": "hello" }));
}
