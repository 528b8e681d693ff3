//! Core infrastructure owning the store adapter and log service.

use uuid::Uuid;

use crate::core::services::{
    CreateBranchParams, CreateScenarioParams, RecordEventParams, ScenarioService, TimelineService,
};
use crate::data::{Branch, BranchStore, Database, EventStore, Scenario, ScenarioStore, TimelineEvent};
use crate::logging::LogService;

/// The embeddable simulation core.
///
/// Owns the database connection, the DAO stores, and the injected log
/// service. Public operations never propagate an internal error: each one
/// runs inside the error boundary, which logs the failure with component,
/// operation, and scenario context and converts it to the sentinel (`None`,
/// or an empty timeline).
pub struct ScenarioCore {
    /// Database connection (owned to keep the connection alive)
    _database: Option<Database>,
    /// Scenario DAO
    scenario_store: Option<ScenarioStore>,
    /// Timeline event DAO
    event_store: Option<EventStore>,
    /// Branch DAO
    branch_store: Option<BranchStore>,
    /// Injected log service
    logs: LogService,
}

impl ScenarioCore {
    pub const COMPONENT_ENGINE: &'static str = "scenario_engine";
    pub const COMPONENT_TIMELINE: &'static str = "timeline_manager";

    /// Create a core backed by the given database.
    pub fn new(database: Database, logs: LogService) -> Self {
        let scenario_store = ScenarioStore::new(database.connection());
        let event_store = EventStore::new(database.connection());
        let branch_store = BranchStore::new(database.connection());
        Self {
            _database: Some(database),
            scenario_store: Some(scenario_store),
            event_store: Some(event_store),
            branch_store: Some(branch_store),
            logs,
        }
    }

    /// Create a core backed by the database at the default location.
    ///
    /// When the database cannot be opened the core still constructs; every
    /// operation then fails with the logged sentinel, matching the
    /// store-unavailable contract.
    pub fn open_default(logs: LogService) -> Self {
        match Database::open_default() {
            Ok(db) => Self::new(db, logs),
            Err(e) => {
                logs.error(
                    Self::COMPONENT_ENGINE,
                    format!("failed to open database: {}", e),
                );
                Self::detached(logs)
            }
        }
    }

    /// Create a core with no database attached.
    pub fn detached(logs: LogService) -> Self {
        Self {
            _database: None,
            scenario_store: None,
            event_store: None,
            branch_store: None,
            logs,
        }
    }

    /// Scenario DAO, when a database is attached
    pub fn scenario_store(&self) -> Option<&ScenarioStore> {
        self.scenario_store.as_ref()
    }

    /// Event DAO, when a database is attached
    pub fn event_store(&self) -> Option<&EventStore> {
        self.event_store.as_ref()
    }

    /// Branch DAO, when a database is attached
    pub fn branch_store(&self) -> Option<&BranchStore> {
        self.branch_store.as_ref()
    }

    /// The injected log service
    pub fn logs(&self) -> &LogService {
        &self.logs
    }

    /// Validate and persist a new scenario; `None` on any failure (logged).
    pub fn create_scenario(&self, params: CreateScenarioParams) -> Option<Scenario> {
        let timer = self.logs.start_timer(Self::COMPONENT_ENGINE, "create_scenario");
        let result = self
            .logs
            .with_error_boundary(Self::COMPONENT_ENGINE, "create_scenario", None, || {
                ScenarioService::create_scenario(self, params)
            });
        timer.finish();
        result
    }

    /// Reload a scenario with its branch ids; `None` when missing or on failure.
    pub fn scenario(&self, id: Uuid) -> Option<Scenario> {
        self.logs
            .with_error_boundary(Self::COMPONENT_ENGINE, "get_scenario", Some(id), || {
                ScenarioService::get_scenario(self, id)
            })
    }

    /// Append an event; `None` on failure (logged).
    pub fn record_event(&self, params: RecordEventParams) -> Option<TimelineEvent> {
        let scenario_id = params.scenario_id;
        self.logs.with_error_boundary(
            Self::COMPONENT_TIMELINE,
            "record_event",
            Some(scenario_id),
            || TimelineService::record_event(self, params),
        )
    }

    /// The ordered events for one line of a scenario; empty on failure (logged).
    pub fn timeline(&self, scenario_id: Uuid, branch_id: Option<Uuid>) -> Vec<TimelineEvent> {
        self.logs
            .with_error_boundary(
                Self::COMPONENT_TIMELINE,
                "get_timeline",
                Some(scenario_id),
                || TimelineService::timeline(self, scenario_id, branch_id),
            )
            .unwrap_or_default()
    }

    /// Fork a scenario's history at a point in time; `None` on failure (logged).
    pub fn create_branch(&self, params: CreateBranchParams) -> Option<Branch> {
        let scenario_id = params.scenario_id;
        let timer = self
            .logs
            .start_timer(Self::COMPONENT_TIMELINE, "create_branch");
        let result = self
            .logs
            .with_error_boundary(
                Self::COMPONENT_TIMELINE,
                "create_branch",
                Some(scenario_id),
                || TimelineService::create_branch(self, params).map(|(branch, _)| branch),
            );
        timer.finish();
        result
    }
}
