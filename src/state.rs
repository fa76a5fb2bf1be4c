use crate::config::Config;
use crate::models::{Employee, PayrollRun, PaySchedule, StatutoryRateTable, TimeOffRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process document store. Plays the role of the persistence collaborator:
/// the engine itself never touches it, handlers snapshot data out of it and
/// write results back. The single write lock gives finalize the
/// at-most-one-writer semantics it needs — it always validates exactly the
/// data it freezes.
#[derive(Default)]
pub struct Store {
    pub pay_schedule: Option<PaySchedule>,
    pub rate_table: StatutoryRateTable,
    pub employees: HashMap<Uuid, Employee>,
    pub time_off: Vec<TimeOffRequest>,
    /// Keyed by "YYYY-MM" period — at most one run per period.
    pub runs: HashMap<String, PayrollRun>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
            config: Arc::new(config),
        }
    }
}
