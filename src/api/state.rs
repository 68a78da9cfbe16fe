use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::config::SchedulerConfig;
use crate::models::{Schedule, ScheduleId};

/// A schedule held by the server.
#[derive(Debug, Clone)]
pub struct StoredSchedule {
    pub schedule: Schedule,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredSchedule {
    pub fn new(schedule: Schedule) -> Self {
        let now = Utc::now();
        Self {
            schedule,
            created_at: now,
            updated_at: now,
        }
    }
}

pub type ScheduleStore = Arc<RwLock<HashMap<ScheduleId, StoredSchedule>>>;

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<SchedulerConfig>,
    pub schedules: ScheduleStore,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(scheduler: SchedulerConfig, cors_origin: impl Into<String>) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
            schedules: Arc::new(RwLock::new(HashMap::new())),
            cors_origin: cors_origin.into(),
        }
    }
}
