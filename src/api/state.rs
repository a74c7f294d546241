use std::sync::Arc;

use crate::booking::{CalendarSource, Snapshot};
use crate::core::AppConfig;

pub struct AppState {
    // Latest resolved booking, replaced after every successful refresh
    pub snapshot: Snapshot,
    pub source: Arc<dyn CalendarSource>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(source: Arc<dyn CalendarSource>, config: AppConfig) -> Self {
        Self {
            snapshot: Snapshot::default(),
            source,
            config,
        }
    }
}
