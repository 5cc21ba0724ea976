use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::cache::AggregateCache;
use crate::config::AppConfig;
use crate::services::submission::SubmissionGate;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub cache: Arc<AggregateCache>,
    pub gate: Arc<SubmissionGate>,
}

impl AppState {
    /// Fresh state with an empty cache, as at process start.
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            db,
            config,
            cache: Arc::new(AggregateCache::default()),
            gate: Arc::new(SubmissionGate::default()),
        }
    }
}
