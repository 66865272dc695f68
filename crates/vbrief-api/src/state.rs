//! Application state.

use std::sync::Arc;

use vbrief_queue::JobQueue;
use vbrief_reports::ReportStore;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub queue: Arc<JobQueue>,
    pub reports: Arc<ReportStore>,
}

impl AppState {
    /// Create new application state with environment-backed stores.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let queue = JobQueue::from_env()?;
        let reports = ReportStore::from_env()?;

        Ok(Self {
            config,
            queue: Arc::new(queue),
            reports: Arc::new(reports),
        })
    }
}
