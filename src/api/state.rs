use crate::services::JobService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<JobService>,
}

impl AppState {
    pub fn new(jobs: JobService) -> Self {
        Self {
            jobs: Arc::new(jobs),
        }
    }
}
