use crate::domain::run::ScrapeParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub params: ScrapeParams,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub processed: usize,
    pub successful: usize,
    pub found: usize,
    pub result_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    pub fn new(params: ScrapeParams) -> Self {
        Self {
            id: Uuid::new_v4(),
            params,
            status: JobStatus::Queued,
            created_at: Utc::now(),
            completed_at: None,
            processed: 0,
            successful: 0,
            found: 0,
            result_count: None,
            error: None,
        }
    }

    pub fn complete(&mut self, result_count: usize) {
        self.status = JobStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.result_count = Some(result_count);
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error = Some(error.into());
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Failed)
    }
}
