use super::{Job, RunReport};
use crate::error::Result;
use uuid::Uuid;

/// Job records and their finished reports. The scraping pipeline never
/// sees this; only the job service and the HTTP layer do.
pub trait JobStore: Send + Sync {
    fn get(&self, id: &Uuid) -> Result<Option<Job>>;
    fn put(&self, job: &Job) -> Result<()>;
    fn list(&self) -> Result<Vec<Job>>;
    fn put_report(&self, id: &Uuid, report: &RunReport) -> Result<()>;
    fn get_report(&self, id: &Uuid) -> Result<Option<RunReport>>;
}

pub struct StorageKeys;

impl StorageKeys {
    pub const JOBS_DIR: &'static str = "jobs";
    pub const RESULTS_DIR: &'static str = "results";

    pub fn report(id: &Uuid) -> String {
        format!("job_{}", id)
    }
}
