use crate::domain::storage::JobStore;
use crate::domain::{Job, RunReport};
use crate::error::{Result, ScrapeError};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Process-local store; everything is gone when the server stops.
#[derive(Default)]
pub struct MemoryStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
    reports: RwLock<HashMap<Uuid, RunReport>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> ScrapeError {
    ScrapeError::Storage("lock poisoned".to_string())
}

impl JobStore for MemoryStore {
    fn get(&self, id: &Uuid) -> Result<Option<Job>> {
        Ok(self.jobs.read().map_err(poisoned)?.get(id).cloned())
    }

    fn put(&self, job: &Job) -> Result<()> {
        self.jobs
            .write()
            .map_err(poisoned)?
            .insert(job.id, job.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Job>> {
        let mut jobs: Vec<Job> = self.jobs.read().map_err(poisoned)?.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    fn put_report(&self, id: &Uuid, report: &RunReport) -> Result<()> {
        self.reports
            .write()
            .map_err(poisoned)?
            .insert(*id, report.clone());
        Ok(())
    }

    fn get_report(&self, id: &Uuid) -> Result<Option<RunReport>> {
        Ok(self.reports.read().map_err(poisoned)?.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobStatus, ScrapeParams};
    use chrono::Duration;

    #[test]
    fn put_overwrites_by_id() {
        let store = MemoryStore::new();
        let mut job = Job::new(ScrapeParams::default());
        store.put(&job).unwrap();

        job.status = JobStatus::Processing;
        store.put(&job).unwrap();

        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(store.get(&job.id).unwrap().unwrap().status, JobStatus::Processing);
    }

    #[test]
    fn list_is_newest_first() {
        let store = MemoryStore::new();
        let mut older = Job::new(ScrapeParams::default());
        older.created_at = older.created_at - Duration::seconds(30);
        let newer = Job::new(ScrapeParams::default());

        store.put(&older).unwrap();
        store.put(&newer).unwrap();

        let ids: Vec<Uuid> = store.list().unwrap().into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }
}
