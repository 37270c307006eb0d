use crate::domain::storage::{JobStore, StorageKeys};
use crate::domain::{Job, RunReport};
use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;
use uuid::Uuid;

/// One pretty-printed JSON document per job, plus one per finished report.
/// Everything is read back from disk, so jobs survive a restart.
#[derive(Clone)]
pub struct FileSystemStore {
    data_dir: PathBuf,
}

impl FileSystemStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn get_path_for_key(&self, key: &str, subdir: &str) -> PathBuf {
        self.data_dir.join(subdir).join(format!("{}.json", key))
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn write_json_file<T: serde::Serialize + ?Sized>(
        &self,
        key: &str,
        subdir: &str,
        data: &T,
    ) -> Result<()> {
        self.ensure_dir(&self.data_dir.join(subdir))?;

        // Readers poll job files while runs update them, so a document is
        // written next to its target and renamed into place.
        let path = self.get_path_for_key(key, subdir);
        let content = serde_json::to_string_pretty(data)?;
        let mut staged = NamedTempFile::new_in(self.data_dir.join(subdir))?;
        staged.write_all(content.as_bytes())?;
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn read_json_file<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
        subdir: &str,
    ) -> Result<Option<T>> {
        let path = self.get_path_for_key(key, subdir);
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(Some(serde_json::from_str(&content)?))
        } else {
            Ok(None)
        }
    }
}

impl JobStore for FileSystemStore {
    fn get(&self, id: &Uuid) -> Result<Option<Job>> {
        self.read_json_file(&id.to_string(), StorageKeys::JOBS_DIR)
    }

    fn put(&self, job: &Job) -> Result<()> {
        self.write_json_file(&job.id.to_string(), StorageKeys::JOBS_DIR, job)
    }

    fn list(&self) -> Result<Vec<Job>> {
        let dir = self.data_dir.join(StorageKeys::JOBS_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut jobs = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            // A half-written or foreign file should not hide every other job.
            match read_job(&path) {
                Ok(job) => jobs.push(job),
                Err(e) => warn!("Skipping unreadable job file {:?}: {}", path, e),
            }
        }

        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    fn put_report(&self, id: &Uuid, report: &RunReport) -> Result<()> {
        self.write_json_file(&StorageKeys::report(id), StorageKeys::RESULTS_DIR, report)
    }

    fn get_report(&self, id: &Uuid) -> Result<Option<RunReport>> {
        self.read_json_file(&StorageKeys::report(id), StorageKeys::RESULTS_DIR)
    }
}

fn read_job(path: &Path) -> Result<Job> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RunStats, ScrapeParams};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn jobs_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path());

        let mut job = Job::new(ScrapeParams::new(3, 36, 0.5));
        store.put(&job).unwrap();
        job.processed = 2;
        store.put(&job).unwrap();

        let reopened = FileSystemStore::new(dir.path());
        let loaded = reopened.get(&job.id).unwrap().unwrap();
        assert_eq!(loaded.processed, 2);
        assert_eq!(loaded.params, ScrapeParams::new(3, 36, 0.5));
        assert!(dir.path().join("jobs").join(format!("{}.json", job.id)).exists());
    }

    #[test]
    fn missing_job_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path());

        assert!(store.get(&Uuid::new_v4()).unwrap().is_none());
        assert!(store.list().unwrap().is_empty());
        assert!(store.get_report(&Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn list_skips_garbage_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path());

        let job = Job::new(ScrapeParams::default());
        store.put(&job).unwrap();
        fs::write(dir.path().join("jobs").join("broken.json"), "{not json").unwrap();
        fs::write(dir.path().join("jobs").join("notes.txt"), "hello").unwrap();

        let jobs = store.list().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, job.id);
    }

    #[test]
    fn readers_never_see_a_half_written_job() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileSystemStore::new(dir.path()));
        let mut job = Job::new(ScrapeParams::default());
        store.put(&job).unwrap();
        let id = job.id;

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 0..2_000 {
                    job.processed = n;
                    store.put(&job).unwrap();
                }
            })
        };

        while !writer.is_finished() {
            let loaded = store.get(&id).unwrap();
            assert!(loaded.is_some());
            assert_eq!(store.list().unwrap().len(), 1);
        }
        writer.join().unwrap();

        assert_eq!(store.get(&id).unwrap().unwrap().processed, 1_999);
    }

    #[test]
    fn reports_are_stored_under_results() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path());
        let id = Uuid::new_v4();

        let report = RunReport::new("api", ScrapeParams::default(), Vec::new(), RunStats::start());
        store.put_report(&id, &report).unwrap();

        assert!(dir
            .path()
            .join("results")
            .join(format!("job_{}.json", id))
            .exists());
        assert_eq!(store.get_report(&id).unwrap().unwrap().metadata.count, 0);
    }
}
