mod common;

use common::{scraper, wait_for_job, StaticSite};
use gameframe::domain::{ExtractionMethod, JobStatus, JobStore, ScrapeParams};
use gameframe::infrastructure::{FileSystemStore, MemoryStore};
use gameframe::services::JobService;
use std::sync::Arc;

#[tokio::test]
async fn test_job_runs_to_completion() {
    let store = Arc::new(MemoryStore::new());
    let service = JobService::new(store.clone(), scraper(StaticSite::two_games()));

    let queued = service.submit(ScrapeParams::new(5, 0, 0.0)).unwrap();
    assert_eq!(queued.status, JobStatus::Queued);

    let job = wait_for_job(store.as_ref(), &queued.id).await;
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.found, 2);
    assert_eq!(job.processed, 2);
    assert_eq!(job.successful, 1);
    assert_eq!(job.result_count, Some(1));
    assert!(job.completed_at.is_some());
    assert!(job.error.is_none());

    let report = service.report(&job.id).unwrap().unwrap();
    assert_eq!(report.metadata.count, 1);
    assert_eq!(report.metadata.source, "api");
    assert_eq!(report.metadata.stats.total_processed, 2);
    assert_eq!(report.results[0].method, ExtractionMethod::HtmlEmbedIframe);
}

#[tokio::test]
async fn test_unreachable_listing_fails_the_job() {
    let store = Arc::new(MemoryStore::new());
    let service = JobService::new(store.clone(), scraper(StaticSite::default()));

    let queued = service.submit(ScrapeParams::default()).unwrap();
    let job = wait_for_job(store.as_ref(), &queued.id).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().contains("listing"));
    assert!(service.report(&queued.id).unwrap().is_none());
}

#[tokio::test]
async fn test_jobs_survive_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileSystemStore::new(dir.path()));
    let service = JobService::new(store.clone(), scraper(StaticSite::two_games()));

    let first = service.submit(ScrapeParams::new(1, 0, 0.0)).unwrap();
    wait_for_job(store.as_ref(), &first.id).await;
    let second = service.submit(ScrapeParams::new(2, 0, 0.0)).unwrap();
    wait_for_job(store.as_ref(), &second.id).await;

    let reopened = FileSystemStore::new(dir.path());
    let jobs = reopened.list().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id, second.id);
    assert_eq!(jobs[1].id, first.id);
    assert!(reopened.get_report(&first.id).unwrap().is_some());
}
