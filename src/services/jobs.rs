use crate::domain::{Job, JobStatus, JobStore, RunReport, ScrapeParams, StopReason};
use crate::error::Result;
use crate::services::control::{RunControl, ScrapeEvent};
use crate::services::scraping::ScrapingService;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Runs scrapes in the background and keeps their job records current.
pub struct JobService {
    store: Arc<dyn JobStore>,
    scraper: Arc<ScrapingService>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>, scraper: Arc<ScrapingService>) -> Self {
        info!("Created new Job service");
        Self { store, scraper }
    }

    /// Persist a queued job and start it. Returns as soon as the job is on
    /// record; the scrape itself runs on its own task.
    pub fn submit(&self, params: ScrapeParams) -> Result<Job> {
        let job = Job::new(params);
        self.store.put(&job)?;
        info!("Queued job {}", job.id);

        tokio::spawn(run_job(
            Arc::clone(&self.store),
            Arc::clone(&self.scraper),
            job.clone(),
        ));
        Ok(job)
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<Job>> {
        self.store.get(id)
    }

    pub fn list(&self) -> Result<Vec<Job>> {
        self.store.list()
    }

    pub fn report(&self, id: &Uuid) -> Result<Option<RunReport>> {
        self.store.get_report(id)
    }
}

async fn run_job(store: Arc<dyn JobStore>, scraper: Arc<ScrapingService>, mut job: Job) {
    job.status = JobStatus::Processing;
    save(store.as_ref(), &job);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let control = RunControl::default().with_events(tx);
    let params = job.params.clone();
    let run = tokio::spawn(async move { scraper.scrape_with(&params, &control).await });

    // The channel closes once the run task drops its sender.
    while let Some(event) = rx.recv().await {
        match event {
            ScrapeEvent::PageListed { entries, .. } => job.found += entries,
            ScrapeEvent::ItemFinished { result, .. } => {
                job.processed += 1;
                if result.is_success() {
                    job.successful += 1;
                }
            }
        }
        save(store.as_ref(), &job);
    }

    match run.await {
        Ok((_, stats)) if stats.stop_reason == Some(StopReason::ListingUnavailable) => {
            let note = stats
                .note
                .unwrap_or_else(|| "Listing unavailable".to_string());
            warn!("Job {} failed: {}", job.id, note);
            job.fail(note);
        }
        Ok((results, stats)) => {
            let report = RunReport::new("api", job.params.clone(), results, stats);
            let count = report.metadata.count;
            match store.put_report(&job.id, &report) {
                Ok(()) => {
                    info!("Job {} completed with {} results", job.id, count);
                    job.complete(count);
                }
                Err(e) => {
                    error!("Could not save results for job {}: {}", job.id, e);
                    job.fail(format!("Could not save results: {}", e));
                }
            }
        }
        Err(e) => {
            error!("Job {} crashed: {}", job.id, e);
            job.fail("internal error");
        }
    }

    save(store.as_ref(), &job);
}

fn save(store: &dyn JobStore, job: &Job) {
    if let Err(e) = store.put(job) {
        error!("Failed to persist job {}: {}", job.id, e);
    }
}
