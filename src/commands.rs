use crate::api::{self, AppState};
use crate::config::Config;
use crate::domain::{RunReport, ScrapeParams, StopReason};
use crate::error::{Result, ScrapeError};
use crate::infrastructure::{FileSystemStore, HttpFetcher};
use crate::services::{JobService, RunControl, ScrapeEvent, ScrapingService, StopSignal};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

fn build_scraper(config: &Config, time_budget: Option<Duration>) -> Result<ScrapingService> {
    let fetcher =
        HttpFetcher::new(&config.site)?.with_debug_dir(config.args.debug_html_dir.clone());
    Ok(ScrapingService::new(Arc::new(fetcher), config.site.clone())?.with_time_budget(time_budget))
}

/// One foreground scrape with a progress bar. Ctrl-C stops after the game
/// currently being fetched and still writes what was found.
pub async fn run_scrape(
    config: &Config,
    params: ScrapeParams,
    time_budget: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let scraper = build_scraper(config, time_budget.map(Duration::from_secs))?;

    let stop = StopSignal::new();
    let on_ctrl_c = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, stopping after the current game");
            on_ctrl_c.stop();
        }
    });

    let pb = ProgressBar::new(params.max_items as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .map_err(|e| ScrapeError::Other(e.to_string()))?,
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let control = RunControl::new(stop).with_events(tx);
    let progress = {
        let pb = pb.clone();
        tokio::spawn(async move {
            let mut found = 0;
            while let Some(event) = rx.recv().await {
                match event {
                    ScrapeEvent::PageListed { offset, entries } => {
                        pb.set_message(format!("{} games listed at offset {}", entries, offset));
                    }
                    ScrapeEvent::ItemFinished { title, result, .. } => {
                        if result.is_success() {
                            found += 1;
                        }
                        pb.inc(1);
                        pb.set_message(format!("{} found, last: {}", found, title));
                    }
                }
            }
        })
    };

    let (results, stats) = scraper.scrape_with(&params, &control).await;
    drop(control);
    if let Err(e) = progress.await {
        warn!("Progress display ended abnormally: {}", e);
    }
    pb.finish_with_message(format!(
        "{} of {} games have an iframe source",
        stats.successful_extractions, stats.total_processed
    ));

    if stats.stop_reason == Some(StopReason::ListingUnavailable) {
        warn!(
            "{}",
            stats.note.as_deref().unwrap_or("Listing page unavailable")
        );
    }

    let report = RunReport::new("cli", params, results, stats);
    let path = output.unwrap_or_else(default_output_path);
    write_report(&path, &report)?;

    info!("Saved {} results to {:?}", report.metadata.count, path);
    Ok(())
}

/// Serve the job API until Ctrl-C. Jobs are kept under the data dir.
pub async fn run_serve(config: &Config, host: &str, port: u16, time_budget: u64) -> Result<()> {
    let scraper = build_scraper(config, Some(Duration::from_secs(time_budget)))?;
    let store = FileSystemStore::new(&config.args.data_dir);
    let jobs = JobService::new(Arc::new(store), Arc::new(scraper));

    api::serve(host, port, AppState::new(jobs)).await
}

fn default_output_path() -> PathBuf {
    Path::new("results").join(format!(
        "game_iframes_{}.json",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, report.to_json()?)?;
    Ok(())
}
