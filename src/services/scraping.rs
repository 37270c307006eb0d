use crate::config::SiteSettings;
use crate::domain::{Extraction, ExtractionResult, ListingEntry, RunStats, ScrapeParams, StopReason};
use crate::error::Result;
use crate::infrastructure::{IframeExtractor, ListingParser, PageFetcher};
use crate::services::control::{RunControl, ScrapeEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Walks listing pages and pulls the iframe source out of every game page
/// they link to, one request at a time.
pub struct ScrapingService {
    fetcher: Arc<dyn PageFetcher>,
    listing: ListingParser,
    extractor: IframeExtractor,
    site: SiteSettings,
    time_budget: Option<Duration>,
}

impl ScrapingService {
    pub fn new(fetcher: Arc<dyn PageFetcher>, site: SiteSettings) -> Result<Self> {
        let listing = ListingParser::new(&site)?;
        let extractor = IframeExtractor::new(site.min_iframe_url_len);

        info!("Created new Scraping service for {}", site.listing_url);
        Ok(Self {
            fetcher,
            listing,
            extractor,
            site,
            time_budget: None,
        })
    }

    pub fn with_time_budget(mut self, time_budget: Option<Duration>) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub async fn scrape(&self, params: &ScrapeParams) -> (Vec<ExtractionResult>, RunStats) {
        self.scrape_with(params, &RunControl::default()).await
    }

    /// Run to completion, a stop request, or the time budget, whichever
    /// comes first. Only successful extractions end up in the results; the
    /// stats count every game that was looked at.
    pub async fn scrape_with(
        &self,
        params: &ScrapeParams,
        control: &RunControl,
    ) -> (Vec<ExtractionResult>, RunStats) {
        let started = Instant::now();
        let mut stats = RunStats::start();
        let mut results = Vec::new();

        info!(
            "Starting scrape: max_items={}, offset={}, delay={}s",
            params.max_items, params.start_offset, params.delay_seconds
        );

        let reason = self
            .run(params, control, started, &mut stats, &mut results)
            .await;
        stats.finish(reason, started.elapsed());

        info!(
            "Scrape finished ({:?}): processed {}, found {} iframe sources in {:.2}s",
            reason, stats.total_processed, stats.successful_extractions, stats.elapsed_seconds
        );
        (results, stats)
    }

    async fn run(
        &self,
        params: &ScrapeParams,
        control: &RunControl,
        started: Instant,
        stats: &mut RunStats,
        results: &mut Vec<ExtractionResult>,
    ) -> StopReason {
        let item_delay = params.item_delay();
        let page_delay = params.page_delay(self.site.page_delay_factor);
        let mut offset = params.start_offset;
        let mut first_page = true;

        loop {
            if let Some(reason) = self.interrupted(params, control, started, stats) {
                return reason;
            }

            let page_url = self.site.listing_page_url(offset);
            info!("Fetching listing page {}", page_url);
            let html = match self.fetcher.fetch(&page_url).await {
                Ok(html) => html,
                Err(e) => {
                    error!("Listing fetch failed for {}: {}", page_url, e);
                    String::new()
                }
            };

            if html.is_empty() {
                if first_page {
                    stats.note = Some(format!("Could not fetch listing page {}", page_url));
                    return StopReason::ListingUnavailable;
                }
                return StopReason::Exhausted;
            }
            first_page = false;

            let remaining = params.max_items - stats.total_processed;
            let entries = self.listing.parse(&html, remaining);
            control.emit(ScrapeEvent::PageListed {
                offset,
                entries: entries.len(),
            });
            if entries.is_empty() {
                info!("No more games at offset {}", offset);
                return StopReason::Exhausted;
            }

            for (position, entry) in entries.iter().enumerate() {
                if position > 0 && !self.pause(control, started, item_delay).await {
                    return StopReason::Cancelled;
                }
                if let Some(reason) = self.interrupted(params, control, started, stats) {
                    return reason;
                }

                let result = self.process(entry).await;
                stats.record(result.is_success());
                control.emit(ScrapeEvent::ItemFinished {
                    index: stats.total_processed,
                    title: entry.title.clone(),
                    result: result.clone(),
                });
                if result.is_success() {
                    results.push(result);
                }

                if let Some(reason) = self.interrupted(params, control, started, stats) {
                    return reason;
                }
            }

            offset += self.site.page_size;
            info!("Moving on to offset {} after {:?}", offset, page_delay);
            if !self.pause(control, started, page_delay).await {
                return StopReason::Cancelled;
            }
        }
    }

    /// Sleep for `delay`, but never past the end of the time budget. The
    /// check that follows reports the exhausted budget. Returns `false` when
    /// stopped.
    async fn pause(&self, control: &RunControl, started: Instant, delay: Duration) -> bool {
        let delay = match self.time_budget {
            Some(budget) => delay.min(budget.saturating_sub(started.elapsed())),
            None => delay,
        };
        control.stop.sleep(delay).await
    }

    /// Checked at every item boundary.
    fn interrupted(
        &self,
        params: &ScrapeParams,
        control: &RunControl,
        started: Instant,
        stats: &RunStats,
    ) -> Option<StopReason> {
        if stats.total_processed >= params.max_items {
            return Some(StopReason::MaxItems);
        }
        if control.stop.is_stopped() {
            info!("Stop requested after {} games", stats.total_processed);
            return Some(StopReason::Cancelled);
        }
        if let Some(budget) = self.time_budget {
            if started.elapsed() >= budget {
                warn!(
                    "Time budget of {:?} used up after {} games",
                    budget, stats.total_processed
                );
                return Some(StopReason::TimeBudget);
            }
        }
        None
    }

    async fn process(&self, entry: &ListingEntry) -> ExtractionResult {
        info!("Processing {} ({})", entry.title, entry.detail_url);

        let extraction = match self.fetcher.fetch(&entry.detail_url).await {
            Ok(html) if html.is_empty() => {
                warn!("Empty page for {}", entry.detail_url);
                Extraction::NotFound
            }
            Ok(html) => self.extractor.extract(&html, &entry.detail_url),
            Err(e) => {
                error!("Error processing {}: {}", entry.detail_url, e);
                Extraction::NotFound
            }
        };

        ExtractionResult::new(entry.title.clone(), entry.detail_url.clone(), extraction)
    }
}
