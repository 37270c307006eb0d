#![allow(dead_code)]

use async_trait::async_trait;
use gameframe::config::SiteSettings;
use gameframe::domain::{Job, JobStore};
use gameframe::error::Result;
use gameframe::infrastructure::PageFetcher;
use gameframe::services::ScrapingService;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const LISTING: &str = "https://itch.test/games";

/// Serves fixed pages; anything else comes back empty.
#[derive(Default)]
pub struct StaticSite(HashMap<String, String>);

impl StaticSite {
    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.0.insert(url.to_string(), html.to_string());
        self
    }

    /// One listing page with an embeddable game and a download-only one.
    pub fn two_games() -> Self {
        Self::default()
            .page(
                &format!("{}?offset=0", LISTING),
                r#"<div class="game_title"><a href="https://a.itch.test/web">Web Game</a></div>
                   <div class="game_title"><a href="https://b.itch.test/exe">Exe Game</a></div>"#,
            )
            .page(
                "https://a.itch.test/web",
                r#"<div id="html_embed_content"><iframe src="https://html.itch.zone/html/11/index.html"></iframe></div>"#,
            )
            .page("https://b.itch.test/exe", "<p>Download only</p>")
    }
}

#[async_trait]
impl PageFetcher for StaticSite {
    async fn fetch(&self, url: &str) -> Result<String> {
        Ok(self.0.get(url).cloned().unwrap_or_default())
    }
}

pub fn scraper(site: StaticSite) -> Arc<ScrapingService> {
    let settings = SiteSettings {
        listing_url: LISTING.to_string(),
        origin: "https://itch.test".to_string(),
        ..SiteSettings::default()
    };
    Arc::new(ScrapingService::new(Arc::new(site), settings).unwrap())
}

/// Poll the store until the job reaches a terminal state.
pub async fn wait_for_job(store: &dyn JobStore, id: &Uuid) -> Job {
    for _ in 0..500 {
        if let Some(job) = store.get(id).unwrap() {
            if job.is_finished() {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} did not finish", id);
}
