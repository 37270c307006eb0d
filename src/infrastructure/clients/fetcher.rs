use super::user_agent::random_user_agent;
use super::PageFetcher;
use crate::config::SiteSettings;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// HTTP GET with a rotating user agent and linear backoff. Never fails:
/// exhausted retries come back as an empty page.
pub struct HttpFetcher {
    client: Client,
    user_agents: Vec<String>,
    attempts: u32,
    base_wait: Duration,
    debug_dir: Option<PathBuf>,
}

impl HttpFetcher {
    pub fn new(site: &SiteSettings) -> Result<Self> {
        let client = Client::builder().timeout(site.fetch_timeout()).build()?;

        Ok(Self {
            client,
            user_agents: site.user_agents.clone(),
            attempts: site.retry_attempts.max(1),
            base_wait: site.retry_base_wait(),
            debug_dir: None,
        })
    }

    pub fn with_debug_dir(mut self, debug_dir: Option<PathBuf>) -> Self {
        self.debug_dir = debug_dir;
        self
    }

    pub async fn fetch_html(&self, url: &str) -> String {
        for attempt in 1..=self.attempts {
            match self.fetch_once(url).await {
                Ok(body) => {
                    info!("Fetched {} bytes from {}", body.len(), url);
                    self.archive(url, &body).await;
                    return body;
                }
                Err(e) => {
                    warn!("Attempt {}/{} for {} failed: {}", attempt, self.attempts, url, e);
                    if attempt < self.attempts {
                        sleep(self.base_wait * attempt).await;
                    }
                }
            }
        }

        error!("Giving up on {} after {} attempts", url, self.attempts);
        String::new()
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, random_user_agent(&self.user_agents))
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }

    async fn archive(&self, url: &str, body: &str) {
        let Some(dir) = &self.debug_dir else {
            return;
        };

        let path = dir.join(format!("{}.html", debug_file_stem(url)));
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            warn!("Cannot create debug dir {:?}: {}", dir, e);
            return;
        }
        match tokio::fs::write(&path, body).await {
            Ok(()) => debug!("Saved raw HTML to {:?}", path),
            Err(e) => warn!("Failed to save raw HTML for {}: {}", url, e),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        Ok(self.fetch_html(url).await)
    }
}

/// File name for the debug copy of a page: its last path segment (query
/// included) with anything unsafe replaced.
pub fn debug_file_stem(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);

    let stem: String = last
        .to_lowercase()
        .chars()
        .map(|c| match c {
            c if c.is_alphanumeric() || c == '-' || c == '_' => c,
            _ => '_',
        })
        .collect();

    if stem.trim_matches('_').is_empty() {
        "page".to_string()
    } else {
        stem
    }
}
