use crate::config::cli::Args;
use crate::error::Result;
use crate::infrastructure::DEFAULT_USER_AGENTS;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

pub mod cli;

/// Everything that ties the scraper to one particular marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub listing_url: String,
    pub origin: String,
    pub page_size: usize,
    pub page_delay_factor: f64,
    pub fetch_timeout_secs: u64,
    pub retry_attempts: u32,
    pub retry_base_wait_ms: u64,
    pub min_iframe_url_len: usize,
    pub user_agents: Vec<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            listing_url: "https://itch.io/games/free/platform-web".to_string(),
            origin: "https://itch.io".to_string(),
            page_size: 36,
            page_delay_factor: 2.0,
            fetch_timeout_secs: 10,
            retry_attempts: 3,
            retry_base_wait_ms: 1000,
            min_iframe_url_len: 10,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

impl SiteSettings {
    pub fn listing_page_url(&self, offset: usize) -> String {
        let separator = if self.listing_url.contains('?') { '&' } else { '?' };
        format!("{}{}offset={}", self.listing_url, separator, offset)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn retry_base_wait(&self) -> Duration {
        Duration::from_millis(self.retry_base_wait_ms)
    }

    /// Host part of the origin, e.g. `itch.io`.
    pub fn host(&self) -> &str {
        let without_scheme = self
            .origin
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.origin);
        without_scheme.split('/').next().unwrap_or(without_scheme)
    }
}

pub struct Config {
    pub args: Args,
    pub site: SiteSettings,
}

impl Config {
    pub fn new() -> Result<Self> {
        let args = Args::parse();

        let site = match &args.settings_file {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => SiteSettings::default(),
        };

        Ok(Self { args, site })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        if !self.args.data_dir.exists() {
            std::fs::create_dir_all(&self.args.data_dir)?;
        }
        if let Some(debug_dir) = &self.args.debug_html_dir {
            if !debug_dir.exists() {
                std::fs::create_dir_all(debug_dir)?;
            }
        }

        info!("Data and debug dirs exist");
        Ok(())
    }
}
