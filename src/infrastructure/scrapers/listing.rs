use super::html::text_content;
use crate::config::SiteSettings;
use crate::domain::ListingEntry;
use crate::error::{Result, ScrapeError};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;
use tracing::{debug, info};

/// `<div class="game_title"><a href=URL>TITLE</a>`
static GAME_TITLE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<div[^>]*class="[^"]*\bgame_title\b[^"]*"[^>]*>\s*<a[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#,
    )
    .unwrap()
});

/// `<a class="game_link" href=URL><div class="game_cell_data"><div class="game_title">TITLE</div>`
static GAME_LINK_CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<a[^>]*class="[^"]*\bgame_link\b[^"]*"[^>]*href="([^"]+)"[^>]*>\s*<div[^>]*class="game_cell_data"[^>]*>\s*<div[^>]*class="game_title"[^>]*>(.*?)</div>"#,
    )
    .unwrap()
});

/// Turns a listing page into the games it links to.
pub struct ListingParser {
    origin: String,
    creator_link: Regex,
}

impl ListingParser {
    pub fn new(site: &SiteSettings) -> Result<Self> {
        // Any link into a creator's sub-domain, e.g. https://someone.itch.io/game
        let creator_link = Regex::new(&format!(
            r#"(?is)<a\b[^>]*href="((?:https?:)?//[a-z0-9][a-z0-9_-]*\.{}/[^"?#]+)[^"]*"[^>]*>(.*?)</a>"#,
            regex::escape(site.host())
        ))
        .map_err(|e| ScrapeError::Parse(e.to_string()))?;

        Ok(Self {
            origin: site.origin.trim_end_matches('/').to_string(),
            creator_link,
        })
    }

    /// Up to `max` entries in document order, unique by URL. Looser patterns
    /// are only consulted when the stricter ones find nothing.
    pub fn parse(&self, html: &str, max: usize) -> Vec<ListingEntry> {
        if max == 0 || html.is_empty() {
            return Vec::new();
        }

        let patterns: [(&str, &Regex); 3] = [
            ("game_title", &*GAME_TITLE_LINK),
            ("game_link", &*GAME_LINK_CELL),
            ("creator_link", &self.creator_link),
        ];

        for (name, pattern) in patterns {
            let entries = self.collect(html, pattern, max);
            if !entries.is_empty() {
                info!("Found {} games using the {} pattern", entries.len(), name);
                return entries;
            }
            debug!("Listing pattern {} matched nothing", name);
        }

        info!("Found 0 games");
        Vec::new()
    }

    fn collect(&self, html: &str, pattern: &Regex, max: usize) -> Vec<ListingEntry> {
        let mut seen = FxHashSet::default();
        let mut entries = Vec::new();

        for caps in pattern.captures_iter(html) {
            let title = text_content(&caps[2]);
            if title.is_empty() {
                continue;
            }

            let url = self.absolutize(caps[1].trim());
            if !seen.insert(url.clone()) {
                continue;
            }

            entries.push(ListingEntry::new(url, title));
            if entries.len() >= max {
                break;
            }
        }

        entries
    }

    fn absolutize(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with("//") {
            format!("https:{}", url)
        } else if url.starts_with('/') {
            format!("{}{}", self.origin, url)
        } else {
            format!("{}/{}", self.origin, url)
        }
    }
}
