use crate::error::Result;
use async_trait::async_trait;

pub(crate) mod fetcher;
pub(crate) mod user_agent;

/// Source of raw page HTML. An empty string means "nothing came back";
/// an `Err` is reserved for faults the caller should log and skip past.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
