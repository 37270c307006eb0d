pub mod control;
pub mod jobs;
pub mod scraping;

pub use control::{RunControl, ScrapeEvent, StopSignal};
pub use jobs::JobService;
pub use scraping::ScrapingService;
