mod extraction;
mod job;
mod listing;
mod report;
mod run;
pub(crate) mod storage;

pub use extraction::{Extraction, ExtractionMethod, ExtractionResult};
pub use job::{Job, JobStatus};
pub use listing::ListingEntry;
pub use report::{ReportMetadata, RunReport};
pub use run::{RunStats, ScrapeParams, StopReason};
pub use storage::{JobStore, StorageKeys};
