mod clients;
mod scrapers;
mod storage;

pub use clients::{
    fetcher::{debug_file_stem, HttpFetcher},
    user_agent::{random_user_agent, DEFAULT_USER_AGENTS},
    PageFetcher,
};
pub use scrapers::{iframe::IframeExtractor, listing::ListingParser};
pub use storage::{fs_store::FileSystemStore, memory_store::MemoryStore};
