use serde::{Deserialize, Serialize};

/// One game found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub detail_url: String,
    pub title: String,
}

impl ListingEntry {
    pub fn new(detail_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            detail_url: detail_url.into(),
            title: title.into(),
        }
    }
}
