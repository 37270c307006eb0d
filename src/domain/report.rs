use crate::domain::extraction::ExtractionResult;
use crate::domain::run::{RunStats, ScrapeParams};
use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub metadata: ReportMetadata,
    pub results: Vec<ExtractionResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub source: String,
    pub params: ScrapeParams,
    pub count: usize,
    pub stats: RunStats,
    pub version: String,
}

impl RunReport {
    pub fn new(
        source: &str,
        params: ScrapeParams,
        results: Vec<ExtractionResult>,
        stats: RunStats,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                timestamp: Local::now().to_rfc3339(),
                source: source.to_string(),
                params,
                count: results.len(),
                stats,
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            results,
        }
    }

    /// Pretty-printed JSON; serde_json leaves non-ASCII text as-is.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extraction::{Extraction, ExtractionMethod};

    #[test]
    fn keeps_non_ascii_titles_readable() {
        let results = vec![ExtractionResult::new(
            "小小冒险".to_string(),
            "https://dev.itch.io/adventure".to_string(),
            Extraction::Found {
                url: "https://itch.io/embed-upload/1".to_string(),
                method: ExtractionMethod::HtmlEmbedIframe,
            },
        )];
        let report = RunReport::new("cli", ScrapeParams::default(), results, RunStats::start());

        let json = report.to_json().unwrap();
        assert!(json.contains("小小冒险"));
        assert!(json.contains("\n  \"metadata\""));
        assert_eq!(report.metadata.count, 1);
    }
}
