use serde::{Deserialize, Serialize};
use std::fmt;

/// Which heuristic produced an iframe source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    HtmlEmbedIframe,
    HtmlEmbedDataIframe,
    IframePlaceholder,
    DropTarget,
    DataIframeAttribute,
    GameFrame,
    Failed,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HtmlEmbedIframe => "html_embed_iframe",
            Self::HtmlEmbedDataIframe => "html_embed_data_iframe",
            Self::IframePlaceholder => "iframe_placeholder",
            Self::DropTarget => "drop_target",
            Self::DataIframeAttribute => "data_iframe_attribute",
            Self::GameFrame => "game_frame",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of running the heuristic chain over one detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found {
        url: String,
        method: ExtractionMethod,
    },
    NotFound,
}

impl Extraction {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Found { url, .. } => Some(url),
            Self::NotFound => None,
        }
    }

    pub fn method(&self) -> ExtractionMethod {
        match self {
            Self::Found { method, .. } => *method,
            Self::NotFound => ExtractionMethod::Failed,
        }
    }
}

/// A processed game, serialized with the field names the job API has
/// always exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub title: String,
    #[serde(rename = "url")]
    pub detail_url: String,
    pub iframe_src: Option<String>,
    #[serde(rename = "extracted_method")]
    pub method: ExtractionMethod,
}

impl ExtractionResult {
    pub fn new(title: String, detail_url: String, extraction: Extraction) -> Self {
        let method = extraction.method();
        let iframe_src = match extraction {
            Extraction::Found { url, .. } => Some(url),
            Extraction::NotFound => None,
        };

        Self {
            title,
            detail_url,
            iframe_src,
            method,
        }
    }

    pub fn is_success(&self) -> bool {
        self.iframe_src.is_some()
    }
}
