use super::html::{attr, decode_entities, find_tag, has_class, DIV_TAG, IFRAME_TAG, OPEN_TAG};
use crate::domain::{Extraction, ExtractionMethod};
use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

static EMBED_CONTAINER_IFRAME: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#html_embed_content iframe[src], #html_embed iframe[src]").unwrap()
});

type Heuristic = fn(&str) -> Option<String>;

/// Tried strictly in this order; the first heuristic that yields a
/// candidate decides the outcome.
const CHAIN: [(ExtractionMethod, Heuristic); 6] = [
    (ExtractionMethod::HtmlEmbedIframe, embed_container_iframe),
    (ExtractionMethod::HtmlEmbedDataIframe, embed_container_data),
    (ExtractionMethod::IframePlaceholder, placeholder_data),
    (ExtractionMethod::DropTarget, drop_target_data),
    (ExtractionMethod::DataIframeAttribute, any_data_iframe),
    (ExtractionMethod::GameFrame, game_frame_iframe),
];

#[derive(Debug, Clone)]
pub struct IframeExtractor {
    min_url_len: usize,
}

impl IframeExtractor {
    pub fn new(min_url_len: usize) -> Self {
        Self { min_url_len }
    }

    /// `source_url` is used for logging and to resolve root-relative
    /// candidates.
    pub fn extract(&self, html: &str, source_url: &str) -> Extraction {
        for (method, heuristic) in CHAIN {
            let Some(candidate) = heuristic(html) else {
                debug!("{} did not match on {}", method, source_url);
                continue;
            };

            return match self.accept(&candidate, source_url) {
                Some(url) => {
                    info!("Found iframe source via {} on {}: {}", method, source_url, url);
                    Extraction::Found { url, method }
                }
                None => {
                    warn!(
                        "Discarding implausible candidate from {} on {}: {:?}",
                        method, source_url, candidate
                    );
                    Extraction::NotFound
                }
            };
        }

        warn!("No iframe source found on {}", source_url);
        Extraction::NotFound
    }

    /// Clean up a raw candidate and return it as an absolute URL, or `None`
    /// when it does not look like one.
    fn accept(&self, candidate: &str, source_url: &str) -> Option<String> {
        let cleaned: String = candidate
            .trim()
            .chars()
            .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
            .collect();
        let cleaned = decode_entities(&cleaned);

        let url = if cleaned.to_ascii_lowercase().contains("<iframe") {
            iframe_src(&cleaned)?
        } else {
            cleaned
        };
        let url = url.trim();

        let plausible = ["http://", "https://", "//", "/"]
            .iter()
            .any(|prefix| url.starts_with(prefix));
        if !plausible || url.len() <= self.min_url_len {
            return None;
        }

        if url.starts_with("http://") || url.starts_with("https://") {
            Some(url.to_string())
        } else if url.starts_with("//") {
            Some(format!("https:{}", url))
        } else {
            let base = Url::parse(source_url).ok()?;
            base.join(url).ok().map(|resolved| resolved.to_string())
        }
    }
}

fn iframe_src(fragment: &str) -> Option<String> {
    let tag = IFRAME_TAG.find(fragment)?;
    attr(tag.as_str(), "src")
        .filter(|src| !src.trim().is_empty())
        .map(str::to_string)
}

/// Decoded `data-iframe` value of a tag. Holds either a whole `<iframe>`
/// element or a bare URL; the element case is reduced to its `src`.
fn data_iframe(tag: &str) -> Option<String> {
    let raw = attr(tag, "data-iframe")?;
    if raw.trim().is_empty() {
        return None;
    }

    let decoded = decode_entities(raw);
    if decoded.to_ascii_lowercase().contains("<iframe") {
        iframe_src(&decoded)
    } else {
        Some(decoded)
    }
}

fn is_embed_container(tag: &str) -> bool {
    matches!(attr(tag, "id"), Some("html_embed_content") | Some("html_embed"))
}

/// Only frames that sit inside the container count; a trailer further down
/// the page is not the game.
fn embed_container_iframe(html: &str) -> Option<String> {
    if !html.contains("html_embed") {
        return None;
    }

    let document = Html::parse_document(html);
    let src = document
        .select(&EMBED_CONTAINER_IFRAME)
        .filter_map(|frame| frame.value().attr("src"))
        .find(|src| !src.trim().is_empty())?;
    Some(src.to_string())
}

fn embed_container_data(html: &str) -> Option<String> {
    let container = find_tag(html, &DIV_TAG, is_embed_container)?;
    data_iframe(container.as_str())
}

fn placeholder_data(html: &str) -> Option<String> {
    DIV_TAG
        .find_iter(html)
        .filter(|tag| has_class(tag.as_str(), "iframe_placeholder"))
        .find_map(|tag| data_iframe(tag.as_str()))
}

fn drop_target_data(html: &str) -> Option<String> {
    DIV_TAG
        .find_iter(html)
        .filter(|tag| {
            attr(tag.as_str(), "id") == Some("html_embed_drop")
                || has_class(tag.as_str(), "drop_target")
        })
        .find_map(|tag| data_iframe(tag.as_str()))
}

fn any_data_iframe(html: &str) -> Option<String> {
    OPEN_TAG
        .find_iter(html)
        .find_map(|tag| data_iframe(tag.as_str()))
}

fn game_frame_iframe(html: &str) -> Option<String> {
    IFRAME_TAG
        .find_iter(html)
        .filter(|tag| has_class(tag.as_str(), "game_frame"))
        .find_map(|tag| attr(tag.as_str(), "src").map(str::to_string))
}
