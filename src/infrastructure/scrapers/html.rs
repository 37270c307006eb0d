//! Small helpers for pulling tags and attributes out of raw markup without
//! building a full DOM for the whole page.

use once_cell::sync::Lazy;
use regex::{Match, Regex};
use scraper::{Html, Selector};

pub static DIV_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<div\b[^>]*>").unwrap());
pub static IFRAME_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<iframe\b[^>]*>").unwrap());
pub static OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<[a-zA-Z][a-zA-Z0-9-]*\b[^>]*>").unwrap());

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#,
    )
    .unwrap()
});

static CARRIER: Lazy<Selector> = Lazy::new(|| Selector::parse("i").unwrap());

/// Value of `name` on a single opening tag, raw (entities untouched).
pub fn attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    ATTRIBUTE
        .captures_iter(tag)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .and_then(|caps| caps.get(2).or(caps.get(3)).or(caps.get(4)))
        .map(|m| m.as_str())
}

pub fn has_class(tag: &str, class: &str) -> bool {
    attr(tag, "class")
        .map(|classes| classes.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// First opening tag matched by `pattern` that satisfies `predicate`.
pub fn find_tag<'a>(
    html: &'a str,
    pattern: &Regex,
    predicate: impl Fn(&str) -> bool,
) -> Option<Match<'a>> {
    pattern.find_iter(html).find(|tag| predicate(tag.as_str()))
}

/// Decode HTML entities (`&lt;`, `&quot;`, `&#39;`, ...) by letting the
/// HTML parser read the text back as an attribute value.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let fragment = Html::parse_fragment(&format!(
        "<i title=\"{}\"></i>",
        raw.replace('"', "&quot;")
    ));

    fragment
        .select(&CARRIER)
        .next()
        .and_then(|element| element.value().attr("title"))
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string())
}

/// Visible text of a markup fragment: tags stripped, entities decoded,
/// whitespace collapsed.
pub fn text_content(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    let text: String = parsed.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_reads_all_quote_styles() {
        let tag = r#"<iframe class='game_frame' src="https://a.test/x" width=640>"#;
        assert_eq!(attr(tag, "class"), Some("game_frame"));
        assert_eq!(attr(tag, "src"), Some("https://a.test/x"));
        assert_eq!(attr(tag, "width"), Some("640"));
        assert_eq!(attr(tag, "height"), None);
    }

    #[test]
    fn attr_does_not_look_inside_other_values() {
        let tag = r#"<div data-iframe="&lt;iframe src=&quot;https://a.test&quot;&gt;">"#;
        assert_eq!(attr(tag, "src"), None);
        assert!(attr(tag, "data-iframe").is_some());
    }

    #[test]
    fn has_class_matches_whole_tokens() {
        assert!(has_class(r#"<div class="iframe_placeholder big">"#, "iframe_placeholder"));
        assert!(!has_class(r#"<div class="iframe_placeholder_old">"#, "iframe_placeholder"));
    }

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(
            decode_entities("&lt;iframe src=&quot;https://a.test/?a=1&amp;b=2&quot;&gt;"),
            r#"<iframe src="https://a.test/?a=1&b=2">"#
        );
        assert_eq!(decode_entities("it&#39;s"), "it's");
        assert_eq!(decode_entities("plain"), "plain");
    }

    #[test]
    fn text_content_strips_tags() {
        assert_eq!(
            text_content("  <span>Mr. Magpie&#39;s</span>\n  Harmless &amp; Card Game "),
            "Mr. Magpie's Harmless & Card Game"
        );
    }
}
