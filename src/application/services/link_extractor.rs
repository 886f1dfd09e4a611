use regex::Regex;
use std::sync::LazyLock;

use crate::domain::entities::{AttributedText, TextLink};

static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\((https?://[^)\s]+)\)").unwrap());

static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s<>()\[\]]+[^\s<>()\[\].,;:!?]").unwrap());

/// Finds links in caption text.
pub struct LinkExtractor;

impl LinkExtractor {
    /// Builds caption text from a markdown-style source: `[text](url)`
    /// becomes `text` linked to `url`, bare URLs link to themselves.
    pub fn attributed(source: &str) -> AttributedText {
        let mut text = String::with_capacity(source.len());
        let mut links = Vec::new();

        if !source.contains("http") {
            return AttributedText::plain(source);
        }

        let mut cursor = 0;
        for cap in MD_LINK_RE.captures_iter(source) {
            let (Some(whole), Some(label), Some(url)) = (cap.get(0), cap.get(1), cap.get(2)) else {
                continue;
            };
            Self::push_plain(&mut text, &mut links, &source[cursor..whole.start()]);
            let start = text.len();
            text.push_str(label.as_str());
            links.push(TextLink {
                range: start..text.len(),
                url: url.as_str().to_owned(),
            });
            cursor = whole.end();
        }
        Self::push_plain(&mut text, &mut links, &source[cursor..]);

        AttributedText { text, links }
    }

    /// URL of the first link, if any.
    pub fn first_link(text: &AttributedText) -> Option<&str> {
        text.links.first().map(|link| link.url.as_str())
    }

    fn push_plain(text: &mut String, links: &mut Vec<TextLink>, segment: &str) {
        let offset = text.len();
        for found in BARE_URL_RE.find_iter(segment) {
            links.push(TextLink {
                range: offset + found.start()..offset + found.end(),
                url: found.as_str().to_owned(),
            });
        }
        text.push_str(segment);
    }
}
