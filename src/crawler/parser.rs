//! HTML link extraction
//!
//! Pulls raw `href` strings out of `<a>` elements, exactly as they appear in
//! the source and in document order. Resolution and normalization happen in
//! the coordinator, so the values returned here may be relative, fragment
//! only, or empty. `<link>`, `<img>`, `<script>` and friends are ignored.

use scraper::{Html, Selector};

use super::{ParseError, Parser};

/// Anchor-href extractor backed by the `scraper` crate.
///
/// `Html::parse_document` is error-recovering, so malformed markup degrades
/// to whatever anchors survive rather than failing the page.
#[derive(Debug, Default)]
pub struct LinkParser;

impl LinkParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for LinkParser {
    fn extract_links(&self, body: &[u8]) -> Result<Vec<String>, ParseError> {
        let html = String::from_utf8_lossy(body);
        let document = Html::parse_document(&html);

        let mut links = Vec::new();
        if let Ok(selector) = Selector::parse("a[href]") {
            for element in document.select(&selector) {
                if let Some(href) = element.value().attr("href") {
                    links.push(href.to_string());
                }
            }
        }

        Ok(links)
    }
}
