// src/services/extractor.rs

//! List extractor service.
//!
//! Turns the markup of a deaths list page into detected entries.
//! An entry is a `<li>` directly under a `<ul>` inside the content region
//! that carries both an article link and a `<sup>` citation marker.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{DetectedEntry, SeenSet};
use crate::pipeline::diff::calculate_diff;
use crate::utils::resolve_url;
use crate::utils::text::before_citation;
use crate::utils::url::{article_id, is_article_href};

/// Primary content region
const REGION_SELECTOR: &str = "div#bodyContent";
/// Used when the primary region is absent
const FALLBACK_REGION_SELECTOR: &str = "div#content";
const ITEM_SELECTOR: &str = "ul > li";
const LINK_SELECTOR: &str = "a[href]";
const CITATION_SELECTOR: &str = "sup";

/// Service for extracting entries from a list page.
pub struct ListExtractor {
    base_url: Url,
    region: Selector,
    fallback_region: Selector,
    item: Selector,
    link: Selector,
    citation: Selector,
}

impl ListExtractor {
    /// Create an extractor for the page at `page_url`.
    ///
    /// Relative links are resolved against `page_url`.
    pub fn new(page_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(page_url)?,
            region: Self::parse_selector(REGION_SELECTOR)?,
            fallback_region: Self::parse_selector(FALLBACK_REGION_SELECTOR)?,
            item: Self::parse_selector(ITEM_SELECTOR)?,
            link: Self::parse_selector(LINK_SELECTOR)?,
            citation: Self::parse_selector(CITATION_SELECTOR)?,
        })
    }

    /// Entries on the page whose key is not in `seen`, in page order.
    pub fn extract(&self, html: &str, seen: &SeenSet) -> Vec<DetectedEntry> {
        let diff = calculate_diff(self.parse_items(html), seen);
        log::debug!(
            "Page lists {} entries, {} already seen",
            diff.total(),
            diff.already_seen
        );
        for entry in &diff.added {
            log::info!("New entry found: {}", entry.name);
        }
        diff.added
    }

    /// Every qualifying entry on the page, seen or not.
    pub fn parse_items(&self, html: &str) -> Vec<DetectedEntry> {
        let document = Html::parse_document(html);

        let Some(region) = document
            .select(&self.region)
            .next()
            .or_else(|| document.select(&self.fallback_region).next())
        else {
            log::warn!("Could not find the main content region of the page");
            return Vec::new();
        };

        region
            .select(&self.item)
            .filter_map(|item| self.parse_item(&item))
            .collect()
    }

    fn parse_item(&self, item: &ElementRef) -> Option<DetectedEntry> {
        let mut links = item.select(&self.link).peekable();
        links.peek()?;
        item.select(&self.citation).next()?;

        let href = links
            .filter_map(|a| a.value().attr("href"))
            .find(|href| is_article_href(href))?;

        let text: String = item.text().collect();
        let name = before_citation(&text);
        if name.is_empty() {
            return None;
        }

        Some(DetectedEntry::new(
            name,
            article_id(href),
            resolve_url(&self.base_url, href),
        ))
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}
