// src/services/enricher.rs

//! Enrichment service.
//!
//! Looks up the target-language edition of an article through the
//! MediaWiki `langlinks` API, then pulls a short plain-text introduction
//! through the `extracts` API of whichever wiki the final URL lives on.
//! Every step degrades to a fallback instead of failing.

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{DetectedEntry, EnrichedSummary, EnrichmentConfig};
use crate::utils::http::get_query;
use crate::utils::text::{clean_extract, strip_diacritics};
use crate::utils::url::{api_endpoint, article_url, title_from_url};

/// Outcome of the summary lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryLookup {
    /// The API returned a usable excerpt
    Found { title: String, summary: String },
    /// Nothing usable came back; carries the title derived from the URL
    Unavailable { title: Option<String> },
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<ApiQuery>,
}

#[derive(Debug, Deserialize)]
struct ApiQuery {
    #[serde(default)]
    pages: HashMap<String, ApiPage>,
}

#[derive(Debug, Deserialize)]
struct ApiPage {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    langlinks: Vec<LangLink>,
}

#[derive(Debug, Deserialize)]
struct LangLink {
    lang: String,
    #[serde(rename = "*", alias = "title")]
    title: String,
}

impl ApiResponse {
    fn parse(body: &str, context: &str) -> Result<Vec<ApiPage>> {
        let response: ApiResponse = serde_json::from_str(body)?;
        let query = response
            .query
            .ok_or_else(|| AppError::api(context, "response has no query section"))?;
        Ok(query.pages.into_values().collect())
    }
}

/// Service resolving translations and summaries for new entries.
pub struct Enricher {
    client: Client,
    config: EnrichmentConfig,
}

impl Enricher {
    pub fn new(client: Client, config: EnrichmentConfig) -> Self {
        Self { client, config }
    }

    /// Resolve URL, title and summary for an entry. Never fails.
    pub async fn enrich(&self, entry: &DetectedEntry) -> EnrichedSummary {
        let url = match self.find_translation(entry).await {
            Ok(Some(url)) => {
                log::debug!("{} has a '{}' edition: {}", entry.name, self.config.target_lang, url);
                url
            }
            Ok(None) => entry.source_url.clone(),
            Err(e) => {
                log::warn!("Language link lookup failed for {}: {}", entry.article_id, e);
                entry.source_url.clone()
            }
        };

        let (title, summary) = match self.fetch_summary(&url).await {
            SummaryLookup::Found { title, summary } => (Some(title), summary),
            SummaryLookup::Unavailable { title } => (title, self.config.placeholder.clone()),
        };

        EnrichedSummary {
            url,
            title: title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| entry.name.clone()),
            summary: strip_diacritics(&summary),
        }
    }

    /// URL of the target-language edition of the entry's article, if any.
    pub async fn find_translation(&self, entry: &DetectedEntry) -> Result<Option<String>> {
        let api = api_endpoint(&entry.source_url, &self.config.api_path)
            .ok_or_else(|| AppError::api("langlinks", format!("no API for {}", entry.source_url)))?;

        let title = urlencoding::decode(&entry.article_id)
            .map(|t| t.replace('_', " "))
            .unwrap_or_else(|_| entry.article_id.clone());

        let body = get_query(
            &self.client,
            &api,
            &[
                ("action", "query"),
                ("format", "json"),
                ("prop", "langlinks"),
                ("lllimit", "500"),
                ("lllang", self.config.target_lang.as_str()),
                ("titles", title.as_str()),
            ],
        )
        .await?;

        let translated = ApiResponse::parse(&body, "langlinks")?
            .into_iter()
            .flat_map(|page| page.langlinks)
            .find(|link| link.lang == self.config.target_lang)
            .map(|link| article_url(&self.config.target_site, &link.title));

        Ok(translated)
    }

    /// Introductory excerpt for the article at `url`.
    pub async fn fetch_summary(&self, url: &str) -> SummaryLookup {
        let derived = title_from_url(url);
        let Some(title) = derived.as_deref() else {
            log::warn!("Cannot derive an article title from {}", url);
            return SummaryLookup::Unavailable { title: None };
        };

        match self.query_extract(url, title).await {
            Ok(Some((api_title, summary))) => SummaryLookup::Found {
                title: api_title.unwrap_or_else(|| title.to_string()),
                summary,
            },
            Ok(None) => {
                log::warn!("No summary available for {}", url);
                SummaryLookup::Unavailable { title: derived }
            }
            Err(e) => {
                log::warn!("Summary lookup failed for {}: {}", url, e);
                SummaryLookup::Unavailable { title: derived }
            }
        }
    }

    async fn query_extract(
        &self,
        url: &str,
        title: &str,
    ) -> Result<Option<(Option<String>, String)>> {
        let api = api_endpoint(url, &self.config.api_path)
            .ok_or_else(|| AppError::api("extracts", format!("no API for {url}")))?;
        let exchars = self.config.summary_chars.to_string();

        let body = get_query(
            &self.client,
            &api,
            &[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts"),
                ("titles", title),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("exchars", exchars.as_str()),
            ],
        )
        .await?;

        let found = ApiResponse::parse(&body, "extracts")?
            .into_iter()
            .find_map(|page| {
                let summary = clean_extract(page.extract.as_deref()?, self.config.summary_chars);
                (!summary.is_empty()).then_some((page.title, summary))
            });

        Ok(found)
    }
}
