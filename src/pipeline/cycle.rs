// src/pipeline/cycle.rs

//! One polling cycle: fetch, extract, enrich, notify, persist.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Config, CycleReport, SeenSet};
use crate::pipeline::schedule::CycleRunner;
use crate::services::{Enricher, ListExtractor, Notifier, PageFetcher, compose, notifier};
use crate::storage::{JsonStateStore, StateStore};
use crate::utils::http::create_client;

/// Owns the seen-set and every collaborator a cycle needs.
pub struct Tracker {
    fetcher: PageFetcher,
    extractor: ListExtractor,
    enricher: Enricher,
    notifier: Box<dyn Notifier>,
    store: Box<dyn StateStore>,
    seen: SeenSet,
}

impl Tracker {
    /// Build a tracker and load the persisted seen-set.
    ///
    /// Fails if the state exists but cannot be read.
    pub async fn new(
        config: &Config,
        notifier: Box<dyn Notifier>,
        store: Box<dyn StateStore>,
    ) -> Result<Self> {
        let client = create_client(&config.http)?;
        let seen = store.load().await?;
        log::info!("Loaded {} previously processed entries", seen.len());

        Ok(Self {
            fetcher: PageFetcher::new(client.clone(), &config.monitor.page_url, &config.http),
            extractor: ListExtractor::new(&config.monitor.page_url)?,
            enricher: Enricher::new(client, config.enrichment.clone()),
            notifier,
            store,
            seen,
        })
    }

    /// Build a tracker with the JSON state file and the configured notifier.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = JsonStateStore::for_page(&config.storage.state_dir, &config.monitor.page_url);
        log::info!("State file: {}", store.path().display());
        let notifier = notifier::from_config(&config.mail)?;
        Self::new(config, notifier, Box::new(store)).await
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Run one cycle. Never fails: every problem is logged and skipped.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::begin();

        let html = match self.fetcher.fetch().await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("Failed to fetch {}: {}", self.fetcher.page_url(), e);
                report.fetch_failed = true;
                return report.finish();
            }
        };

        let entries = self.extractor.extract(&html, &self.seen);
        report.found = entries.len();
        if entries.is_empty() {
            log::info!("No new entries found");
            return report.finish();
        }

        for entry in entries {
            log::info!("Processing: {}", entry.name);
            let enriched = self.enricher.enrich(&entry).await;
            let notification = compose(&entry, &enriched);

            match self.notifier.send(&notification).await {
                Ok(()) => report.notified += 1,
                Err(e) => {
                    log::error!("Failed to send notification for {}: {}", entry.name, e);
                    report.failed += 1;
                }
            }

            self.seen.insert(entry.key);
        }

        match self.store.save(&self.seen).await {
            Ok(()) => report.persisted = true,
            Err(e) => log::error!("Failed to persist state: {}", e),
        }

        report.finish()
    }
}

#[async_trait]
impl CycleRunner for Tracker {
    async fn run_cycle(&mut self) -> CycleReport {
        Tracker::run_cycle(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::error::AppError;
    use crate::models::SeenKey;
    use crate::services::Notification;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html><body><div id="bodyContent">
        <h3>1</h3>
        <ul>
            <li><a href="/wiki/Jane_Doe">Jane Doe</a>, 88, actress.<sup>[1]</sup></li>
            <li><a href="/wiki/John_Roe">John Roe</a>, 70, painter.<sup>[2]</sup></li>
        </ul>
    </div></body></html>"#;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Notification>>>);

    #[async_trait]
    impl Notifier for Recorder {
        async fn send(&self, notification: &Notification) -> Result<()> {
            self.0.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    struct Refusing;

    #[async_trait]
    impl Notifier for Refusing {
        async fn send(&self, _notification: &Notification) -> Result<()> {
            Err(AppError::mail("relay refused"))
        }
    }

    async fn serve_page(server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path("/wiki/Deaths_in_August_2023"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    fn config(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.monitor.page_url = format!("{}/wiki/Deaths_in_August_2023", server.uri());
        config.enrichment.target_site = server.uri();
        config
    }

    #[tokio::test]
    async fn test_cycle_without_new_entries_skips_save() {
        let server = MockServer::start().await;
        serve_page(&server, PAGE).await;
        let tmp = TempDir::new().unwrap();
        let store = JsonStateStore::new(tmp.path().join("state.json"));
        let recorder = Recorder::default();

        let mut tracker = Tracker::new(
            &config(&server),
            Box::new(recorder.clone()),
            Box::new(store.clone()),
        )
        .await
        .unwrap();
        tracker.seen = [
            SeenKey::from("Jane Doe, 88, actress. (Jane_Doe)"),
            SeenKey::from("John Roe, 70, painter. (John_Roe)"),
        ]
        .into_iter()
        .collect();

        let report = tracker.run_cycle().await;
        assert_eq!(report.found, 0);
        assert!(!report.persisted);
        assert!(!store.path().exists());
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delivery_still_persists() {
        let server = MockServer::start().await;
        serve_page(&server, PAGE).await;
        let tmp = TempDir::new().unwrap();
        let store = JsonStateStore::new(tmp.path().join("state.json"));

        let mut tracker = Tracker::new(
            &config(&server),
            Box::new(Refusing),
            Box::new(store.clone()),
        )
        .await
        .unwrap();
        let report = tracker.run_cycle().await;

        assert_eq!(report.found, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.notified, 0);
        assert!(report.persisted);
        assert_eq!(store.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        let tmp = TempDir::new().unwrap();
        let store = JsonStateStore::new(tmp.path().join("state.json"));

        let mut tracker = Tracker::new(
            &config(&server),
            Box::new(Recorder::default()),
            Box::new(store),
        )
        .await
        .unwrap();
        let report = tracker.run_cycle().await;

        assert!(report.fetch_failed);
        assert_eq!(report.found, 0);
        assert!(tracker.seen().is_empty());
    }

    #[tokio::test]
    async fn test_second_cycle_finds_nothing() {
        let server = MockServer::start().await;
        serve_page(&server, PAGE).await;
        let tmp = TempDir::new().unwrap();
        let store = JsonStateStore::new(tmp.path().join("state.json"));
        let recorder = Recorder::default();

        let mut tracker = Tracker::new(
            &config(&server),
            Box::new(recorder.clone()),
            Box::new(store),
        )
        .await
        .unwrap();

        assert_eq!(tracker.run_cycle().await.notified, 2);
        let second = tracker.run_cycle().await;
        assert_eq!(second.found, 0);
        assert_eq!(recorder.0.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_state_is_fatal() {
        let server = MockServer::start().await;
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let result = Tracker::new(
            &config(&server),
            Box::new(Recorder::default()),
            Box::new(JsonStateStore::new(&path)),
        )
        .await;
        assert!(matches!(result, Err(AppError::StateCorrupt { .. })));
    }
}
