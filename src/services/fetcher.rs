// src/services/fetcher.rs

//! Monitored page fetcher.

use reqwest::Client;

use crate::error::Result;
use crate::models::HttpConfig;
use crate::utils::http::fetch_text_with_timeout;

/// Downloads the monitored page with the long page timeout.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    page_url: String,
    timeout_secs: u64,
}

impl PageFetcher {
    pub fn new(client: Client, page_url: impl Into<String>, config: &HttpConfig) -> Self {
        Self {
            client,
            page_url: page_url.into(),
            timeout_secs: config.page_timeout_secs,
        }
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    /// Fetch the raw page markup.
    pub async fn fetch(&self) -> Result<String> {
        log::info!("Checking page: {}", self.page_url);
        fetch_text_with_timeout(&self.client, &self.page_url, self.timeout_secs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::http::create_client;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start().await;
        let config = HttpConfig::default();
        Mock::given(method("GET"))
            .and(path("/wiki/Deaths_in_August_2023"))
            .and(header("user-agent", config.user_agent.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(
            create_client(&config).unwrap(),
            format!("{}/wiki/Deaths_in_August_2023", server.uri()),
            &config,
        );
        assert_eq!(fetcher.fetch().await.unwrap(), "<html></html>");
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let config = HttpConfig::default();
        let fetcher = PageFetcher::new(create_client(&config).unwrap(), server.uri(), &config);
        assert!(fetcher.fetch().await.is_err());
    }
}
