// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
///
/// The client-wide timeout is the short API timeout; page fetches
/// override it per request.
pub fn create_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.api_timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a URL as text, failing on non-success status codes.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let text = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(text)
}

/// Fetch a URL as text with a custom timeout.
pub async fn fetch_text_with_timeout(
    client: &Client,
    url: &str,
    timeout_secs: u64,
) -> Result<String> {
    let text = client
        .get(url)
        .timeout(Duration::from_secs(timeout_secs))
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(text)
}

/// GET a URL with query parameters and return the body text.
pub async fn get_query(client: &Client, url: &str, params: &[(&str, &str)]) -> Result<String> {
    let text = client
        .get(url)
        .query(params)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(text)
}
