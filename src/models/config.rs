//! Application configuration structures.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable overriding `mail.username`.
pub const ENV_SMTP_USERNAME: &str = "DEATHWATCH_SMTP_USERNAME";

/// Environment variable overriding `mail.password`.
pub const ENV_SMTP_PASSWORD: &str = "DEATHWATCH_SMTP_PASSWORD";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Monitored page and poll cadence
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Cross-language and summary lookup settings
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Where the seen-set lives
    #[serde(default)]
    pub storage: StorageConfig,

    /// Outbound mail relay
    #[serde(default)]
    pub mail: MailConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Override mail credentials from the environment, when set.
    pub fn apply_env(&mut self) {
        if let Ok(username) = env::var(ENV_SMTP_USERNAME) {
            self.mail.username = username;
        }
        if let Ok(password) = env::var(ENV_SMTP_PASSWORD) {
            self.mail.password = password;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.monitor.page_url).map_err(|e| {
            AppError::validation(format!(
                "monitor.page_url '{}' is not a valid URL: {e}",
                self.monitor.page_url
            ))
        })?;
        if self.monitor.poll_interval_secs == 0 {
            return Err(AppError::validation("monitor.poll_interval_secs must be > 0"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.page_timeout_secs == 0 {
            return Err(AppError::validation("http.page_timeout_secs must be > 0"));
        }
        if self.http.api_timeout_secs == 0 {
            return Err(AppError::validation("http.api_timeout_secs must be > 0"));
        }
        if self.enrichment.summary_chars == 0 {
            return Err(AppError::validation("enrichment.summary_chars must be > 0"));
        }
        if self.enrichment.target_lang.trim().is_empty() {
            return Err(AppError::validation("enrichment.target_lang is empty"));
        }
        Url::parse(&self.enrichment.target_site).map_err(|e| {
            AppError::validation(format!("enrichment.target_site is not a valid URL: {e}"))
        })?;
        if self.mail.enabled {
            if self.mail.smtp_host.trim().is_empty() {
                return Err(AppError::validation("mail.smtp_host is empty"));
            }
            if self.mail.from.trim().is_empty() || self.mail.to.trim().is_empty() {
                return Err(AppError::validation(
                    "mail.from and mail.to are required when mail is enabled",
                ));
            }
        }
        Ok(())
    }

    /// Path of the state file for the monitored page.
    pub fn state_path(&self) -> PathBuf {
        crate::storage::state_file_path(&self.storage.state_dir, &self.monitor.page_url)
    }
}

/// Monitored page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// URL of the deaths list page
    #[serde(default = "defaults::page_url")]
    pub page_url: String,

    /// Seconds between two checks
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            page_url: defaults::page_url(),
            poll_interval_secs: defaults::poll_interval(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Timeout for the full page fetch
    #[serde(default = "defaults::page_timeout")]
    pub page_timeout_secs: u64,

    /// Timeout for metadata and extract API calls
    #[serde(default = "defaults::api_timeout")]
    pub api_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            page_timeout_secs: defaults::page_timeout(),
            api_timeout_secs: defaults::api_timeout(),
        }
    }
}

/// Enrichment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Language code of the preferred article edition
    #[serde(default = "defaults::target_lang")]
    pub target_lang: String,

    /// Base URL of the wiki serving `target_lang`
    #[serde(default = "defaults::target_site")]
    pub target_site: String,

    /// Path of the MediaWiki action API on every wiki
    #[serde(default = "defaults::api_path")]
    pub api_path: String,

    /// Character budget for the introductory excerpt
    #[serde(default = "defaults::summary_chars")]
    pub summary_chars: usize,

    /// Text sent when no summary could be retrieved
    #[serde(default = "defaults::placeholder")]
    pub placeholder: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            target_lang: defaults::target_lang(),
            target_site: defaults::target_site(),
            api_path: defaults::api_path(),
            summary_chars: defaults::summary_chars(),
            placeholder: defaults::placeholder(),
        }
    }
}

/// State storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one state file per monitored page
    #[serde(default = "defaults::state_dir")]
    pub state_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_dir: defaults::state_dir(),
        }
    }
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailSecurity {
    /// Plain connection upgraded with STARTTLS (usually port 587)
    #[default]
    Starttls,
    /// TLS from the first byte (usually port 465)
    Tls,
}

/// Outbound mail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Send mail; when false, notifications are only logged
    #[serde(default = "defaults::mail_enabled")]
    pub enabled: bool,

    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub security: MailSecurity,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Sender address
    #[serde(default)]
    pub from: String,

    /// Recipient address
    #[serde(default)]
    pub to: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::mail_enabled(),
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            security: MailSecurity::default(),
            username: String::new(),
            password: String::new(),
            from: String::new(),
            to: String::new(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level filter when RUST_LOG is not set
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Monitor defaults
    pub fn page_url() -> String {
        "https://en.wikipedia.org/wiki/Deaths_in_August_2023".into()
    }
    pub fn poll_interval() -> u64 {
        5 * 60
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; deathwatch/0.1)".into()
    }
    pub fn page_timeout() -> u64 {
        15
    }
    pub fn api_timeout() -> u64 {
        10
    }

    // Enrichment defaults
    pub fn target_lang() -> String {
        "ru".into()
    }
    pub fn target_site() -> String {
        "https://ru.wikipedia.org".into()
    }
    pub fn api_path() -> String {
        "/w/api.php".into()
    }
    pub fn summary_chars() -> usize {
        500
    }
    pub fn placeholder() -> String {
        "Could not retrieve a short description.".into()
    }

    // Storage defaults
    pub fn state_dir() -> PathBuf {
        PathBuf::from("state")
    }

    // Mail defaults
    pub fn mail_enabled() -> bool {
        false
    }
    pub fn smtp_host() -> String {
        "smtp.yandex.ru".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.monitor.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_page_url() {
        let mut config = Config::default();
        config.monitor.page_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_requires_addresses_when_mail_enabled() {
        let mut config = Config::default();
        config.mail.enabled = true;
        assert!(config.validate().is_err());

        config.mail.from = "watcher@example.org".to_string();
        config.mail.to = "me@example.org".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [monitor]
            page_url = "https://en.wikipedia.org/wiki/Deaths_in_December_2025"

            [mail]
            security = "tls"
            smtp_port = 465
            "#,
        )
        .unwrap();

        assert_eq!(config.monitor.poll_interval_secs, 300);
        assert_eq!(config.mail.security, MailSecurity::Tls);
        assert_eq!(config.mail.smtp_port, 465);
        assert_eq!(config.enrichment.summary_chars, 500);
        assert!(
            config
                .state_path()
                .ends_with("deaths_in_december_2025.json")
        );
    }

    #[test]
    fn load_fails_on_missing_file() {
        assert!(matches!(
            Config::load("/definitely/not/here.toml"),
            Err(AppError::Io(_))
        ));
    }
}
