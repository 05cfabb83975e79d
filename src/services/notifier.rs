// src/services/notifier.rs

//! Notification delivery.
//!
//! One plain-text mail per new entry through an authenticated SMTP relay,
//! or a log line when mail is disabled.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::{DetectedEntry, EnrichedSummary, MailConfig, MailSecurity};

const SEPARATOR_WIDTH: usize = 40;

/// A message ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// Build the message announcing a new entry.
pub fn compose(entry: &DetectedEntry, enriched: &EnrichedSummary) -> Notification {
    let title = if enriched.title.is_empty() {
        entry.name.as_str()
    } else {
        enriched.title.as_str()
    };
    let separator = "-".repeat(SEPARATOR_WIDTH);

    Notification {
        subject: format!("new death entry: {title}"),
        body: format!(
            "A new entry appeared on the monitored deaths list:\n\n\
             Name: {title}\n\
             Article: {url}\n\n\
             Short description (first paragraph):\n\
             {separator}\n\
             {summary}\n\
             {separator}",
            url = enriched.url,
            summary = enriched.summary,
        ),
    }
}

/// Trait for notification channels.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message.
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Delivers notifications through an SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// Build the transport and parse both addresses up front.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| AppError::config(format!("invalid mail.from '{}': {e}", config.from)))?;
        let to: Mailbox = config
            .to
            .parse()
            .map_err(|e| AppError::config(format!("invalid mail.to '{}': {e}", config.to)))?;

        let builder = match config.security {
            MailSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            }
            MailSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host),
        }
        .map_err(AppError::mail)?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    fn build_message(&self, notification: &Notification) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(notification.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(AppError::mail)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let message = self.build_message(notification)?;
        self.transport.send(message).await.map_err(AppError::mail)?;
        log::info!("Mail sent: '{}'", notification.subject);
        Ok(())
    }
}

/// Logs notifications instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        log::info!("[dry run] {}", notification.subject);
        for line in notification.body.lines() {
            log::info!("    {}", line);
        }
        Ok(())
    }
}

/// Pick the notifier matching the mail configuration.
pub fn from_config(config: &MailConfig) -> Result<Box<dyn Notifier>> {
    if config.enabled {
        Ok(Box::new(SmtpNotifier::new(config)?))
    } else {
        log::warn!("Mail delivery disabled, notifications will only be logged");
        Ok(Box::new(LogNotifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched() -> EnrichedSummary {
        EnrichedSummary {
            url: "https://ru.wikipedia.org/wiki/Doe".to_string(),
            title: "Jane Doe".to_string(),
            summary: "American actress.".to_string(),
        }
    }

    fn entry() -> DetectedEntry {
        DetectedEntry::new("Jane Doe, 88", "Jane_Doe", "https://en.wikipedia.org/wiki/Jane_Doe")
    }

    fn mail_config() -> MailConfig {
        MailConfig {
            enabled: true,
            smtp_host: "smtp.example.org".to_string(),
            from: "watcher@example.org".to_string(),
            to: "Me <me@example.org>".to_string(),
            username: "watcher@example.org".to_string(),
            password: "secret".to_string(),
            ..MailConfig::default()
        }
    }

    #[test]
    fn test_compose_subject_and_body() {
        let n = compose(&entry(), &enriched());
        assert_eq!(n.subject, "new death entry: Jane Doe");

        let dashes = "-".repeat(40);
        assert!(n.body.contains("Name: Jane Doe\n"));
        assert!(n.body.contains("Article: https://ru.wikipedia.org/wiki/Doe\n"));
        assert!(
            n.body
                .ends_with(&format!("{dashes}\nAmerican actress.\n{dashes}"))
        );
    }

    #[test]
    fn test_compose_falls_back_to_entry_name() {
        let mut e = enriched();
        e.title.clear();
        let n = compose(&entry(), &e);
        assert_eq!(n.subject, "new death entry: Jane Doe, 88");
    }

    #[test]
    fn test_build_message() {
        let notifier = SmtpNotifier::new(&mail_config()).unwrap();
        let message = notifier.build_message(&compose(&entry(), &enriched())).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: new death entry: Jane Doe"));
        assert!(raw.contains("<me@example.org>"));
    }

    #[test]
    fn test_invalid_address_is_config_error() {
        let mut config = mail_config();
        config.to = "not an address".to_string();
        assert!(matches!(
            SmtpNotifier::new(&config),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_from_config_disabled_logs_only() {
        assert!(from_config(&MailConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let n = compose(&entry(), &enriched());
        assert!(LogNotifier.send(&n).await.is_ok());
    }
}
