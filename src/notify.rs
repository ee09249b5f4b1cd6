//! Owner notifications when feedback arrives.
//!
//! Mail goes through an HTTP relay rather than SMTP directly. Delivery is best
//! effort: callers spawn it and only log failures.

use crate::config::MailConfig;
use crate::error::{FeedbackError, Result};
use crate::models::{Feedback, Project};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &EmailMessage) -> Result<()>;

    /// Sender address stamped on outgoing messages
    fn sender(&self) -> &str;
}

/// Drops every message; used when no relay is configured
#[derive(Debug, Clone, Default)]
pub struct DisabledNotifier {
    from: String,
}

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn notify(&self, message: &EmailMessage) -> Result<()> {
        tracing::debug!(
            "Mail relay not configured; dropping notification to {} ({})",
            message.to,
            message.subject
        );
        Ok(())
    }

    fn sender(&self) -> &str {
        &self.from
    }
}

/// Posts messages as JSON to an HTTP mail relay
#[derive(Debug, Clone)]
pub struct RelayNotifier {
    client: reqwest::Client,
    relay_url: String,
    token: Option<String>,
    from: String,
}

impl RelayNotifier {
    pub fn new(relay_url: impl Into<String>, config: &MailConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("peer-feedback/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            relay_url: relay_url.into(),
            token: config.token.clone(),
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Notifier for RelayNotifier {
    async fn notify(&self, message: &EmailMessage) -> Result<()> {
        let mut request = self.client.post(&self.relay_url).json(message);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedbackError::Notification {
                message: format!("relay returned {}: {}", status, body),
            });
        }
        tracing::info!("Sent notification to {}", message.to);
        Ok(())
    }

    fn sender(&self) -> &str {
        &self.from
    }
}

/// Pick the notifier the mail configuration asks for
pub fn create_notifier(config: &MailConfig) -> Result<Arc<dyn Notifier>> {
    match config.relay_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => {
            tracing::info!("Mail notifications via relay {}", url);
            Ok(Arc::new(RelayNotifier::new(url, config)?))
        }
        None => {
            tracing::info!("Mail notifications disabled (no relay configured)");
            Ok(Arc::new(DisabledNotifier {
                from: config.from.clone(),
            }))
        }
    }
}

/// Message telling a project owner new feedback arrived; None without an address
pub fn feedback_received_message(
    from: &str,
    project: &Project,
    feedback: &Feedback,
    public_base_url: &str,
) -> Option<EmailMessage> {
    let to = project.notification_email.clone()?;
    let link = format!(
        "{}/feedback/{}",
        public_base_url.trim_end_matches('/'),
        project.id
    );
    let kind = feedback.feedback_type.label();
    let subject = format!("New {} feedback on \"{}\"", kind, project.title);
    let text = format!(
        "Your project \"{}\" received new {} feedback.\n\n{}\n\nSee all feedback: {}",
        project.title, kind, feedback.feedback, link
    );
    let html = format!(
        "<p>Your project <strong>{}</strong> received new {} feedback.</p><p><a href=\"{}\">See all feedback</a></p>",
        escape_html(&project.title),
        kind,
        link
    );
    Some(EmailMessage {
        from: from.to_string(),
        to,
        subject,
        text,
        html: Some(html),
    })
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Fire-and-forget delivery on a background task
pub fn spawn_notification(notifier: Arc<dyn Notifier>, message: EmailMessage) {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&message).await {
            tracing::warn!("Failed to notify {}: {}", message.to, e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::FeedbackType;
    use chrono::Utc;

    fn project(email: Option<&str>) -> Project {
        Project {
            id: "p-42".into(),
            title: "Tom & <Jerry>".into(),
            description: "d".into(),
            url: None,
            feedback_type: FeedbackType::Hustler,
            created_at: Utc::now(),
            owner_token: "token-abcdef".into(),
            notification_email: email.map(str::to_string),
        }
    }

    fn feedback() -> Feedback {
        Feedback {
            id: "f-1".into(),
            project_id: "p-42".into(),
            feedback: "**Target Customers:** students".into(),
            feedback_type: FeedbackType::Hustler,
            helpful: 0,
            not_helpful: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn no_email_means_no_message() {
        assert!(
            feedback_received_message("a@b.co", &project(None), &feedback(), "http://x").is_none()
        );
    }

    #[test]
    fn message_links_to_feedback_page() {
        let msg = feedback_received_message(
            "noreply@example.com",
            &project(Some("owner@example.com")),
            &feedback(),
            "https://feedback.example.com/",
        )
        .unwrap();
        assert_eq!(msg.to, "owner@example.com");
        assert_eq!(msg.subject, "New Hustler feedback on \"Tom & <Jerry>\"");
        assert!(msg.text.contains("https://feedback.example.com/feedback/p-42"));
        assert!(msg.text.contains("students"));
        assert!(msg.html.unwrap().contains("Tom &amp; &lt;Jerry&gt;"));
    }

    #[tokio::test]
    async fn disabled_notifier_accepts_everything() {
        let notifier = create_notifier(&MailConfig::default()).unwrap();
        assert_eq!(notifier.sender(), "noreply@peer-feedback.local");
        let msg = EmailMessage {
            from: notifier.sender().to_string(),
            to: "owner@example.com".into(),
            subject: "s".into(),
            text: "t".into(),
            html: None,
        };
        notifier.notify(&msg).await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_relay_is_an_error() {
        let config = MailConfig {
            relay_url: Some("http://127.0.0.1:9/send".into()),
            timeout_ms: 500,
            ..MailConfig::default()
        };
        let notifier = create_notifier(&config).unwrap();
        let msg = EmailMessage {
            from: "a@b.co".into(),
            to: "c@d.co".into(),
            subject: "s".into(),
            text: "t".into(),
            html: None,
        };
        let err = notifier.notify(&msg).await.unwrap_err();
        assert!(matches!(err, FeedbackError::Notification { .. }));
    }
}
