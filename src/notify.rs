use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

use crate::config::SmtpConfig;

#[derive(Debug, thiserror::Error)]
#[error("email delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// Outbound email boundary. Delivery is best-effort: callers persist state
/// first and only report a failed send, never roll back.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), DeliveryError>;
}

/// Real SMTP delivery via lettre (STARTTLS, optional credentials).
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(cfg: &SmtpConfig) -> anyhow::Result<Self> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)?.port(cfg.port);
        if let (Some(user), Some(pass)) = (&cfg.username, &cfg.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        let from: Mailbox = format!("{} <{}>", cfg.from_name, cfg.from_address)
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid from address: {e}"))?;
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), DeliveryError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| DeliveryError(format!("invalid recipient: {e}")))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| DeliveryError(e.to_string()))?;
        self.transport
            .send(message)
            .await
            .map_err(|e| DeliveryError(e.to_string()))?;
        debug!(subject, "email sent");
        Ok(())
    }
}

/// Stand-in when SMTP is not configured: logs the message and reports
/// success so local development does not depend on a mail server.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, _html: &str) -> Result<(), DeliveryError> {
        info!(to, subject, "smtp not configured, skipping delivery");
        Ok(())
    }
}

// --- message templates ---

pub fn verification_email(name: &str, code: &str) -> (String, String) {
    let subject = "Verify Your Email - SafaHome".to_string();
    let html = format!(
        r#"<div style="font-family: Arial; color: #333;">
  <h2>Hello {name},</h2>
  <p>Welcome to <strong>SafaHome</strong>!</p>
  <p>Please verify your email using the code below:</p>
  <div style="background-color: #f0f0f0; padding: 20px; text-align: center; font-size: 32px; font-weight: bold; letter-spacing: 8px; margin: 20px 0; border-radius: 8px;">
    {code}
  </div>
  <p>This code expires in 10 minutes.</p>
  <hr />
  <small>If you didn't create an account, ignore this email.</small>
</div>"#
    );
    (subject, html)
}

pub fn approval_email(name: &str) -> (String, String) {
    let subject = "Provider Approved".to_string();
    let html = format!("<h2>Hello {name}</h2><p>Your provider account is approved!</p>");
    (subject, html)
}

pub fn rejection_email(name: &str) -> (String, String) {
    let subject = "Provider Application Rejected".to_string();
    let html = format!(
        "<h2>Hello {name}</h2><p>We regret to inform your application has been rejected.</p>"
    );
    (subject, html)
}

#[cfg(test)]
pub mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone)]
    pub struct SentMail {
        pub to: String,
        pub subject: String,
        pub html: String,
    }

    /// Records every send; can be switched to fail to exercise the
    /// best-effort delivery paths.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<SentMail>>,
        pub fail: AtomicBool,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            let notifier = Self::default();
            notifier.fail.store(true, Ordering::SeqCst);
            notifier
        }

        pub fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }

        pub fn last(&self) -> Option<SentMail> {
            self.sent.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), DeliveryError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(DeliveryError("smtp unreachable".into()));
            }
            self.sent.lock().unwrap().push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                html: html.to_string(),
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_email_carries_code_and_ttl() {
        let (subject, html) = verification_email("Alice", "482913");
        assert!(subject.contains("Verify"));
        assert!(html.contains("482913"));
        assert!(html.contains("10 minutes"));
        assert!(html.contains("Alice"));
    }

    #[test]
    fn decision_emails_address_the_provider() {
        let (_, approved) = approval_email("Bob");
        assert!(approved.contains("Bob"));
        assert!(approved.contains("approved"));
        let (_, rejected) = rejection_email("Bob");
        assert!(rejected.contains("rejected"));
    }
}
