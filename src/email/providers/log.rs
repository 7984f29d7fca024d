use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::email::{EmailMessage, EmailProvider, EmailResponse, EmailStatus};

/// Development and test provider that logs messages instead of sending
/// them. Useful when no real provider credentials are available.
pub struct LogProvider;

#[async_trait]
impl EmailProvider for LogProvider {
    async fn send_email(&self, email: &EmailMessage) -> Result<EmailResponse> {
        info!(
            "Email (log provider) to: {} subject: {:?} attachment: {}",
            email.to,
            email.subject,
            email
                .attachment
                .as_ref()
                .map(|a| format!("{} ({} bytes)", a.filename, a.content.len()))
                .unwrap_or_else(|| "none".to_string()),
        );

        Ok(EmailResponse {
            message_id: None,
            status: EmailStatus::Sent,
            provider: "log".to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "log"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
