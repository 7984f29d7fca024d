use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

pub mod providers;
pub mod templates;

use crate::catalog::Product;
use crate::config::email::EmailConfig;

/// Email sending trait for different providers
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an email
    async fn send_email(&self, email: &EmailMessage) -> Result<EmailResponse>;

    /// Get provider name
    fn provider_name(&self) -> &'static str;

    /// Check if provider is configured correctly
    async fn health_check(&self) -> Result<bool>;
}

/// Email message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub html_content: Option<String>,
    pub text_content: Option<String>,
    pub from_email: String,
    pub from_name: String,
    pub attachment: Option<EmailAttachment>,
}

/// Binary attachment carried with a message. Content is raw bytes; base64
/// encoding happens at the provider boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailAttachment {
    pub content: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

/// Email sending response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailResponse {
    pub message_id: Option<String>,
    pub status: EmailStatus,
    pub provider: String,
}

/// Email delivery status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EmailStatus {
    Sent,
    Queued,
    Failed(String),
}

/// Email service that builds guide messages and hands them to the
/// configured provider.
pub struct EmailService {
    provider: Box<dyn EmailProvider>,
    from_email: String,
    from_name: Option<String>,
    ebooks_dir: PathBuf,
}

impl EmailService {
    pub fn new(config: &EmailConfig, ebooks_dir: impl Into<PathBuf>) -> Result<Self> {
        let provider = providers::create_provider(config)?;
        Ok(Self::with_provider(
            provider,
            config.from_email.clone(),
            config.from_name.clone(),
            ebooks_dir,
        ))
    }

    /// Build a service around an already-constructed provider. The provider
    /// seam is the swap point for alternative delivery backends.
    pub fn with_provider(
        provider: Box<dyn EmailProvider>,
        from_email: String,
        from_name: Option<String>,
        ebooks_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            provider,
            from_email,
            from_name,
            ebooks_dir: ebooks_dir.into(),
        }
    }

    /// Send the product guide to a captured lead.
    ///
    /// A missing guide file is non-fatal: the message goes out without an
    /// attachment. A provider-side rejection is returned as an error with
    /// the provider detail, for server-side logging only.
    pub async fn send_guide(
        &self,
        product_slug: &str,
        product: &Product,
        name: &str,
        email: &str,
        html_content: String,
    ) -> Result<EmailResponse> {
        let attachment = self.load_attachment(product_slug, product).await;

        let message = EmailMessage {
            to: email.to_string(),
            to_name: Some(name.to_string()),
            subject: format!("Your Free {} Guide is Here!", product.name),
            html_content: Some(html_content),
            text_content: Some(format!(
                "Hi {name},\n\nThank you for your interest in {product_name}! \
                 Your free guide is attached to this email.\n\nBest regards,\n\
                 The {product_name} Team",
                product_name = product.name,
            )),
            from_email: self.from_email.clone(),
            from_name: self
                .from_name
                .clone()
                .unwrap_or_else(|| format!("{} Team", product.name)),
            attachment,
        };

        let response = self.provider.send_email(&message).await?;
        match &response.status {
            EmailStatus::Failed(detail) => Err(anyhow!(
                "{} rejected the message: {detail}",
                response.provider
            )),
            _ => {
                info!(
                    "Email sent successfully [{}] to: {}",
                    product_slug, message.to
                );
                Ok(response)
            }
        }
    }

    async fn load_attachment(
        &self,
        product_slug: &str,
        product: &Product,
    ) -> Option<EmailAttachment> {
        let ebook_path = self.ebooks_dir.join(&product.ebook_filename);
        match tokio::fs::read(&ebook_path).await {
            Ok(content) => {
                info!(
                    "Ebook loaded [{}]: {}",
                    product_slug, product.ebook_filename
                );
                Some(EmailAttachment {
                    content,
                    filename: format!("{}-Guide.pdf", product.name),
                    mime_type: "application/pdf".to_string(),
                })
            }
            Err(_) => {
                warn!(
                    "Ebook not found [{}]: {}",
                    product_slug, product.ebook_filename
                );
                None
            }
        }
    }

    /// Get provider name
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Check email service health
    pub async fn health_check(&self) -> Result<bool> {
        self.provider.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            name: "Mitolyn".to_string(),
            ebook_filename: "mitolyn-guide.pdf".to_string(),
            offer_url: "https://mitolyn.com/welcome/".to_string(),
        }
    }

    fn log_service(ebooks_dir: &std::path::Path) -> EmailService {
        let config = EmailConfig {
            provider: "log".to_string(),
            from_email: "guides@example.com".to_string(),
            from_name: None,
            ..EmailConfig::default()
        };
        EmailService::new(&config, ebooks_dir).unwrap()
    }

    #[tokio::test]
    async fn send_succeeds_without_attachment_when_ebook_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let service = log_service(tmp.path());

        let response = service
            .send_guide(
                "mitolyn",
                &product(),
                "Jane",
                "jane@example.com",
                "<p>hi</p>".to_string(),
            )
            .await
            .unwrap();

        assert!(matches!(response.status, EmailStatus::Sent));
    }

    #[tokio::test]
    async fn attachment_is_loaded_with_fixed_type_and_name() {
        let tmp = tempfile::tempdir().unwrap();
        tokio::fs::write(tmp.path().join("mitolyn-guide.pdf"), b"%PDF-1.4")
            .await
            .unwrap();
        let service = log_service(tmp.path());

        let attachment = service
            .load_attachment("mitolyn", &product())
            .await
            .unwrap();

        assert_eq!(attachment.filename, "Mitolyn-Guide.pdf");
        assert_eq!(attachment.mime_type, "application/pdf");
        assert_eq!(attachment.content, b"%PDF-1.4");
    }

    struct RejectingProvider;

    #[async_trait]
    impl EmailProvider for RejectingProvider {
        async fn send_email(&self, _email: &EmailMessage) -> Result<EmailResponse> {
            Ok(EmailResponse {
                message_id: None,
                status: EmailStatus::Failed("401 unauthorized".to_string()),
                provider: "rejecting".to_string(),
            })
        }

        fn provider_name(&self) -> &'static str {
            "rejecting"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn provider_rejection_surfaces_as_error() {
        let tmp = tempfile::tempdir().unwrap();
        let service = EmailService::with_provider(
            Box::new(RejectingProvider),
            "guides@example.com".to_string(),
            None,
            tmp.path(),
        );

        let result = service
            .send_guide(
                "mitolyn",
                &product(),
                "Jane",
                "jane@example.com",
                "<p>hi</p>".to_string(),
            )
            .await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("rejecting"));
        assert!(err.contains("401 unauthorized"));
    }

    #[tokio::test]
    async fn from_name_defaults_to_product_team() {
        let tmp = tempfile::tempdir().unwrap();
        let service = log_service(tmp.path());
        assert!(service.from_name.is_none());

        // send_guide fills the display name from the product
        let response = service
            .send_guide(
                "mitolyn",
                &product(),
                "Jane",
                "jane@example.com",
                "<p>hi</p>".to_string(),
            )
            .await
            .unwrap();
        assert_eq!(response.provider, "log");
    }
}
