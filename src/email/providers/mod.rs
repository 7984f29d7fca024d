use anyhow::Result;

pub mod brevo;
pub mod log;
pub mod sendgrid;

use crate::config::email::EmailConfig;
use crate::email::EmailProvider;

/// Create email provider based on configuration
pub fn create_provider(config: &EmailConfig) -> Result<Box<dyn EmailProvider>> {
    match config.provider.as_str() {
        "sendgrid" => {
            let sendgrid_config = config
                .sendgrid
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("SendGrid configuration missing"))?;
            Ok(Box::new(sendgrid::SendGridProvider::new(sendgrid_config)?))
        }
        "brevo" => {
            let brevo_config = config
                .brevo
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("Brevo configuration missing"))?;
            Ok(Box::new(brevo::BrevoProvider::new(brevo_config)?))
        }
        "log" => Ok(Box::new(log::LogProvider)),
        _ => Err(anyhow::anyhow!(
            "Unsupported email provider: {}",
            config.provider
        )),
    }
}
