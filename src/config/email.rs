use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub provider: String, // sendgrid, brevo, log
    pub from_email: String,
    /// Sender display name; defaults to "<Product> Team" when unset
    pub from_name: Option<String>,
    pub sendgrid: Option<SendGridConfig>,
    pub brevo: Option<BrevoConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendGridConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrevoConfig {
    pub api_key: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: "sendgrid".to_string(),
            from_email: "noreply@example.com".to_string(),
            from_name: None,
            sendgrid: None,
            brevo: None,
        }
    }
}
