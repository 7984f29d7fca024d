use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

pub mod email;
pub mod rate_limit;
pub mod server;
pub mod storage;

use email::EmailConfig;
use rate_limit::RateLimitConfig;
use server::ServerConfig;
use storage::StorageConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub email: EmailConfig,
    pub storage: StorageConfig,
    pub rate_limit: RateLimitConfig,
    pub products: Vec<ProductConfig>,
}

/// A marketed product: slug, display name, guide document, call-to-action URL.
/// Defined at process start; never mutated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    pub slug: String,
    pub name: String,
    pub ebook_filename: String,
    pub offer_url: String,
}

impl Config {
    pub fn from_env_and_file() -> Result<Self> {
        // Load from config.yml if it exists
        let mut config = if std::path::Path::new("config.yml").exists() {
            let config_str =
                std::fs::read_to_string("config.yml").context("Failed to read config.yml")?;
            serde_yaml::from_str::<Config>(&config_str).context("Failed to parse config.yml")?
        } else {
            Config::default()
        };

        // Override with environment variables
        if let Ok(host) = env::var("SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            config.server.port = port.parse().context("Invalid SERVER_PORT")?;
        }
        if let Ok(environment) = env::var("APP_ENV") {
            config.server.environment = environment;
        }
        if let Ok(origin) = env::var("CORS_ORIGIN") {
            config.server.cors_origin = origin;
        }

        if let Ok(provider) = env::var("EMAIL_PROVIDER") {
            config.email.provider = provider;
        }
        if let Ok(api_key) = env::var("SENDGRID_API_KEY") {
            config.email.sendgrid = Some(email::SendGridConfig { api_key });
        }
        if let Ok(api_key) = env::var("BREVO_API_KEY") {
            config.email.brevo = Some(email::BrevoConfig { api_key });
        }
        if let Ok(from_email) = env::var("FROM_EMAIL") {
            config.email.from_email = from_email;
        }
        if let Ok(from_name) = env::var("FROM_NAME") {
            config.email.from_name = Some(from_name);
        }

        if let Ok(window) = env::var("RATE_LIMIT_WINDOW_MINUTES") {
            config.rate_limit.window_minutes =
                window.parse().context("Invalid RATE_LIMIT_WINDOW_MINUTES")?;
        }
        if let Ok(max) = env::var("RATE_LIMIT_MAX_REQUESTS") {
            config.rate_limit.max_requests =
                max.parse().context("Invalid RATE_LIMIT_MAX_REQUESTS")?;
        }

        if let Ok(dir) = env::var("LEADS_DIR") {
            config.storage.leads_dir = dir.into();
        }
        if let Ok(dir) = env::var("TEMPLATES_DIR") {
            config.storage.templates_dir = dir.into();
        }
        if let Ok(dir) = env::var("EBOOKS_DIR") {
            config.storage.ebooks_dir = dir.into();
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            email: EmailConfig::default(),
            storage: StorageConfig::default(),
            rate_limit: RateLimitConfig::default(),
            products: default_products(),
        }
    }
}

fn default_products() -> Vec<ProductConfig> {
    vec![
        ProductConfig {
            slug: "mitolyn".to_string(),
            name: "Mitolyn".to_string(),
            ebook_filename: "mitolyn-guide.pdf".to_string(),
            offer_url:
                "https://mitolyn.com/welcome/?hop=jkqueiroz&hopId=912f3c24-304a-43f9-a90c-e904f4178b81"
                    .to_string(),
        },
        ProductConfig {
            slug: "prostavive".to_string(),
            name: "ProstaVive".to_string(),
            ebook_filename: "prostavive-guide.pdf".to_string(),
            offer_url: "https://prostavive.org/?hopId=b5e0f2b7-7d3d-4aaf-8a1e-07ae2643bf3c"
                .to_string(),
        },
    ]
}
