use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Environment tag reported by the health endpoint (development, production)
    pub environment: String,
    /// Allowed cross-origin value; "*" means any origin
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "development".to_string(),
            cors_origin: "*".to_string(),
        }
    }
}
