use serde::{Deserialize, Serialize};

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,
    /// Maximum submission requests accepted per client per window
    pub max_requests: u32,
    /// Fixed window duration in minutes
    pub window_minutes: u64,
    /// Upper bound on tracked windows before stale entries are evicted
    pub memory_cache_size: usize,
}

impl RateLimitConfig {
    pub fn window_seconds(&self) -> u64 {
        self.window_minutes * 60
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 10,
            window_minutes: 15,
            memory_cache_size: 10_000,
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Current count of requests in the window
    pub current_requests: u32,
    /// Maximum allowed requests
    pub max_requests: u32,
    /// Seconds until the window resets
    pub reset_time: u64,
    /// Time until retry is allowed (if blocked)
    pub retry_after: Option<u64>,
}
