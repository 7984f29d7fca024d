use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{debug, warn};

use crate::{
    config::rate_limit::{RateLimitConfig, RateLimitStatus},
    errors::AppError,
    AppState,
};

/// In-memory fixed-window rate limiting store
#[derive(Debug, Clone)]
pub struct MemoryRateLimitStore {
    store: Arc<Mutex<HashMap<String, (u32, u64)>>>, // (count, window_start)
    max_size: usize,
}

impl MemoryRateLimitStore {
    pub fn new(max_size: usize) -> Self {
        Self {
            store: Arc::new(Mutex::new(HashMap::new())),
            max_size,
        }
    }

    pub fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
        current_time: u64,
    ) -> RateLimitStatus {
        let mut store = self.store.lock().unwrap();
        let window_seconds = config.window_seconds();

        let window_start = (current_time / window_seconds) * window_seconds;
        let full_key = format!("{}:{}", key, window_start);

        // Clean up old entries if store is getting too large
        if store.len() > self.max_size {
            store.retain(|_k, (_, window)| current_time - *window < window_seconds * 2);
        }

        let (current_count, _) = store.entry(full_key).or_insert((0, window_start));

        let new_count = *current_count + 1;
        let allowed = new_count <= config.max_requests;

        if allowed {
            *current_count = new_count;
        }

        let reset_time = window_start + window_seconds - current_time;
        let retry_after = if !allowed { Some(reset_time) } else { None };

        RateLimitStatus {
            allowed,
            current_requests: new_count,
            max_requests: config.max_requests,
            reset_time,
            retry_after,
        }
    }
}

/// Rate limiting middleware: fixed window per client IP, applied to /api/
/// paths only.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let config = &state.config.rate_limit;
    let path = request.uri().path();

    if !config.enabled || !path.starts_with("/api/") {
        return Ok(next.run(request).await);
    }

    let fallback_ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let client_ip = get_client_ip(&request, fallback_ip);

    debug!(
        "Rate limiting check for {} {} from IP: {}",
        request.method(),
        path,
        client_ip
    );

    let current_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::Internal)?
        .as_secs();

    let key = format!("ip:{}", client_ip);
    let status = state
        .rate_limiter
        .check_and_increment(&key, config, current_time);

    if !status.allowed {
        warn!(
            "Rate limit exceeded for {} from IP {}: {}/{} requests",
            path, client_ip, status.current_requests, status.max_requests
        );

        let mut response = AppError::RateLimited.into_response();
        add_rate_limit_headers(&mut response, &status, current_time);
        return Ok(response);
    }

    let mut response = next.run(request).await;
    add_rate_limit_headers(&mut response, &status, current_time);
    Ok(response)
}

fn add_rate_limit_headers(response: &mut Response, status: &RateLimitStatus, current_time: u64) {
    let headers = response.headers_mut();

    if let Ok(limit_header) = HeaderValue::from_str(&status.max_requests.to_string()) {
        headers.insert("X-RateLimit-Limit", limit_header);
    }

    if let Ok(remaining_header) = HeaderValue::from_str(
        &(status.max_requests.saturating_sub(status.current_requests)).to_string(),
    ) {
        headers.insert("X-RateLimit-Remaining", remaining_header);
    }

    if let Ok(reset_header) = HeaderValue::from_str(&(current_time + status.reset_time).to_string())
    {
        headers.insert("X-RateLimit-Reset", reset_header);
    }

    if let Some(retry_after) = status.retry_after {
        if let Ok(retry_header) = HeaderValue::from_str(&retry_after.to_string()) {
            headers.insert("Retry-After", retry_header);
        }
    }
}

/// Extract client IP from request headers or connection info
fn get_client_ip(request: &Request, fallback_ip: String) -> String {
    // Check X-Forwarded-For header (proxy/load balancer)
    if let Some(forwarded_for) = request.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    // Check X-Real-IP header (nginx proxy)
    if let Some(real_ip) = request.headers().get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            return ip_str.to_string();
        }
    }

    // Fallback to connection IP
    fallback_ip
}
