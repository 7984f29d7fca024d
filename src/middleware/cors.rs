use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Create the CORS layer for the configured origin.
///
/// "*" (the default) allows any origin; anything else restricts to that
/// single origin. Methods and headers match what the submission endpoint
/// needs.
pub fn create_cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if origin == "*" {
        return cors.allow_origin(Any);
    }

    match origin.parse::<HeaderValue>() {
        Ok(value) => cors.allow_origin(value),
        Err(_) => {
            warn!("Invalid CORS_ORIGIN {:?}, allowing any origin", origin);
            cors.allow_origin(Any)
        }
    }
}
