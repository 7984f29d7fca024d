// Library exports for lead-capture-service
pub mod catalog;
pub mod config;
pub mod email;
pub mod errors;
pub mod handlers;
pub mod leads;
pub mod middleware;
pub mod validation;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use catalog::ProductCatalog;
pub use config::Config;
pub use email::EmailService;
pub use leads::LeadStore;

/// Shared per-process state: read-only configuration plus the service
/// components, all constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<ProductCatalog>,
    pub leads: Arc<LeadStore>,
    pub templates: Arc<email::templates::TemplateResolver>,
    pub email: Arc<EmailService>,
    pub validator: Arc<validation::InputValidator>,
    pub rate_limiter: Arc<middleware::MemoryRateLimitStore>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let catalog = ProductCatalog::from_config(&config.products);
        let leads = LeadStore::new(config.storage.leads_dir.clone());
        let templates =
            email::templates::TemplateResolver::new(config.storage.templates_dir.clone());
        let email_service =
            EmailService::new(&config.email, config.storage.ebooks_dir.clone())?;
        let validator = validation::InputValidator::new()?;
        let rate_limiter =
            middleware::MemoryRateLimitStore::new(config.rate_limit.memory_cache_size);

        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            leads: Arc::new(leads),
            templates: Arc::new(templates),
            email: Arc::new(email_service),
            validator: Arc::new(validator),
            rate_limiter: Arc::new(rate_limiter),
        })
    }
}

/// Build the application router with all routes and layers.
pub fn build_router(state: AppState) -> Router {
    let cors_origin = state.config.server.cors_origin.clone();

    Router::new()
        .route("/api/submit-email", post(handlers::submit_email))
        .route("/api/products", get(handlers::list_products))
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .with_state(state.clone())
        .layer(from_fn_with_state(state, middleware::rate_limit_middleware))
        .layer(middleware::create_cors_layer(&cors_origin))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
