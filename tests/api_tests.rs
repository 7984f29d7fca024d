//! End-to-end tests for the HTTP surface, driving the real router with the
//! log email provider and temp storage directories.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::Path;
use tower::ServiceExt;

use lead_capture_service::{build_router, AppState, Config};

fn test_config(tmp: &Path) -> Config {
    let mut config = Config::default();
    config.email.provider = "log".to_string();
    config.email.from_email = "guides@example.com".to_string();
    config.storage.leads_dir = tmp.join("leads");
    config.storage.templates_dir = tmp.join("templates");
    config.storage.ebooks_dir = tmp.join("ebooks");
    config.rate_limit.enabled = false;
    config
}

fn test_app(config: Config) -> (Router, AppState) {
    let state = AppState::new(config).unwrap();
    (build_router(state.clone()), state)
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            builder.body(Body::from(value.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn submission(name: &str, email: &str, slug: &str) -> Value {
    json!({ "name": name, "email": email, "productSlug": slug })
}

#[tokio::test]
async fn valid_submission_records_lead_and_reports_success() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = test_app(test_config(tmp.path()));

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/submit-email",
        Some(submission("Jane Doe", "jane@example.com", "mitolyn")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Email sent successfully!"));
    assert_eq!(body["product"], json!("Mitolyn"));

    let contents = std::fs::read_to_string(state.leads.leads_file("mitolyn")).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "\"Timestamp\",\"Name\",\"Email\",\"Product\"");
    assert!(lines[1].contains("\"Jane Doe\""));
    assert!(lines[1].contains("\"jane@example.com\""));
    assert!(lines[1].contains("\"mitolyn\""));
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = test_app(test_config(tmp.path()));

    let bodies = [
        json!({ "email": "jane@example.com", "productSlug": "mitolyn" }),
        json!({ "name": "Jane", "productSlug": "mitolyn" }),
        json!({ "name": "Jane", "email": "jane@example.com" }),
        json!({ "name": "", "email": "jane@example.com", "productSlug": "mitolyn" }),
        json!({}),
    ];

    for body in bodies {
        let (status, response) = send_json(&app, "POST", "/api/submit-email", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["success"], json!(false));
        assert_eq!(
            response["message"],
            json!("Name, email, and productSlug are required")
        );
    }

    assert!(!state.leads.leads_file("mitolyn").exists());
}

#[tokio::test]
async fn unknown_product_is_rejected_without_recording() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = test_app(test_config(tmp.path()));

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/submit-email",
        Some(submission("Jane", "jane@example.com", "snake-oil")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Invalid product"));
    assert!(!state.leads.leads_file("snake-oil").exists());
}

#[tokio::test]
async fn invalid_email_shapes_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = test_app(test_config(tmp.path()));

    for email in ["not-an-email", "a@b", "jane doe@example.com"] {
        let (status, body) = send_json(
            &app,
            "POST",
            "/api/submit-email",
            Some(submission("Jane", email, "mitolyn")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "email {email:?}");
        assert_eq!(body["message"], json!("Invalid email address"));
    }

    assert!(!state.leads.leads_file("mitolyn").exists());
}

#[tokio::test]
async fn submission_succeeds_when_attachment_file_exists() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    std::fs::create_dir_all(&config.storage.ebooks_dir).unwrap();
    std::fs::write(
        config.storage.ebooks_dir.join("mitolyn-guide.pdf"),
        b"%PDF-1.4",
    )
    .unwrap();
    let (app, _state) = test_app(config);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/submit-email",
        Some(submission("Jane", "jane@example.com", "mitolyn")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn duplicate_submissions_append_two_records() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = test_app(test_config(tmp.path()));

    for _ in 0..2 {
        let (status, _) = send_json(
            &app,
            "POST",
            "/api/submit-email",
            Some(submission("Jane", "jane@example.com", "mitolyn")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let contents = std::fs::read_to_string(state.leads.leads_file("mitolyn")).unwrap();
    // header + two records: no deduplication
    assert_eq!(contents.lines().count(), 3);
}

#[tokio::test]
async fn custom_template_is_used_when_present() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let template_dir = config.storage.templates_dir.join("mitolyn");
    std::fs::create_dir_all(&template_dir).unwrap();
    std::fs::write(
        template_dir.join("email.html"),
        "<p>{{NAME}} meets {{PRODUCT_NAME}}</p>",
    )
    .unwrap();
    let (app, _state) = test_app(config);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/submit-email",
        Some(submission("Jane", "jane@example.com", "mitolyn")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn health_reports_products_and_timestamp() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(test_config(tmp.path()));

    let (status, body) = send_json(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["products"], json!(["mitolyn", "prostavive"]));
    assert_eq!(body["environment"], json!("development"));
    assert!(body["timestamp"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn products_listing_pairs_slug_and_name() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(test_config(tmp.path()));

    let (status, body) = send_json(&app, "GET", "/api/products", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(
        body["products"],
        json!([
            { "slug": "mitolyn", "name": "Mitolyn" },
            { "slug": "prostavive", "name": "ProstaVive" },
        ])
    );
}

#[tokio::test]
async fn unmatched_route_returns_404_envelope() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(test_config(tmp.path()));

    let (status, body) = send_json(&app, "GET", "/api/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Endpoint not found"));
}

#[tokio::test]
async fn rate_limit_blocks_after_max_requests() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = test_config(tmp.path());
    config.rate_limit.enabled = true;
    config.rate_limit.max_requests = 2;
    let (app, _state) = test_app(config);

    for i in 0..2 {
        let request = Request::builder()
            .method("GET")
            .uri("/api/products")
            .header("X-Forwarded-For", "9.9.9.9")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "request {i}");
        assert!(response.headers().contains_key("x-ratelimit-remaining"));
    }

    let request = Request::builder()
        .method("GET")
        .uri("/api/products")
        .header("X-Forwarded-For", "9.9.9.9")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body["message"],
        json!("Too many requests, please try again later.")
    );

    // Health endpoint is outside the /api/ prefix and stays reachable
    let (status, _) = send_json(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

struct FailingProvider;

#[async_trait::async_trait]
impl lead_capture_service::email::EmailProvider for FailingProvider {
    async fn send_email(
        &self,
        _email: &lead_capture_service::email::EmailMessage,
    ) -> anyhow::Result<lead_capture_service::email::EmailResponse> {
        Ok(lead_capture_service::email::EmailResponse {
            message_id: None,
            status: lead_capture_service::email::EmailStatus::Failed(
                "quota exceeded".to_string(),
            ),
            provider: "failing".to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "failing"
    }

    async fn health_check(&self) -> anyhow::Result<bool> {
        Ok(false)
    }
}

#[tokio::test]
async fn delivery_failure_still_keeps_the_lead() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let mut state = AppState::new(config).unwrap();
    state.email = std::sync::Arc::new(lead_capture_service::EmailService::with_provider(
        Box::new(FailingProvider),
        "guides@example.com".to_string(),
        None,
        tmp.path().join("ebooks"),
    ));
    let app = build_router(state.clone());

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/submit-email",
        Some(submission("Jane", "jane@example.com", "mitolyn")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("Failed to process request. Please try again.")
    );

    // at-least-once lead capture: the record survives the failed send
    let contents = std::fs::read_to_string(state.leads.leads_file("mitolyn")).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[tokio::test]
async fn storage_failure_aborts_with_generic_500() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = test_config(tmp.path());
    // Point the leads directory below a regular file so the append fails
    std::fs::write(tmp.path().join("blocker"), b"").unwrap();
    config.storage.leads_dir = tmp.path().join("blocker").join("leads");
    let (app, _state) = test_app(config);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/submit-email",
        Some(submission("Jane", "jane@example.com", "mitolyn")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("Failed to process request. Please try again.")
    );
}
