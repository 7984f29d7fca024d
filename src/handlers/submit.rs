use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    catalog::Product,
    errors::{AppError, AppResult},
    AppState,
};

/// Body of POST /api/submit-email. Fields are optional so presence is
/// checked here with the exact client-facing message, not by the
/// deserializer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEmailRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub product_slug: Option<String>,
}

/// Capture a lead and email the product guide.
///
/// Flow: validate, record the lead, render the template, dispatch the
/// email, respond. The lead is durably recorded before any send attempt;
/// a delivery failure does not retract it.
pub async fn submit_email(
    State(state): State<AppState>,
    Json(payload): Json<SubmitEmailRequest>,
) -> AppResult<Json<Value>> {
    let (name, email, product_slug) = validate(&state, &payload)?;
    let product = lookup_product(&state, product_slug)?;

    info!(
        "Request received [{}]: name={} email={}",
        product_slug, name, email
    );

    state
        .leads
        .record(product_slug, name, email)
        .await
        .map_err(|e| AppError::Storage(format!("{e:#}")))?;

    let html_content = state.templates.resolve(product_slug, product, name).await;

    state
        .email
        .send_guide(product_slug, product, name, email, html_content)
        .await
        .map_err(|e| AppError::Email(format!("{e:#}")))?;

    Ok(Json(json!({
        "success": true,
        "message": "Email sent successfully!",
        "product": product.name,
    })))
}

fn validate<'a>(
    state: &AppState,
    payload: &'a SubmitEmailRequest,
) -> Result<(&'a str, &'a str, &'a str), AppError> {
    let (name, email, product_slug) = match (&payload.name, &payload.email, &payload.product_slug)
    {
        (Some(name), Some(email), Some(slug))
            if !name.is_empty() && !email.is_empty() && !slug.is_empty() =>
        {
            (name.as_str(), email.as_str(), slug.as_str())
        }
        _ => {
            return Err(AppError::validation(
                "Name, email, and productSlug are required",
            ))
        }
    };

    if state.catalog.get(product_slug).is_none() {
        return Err(AppError::validation("Invalid product"));
    }

    if !state.validator.is_valid_email(email) {
        return Err(AppError::validation("Invalid email address"));
    }

    Ok((name, email, product_slug))
}

fn lookup_product<'a>(state: &'a AppState, slug: &str) -> Result<&'a Product, AppError> {
    // validate() already checked the slug; this keeps the borrow local
    state.catalog.get(slug).ok_or(AppError::Internal)
}
