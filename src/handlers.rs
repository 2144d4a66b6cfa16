use crate::config::Config;
use crate::errors::AppError;
use crate::models::{PaymentRequest, PaymentResponse};
use crate::orchestrator::PaymentOrchestrator;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{StatusCode, Uri},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// Immutable after startup; every request pipeline reads it concurrently.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Payment pipeline, holding the Mercado Pago client.
    pub orchestrator: PaymentOrchestrator,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "mercadopago-payment-api"
        })),
    )
}

/// POST /api/payments
///
/// Validates the request, tokenizes the card and charges it. The body matches
/// [`PaymentOrchestrator::process`]; errors additionally carry their status.
///
/// # Returns
///
/// * `Result<Json<PaymentResponse>, AppError>` - The success envelope, or an
///   error rendered as a failure envelope with the matching status code.
pub async fn process_payment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, AppError> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!("Error parsing request body: {}", e);
        AppError::BadRequest(format!("Invalid request body: {}", e.body_text()))
    })?;

    let result = state.orchestrator.process_payment(&request).await?;

    Ok(Json(PaymentResponse::success(result)))
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
