//! Router assembly shared by the binary and the HTTP tests.

use crate::handlers::{self, AppState};
use crate::models::PaymentResponse;
use crate::webhook_handler;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

/// Maximum accepted body size on `/api/*` routes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Payment and webhook routes, without state or outer layers.
///
/// `main` wraps these with body-size and rate limiting before handing them
/// to [`build_app`].
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/payments", post(handlers::process_payment))
        .route("/api/webhooks", post(webhook_handler::mercadopago_webhook))
}

/// Adds the health probe, the 404 fallback and the outer layers.
pub fn build_app(state: Arc<AppState>, api: Router<Arc<AppState>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Turns a handler panic into the standard failure envelope.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(PaymentResponse::failure(format!("Internal error: {}", detail))),
    )
        .into_response()
}
