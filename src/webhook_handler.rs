use crate::errors::AppError;
use crate::handlers::AppState;
use crate::webhook_models::{WebhookNotification, WebhookResponse};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// Mercado Pago Webhook Handler
///
/// Accepts any JSON object and acknowledges it. When a webhook secret is
/// configured the `x-signature` header must verify; otherwise a missing
/// signature is only logged.
pub async fn mercadopago_webhook(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    payload: Result<Json<WebhookNotification>, JsonRejection>,
) -> Result<(StatusCode, Json<WebhookResponse>), AppError> {
    let Json(notification) = payload.map_err(|e| {
        tracing::warn!("Rejected webhook body: {}", e);
        AppError::BadRequest("Invalid webhook payload".to_string())
    })?;

    let signature = header_str(&headers, "x-signature");
    match (&state.config.webhook_secret, signature) {
        (Some(secret), _) => {
            let data_id = query
                .get("data.id")
                .cloned()
                .or_else(|| notification.data_id());
            verify_signature(
                secret,
                signature,
                data_id.as_deref(),
                header_str(&headers, "x-request-id"),
            )?;
        }
        (None, None) => tracing::warn!("Webhook received without signature"),
        (None, Some(_)) => tracing::debug!("Webhook signature present but no secret configured"),
    }

    tracing::info!(
        "Received webhook notification: type={}, action={}, data.id={}, {} field(s)",
        notification.topic().unwrap_or("-"),
        notification.action().unwrap_or("-"),
        notification.data_id().as_deref().unwrap_or("-"),
        notification.field_count()
    );
    tracing::debug!("Webhook body: {:?}", notification);

    Ok((StatusCode::OK, Json(WebhookResponse::received())))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Parsed `x-signature` header: `ts=<timestamp>,v1=<hex hmac>`.
#[derive(Debug, PartialEq, Eq)]
pub struct SignatureHeader<'a> {
    pub ts: &'a str,
    pub v1: &'a str,
}

pub fn parse_signature_header(raw: &str) -> Option<SignatureHeader<'_>> {
    let mut ts = None;
    let mut v1 = None;
    for part in raw.split(',') {
        let (key, value) = part.split_once('=')?;
        match key.trim() {
            "ts" => ts = Some(value.trim()),
            "v1" => v1 = Some(value.trim()),
            _ => {}
        }
    }
    Some(SignatureHeader { ts: ts?, v1: v1? })
}

/// Builds the string Mercado Pago signs. Parts with no value are left out.
pub fn signature_manifest(data_id: Option<&str>, request_id: Option<&str>, ts: &str) -> String {
    let mut manifest = String::new();
    if let Some(id) = data_id.filter(|s| !s.is_empty()) {
        let id = if id.chars().all(|c| c.is_ascii_alphanumeric()) {
            id.to_ascii_lowercase()
        } else {
            id.to_string()
        };
        manifest.push_str(&format!("id:{};", id));
    }
    if let Some(request_id) = request_id.filter(|s| !s.is_empty()) {
        manifest.push_str(&format!("request-id:{};", request_id));
    }
    manifest.push_str(&format!("ts:{};", ts));
    manifest
}

/// Verify `x-signature` against the configured secret.
pub fn verify_signature(
    secret: &str,
    signature: Option<&str>,
    data_id: Option<&str>,
    request_id: Option<&str>,
) -> Result<(), AppError> {
    let raw = signature
        .ok_or_else(|| AppError::Unauthorized("Missing x-signature header".to_string()))?;
    let parsed = parse_signature_header(raw)
        .ok_or_else(|| AppError::Unauthorized("Malformed x-signature header".to_string()))?;
    let expected = hex::decode(parsed.v1)
        .map_err(|_| AppError::Unauthorized("Malformed x-signature header".to_string()))?;

    let manifest = signature_manifest(data_id, request_id, parsed.ts);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::InternalError(format!("Invalid webhook secret: {}", e)))?;
    mac.update(manifest.as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| AppError::Unauthorized("Invalid webhook signature".to_string()))
}
