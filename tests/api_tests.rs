/// HTTP-level tests for the router
/// Drives requests through the full axum stack with `oneshot`
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use hmac::{Hmac, Mac};
use rust_mp_payments_api::app::{api_routes, build_app};
use rust_mp_payments_api::config::{Config, GatewayConfig};
use rust_mp_payments_api::gateway_client::MercadoPagoClient;
use rust_mp_payments_api::handlers::AppState;
use rust_mp_payments_api::models::PaymentRequest;
use rust_mp_payments_api::orchestrator::PaymentOrchestrator;
use rust_mp_payments_api::webhook_handler::signature_manifest;
use serde_json::{json, Value};
use sha2::Sha256;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create test config
fn create_test_config(base_url: String, webhook_secret: Option<&str>) -> Config {
    Config {
        port: 8080,
        gateway: GatewayConfig::new(base_url, "TEST-token"),
        request_timeout: Duration::from_secs(10),
        default_payer_email: "user@example.com".to_string(),
        webhook_secret: webhook_secret.map(str::to_string),
        rate_limit_per_second: 10,
        rate_limit_burst: 20,
    }
}

fn create_state(config: Config) -> Arc<AppState> {
    let client = MercadoPagoClient::new(config.gateway.clone()).unwrap();
    let orchestrator = PaymentOrchestrator::new(
        client,
        config.default_payer_email.clone(),
        config.request_timeout,
    );
    Arc::new(AppState {
        config,
        orchestrator,
    })
}

fn create_app(config: Config) -> Router {
    build_app(create_state(config), api_routes())
}

async fn exploding_handler() -> StatusCode {
    panic!("payment state corrupted")
}

fn json_post(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn payment_json() -> Value {
    json!({
        "amount": 1000,
        "doc_type": "DNI",
        "doc_number": "12345678",
        "installments": 1,
        "card": {
            "number": "4509953566233704",
            "holder_name": "Test User",
            "expiration_month": "11",
            "expiration_year": "2025",
            "security_code": "123",
            "payment_methods": "visa"
        }
    })
}

#[tokio::test]
async fn test_health() {
    let app = create_app(create_test_config("http://127.0.0.1:9".into(), None));
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "ok", "service": "mercadopago-payment-api" })
    );
}

#[tokio::test]
async fn test_payment_success_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/card_tokens"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "tok_abc" })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/payments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 555,
            "status": "approved",
            "status_detail": "accredited",
            "transaction_amount": 1000,
            "installments": 1,
            "payment_method_id": "visa",
            "card": { "last_four_digits": "1234" },
            "date_created": "2024-05-01T10:00:01.000-04:00"
        })))
        .mount(&mock_server)
        .await;

    let app = create_app(create_test_config(mock_server.uri(), None));
    let (status, body) = send(app, json_post("/api/payments", payment_json().to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Payment processed successfully"));
    assert_eq!(body["data"]["payment_id"], json!(555));
    assert_eq!(body["data"]["status"], json!("approved"));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_validation_error_is_400_envelope() {
    let app = create_app(create_test_config("http://127.0.0.1:9".into(), None));
    let mut payload = payment_json();
    payload["installments"] = json!(0);

    let (status, body) = send(app, json_post("/api/payments", payload.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Installments must be greater than 0" })
    );
}

#[tokio::test]
async fn test_malformed_body_is_400_envelope() {
    let app = create_app(create_test_config("http://127.0.0.1:9".into(), None));
    let (status, body) = send(app, json_post("/api/payments", "{not json".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body: "));
}

#[tokio::test]
async fn test_upstream_failure_is_500_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/card_tokens"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "invalid access token"
        })))
        .mount(&mock_server)
        .await;

    let app = create_app(create_test_config(mock_server.uri(), None));
    let (status, body) = send(app, json_post("/api/payments", payment_json().to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert!(body.get("data").is_none());
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to generate card token: "));
    assert!(error.contains("invalid access token"));
}

#[tokio::test]
async fn test_unknown_route_is_404_envelope() {
    let app = create_app(create_test_config("http://127.0.0.1:9".into(), None));
    let request = Request::builder()
        .uri("/api/refunds")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_webhook_without_secret_always_acknowledges() {
    let app = create_app(create_test_config("http://127.0.0.1:9".into(), None));
    let notification = json!({ "action": "payment.updated", "data": { "id": "555" } });

    let (status, body) = send(app, json_post("/api/webhooks", notification.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "received" }));
}

#[tokio::test]
async fn test_webhook_invalid_payload() {
    let app = create_app(create_test_config("http://127.0.0.1:9".into(), None));
    let (status, body) = send(app, json_post("/api/webhooks", "[1, 2, 3]".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Invalid webhook payload" })
    );
}

#[tokio::test]
async fn test_webhook_signature_enforced_when_secret_set() {
    let secret = "whsec";
    let notification = json!({ "type": "payment", "data": { "id": "555" } });

    // Unsigned
    let app = create_app(create_test_config(
        "http://127.0.0.1:9".into(),
        Some(secret),
    ));
    let (status, _) = send(app, json_post("/api/webhooks", notification.to_string())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Correctly signed
    let manifest = signature_manifest(Some("555"), Some("req-42"), "1704908010");
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(manifest.as_bytes());
    let signature = format!(
        "ts=1704908010,v1={}",
        hex::encode(mac.finalize().into_bytes())
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/webhooks?data.id=555&type=payment")
        .header("content-type", "application/json")
        .header("x-signature", signature.as_str())
        .header("x-request-id", "req-42")
        .body(Body::from(notification.to_string()))
        .unwrap();

    let app = create_app(create_test_config(
        "http://127.0.0.1:9".into(),
        Some(secret),
    ));
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "received" }));
}

#[tokio::test]
async fn test_null_card_field_reported_by_validator() {
    let app = create_app(create_test_config("http://127.0.0.1:9".into(), None));
    let mut payload = payment_json();
    payload["card"]["number"] = Value::Null;

    let (status, body) = send(app, json_post("/api/payments", payload.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "error": "All card fields are required" })
    );
}

#[tokio::test]
async fn test_http_body_matches_orchestrator_envelope() {
    let config = create_test_config("http://127.0.0.1:9".into(), None);
    let state = create_state(config.clone());
    let mut payload = payment_json();
    payload["doc_type"] = json!("");

    let request: PaymentRequest = serde_json::from_value(payload.clone()).unwrap();
    let envelope = serde_json::to_value(state.orchestrator.process(&request).await).unwrap();

    let (status, body) = send(
        build_app(state, api_routes()),
        json_post("/api/payments", payload.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, envelope);
    assert_eq!(
        body["error"],
        json!("Document type and number are required")
    );
}

#[tokio::test]
async fn test_handler_panic_becomes_500_envelope() {
    let state = create_state(create_test_config("http://127.0.0.1:9".into(), None));
    let api = api_routes().route("/api/explode", get(exploding_handler));
    let app = build_app(state, api);

    let request = Request::builder()
        .uri("/api/explode")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert!(body.get("data").is_none());
    assert_eq!(
        body["error"],
        json!("Internal error: payment state corrupted")
    );
}
