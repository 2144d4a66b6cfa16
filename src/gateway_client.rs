use crate::config::GatewayConfig;
use crate::errors::{AppError, UpstreamError};
use crate::idempotency::IdempotencyKey;
use crate::mercadopago_models::{
    CardToken, CardTokenRequest, Cardholder, IdentificationRef, PayerRef, PaymentCreateRequest,
    PaymentRecord,
};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};

pub const IDEMPOTENCY_HEADER: &str = "X-Idempotency-Key";

/// Card and holder data needed to mint a card token.
#[derive(Clone, Copy)]
pub struct CardDetails<'a> {
    pub card_number: &'a str,
    pub holder_name: &'a str,
    pub doc_type: &'a str,
    pub doc_number: &'a str,
    pub security_code: &'a str,
    pub expiration_month: &'a str,
    pub expiration_year: &'a str,
}

/// Everything the charge call needs besides the idempotency key.
#[derive(Debug, Clone, Copy)]
pub struct ChargeDetails<'a> {
    pub token: &'a str,
    pub payment_method_id: &'a str,
    pub amount: f64,
    pub installments: u32,
    pub doc_type: &'a str,
    pub doc_number: &'a str,
    pub email: &'a str,
}

/// Client for the Mercado Pago card-token and payment APIs.
///
/// Holds no mutable state: cloning shares the underlying connection pool, so
/// one instance serves every concurrent pipeline.
#[derive(Clone)]
pub struct MercadoPagoClient {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl MercadoPagoClient {
    /// Creates a new `MercadoPagoClient` with the configured per-call timeout.
    pub fn new(config: GatewayConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create Mercado Pago client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Exchanges raw card data for a single-use card token.
    ///
    /// # Returns
    ///
    /// * `Result<CardToken, UpstreamError>` - The token, or the status and raw
    ///   body of whatever the provider answered.
    pub async fn tokenize_card(&self, card: &CardDetails<'_>) -> Result<CardToken, UpstreamError> {
        let body = CardTokenRequest {
            card_number: card.card_number,
            security_code: card.security_code,
            expiration_month: card.expiration_month,
            expiration_year: card.expiration_year,
            cardholder: Cardholder {
                name: card.holder_name,
                identification: IdentificationRef {
                    doc_type: card.doc_type,
                    number: card.doc_number,
                },
            },
        };

        tracing::info!("Requesting card token from Mercado Pago");
        let token: CardToken = self.post_json("/v1/card_tokens", &body, None).await?;
        tracing::debug!(
            "Card token {} issued (last four: {})",
            token.id,
            token.last_four_digits.as_deref().unwrap_or("n/a")
        );
        Ok(token)
    }

    /// Creates a payment for a previously issued card token.
    ///
    /// A fresh idempotency key is drawn for every call. If no key can be
    /// generated the request is never sent.
    pub async fn create_charge(&self, charge: &ChargeDetails<'_>) -> Result<PaymentRecord, AppError> {
        let key = IdempotencyKey::generate()?;

        let body = PaymentCreateRequest {
            transaction_amount: charge.amount,
            installments: charge.installments,
            payment_method_id: charge.payment_method_id,
            token: charge.token,
            payer: PayerRef {
                email: charge.email,
                payer_type: "customer",
                identification: IdentificationRef {
                    doc_type: charge.doc_type,
                    number: charge.doc_number,
                },
            },
        };

        tracing::info!(
            "Creating payment in Mercado Pago (idempotency key {})",
            key
        );
        let record = self.post_json("/v1/payments", &body, Some(&key)).await?;
        Ok(record)
    }

    async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<T, UpstreamError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, path);

        let mut request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.access_token))
            .json(body);
        if let Some(key) = idempotency_key {
            request = request.header(IDEMPOTENCY_HEADER, key.as_str());
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Mercado Pago request to {} failed: {}", path, e);
            UpstreamError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!("Failed to read Mercado Pago response from {}: {}", path, e);
            UpstreamError::from(e)
        })?;

        if status != StatusCode::OK && status != StatusCode::CREATED {
            tracing::error!("Mercado Pago {} returned {}: {}", path, status, text);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| UpstreamError::Decode {
            status: status.as_u16(),
            body: text,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = MercadoPagoClient::new(GatewayConfig::new(
            "https://example.com/",
            "token".to_string(),
        ));
        assert_eq!(client.unwrap().config.base_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = MercadoPagoClient::new(
            GatewayConfig::new("http://127.0.0.1:9", "token")
                .with_timeout(std::time::Duration::from_secs(2)),
        )
        .unwrap();

        let err = client
            .tokenize_card(&CardDetails {
                card_number: "4509953566233704",
                holder_name: "Test User",
                doc_type: "DNI",
                doc_number: "12345678",
                security_code: "123",
                expiration_month: "11",
                expiration_year: "2025",
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), None);
        assert!(err.body().is_none());
    }
}
