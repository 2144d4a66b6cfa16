//! Payment submission pipeline.
//!
//! validate → tokenize → charge → normalize, strictly in that order. A failure
//! at any step ends the pipeline; nothing is retried and nothing is
//! compensated (a token minted before a failed charge simply expires).

use crate::errors::{AppError, ResultExt};
use crate::gateway_client::{CardDetails, ChargeDetails, MercadoPagoClient};
use crate::mercadopago_models::PaymentRecord;
use crate::models::{mask_card_number, ChargeResult, PaymentRequest, PaymentResponse};
use crate::validation::{supplied_email, validate_payment_request};
use std::time::Duration;

pub const TOKENIZE_FAILURE: &str = "Failed to generate card token";
pub const CHARGE_FAILURE: &str = "Failed to create payment";

pub struct PaymentOrchestrator {
    gateway: MercadoPagoClient,
    default_payer_email: String,
    deadline: Duration,
}

impl PaymentOrchestrator {
    pub fn new(
        gateway: MercadoPagoClient,
        default_payer_email: impl Into<String>,
        deadline: Duration,
    ) -> Self {
        Self {
            gateway,
            default_payer_email: default_payer_email.into(),
            deadline,
        }
    }

    /// Runs the pipeline and folds the outcome into the response envelope.
    ///
    /// For callers that only need the envelope. The HTTP handler goes through
    /// [`Self::process_payment`] instead so the error can pick the status
    /// code; both produce the same envelope body.
    pub async fn process(&self, request: &PaymentRequest) -> PaymentResponse {
        match self.process_payment(request).await {
            Ok(result) => PaymentResponse::success(result),
            Err(e) => PaymentResponse::failure(e.to_string()),
        }
    }

    /// Runs the pipeline under the configured deadline.
    ///
    /// When the deadline fires the in-flight upstream call is dropped. A
    /// charge that was already accepted upstream cannot be observed from here.
    pub async fn process_payment(&self, request: &PaymentRequest) -> Result<ChargeResult, AppError> {
        match tokio::time::timeout(self.deadline, self.run_pipeline(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    "Payment pipeline exceeded {:?}; upstream outcome unknown",
                    self.deadline
                );
                Err(AppError::Timeout(
                    "Payment processing timed out; the payment status is unknown".to_string(),
                ))
            }
        }
    }

    async fn run_pipeline(&self, request: &PaymentRequest) -> Result<ChargeResult, AppError> {
        validate_payment_request(request)?;

        tracing::info!(
            "Processing payment for amount: {}, doc: {} {}",
            request.amount,
            request.doc_type,
            mask_card_number(&request.doc_number)
        );

        let card = &request.card;
        let token = self
            .gateway
            .tokenize_card(&CardDetails {
                card_number: &card.number,
                holder_name: &card.holder_name,
                doc_type: &request.doc_type,
                doc_number: &request.doc_number,
                security_code: &card.security_code,
                expiration_month: &card.expiration_month,
                expiration_year: &card.expiration_year,
            })
            .await
            .context(TOKENIZE_FAILURE)?;

        tracing::info!("Card token generated successfully: {}", token.id);

        let email = supplied_email(request).unwrap_or(&self.default_payer_email);
        let record = self
            .gateway
            .create_charge(&ChargeDetails {
                token: &token.id,
                payment_method_id: &card.payment_method_id,
                amount: request.amount as f64,
                installments: request.installments as u32,
                doc_type: &request.doc_type,
                doc_number: &request.doc_number,
                email,
            })
            .await
            .context(CHARGE_FAILURE)?;

        tracing::info!(
            "Payment created successfully with ID: {}, Status: {}",
            record.id,
            record.status
        );

        Ok(normalize(record))
    }
}

/// Reduces the provider's payment record to the client-facing fields.
pub fn normalize(record: PaymentRecord) -> ChargeResult {
    ChargeResult {
        payment_id: record.id,
        status: record.status,
        status_detail: record.status_detail,
        amount: record.transaction_amount,
        installments: record.installments,
        payment_method: record.payment_method_id,
        card_last_four: record.card.last_four_digits,
        created_at: record.date_created,
    }
}
