//! Wire types for the Mercado Pago card-token and payment endpoints.

use crate::models::null_as_default;
use serde::{Deserialize, Serialize};

// ============ POST /v1/card_tokens ============

#[derive(Debug, Clone, Serialize)]
pub struct CardTokenRequest<'a> {
    pub card_number: &'a str,
    pub security_code: &'a str,
    pub expiration_month: &'a str,
    pub expiration_year: &'a str,
    pub cardholder: Cardholder<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Cardholder<'a> {
    pub name: &'a str,
    pub identification: IdentificationRef<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentificationRef<'a> {
    #[serde(rename = "type")]
    pub doc_type: &'a str,
    pub number: &'a str,
}

/// Single-use token returned by `/v1/card_tokens`.
///
/// Only `id` is required; the echoed card metadata varies by account setup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CardToken {
    pub id: String,
    #[serde(default)]
    pub first_six_digits: Option<String>,
    #[serde(default)]
    pub last_four_digits: Option<String>,
    #[serde(default)]
    pub expiration_month: Option<u32>,
    #[serde(default)]
    pub expiration_year: Option<u32>,
    #[serde(default)]
    pub creation_date: Option<String>,
}

// ============ POST /v1/payments ============

#[derive(Debug, Clone, Serialize)]
pub struct PaymentCreateRequest<'a> {
    pub transaction_amount: f64,
    pub installments: u32,
    pub payment_method_id: &'a str,
    pub token: &'a str,
    pub payer: PayerRef<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayerRef<'a> {
    pub email: &'a str,
    #[serde(rename = "type")]
    pub payer_type: &'a str,
    pub identification: IdentificationRef<'a>,
}

/// Payment record returned by `/v1/payments`.
///
/// Only `id`, `status` and `transaction_amount` are required. Every other
/// field accepts both absence and an explicit `null`, so a charge the
/// provider created is never reported as failed over metadata we do not read.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status_detail: String,
    pub transaction_amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub installments: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_method_id: String,
    #[serde(default)]
    pub payment_type_id: Option<String>,
    #[serde(default)]
    pub currency_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_created: String,
    #[serde(default)]
    pub date_approved: Option<String>,
    #[serde(default)]
    pub date_last_updated: Option<String>,
    #[serde(default)]
    pub money_release_date: Option<String>,
    #[serde(default)]
    pub operation_type: Option<String>,
    #[serde(default)]
    pub installment_amount: Option<f64>,
    #[serde(default)]
    pub collector_id: Option<i64>,
    #[serde(default)]
    pub external_reference: Option<String>,
    #[serde(default)]
    pub payer: Option<PaymentPayer>,
    #[serde(default)]
    pub transaction_details: Option<TransactionDetails>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fee_details: Vec<FeeDetail>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub card: PaymentCard,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PaymentPayer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub payer_type: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub identification: Option<PayerIdentification>,
}

/// Payer document as echoed on the payment record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PayerIdentification {
    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TransactionDetails {
    #[serde(default)]
    pub net_received_amount: Option<f64>,
    #[serde(default)]
    pub total_paid_amount: Option<f64>,
    #[serde(default)]
    pub overpaid_amount: Option<f64>,
    #[serde(default)]
    pub installment_amount: Option<f64>,
    #[serde(default)]
    pub financial_institution: Option<String>,
    #[serde(default)]
    pub external_resource_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FeeDetail {
    #[serde(rename = "type", default)]
    pub fee_type: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Card summary echoed on the payment; never contains the full PAN.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PaymentCard {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub first_six_digits: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_four_digits: String,
    #[serde(default)]
    pub expiration_month: Option<u32>,
    #[serde(default)]
    pub expiration_year: Option<u32>,
}
