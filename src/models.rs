use serde::{Deserialize, Deserializer, Serialize};

// ============ Inbound ============

/// Card payment request submitted by the merchant.
///
/// Every field defaults when missing from the JSON body or sent as `null`, so
/// that absent fields are reported by the validator rather than by the JSON
/// parser.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentRequest {
    /// Amount in minor currency units.
    #[serde(deserialize_with = "null_as_default")]
    pub amount: i64,
    /// Payer document type (e.g. "DNI", "CPF").
    #[serde(deserialize_with = "null_as_default")]
    pub doc_type: String,
    /// Payer document number.
    #[serde(deserialize_with = "null_as_default")]
    pub doc_number: String,
    /// Number of installments, at least 1.
    #[serde(deserialize_with = "null_as_default")]
    pub installments: i32,
    /// Card data exchanged for a token before charging.
    #[serde(deserialize_with = "null_as_default")]
    pub card: Card,
    /// Payer email. Falls back to the configured default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Raw card data as supplied by the merchant.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Card {
    #[serde(deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub holder_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expiration_month: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expiration_year: String,
    #[serde(deserialize_with = "null_as_default")]
    pub security_code: String,
    /// Payment method identifier, e.g. "visa" or "master".
    #[serde(rename = "payment_methods", deserialize_with = "null_as_default")]
    pub payment_method_id: String,
}

impl std::fmt::Debug for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Card")
            .field("number", &mask_card_number(&self.number))
            .field("holder_name", &self.holder_name)
            .field("expiration_month", &self.expiration_month)
            .field("expiration_year", &self.expiration_year)
            .field("security_code", &"[REDACTED]")
            .field("payment_method_id", &self.payment_method_id)
            .finish()
    }
}

/// Reads an explicit JSON `null` as the type's default value.
///
/// Pair with `#[serde(default)]` so a missing field behaves the same way.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps only the last four digits of a card or document number.
pub fn mask_card_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

// ============ Outbound ============

/// Normalized outcome of a successful charge.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChargeResult {
    pub payment_id: i64,
    pub status: String,
    pub status_detail: String,
    pub amount: f64,
    pub installments: u32,
    pub payment_method: String,
    /// Last four digits only; the full card number never leaves the pipeline.
    pub card_last_four: String,
    pub created_at: String,
}

/// Uniform envelope returned by every payment endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaymentResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ChargeResult>,
}

impl PaymentResponse {
    pub fn success(data: ChargeResult) -> Self {
        Self {
            success: true,
            message: Some("Payment processed successfully".to_string()),
            error: None,
            data: Some(data),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            data: None,
        }
    }
}
