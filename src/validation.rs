//! Precondition checks for inbound payment requests.
//!
//! Runs before any upstream call. Checks are ordered and the first failure
//! wins:
//!
//! 1. amount > 0
//! 2. document type and number present
//! 3. all six card fields present
//! 4. installments > 0
//! 5. payer email well formed, when supplied

use crate::errors::ValidationError;
use crate::models::{Card, PaymentRequest};
use regex::Regex;
use std::sync::OnceLock;

/// Validate a payment request without touching the network.
pub fn validate_payment_request(request: &PaymentRequest) -> Result<(), ValidationError> {
    if request.amount <= 0 {
        return Err(ValidationError::NonPositiveAmount);
    }

    if is_blank(&request.doc_type) || is_blank(&request.doc_number) {
        return Err(ValidationError::MissingDocument);
    }

    if !card_is_complete(&request.card) {
        return Err(ValidationError::MissingCardField);
    }

    if request.installments <= 0 {
        return Err(ValidationError::NonPositiveInstallments);
    }

    if let Some(email) = supplied_email(request) {
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
    }

    Ok(())
}

/// The payer email from the request, ignoring blank values.
pub fn supplied_email(request: &PaymentRequest) -> Option<&str> {
    request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
}

fn card_is_complete(card: &Card) -> bool {
    [
        &card.number,
        &card.holder_name,
        &card.expiration_month,
        &card.expiration_year,
        &card.security_code,
        &card.payment_method_id,
    ]
    .iter()
    .all(|field| !is_blank(field))
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    // RFC 5322 simplified: local@domain.tld
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
        )
        .expect("email regex is valid")
    })
}

/// Validate a payer email address.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || email.len() > 254 {
        return false;
    }
    email_regex().is_match(email)
}
