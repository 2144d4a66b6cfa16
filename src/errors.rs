use crate::models::PaymentResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

/// Reasons a payment request is rejected before any upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// `amount` is zero or negative.
    NonPositiveAmount,
    /// `doc_type` or `doc_number` is empty.
    MissingDocument,
    /// At least one of the six card fields is empty.
    MissingCardField,
    /// `installments` is zero or negative.
    NonPositiveInstallments,
    /// `email` was supplied but is not a usable address.
    InvalidEmail,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ValidationError::NonPositiveAmount => "Amount must be greater than 0",
            ValidationError::MissingDocument => "Document type and number are required",
            ValidationError::MissingCardField => "All card fields are required",
            ValidationError::NonPositiveInstallments => "Installments must be greater than 0",
            ValidationError::InvalidEmail => "Payer email is invalid",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ValidationError {}

/// The OS entropy source could not produce an idempotency key.
#[derive(Debug, Clone)]
pub struct GenerationError(pub String);

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to generate idempotency key: {}", self.0)
    }
}

impl std::error::Error for GenerationError {}

/// Failure talking to Mercado Pago.
///
/// Carries the HTTP status and raw body whenever the provider answered, so
/// the diagnostic text reaches the caller untouched.
#[derive(Debug, Clone)]
pub enum UpstreamError {
    /// Provider answered with a status other than 200/201.
    Status { status: u16, body: String },
    /// Provider answered 200/201 but the body did not match the expected shape.
    Decode {
        status: u16,
        body: String,
        reason: String,
    },
    /// The request never produced a response (DNS, connect, TLS, reset...).
    Transport(String),
    /// The per-call HTTP timeout elapsed.
    Timeout,
}

impl UpstreamError {
    /// HTTP status returned by the provider, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } | UpstreamError::Decode { status, .. } => {
                Some(*status)
            }
            UpstreamError::Transport(_) | UpstreamError::Timeout => None,
        }
    }

    /// Raw response body, if a response was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            UpstreamError::Status { body, .. } | UpstreamError::Decode { body, .. } => {
                Some(body.as_str())
            }
            UpstreamError::Transport(_) | UpstreamError::Timeout => None,
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Status { status, body } => write!(
                f,
                "Mercado Pago API error: status {}, response: {}",
                status, body
            ),
            UpstreamError::Decode {
                status,
                body,
                reason,
            } => write!(
                f,
                "failed to parse Mercado Pago response (status {}): {}, response: {}",
                status, reason, body
            ),
            UpstreamError::Transport(msg) => write!(f, "failed to send request: {}", msg),
            UpstreamError::Timeout => f.write_str("request to Mercado Pago timed out"),
        }
    }
}

impl std::error::Error for UpstreamError {}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// The payment request failed a precondition.
    Validation(ValidationError),
    /// No idempotency key could be produced.
    Generation(GenerationError),
    /// Mercado Pago rejected the call or could not be reached.
    Upstream(UpstreamError),
    /// Malformed request body.
    BadRequest(String),
    /// Webhook signature missing or invalid.
    Unauthorized(String),
    /// Resource not found error.
    NotFound(String),
    /// The payment pipeline ran past its deadline.
    Timeout(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl AppError {
    /// HTTP status the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Generation(_) | AppError::Upstream(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::WithContext { source, .. } => source.status_code(),
        }
    }
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    ///
    /// This text is what ends up in the `error` field of the envelope.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Generation(e) => write!(f, "{}", e),
            AppError::Upstream(e) => write!(f, "{}", e),
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Timeout(msg) => write!(f, "{}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into the `{success:false, error}` envelope.
    ///
    /// Logs errors according to their severity.
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Unauthorized access: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (status, Json(PaymentResponse::failure(self.to_string()))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::Generation(err)
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        AppError::Upstream(err)
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e.into()),
            context: context.into(),
        })
    }
}
