use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mercado Pago notification body.
///
/// The provider's schema is not fixed, so the body is kept as an ordered
/// key/value map; helpers read the few well-known fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct WebhookNotification(pub Map<String, Value>);

impl WebhookNotification {
    /// Notification topic, e.g. "payment".
    pub fn topic(&self) -> Option<&str> {
        self.0
            .get("type")
            .or_else(|| self.0.get("topic"))
            .and_then(Value::as_str)
    }

    /// Action, e.g. "payment.created".
    pub fn action(&self) -> Option<&str> {
        self.0.get("action").and_then(Value::as_str)
    }

    /// `data.id`, as a string whether it was sent as a string or a number.
    pub fn data_id(&self) -> Option<String> {
        match self.0.get("data")?.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Number of top-level fields in the notification.
    pub fn field_count(&self) -> usize {
        self.0.len()
    }
}

/// Acknowledgement sent back to Mercado Pago.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WebhookResponse {
    pub status: String,
}

impl WebhookResponse {
    pub fn received() -> Self {
        Self {
            status: "received".to_string(),
        }
    }
}
