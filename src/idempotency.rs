use crate::errors::GenerationError;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

/// Bytes of OS entropy behind every key (128 bits).
pub const KEY_BYTES: usize = 16;

/// Value sent in `X-Idempotency-Key` on a charge call.
///
/// One key per charge attempt. Mercado Pago replays the original result for
/// a repeated key, so a key must never cross attempt boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Draws a fresh key from the OS entropy source.
    ///
    /// Fails only when the entropy source is unavailable; callers must not
    /// send a charge without a fresh key.
    pub fn generate() -> Result<Self, GenerationError> {
        let mut bytes = [0u8; KEY_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| GenerationError(e.to_string()))?;
        Ok(Self(hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
