//! External service integrations.

pub mod gateway_client {
    pub use crate::gateway_client::*;
}

pub mod mercadopago_models {
    pub use crate::mercadopago_models::*;
}

pub mod webhook_models {
    pub use crate::webhook_models::*;
}
