//! Mercado Pago Payment API Library
//!
//! Accepts card-payment requests, exchanges the card for a single-use token
//! with Mercado Pago, charges that token and returns a normalized envelope.
//!
//! # Modules
//!
//! - `api`: HTTP-facing handlers.
//! - `core`: Payment pipeline, validation and shared errors/models.
//! - `integrations`: Mercado Pago client and wire types.
//! - `app`: Router assembly.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `gateway_client`: Mercado Pago API client.
//! - `handlers`: HTTP request handlers.
//! - `idempotency`: Idempotency keys for charge calls.
//! - `mercadopago_models`: Mercado Pago request/response types.
//! - `models`: Inbound request and outbound envelope.
//! - `orchestrator`: validate → tokenize → charge pipeline.
//! - `validation`: Payment request preconditions.
//! - `webhook_handler`: Mercado Pago webhook receiver.
//! - `webhook_models`: Webhook payload models.

pub mod api;
pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and the binary
pub mod app;
pub mod config;
pub mod errors;
pub mod gateway_client;
pub mod handlers;
pub mod idempotency;
pub mod mercadopago_models;
pub mod models;
pub mod orchestrator;
pub mod validation;
pub mod webhook_handler;
pub mod webhook_models;
