//! # enroll-rs
//!
//! Backend for a course enrolment site: a durable registration store and a
//! verifying proxy in front of the payment provider.
//!
//! ## Features
//!
//! - **Registration Store**: validation, case-insensitive email dedup,
//!   crash-safe whole-collection JSON persistence with transient-error retry
//! - **Serialized Writes**: one async mutex per store around every
//!   read-modify-write cycle
//! - **Payment Gateway**: order creation in minor units, HMAC-SHA256 checkout
//!   verification in constant time, captured-only acceptance
//! - **Notifications**: best-effort log or webhook events after success
//! - **HTTP Surface**: axum routes with `{success, ...}` envelopes, single-origin
//!   CORS, graceful shutdown
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use enroll::prelude::*;
//!
//! let store = RegistrationStore::new(Arc::new(
//!     JsonFileStore::<RegistrationRecord>::new("data/users.json"),
//! ));
//!
//! let provider = RazorpayProvider::new(RazorpayConfig::new(key_id, key_secret))?;
//! let gateway = PaymentGateway::new(
//!     Arc::new(provider),
//!     SignatureVerifier::new(key_secret)?,
//!     key_id,
//! );
//!
//! ServerBuilder::new()
//!     .with_registration_store(store)
//!     .with_payment_gateway(gateway)
//!     .serve("0.0.0.0:5000")
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod notify;
pub mod payments;
pub mod registration;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{
            ApiError, ConfigError, ConflictError, EnrollError, EnrollResult, GatewayError,
            NotFoundError, SignatureError, StorageError, ValidationError,
        },
        field::FieldFormat,
        service::CollectionStore,
        validation::{ValidJson, ValidQuery},
    };

    // === Registration ===
    pub use crate::registration::{
        NewRegistration, RegistrationInput, RegistrationRecord, RegistrationStatus,
        RegistrationStore, RegistrationSummary,
    };

    // === Payments ===
    pub use crate::payments::{
        NewOrder, Order, OrderQuery, OrderSummary, Payment, PaymentGateway, PaymentProvider,
        PaymentStatus, ProviderError, RazorpayConfig, RazorpayProvider, SignatureVerifier,
    };

    // === Notifications ===
    pub use crate::notify::{LogNotifier, Notifier, WebhookNotifier};

    // === Storage ===
    pub use crate::storage::{InMemoryCollection, JsonFileStore, RetryPolicy};

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{RouteDescriptor, RouteRegistry, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use rust_decimal::Decimal;
    pub use std::sync::Arc;
}
