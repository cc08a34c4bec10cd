//! Payment provider collaborator

use super::model::{NewOrder, Order, OrderQuery, OrderSummary, Payment};
use async_trait::async_trait;

/// Error from payment provider calls
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request timed out")]
    Timeout,
    #[error("provider returned {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error("network error: {0}")]
    Transport(String),
    #[error("parse error: {0}")]
    Decode(String),
}

/// External payment provider
///
/// The provider is the source of truth for orders and payments; nothing
/// returned here is stored locally.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ProviderError>;

    async fn fetch_payment(&self, payment_id: &str) -> Result<Payment, ProviderError>;

    async fn list_orders(&self, query: &OrderQuery) -> Result<Vec<OrderSummary>, ProviderError>;
}
