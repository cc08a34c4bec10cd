//! Order and payment types exchanged with the provider

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-side payment state
///
/// Only [`PaymentStatus::Captured`] authorizes fulfillment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Created,
    Authorized,
    Captured,
    Refunded,
    Failed,
    Pending,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Created => "created",
            PaymentStatus::Authorized => "authorized",
            PaymentStatus::Captured => "captured",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Unknown => "unknown",
        }
    }

    pub fn is_captured(&self) -> bool {
        matches!(self, PaymentStatus::Captured)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order created at the provider
///
/// `amount` is in minor units; `created_at` is unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub created_at: i64,
}

/// Order as returned by the provider's list call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: String,
    pub created_at: i64,
}

/// Authoritative payment state fetched from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub captured_at: Option<i64>,
    pub created_at: i64,
}

/// Order creation call sent to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    /// Minor units
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

/// Pagination bounds for listing orders, passed through untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
}

/// Body of `POST /create-order`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub receipt: Option<String>,
}

/// Body of `POST /verify-payment`
///
/// Accepts the checkout callback's `razorpay_*` names and the short forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default, alias = "order_id")]
    pub razorpay_order_id: Option<String>,
    #[serde(default, alias = "payment_id")]
    pub razorpay_payment_id: Option<String>,
    #[serde(default, alias = "signature")]
    pub razorpay_signature: Option<String>,
}
