//! Payment gateway boundary
//!
//! Creates orders at the provider and decides whether a client-submitted
//! checkout confirmation can be trusted. Nothing is stored locally: the
//! provider stays the source of truth for order and payment state.
//!
//! A confirmation is accepted only when, in this order:
//!
//! 1. all three of order id, payment id and signature are present
//! 2. the HMAC signature over `"{order_id}|{payment_id}"` matches
//! 3. the payment fetched from the provider belongs to that order
//! 4. its status is `captured`

use super::model::{NewOrder, Order, OrderQuery, OrderSummary, Payment};
use super::provider::{PaymentProvider, ProviderError};
use super::signature::SignatureVerifier;
use crate::core::error::{EnrollError, EnrollResult, GatewayError, NotFoundError, ValidationError};
use crate::core::field::FieldFormat;
use crate::core::validation::{filters, validators};
use crate::notify::{self, LogNotifier, Notifier};
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_CURRENCY: &str = "INR";

/// Longest receipt the provider accepts
pub const MAX_RECEIPT_LEN: usize = 40;

/// Currencies without a minor unit
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "JPY", "KMF", "KRW", "MGA", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

/// Currencies with three decimal places
const THREE_DECIMAL_CURRENCIES: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

/// Number of decimal places of the minor unit of `currency`
pub fn minor_unit_exponent(currency: &str) -> u32 {
    if ZERO_DECIMAL_CURRENCIES.contains(&currency) {
        0
    } else if THREE_DECIMAL_CURRENCIES.contains(&currency) {
        3
    } else {
        2
    }
}

/// Convert a major-unit amount to the provider's integer minor units
///
/// Rounds half away from zero: 10.005 INR is 1001 paise.
pub fn to_minor_units(amount: Decimal, currency: &str) -> Result<i64, ValidationError> {
    let scale = Decimal::from(10_i64.pow(minor_unit_exponent(currency)));
    let minor = amount
        .checked_mul(scale)
        .map(|m| m.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|m| m.to_i64())
        .ok_or_else(|| ValidationError::FieldError {
            field: "amount".to_string(),
            message: "amount is too large".to_string(),
        })?;

    if minor <= 0 {
        return Err(ValidationError::FieldError {
            field: "amount".to_string(),
            message: "amount is below the smallest currency unit".to_string(),
        });
    }
    Ok(minor)
}

fn provider_failure(err: ProviderError) -> EnrollError {
    match err {
        ProviderError::Timeout => GatewayError::Timeout.into(),
        other => GatewayError::Provider {
            message: other.to_string(),
        }
        .into(),
    }
}

fn lookup_failure(err: ProviderError) -> EnrollError {
    match err {
        ProviderError::NotFound(id) => NotFoundError::Payment { id }.into(),
        other => provider_failure(other),
    }
}

fn required_argument(argument: &str, value: &str) -> Result<(), ValidationError> {
    validators::required()(argument, value).map_err(|_| ValidationError::MissingArgument {
        argument: argument.to_string(),
    })
}

pub struct PaymentGateway {
    provider: Arc<dyn PaymentProvider>,
    verifier: SignatureVerifier,
    key_id: String,
    default_currency: String,
    notifier: Arc<dyn Notifier>,
}

impl PaymentGateway {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        verifier: SignatureVerifier,
        key_id: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            verifier,
            key_id: key_id.into(),
            default_currency: DEFAULT_CURRENCY.to_string(),
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Public key id the checkout widget is opened with
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create an order for `amount` major units of `currency`
    pub async fn create_order(
        &self,
        amount: Decimal,
        currency: Option<&str>,
        receipt: Option<&str>,
    ) -> EnrollResult<Order> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::FieldError {
                field: "amount".to_string(),
                message: "must be greater than zero".to_string(),
            }
            .into());
        }

        let currency = match filters::apply(filters::uppercase(), currency) {
            c if c.is_empty() => self.default_currency.clone(),
            c => c,
        };
        validators::format(FieldFormat::CurrencyCode)("currency", currency.as_str()).map_err(
            |message| ValidationError::FieldError {
                field: "currency".to_string(),
                message,
            },
        )?;

        let receipt = match filters::apply(filters::trim(), receipt) {
            r if r.is_empty() => format!("receipt_{}", Utc::now().timestamp_millis()),
            r => r,
        };
        validators::max_length(MAX_RECEIPT_LEN)("receipt", receipt.as_str()).map_err(
            |message| ValidationError::FieldError {
                field: "receipt".to_string(),
                message,
            },
        )?;

        let request = NewOrder {
            amount: to_minor_units(amount, &currency)?,
            currency,
            receipt,
        };

        let order = self
            .provider
            .create_order(&request)
            .await
            .map_err(|e| {
                warn!(receipt = %request.receipt, error = %e, "order creation failed");
                provider_failure(e)
            })?;

        info!(
            order_id = %order.id,
            amount = order.amount,
            currency = %order.currency,
            "order created"
        );
        Ok(order)
    }

    /// Authenticate a checkout confirmation and require a captured payment
    pub async fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> EnrollResult<Payment> {
        let (order_id, payment_id, signature) =
            (order_id.trim(), payment_id.trim(), signature.trim());
        required_argument("razorpay_order_id", order_id)?;
        required_argument("razorpay_payment_id", payment_id)?;
        required_argument("razorpay_signature", signature)?;

        if let Err(e) = self.verifier.verify(order_id, payment_id, signature) {
            warn!(order_id, payment_id, "payment signature mismatch");
            return Err(e.into());
        }

        let payment = self
            .provider
            .fetch_payment(payment_id)
            .await
            .map_err(lookup_failure)?;

        let paid_order = payment.order_id.as_deref().unwrap_or_default();
        if paid_order != order_id {
            warn!(order_id, payment_id, paid_order, "payment made against another order");
            return Err(GatewayError::OrderMismatch {
                expected: order_id.to_string(),
                actual: paid_order.to_string(),
            }
            .into());
        }

        if !payment.status.is_captured() {
            info!(order_id, payment_id, status = %payment.status, "payment not captured");
            return Err(GatewayError::NotCaptured {
                status: payment.status.to_string(),
            }
            .into());
        }

        info!(order_id, payment_id, amount = payment.amount, "payment verified");

        let verified = payment.clone();
        notify::dispatch(&self.notifier, move |notifier| async move {
            notifier.payment_verified(&verified).await;
        });

        Ok(payment)
    }

    pub async fn get_payment(&self, payment_id: &str) -> EnrollResult<Payment> {
        let payment_id = payment_id.trim();
        required_argument("payment_id", payment_id)?;

        self.provider
            .fetch_payment(payment_id)
            .await
            .map_err(lookup_failure)
    }

    pub async fn list_orders(&self, query: &OrderQuery) -> EnrollResult<Vec<OrderSummary>> {
        self.provider
            .list_orders(query)
            .await
            .map_err(provider_failure)
    }
}
