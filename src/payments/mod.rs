//! Payment gateway boundary: order creation, checkout verification and
//! read-only lookups against the external provider

pub mod descriptor;
pub mod gateway;
pub mod handlers;
pub mod model;
pub mod provider;
pub mod razorpay;
pub mod signature;

pub use descriptor::PaymentDescriptor;
pub use gateway::{PaymentGateway, minor_unit_exponent, to_minor_units};
pub use model::{NewOrder, Order, OrderQuery, OrderSummary, Payment, PaymentStatus};
pub use provider::{PaymentProvider, ProviderError};
pub use razorpay::{RazorpayConfig, RazorpayProvider};
pub use signature::SignatureVerifier;
