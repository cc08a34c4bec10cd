//! Shared test harness for the HTTP integration tests
//!
//! Provides a recording `MockProvider` standing in for the payment provider
//! and helpers for assembling a `TestServer` over in-memory storage.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod harness;
//! use harness::*;
//! ```

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use enroll::prelude::*;
use std::collections::HashMap;
use std::sync::Mutex;

pub const KEY_ID: &str = "rzp_test_key";
pub const KEY_SECRET: &str = "test_key_secret";

// ---------------------------------------------------------------------------
// MockProvider
// ---------------------------------------------------------------------------

/// In-process payment provider that records every call
#[derive(Default)]
pub struct MockProvider {
    created: Mutex<Vec<NewOrder>>,
    fetched: Mutex<Vec<String>>,
    payments: Mutex<HashMap<String, Payment>>,
    orders: Mutex<Vec<OrderSummary>>,
    failure: Mutex<Option<ProviderError>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `payment` available to `fetch_payment`
    pub fn insert_payment(&self, payment: Payment) {
        self.payments
            .lock()
            .unwrap()
            .insert(payment.id.clone(), payment);
    }

    pub fn insert_order(&self, order: OrderSummary) {
        self.orders.lock().unwrap().push(order);
    }

    /// Fail every following call with `err`
    pub fn fail_with(&self, err: ProviderError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    /// Orders passed to `create_order`, in call order
    pub fn created_orders(&self) -> Vec<NewOrder> {
        self.created.lock().unwrap().clone()
    }

    /// Payment ids passed to `fetch_payment`, in call order
    pub fn fetched_payments(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), ProviderError> {
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockProvider {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ProviderError> {
        self.created.lock().unwrap().push(order.clone());
        self.check_failure()?;

        let n = self.created.lock().unwrap().len();
        Ok(Order {
            id: format!("order_mock{}", n),
            amount: order.amount,
            currency: order.currency.clone(),
            receipt: Some(order.receipt.clone()),
            created_at: 1714060800,
        })
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<Payment, ProviderError> {
        self.fetched.lock().unwrap().push(payment_id.to_string());
        self.check_failure()?;

        self.payments
            .lock()
            .unwrap()
            .get(payment_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(payment_id.to_string()))
    }

    async fn list_orders(&self, query: &OrderQuery) -> Result<Vec<OrderSummary>, ProviderError> {
        self.check_failure()?;

        let orders = self.orders.lock().unwrap();
        let count = query.count.unwrap_or(10) as usize;
        Ok(orders
            .iter()
            .filter(|o| query.from.is_none_or(|from| o.created_at >= from))
            .filter(|o| query.to.is_none_or(|to| o.created_at <= to))
            .take(count)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn payment(id: &str, order_id: &str, status: PaymentStatus) -> Payment {
    Payment {
        id: id.to_string(),
        order_id: Some(order_id.to_string()),
        amount: 150000,
        currency: "INR".to_string(),
        status,
        method: Some("upi".to_string()),
        captured_at: None,
        created_at: 1714060800,
    }
}

pub fn order_summary(id: &str, created_at: i64) -> OrderSummary {
    OrderSummary {
        id: id.to_string(),
        amount: 150000,
        amount_paid: 0,
        currency: "INR".to_string(),
        receipt: Some(format!("receipt_{}", created_at)),
        status: "created".to_string(),
        created_at,
    }
}

/// Signature the provider would hand the client for this pair
pub fn sign(order_id: &str, payment_id: &str) -> String {
    SignatureVerifier::new(KEY_SECRET)
        .unwrap()
        .sign(order_id, payment_id)
}

// ---------------------------------------------------------------------------
// TestApp
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub server: TestServer,
    pub users: InMemoryCollection<RegistrationRecord>,
    pub provider: Arc<MockProvider>,
}

pub fn test_app() -> TestApp {
    build_test_app(false)
}

pub fn test_app_dev_mode() -> TestApp {
    build_test_app(true)
}

fn build_test_app(dev_mode: bool) -> TestApp {
    let users = InMemoryCollection::<RegistrationRecord>::new();
    let provider = Arc::new(MockProvider::new());

    let store = RegistrationStore::new(Arc::new(users.clone()));
    let gateway = PaymentGateway::new(
        provider.clone(),
        SignatureVerifier::new(KEY_SECRET).unwrap(),
        KEY_ID,
    );

    let app = ServerBuilder::new()
        .with_registration_store(store)
        .with_payment_gateway(gateway)
        .with_dev_mode(dev_mode)
        .build()
        .expect("Failed to build app");

    let server = TestServer::try_new(app).expect("Failed to create test server");

    TestApp {
        server,
        users,
        provider,
    }
}
