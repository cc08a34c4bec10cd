//! Route descriptor for the payment gateway

use super::gateway::PaymentGateway;
use super::handlers::{PaymentAppState, create_order, get_payment, list_orders, verify_payment};
use crate::server::route_registry::RouteDescriptor;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Descriptor for the payment routes
pub struct PaymentDescriptor {
    pub gateway: Arc<PaymentGateway>,
    pub dev_mode: bool,
}

impl PaymentDescriptor {
    pub fn new(gateway: Arc<PaymentGateway>, dev_mode: bool) -> Self {
        Self { gateway, dev_mode }
    }
}

impl RouteDescriptor for PaymentDescriptor {
    fn name(&self) -> &str {
        "payments"
    }

    fn paths(&self) -> Vec<&'static str> {
        vec!["/create-order", "/verify-payment", "/payment/{id}", "/orders"]
    }

    fn build_routes(&self) -> Router {
        let state = PaymentAppState {
            gateway: self.gateway.clone(),
            dev_mode: self.dev_mode,
        };

        Router::new()
            .route("/create-order", post(create_order))
            .route("/verify-payment", post(verify_payment))
            .route("/payment/{id}", get(get_payment))
            .route("/orders", get(list_orders))
            .with_state(state)
    }
}
