//! Payment HTTP handlers

use super::gateway::PaymentGateway;
use super::model::{CreateOrderRequest, OrderQuery, VerifyPaymentRequest};
use crate::core::error::{ApiError, EnrollError, ValidationError};
use crate::core::validation::{ValidJson, ValidQuery};
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Payment-specific AppState
#[derive(Clone)]
pub struct PaymentAppState {
    pub gateway: Arc<PaymentGateway>,
    pub dev_mode: bool,
}

impl PaymentAppState {
    fn fail(&self, error: impl Into<EnrollError>) -> ApiError {
        ApiError::new(error.into(), self.dev_mode)
    }
}

pub async fn create_order(
    State(state): State<PaymentAppState>,
    ValidJson(body): ValidJson<CreateOrderRequest>,
) -> Result<Json<Value>, ApiError> {
    let amount = body.amount.ok_or_else(|| {
        state.fail(ValidationError::MissingArgument {
            argument: "amount".to_string(),
        })
    })?;

    let order = state
        .gateway
        .create_order(amount, body.currency.as_deref(), body.receipt.as_deref())
        .await
        .map_err(|e| state.fail(e))?;

    Ok(Json(json!({
        "success": true,
        "order": order,
        "key_id": state.gateway.key_id(),
    })))
}

pub async fn verify_payment(
    State(state): State<PaymentAppState>,
    ValidJson(body): ValidJson<VerifyPaymentRequest>,
) -> Result<Json<Value>, ApiError> {
    let payment = state
        .gateway
        .verify_payment(
            body.razorpay_order_id.as_deref().unwrap_or_default(),
            body.razorpay_payment_id.as_deref().unwrap_or_default(),
            body.razorpay_signature.as_deref().unwrap_or_default(),
        )
        .await
        .map_err(|e| state.fail(e))?;

    Ok(Json(json!({
        "success": true,
        "message": "payment verified",
        "payment": payment,
    })))
}

pub async fn get_payment(
    State(state): State<PaymentAppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let payment = state
        .gateway
        .get_payment(&id)
        .await
        .map_err(|e| state.fail(e))?;

    Ok(Json(json!({ "success": true, "payment": payment })))
}

pub async fn list_orders(
    State(state): State<PaymentAppState>,
    ValidQuery(query): ValidQuery<OrderQuery>,
) -> Result<Json<Value>, ApiError> {
    let orders = state
        .gateway
        .list_orders(&query)
        .await
        .map_err(|e| state.fail(e))?;

    Ok(Json(json!({
        "success": true,
        "count": orders.len(),
        "orders": orders,
    })))
}
