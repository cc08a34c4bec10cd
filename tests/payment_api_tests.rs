//! HTTP tests for the payment routes
//!
//! The provider is replaced by the recording `MockProvider`, so these tests
//! can assert on exactly what reached it.

mod harness;

use axum::http::StatusCode;
use enroll::prelude::*;
use harness::*;
use serde_json::{Value, json};

const ORDER_ID: &str = "order_9A33XWu170gUtm";
const PAYMENT_ID: &str = "pay_29QQoUBi66xm2f";

fn confirmation(signature: &str) -> Value {
    json!({
        "razorpay_order_id": ORDER_ID,
        "razorpay_payment_id": PAYMENT_ID,
        "razorpay_signature": signature,
    })
}

// =============================================================================
// Order creation
// =============================================================================

mod create_order_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_order_sends_minor_units() {
        let app = test_app();

        let response = app
            .server
            .post("/create-order")
            .json(&json!({ "amount": 1500.00, "receipt": "enroll_42" }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["key_id"], KEY_ID);
        assert_eq!(body["order"]["amount"], 150000);
        assert_eq!(body["order"]["currency"], "INR");

        let sent = app.provider.created_orders();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].amount, 150000);
        assert_eq!(sent[0].currency, "INR");
        assert_eq!(sent[0].receipt, "enroll_42");
    }

    #[tokio::test]
    async fn test_create_order_generates_receipt() {
        let app = test_app();

        app.server
            .post("/create-order")
            .json(&json!({ "amount": "499" }))
            .await
            .assert_status_ok();

        let sent = app.provider.created_orders();
        assert!(sent[0].receipt.starts_with("receipt_"));
        assert_eq!(sent[0].amount, 49900);
    }

    #[tokio::test]
    async fn test_create_order_normalizes_currency() {
        let app = test_app();

        app.server
            .post("/create-order")
            .json(&json!({ "amount": 1500, "currency": "jpy" }))
            .await
            .assert_status_ok();

        let sent = app.provider.created_orders();
        assert_eq!(sent[0].currency, "JPY");
        assert_eq!(sent[0].amount, 1500);
    }

    #[tokio::test]
    async fn test_invalid_amounts_never_reach_provider() {
        let app = test_app();

        for body in [
            json!({}),
            json!({ "amount": 0 }),
            json!({ "amount": -10 }),
            json!({ "amount": 0.001 }),
        ] {
            let response = app.server.post("/create-order").json(&body).await;

            response.assert_status(StatusCode::BAD_REQUEST);
            assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");
        }

        assert!(app.provider.created_orders().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_currency_and_receipt_rejected() {
        let app = test_app();

        let response = app
            .server
            .post("/create-order")
            .json(&json!({ "amount": 10, "currency": "RUPEES" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["details"]["field"], "currency");

        let response = app
            .server
            .post("/create-order")
            .json(&json!({ "amount": 10, "receipt": "r".repeat(41) }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["details"]["field"], "receipt");

        assert!(app.provider.created_orders().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_is_gateway_error() {
        let app = test_app();
        app.provider.fail_with(ProviderError::Api {
            status: 400,
            code: "BAD_REQUEST_ERROR".to_string(),
            message: "Authentication failed".to_string(),
        });

        let response = app
            .server
            .post("/create-order")
            .json(&json!({ "amount": 100 }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.json::<Value>();
        assert_eq!(body["code"], "GATEWAY_ERROR");
        assert_eq!(body["message"], "payment provider request failed");
    }

    #[tokio::test]
    async fn test_provider_timeout_is_reported() {
        let app = test_app();
        app.provider.fail_with(ProviderError::Timeout);

        let response = app
            .server
            .post("/create-order")
            .json(&json!({ "amount": 100 }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>()["message"], "timeout");
    }
}

// =============================================================================
// Verification
// =============================================================================

mod verify_payment_tests {
    use super::*;

    #[tokio::test]
    async fn test_captured_payment_is_verified() {
        let app = test_app();
        app.provider
            .insert_payment(payment(PAYMENT_ID, ORDER_ID, PaymentStatus::Captured));

        let response = app
            .server
            .post("/verify-payment")
            .json(&confirmation(&sign(ORDER_ID, PAYMENT_ID)))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["payment"]["id"], PAYMENT_ID);
        assert_eq!(body["payment"]["status"], "captured");
        assert_eq!(app.provider.fetched_payments(), vec![PAYMENT_ID.to_string()]);
    }

    #[tokio::test]
    async fn test_forged_signature_never_reaches_provider() {
        let app = test_app();
        app.provider
            .insert_payment(payment(PAYMENT_ID, ORDER_ID, PaymentStatus::Captured));

        let response = app
            .server
            .post("/verify-payment")
            .json(&confirmation(&"0".repeat(64)))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "SIGNATURE_ERROR");
        assert_eq!(body["message"], "payment verification failed");
        assert!(app.provider.fetched_payments().is_empty());
    }

    #[tokio::test]
    async fn test_signature_for_other_pair_rejected() {
        let app = test_app();

        let response = app
            .server
            .post("/verify-payment")
            .json(&confirmation(&sign(ORDER_ID, "pay_other")))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(app.provider.fetched_payments().is_empty());
    }

    #[tokio::test]
    async fn test_uncaptured_payment_is_refused() {
        for status in [
            PaymentStatus::Failed,
            PaymentStatus::Authorized,
            PaymentStatus::Pending,
        ] {
            let app = test_app();
            app.provider.insert_payment(payment(PAYMENT_ID, ORDER_ID, status));

            let response = app
                .server
                .post("/verify-payment")
                .json(&confirmation(&sign(ORDER_ID, PAYMENT_ID)))
                .await;

            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            let body = response.json::<Value>();
            assert_eq!(body["code"], "GATEWAY_ERROR");
            assert_eq!(
                body["message"],
                format!("payment not captured: {}", status.as_str())
            );
        }
    }

    #[tokio::test]
    async fn test_payment_for_another_order_is_refused() {
        let app = test_app();
        app.provider
            .insert_payment(payment(PAYMENT_ID, "order_other", PaymentStatus::Captured));

        let response = app
            .server
            .post("/verify-payment")
            .json(&confirmation(&sign(ORDER_ID, PAYMENT_ID)))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>()["code"], "GATEWAY_ERROR");
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_before_any_check() {
        let app = test_app();

        for body in [
            json!({ "razorpay_payment_id": PAYMENT_ID, "razorpay_signature": "ab" }),
            json!({ "razorpay_order_id": ORDER_ID, "razorpay_signature": "ab" }),
            json!({ "razorpay_order_id": ORDER_ID, "razorpay_payment_id": PAYMENT_ID }),
            json!({ "razorpay_order_id": " ", "razorpay_payment_id": PAYMENT_ID, "razorpay_signature": "ab" }),
        ] {
            let response = app.server.post("/verify-payment").json(&body).await;

            response.assert_status(StatusCode::BAD_REQUEST);
            assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");
        }

        assert!(app.provider.fetched_payments().is_empty());
    }

    #[tokio::test]
    async fn test_short_field_names_accepted() {
        let app = test_app();
        app.provider
            .insert_payment(payment(PAYMENT_ID, ORDER_ID, PaymentStatus::Captured));

        let response = app
            .server
            .post("/verify-payment")
            .json(&json!({
                "order_id": ORDER_ID,
                "payment_id": PAYMENT_ID,
                "signature": sign(ORDER_ID, PAYMENT_ID),
            }))
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_unknown_payment_after_valid_signature_is_not_found() {
        let app = test_app();

        let response = app
            .server
            .post("/verify-payment")
            .json(&confirmation(&sign(ORDER_ID, PAYMENT_ID)))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(app.provider.fetched_payments().len(), 1);
    }
}

// =============================================================================
// Payment lookup and order listing
// =============================================================================

mod lookup_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_payment() {
        let app = test_app();
        app.provider
            .insert_payment(payment(PAYMENT_ID, ORDER_ID, PaymentStatus::Refunded));

        let response = app.server.get(&format!("/payment/{}", PAYMENT_ID)).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["payment"]["status"], "refunded");
        assert_eq!(body["payment"]["order_id"], ORDER_ID);
    }

    #[tokio::test]
    async fn test_get_unknown_payment_is_not_found() {
        let app = test_app();

        let response = app.server.get("/payment/pay_missing").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body = response.json::<Value>();
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["details"]["resource"], "payment");
        assert_eq!(body["details"]["id"], "pay_missing");
    }

    #[tokio::test]
    async fn test_list_orders_passes_bounds_through() {
        let app = test_app();
        app.provider.insert_order(order_summary("order_a", 100));
        app.provider.insert_order(order_summary("order_b", 200));
        app.provider.insert_order(order_summary("order_c", 300));

        let response = app.server.get("/orders?count=2&from=150").await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["count"], 2);
        assert_eq!(body["orders"][0]["id"], "order_b");
        assert_eq!(body["orders"][1]["id"], "order_c");
    }

    #[tokio::test]
    async fn test_list_orders_empty() {
        let app = test_app();

        let body = app.server.get("/orders").await.json::<Value>();

        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_malformed_order_query_uses_error_envelope() {
        let app = test_app();

        let response = app.server.get("/orders?count=abc").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().starts_with("invalid query"));
    }
}
