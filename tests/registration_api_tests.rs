//! HTTP tests for the registration routes
//!
//! Drive the full router (extractors, handlers, store, error envelope) over
//! in-memory storage.

mod harness;

use axum::http::StatusCode;
use axum_test::TestServer;
use enroll::prelude::*;
use harness::*;
use serde_json::{Value, json};

fn jane() -> Value {
    json!({
        "name": "Jane",
        "email": "jane@x.com",
        "phone": "9876543210",
        "course": "Rust"
    })
}

// =============================================================================
// Registration
// =============================================================================

mod register_tests {
    use super::*;

    #[tokio::test]
    async fn test_register_creates_pending_record() {
        let app = test_app();

        let response = app.server.post("/register").json(&jane()).await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["status"], "pending");
        assert_eq!(body["user"]["email"], "jane@x.com");
        assert!(!body["user"]["id"].as_str().unwrap().is_empty());
        assert!(body["user"].get("phone").is_none());
        assert_eq!(app.users.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let app = test_app();
        app.server
            .post("/register")
            .json(&jane())
            .await
            .assert_status(StatusCode::CREATED);

        let mut again = jane();
        again["email"] = json!("JANE@X.com");
        again["name"] = json!("Someone Else");
        let response = app.server.post("/register").json(&again).await;

        response.assert_status(StatusCode::CONFLICT);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "CONFLICT");
        assert_eq!(body["message"], "email already registered");
        assert_eq!(app.users.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_email_is_stored_lowercased() {
        let app = test_app();
        let mut body = jane();
        body["email"] = json!("  Jane@X.COM ");

        let response = app.server.post("/register").json(&body).await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Value>()["user"]["email"], "jane@x.com");
    }

    #[tokio::test]
    async fn test_each_rule_rejects_with_its_message() {
        let cases = [
            ("name", json!("   "), "missing required fields"),
            ("email", json!("jane@"), "invalid email"),
            ("phone", json!("12345"), "invalid phone"),
            ("course", json!("Other"), "missing course detail"),
        ];

        for (field, value, message) in cases {
            let app = test_app();
            let mut body = jane();
            body[field] = value;

            let response = app.server.post("/register").json(&body).await;

            response.assert_status(StatusCode::BAD_REQUEST);
            let body = response.json::<Value>();
            assert_eq!(body["code"], "VALIDATION_ERROR", "field {}", field);
            assert_eq!(body["message"], message, "field {}", field);
            assert_eq!(app.users.len().unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_missing_required_fields() {
        let app = test_app();

        let response = app
            .server
            .post("/register")
            .json(&json!({ "name": "Jane", "email": "jane@x.com" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            "missing required fields"
        );
    }

    #[tokio::test]
    async fn test_other_course_with_detail_is_accepted() {
        let app = test_app();
        let mut body = jane();
        body["course"] = json!("Other");
        body["customCourse"] = json!("Embedded Rust");

        let response = app.server.post("/register").json(&body).await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(
            response.json::<Value>()["user"]["customCourse"],
            "Embedded Rust"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let app = test_app();

        let response = app
            .server
            .post("/register")
            .text("{\"name\": ")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(app.users.len().unwrap(), 0);
    }
}

// =============================================================================
// Listing and lookup
// =============================================================================

mod read_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_users_omits_phone() {
        let app = test_app();
        app.server.post("/register").json(&jane()).await;
        let mut bob = jane();
        bob["email"] = json!("bob@x.com");
        app.server.post("/register").json(&bob).await;

        let response = app.server.get("/users").await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 2);

        let users = body["users"].as_array().unwrap();
        assert_eq!(users[0]["email"], "jane@x.com");
        assert_eq!(users[1]["email"], "bob@x.com");
        for user in users {
            assert!(user.get("phone").is_none());
            assert!(user.get("experience").is_none());
        }
    }

    #[tokio::test]
    async fn test_list_users_empty() {
        let app = test_app();

        let body = app.server.get("/users").await.json::<Value>();

        assert_eq!(body["count"], 0);
        assert_eq!(body["users"], json!([]));
    }

    #[tokio::test]
    async fn test_get_user_returns_full_record() {
        let app = test_app();
        let created = app.server.post("/register").json(&jane()).await.json::<Value>();
        let id = created["user"]["id"].as_str().unwrap();

        let response = app.server.get(&format!("/users/{}", id)).await;

        response.assert_status_ok();
        let user = &response.json::<Value>()["user"];
        assert_eq!(user["id"], id);
        assert_eq!(user["phone"], "9876543210");
        assert!(user.get("registrationDate").is_some());
        assert!(user.get("lastUpdated").is_some());
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_not_found() {
        let app = test_app();

        let response = app.server.get("/users/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body = response.json::<Value>();
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["details"]["id"], "does-not-exist");
    }
}

// =============================================================================
// Status updates
// =============================================================================

mod status_tests {
    use super::*;

    async fn register_jane(app: &TestApp) -> String {
        let created = app.server.post("/register").json(&jane()).await.json::<Value>();
        created["user"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_update_status_then_get() {
        let app = test_app();
        let id = register_jane(&app).await;

        let response = app
            .server
            .put(&format!("/users/{}/status", id))
            .json(&json!({ "status": "approved" }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["user"]["status"], "approved");

        let fetched = app.server.get(&format!("/users/{}", id)).await.json::<Value>();
        assert_eq!(fetched["user"]["status"], "approved");
    }

    #[tokio::test]
    async fn test_update_status_advances_last_updated() {
        let app = test_app();
        let id = register_jane(&app).await;
        let before = app.server.get(&format!("/users/{}", id)).await.json::<Value>();

        let after = app
            .server
            .put(&format!("/users/{}/status", id))
            .json(&json!({ "status": "rejected" }))
            .await
            .json::<Value>();

        let parse = |v: &Value| {
            chrono::DateTime::parse_from_rfc3339(v.as_str().unwrap()).unwrap()
        };
        assert!(parse(&after["user"]["lastUpdated"]) > parse(&before["user"]["lastUpdated"]));
    }

    #[tokio::test]
    async fn test_invalid_status_is_rejected() {
        let app = test_app();
        let id = register_jane(&app).await;

        for status in [json!("archived"), json!("APPROVED"), json!("")] {
            let response = app
                .server
                .put(&format!("/users/{}/status", id))
                .json(&json!({ "status": status }))
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            assert_eq!(response.json::<Value>()["message"], "invalid status");
        }

        let fetched = app.server.get(&format!("/users/{}", id)).await.json::<Value>();
        assert_eq!(fetched["user"]["status"], "pending");
    }

    #[tokio::test]
    async fn test_missing_status_is_invalid_status() {
        let app = test_app();
        let id = register_jane(&app).await;

        let response = app
            .server
            .put(&format!("/users/{}/status", id))
            .json(&json!({}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "invalid status");
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let app = test_app();

        let response = app
            .server
            .put("/users/missing/status")
            .json(&json!({ "status": "approved" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}

// =============================================================================
// Storage failures
// =============================================================================

mod storage_failure_tests {
    use super::*;

    /// Storage whose every operation fails
    struct BrokenStorage;

    #[async_trait]
    impl CollectionStore<RegistrationRecord> for BrokenStorage {
        async fn load(&self) -> Result<Vec<RegistrationRecord>, StorageError> {
            Err(StorageError::Io {
                operation: "read",
                path: "/srv/enroll/users.json".to_string(),
                message: "permission denied".to_string(),
            })
        }

        async fn save(&self, _records: &[RegistrationRecord]) -> Result<(), StorageError> {
            Err(StorageError::Io {
                operation: "write",
                path: "/srv/enroll/users.json".to_string(),
                message: "permission denied".to_string(),
            })
        }
    }

    fn broken_server(dev_mode: bool) -> TestServer {
        let app = ServerBuilder::new()
            .with_registration_store(RegistrationStore::new(Arc::new(BrokenStorage)))
            .with_dev_mode(dev_mode)
            .build()
            .unwrap();
        TestServer::try_new(app).unwrap()
    }

    #[tokio::test]
    async fn test_storage_error_hides_cause() {
        let server = broken_server(false);

        let response = server.post("/register").json(&jane()).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.json::<Value>();
        assert_eq!(body["code"], "STORAGE_ERROR");
        assert_eq!(body["message"], "internal storage error");
        assert!(body.get("details").is_none());
        assert!(!body.to_string().contains("/srv/enroll"));
    }

    #[tokio::test]
    async fn test_storage_error_cause_in_dev_mode() {
        let server = broken_server(true);

        let response = server.get("/users").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.json::<Value>();
        assert_eq!(body["message"], "internal storage error");
        assert!(
            body["details"]["cause"]
                .as_str()
                .unwrap()
                .contains("permission denied")
        );
    }
}
