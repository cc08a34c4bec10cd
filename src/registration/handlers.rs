//! Registration HTTP handlers

use super::input::RegistrationInput;
use super::model::RegistrationSummary;
use super::store::RegistrationStore;
use crate::core::error::{ApiError, EnrollError};
use crate::core::validation::ValidJson;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Registration-specific AppState
#[derive(Clone)]
pub struct RegistrationAppState {
    pub store: Arc<RegistrationStore>,
    pub dev_mode: bool,
}

impl RegistrationAppState {
    fn fail(&self, error: EnrollError) -> ApiError {
        ApiError::new(error, self.dev_mode)
    }
}

/// Body of `PUT /users/{id}/status`
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Option<String>,
}

pub async fn register(
    State(state): State<RegistrationAppState>,
    ValidJson(input): ValidJson<RegistrationInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let record = state
        .store
        .register(&input)
        .await
        .map_err(|e| state.fail(e))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "registration successful",
            "user": record.summary(),
        })),
    ))
}

/// List registrations without phone numbers
pub async fn list_users(
    State(state): State<RegistrationAppState>,
) -> Result<Json<Value>, ApiError> {
    let users: Vec<RegistrationSummary> = state
        .store
        .list_all()
        .await
        .map_err(|e| state.fail(e))?
        .iter()
        .map(|r| r.summary())
        .collect();

    Ok(Json(json!({
        "success": true,
        "count": users.len(),
        "users": users,
    })))
}

pub async fn get_user(
    State(state): State<RegistrationAppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let record = state.store.get(&id).await.map_err(|e| state.fail(e))?;
    Ok(Json(json!({ "success": true, "user": record })))
}

pub async fn update_status(
    State(state): State<RegistrationAppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<StatusUpdate>,
) -> Result<Json<Value>, ApiError> {
    let status = body.status.unwrap_or_default();
    let record = state
        .store
        .update_status(&id, &status)
        .await
        .map_err(|e| state.fail(e))?;

    Ok(Json(json!({ "success": true, "user": record })))
}
