//! Axum extractors for typed request input
//!
//! `ValidJson<T>` deserializes the request body and `ValidQuery<T>` the query
//! string into an explicit input type. Malformed input is reported in the
//! standard error envelope instead of axum's plain-text rejection.

use crate::core::error::{EnrollError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// Axum extractor that deserializes a typed JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn register(
///     State(state): State<RegistrationAppState>,
///     ValidJson(input): ValidJson<RegistrationInput>,
/// ) -> Result<impl IntoResponse, ApiError> {
///     // input is a RegistrationInput; semantic validation happens in the store
/// }
/// ```
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = EnrollError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(payload)) => Ok(ValidJson(payload)),
            Err(rejection) => Err(ValidationError::InvalidJson {
                message: rejection.body_text(),
            }
            .into()),
        }
    }
}

/// Axum extractor that deserializes typed query parameters
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = EnrollError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(params)) => Ok(ValidQuery(params)),
            Err(rejection) => Err(ValidationError::InvalidQuery {
                message: rejection.body_text(),
            }
            .into()),
        }
    }
}
