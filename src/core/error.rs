//! Typed error handling for enroll-rs
//!
//! Every operation of the registration store and the payment gateway returns
//! an [`EnrollError`]. Callers match on the category to decide whether the
//! failure is the client's to correct (validation, conflict, not found,
//! signature) or a server-side failure (storage, gateway).
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed or missing input
//! - [`ConflictError`]: duplicate registration
//! - [`NotFoundError`]: unknown registration or payment id
//! - [`StorageError`]: durable write/read failure after retries
//! - [`SignatureError`]: payment confirmation failed HMAC verification
//! - [`GatewayError`]: payment provider failure or non-actionable state
//! - [`ConfigError`]: startup configuration problems
//!
//! # Example
//!
//! ```rust,ignore
//! match store.register(input).await {
//!     Ok(record) => println!("registered {}", record.id),
//!     Err(EnrollError::Conflict(_)) => println!("already registered"),
//!     Err(e) => eprintln!("registration failed: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for enroll-rs
#[derive(Debug)]
pub enum EnrollError {
    /// Caller supplied malformed or missing input
    Validation(ValidationError),

    /// The submission collides with an existing record
    Conflict(ConflictError),

    /// Unknown registration or payment id
    NotFound(NotFoundError),

    /// Durable storage failure
    Storage(StorageError),

    /// Payment confirmation failed cryptographic verification
    Signature(SignatureError),

    /// External payment provider failure
    Gateway(GatewayError),

    /// Configuration errors
    Config(ConfigError),
}

impl fmt::Display for EnrollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrollError::Validation(e) => write!(f, "{}", e),
            EnrollError::Conflict(e) => write!(f, "{}", e),
            EnrollError::NotFound(e) => write!(f, "{}", e),
            EnrollError::Storage(e) => write!(f, "{}", e),
            EnrollError::Signature(e) => write!(f, "{}", e),
            EnrollError::Gateway(e) => write!(f, "{}", e),
            EnrollError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EnrollError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnrollError::Validation(e) => Some(e),
            EnrollError::Conflict(e) => Some(e),
            EnrollError::NotFound(e) => Some(e),
            EnrollError::Storage(e) => Some(e),
            EnrollError::Signature(e) => Some(e),
            EnrollError::Gateway(e) => Some(e),
            EnrollError::Config(e) => Some(e),
        }
    }
}

/// Error envelope returned to HTTP callers
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl EnrollError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            EnrollError::Validation(_) => StatusCode::BAD_REQUEST,
            EnrollError::Conflict(_) => StatusCode::CONFLICT,
            EnrollError::NotFound(_) => StatusCode::NOT_FOUND,
            EnrollError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EnrollError::Signature(_) => StatusCode::BAD_REQUEST,
            EnrollError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EnrollError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            EnrollError::Validation(_) => "VALIDATION_ERROR",
            EnrollError::Conflict(_) => "CONFLICT",
            EnrollError::NotFound(_) => "NOT_FOUND",
            EnrollError::Storage(_) => "STORAGE_ERROR",
            EnrollError::Signature(_) => "SIGNATURE_ERROR",
            EnrollError::Gateway(_) => "GATEWAY_ERROR",
            EnrollError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// True when the failure is on our side rather than the caller's
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message that is safe to show to any caller
    ///
    /// Server-side failures hide their cause: storage paths, provider
    /// responses and internal state stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            EnrollError::Storage(_) => "internal storage error".to_string(),
            EnrollError::Gateway(GatewayError::Provider { .. }) => {
                "payment provider request failed".to_string()
            }
            EnrollError::Config(_) => "service misconfigured".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to an error response
    ///
    /// With `expose_internal` set (development mode) the full cause of a
    /// server-side failure is included under `details.cause`.
    pub fn to_response(&self, expose_internal: bool) -> ErrorResponse {
        ErrorResponse {
            success: false,
            code: self.error_code().to_string(),
            message: self.public_message(),
            details: self.details(expose_internal),
        }
    }

    fn details(&self, expose_internal: bool) -> Option<serde_json::Value> {
        match self {
            EnrollError::NotFound(NotFoundError::Registration { id }) => {
                Some(serde_json::json!({ "resource": "registration", "id": id }))
            }
            EnrollError::NotFound(NotFoundError::Payment { id }) => {
                Some(serde_json::json!({ "resource": "payment", "id": id }))
            }
            EnrollError::Validation(ValidationError::FieldError { field, .. }) => {
                Some(serde_json::json!({ "field": field }))
            }
            e if expose_internal && e.is_server_error() => {
                Some(serde_json::json!({ "cause": e.to_string() }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for EnrollError {
    fn into_response(self) -> Response {
        ApiError::new(self, false).into_response()
    }
}

/// An [`EnrollError`] bound for an HTTP response
///
/// Carries the development-mode flag so the response renderer knows
/// whether internal causes may be exposed.
#[derive(Debug)]
pub struct ApiError {
    pub error: EnrollError,
    pub expose_internal: bool,
}

impl ApiError {
    pub fn new(error: EnrollError, expose_internal: bool) -> Self {
        Self {
            error,
            expose_internal,
        }
    }
}

impl From<EnrollError> for ApiError {
    fn from(error: EnrollError) -> Self {
        Self::new(error, false)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        match &self.error {
            e if e.is_server_error() => {
                tracing::error!(code = e.error_code(), error = %e, "request failed");
            }
            EnrollError::Signature(e) => {
                tracing::warn!(error = %e, "rejected payment confirmation");
            }
            e => {
                tracing::debug!(code = e.error_code(), error = %e, "request rejected");
            }
        }
        let body = Json(self.error.to_response(self.expose_internal));
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One of name, email, phone or course is empty
    MissingRequiredFields,

    /// Email does not look like `local@domain.tld`
    InvalidEmail,

    /// Phone is not made of digits, `+`, `-`, spaces or parentheses, or is too short
    InvalidPhone,

    /// Course is "Other" but no custom course was given
    MissingCourseDetail,

    /// Status is not one of pending, approved, rejected
    InvalidStatus { value: String },

    /// Single field validation error
    FieldError { field: String, message: String },

    /// Invalid JSON body
    InvalidJson { message: String },

    /// Query string does not decode into the expected parameters
    InvalidQuery { message: String },

    /// Missing required argument
    MissingArgument { argument: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingRequiredFields => write!(f, "missing required fields"),
            ValidationError::InvalidEmail => write!(f, "invalid email"),
            ValidationError::InvalidPhone => write!(f, "invalid phone"),
            ValidationError::MissingCourseDetail => write!(f, "missing course detail"),
            ValidationError::InvalidStatus { .. } => write!(f, "invalid status"),
            ValidationError::FieldError { field, message } => {
                write!(f, "invalid {}: {}", field, message)
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "invalid JSON: {}", message)
            }
            ValidationError::InvalidQuery { message } => {
                write!(f, "invalid query: {}", message)
            }
            ValidationError::MissingArgument { argument } => {
                write!(f, "missing required argument: {}", argument)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for EnrollError {
    fn from(err: ValidationError) -> Self {
        EnrollError::Validation(err)
    }
}

// =============================================================================
// Conflict Errors
// =============================================================================

/// Errors raised when a submission collides with existing state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    /// A record with the same normalized email already exists
    EmailAlreadyRegistered,
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictError::EmailAlreadyRegistered => write!(f, "email already registered"),
        }
    }
}

impl std::error::Error for ConflictError {}

impl From<ConflictError> for EnrollError {
    fn from(err: ConflictError) -> Self {
        EnrollError::Conflict(err)
    }
}

// =============================================================================
// Not Found Errors
// =============================================================================

/// Unknown identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    Registration { id: String },
    Payment { id: String },
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundError::Registration { id } => {
                write!(f, "registration with id '{}' not found", id)
            }
            NotFoundError::Payment { id } => write!(f, "payment with id '{}' not found", id),
        }
    }
}

impl std::error::Error for NotFoundError {}

impl From<NotFoundError> for EnrollError {
    fn from(err: NotFoundError) -> Self {
        EnrollError::NotFound(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the durable registration collection
#[derive(Debug)]
pub enum StorageError {
    /// I/O failure that is not worth retrying
    Io {
        operation: &'static str,
        path: String,
        message: String,
    },

    /// Transient failures persisted through every retry
    RetriesExhausted {
        path: String,
        attempts: usize,
        message: String,
    },

    /// Stored collection cannot be decoded
    Corrupt { path: String, message: String },

    /// Collection cannot be encoded
    Serialization { message: String },

    /// Backend not available (poisoned lock, cancelled worker)
    Unavailable { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io {
                operation,
                path,
                message,
            } => write!(f, "failed to {} '{}': {}", operation, path, message),
            StorageError::RetriesExhausted {
                path,
                attempts,
                message,
            } => write!(
                f,
                "write to '{}' still failing after {} attempts: {}",
                path, attempts, message
            ),
            StorageError::Corrupt { path, message } => {
                write!(f, "stored collection '{}' is corrupt: {}", path, message)
            }
            StorageError::Serialization { message } => {
                write!(f, "failed to serialize collection: {}", message)
            }
            StorageError::Unavailable { message } => {
                write!(f, "storage unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for EnrollError {
    fn from(err: StorageError) -> Self {
        EnrollError::Storage(err)
    }
}

// =============================================================================
// Signature Errors
// =============================================================================

/// Payment confirmation could not be authenticated
///
/// Never retried or softened: a confirmation that fails verification is
/// untrusted regardless of what else the client claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    Mismatch,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::Mismatch => write!(f, "payment verification failed"),
        }
    }
}

impl std::error::Error for SignatureError {}

impl From<SignatureError> for EnrollError {
    fn from(err: SignatureError) -> Self {
        EnrollError::Signature(err)
    }
}

// =============================================================================
// Gateway Errors
// =============================================================================

/// Errors related to the external payment provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Payment exists but has not been captured
    NotCaptured { status: String },

    /// Payment was made against a different order than the one confirmed
    OrderMismatch { expected: String, actual: String },

    /// Provider did not answer in time
    Timeout,

    /// Provider rejected the call or could not be reached
    Provider { message: String },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::NotCaptured { status } => {
                write!(f, "payment not captured: {}", status)
            }
            GatewayError::OrderMismatch { expected, actual } => write!(
                f,
                "payment belongs to order '{}', expected '{}'",
                actual, expected
            ),
            GatewayError::Timeout => write!(f, "timeout"),
            GatewayError::Provider { message } => {
                write!(f, "payment provider error: {}", message)
            }
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<GatewayError> for EnrollError {
    fn from(err: GatewayError) -> Self {
        EnrollError::Gateway(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Missing required field in configuration
    MissingField { field: String, context: String },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::MissingField { field, context } => {
                write!(f, "Missing required field '{}' in {}", field, context)
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for EnrollError {
    fn from(err: ConfigError) -> Self {
        EnrollError::Config(err)
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for enroll-rs operations
pub type EnrollResult<T> = Result<T, EnrollError>;
