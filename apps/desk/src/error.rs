//! # API Error Type
//!
//! Unified error type for desk commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ServicePro                             │
//! │                                                                         │
//! │  Frontend                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  invoke('confirm_delivery')                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Missing record? ─── StoreError::NotFound ─────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Role / rule?  ─── CoreError::Forbidden ───────── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  try {                                                                  │
//! │    await invoke('confirm_delivery', ...)                                │
//! │  } catch (e) {                                                          │
//! │    // e.code = "FORBIDDEN"                                              │
//! │    // e.message = "Technician is not permitted to ConfirmDelivery"      │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No code is retried by the desk. The front end shows the message and
//! leaves the form as the actor left it.

use serde::Serialize;
use servicepro_core::{CoreError, ValidationError};
use servicepro_store::StoreError;

use crate::document::DocumentError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Invoice not found: REP-1"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Nobody is logged in
    NotAuthenticated,

    /// Wrong username or password
    InvalidCredentials,

    /// Role does not grant the action
    Forbidden,

    /// Ticket cannot move that way from its current status
    InvalidTransition,

    /// Payment processing error
    PaymentError,

    /// Document service failed or returned nothing usable
    DocumentError,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            CoreError::Forbidden { .. } => ApiError::new(ErrorCode::Forbidden, err.to_string()),
            CoreError::InvalidTransition { .. } => {
                ApiError::new(ErrorCode::InvalidTransition, err.to_string())
            }
            CoreError::NotARepairTicket(id) => ApiError::validation(format!(
                "Invoice {} is not a repair ticket",
                id
            )),
            CoreError::InvalidPaymentAmount { reason } => ApiError::new(
                ErrorCode::PaymentError,
                format!("Invalid payment amount: {}", reason),
            ),
            CoreError::NotAuthenticated => {
                ApiError::new(ErrorCode::NotAuthenticated, "Please log in first")
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::InvalidCredentials => {
                ApiError::new(ErrorCode::InvalidCredentials, "Wrong username or password")
            }
            StoreError::Seed(e) => {
                tracing::error!("Seed data rejected: {}", e);
                ApiError::internal("Seed data could not be read")
            }
            StoreError::Core(e) => ApiError::from(e),
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        ApiError::new(ErrorCode::DocumentError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
