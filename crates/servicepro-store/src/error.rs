//! # Store Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (rule violation, validation)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← adds lookups, seed loading, login          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in desk app) ← Serialized for frontend                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! When a store operation fails, no collection has been replaced.

use servicepro_core::CoreError;
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found in its collection.
    ///
    /// ## When This Occurs
    /// - Patch or replace on an id that was never inserted
    /// - An invoice names a customer that does not exist
    /// - A purchase order names a supplier or product that does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unknown username or wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Seed data could not be decoded.
    #[error("Invalid seed data: {0}")]
    Seed(#[from] serde_json::Error),

    /// Business rule or validation failure from core.
    #[error(transparent)]
    Core(CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Core's NotFound is surfaced as the store's, so callers match one variant.
impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => StoreError::NotFound { entity, id },
            other => StoreError::Core(other),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_not_found_is_flattened() {
        let err: StoreError = CoreError::not_found("Product", "ghost").into();
        assert!(matches!(err, StoreError::NotFound { ref id, .. } if id == "ghost"));
        assert_eq!(err.to_string(), "Product not found: ghost");
    }

    #[test]
    fn test_other_core_errors_pass_through() {
        let err: StoreError = CoreError::NotAuthenticated.into();
        assert!(matches!(err, StoreError::Core(CoreError::NotAuthenticated)));
        assert_eq!(err.to_string(), "No active user session");
    }
}
