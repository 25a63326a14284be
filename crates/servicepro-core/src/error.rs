//! # Error Types
//!
//! Domain-specific error types for servicepro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  servicepro-core errors (this file)                                    │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Required field missing, bad number             │
//! │                                                                         │
//! │  servicepro-store errors (separate crate)                              │
//! │  └── StoreError       - Record lookups, wraps CoreError                │
//! │                                                                         │
//! │  desk errors (in app)                                                  │
//! │  └── ApiError         - What the front end sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → Frontend  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are retried and none is fatal: every failure hands control
//! back to the actor with nothing half-applied.

use thiserror::Error;

use crate::access::Action;
use crate::invoice::RepairStatus;
use crate::repair::TicketEvent;
use crate::types::Role;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A referenced record does not exist.
    ///
    /// ## When This Occurs
    /// - A purchase order line names a product id that is not in the catalog
    /// - A patch targets an invoice id that was never inserted
    /// - An invoice references a customer that was never created
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The actor's role does not grant the action.
    ///
    /// ## User Workflow
    /// ```text
    /// SALES saves ticket with a diagnosis (ticket is RECEIVED)
    ///      │
    ///      ▼
    /// Save would escalate RECEIVED → CHECKING
    ///      │
    ///      ▼
    /// required action: Diagnose  ──► can_act(SALES, Diagnose) = false
    ///      │
    ///      ▼
    /// Forbidden { role: Sales, action: Diagnose }
    /// ```
    #[error("{role:?} is not permitted to {action:?}")]
    Forbidden { role: Role, action: Action },

    /// The event is not legal from the ticket's current status.
    #[error("Ticket {ticket_id} is {from:?}, cannot apply {event:?}")]
    InvalidTransition {
        ticket_id: String,
        from: RepairStatus,
        event: TicketEvent,
    },

    /// Operation requires a repair ticket but got a sale invoice.
    #[error("Invoice {0} is not a repair ticket")]
    NotARepairTicket(String),

    /// Payment amount is invalid.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// No actor is logged in.
    #[error("No active user session")]
    NotAuthenticated,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These block the operation and are user-correctable; the form stays as
/// the actor left it.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// A list that needs at least one entry is empty.
    #[error("{field} must contain at least one item")]
    Empty { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::not_found("Product", "s9");
        assert_eq!(err.to_string(), "Product not found: s9");

        let err = CoreError::Forbidden {
            role: Role::Sales,
            action: Action::Diagnose,
        };
        assert_eq!(err.to_string(), "Sales is not permitted to Diagnose");
    }

    #[test]
    fn test_transition_message() {
        let err = CoreError::InvalidTransition {
            ticket_id: "REP-1".to_string(),
            from: RepairStatus::Received,
            event: TicketEvent::MarkFinished,
        };
        assert_eq!(
            err.to_string(),
            "Ticket REP-1 is Received, cannot apply MarkFinished"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "device name".to_string(),
        };
        assert_eq!(err.to_string(), "device name is required");

        let err = ValidationError::Empty {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items must contain at least one item");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "customer".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
