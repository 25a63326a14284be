//! # Validation Module
//!
//! Input validation for forms that create or change records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Desk command (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  └── Referenced ids must exist (NotFound)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure blocks the operation before any state changes.

use crate::error::ValidationError;
use crate::invoice::InvoiceItem;
use crate::money::Money;
use crate::{MAX_ITEM_PRICE, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects empty or whitespace-only values.
///
/// ## Example
/// ```rust
/// use servicepro_core::validation::validate_required;
///
/// assert!(validate_required("device name", "Dell XPS 15").is_ok());
/// assert!(validate_required("device name", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a display name (customer, supplier, employee, product).
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    validate_required(field, name)?;

    if name.trim().chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free service).
///
/// Prices above MAX_ITEM_PRICE are rejected so `price × quantity` cannot overflow.
///
/// ```rust
/// use servicepro_core::money::Money;
/// use servicepro_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_dong(150_000)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_dong(-1)).is_err());
/// assert!(validate_price(Money::from_dong(i64::MAX)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    if price.dong() > MAX_ITEM_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_ITEM_PRICE,
        });
    }

    Ok(())
}

/// Validates an amount handed over by a customer or paid to a supplier.
///
/// Zero is allowed: a ticket can be delivered on credit.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "payment amount".to_string(),
        });
    }
    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the lines of a sale.
///
/// ## Rules
/// - At least one line
/// - Each quantity valid, each price non-negative
pub fn validate_line_items(items: &[InvoiceItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }
    validate_quote_lines(items)
}

/// Validates the lines of a repair quote. An empty quote is fine.
pub fn validate_quote_lines(items: &[InvoiceItem]) -> ValidationResult<()> {
    for item in items {
        validate_quantity(item.quantity)?;
        validate_price(item.price)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductKind;

    fn line(quantity: i64, price: i64) -> InvoiceItem {
        InvoiceItem {
            product_id: "s3".to_string(),
            product_name: "Thay keo tản nhiệt".to_string(),
            quantity,
            price: Money::from_dong(price),
            kind: ProductKind::Goods,
        }
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("customer", "c1").is_ok());
        assert!(validate_required("customer", "").is_err());
        assert!(validate_required("customer", " \t").is_err());
    }

    #[test]
    fn test_validate_name_counts_characters_not_bytes() {
        // 200 Vietnamese characters are more than 200 bytes
        assert!(validate_name("name", &"ệ".repeat(200)).is_ok());
        assert!(validate_name("name", &"ệ".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price_ceiling() {
        assert!(validate_price(Money::from_dong(MAX_ITEM_PRICE)).is_ok());
        assert!(validate_price(Money::from_dong(MAX_ITEM_PRICE + 1)).is_err());

        // the largest line that passes still multiplies without overflow
        let top = line(MAX_ITEM_QUANTITY, MAX_ITEM_PRICE);
        assert!(validate_line_items(&[top.clone()]).is_ok());
        assert_eq!(top.line_total().dong(), MAX_ITEM_QUANTITY * MAX_ITEM_PRICE);

        let err = validate_quote_lines(&[line(2, i64::MAX / 2 + 1)]).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::zero()).is_ok());
        assert!(validate_payment_amount(Money::from_dong(100_000)).is_ok());
        assert!(validate_payment_amount(Money::from_dong(-100)).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(800).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_line_items() {
        assert!(validate_line_items(&[line(1, 50_000)]).is_ok());
        assert!(validate_line_items(&[]).is_err());
        assert!(validate_line_items(&[line(0, 50_000)]).is_err());
        assert!(validate_line_items(&[line(1, -5)]).is_err());
        assert!(validate_quote_lines(&[]).is_ok());
    }
}
