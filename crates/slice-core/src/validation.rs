//! # Validation Module
//!
//! Field-level input validation for Slice POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, numeric)                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine boundary (Rust)                                       │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field rules, called from constructors and            │
//! │      the order-session edit entry points                               │
//! │                                                                         │
//! │  Defense in depth: the engine never trusts caller discipline           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name",
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price-rule name. Same rules as product names.
pub fn validate_rule_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name",
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order-line quantity.
///
/// ## Rules
/// - Zero is allowed: new lines start at quantity 0, and a zero-quantity
///   line is a legitimate (if priced-at-nothing) member of the order
/// - Must not exceed `MAX_LINE_QUANTITY`
pub fn validate_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity",
            min: 0,
            max: MAX_LINE_QUANTITY as i64,
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_unit_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "unit_price",
        });
    }

    Ok(())
}

/// Validates a give-away quantity threshold.
///
/// ## Rules
/// - Must be at least 1: a give-away that triggers at zero would
///   manufacture free product from an empty line
pub fn validate_min_quantity(min_quantity: u32) -> ValidationResult<()> {
    if min_quantity == 0 {
        return Err(ValidationError::MustBeAtLeastOne {
            field: "min_quantity",
        });
    }

    Ok(())
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be between 0 and 100 (whole percent)
pub fn validate_discount_percent(percent: u32) -> ValidationResult<()> {
    if percent > 100 {
        return Err(ValidationError::OutOfRange {
            field: "discount_percent",
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
