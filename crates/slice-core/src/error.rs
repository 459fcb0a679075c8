//! # Error Types
//!
//! Domain-specific error types for slice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  slice-core errors (this file)                                         │
//! │  ├── CoreError        - Domain and boundary-input errors               │
//! │  └── ValidationError  - Field-level validation failures                │
//! │                                                                         │
//! │  Host errors (in the order-editing UI)                                 │
//! │  └── Whatever the host maps these to for display                       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → host → user-facing message        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, rule id, index)
//! 3. Errors are enum variants, never String
//! 4. Every error is recoverable: reject the offending edit, keep prior state
//!
//! The engine never fails for internally-consistent catalog/registry data;
//! every variant below is a local-input validation failure caught at the
//! boundary between the caller and the engine.

use thiserror::Error;

use crate::catalog::ProductId;
use crate::rules::RuleId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent invariant violations at the caller/engine boundary or
/// configuration errors caught at registry load time. The host should treat
/// all of them as recoverable: reject the edit, leave prior state intact,
/// never crash the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A product id that does not exist in the catalog.
    ///
    /// ## When This Occurs
    /// - An order line references a product the catalog never defined
    /// - A data-integrity failure: the engine refuses to price the line as
    ///   zero and surfaces the mismatch instead
    #[error("Product not found in catalog: {0}")]
    UnknownProduct(ProductId),

    /// A rule id that does not exist in the rule registry.
    #[error("Price rule not found: {0}")]
    UnknownRule(RuleId),

    /// The caller tried to give one product two order lines.
    ///
    /// An order holds at most one line per product. The reference UI hides
    /// already-ordered products from its selector; the engine enforces the
    /// same invariant at the edit entry points.
    #[error("Product {0} already has an order line")]
    DuplicateProductLine(ProductId),

    /// The selected rule is not eligible for the current order.
    ///
    /// A rule is eligible only while every product it references has an
    /// order line.
    #[error("Price rule {0} is not eligible for the current order")]
    RuleNotEligible(RuleId),

    /// A rule was configured with two details for the same product.
    ///
    /// Precedence between a give-away and a discount on one product is
    /// undefined, so the registry rejects the configuration at load time
    /// rather than guessing an evaluation order.
    #[error("Rule {rule_id} has conflicting details for product {product_id}")]
    ConflictingRuleDetail {
        rule_id: RuleId,
        product_id: ProductId,
    },

    /// A catalog was configured with two products sharing an id.
    #[error("Catalog defines product {0} more than once")]
    DuplicateProduct(ProductId),

    /// A registry was configured with two rules sharing an id.
    #[error("Registry defines rule {0} more than once")]
    DuplicateRule(RuleId),

    /// A line edit referenced a position outside the order.
    #[error("Line index {index} out of bounds (order has {len} lines)")]
    LineIndexOutOfBounds { index: usize, len: usize },

    /// Every catalog product already has an order line; nothing to add.
    #[error("All catalog products are already ordered")]
    CatalogExhausted,

    /// The order cannot hold more lines.
    #[error("Order cannot have more than {max} lines")]
    OrderTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation errors.
///
/// These occur when a single input field doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Value must be at least one.
    #[error("{field} must be at least 1")]
    MustBeAtLeastOne { field: &'static str },

    /// Value must be non-negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: &'static str },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
