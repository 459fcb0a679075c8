//! # slice-core: Pure Business Logic for Slice POS
//!
//! This crate is the **heart** of Slice POS. It contains the promotional
//! pricing engine as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Slice POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Order-Editing UI (TypeScript)                  │   │
//! │  │    Line editor ──► Rule selector ──► Before/After totals        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON (ts-rs generated types)           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ slice-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │  catalog  │  │   rules   │  │  pricing  │  │   order   │   │   │
//! │  │   │  Product  │  │ PriceRule │  │ priceLine │  │  Session  │   │   │
//! │  │   │  Catalog  │  │ Registry  │  │  totals   │  │   Lines   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - The fixed set of purchasable products
//! - [`rules`] - Price rules (give-aways and discounts) and their registry
//! - [`pricing`] - Eligibility, line pricing, and order totals
//! - [`order`] - The order-editing session and its rule-selection state
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level input validation
//! - [`samples`] - The pizzeria fixture for tests and demos
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: eligibility, line pricing, and totals are
//!    deterministic over a snapshot of the order - same input, same output
//! 2. **No I/O**: database, network, and file system access are FORBIDDEN
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use slice_core::pricing::{eligible_rules, totals};
//! use slice_core::samples::{sample_catalog, sample_rules};
//! use slice_core::{OrderSession, RuleId};
//!
//! let catalog = sample_catalog();
//! let registry = sample_rules();
//!
//! // Build an order: 2 small pizzas, 1 large
//! let mut session = OrderSession::new();
//! session.add_line(&catalog).unwrap();      // Small Pizza, qty 0
//! session.set_quantity(0, 2).unwrap();
//! let idx = session.add_line(&catalog).unwrap();
//! session.set_product(idx, slice_core::ProductId(3), &catalog).unwrap();
//! session.set_quantity(idx, 1).unwrap();
//!
//! // Pick the "free small + 10% off large" promotion
//! assert!(eligible_rules(&registry, session.lines()).contains(&RuleId(2)));
//! session.select_rule(RuleId(2), &registry).unwrap();
//!
//! let before = totals(&catalog, session.lines(), None).unwrap();
//! let after = totals(&catalog, session.lines(), session.active_rule(&registry)).unwrap();
//!
//! assert_eq!((before.quantity, before.amount_cents), (3, 4600)); // $46.00
//! assert_eq!((after.quantity, after.amount_cents), (4, 4380));   // $43.80
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod rules;
pub mod samples;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use slice_core::PriceRule` instead of
// `use slice_core::rules::PriceRule`

pub use catalog::{Catalog, Product, ProductId};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{OrderLine, OrderSession};
pub use pricing::{OrderTotals, PricedLine};
pub use rules::{PriceRule, RuleDetail, RuleId, RuleRegistry};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single order.
///
/// ## Business Reason
/// Prevents runaway orders; also bounded above by catalog size, since each
/// product gets at most one line.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single order line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: u32 = 999;
