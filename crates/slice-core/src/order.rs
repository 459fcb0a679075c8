//! # Order Session Module
//!
//! The order being edited: an ordered sequence of lines plus an optional
//! selected price rule.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Session Operations                             │
//! │                                                                         │
//! │  Frontend Action         Entry Point              Session Change        │
//! │  ───────────────         ───────────              ──────────────        │
//! │                                                                         │
//! │  Click Add Product ────► add_line() ────────────► lines.push(first     │
//! │                                                    unordered, qty 0)    │
//! │                                                                         │
//! │  Change Product ───────► set_product(i, id) ────► lines[i].product_id  │
//! │                                                                         │
//! │  Change Quantity ──────► set_quantity(i, n) ────► lines[i].quantity    │
//! │                                                                         │
//! │  Click Delete ─────────► remove_line(i) ────────► lines.remove(i);     │
//! │                                                    clears rule if empty │
//! │                                                                         │
//! │  Pick Price Rule ──────► select_rule(id) ───────► selected_rule = id   │
//! │                                                                         │
//! │  Every mutation returns Result; a rejected edit leaves prior state      │
//! │  fully intact.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Selection state machine
//! `NoSelection → RuleChosen(id) → NoSelection` (on order-empty or explicit
//! clear). `select_rule` only admits rules currently eligible for the order.
//! A selection that later *becomes* ineligible through line edits is not
//! auto-cleared; the pricing engine tolerates it by falling back to baseline
//! for lines the rule no longer covers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{Catalog, ProductId};
use crate::error::{CoreError, CoreResult};
use crate::pricing::{eligible_rules, products_not_yet_ordered};
use crate::rules::{PriceRule, RuleId, RuleRegistry};
use crate::validation::validate_quantity;
use crate::MAX_ORDER_LINES;

// =============================================================================
// Order Line
// =============================================================================

/// One product/quantity pair in the order.
///
/// Quantity may be zero: new lines start at zero and the customer fills the
/// quantity in afterwards. A zero-quantity line still "occupies" its product
/// for rule-eligibility purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// The ordered product.
    pub product_id: ProductId,

    /// How many units are ordered (>= 0).
    pub quantity: u32,
}

impl OrderLine {
    /// Creates a line with a validated quantity.
    pub fn new(product_id: ProductId, quantity: u32) -> CoreResult<Self> {
        validate_quantity(quantity)?;
        Ok(OrderLine {
            product_id,
            quantity,
        })
    }
}

// =============================================================================
// Order Session
// =============================================================================

/// The order-editing session.
///
/// ## Invariants
/// - At most one line per product (enforced here, not left to the UI)
/// - Maximum lines: `MAX_ORDER_LINES`
/// - Line quantities within 0..=`MAX_LINE_QUANTITY`
/// - `selected_rule` clears itself when the last line is removed
///
/// The session owns the lines exclusively; pricing takes a read-only
/// snapshot via [`lines`](OrderSession::lines) and never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSession {
    /// Lines in the order, in insertion order.
    lines: Vec<OrderLine>,

    /// The promotion the customer picked, if any.
    selected_rule: Option<RuleId>,

    /// When the session started.
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl OrderSession {
    /// Creates a new empty session.
    pub fn new() -> Self {
        OrderSession {
            lines: Vec::new(),
            selected_rule: None,
            created_at: Utc::now(),
        }
    }

    /// The current lines, in insertion order.
    #[inline]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// The currently selected rule, if any.
    #[inline]
    pub fn selected_rule(&self) -> Option<RuleId> {
        self.selected_rule
    }

    /// Resolves the selected rule against the registry.
    ///
    /// Returns `None` both when nothing is selected and when the selected id
    /// no longer resolves; pricing treats either as "no active rule".
    pub fn active_rule<'r>(&self, registry: &'r RuleRegistry) -> Option<&'r PriceRule> {
        self.selected_rule.and_then(|id| registry.get(id))
    }

    /// When the session started.
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Checks if the order has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Appends a line for the first not-yet-ordered product, quantity 0.
    ///
    /// Mirrors the UI's "Add Product" button: the new line defaults to the
    /// lowest-id product without a line, and the customer edits it from
    /// there.
    ///
    /// ## Returns
    /// The index of the new line.
    ///
    /// ## Errors
    /// - `OrderTooLarge` at `MAX_ORDER_LINES`
    /// - `CatalogExhausted` when every product already has a line
    pub fn add_line(&mut self, catalog: &Catalog) -> CoreResult<usize> {
        if self.lines.len() >= MAX_ORDER_LINES {
            return Err(CoreError::OrderTooLarge {
                max: MAX_ORDER_LINES,
            });
        }

        let product_id = products_not_yet_ordered(catalog, &self.lines)
            .into_iter()
            .next()
            .ok_or(CoreError::CatalogExhausted)?;

        self.lines.push(OrderLine {
            product_id,
            quantity: 0,
        });
        Ok(self.lines.len() - 1)
    }

    /// Changes which product a line refers to.
    ///
    /// ## Errors
    /// - `LineIndexOutOfBounds` for a bad position
    /// - `UnknownProduct` if the catalog doesn't define the product
    /// - `DuplicateProductLine` if another line already holds the product
    pub fn set_product(
        &mut self,
        index: usize,
        product_id: ProductId,
        catalog: &Catalog,
    ) -> CoreResult<()> {
        self.check_index(index)?;

        if !catalog.contains(product_id) {
            return Err(CoreError::UnknownProduct(product_id));
        }

        // One line per product; re-selecting the line's own product is a no-op
        let taken = self
            .lines
            .iter()
            .enumerate()
            .any(|(i, line)| i != index && line.product_id == product_id);
        if taken {
            return Err(CoreError::DuplicateProductLine(product_id));
        }

        self.lines[index].product_id = product_id;
        Ok(())
    }

    /// Changes a line's quantity.
    ///
    /// ## Errors
    /// - `LineIndexOutOfBounds` for a bad position
    /// - `Validation` when the quantity exceeds `MAX_LINE_QUANTITY`
    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> CoreResult<()> {
        self.check_index(index)?;
        validate_quantity(quantity)?;

        self.lines[index].quantity = quantity;
        Ok(())
    }

    /// Removes a line by position.
    ///
    /// Removing the last line clears the rule selection: no rule can apply
    /// to an empty order.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<OrderLine> {
        self.check_index(index)?;

        let removed = self.lines.remove(index);
        if self.lines.is_empty() {
            self.selected_rule = None;
        }
        Ok(removed)
    }

    /// Selects a price rule for the order.
    ///
    /// ## Errors
    /// - `UnknownRule` if the registry doesn't define the id
    /// - `RuleNotEligible` if some product the rule references has no line
    ///   (which includes any selection against an empty order)
    pub fn select_rule(&mut self, rule_id: RuleId, registry: &RuleRegistry) -> CoreResult<()> {
        registry.lookup(rule_id)?;

        if !eligible_rules(registry, &self.lines).contains(&rule_id) {
            return Err(CoreError::RuleNotEligible(rule_id));
        }

        self.selected_rule = Some(rule_id);
        Ok(())
    }

    /// Clears the rule selection.
    pub fn clear_rule(&mut self) {
        self.selected_rule = None;
    }

    fn check_index(&self, index: usize) -> CoreResult<()> {
        if index >= self.lines.len() {
            return Err(CoreError::LineIndexOutOfBounds {
                index,
                len: self.lines.len(),
            });
        }
        Ok(())
    }
}

impl Default for OrderSession {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{sample_catalog, sample_rules};

    #[test]
    fn test_add_line_defaults_to_first_unordered_product() {
        let catalog = sample_catalog();
        let mut session = OrderSession::new();

        let idx = session.add_line(&catalog).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(
            session.lines()[0],
            OrderLine {
                product_id: ProductId(1),
                quantity: 0
            }
        );

        // Second add skips the already-ordered product
        session.add_line(&catalog).unwrap();
        assert_eq!(session.lines()[1].product_id, ProductId(2));
    }

    #[test]
    fn test_add_line_exhausts_catalog() {
        let catalog = sample_catalog();
        let mut session = OrderSession::new();

        for _ in 0..catalog.len() {
            session.add_line(&catalog).unwrap();
        }
        assert_eq!(session.add_line(&catalog), Err(CoreError::CatalogExhausted));
    }

    #[test]
    fn test_set_product_rejects_duplicate() {
        let catalog = sample_catalog();
        let mut session = OrderSession::new();
        session.add_line(&catalog).unwrap(); // product 1
        session.add_line(&catalog).unwrap(); // product 2

        assert_eq!(
            session.set_product(1, ProductId(1), &catalog),
            Err(CoreError::DuplicateProductLine(ProductId(1)))
        );

        // Re-selecting the line's own product is fine
        assert!(session.set_product(1, ProductId(2), &catalog).is_ok());
        // Moving to a free product is fine
        assert!(session.set_product(1, ProductId(3), &catalog).is_ok());
    }

    #[test]
    fn test_set_product_rejects_unknown_product() {
        let catalog = sample_catalog();
        let mut session = OrderSession::new();
        session.add_line(&catalog).unwrap();

        assert_eq!(
            session.set_product(0, ProductId(42), &catalog),
            Err(CoreError::UnknownProduct(ProductId(42)))
        );
        // Prior state intact
        assert_eq!(session.lines()[0].product_id, ProductId(1));
    }

    #[test]
    fn test_set_quantity_bounds() {
        let catalog = sample_catalog();
        let mut session = OrderSession::new();
        session.add_line(&catalog).unwrap();

        session.set_quantity(0, 2).unwrap();
        assert_eq!(session.lines()[0].quantity, 2);

        assert!(session.set_quantity(0, crate::MAX_LINE_QUANTITY + 1).is_err());
        assert_eq!(
            session.set_quantity(5, 1),
            Err(CoreError::LineIndexOutOfBounds { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_select_rule_requires_eligibility() {
        let catalog = sample_catalog();
        let registry = sample_rules();
        let mut session = OrderSession::new();

        // Empty order: nothing is eligible
        assert_eq!(
            session.select_rule(RuleId(1), &registry),
            Err(CoreError::RuleNotEligible(RuleId(1)))
        );

        session.add_line(&catalog).unwrap(); // product 1
        session.select_rule(RuleId(1), &registry).unwrap();
        assert_eq!(session.selected_rule(), Some(RuleId(1)));

        // Rule 3 needs product 3, which has no line
        assert_eq!(
            session.select_rule(RuleId(3), &registry),
            Err(CoreError::RuleNotEligible(RuleId(3)))
        );

        // Unknown ids are their own failure
        assert_eq!(
            session.select_rule(RuleId(99), &registry),
            Err(CoreError::UnknownRule(RuleId(99)))
        );
    }

    #[test]
    fn test_removing_last_line_clears_selection() {
        let catalog = sample_catalog();
        let registry = sample_rules();
        let mut session = OrderSession::new();

        session.add_line(&catalog).unwrap();
        session.select_rule(RuleId(1), &registry).unwrap();

        let removed = session.remove_line(0).unwrap();
        assert_eq!(removed.product_id, ProductId(1));
        assert!(session.is_empty());
        assert_eq!(session.selected_rule(), None);
    }

    #[test]
    fn test_removing_non_last_line_keeps_selection() {
        let catalog = sample_catalog();
        let registry = sample_rules();
        let mut session = OrderSession::new();

        session.add_line(&catalog).unwrap(); // product 1
        session.add_line(&catalog).unwrap(); // product 2
        session.select_rule(RuleId(1), &registry).unwrap();

        session.remove_line(1).unwrap();
        // Selection survives; rule 1 still eligible (product 1 remains)
        assert_eq!(session.selected_rule(), Some(RuleId(1)));
    }

    #[test]
    fn test_selection_not_auto_cleared_when_it_becomes_ineligible() {
        let catalog = sample_catalog();
        let registry = sample_rules();
        let mut session = OrderSession::new();

        session.add_line(&catalog).unwrap(); // product 1
        session.add_line(&catalog).unwrap(); // product 2
        session.select_rule(RuleId(1), &registry).unwrap();

        // Swap product 1 away; rule 1 now references a product with no line
        session.set_product(0, ProductId(3), &catalog).unwrap();
        assert_eq!(session.selected_rule(), Some(RuleId(1)));
        assert!(!eligible_rules(&registry, session.lines()).contains(&RuleId(1)));
    }

    #[test]
    fn test_order_line_validates_quantity() {
        assert!(OrderLine::new(ProductId(1), 0).is_ok());
        assert!(OrderLine::new(ProductId(1), crate::MAX_LINE_QUANTITY).is_ok());
        assert!(OrderLine::new(ProductId(1), crate::MAX_LINE_QUANTITY + 1).is_err());
    }
}
