//! # Pricing Engine Module
//!
//! The decision logic of Slice POS: rule eligibility, per-line pricing, and
//! order totals.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Pricing Engine                                    │
//! │                                                                         │
//! │   Catalog ──────┐                                                       │
//! │   (read-only)   │                                                       │
//! │                 ▼                                                       │
//! │   OrderLines ─► price_line(line, rule?) ─► PricedLine {qty, amount}    │
//! │   (snapshot)    │                               │                       │
//! │                 │                               ▼                       │
//! │                 │                     totals(lines, rule?)              │
//! │                 │                     ─► OrderTotals {qty, amount}     │
//! │                 ▼                                                       │
//! │   RuleRegistry ─► eligible_rules(lines) ─► [RuleId] (ascending)        │
//! │   (read-only)                                                           │
//! │                                                                         │
//! │   PURE FUNCTIONS • NO I/O • NO SHARED MUTABLE STATE                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host recomputes from scratch on every edit: `totals` is called once
//! with no rule ("before") and once with the selected rule ("after"), both
//! over the same snapshot. Nothing is cached, so there is no staleness to
//! reason about.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::catalog::{Catalog, ProductId};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::order::OrderLine;
use crate::rules::{PriceRule, RuleDetail, RuleId, RuleRegistry};

// =============================================================================
// Priced Outputs
// =============================================================================

/// Effective quantity and amount for one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    /// Effective quantity (baseline plus any give-away units).
    pub quantity: u32,

    /// Effective amount in cents (baseline minus any discount).
    pub amount_cents: i64,
}

impl PricedLine {
    /// Returns the amount as a Money type.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// Effective quantity and amount summed across the whole order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Total effective quantity.
    pub quantity: u32,

    /// Total effective amount in cents.
    pub amount_cents: i64,
}

impl OrderTotals {
    /// Returns the amount as a Money type.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Eligibility Filter
// =============================================================================

/// Returns the rules applicable to the current order, ascending by rule id.
///
/// A rule is eligible iff every product it references has an order line.
/// Quantity is irrelevant here: a zero-quantity line still counts as
/// "present". The empty order admits no rule.
///
/// ## Example
/// ```rust
/// use slice_core::pricing::eligible_rules;
/// use slice_core::samples::sample_rules;
/// use slice_core::{OrderLine, ProductId, RuleId};
///
/// let registry = sample_rules();
/// let lines = [
///     OrderLine { product_id: ProductId(1), quantity: 2 },
///     OrderLine { product_id: ProductId(3), quantity: 1 },
/// ];
///
/// // Every rule in the sample registry touches only products 1 and 3
/// assert_eq!(
///     eligible_rules(&registry, &lines),
///     vec![RuleId(1), RuleId(2), RuleId(3)],
/// );
/// ```
pub fn eligible_rules(registry: &RuleRegistry, lines: &[OrderLine]) -> Vec<RuleId> {
    if lines.is_empty() {
        return Vec::new();
    }

    let ordered: BTreeSet<ProductId> = lines.iter().map(|line| line.product_id).collect();

    registry
        .rules()
        .filter(|rule| rule.product_ids().all(|id| ordered.contains(&id)))
        .map(|rule| rule.id)
        .collect()
}

// =============================================================================
// Line Pricer
// =============================================================================

/// Computes the effective quantity and amount for one order line.
///
/// ## Behavior
/// - No active rule, or the rule has no detail for this product: baseline
///   (`quantity`, `unit_price × quantity`).
/// - Give-away: amount is always baseline; quantity gains
///   `received_quantity` once the line meets `min_quantity`.
/// - Discount: quantity is always baseline; amount loses
///   `discount_percent`%.
/// - A zero-quantity line is never boosted or discounted, even when
///   structurally eligible. A promotion must not manufacture value from a
///   non-order; this guard is deliberate.
///
/// ## Errors
/// `UnknownProduct` when the line references a product missing from the
/// catalog. This is a data-integrity failure: the engine warns and fails
/// the computation rather than pricing the line as zero.
pub fn price_line(
    catalog: &Catalog,
    line: &OrderLine,
    active_rule: Option<&PriceRule>,
) -> CoreResult<PricedLine> {
    let product = catalog.get(line.product_id).ok_or_else(|| {
        warn!(
            product_id = %line.product_id,
            "order line references a product missing from the catalog"
        );
        CoreError::UnknownProduct(line.product_id)
    })?;

    let baseline = PricedLine {
        quantity: line.quantity,
        amount_cents: product
            .unit_price()
            .multiply_quantity(i64::from(line.quantity))
            .cents(),
    };

    let Some(rule) = active_rule else {
        return Ok(baseline);
    };
    let Some(detail) = rule.detail_for(line.product_id) else {
        // The rule doesn't cover this product; also the fallback when a
        // selected rule no longer matches the order
        return Ok(baseline);
    };

    // Zero-quantity immunity
    if line.quantity == 0 {
        return Ok(baseline);
    }

    Ok(match *detail {
        RuleDetail::GiveAway {
            min_quantity,
            received_quantity,
            ..
        } => {
            if line.quantity >= min_quantity {
                PricedLine {
                    quantity: line.quantity + received_quantity,
                    ..baseline
                }
            } else {
                baseline
            }
        }
        RuleDetail::Discount { discount_percent } => PricedLine {
            amount_cents: baseline.amount().apply_percent_discount(discount_percent).cents(),
            ..baseline
        },
    })
}

// =============================================================================
// Order Aggregator
// =============================================================================

/// Sums effective quantity and amount over all lines.
///
/// The host calls this twice per recomputation, once with `None` for the
/// "before" row and once with the selected rule for the "after" row; both
/// calls observe the same snapshot. Empty order totals to `{0, $0.00}`.
///
/// Duplicate product lines, should a caller bypass the session invariant,
/// are priced independently; quantity is never merged or lost.
pub fn totals(
    catalog: &Catalog,
    lines: &[OrderLine],
    active_rule: Option<&PriceRule>,
) -> CoreResult<OrderTotals> {
    let mut result = OrderTotals::default();

    for line in lines {
        let priced = price_line(catalog, line, active_rule)?;
        result.quantity += priced.quantity;
        result.amount_cents += priced.amount_cents;
    }

    Ok(result)
}

// =============================================================================
// Selector Support
// =============================================================================

/// Products without an order line, in the catalog's natural (ascending id)
/// order. The UI uses this to populate its add/edit product selectors.
pub fn products_not_yet_ordered(catalog: &Catalog, lines: &[OrderLine]) -> Vec<ProductId> {
    let ordered: BTreeSet<ProductId> = lines.iter().map(|line| line.product_id).collect();

    catalog
        .product_ids()
        .filter(|id| !ordered.contains(id))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{sample_catalog, sample_rules};

    fn line(product_id: u32, quantity: u32) -> OrderLine {
        OrderLine {
            product_id: ProductId(product_id),
            quantity,
        }
    }

    // -------------------------------------------------------------------------
    // Eligibility
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_order_admits_no_rule() {
        let registry = sample_rules();
        assert!(eligible_rules(&registry, &[]).is_empty());
    }

    #[test]
    fn test_eligibility_is_a_subset_check() {
        let registry = sample_rules();

        // Only product 1 ordered: rules touching product 3 are out
        assert_eq!(eligible_rules(&registry, &[line(1, 2)]), vec![RuleId(1)]);

        // Only product 3 ordered
        assert_eq!(eligible_rules(&registry, &[line(3, 1)]), vec![RuleId(3)]);

        // Products 1 and 3 ordered: all three rules apply, ascending id
        assert_eq!(
            eligible_rules(&registry, &[line(1, 2), line(3, 1)]),
            vec![RuleId(1), RuleId(2), RuleId(3)]
        );

        // Product 2 contributes nothing to any rule but costs nothing either
        assert_eq!(
            eligible_rules(&registry, &[line(2, 5), line(1, 1)]),
            vec![RuleId(1)]
        );
    }

    #[test]
    fn test_zero_quantity_line_counts_as_present() {
        let registry = sample_rules();
        assert_eq!(eligible_rules(&registry, &[line(1, 0)]), vec![RuleId(1)]);
    }

    // -------------------------------------------------------------------------
    // Line pricing
    // -------------------------------------------------------------------------

    #[test]
    fn test_baseline_without_rule() {
        let catalog = sample_catalog();

        let priced = price_line(&catalog, &line(1, 2), None).unwrap();
        assert_eq!(priced.quantity, 2);
        assert_eq!(priced.amount_cents, 2400); // 2 × $12.00
    }

    #[test]
    fn test_give_away_boosts_quantity_not_amount() {
        let catalog = sample_catalog();
        let registry = sample_rules();
        let rule2 = registry.get(RuleId(2)).unwrap();

        // 2 small pizzas at $12.00, threshold 2 met: +1 free small
        let priced = price_line(&catalog, &line(1, 2), Some(rule2)).unwrap();
        assert_eq!(priced.quantity, 3);
        assert_eq!(priced.amount_cents, 2400);
    }

    #[test]
    fn test_give_away_below_threshold_is_baseline() {
        let catalog = sample_catalog();
        let registry = sample_rules();
        let rule1 = registry.get(RuleId(1)).unwrap();

        // 1 small pizza, threshold is 2
        let priced = price_line(&catalog, &line(1, 1), Some(rule1)).unwrap();
        assert_eq!(priced.quantity, 1);
        assert_eq!(priced.amount_cents, 1200);
    }

    #[test]
    fn test_discount_reduces_amount_not_quantity() {
        let catalog = sample_catalog();
        let registry = sample_rules();
        let rule2 = registry.get(RuleId(2)).unwrap();

        // 1 large pizza at $22.00, 10% off: $19.80
        let priced = price_line(&catalog, &line(3, 1), Some(rule2)).unwrap();
        assert_eq!(priced.quantity, 1);
        assert_eq!(priced.amount_cents, 1980);
    }

    #[test]
    fn test_rule_without_detail_for_product_is_baseline() {
        let catalog = sample_catalog();
        let registry = sample_rules();
        let rule3 = registry.get(RuleId(3)).unwrap(); // only touches product 3

        let priced = price_line(&catalog, &line(1, 2), Some(rule3)).unwrap();
        assert_eq!(priced.quantity, 2);
        assert_eq!(priced.amount_cents, 2400);
    }

    #[test]
    fn test_zero_quantity_line_is_immune() {
        let catalog = sample_catalog();
        let registry = sample_rules();
        let rule2 = registry.get(RuleId(2)).unwrap();

        // Neither kind of detail may touch a zero-quantity line
        for product_id in [1, 3] {
            let priced = price_line(&catalog, &line(product_id, 0), Some(rule2)).unwrap();
            assert_eq!(priced, PricedLine { quantity: 0, amount_cents: 0 });
        }
    }

    #[test]
    fn test_unknown_product_fails_the_line() {
        let catalog = sample_catalog();

        assert_eq!(
            price_line(&catalog, &line(42, 1), None),
            Err(CoreError::UnknownProduct(ProductId(42)))
        );
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_order_totals_to_zero() {
        let catalog = sample_catalog();
        assert_eq!(totals(&catalog, &[], None).unwrap(), OrderTotals::default());
    }

    #[test]
    fn test_totals_without_rule_is_plain_sum() {
        let catalog = sample_catalog();

        let t = totals(&catalog, &[line(1, 2), line(3, 1)], None).unwrap();
        assert_eq!(t.quantity, 3);
        assert_eq!(t.amount_cents, 4600); // 2×$12.00 + 1×$22.00
    }

    #[test]
    fn test_reference_scenario_before_and_after() {
        // Catalog: 1 Small $12, 2 Medium $16, 3 Large $22.
        // Order: 2 small + 1 large. Rule 2: give away 1 small at small>=2,
        // 10% off large.
        let catalog = sample_catalog();
        let registry = sample_rules();
        let lines = [line(1, 2), line(3, 1)];
        let rule2 = registry.get(RuleId(2)).unwrap();

        let before = totals(&catalog, &lines, None).unwrap();
        assert_eq!(before.quantity, 3);
        assert_eq!(before.amount(), Money::from_cents(4600));

        let after = totals(&catalog, &lines, Some(rule2)).unwrap();
        assert_eq!(after.quantity, 4); // +1 free small
        assert_eq!(after.amount(), Money::from_cents(4380)); // $24.00 + $19.80

        // Recomputing "before" after "after" sees the same snapshot
        assert_eq!(totals(&catalog, &lines, None).unwrap(), before);
    }

    #[test]
    fn test_give_away_never_changes_amount_discount_never_changes_quantity() {
        let catalog = sample_catalog();
        let registry = sample_rules();

        for rule in registry.rules() {
            for qty in [1, 2, 3, 10] {
                for product_id in [1u32, 2, 3] {
                    let l = line(product_id, qty);
                    let baseline = price_line(&catalog, &l, None).unwrap();
                    let priced = price_line(&catalog, &l, Some(rule)).unwrap();

                    match rule.detail_for(l.product_id) {
                        Some(RuleDetail::GiveAway { .. }) => {
                            assert_eq!(priced.amount_cents, baseline.amount_cents);
                        }
                        Some(RuleDetail::Discount { .. }) => {
                            assert_eq!(priced.quantity, baseline.quantity);
                        }
                        None => assert_eq!(priced, baseline),
                    }
                }
            }
        }
    }

    #[test]
    fn test_duplicate_lines_are_priced_independently() {
        // A caller bypassing the session invariant must not lose quantity
        let catalog = sample_catalog();

        let t = totals(&catalog, &[line(1, 1), line(1, 2)], None).unwrap();
        assert_eq!(t.quantity, 3);
        assert_eq!(t.amount_cents, 3600);
    }

    #[test]
    fn test_totals_propagate_unknown_product() {
        let catalog = sample_catalog();

        assert_eq!(
            totals(&catalog, &[line(1, 1), line(42, 1)], None),
            Err(CoreError::UnknownProduct(ProductId(42)))
        );
    }

    // -------------------------------------------------------------------------
    // Selector support
    // -------------------------------------------------------------------------

    #[test]
    fn test_products_not_yet_ordered() {
        let catalog = sample_catalog();

        assert_eq!(
            products_not_yet_ordered(&catalog, &[]),
            vec![ProductId(1), ProductId(2), ProductId(3)]
        );
        assert_eq!(
            products_not_yet_ordered(&catalog, &[line(2, 0)]),
            vec![ProductId(1), ProductId(3)]
        );
        assert!(
            products_not_yet_ordered(&catalog, &[line(1, 1), line(2, 1), line(3, 1)]).is_empty()
        );
    }
}
