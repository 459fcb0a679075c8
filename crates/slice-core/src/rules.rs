//! # Promotion Rules Module
//!
//! Price rules and the rule registry.
//!
//! ## Rule Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         PriceRule                                       │
//! │                                                                         │
//! │  id: 2                                                                  │
//! │  name: "Give away 1 small pizza and 10% off large"                     │
//! │  details:                                                               │
//! │    ┌────────────┬──────────────────────────────────────────────┐       │
//! │    │ ProductId  │ RuleDetail                                   │       │
//! │    ├────────────┼──────────────────────────────────────────────┤       │
//! │    │     1      │ GiveAway { min: 2, received: (1, +1) }       │       │
//! │    │     3      │ Discount { percent: 10 }                     │       │
//! │    └────────────┴──────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  One detail per product. A rule is eligible for an order only when     │
//! │  every product key above has an order line.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The per-product mapping is a tagged-union lookup table: recovering the
//! concrete effect is a `match`, never a dynamic type test.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::ProductId;
use crate::error::{CoreError, CoreResult};
use crate::validation::{validate_discount_percent, validate_min_quantity, validate_rule_name};

// =============================================================================
// Rule Id
// =============================================================================

/// Identifier for a price rule. Serializes as a bare number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct RuleId(pub u32);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Rule Detail
// =============================================================================

/// The effect a rule applies to one specific product.
///
/// Tagged by `kind` on the wire ("give_away" / "discount"), matching the
/// frontend contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleDetail {
    /// Extra units at no additional cost, once a quantity threshold is met.
    ///
    /// The received quantity is added to the triggering line's effective
    /// quantity; the amount never changes.
    GiveAway {
        /// Minimum ordered quantity for the give-away to trigger (≥ 1).
        #[serde(rename = "minQuantity")]
        min_quantity: u32,
        /// Product handed to the customer.
        #[serde(rename = "receivedProductId")]
        received_product_id: ProductId,
        /// How many units are given away.
        #[serde(rename = "receivedQuantity")]
        received_quantity: u32,
    },

    /// Percentage off the line amount. The quantity never changes.
    Discount {
        /// Whole-number percentage, 0 to 100.
        #[serde(rename = "discountPercent")]
        discount_percent: u32,
    },
}

impl RuleDetail {
    fn validate(&self) -> CoreResult<()> {
        match self {
            RuleDetail::GiveAway { min_quantity, .. } => validate_min_quantity(*min_quantity)?,
            RuleDetail::Discount { discount_percent } => {
                validate_discount_percent(*discount_percent)?
            }
        }
        Ok(())
    }
}

// =============================================================================
// Price Rule
// =============================================================================

/// A named bundle of per-product details representing one promotion.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceRule {
    /// Unique identifier within the registry.
    pub id: RuleId,

    /// Display name shown in the rule selector.
    pub name: String,

    /// Effect per product, keyed by the product the effect applies to.
    details: BTreeMap<ProductId, RuleDetail>,
}

impl PriceRule {
    /// Builds a validated rule from `(product, detail)` pairs.
    ///
    /// ## Errors
    /// - `ConflictingRuleDetail` if two details target the same product.
    ///   Precedence between, say, a give-away and a discount on one product
    ///   is undefined, so the configuration is rejected at load time.
    /// - `Validation` for an empty name, a zero `min_quantity`, or a
    ///   discount percent above 100.
    pub fn new(
        id: RuleId,
        name: impl Into<String>,
        details: impl IntoIterator<Item = (ProductId, RuleDetail)>,
    ) -> CoreResult<Self> {
        let name = name.into();
        validate_rule_name(&name)?;

        let mut map = BTreeMap::new();
        for (product_id, detail) in details {
            detail.validate()?;
            if map.insert(product_id, detail).is_some() {
                return Err(CoreError::ConflictingRuleDetail {
                    rule_id: id,
                    product_id,
                });
            }
        }

        Ok(PriceRule { id, name, details: map })
    }

    /// Returns the detail this rule applies to a product, if any.
    #[inline]
    pub fn detail_for(&self, product_id: ProductId) -> Option<&RuleDetail> {
        self.details.get(&product_id)
    }

    /// Iterates the product ids this rule references, ascending.
    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.details.keys().copied()
    }
}

// =============================================================================
// Rule Registry
// =============================================================================

/// The static registry of price rules, keyed by id.
///
/// ## Invariants
/// - Rule ids are unique (duplicates rejected at construction)
/// - Immutable after construction; safe to share read-only
/// - Iteration is ascending by rule id, which is what gives the
///   eligibility filter its deterministic output order
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RuleRegistry {
    rules: BTreeMap<RuleId, PriceRule>,
}

impl RuleRegistry {
    /// Builds a registry from already-validated rules.
    ///
    /// ## Errors
    /// - `DuplicateRule` if two rules share an id
    pub fn with_rules(rules: impl IntoIterator<Item = PriceRule>) -> CoreResult<Self> {
        let mut map = BTreeMap::new();

        for rule in rules {
            let id = rule.id;
            if map.insert(id, rule).is_some() {
                return Err(CoreError::DuplicateRule(id));
            }
        }

        Ok(RuleRegistry { rules: map })
    }

    /// Looks up a rule by id.
    #[inline]
    pub fn get(&self, id: RuleId) -> Option<&PriceRule> {
        self.rules.get(&id)
    }

    /// Looks up a rule by id, failing with `UnknownRule` when absent.
    ///
    /// Used where the caller explicitly selected the id and absence is a
    /// boundary-input error rather than a soft miss.
    pub fn lookup(&self, id: RuleId) -> CoreResult<&PriceRule> {
        self.rules.get(&id).ok_or(CoreError::UnknownRule(id))
    }

    /// Iterates rules in ascending id order.
    pub fn rules(&self) -> impl Iterator<Item = &PriceRule> {
        self.rules.values()
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Checks if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
