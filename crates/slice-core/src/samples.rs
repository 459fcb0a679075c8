//! # Sample Data
//!
//! The pizzeria fixture used by tests and demo hosts: three products and
//! three promotions.
//!
//! | Id | Product       | Price  |
//! |----|---------------|--------|
//! | 1  | Small Pizza   | $12.00 |
//! | 2  | Medium Pizza  | $16.00 |
//! | 3  | Large Pizza   | $22.00 |
//!
//! Rules:
//! 1. Give away 1 small pizza when at least 2 smalls are ordered
//! 2. Rule 1's give-away plus 10% off large pizza
//! 3. 10% off large pizza

use crate::catalog::{Catalog, Product, ProductId};
use crate::rules::{PriceRule, RuleDetail, RuleId, RuleRegistry};

/// Builds the sample pizzeria catalog.
pub fn sample_catalog() -> Catalog {
    let products = [
        Product {
            id: ProductId(1),
            name: "Small Pizza".to_string(),
            unit_price_cents: 1200,
        },
        Product {
            id: ProductId(2),
            name: "Medium Pizza".to_string(),
            unit_price_cents: 1600,
        },
        Product {
            id: ProductId(3),
            name: "Large Pizza".to_string(),
            unit_price_cents: 2200,
        },
    ];

    Catalog::with_products(products).expect("sample catalog is well-formed")
}

/// Builds the sample rule registry.
pub fn sample_rules() -> RuleRegistry {
    let small_give_away = RuleDetail::GiveAway {
        min_quantity: 2,
        received_product_id: ProductId(1),
        received_quantity: 1,
    };
    let large_discount = RuleDetail::Discount {
        discount_percent: 10,
    };

    let rules = [
        PriceRule::new(
            RuleId(1),
            "Give away 1 small pizza",
            [(ProductId(1), small_give_away.clone())],
        ),
        PriceRule::new(
            RuleId(2),
            "Give away 1 small pizza and discount 10% for large pizza",
            [
                (ProductId(1), small_give_away),
                (ProductId(3), large_discount.clone()),
            ],
        ),
        PriceRule::new(
            RuleId(3),
            "Discount 10% for large pizza",
            [(ProductId(3), large_discount)],
        ),
    ];

    let rules = rules
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("sample rules are well-formed");

    RuleRegistry::with_rules(rules).expect("sample rule ids are unique")
}
