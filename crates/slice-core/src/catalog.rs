//! # Catalog Module
//!
//! The fixed set of purchasable products.
//!
//! The catalog is built once at process start and never mutated afterwards;
//! it has no interior mutability, so a concurrent host may share it freely
//! behind an `Arc`. Products are keyed by id, and the catalog's natural
//! order (ascending id) is what the order-editing UI uses to populate its
//! add/edit selectors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_product_name, validate_unit_price_cents};

// =============================================================================
// Product Id
// =============================================================================

/// Identifier for a catalog product.
///
/// Plain small integers, matching the ids the frontend sends back in order
/// lines. Serializes as a bare number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier within the catalog.
    pub id: ProductId,

    /// Display name shown in the order-editing selector.
    pub name: String,

    /// Unit price in cents (smallest currency unit).
    pub unit_price_cents: i64,
}

impl Product {
    /// Creates a validated product.
    pub fn new(id: ProductId, name: impl Into<String>, unit_price_cents: i64) -> CoreResult<Self> {
        let name = name.into();
        validate_product_name(&name)?;
        validate_unit_price_cents(unit_price_cents)?;

        Ok(Product {
            id,
            name,
            unit_price_cents,
        })
    }

    /// Returns the unit price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The static registry of products, keyed by id.
///
/// ## Invariants
/// - Product ids are unique (duplicate ids rejected at construction)
/// - Unit prices are non-negative (validated at construction)
/// - Immutable after construction
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
}

impl Catalog {
    /// Builds a catalog from a list of products.
    ///
    /// ## Errors
    /// - `DuplicateProduct` if two products share an id
    /// - `Validation` if a product has an empty name or negative price
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> CoreResult<Self> {
        let mut map = BTreeMap::new();

        for product in products {
            validate_product_name(&product.name)?;
            validate_unit_price_cents(product.unit_price_cents)?;

            let id = product.id;
            if map.insert(id, product).is_some() {
                return Err(CoreError::DuplicateProduct(id));
            }
        }

        Ok(Catalog { products: map })
    }

    /// Looks up a product by id.
    #[inline]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Checks whether a product id exists in the catalog.
    #[inline]
    pub fn contains(&self, id: ProductId) -> bool {
        self.products.contains_key(&id)
    }

    /// Iterates products in ascending id order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Iterates product ids in ascending order (the catalog's natural order).
    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.products.keys().copied()
    }

    /// Returns the number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Checks if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, price_cents: i64) -> Product {
        Product::new(ProductId(id), format!("Product {}", id), price_cents).unwrap()
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::with_products([product(1, 1200), product(3, 2200)]).unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains(ProductId(1)));
        assert!(!catalog.contains(ProductId(2)));
        assert_eq!(catalog.get(ProductId(3)).unwrap().unit_price().cents(), 2200);
    }

    #[test]
    fn test_catalog_natural_order_is_ascending_id() {
        // Insertion order deliberately scrambled
        let catalog =
            Catalog::with_products([product(3, 2200), product(1, 1200), product(2, 1600)])
                .unwrap();

        let ids: Vec<u32> = catalog.product_ids().map(|p| p.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_catalog_rejects_duplicate_id() {
        let result = Catalog::with_products([product(1, 1200), product(1, 1600)]);
        assert_eq!(result.unwrap_err(), CoreError::DuplicateProduct(ProductId(1)));
    }

    #[test]
    fn test_product_rejects_negative_price() {
        assert!(Product::new(ProductId(1), "Small Pizza", -1).is_err());
        assert!(Product::new(ProductId(1), "Free Sample", 0).is_ok());
    }

    #[test]
    fn test_product_rejects_empty_name() {
        assert!(Product::new(ProductId(1), "   ", 1200).is_err());
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let p = product(1, 1200);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["unitPriceCents"], 1200);
    }
}
