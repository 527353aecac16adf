//! Fixtures
//!
//! Canned catalog snapshots and line items shared by the unit and
//! integration tests.

use std::num::NonZeroU32;

use rust_decimal::Decimal;

use crate::{
    catalog::{CombinationId, CombinationSnapshot, ProductId, ProductSnapshot},
    items::LineItem,
};

/// A quantity, clamped up to one for convenience in test data.
#[must_use]
pub fn quantity(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}

/// Snapshot of a simple (non-variant) product.
#[must_use]
pub fn simple_snapshot(
    price: Decimal,
    discount_price: Option<Decimal>,
    stock: u32,
) -> ProductSnapshot {
    ProductSnapshot {
        name: "Premium Cotton T-Shirt".into(),
        image: "products/t-shirt.jpg".into(),
        price,
        discount_price,
        stock,
        has_variations: false,
        combination: None,
    }
}

/// Snapshot of a variant product with one selected combination. Product-level
/// price and stock are deliberately unusable so tests catch any lookup that
/// fails to resolve through the combination.
#[must_use]
pub fn variant_snapshot(
    combination_id: u64,
    price: Decimal,
    discount_price: Option<Decimal>,
    stock: u32,
) -> ProductSnapshot {
    ProductSnapshot {
        name: "Classic Leather Watch".into(),
        image: "products/watch.jpg".into(),
        price: Decimal::ZERO,
        discount_price: None,
        stock: 0,
        has_variations: true,
        combination: Some(CombinationSnapshot {
            id: CombinationId::new(combination_id),
            price,
            discount_price,
            sku: format!("SKU-{combination_id}"),
            stock,
        }),
    }
}

/// Line item for a simple product.
#[must_use]
pub fn simple_item(
    product_id: u64,
    price: Decimal,
    discount_price: Option<Decimal>,
    stock: u32,
    qty: u32,
) -> LineItem {
    LineItem::new(
        ProductId::new(product_id),
        simple_snapshot(price, discount_price, stock),
        quantity(qty),
        None,
    )
}

/// Line item for one combination of a variant product.
#[must_use]
pub fn variant_item(
    product_id: u64,
    combination_id: u64,
    price: Decimal,
    discount_price: Option<Decimal>,
    stock: u32,
    qty: u32,
) -> LineItem {
    LineItem::new(
        ProductId::new(product_id),
        variant_snapshot(combination_id, price, discount_price, stock),
        quantity(qty),
        Some(CombinationId::new(combination_id)),
    )
}
