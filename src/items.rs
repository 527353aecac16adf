//! Line items

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{CombinationId, ProductId, ProductSnapshot};

/// Identity key of a line item: the `(product, combination)` pair.
///
/// Two cart entries with the same key refer to the same purchasable unit and
/// are never allowed to coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    /// Catalog product.
    pub product_id: ProductId,

    /// Selected combination, absent for simple products.
    pub combination_id: Option<CombinationId>,
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.combination_id {
            Some(combination) => {
                write!(f, "product {} (combination {combination})", self.product_id)
            }
            None => write!(f, "product {}", self.product_id),
        }
    }
}

/// One entry in the cart: a chosen product (and optional variant) at a given
/// quantity, carrying the catalog snapshot captured when it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    product_id: ProductId,
    combination_id: Option<CombinationId>,
    quantity: NonZeroU32,
    snapshot: ProductSnapshot,
}

impl LineItem {
    /// Creates a new line item.
    ///
    /// The quantity floor is structural: `NonZeroU32` makes a zero quantity
    /// unrepresentable, both in memory and in persisted blobs.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        snapshot: ProductSnapshot,
        quantity: NonZeroU32,
        combination_id: Option<CombinationId>,
    ) -> Self {
        Self {
            product_id,
            combination_id,
            quantity,
            snapshot,
        }
    }

    /// Returns the identity key of this line item.
    #[must_use]
    pub fn key(&self) -> ItemKey {
        ItemKey {
            product_id: self.product_id,
            combination_id: self.combination_id,
        }
    }

    /// Returns the catalog product identifier.
    #[must_use]
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Returns the selected combination identifier, if any.
    #[must_use]
    pub fn combination_id(&self) -> Option<CombinationId> {
        self.combination_id
    }

    /// Returns the quantity.
    #[must_use]
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// Returns the catalog snapshot captured at add-time.
    ///
    /// The snapshot is potentially stale; it is only refreshed by removing
    /// and re-adding the item.
    #[must_use]
    pub fn snapshot(&self) -> &ProductSnapshot {
        &self.snapshot
    }

    /// Returns the stock bound this item's quantity must respect.
    #[must_use]
    pub fn available_stock(&self) -> u32 {
        self.snapshot.available_stock()
    }

    /// Overwrites the quantity. Callers validate the stock bound first.
    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }

    /// Effective unit price charged for this item: discounted price when
    /// present, regular price otherwise.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.snapshot.effective_price()
    }

    /// Line total: effective unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity.get())
    }

    /// Informational discount on this line: (regular − effective) × quantity.
    ///
    /// Zero when the item is not on offer.
    #[must_use]
    pub fn line_discount(&self) -> Decimal {
        let per_unit = self.snapshot.regular_price() - self.unit_price();

        per_unit.max(Decimal::ZERO) * Decimal::from(self.quantity.get())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use crate::fixtures::{quantity, simple_item, variant_item};

    #[test]
    fn line_total_uses_discounted_price() {
        let item = simple_item(1, dec!(100), Some(dec!(80)), 5, 3);

        assert_eq!(item.line_total(), dec!(240));
    }

    #[test]
    fn line_total_falls_back_to_regular_price() {
        let item = simple_item(1, dec!(100), None, 5, 2);

        assert_eq!(item.line_total(), dec!(200));
    }

    #[test]
    fn line_discount_is_spread_over_quantity() {
        let item = simple_item(1, dec!(100), Some(dec!(80)), 5, 3);

        assert_eq!(item.line_discount(), dec!(60));
    }

    #[test]
    fn line_discount_is_zero_without_offer() {
        let item = simple_item(1, dec!(100), None, 5, 3);

        assert_eq!(item.line_discount(), dec!(0));
    }

    #[test]
    fn variant_item_prices_through_combination() {
        let item = variant_item(2, 7, dec!(50), Some(dec!(40)), 2, 1);

        assert_eq!(item.unit_price(), dec!(40));
        assert_eq!(item.line_total(), dec!(40));
        assert_eq!(item.available_stock(), 2);
    }

    #[test]
    fn keys_distinguish_combinations_of_one_product() {
        let first = variant_item(2, 7, dec!(50), Some(dec!(40)), 2, 1);
        let second = variant_item(2, 8, dec!(60), None, 1, 1);

        assert_ne!(first.key(), second.key());
        assert_eq!(first.product_id(), second.product_id());
    }

    #[test]
    fn set_quantity_overwrites() {
        let mut item = simple_item(1, dec!(100), None, 5, 1);

        item.set_quantity(quantity(4));

        assert_eq!(item.quantity().get(), 4);
    }
}
