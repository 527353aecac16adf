//! Cart
//!
//! The cart aggregate: an ordered list of line items, newest first. All
//! mutations go through this type so its invariants hold everywhere:
//!
//! - no two line items share an identity key;
//! - a quantity never exceeds the stock recorded in the item's snapshot;
//! - a quantity never drops below one.

use std::num::NonZeroU32;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::{CombinationId, ProductId},
    items::{ItemKey, LineItem},
};

/// Errors raised by cart mutations.
///
/// None of these are fatal: every variant leaves the cart unchanged and is
/// meant to be surfaced to the shopper as an informational notice.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The identity key is already present; the cart never merges quantities.
    #[error("{0} is already in the cart")]
    DuplicateItem(ItemKey),

    /// The requested quantity exceeds the stock recorded in the snapshot.
    /// Advisory: the caller keeps the previous quantity.
    #[error("{key}: requested quantity {requested} exceeds available stock {available}")]
    StockExceeded {
        /// Item whose bound was hit.
        key: ItemKey,

        /// Quantity the caller asked for.
        requested: u32,

        /// Stock bound recorded in the snapshot.
        available: u32,
    },

    /// The product has variant entries in the cart, so the combination
    /// identifier must be supplied to address one unambiguously.
    #[error("product {0} is in the cart as one or more combinations; a combination id is required")]
    CombinationRequired(ProductId),
}

/// Ordered collection of line items, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: SmallVec<[LineItem; 4]>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from already-validated line items, preserving order.
    ///
    /// Used when hydrating from a persisted snapshot.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    /// Adds a line item to the front of the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::DuplicateItem`] if the identity key is already present.
    /// - [`CartError::StockExceeded`] if the quantity exceeds the snapshot's
    ///   stock bound.
    pub fn add(&mut self, item: LineItem) -> Result<(), CartError> {
        let key = item.key();

        if self.items.iter().any(|existing| existing.key() == key) {
            return Err(CartError::DuplicateItem(key));
        }

        let requested = item.quantity().get();
        let available = item.available_stock();

        if requested > available {
            return Err(CartError::StockExceeded {
                key,
                requested,
                available,
            });
        }

        self.items.insert(0, item);

        Ok(())
    }

    /// Removes the line item addressed by the identity key, returning it.
    ///
    /// Returns `Ok(None)` without error when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CombinationRequired`] when `combination_id` is
    /// omitted but the product only exists in the cart as variant entries;
    /// removing an arbitrary variant would be silent data loss.
    pub fn remove(
        &mut self,
        product_id: ProductId,
        combination_id: Option<CombinationId>,
    ) -> Result<Option<LineItem>, CartError> {
        match self.position_of(product_id, combination_id)? {
            Some(index) => Ok(Some(self.items.remove(index))),
            None => Ok(None),
        }
    }

    /// Overwrites the quantity of the line item addressed by the identity
    /// key. Returns `Ok(false)` without error when nothing matches.
    ///
    /// # Errors
    ///
    /// - [`CartError::StockExceeded`] if `quantity` exceeds the item's stock
    ///   bound (advisory; the stored quantity is retained).
    /// - [`CartError::CombinationRequired`] when `combination_id` is omitted
    ///   but the product only exists in the cart as variant entries.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: NonZeroU32,
        combination_id: Option<CombinationId>,
    ) -> Result<bool, CartError> {
        let Some(index) = self.position_of(product_id, combination_id)? else {
            return Ok(false);
        };

        let Some(item) = self.items.get_mut(index) else {
            return Ok(false);
        };

        let available = item.available_stock();

        if quantity.get() > available {
            return Err(CartError::StockExceeded {
                key: item.key(),
                requested: quantity.get(),
                available,
            });
        }

        item.set_quantity(quantity);

        Ok(true)
    }

    /// Empties the cart unconditionally. Idempotent.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the line item addressed by the identity key, applying the
    /// same combination disambiguation rule as the mutations.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CombinationRequired`] when `combination_id` is
    /// omitted but the product only exists in the cart as variant entries.
    pub fn find(
        &self,
        product_id: ProductId,
        combination_id: Option<CombinationId>,
    ) -> Result<Option<&LineItem>, CartError> {
        Ok(self
            .position_of(product_id, combination_id)?
            .and_then(|index| self.items.get(index)))
    }

    /// Returns the line item addressed by the exact identity key.
    #[must_use]
    pub fn get(
        &self,
        product_id: ProductId,
        combination_id: Option<CombinationId>,
    ) -> Option<&LineItem> {
        let key = ItemKey {
            product_id,
            combination_id,
        };

        self.items.iter().find(|item| item.key() == key)
    }

    /// Returns the line items in display order, newest first.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterates over the line items in display order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all line items.
    ///
    /// This is the badge figure: raw unit count, not distinct lines and not
    /// a price.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity().get()))
            .sum()
    }

    /// Resolves an identity key to a position in the item list.
    ///
    /// With a combination id the match is exact. Without one, only an entry
    /// with no combination matches; if the product is present solely as
    /// variant entries the lookup is ambiguous and rejected.
    fn position_of(
        &self,
        product_id: ProductId,
        combination_id: Option<CombinationId>,
    ) -> Result<Option<usize>, CartError> {
        let key = ItemKey {
            product_id,
            combination_id,
        };

        if let Some(index) = self.items.iter().position(|item| item.key() == key) {
            return Ok(Some(index));
        }

        if combination_id.is_none()
            && self
                .items
                .iter()
                .any(|item| item.product_id() == product_id)
        {
            return Err(CartError::CombinationRequired(product_id));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use crate::fixtures::{quantity, simple_item, variant_item};

    use super::*;

    #[test]
    fn add_prepends_newest_first() -> testresult::TestResult {
        let mut cart = Cart::new();

        cart.add(simple_item(1, dec!(100), None, 5, 1))?;
        cart.add(simple_item(2, dec!(200), None, 5, 1))?;

        let ids: Vec<ProductId> = cart.iter().map(LineItem::product_id).collect();

        assert_eq!(ids, vec![ProductId::new(2), ProductId::new(1)]);

        Ok(())
    }

    #[test]
    fn duplicate_add_is_rejected_and_leaves_quantity_unchanged() -> testresult::TestResult {
        let mut cart = Cart::new();

        cart.add(simple_item(1, dec!(100), Some(dec!(80)), 5, 1))?;
        let err = cart.add(simple_item(1, dec!(100), Some(dec!(80)), 5, 3));

        assert!(matches!(err, Err(CartError::DuplicateItem(_))));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 1);

        Ok(())
    }

    #[test]
    fn two_combinations_of_one_product_are_distinct_lines() -> testresult::TestResult {
        let mut cart = Cart::new();

        cart.add(variant_item(2, 7, dec!(50), Some(dec!(40)), 2, 1))?;
        cart.add(variant_item(2, 8, dec!(60), None, 1, 1))?;

        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[test]
    fn add_beyond_stock_is_rejected() {
        let mut cart = Cart::new();

        let err = cart.add(simple_item(1, dec!(100), None, 5, 6));

        assert!(matches!(
            err,
            Err(CartError::StockExceeded {
                requested: 6,
                available: 5,
                ..
            })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_within_stock_succeeds() -> testresult::TestResult {
        let mut cart = Cart::new();
        cart.add(simple_item(1, dec!(100), Some(dec!(80)), 5, 1))?;

        let changed = cart.set_quantity(ProductId::new(1), quantity(3), None)?;

        assert!(changed);
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[test]
    fn set_quantity_beyond_stock_retains_previous_quantity() -> testresult::TestResult {
        let mut cart = Cart::new();
        cart.add(simple_item(1, dec!(100), Some(dec!(80)), 5, 1))?;
        cart.set_quantity(ProductId::new(1), quantity(3), None)?;

        let err = cart.set_quantity(ProductId::new(1), quantity(10), None);

        assert!(matches!(err, Err(CartError::StockExceeded { .. })));
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[test]
    fn set_quantity_validates_against_combination_stock() -> testresult::TestResult {
        let mut cart = Cart::new();
        cart.add(variant_item(2, 7, dec!(50), None, 2, 1))?;

        let err = cart.set_quantity(ProductId::new(2), quantity(3), Some(CombinationId::new(7)));

        assert!(matches!(
            err,
            Err(CartError::StockExceeded {
                requested: 3,
                available: 2,
                ..
            })
        ));

        Ok(())
    }

    #[test]
    fn set_quantity_on_missing_item_is_a_noop() -> testresult::TestResult {
        let mut cart = Cart::new();

        let changed = cart.set_quantity(ProductId::new(9), quantity(2), None)?;

        assert!(!changed);

        Ok(())
    }

    #[test]
    fn remove_exact_combination() -> testresult::TestResult {
        let mut cart = Cart::new();
        cart.add(variant_item(2, 7, dec!(50), None, 2, 1))?;
        cart.add(variant_item(2, 8, dec!(60), None, 1, 1))?;

        let removed = cart.remove(ProductId::new(2), Some(CombinationId::new(7)))?;

        assert_eq!(
            removed.map(|item| item.combination_id()),
            Some(Some(CombinationId::new(7)))
        );
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn remove_without_combination_id_is_rejected_for_variant_entries() -> testresult::TestResult {
        let mut cart = Cart::new();
        cart.add(variant_item(2, 7, dec!(50), None, 2, 1))?;

        let err = cart.remove(ProductId::new(2), None);

        assert_eq!(err, Err(CartError::CombinationRequired(ProductId::new(2))));
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn find_applies_the_combination_disambiguation_rule() -> testresult::TestResult {
        let mut cart = Cart::new();
        cart.add(variant_item(2, 7, dec!(50), None, 2, 1))?;
        cart.add(simple_item(1, dec!(100), None, 5, 1))?;

        assert!(cart.find(ProductId::new(1), None)?.is_some());
        assert!(
            cart.find(ProductId::new(2), Some(CombinationId::new(7)))?
                .is_some()
        );
        assert!(cart.find(ProductId::new(9), None)?.is_none());
        assert_eq!(
            cart.find(ProductId::new(2), None).err(),
            Some(CartError::CombinationRequired(ProductId::new(2)))
        );

        Ok(())
    }

    #[test]
    fn remove_missing_item_is_a_noop() -> testresult::TestResult {
        let mut cart = Cart::new();

        let removed = cart.remove(ProductId::new(9), None)?;

        assert!(removed.is_none());

        Ok(())
    }

    #[test]
    fn clear_is_idempotent() -> testresult::TestResult {
        let mut cart = Cart::new();
        cart.add(simple_item(1, dec!(100), None, 5, 2))?;

        cart.clear();
        let after_first = cart.clone();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart, after_first);

        Ok(())
    }

    #[test]
    fn item_count_sums_quantities_not_lines() -> testresult::TestResult {
        let mut cart = Cart::new();
        cart.add(simple_item(1, dec!(100), None, 5, 3))?;
        cart.add(simple_item(2, dec!(200), None, 5, 2))?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 5);

        Ok(())
    }
}
