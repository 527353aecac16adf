//! Catalog snapshots
//!
//! Denormalized product display data captured at add-to-cart time. The
//! catalog itself is an external collaborator; this module only defines the
//! shape of the data it hands over. A snapshot is frozen into the line item
//! and may go stale — it is only refreshed by removing and re-adding the
//! item, never silently.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque catalog product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Creates a product identifier from its raw catalog value.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque identifier for a specific variant combination of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinationId(u64);

impl CombinationId {
    /// Creates a combination identifier from its raw catalog value.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for CombinationId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CombinationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Point-in-time copy of a selected variant combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationSnapshot {
    /// Combination identifier.
    pub id: CombinationId,

    /// Regular unit price.
    pub price: Decimal,

    /// Discounted unit price, when the combination is on offer.
    pub discount_price: Option<Decimal>,

    /// Stock-keeping unit code.
    pub sku: String,

    /// Units in stock for this combination.
    pub stock: u32,
}

/// Point-in-time copy of product display data.
///
/// For a variant product, `combination` holds the selected combination and
/// price/stock lookups resolve through it; for a simple product the
/// product-level fields apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Display name.
    pub name: String,

    /// Image path or URL.
    pub image: String,

    /// Regular unit price of the simple product.
    pub price: Decimal,

    /// Discounted unit price of the simple product, when on offer.
    pub discount_price: Option<Decimal>,

    /// Units in stock for the simple product.
    pub stock: u32,

    /// Whether the product is sold in variant combinations.
    pub has_variations: bool,

    /// The selected combination, for variant products.
    pub combination: Option<CombinationSnapshot>,
}

impl ProductSnapshot {
    /// Returns the regular unit price, resolving through the selected
    /// combination for variant products.
    #[must_use]
    pub fn regular_price(&self) -> Decimal {
        match self.variant() {
            Some(combination) => combination.price,
            None => self.price,
        }
    }

    /// Returns the effective unit price: the discounted price when present,
    /// the regular price otherwise.
    ///
    /// This is the price charged everywhere totals are computed.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.variant() {
            Some(combination) => combination.discount_price.unwrap_or(combination.price),
            None => self.discount_price.unwrap_or(self.price),
        }
    }

    /// Returns the stock bound the cart must respect: the selected
    /// combination's stock for variant products, the product's otherwise.
    #[must_use]
    pub fn available_stock(&self) -> u32 {
        match self.variant() {
            Some(combination) => combination.stock,
            None => self.stock,
        }
    }

    /// The selected combination, when this snapshot is of a variant product.
    fn variant(&self) -> Option<&CombinationSnapshot> {
        if self.has_variations {
            self.combination.as_ref()
        } else {
            None
        }
    }
}
