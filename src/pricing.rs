//! Pricing
//!
//! Pure derived queries over a list of line items. One convention applies
//! everywhere: the subtotal is computed from *effective* unit prices
//! (discounted where an offer exists), the discount line is informational
//! only, and the grand total is `subtotal + shipping`. The discount is never
//! subtracted a second time.

use rust_decimal::{Decimal, dec};
use serde::{Deserialize, Serialize};

use crate::items::LineItem;

/// Sum of line totals at effective unit prices.
#[must_use]
pub fn subtotal(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::line_total).sum()
}

/// Informational sum of per-line discounts (regular minus effective price,
/// spread over quantity).
#[must_use]
pub fn discount_total(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::line_discount).sum()
}

/// Shipping rule: free strictly above a threshold, flat fee otherwise.
///
/// Threshold and fee are external configuration, typically loaded from the
/// storefront's YAML config. The defaults mirror the storefront's published
/// offer (free shipping on orders over 100, flat fee 9.99 below).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Subtotal above which shipping is free.
    pub free_threshold: Decimal,

    /// Flat fee charged at or below the threshold.
    pub flat_fee: Decimal,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: dec!(100),
            flat_fee: dec!(9.99),
        }
    }
}

impl ShippingPolicy {
    /// Creates a policy from explicit values.
    #[must_use]
    pub fn new(free_threshold: Decimal, flat_fee: Decimal) -> Self {
        Self {
            free_threshold,
            flat_fee,
        }
    }

    /// Parses a policy from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns a `serde_norway::Error` if the document is not valid YAML or
    /// is missing a field.
    pub fn from_yaml(source: &str) -> Result<Self, serde_norway::Error> {
        serde_norway::from_str(source)
    }

    /// Shipping fee for a given subtotal.
    #[must_use]
    pub fn fee_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_threshold {
            Decimal::ZERO
        } else {
            self.flat_fee
        }
    }
}

/// Summary figures for a cart, as shown on the order summary panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    /// Sum of line totals at effective unit prices.
    pub subtotal: Decimal,

    /// Informational discount line; already reflected in `subtotal`.
    pub discount: Decimal,

    /// Shipping fee derived from the subtotal.
    pub shipping: Decimal,

    /// `subtotal + shipping`.
    pub total: Decimal,
}

/// Computes all summary figures for a list of line items.
#[must_use]
pub fn totals(items: &[LineItem], policy: &ShippingPolicy) -> Totals {
    let subtotal = subtotal(items);
    let shipping = policy.fee_for(subtotal);

    Totals {
        subtotal,
        discount: discount_total(items),
        shipping,
        total: subtotal + shipping,
    }
}
