//! Cart store
//!
//! The single writer over the cart. UI components read line items and totals
//! from it and issue commands through it; every state change is mirrored to
//! the persistence channel before the command returns, and observers are
//! told what happened so they can raise toasts or update badges.
//!
//! Persistence is write-through but fire-and-forget: a failed write is
//! logged and broadcast, never propagated, and the in-memory cart stays
//! authoritative for the rest of the session.

use std::num::NonZeroU32;

use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartError},
    catalog::{CombinationId, ProductId, ProductSnapshot},
    items::{ItemKey, LineItem},
    persist::{CartSnapshotV1, PersistenceChannel},
    pricing::{self, ShippingPolicy, Totals},
};

/// State-change notifications broadcast to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A new line item was added.
    ItemAdded {
        /// Identity of the added item.
        key: ItemKey,
    },

    /// An add was rejected because the item is already in the cart.
    AlreadyInCart {
        /// Identity of the conflicting item.
        key: ItemKey,
    },

    /// A line item was removed.
    ItemRemoved {
        /// Identity of the removed item.
        key: ItemKey,
    },

    /// A line item's quantity changed.
    QuantityChanged {
        /// Identity of the item.
        key: ItemKey,

        /// New quantity.
        quantity: NonZeroU32,
    },

    /// The cart was emptied.
    Cleared,

    /// A persistence write failed; the in-memory cart is still valid.
    PersistFailed,
}

/// Receiver of cart state-change notifications.
pub trait CartObserver {
    /// Called after each state change or rejected command.
    fn on_event(&mut self, event: &CartEvent);
}

/// Observer that ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn on_event(&mut self, _event: &CartEvent) {}
}

/// Single source of truth for cart contents.
pub struct CartStore<C> {
    cart: Cart,
    channel: C,
    policy: ShippingPolicy,
    observers: Vec<Box<dyn CartObserver>>,
}

impl<C> std::fmt::Debug for CartStore<C>
where
    C: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("channel", &self.channel)
            .field("policy", &self.policy)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<C: PersistenceChannel> CartStore<C> {
    /// Opens a store, hydrating the cart from the channel.
    ///
    /// A missing blob yields an empty cart; a malformed or unreadable blob
    /// also yields an empty cart, with a warning, never an error.
    pub fn open(channel: C, policy: ShippingPolicy) -> Self {
        let cart = match channel.load() {
            Ok(Some(snapshot)) => snapshot.into_cart(),
            Ok(None) => Cart::new(),
            Err(error) => {
                warn!(%error, "saved cart could not be loaded; starting empty");
                Cart::new()
            }
        };

        Self {
            cart,
            channel,
            policy,
            observers: Vec::new(),
        }
    }

    /// Registers an observer for state-change notifications.
    pub fn subscribe(&mut self, observer: Box<dyn CartObserver>) {
        self.observers.push(observer);
    }

    /// Adds a product to the front of the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::DuplicateItem`] if the `(product, combination)` pair is
    ///   already present; observers receive [`CartEvent::AlreadyInCart`] and
    ///   the cart is unchanged.
    /// - [`CartError::StockExceeded`] if `quantity` exceeds the snapshot's
    ///   stock bound.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        snapshot: ProductSnapshot,
        quantity: NonZeroU32,
        combination_id: Option<CombinationId>,
    ) -> Result<(), CartError> {
        let item = LineItem::new(product_id, snapshot, quantity, combination_id);
        let key = item.key();

        match self.cart.add(item) {
            Ok(()) => {
                debug!(%key, quantity = quantity.get(), "item added to cart");
                self.persist();
                self.emit(&CartEvent::ItemAdded { key });

                Ok(())
            }
            Err(error @ CartError::DuplicateItem(_)) => {
                self.emit(&CartEvent::AlreadyInCart { key });

                Err(error)
            }
            Err(error) => Err(error),
        }
    }

    /// Removes the line item addressed by the identity key. Returns whether
    /// anything was removed; a missing item is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CombinationRequired`] when `combination_id` is
    /// omitted but the product only exists in the cart as variant entries.
    pub fn remove_item(
        &mut self,
        product_id: ProductId,
        combination_id: Option<CombinationId>,
    ) -> Result<bool, CartError> {
        match self.cart.remove(product_id, combination_id)? {
            Some(removed) => {
                let key = removed.key();

                debug!(%key, "item removed from cart");
                self.persist();
                self.emit(&CartEvent::ItemRemoved { key });

                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Overwrites the quantity of a line item. Returns whether anything
    /// changed; a missing item is a no-op.
    ///
    /// # Errors
    ///
    /// - [`CartError::StockExceeded`] (advisory) if `quantity` exceeds the
    ///   item's stock bound; the stored quantity is retained.
    /// - [`CartError::CombinationRequired`] when `combination_id` is omitted
    ///   but the product only exists in the cart as variant entries.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: NonZeroU32,
        combination_id: Option<CombinationId>,
    ) -> Result<bool, CartError> {
        if !self.cart.set_quantity(product_id, quantity, combination_id)? {
            return Ok(false);
        }

        let key = ItemKey {
            product_id,
            combination_id,
        };

        debug!(%key, quantity = quantity.get(), "cart quantity changed");
        self.persist();
        self.emit(&CartEvent::QuantityChanged { key, quantity });

        Ok(true)
    }

    /// Increments a line item's quantity by one.
    ///
    /// Saturates silently at `u32::MAX`; the stock bound rejects the
    /// increment long before that.
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::set_quantity`].
    pub fn increment(
        &mut self,
        product_id: ProductId,
        combination_id: Option<CombinationId>,
    ) -> Result<bool, CartError> {
        let Some(item) = self.cart.find(product_id, combination_id)? else {
            return Ok(false);
        };

        let next = item.quantity().saturating_add(1);

        self.set_quantity(product_id, next, combination_id)
    }

    /// Decrements a line item's quantity by one. Decrementing a quantity-1
    /// item is a no-op, not a removal.
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::set_quantity`].
    pub fn decrement(
        &mut self,
        product_id: ProductId,
        combination_id: Option<CombinationId>,
    ) -> Result<bool, CartError> {
        let Some(item) = self.cart.find(product_id, combination_id)? else {
            return Ok(false);
        };

        let Some(next) = NonZeroU32::new(item.quantity().get() - 1) else {
            return Ok(false);
        };

        self.set_quantity(product_id, next, combination_id)
    }

    /// Empties the cart and persists the empty state. Idempotent.
    ///
    /// Called by the checkout flow after the order API confirms placement.
    pub fn clear_cart(&mut self) {
        self.cart.clear();

        debug!("cart cleared");
        self.persist();
        self.emit(&CartEvent::Cleared);
    }

    /// Line items in display order, newest first.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// The line item addressed by the exact identity key, if present.
    #[must_use]
    pub fn get(
        &self,
        product_id: ProductId,
        combination_id: Option<CombinationId>,
    ) -> Option<&LineItem> {
        self.cart.get(product_id, combination_id)
    }

    /// Sum of quantities across all line items, for badge display.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Summary figures under the store's shipping policy.
    #[must_use]
    pub fn totals(&self) -> Totals {
        pricing::totals(self.cart.items(), &self.policy)
    }

    /// The shipping policy this store was opened with.
    #[must_use]
    pub fn shipping_policy(&self) -> &ShippingPolicy {
        &self.policy
    }

    /// The underlying persistence channel.
    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Write-through persistence of the full cart. Failures degrade to a
    /// warning and a `PersistFailed` event.
    fn persist(&mut self) {
        let snapshot = CartSnapshotV1::from_cart(&self.cart);

        if let Err(error) = self.channel.save(&snapshot) {
            warn!(%error, "cart persistence failed; in-memory cart remains authoritative");
            self.emit(&CartEvent::PersistFailed);
        }
    }

    fn emit(&mut self, event: &CartEvent) {
        for observer in &mut self.observers {
            observer.on_event(event);
        }
    }
}
