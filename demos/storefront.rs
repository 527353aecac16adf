//! Storefront Walkthrough
//!
//! This demo drives a `CartStore` through a typical browsing session: adding
//! a simple product and two combinations of a variant product, bumping
//! quantities against their stock bounds, printing the order summary, and
//! clearing the cart after checkout. An observer prints each notification
//! the way a UI would raise toasts.
//!
//! Run with: `cargo run --example storefront`

use anyhow::{Result, anyhow};
use rust_decimal::dec;

use trolley::{
    fixtures::{quantity, simple_snapshot, variant_snapshot},
    prelude::*,
};

/// Observer that prints events the way a cart drawer would raise toasts.
struct Toasts;

#[expect(clippy::print_stdout, reason = "Example code")]
impl CartObserver for Toasts {
    fn on_event(&mut self, event: &CartEvent) {
        match event {
            CartEvent::ItemAdded { key } => println!("[toast] added {key}"),
            CartEvent::AlreadyInCart { key } => println!("[toast] {key} is already in the cart"),
            CartEvent::ItemRemoved { key } => println!("[toast] removed {key}"),
            CartEvent::QuantityChanged { key, quantity } => {
                println!("[toast] {key} quantity is now {quantity}");
            }
            CartEvent::Cleared => println!("[toast] cart emptied"),
            CartEvent::PersistFailed => println!("[toast] could not save your cart"),
        }
    }
}

/// Storefront Walkthrough
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let mut store = CartStore::open(MemoryChannel::new(), ShippingPolicy::default());
    store.subscribe(Box::new(Toasts));

    // A t-shirt on offer, and two combinations of the same watch.
    store.add_item(
        ProductId::new(1),
        simple_snapshot(dec!(29.99), Some(dec!(24.99)), 5),
        quantity(1),
        None,
    )?;
    store.add_item(
        ProductId::new(2),
        variant_snapshot(7, dec!(149.99), Some(dec!(129.99)), 2),
        quantity(1),
        Some(CombinationId::new(7)),
    )?;
    store.add_item(
        ProductId::new(2),
        variant_snapshot(8, dec!(159.99), None, 1),
        quantity(1),
        Some(CombinationId::new(8)),
    )?;

    // Clicking "add to cart" twice only raises a toast.
    if let Err(error) = store.add_item(
        ProductId::new(1),
        simple_snapshot(dec!(29.99), Some(dec!(24.99)), 5),
        quantity(1),
        None,
    ) {
        println!("rejected: {error}");
    }

    // Two more t-shirts, then one increment too many for the stock of 5.
    store.set_quantity(ProductId::new(1), quantity(3), None)?;
    store.increment(ProductId::new(1), None)?;
    store.increment(ProductId::new(1), None)?;
    if let Err(error) = store.increment(ProductId::new(1), None) {
        println!("rejected: {error}");
    }

    let shirt = store
        .get(ProductId::new(1), None)
        .ok_or_else(|| anyhow!("t-shirt vanished from the cart"))?;

    println!();
    println!("badge count: {}", store.item_count());
    println!("t-shirt line total: {}", shirt.line_total());

    let totals = store.totals();
    println!("subtotal: {}", totals.subtotal);
    println!("discount: {}", totals.discount);
    println!("shipping: {}", totals.shipping);
    println!("total:    {}", totals.total);

    // The order API confirmed placement; the session empties the cart.
    store.clear_cart();
    println!("persisted blob: {:?}", store.channel().raw());

    Ok(())
}
