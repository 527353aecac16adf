//! Property tests: random command sequences never violate the cart
//! invariants, and the persisted blob always mirrors the in-memory state.

use std::collections::HashSet;

use proptest::prelude::*;
use rust_decimal::Decimal;
use trolley::{
    fixtures::{quantity, simple_snapshot, variant_snapshot},
    prelude::*,
};

#[derive(Debug, Clone)]
enum Action {
    Add {
        product: u8,
        combination: Option<u8>,
        price_cents: u32,
        on_offer: bool,
        stock: u8,
        qty: u8,
    },
    Remove {
        product: u8,
        combination: Option<u8>,
    },
    SetQuantity {
        product: u8,
        combination: Option<u8>,
        qty: u8,
    },
    Increment {
        product: u8,
        combination: Option<u8>,
    },
    Decrement {
        product: u8,
        combination: Option<u8>,
    },
    Clear,
}

fn combination_strategy() -> impl Strategy<Value = Option<u8>> {
    prop_oneof![Just(None), (1u8..4).prop_map(Some)]
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (
            0u8..5,
            combination_strategy(),
            100u32..50_000,
            any::<bool>(),
            1u8..7,
            1u8..9,
        )
            .prop_map(
                |(product, combination, price_cents, on_offer, stock, qty)| Action::Add {
                    product,
                    combination,
                    price_cents,
                    on_offer,
                    stock,
                    qty,
                }
            ),
        (0u8..5, combination_strategy())
            .prop_map(|(product, combination)| Action::Remove {
                product,
                combination
            }),
        (0u8..5, combination_strategy(), 1u8..9).prop_map(|(product, combination, qty)| {
            Action::SetQuantity {
                product,
                combination,
                qty,
            }
        }),
        (0u8..5, combination_strategy()).prop_map(|(product, combination)| {
            Action::Increment {
                product,
                combination,
            }
        }),
        (0u8..5, combination_strategy()).prop_map(|(product, combination)| {
            Action::Decrement {
                product,
                combination,
            }
        }),
        Just(Action::Clear),
    ]
}

fn apply(store: &mut CartStore<MemoryChannel>, action: Action) {
    match action {
        Action::Add {
            product,
            combination,
            price_cents,
            on_offer,
            stock,
            qty,
        } => {
            let price = Decimal::new(i64::from(price_cents), 2);
            let discount = on_offer.then(|| Decimal::new(i64::from(price_cents / 2), 2));

            let snapshot = match combination {
                Some(id) => variant_snapshot(u64::from(id), price, discount, u32::from(stock)),
                None => simple_snapshot(price, discount, u32::from(stock)),
            };

            // Rejections (duplicate, beyond stock) are part of normal traffic.
            let _ = store.add_item(
                ProductId::new(u64::from(product)),
                snapshot,
                quantity(u32::from(qty)),
                combination.map(|id| CombinationId::new(u64::from(id))),
            );
        }
        Action::Remove {
            product,
            combination,
        } => {
            let _ = store.remove_item(
                ProductId::new(u64::from(product)),
                combination.map(|id| CombinationId::new(u64::from(id))),
            );
        }
        Action::SetQuantity {
            product,
            combination,
            qty,
        } => {
            let _ = store.set_quantity(
                ProductId::new(u64::from(product)),
                quantity(u32::from(qty)),
                combination.map(|id| CombinationId::new(u64::from(id))),
            );
        }
        Action::Increment {
            product,
            combination,
        } => {
            let _ = store.increment(
                ProductId::new(u64::from(product)),
                combination.map(|id| CombinationId::new(u64::from(id))),
            );
        }
        Action::Decrement {
            product,
            combination,
        } => {
            let _ = store.decrement(
                ProductId::new(u64::from(product)),
                combination.map(|id| CombinationId::new(u64::from(id))),
            );
        }
        Action::Clear => store.clear_cart(),
    }
}

proptest! {
    #[test]
    fn random_command_sequences_preserve_invariants(
        actions in prop::collection::vec(action_strategy(), 1..80)
    ) {
        let mut store = CartStore::open(MemoryChannel::new(), ShippingPolicy::default());

        for action in actions {
            apply(&mut store, action);

            // Identity uniqueness: no two lines share a (product, combination) key.
            let keys: HashSet<ItemKey> = store.items().iter().map(LineItem::key).collect();
            prop_assert_eq!(keys.len(), store.items().len());

            // Quantity bounds: at least one (structural), at most the snapshot stock.
            for item in store.items() {
                prop_assert!(item.quantity().get() >= 1);
                prop_assert!(item.quantity().get() <= item.available_stock());
            }

            // Write-through: the persisted blob always mirrors the in-memory cart.
            let loaded = store.channel().load();
            prop_assert!(loaded.is_ok(), "persisted blob must stay readable");
            let persisted_items = loaded
                .ok()
                .flatten()
                .map(|snapshot| snapshot.items)
                .unwrap_or_default();
            prop_assert_eq!(persisted_items.as_slice(), store.items());

            // Subtotal is a pure function of the item list.
            prop_assert_eq!(subtotal(store.items()), subtotal(store.items()));

            let by_hand: Decimal = store
                .items()
                .iter()
                .map(|item| item.unit_price() * Decimal::from(item.quantity().get()))
                .sum();
            prop_assert_eq!(subtotal(store.items()), by_hand);
        }
    }
}
