//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    catalog::{CombinationId, CombinationSnapshot, ProductId, ProductSnapshot},
    items::{ItemKey, LineItem},
    persist::{
        CartSnapshotV1, JsonFileChannel, MemoryChannel, PersistError, PersistenceChannel,
    },
    pricing::{ShippingPolicy, Totals, discount_total, subtotal, totals},
    store::{CartEvent, CartObserver, CartStore, NoopObserver},
};
