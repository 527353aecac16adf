//! Trolley
//!
//! Trolley is a session-scoped shopping cart engine: line items with
//! denormalized catalog snapshots, stock-aware quantity management,
//! write-through persistence and deterministic pricing totals.

pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod items;
pub mod persist;
pub mod prelude;
pub mod pricing;
pub mod store;
