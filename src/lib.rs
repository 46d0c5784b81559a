//! Storefront
//!
//! Client core for a shopping-cart storefront: a typed transport over the
//! storefront REST API, a single error classifier deciding how failures are
//! shown, and an optimistic cart reconciler that applies edits locally and
//! merges debounced server previews back in.

pub mod api;
pub mod carts;
pub mod config;
pub mod context;
pub mod notifier;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod reconciler;
pub mod transport;
