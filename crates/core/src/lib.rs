//! Bazaar Core - Cart, checkout and catalog domain library.
//!
//! This crate holds the domain logic shared by every Bazaar component:
//! - `storefront` - Public-facing web shop
//! - `cli` - Command-line tools for catalogs and carts
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure logic - no network, no
//! filesystem, no HTTP. Persistence is reached through the [`cart::Storage`]
//! trait, which each front end implements over its own backend (session,
//! file, memory).
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, emails and products
//! - [`cart`] - Cart items, the storage interface and the [`cart::CartStore`]
//! - [`catalog`] - Static product catalog and category filtering
//! - [`checkout`] - Checkout form validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use cart::{
    CART_KEY, Cart, CartError, CartItem, CartStore, MemoryStorage, NewCartItem, Quantity,
    Storage, StorageError,
};
pub use catalog::{Catalog, CategoryFilter};
pub use checkout::{CheckoutField, CheckoutForm, FieldError, ValidatedOrder, ValidationErrors};
pub use types::*;
