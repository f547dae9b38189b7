//! Shopping cart domain.
//!
//! A [`Cart`] is an ordered list of [`CartItem`]s keyed by product ID. It is
//! persisted as a JSON array under a single storage key by [`CartStore`],
//! which reaches its backend through the [`Storage`] trait.
//!
//! # Invariants
//!
//! - At most one item per product ID; repeat adds bump the quantity.
//! - Quantities are always positive. A mutation that would drive a quantity
//!   to zero or below removes the item instead.
//! - Insertion order is preserved.

mod storage;
mod store;

pub use storage::{MemoryStorage, Storage, StorageError};
pub use store::{CART_KEY, CartStore};

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, ProductId};

/// Errors raised by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The storage backend failed.
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// The stored cart is not a valid JSON cart.
    #[error("stored cart is corrupted: {0}")]
    Corrupted(#[source] serde_json::Error),

    /// The cart could not be serialized.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A unit price was negative or above [`Price::MAX_UNIT`].
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// A quantity was not a whole number.
    #[error("invalid quantity: {0:?}")]
    InvalidQuantity(String),
}

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Product details submitted when adding to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
}

impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            image: item.image,
            quantity: 1,
        }
    }
}

impl From<&crate::types::Product> for NewCartItem {
    fn from(product: &crate::types::Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

/// The cart: line items in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns `true` if the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Look up a line item by product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Sum of `price * quantity` over all items.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities, shown in the navbar counter.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    fn add(&mut self, item: NewCartItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
            None => self.items.push(item.into()),
        }
    }

    fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }
}

impl FromIterator<CartItem> for Cart {
    fn from_iter<I: IntoIterator<Item = CartItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// A requested quantity from user input.
///
/// Zero and negative values are valid requests: they mean "remove".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(i64);

impl Quantity {
    /// Create a quantity from a number.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parse user input, rejecting anything that is not a whole number.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for empty, non-numeric or
    /// fractional input.
    pub fn parse(input: &str) -> Result<Self, CartError> {
        input
            .trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| CartError::InvalidQuantity(input.to_owned()))
    }

    /// The raw value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns `true` if this quantity removes the item.
    #[must_use]
    pub const fn removes(self) -> bool {
        self.0 <= 0
    }
}

impl FromStr for Quantity {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
