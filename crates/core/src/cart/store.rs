//! Cart persistence over an injected [`Storage`] backend.

use super::{Cart, CartError, NewCartItem, Quantity, Storage};
use crate::types::ProductId;

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Read-modify-write operations on the persisted cart.
///
/// Every mutation loads the cart, applies the change and writes it back in
/// one call, then returns the updated cart so the caller can re-render.
///
/// # Example
///
/// ```rust
/// use bazaar_core::{CartStore, MemoryStorage, NewCartItem, Price, ProductId};
///
/// let mut store = CartStore::new(MemoryStorage::new());
/// let item = NewCartItem {
///     id: ProductId::new("acc-001"),
///     name: "Steam account".to_string(),
///     price: Price::from(150_000),
///     image: "https://example.com/steam.png".to_string(),
/// };
///
/// store.add_to_cart(item.clone())?;
/// let cart = store.add_to_cart(item)?;
/// assert_eq!(cart.len(), 1);
/// assert_eq!(cart.item_count(), 2);
/// # Ok::<(), bazaar_core::CartError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CartStore<S> {
    storage: S,
}

impl<S: Storage> CartStore<S> {
    /// Create a store over the given storage backend.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Borrow the storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and return the storage backend.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Load the cart, reporting corrupted data as an error.
    ///
    /// A missing entry is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Corrupted`] if the stored value is not a valid
    /// cart, or [`CartError::Storage`] if the backend fails.
    pub fn try_get_cart(&self) -> Result<Cart, CartError> {
        match self.storage.get_item(CART_KEY)? {
            None => Ok(Cart::default()),
            Some(raw) => serde_json::from_str(&raw).map_err(CartError::Corrupted),
        }
    }

    /// Load the cart, treating corrupted data as an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the backend fails.
    pub fn get_cart(&self) -> Result<Cart, CartError> {
        match self.try_get_cart() {
            Err(CartError::Corrupted(_)) => Ok(Cart::default()),
            other => other,
        }
    }

    /// Add one unit of a product, creating the line item if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPrice`] if the unit price is negative or
    /// above [`Price::MAX_UNIT`], or an error if the cart cannot be persisted.
    ///
    /// [`Price::MAX_UNIT`]: crate::types::Price::MAX_UNIT
    pub fn add_to_cart(&mut self, item: NewCartItem) -> Result<Cart, CartError> {
        if !item.price.is_valid_unit() {
            return Err(CartError::InvalidPrice(item.price.raw()));
        }

        let mut cart = self.get_cart()?;
        cart.add(item);
        self.save(&cart)?;
        Ok(cart)
    }

    /// Remove a line item. Removing an unknown ID leaves storage untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> Result<Cart, CartError> {
        let mut cart = self.get_cart()?;
        if cart.remove(id) {
            self.save(&cart)?;
        }
        Ok(cart)
    }

    /// Set the quantity of a line item.
    ///
    /// Zero or negative quantities remove the item. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if the quantity does not fit a
    /// line item, or an error if the cart cannot be persisted.
    pub fn update_quantity(
        &mut self,
        id: &ProductId,
        quantity: Quantity,
    ) -> Result<Cart, CartError> {
        if quantity.removes() {
            return self.remove_from_cart(id);
        }

        let quantity = u32::try_from(quantity.get())
            .map_err(|_| CartError::InvalidQuantity(quantity.to_string()))?;

        let mut cart = self.get_cart()?;
        let Some(item) = cart.get_mut(id) else {
            return Ok(cart);
        };
        item.quantity = quantity;

        self.save(&cart)?;
        Ok(cart)
    }

    /// Delete the stored cart entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn clear_cart(&mut self) -> Result<(), CartError> {
        self.storage.remove_item(CART_KEY)?;
        Ok(())
    }

    fn save(&mut self, cart: &Cart) -> Result<(), CartError> {
        let raw = serde_json::to_string(cart).map_err(CartError::Serialize)?;
        self.storage.set_item(CART_KEY, raw)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::{MemoryStorage, StorageError};
    use crate::types::Price;

    fn new_item(id: &str, price: u32) -> NewCartItem {
        NewCartItem {
            id: ProductId::from(id),
            name: format!("Product {id}"),
            price: Price::from(price),
            image: format!("https://example.com/{id}.png"),
        }
    }

    fn store() -> CartStore<MemoryStorage> {
        CartStore::new(MemoryStorage::new())
    }

    #[test]
    fn test_get_cart_absent_is_empty() {
        assert!(store().get_cart().unwrap().is_empty());
    }

    #[test]
    fn test_add_same_id_twice_increments_quantity() {
        let mut store = store();
        store.add_to_cart(new_item("a", 1000)).unwrap();
        let cart = store.add_to_cart(new_item("a", 1000)).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(store.get_cart().unwrap(), cart);
    }

    #[test]
    fn test_add_rejects_out_of_range_price() {
        let mut store = store();
        let item = NewCartItem {
            price: Price::new("10000000000000000000000000".parse().unwrap()),
            ..new_item("big", 0)
        };

        assert!(matches!(
            store.add_to_cart(item),
            Err(CartError::InvalidPrice(_))
        ));
        assert_eq!(store.storage().get_item(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_max_quantity_at_max_price_still_totals() {
        let mut store = store();
        let item = NewCartItem {
            price: Price::MAX_UNIT,
            ..new_item("top", 0)
        };
        store.add_to_cart(item).unwrap();
        let cart = store
            .update_quantity(&ProductId::from("top"), Quantity::new(i64::from(u32::MAX)))
            .unwrap();

        assert_eq!(cart.total(), Price::MAX_UNIT.times(u32::MAX));
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut store = store();
        store.add_to_cart(new_item("b", 1)).unwrap();
        store.add_to_cart(new_item("a", 1)).unwrap();
        store.add_to_cart(new_item("b", 1)).unwrap();

        let ids: Vec<_> = store
            .get_cart()
            .unwrap()
            .items()
            .iter()
            .map(|item| item.id.to_string())
            .collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = store();
        let cart = store.remove_from_cart(&ProductId::from("missing")).unwrap();
        assert!(cart.is_empty());
        assert!(store.storage().is_empty());

        store.add_to_cart(new_item("a", 1000)).unwrap();
        let cart = store.remove_from_cart(&ProductId::from("missing")).unwrap();
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_existing_item() {
        let mut store = store();
        store.add_to_cart(new_item("a", 1000)).unwrap();
        store.add_to_cart(new_item("b", 2000)).unwrap();

        let cart = store.remove_from_cart(&ProductId::from("a")).unwrap();
        assert_eq!(cart.len(), 1);
        assert!(cart.get(&ProductId::from("a")).is_none());
        assert_eq!(store.get_cart().unwrap(), cart);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut store = store();
        store.add_to_cart(new_item("a", 1000)).unwrap();

        let cart = store
            .update_quantity(&ProductId::from("a"), Quantity::new(5))
            .unwrap();
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.total(), Price::from(5000));
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        for quantity in [0, -1, -100] {
            let mut store = store();
            store.add_to_cart(new_item("a", 1000)).unwrap();
            store.add_to_cart(new_item("b", 1000)).unwrap();

            let cart = store
                .update_quantity(&ProductId::from("a"), Quantity::new(quantity))
                .unwrap();
            assert!(cart.get(&ProductId::from("a")).is_none());
            assert_eq!(store.get_cart().unwrap().len(), 1);
        }
    }

    #[test]
    fn test_update_quantity_unknown_id_is_noop() {
        let mut store = store();
        store.add_to_cart(new_item("a", 1000)).unwrap();

        let cart = store
            .update_quantity(&ProductId::from("missing"), Quantity::new(4))
            .unwrap();
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_update_quantity_overflow_is_rejected() {
        let mut store = store();
        store.add_to_cart(new_item("a", 1000)).unwrap();

        let result = store.update_quantity(&ProductId::from("a"), Quantity::new(i64::MAX));
        assert!(matches!(result, Err(CartError::InvalidQuantity(_))));
        assert_eq!(store.get_cart().unwrap().items()[0].quantity, 1);
    }

    #[test]
    fn test_clear_cart_removes_entry() {
        let mut store = store();
        store.add_to_cart(new_item("a", 1000)).unwrap();

        store.clear_cart().unwrap();
        assert!(store.get_cart().unwrap().is_empty());
        assert_eq!(store.storage().get_item(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_corrupted_cart_reads_as_empty_and_is_overwritten() {
        let mut storage = MemoryStorage::new();
        storage.set_item(CART_KEY, "{not json".to_string()).unwrap();
        let mut store = CartStore::new(storage);

        assert!(matches!(store.try_get_cart(), Err(CartError::Corrupted(_))));
        assert!(store.get_cart().unwrap().is_empty());

        let cart = store.add_to_cart(new_item("a", 1000)).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(store.try_get_cart().unwrap(), cart);
    }

    #[test]
    fn test_store_over_borrowed_storage() {
        let mut storage = MemoryStorage::new();
        CartStore::new(&mut storage)
            .add_to_cart(new_item("a", 1000))
            .unwrap();

        assert!(storage.get_item(CART_KEY).unwrap().is_some());
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("offline".to_string()))
        }

        fn set_item(&mut self, _key: &str, _value: String) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("offline".to_string()))
        }

        fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_backend_failures_propagate() {
        let mut store = CartStore::new(FailingStorage);
        assert!(matches!(store.get_cart(), Err(CartError::Storage(_))));
        assert!(matches!(
            store.add_to_cart(new_item("a", 1)),
            Err(CartError::Storage(_))
        ));
        assert!(matches!(store.clear_cart(), Err(CartError::Storage(_))));
    }
}
