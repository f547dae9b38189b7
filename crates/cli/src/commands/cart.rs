//! File-backed cart commands.
//!
//! These run the same [`CartStore`] operations as the storefront, against a
//! cart kept in a local JSON file.

use std::path::Path;

use bazaar_core::{Cart, CartStore, NewCartItem, ProductId, Quantity};

use crate::storage::FileStorage;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn open(file: &Path) -> Result<CartStore<FileStorage>, Box<dyn std::error::Error>> {
    let storage = FileStorage::open(file)?;
    tracing::debug!(path = %storage.path().display(), "Opened cart file");
    Ok(CartStore::new(storage))
}

fn log_cart(cart: &Cart) {
    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for item in cart.items() {
        tracing::info!(
            "{:<20} {:>4} x {:<18} = {}  {}",
            item.id.as_str(),
            item.quantity,
            item.price.display(),
            item.line_total().display(),
            item.name,
        );
    }
    tracing::info!("Items: {}  Total: {}", cart.item_count(), cart.total().display());
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if the cart file cannot be read or is corrupted.
pub fn show(file: &Path) -> CommandResult {
    let cart = open(file)?.try_get_cart()?;
    log_cart(&cart);
    Ok(())
}

/// Add one unit of a catalog product.
///
/// # Errors
///
/// Returns an error if the product is not in the catalog or the cart file
/// cannot be written.
pub async fn add(file: &Path, source: &str, id: &str) -> CommandResult {
    let catalog = super::catalog::load(source).await?;
    let product = catalog
        .get(&ProductId::from(id))
        .ok_or_else(|| format!("Product not found: {id}"))?;

    let cart = open(file)?.add_to_cart(NewCartItem::from(product))?;
    tracing::info!("'{}' added to cart", product.name);
    log_cart(&cart);
    Ok(())
}

/// Set an item's quantity; zero or less removes it.
///
/// # Errors
///
/// Returns an error if the quantity is not a whole number or the cart file
/// cannot be written.
pub fn update(file: &Path, id: &str, quantity: &str) -> CommandResult {
    let quantity = Quantity::parse(quantity)?;
    let cart = open(file)?.update_quantity(&ProductId::from(id), quantity)?;
    log_cart(&cart);
    Ok(())
}

/// Remove an item. Unknown ids are ignored.
///
/// # Errors
///
/// Returns an error if the cart file cannot be written.
pub fn remove(file: &Path, id: &str) -> CommandResult {
    let cart = open(file)?.remove_from_cart(&ProductId::from(id))?;
    log_cart(&cart);
    Ok(())
}

/// Remove every item.
///
/// # Errors
///
/// Returns an error if the cart file cannot be written.
pub fn clear(file: &Path) -> CommandResult {
    open(file)?.clear_cart()?;
    tracing::info!("Cart cleared");
    Ok(())
}
