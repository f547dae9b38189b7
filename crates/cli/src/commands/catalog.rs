//! Catalog inspection commands.

use std::sync::Arc;
use std::time::Duration;

use bazaar_core::{Catalog, CategoryFilter};
use bazaar_storefront::catalog::{CatalogClient, CatalogSource};
use tracing::{error, info, warn};

/// Load a catalog from a file path or http(s) URL.
///
/// # Errors
///
/// Returns an error if the source is malformed or the catalog cannot be
/// loaded.
pub async fn load(source: &str) -> Result<Arc<Catalog>, Box<dyn std::error::Error>> {
    let source: CatalogSource = source.parse()?;
    info!(%source, "Loading catalog");

    let client = CatalogClient::new(source, Duration::from_secs(60));
    Ok(client.catalog().await?)
}

/// List products, optionally filtered by category.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn list(source: &str, product_type: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load(source).await?;
    let filter: CategoryFilter = product_type.parse()?;

    let products = catalog.filter(&filter);
    if products.is_empty() {
        warn!(%filter, "No products in this category");
        return Ok(());
    }

    for product in &products {
        info!(
            "{:<20} {:<14} {:<12} {}  ({})",
            product.id.as_str(),
            product.product_type.as_str(),
            product.platform,
            product.name,
            product.price.display(),
        );
    }
    info!("{} product(s)", products.len());

    Ok(())
}

/// Validate a catalog before publishing it.
///
/// Reports duplicate ids as errors and uncommon categories as warnings.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or has duplicate ids.
pub async fn check(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load(source).await?;

    info!("Products: {}", catalog.products.len());
    for category in catalog.categories() {
        let count = catalog
            .filter(&CategoryFilter::Only(category.clone()))
            .len();
        info!("  {category}: {count}");
        if !bazaar_core::ProductType::known().contains(category) {
            warn!(%category, "Category is not shown in the navigation bar");
        }
    }

    let duplicates = catalog.duplicate_ids();
    if !duplicates.is_empty() {
        for id in &duplicates {
            error!(%id, "Duplicate product id");
        }
        return Err(format!("{} duplicate id(s) found", duplicates.len()).into());
    }

    info!("Catalog OK");
    Ok(())
}
