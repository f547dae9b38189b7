//! Static product catalog.
//!
//! The catalog is a JSON document with a `products` array. It is read-only:
//! front ends load it from wherever it is published and filter it by
//! category for display.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId, ProductType};

/// Query value meaning "no category filter".
pub const ALL_SENTINEL: &str = "all";

/// The product catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    /// Parse a catalog from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid catalog document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Products matching the filter, in catalog order.
    #[must_use]
    pub fn filter(&self, filter: &CategoryFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| filter.matches(product))
            .collect()
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Distinct categories in catalog order.
    #[must_use]
    pub fn categories(&self) -> Vec<&ProductType> {
        let mut seen: Vec<&ProductType> = Vec::new();
        for product in &self.products {
            if !seen.contains(&&product.product_type) {
                seen.push(&product.product_type);
            }
        }
        seen
    }

    /// IDs that appear more than once.
    ///
    /// Cart items are keyed by product ID, so duplicates would merge into a
    /// single line item.
    #[must_use]
    pub fn duplicate_ids(&self) -> Vec<&ProductId> {
        let mut duplicates: Vec<&ProductId> = Vec::new();
        for (i, product) in self.products.iter().enumerate() {
            let repeated = self
                .products
                .iter()
                .skip(i + 1)
                .any(|other| other.id == product.id);
            if repeated && !duplicates.contains(&&product.id) {
                duplicates.push(&product.id);
            }
        }
        duplicates
    }
}

/// Category filter for product listings.
///
/// Parsed from a query string value; `"all"` disables filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(ProductType),
}

impl CategoryFilter {
    /// Returns `true` if the product passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(product_type) => &product.product_type == product_type,
        }
    }

    /// The query value for this filter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_SENTINEL,
            Self::Only(product_type) => product_type.as_str(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_SENTINEL {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<&str>> for CategoryFilter {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::All, |s| match s.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        })
    }
}
