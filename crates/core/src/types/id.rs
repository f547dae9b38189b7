//! Product identifiers.
//!
//! Catalog IDs are opaque strings (e.g. `"acc-001"`). Cart line items are keyed
//! by the same ID, so the newtype keeps product IDs from being mixed up with
//! names or image URLs that travel alongside them in forms.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A product identifier from the catalog.
///
/// # Example
///
/// ```rust
/// # use bazaar_core::ProductId;
/// let id = ProductId::new("acc-001");
/// assert_eq!(id.as_str(), "acc-001");
/// assert_eq!(id.to_string(), "acc-001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the ID and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
