//! Catalog products.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Product category.
///
/// The catalog uses kebab-case strings. Categories the shop does not know
/// about are kept verbatim in [`ProductType::Other`] so they still filter by
/// equality and survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProductType {
    /// Game accounts.
    Account,
    /// In-game currency.
    Currency,
    /// Digital game keys.
    DigitalGame,
    /// Any other category string.
    Other(String),
}

impl ProductType {
    /// The category as it appears in the catalog and in URLs.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Account => "account",
            Self::Currency => "currency",
            Self::DigitalGame => "digital-game",
            Self::Other(s) => s,
        }
    }

    /// Human-readable category label for navigation.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Account => "اکانت",
            Self::Currency => "ارز بازی",
            Self::DigitalGame => "بازی دیجیتال",
            Self::Other(s) => s,
        }
    }

    /// The categories shown in the navigation bar.
    #[must_use]
    pub fn known() -> [Self; 3] {
        [Self::Account, Self::Currency, Self::DigitalGame]
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "account" => Self::Account,
            "currency" => Self::Currency,
            "digital-game" => Self::DigitalGame,
            other => Self::Other(other.to_owned()),
        })
    }
}

impl TryFrom<String> for ProductType {
    type Error = core::convert::Infallible;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ProductType> for String {
    fn from(t: ProductType) -> Self {
        match t {
            ProductType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

/// A product as listed in the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub platform: String,
    /// Image URL.
    pub image: String,
    pub price: Price,
    #[serde(rename = "type")]
    pub product_type: ProductType,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_type_parses_known_categories() {
        assert_eq!("account".parse::<ProductType>().unwrap(), ProductType::Account);
        assert_eq!("currency".parse::<ProductType>().unwrap(), ProductType::Currency);
        assert_eq!(
            "digital-game".parse::<ProductType>().unwrap(),
            ProductType::DigitalGame
        );
    }

    #[test]
    fn test_product_type_keeps_unknown_verbatim() {
        let t: ProductType = "gift-card".parse().unwrap();
        assert_eq!(t, ProductType::Other("gift-card".to_string()));
        assert_eq!(t.as_str(), "gift-card");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"gift-card\"");
    }

    #[test]
    fn test_product_deserializes_catalog_shape() {
        let json = r#"{
            "id": "acc-001",
            "name": "اکانت استیم",
            "platform": "Steam",
            "image": "https://example.com/steam.png",
            "price": 150000,
            "type": "account"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "acc-001");
        assert_eq!(product.platform, "Steam");
        assert_eq!(product.product_type, ProductType::Account);
        assert_eq!(product.price.raw(), "150000");
    }
}
