//! Product listing route handlers.
//!
//! The listing page is a shell with a loading placeholder; HTMX swaps in
//! `/products/list` on load, which renders exactly one of the populated,
//! empty or error states.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use bazaar_core::{CategoryFilter, Product, ProductType};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::state::AppState;

/// Shown while the product list is loading.
pub const LOADING_MESSAGE: &str = "در حال بارگذاری محصولات...";

/// Shown when no product matches the filter.
pub const EMPTY_MESSAGE: &str = "محصولی برای نمایش یافت نشد.";

/// Shown when the catalog could not be loaded.
pub const ERROR_MESSAGE: &str = "خطا در بارگذاری محصولات. لطفاً بعداً تلاش کنید.";

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub product_type: Option<String>,
}

impl ListQuery {
    /// The category filter; a missing or blank `type` means all products.
    #[must_use]
    pub fn filter(&self) -> CategoryFilter {
        CategoryFilter::from(
            self.product_type
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }
}

/// Product card display data.
///
/// `raw_price` and `image` feed the card's add-to-cart form unformatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub platform: String,
    pub image: String,
    pub price: String,
    pub raw_price: String,
    pub category: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            platform: product.platform.clone(),
            image: product.image.clone(),
            price: product.price.display(),
            raw_price: product.price.raw(),
            category: product.product_type.label().to_string(),
        }
    }
}

/// Terminal state of a product list load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductListView {
    Populated(Vec<ProductCardView>),
    Empty,
    Error,
}

impl ProductListView {
    /// Project the filtered products into cards.
    #[must_use]
    pub fn from_products(products: &[&Product]) -> Self {
        if products.is_empty() {
            Self::Empty
        } else {
            Self::Populated(products.iter().map(|p| ProductCardView::from(*p)).collect())
        }
    }

    /// Cards to render; none for the empty and error states.
    #[must_use]
    pub fn cards(&self) -> &[ProductCardView] {
        match self {
            Self::Populated(cards) => cards,
            Self::Empty | Self::Error => &[],
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Category link in the filter bar.
#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub value: String,
    pub label: String,
    pub active: bool,
}

fn category_links(active: &CategoryFilter) -> Vec<CategoryLink> {
    std::iter::once(CategoryLink {
        value: CategoryFilter::All.to_string(),
        label: "همه محصولات".to_string(),
        active: *active == CategoryFilter::All,
    })
    .chain(ProductType::known().into_iter().map(|product_type| {
        let label = product_type.label().to_string();
        let filter = CategoryFilter::Only(product_type);
        CategoryLink {
            value: filter.to_string(),
            label,
            active: *active == filter,
        }
    }))
    .collect()
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub filter: String,
    pub categories: Vec<CategoryLink>,
    pub loading_message: &'static str,
}

impl ProductsIndexTemplate {
    fn new(filter: &CategoryFilter) -> Self {
        Self {
            filter: filter.to_string(),
            categories: category_links(filter),
            loading_message: LOADING_MESSAGE,
        }
    }
}

/// Product list fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_list.html")]
pub struct ProductListTemplate {
    pub list: ProductListView,
    pub empty_message: &'static str,
    pub error_message: &'static str,
}

/// Home page: every product.
#[instrument]
pub async fn home() -> ProductsIndexTemplate {
    ProductsIndexTemplate::new(&CategoryFilter::All)
}

/// Product listing page.
#[instrument]
pub async fn index(Query(query): Query<ListQuery>) -> ProductsIndexTemplate {
    ProductsIndexTemplate::new(&query.filter())
}

/// Product list fragment (HTMX).
///
/// Catalog failures render the error state instead of an HTTP error.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ProductListTemplate {
    let list = match state.catalog().catalog().await {
        Ok(catalog) => ProductListView::from_products(&catalog.filter(&query.filter())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load catalog");
            ProductListView::Error
        }
    };

    ProductListTemplate {
        list,
        empty_message: EMPTY_MESSAGE,
        error_message: ERROR_MESSAGE,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use bazaar_core::Catalog;
    use tower::ServiceExt;

    use super::*;
    use crate::routes::tests::{body_text, get, test_app};

    const CATALOG: &str = r#"{"products": [
        {"id": "acc-1", "name": "Steam", "platform": "PC", "image": "https://img.example/s.png", "price": 150000, "type": "account"}
    ]}"#;

    #[test]
    fn test_query_filter() {
        let query = |t: Option<&str>| ListQuery {
            product_type: t.map(String::from),
        };
        assert_eq!(query(None).filter(), CategoryFilter::All);
        assert_eq!(query(Some("")).filter(), CategoryFilter::All);
        assert_eq!(query(Some("all")).filter(), CategoryFilter::All);
        assert_eq!(
            query(Some("currency")).filter(),
            CategoryFilter::Only(ProductType::Currency)
        );
    }

    #[test]
    fn test_card_view_keeps_raw_values() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let card = ProductCardView::from(&catalog.products[0]);

        assert_eq!(card.id, "acc-1");
        assert_eq!(card.price, "۱۵۰٬۰۰۰ تومان");
        assert_eq!(card.raw_price, "150000");
        assert_eq!(card.image, "https://img.example/s.png");
    }

    #[test]
    fn test_list_view_states() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(ProductListView::from_products(&[]), ProductListView::Empty);
        assert!(matches!(
            ProductListView::from_products(&catalog.filter(&CategoryFilter::All)),
            ProductListView::Populated(cards) if cards.len() == 1
        ));
    }

    #[tokio::test]
    async fn test_index_renders_loading_placeholder() {
        let response = test_app().oneshot(get("/products?type=currency")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert!(body.contains(LOADING_MESSAGE));
        assert!(body.contains("/products/list?type=currency"));
    }

    #[tokio::test]
    async fn test_index_percent_encodes_category() {
        let body = body_text(
            test_app()
                .oneshot(get("/products?type=gift%26card%2B%231"))
                .await
                .unwrap(),
        )
        .await;

        assert!(body.contains("hx-get=\"/products/list?type=gift%26card%2B%231\""));
        assert!(!body.contains("type=gift&amp;card"));
    }

    #[tokio::test]
    async fn test_home_lists_everything() {
        let body = body_text(test_app().oneshot(get("/")).await.unwrap()).await;
        assert!(body.contains("/products/list?type=all"));
    }

    #[tokio::test]
    async fn test_list_fragment_populated() {
        let body = body_text(
            test_app()
                .oneshot(get("/products/list?type=digital-game"))
                .await
                .unwrap(),
        )
        .await;

        assert!(body.contains("game-eldenring"));
        assert!(!body.contains("acc-steam-01"));
        assert!(!body.contains(EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn test_unknown_category_renders_not_found() {
        let body = body_text(
            test_app()
                .oneshot(get("/products/list?type=gift-card"))
                .await
                .unwrap(),
        )
        .await;

        assert!(body.contains(EMPTY_MESSAGE));
        assert!(!body.contains("product-card"));
    }

    #[tokio::test]
    async fn test_catalog_failure_renders_error_state() {
        let config = crate::config::StorefrontConfig::from_lookup(|key| {
            (key == "STOREFRONT_CATALOG").then(|| "/nonexistent/products.json".to_string())
        })
        .unwrap();
        let response = crate::routes::app(AppState::new(config))
            .oneshot(get("/products/list"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(ERROR_MESSAGE));
    }
}
