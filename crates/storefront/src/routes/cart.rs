//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the visitor's session under [`CART_KEY`]; each
//! handler loads it, applies one [`CartStore`] operation and commits the
//! result before rendering. Every mutation re-renders the whole cart
//! fragment and fires `cart-updated` so the navbar counter refreshes.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Response},
};
use bazaar_core::{
    CART_KEY, Cart, CartError, CartStore, NewCartItem, Price, ProductId, Quantity,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{Notice, cart_updated_trigger};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::storage::SessionStorage;

/// Shown instead of the cart table when the cart has no items.
pub const EMPTY_CART_MESSAGE: &str = "سبد خرید شما خالی است.";

/// Shown when the quantity field is not a whole number.
pub const INVALID_QUANTITY_MESSAGE: &str = "تعداد وارد شده معتبر نیست.";

/// Cart row display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRowView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// What the cart page shows: the empty state, or rows plus the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartView {
    Empty,
    Items {
        rows: Vec<CartRowView>,
        total: String,
        item_count: u64,
    },
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        if cart.is_empty() {
            return Self::Empty;
        }

        Self::Items {
            rows: cart
                .items()
                .iter()
                .map(|item| CartRowView {
                    id: item.id.to_string(),
                    name: item.name.clone(),
                    image: item.image.clone(),
                    unit_price: item.price.display(),
                    quantity: item.quantity,
                    line_total: item.line_total().display(),
                })
                .collect(),
            total: cart.total().display(),
            item_count: cart.item_count(),
        }
    }
}

impl CartView {
    /// Message for the empty state.
    #[must_use]
    pub const fn empty_message(&self) -> &'static str {
        EMPTY_CART_MESSAGE
    }

    /// Returns `true` for the empty state.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Rows to render; none for the empty state.
    #[must_use]
    pub fn rows(&self) -> &[CartRowView] {
        match self {
            Self::Empty => &[],
            Self::Items { rows, .. } => rows,
        }
    }

    /// Formatted grand total; empty for the empty state.
    #[must_use]
    pub fn total(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Items { total, .. } => total,
        }
    }

    /// Sum of quantities.
    #[must_use]
    pub const fn item_count(&self) -> u64 {
        match self {
            Self::Empty => 0,
            Self::Items { item_count, .. } => *item_count,
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the cart for display.
///
/// A corrupted stored value reads as empty; it is logged so the reset is
/// visible, and the next mutation overwrites it.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart> {
    let storage = SessionStorage::load(session, &[CART_KEY]).await?;
    match CartStore::new(storage).try_get_cart() {
        Err(CartError::Corrupted(e)) => {
            tracing::warn!(error = %e, "Stored cart is corrupted, treating as empty");
            Ok(Cart::default())
        }
        other => Ok(other?),
    }
}

/// Apply one cart operation against the session and commit it.
pub(crate) async fn with_cart<T>(
    session: &Session,
    op: impl FnOnce(&mut CartStore<&mut SessionStorage>) -> std::result::Result<T, CartError>,
) -> Result<T> {
    let mut storage = SessionStorage::load(session, &[CART_KEY]).await?;
    let value = op(&mut CartStore::new(&mut storage))?;
    storage.commit().await?;
    Ok(value)
}

// =============================================================================
// Forms & Templates
// =============================================================================

/// Add to cart form data, as embedded in each product card.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
}

impl AddToCartForm {
    fn into_item(self) -> Result<NewCartItem> {
        if self.id.trim().is_empty() {
            return Err(AppError::BadRequest("missing product id".to_string()));
        }
        let price = Decimal::from_str(self.price.trim())
            .map_err(|_| AppError::BadRequest(format!("invalid price {:?}", self.price)))?;
        let price = Price::new(price);
        if !price.is_valid_unit() {
            return Err(AppError::BadRequest(format!("invalid price {:?}", self.price)));
        }

        Ok(NewCartItem {
            id: ProductId::new(self.id),
            name: self.name,
            price,
            image: self.image,
        })
    }
}

/// Update cart form data. The quantity stays a string until validated.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub notice: Option<Notice>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub notice: Option<Notice>,
}

impl CartItemsTemplate {
    fn new(cart: &Cart) -> Self {
        Self {
            cart: CartView::from(cart),
            notice: None,
        }
    }
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Notice fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/notice.html")]
pub struct NoticeTemplate {
    pub notice: Notice,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<CartShowTemplate> {
    let cart = load_cart(&session).await?;

    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
        notice: None,
    })
}

/// Add item to cart (HTMX).
///
/// Returns a confirmation notice and triggers `cart-updated`.
#[instrument(skip(session, form), fields(product_id = %form.id))]
pub async fn add(session: Session, Form(form): Form<AddToCartForm>) -> Result<Response> {
    let item = form.into_item()?;
    let name = item.name.clone();
    let id = item.id.clone();

    let cart = with_cart(&session, |store| store.add_to_cart(item)).await?;

    tracing::info!(items = cart.item_count(), "Added to cart");
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));

    Ok((
        cart_updated_trigger(),
        NoticeTemplate {
            notice: Notice::success(format!("'{name}' به سبد خرید اضافه شد.")),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
///
/// A quantity of zero or less removes the item. Input that is not a whole
/// number leaves the cart untouched and re-renders it with an error notice.
#[instrument(skip(session, form), fields(product_id = %form.id))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let quantity = match Quantity::parse(&form.quantity) {
        Ok(quantity) => quantity,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected quantity");
            let cart = load_cart(&session).await?;
            return Ok(CartItemsTemplate {
                cart: CartView::from(&cart),
                notice: Some(Notice::error(INVALID_QUANTITY_MESSAGE)),
            }
            .into_response());
        }
    };

    let id = ProductId::new(form.id);
    let result = with_cart(&session, |store| store.update_quantity(&id, quantity)).await;

    match result {
        Ok(cart) => Ok((cart_updated_trigger(), CartItemsTemplate::new(&cart)).into_response()),
        Err(AppError::Cart(CartError::InvalidQuantity(_))) => {
            let cart = load_cart(&session).await?;
            Ok(CartItemsTemplate {
                cart: CartView::from(&cart),
                notice: Some(Notice::error(INVALID_QUANTITY_MESSAGE)),
            }
            .into_response())
        }
        Err(e) => Err(e),
    }
}

/// Remove item from cart (HTMX).
#[instrument(skip(session, form), fields(product_id = %form.id))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let id = ProductId::new(form.id);
    let cart = with_cart(&session, |store| store.remove_from_cart(&id)).await?;

    Ok((cart_updated_trigger(), CartItemsTemplate::new(&cart)).into_response())
}

/// Remove every item from the cart (HTMX).
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Response> {
    with_cart(&session, |store| store.clear_cart()).await?;
    add_breadcrumb("cart", "Cleared cart", None);

    Ok((cart_updated_trigger(), CartItemsTemplate::new(&Cart::default())).into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<CartCountTemplate> {
    let cart = load_cart(&session).await?;

    Ok(CartCountTemplate {
        count: cart.item_count(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use bazaar_core::CartItem;
    use tower::ServiceExt;

    use super::*;
    use crate::routes::tests::{body_text, get, post_form, test_app};

    fn item(id: &str, price: u32, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            price: Price::from(price),
            image: format!("https://img.example/{id}.png"),
            quantity,
        }
    }

    #[test]
    fn test_empty_cart_view() {
        assert_eq!(CartView::from(&Cart::default()), CartView::Empty);
    }

    #[test]
    fn test_cart_view_totals() {
        let cart: Cart = [item("a", 1000, 2), item("b", 500, 3)].into_iter().collect();

        let CartView::Items {
            rows,
            total,
            item_count,
        } = CartView::from(&cart)
        else {
            panic!("expected items");
        };

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].unit_price, "۱٬۰۰۰ تومان");
        assert_eq!(rows[0].line_total, "۲٬۰۰۰ تومان");
        assert_eq!(rows[1].line_total, "۱٬۵۰۰ تومان");
        assert_eq!(total, "۳٬۵۰۰ تومان");
        assert_eq!(item_count, 5);
    }

    #[test]
    fn test_add_form_rejects_bad_price() {
        let form = AddToCartForm {
            id: "a".to_string(),
            name: "A".to_string(),
            price: "cheap".to_string(),
            image: String::new(),
        };
        assert!(matches!(form.into_item(), Err(AppError::BadRequest(_))));

        let form = AddToCartForm {
            id: "a".to_string(),
            name: "A".to_string(),
            price: "-5".to_string(),
            image: String::new(),
        };
        assert!(matches!(form.into_item(), Err(AppError::BadRequest(_))));

        let form = AddToCartForm {
            id: "a".to_string(),
            name: "A".to_string(),
            price: "50000000000000000000000000000".to_string(),
            image: String::new(),
        };
        assert!(matches!(form.into_item(), Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_add_returns_notice_and_trigger() {
        let response = test_app()
            .oneshot(post_form(
                "/cart/add",
                "id=acc-steam-01&name=Steam&price=150000&image=https%3A%2F%2Fimg.example%2Fs.png",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["HX-Trigger"], "cart-updated");
        assert!(response.headers().contains_key("set-cookie"));
        let body = body_text(response).await;
        assert!(body.contains("Steam"));
        assert!(body.contains("به سبد خرید اضافه شد."));
    }

    #[tokio::test]
    async fn test_add_with_bad_price_is_400() {
        let response = test_app()
            .oneshot(post_form("/cart/add", "id=a&name=A&price=abc&image="))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_new_visitor_sees_empty_cart() {
        let body = body_text(test_app().oneshot(get("/cart")).await.unwrap()).await;
        assert!(body.contains(EMPTY_CART_MESSAGE));
    }

    #[tokio::test]
    async fn test_invalid_quantity_keeps_cart() {
        let response = test_app()
            .oneshot(post_form("/cart/update", "id=a&quantity=abc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("HX-Trigger").is_none());
        assert!(body_text(response).await.contains(INVALID_QUANTITY_MESSAGE));
    }

    #[tokio::test]
    async fn test_count_for_new_visitor() {
        let body = body_text(test_app().oneshot(get("/cart/count")).await.unwrap()).await;
        assert!(body.contains("id=\"cart-item-count\""));
        assert!(body.contains('۰'));
    }
}
