//! Checkout route handlers.
//!
//! Checkout is simulated: the form is validated, and on success the cart is
//! cleared and the visitor is sent home after a short delay. The card number
//! is never echoed back, logged or stored.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Response},
};
use bazaar_core::{
    CheckoutField, CheckoutForm, ValidationErrors,
    checkout::{REDIRECT_DELAY, REDIRECT_PATH, SUCCESS_MESSAGE},
};
use tower_sessions::Session;
use tracing::instrument;

use super::cart::{CartView, load_cart, with_cart};
use super::cart_updated_trigger;
use crate::error::{Result, add_breadcrumb};
use crate::filters;

/// Inline error messages, one slot per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrorsView {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub address: Option<&'static str>,
    pub card_number: Option<&'static str>,
}

impl From<&ValidationErrors> for FieldErrorsView {
    fn from(errors: &ValidationErrors) -> Self {
        let message = |field| errors.for_field(field).map(|e| e.message);
        Self {
            name: message(CheckoutField::Name),
            email: message(CheckoutField::Email),
            address: message(CheckoutField::Address),
            card_number: message(CheckoutField::CardNumber),
        }
    }
}

/// Checkout form display data.
///
/// Holds the values to re-fill after a failed submission. There is no card
/// number field here on purpose: it is always rendered blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutFormView {
    pub name: String,
    pub email: String,
    pub address: String,
    pub errors: FieldErrorsView,
}

impl CheckoutFormView {
    fn rejected(form: &CheckoutForm, errors: &ValidationErrors) -> Self {
        Self {
            name: form.name.clone(),
            email: form.email.clone(),
            address: form.address.clone(),
            errors: FieldErrorsView::from(errors),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub cart: CartView,
    pub form: CheckoutFormView,
}

/// Checkout form fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_form.html")]
pub struct CheckoutFormTemplate {
    pub form: CheckoutFormView,
}

/// Checkout success fragment template (for HTMX).
///
/// `static/js/app.js` performs the delayed navigation from the
/// `data-redirect-*` attributes.
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_success.html")]
pub struct CheckoutSuccessTemplate {
    pub message: &'static str,
    pub redirect_to: &'static str,
    pub redirect_after_ms: u128,
}

impl Default for CheckoutSuccessTemplate {
    fn default() -> Self {
        Self {
            message: SUCCESS_MESSAGE,
            redirect_to: REDIRECT_PATH,
            redirect_after_ms: REDIRECT_DELAY.as_millis(),
        }
    }
}

/// Display checkout page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<CheckoutShowTemplate> {
    let cart = load_cart(&session).await?;

    Ok(CheckoutShowTemplate {
        cart: CartView::from(&cart),
        form: CheckoutFormView::default(),
    })
}

/// Validate a checkout submission (HTMX).
///
/// On failure the form is re-rendered with every error placed after its
/// field. On success the cart is cleared and the success fragment schedules
/// the redirect home.
#[instrument(skip(session, form))]
pub async fn submit(session: Session, Form(form): Form<CheckoutForm>) -> Result<Response> {
    match form.validate() {
        Ok(order) => {
            with_cart(&session, |store| store.clear_cart()).await?;

            tracing::info!(
                email_domain = order.email.domain(),
                card_last_four = %order.card_last_four,
                "Checkout accepted"
            );
            add_breadcrumb("checkout", "Order placed", None);

            Ok((cart_updated_trigger(), CheckoutSuccessTemplate::default()).into_response())
        }
        Err(errors) => {
            tracing::debug!(
                fields = ?errors.fields().map(CheckoutField::form_name).collect::<Vec<_>>(),
                "Checkout rejected"
            );

            Ok(CheckoutFormTemplate {
                form: CheckoutFormView::rejected(&form, &errors),
            }
            .into_response())
        }
    }
}
