//! Checkout dry run.

use bazaar_core::CheckoutForm;
use secrecy::SecretString;

/// Validate checkout details and report every failing field.
///
/// # Errors
///
/// Returns an error if any field is invalid.
pub fn validate(
    name: String,
    email: String,
    address: String,
    card_number: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let form = CheckoutForm {
        name,
        email,
        address,
        card_number: SecretString::from(card_number),
    };

    match form.validate() {
        Ok(order) => {
            tracing::info!(
                name = %order.name,
                email = %order.email,
                card = %format!("**** {}", order.card_last_four),
                "Checkout details are valid"
            );
            Ok(())
        }
        Err(errors) => {
            for error in errors.errors() {
                tracing::error!(field = %error.field, "{}", error.message);
            }
            Err(errors.into())
        }
    }
}
