//! Checkout form validation.
//!
//! Checkout does not take payment. The form is validated for shape only and,
//! when every field passes, the caller clears the cart and sends the visitor
//! home after [`REDIRECT_DELAY`].
//!
//! All four rules are always evaluated, in a fixed order, so the visitor sees
//! every problem at once:
//!
//! | Field | Rule |
//! |---|---|
//! | name | non-empty after trimming |
//! | email | `local@domain.tld` (see [`Email`]) |
//! | address | at least 10 characters after trimming |
//! | card number | exactly 16 ASCII digits |
//!
//! The card number is held as a [`SecretString`] and never leaves
//! [`CheckoutForm::validate`]; only its last four digits are kept.

use core::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::types::Email;

/// Delay between the success notice and the redirect.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Where the visitor is sent after a successful checkout.
pub const REDIRECT_PATH: &str = "/";

/// Notice shown when the order is accepted.
pub const SUCCESS_MESSAGE: &str = "سفارش شما با موفقیت ثبت شد!";

/// Minimum address length, in UTF-16 code units as a browser counts them.
pub const MIN_ADDRESS_LEN: usize = 10;

/// Required number of card digits.
pub const CARD_DIGITS: usize = 16;

/// A checkout form field, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutField {
    Name,
    Email,
    Address,
    CardNumber,
}

impl CheckoutField {
    /// All fields in validation order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Address, Self::CardNumber];

    /// The HTML form field name.
    #[must_use]
    pub const fn form_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Address => "address",
            Self::CardNumber => "card-number",
        }
    }

    /// The inline error shown under the field when it fails validation.
    #[must_use]
    pub const fn error_message(self) -> &'static str {
        match self {
            Self::Name => "نام و نام خانوادگی الزامی است.",
            Self::Email => "ایمیل معتبر نیست.",
            Self::Address => "آدرس باید حداقل ۱۰ کاراکتر باشد.",
            Self::CardNumber => "شماره کارت باید ۱۶ رقم باشد.",
        }
    }
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_name())
    }
}

/// A single failed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: CheckoutField,
    pub message: &'static str,
}

impl From<CheckoutField> for FieldError {
    fn from(field: CheckoutField) -> Self {
        Self {
            field,
            message: field.error_message(),
        }
    }
}

/// Every field that failed validation, in validation order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} checkout field(s) failed validation", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// The failed fields in validation order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// The error for a given field, if it failed.
    #[must_use]
    pub fn for_field(&self, field: CheckoutField) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    /// The failed fields in validation order.
    pub fn fields(&self) -> impl Iterator<Item = CheckoutField> + '_ {
        self.0.iter().map(|e| e.field)
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for errors returned by validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Submitted checkout form.
///
/// Field names match the HTML form (`card-number` for the card).
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(
        rename = "card-number",
        default = "empty_secret",
        deserialize_with = "secret_string"
    )]
    pub card_number: SecretString,
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn secret_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// A checkout that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    /// Trimmed customer name.
    pub name: String,
    pub email: Email,
    /// Trimmed shipping address.
    pub address: String,
    /// Last four card digits, for the confirmation only.
    pub card_last_four: String,
}

impl CheckoutForm {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each failed field, in the order
    /// name, email, address, card number.
    pub fn validate(&self) -> Result<ValidatedOrder, ValidationErrors> {
        let mut errors: Vec<FieldError> = Vec::new();

        let name = trim_browser(&self.name);
        if name.is_empty() {
            errors.push(CheckoutField::Name.into());
        }

        let email = Email::parse(&self.email);
        if email.is_err() {
            errors.push(CheckoutField::Email.into());
        }

        let address = trim_browser(&self.address);
        if address.encode_utf16().count() < MIN_ADDRESS_LEN {
            errors.push(CheckoutField::Address.into());
        }

        let card = self.card_number.expose_secret();
        if !is_card_number(card) {
            errors.push(CheckoutField::CardNumber.into());
        }

        match email {
            Ok(email) if errors.is_empty() => Ok(ValidatedOrder {
                name: name.to_owned(),
                email,
                address: address.to_owned(),
                card_last_four: card.chars().skip(CARD_DIGITS - 4).collect(),
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// Trim the characters a browser's `String.prototype.trim` strips.
///
/// That set is Unicode `White_Space` plus U+FEFF, minus U+0085.
fn trim_browser(s: &str) -> &str {
    s.trim_matches(|c: char| c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}'))
}

fn is_card_number(s: &str) -> bool {
    s.len() == CARD_DIGITS && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, address: &str, card: &str) -> CheckoutForm {
        CheckoutForm {
            name: name.to_string(),
            email: email.to_string(),
            address: address.to_string(),
            card_number: SecretString::from(card),
        }
    }

    fn valid() -> CheckoutForm {
        form("Ali Rezaei", "a@b.com", "1234567890 Tehran", "1234567890123456")
    }

    #[test]
    fn test_valid_form_passes() {
        let order = valid().validate().unwrap();
        assert_eq!(order.name, "Ali Rezaei");
        assert_eq!(order.email.as_str(), "a@b.com");
        assert_eq!(order.address, "1234567890 Tehran");
        assert_eq!(order.card_last_four, "3456");
    }

    #[test]
    fn test_short_card_reports_only_card_error() {
        let mut input = valid();
        input.card_number = SecretString::from("123");

        let errors = input.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), [CheckoutField::CardNumber]);
        assert_eq!(
            errors.for_field(CheckoutField::CardNumber).unwrap().message,
            "شماره کارت باید ۱۶ رقم باشد."
        );
    }

    #[test]
    fn test_all_errors_stack_in_order() {
        let errors = form("   ", "not-an-email", " short ", "abcd").validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), CheckoutField::ALL);
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_name_is_trimmed() {
        let mut input = valid();
        input.name = "  Sara  ".to_string();
        assert_eq!(input.validate().unwrap().name, "Sara");
    }

    #[test]
    fn test_address_length_counts_trimmed_characters() {
        let mut input = valid();
        input.address = "   123456789   ".to_string();
        assert_eq!(
            input.validate().unwrap_err().fields().collect::<Vec<_>>(),
            [CheckoutField::Address]
        );

        // Ten Persian letters are ten characters, not twenty bytes.
        input.address = "تهرانخیابان".to_string();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_address_length_counts_utf16_units() {
        let mut input = valid();
        input.address = "🏠🏠🏠🏠🏠".to_string();
        assert!(input.validate().is_ok());

        input.address = "🏠🏠🏠🏠".to_string();
        assert_eq!(
            input.validate().unwrap_err().fields().collect::<Vec<_>>(),
            [CheckoutField::Address]
        );
    }

    #[test]
    fn test_trim_matches_browser_whitespace() {
        let mut input = valid();
        input.name = "\u{FEFF}".to_string();
        assert_eq!(
            input.validate().unwrap_err().fields().collect::<Vec<_>>(),
            [CheckoutField::Name]
        );

        input.name = "\u{FEFF}\u{00A0}Sara\u{3000}".to_string();
        assert_eq!(input.validate().unwrap().name, "Sara");

        input.name = "\u{0085}".to_string();
        assert_eq!(input.validate().unwrap().name, "\u{0085}");
    }

    #[test]
    fn test_card_number_shape() {
        for card in [
            "123456789012345",
            "12345678901234567",
            "1234 5678 9012 3456",
            " 1234567890123456",
            "۱۲۳۴۵۶۷۸۹۰۱۲۳۴۵۶",
            "12345678901234ab",
        ] {
            let mut input = valid();
            input.card_number = SecretString::from(card);
            assert!(
                input.validate().is_err(),
                "{card:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_email_is_not_trimmed() {
        let mut input = valid();
        input.email = " a@b.com".to_string();
        assert_eq!(
            input.validate().unwrap_err().fields().collect::<Vec<_>>(),
            [CheckoutField::Email]
        );
    }

    #[test]
    fn test_deserializes_html_form_names() {
        let json = r#"{
            "name": "Ali Rezaei",
            "email": "a@b.com",
            "address": "1234567890 Tehran",
            "card-number": "1234567890123456"
        }"#;
        let input: CheckoutForm = serde_json::from_str(json).unwrap();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_card_number() {
        let debug = format!("{:?}", valid());
        assert!(!debug.contains("1234567890123456"));
    }
}
