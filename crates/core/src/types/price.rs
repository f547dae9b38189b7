//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are whole Toman amounts in practice, but the catalog format allows
//! any JSON number, so amounts are kept as [`Decimal`] to avoid float drift
//! when line totals are summed.
//!
//! Display follows the `fa-IR` number format used throughout the shop:
//! Persian digits, `٬` as the thousands separator, `٫` as the decimal
//! separator and at most three fraction digits.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency label appended to every displayed price.
pub const TOMAN_SUFFIX: &str = "تومان";

/// `fa-IR` thousands separator (ARABIC THOUSANDS SEPARATOR).
const GROUP_SEPARATOR: char = '\u{066C}';

/// `fa-IR` decimal separator (ARABIC DECIMAL SEPARATOR).
const DECIMAL_SEPARATOR: char = '\u{066B}';

/// Maximum fraction digits shown by the locale formatter.
const MAX_FRACTION_DIGITS: u32 = 3;

/// A price in Toman.
///
/// Serialized as a plain JSON number so the stored cart and the catalog file
/// keep the same shape.
///
/// # Example
///
/// ```rust
/// # use bazaar_core::Price;
/// # use rust_decimal::Decimal;
/// let price = Price::new(Decimal::from(150_000));
/// assert_eq!(price.display(), "۱۵۰٬۰۰۰ تومان");
/// assert_eq!(price.raw(), "150000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest unit price a cart line accepts: 10^15 Toman.
    ///
    /// Keeps `MAX_UNIT * u32::MAX` summed over thousands of lines well inside
    /// the [`Decimal`] range.
    pub const MAX_UNIT: Self = Self(Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0));

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if this is an acceptable unit price for a cart line.
    #[must_use]
    pub fn is_valid_unit(&self) -> bool {
        !self.0.is_sign_negative() && *self <= Self::MAX_UNIT
    }

    /// Price of `quantity` units, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }

    /// Unformatted amount as plain ASCII (e.g. `"150000"`), used in form values.
    #[must_use]
    pub fn raw(&self) -> String {
        self.0.normalize().to_string()
    }

    /// Locale-formatted amount without the currency label (e.g. `"۱۵۰٬۰۰۰"`).
    #[must_use]
    pub fn localized(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let text = rounded.abs().to_string();
        let (integer, fraction) = text
            .split_once('.')
            .map_or((text.as_str(), None), |(i, f)| (i, Some(f)));

        let mut out = String::with_capacity(text.len() * 2);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }

        let len = integer.chars().count();
        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(GROUP_SEPARATOR);
            }
            out.push(c);
        }

        if let Some(fraction) = fraction {
            out.push(DECIMAL_SEPARATOR);
            out.push_str(fraction);
        }

        to_persian_digits(&out)
    }

    /// Format for display with the currency label (e.g. `"۱۵۰٬۰۰۰ تومان"`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {TOMAN_SUFFIX}", self.localized())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<u32> for Price {
    fn from(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturates at [`Decimal::MAX`] instead of overflowing.
    fn add(self, rhs: Self) -> Self {
        Self(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Replace ASCII digits with Persian (Extended Arabic-Indic) digits.
///
/// Non-digit characters are left untouched.
#[must_use]
pub fn to_persian_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => char::from_u32(0x06F0 + d).unwrap_or(c),
            _ => c,
        })
        .collect()
}
