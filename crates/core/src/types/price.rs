//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are rendered the way a French storefront shows them: two
//! decimals, a comma as decimal separator, narrow no-break spaces between
//! thousands groups and a no-break space before the currency symbol
//! (`1 234,50 €`).

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// No-break space placed between the amount and the currency symbol.
const SYMBOL_SEPARATOR: char = '\u{a0}';

/// Narrow no-break space used between thousands groups.
const GROUP_SEPARATOR: char = '\u{202f}';

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., euros, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in euros, the truck's only currency.
    #[must_use]
    pub const fn eur(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::EUR)
    }

    /// A zero euro price.
    #[must_use]
    pub const fn zero() -> Self {
        Self::eur(Decimal::ZERO)
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Format for display (e.g., `12,50 €`).
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{SYMBOL_SEPARATOR}{}",
            format_amount(self.amount, true),
            self.currency_code.symbol()
        )
    }

    /// Short form without grouping or spacing (e.g., `12,50€`).
    ///
    /// Used on compact cards like the featured burger.
    #[must_use]
    pub fn compact(&self) -> String {
        format!(
            "{}{}",
            format_amount(self.amount, false),
            self.currency_code.symbol()
        )
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

/// ISO 4217 currency codes accepted by the truck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EUR,
}

impl CurrencyCode {
    /// Currency symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::EUR => "€",
        }
    }
}

/// Render an amount with two decimals and a comma separator.
///
/// Rounds half away from zero, like `Intl.NumberFormat` does.
fn format_amount(amount: Decimal, group_thousands: bool) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let int_display = if group_thousands {
        group_digits(int_part)
    } else {
        int_part.to_string()
    };

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}{int_display},{frac_part}")
}

/// Insert a group separator every three digits from the right.
pub(crate) fn group_digits(digits: &str) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3 * 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use core::str::FromStr;

    fn eur(s: &str) -> Price {
        Price::eur(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_only_euro_is_accepted() {
        let code: CurrencyCode = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(code, CurrencyCode::default());
        assert!(serde_json::from_str::<CurrencyCode>("\"USD\"").is_err());
    }

    #[test]
    fn test_display_two_decimals_with_comma() {
        assert_eq!(eur("12.5").display(), "12,50\u{a0}€");
        assert_eq!(eur("0").display(), "0,00\u{a0}€");
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(eur("1234.5").display(), "1\u{202f}234,50\u{a0}€");
        assert_eq!(eur("1234567").display(), "1\u{202f}234\u{202f}567,00\u{a0}€");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(eur("2.005").display(), "2,01\u{a0}€");
        assert_eq!(eur("-2.005").display(), "-2,01\u{a0}€");
    }

    #[test]
    fn test_compact() {
        assert_eq!(eur("9.9").compact(), "9,90€");
        assert_eq!(eur("1500").compact(), "1500,00€");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [eur("8.5").times(2), eur("3").times(3)].into_iter().sum();
        assert_eq!(total, eur("26"));
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("1"), "1");
        assert_eq!(group_digits("123"), "123");
        assert_eq!(group_digits("1234"), "1\u{202f}234");
    }
}
