//! Integer-cent money type.
//!
//! Every monetary value in the service is carried as a whole number of
//! centavos. Rates and multipliers stay as [`Decimal`] and each
//! multiplication is rounded back to cents immediately, so repeated
//! additions never accumulate fractional drift.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in cents.
///
/// Serializes as both the raw cent count and a two-decimal string:
///
/// ```
/// use innkeeper::models::Cents;
///
/// let pay = Cents::new(650000);
/// let json = serde_json::to_value(pay).unwrap();
/// assert_eq!(json["cents"], 650000);
/// assert_eq!(json["amount"], "6500.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "MoneyRepr", from = "MoneyRepr")]
pub struct Cents(i64);

#[derive(Serialize, Deserialize)]
struct MoneyRepr {
    cents: i64,
    #[serde(default)]
    amount: String,
}

impl From<Cents> for MoneyRepr {
    fn from(value: Cents) -> Self {
        Self {
            cents: value.0,
            amount: value.amount_string(),
        }
    }
}

impl From<MoneyRepr> for Cents {
    fn from(value: MoneyRepr) -> Self {
        Cents(value.cents)
    }
}

impl Cents {
    /// Zero cents.
    pub const ZERO: Cents = Cents(0);

    /// Wraps a raw cent count.
    pub const fn new(cents: i64) -> Self {
        Cents(cents)
    }

    /// Returns the raw cent count.
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Converts a peso amount to cents, rounding half away from zero.
    ///
    /// Returns `None` when the amount does not fit in `i64` cents.
    ///
    /// ```
    /// use innkeeper::models::Cents;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// assert_eq!(Cents::from_decimal(Decimal::from_str("64.375").unwrap()), Some(Cents::new(6438)));
    /// assert_eq!(Cents::from_decimal(Decimal::MAX), None);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        round_cents(amount.checked_mul(Decimal::ONE_HUNDRED)?)
    }

    /// Returns the amount in pesos with two decimal places.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Multiplies by a factor and rounds straight back to whole cents.
    ///
    /// Returns `None` when the product overflows.
    pub fn mul_rounded(self, factor: Decimal) -> Option<Self> {
        round_cents(Decimal::from(self.0).checked_mul(factor)?)
    }

    /// Two-decimal string form, e.g. `"6500.00"`.
    pub fn amount_string(self) -> String {
        self.to_decimal().to_string()
    }

    /// Returns true when the amount is exactly zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

fn round_cents(value: Decimal) -> Option<Cents> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .map(Cents)
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount_string())
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Cents {
    type Output = Cents;

    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Cents {
    type Output = Cents;

    fn neg(self) -> Cents {
        Cents(self.0.saturating_neg())
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, |acc, c| acc + c)
    }
}
