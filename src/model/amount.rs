//! Amount type for monetary values stored as an integer count of minor units (cents).
//!
//! Storing cents keeps sums exact. Conversion from a decimal amount rounds half away from zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Minor units in one unit of the display currency.
pub const MINOR_PER_MAJOR: i64 = 100;

/// Represents an amount of money in minor units.
///
/// # Examples
///
/// ```
/// # use daybook::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1,234.5").unwrap();
/// assert_eq!(amount.minor(), 123450);
/// assert_eq!(amount.to_string(), "1,234.50");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates an `Amount` from a count of minor units.
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Converts a decimal amount to minor units, rounding half away from zero. Returns `None` if
    /// the result does not fit.
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let minor = value
            .checked_mul(Decimal::from(MINOR_PER_MAJOR))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        minor.to_i64().map(Self)
    }

    /// The count of minor units.
    pub fn minor(&self) -> i64 {
        self.0
    }

    /// The amount in major units as an exact decimal.
    pub fn value(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// The magnitude of the amount.
    pub fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(String);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid amount: {}", self.0)
    }
}

impl Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Remove commas (thousand separators)
        let without_commas = trimmed.replace(',', "");
        let value = Decimal::from_str(&without_commas)
            .map_err(|e| AmountError(format!("'{trimmed}': {e}")))?;
        Amount::from_decimal(value).ok_or_else(|| AmountError(format!("'{trimmed}' is too large")))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / MINOR_PER_MAJOR as u64;
        let minor = abs % MINOR_PER_MAJOR as u64;
        write!(f, "{sign}{}.{minor:02}", group_thousands(&major.to_string()))
    }
}

/// Inserts a `,` between every group of three digits, counting from the right. Input that is not
/// all ASCII digits is returned as is.
pub(crate) fn group_thousands(digits: &str) -> String {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return digits.to_string();
    }
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (ix, c) in digits.chars().enumerate() {
        if ix > 0 && (digits.len() - ix) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
