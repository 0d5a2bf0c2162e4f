//! Amount type for handling rupiah values with optional `Rp` prefixes and dot grouping.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may or may not include the currency symbol and thousands separators, as typed into a form or
//! copied from a rendered table.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

const SYMBOL: &str = "Rp";

/// Represents a whole-rupiah amount.
///
/// Amounts are integers in the range of an `i64`; rupiah are not subdivided on any document this
/// program handles.
///
/// # Examples
///
/// Parsing with the symbol and grouping:
/// ```
/// # use niaga::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("Rp 2.500.000").unwrap();
/// assert_eq!(amount.to_string(), "Rp 2.500.000");
/// assert_eq!(amount.plain(), "2500000");
/// ```
///
/// Parsing a bare number:
/// ```
/// # use niaga::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("3200000").unwrap();
/// assert_eq!(amount.to_string(), "Rp 3.200.000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount {
        value: Decimal::ZERO,
    };

    pub fn new(value: i64) -> Self {
        Self {
            value: Decimal::from(value),
        }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.is_zero()
    }

    /// The whole-rupiah value. Every `Amount` fits in an `i64`.
    pub fn units(&self) -> i64 {
        self.value.to_i64().unwrap_or_default()
    }

    /// The digits without symbol or grouping, e.g. `2500000`. This is what a form field holds.
    pub fn plain(&self) -> String {
        self.value.normalize().to_string()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountError(String);

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a whole rupiah amount", self.0)
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AmountError(s.to_string());
        let trimmed = s.trim();

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let digits = unsigned
            .strip_prefix(SYMBOL)
            .or_else(|| unsigned.strip_prefix("RP"))
            .or_else(|| unsigned.strip_prefix("rp"))
            .unwrap_or(unsigned)
            .trim_start();

        // Dots are thousands separators, so every group after the first must be three digits.
        let mut groups = digits.split('.');
        let first = groups.next().unwrap_or_default();
        if first.is_empty() || first.len() > 3 && digits.contains('.') {
            return Err(err());
        }
        let mut joined = first.to_string();
        for group in groups {
            if group.len() != 3 {
                return Err(err());
            }
            joined.push_str(group);
        }
        if !joined.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let value: i64 = joined.parse().map_err(|_| err())?;
        Ok(Amount::new(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let digits = self.units().unsigned_abs().to_string();
        write!(f, "{sign}{SYMBOL} {}", group_thousands(&digits))
    }
}

/// Puts a dot before every third digit counted from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.units())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(Amount::new(n)),
            Raw::Text(s) => Amount::from_str(&s).map_err(serde::de::Error::custom),
        }
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl std::ops::Add for Amount {
    type Output = Amount;

    /// Saturates at the `i64` bounds.
    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.units().saturating_add(rhs.units()))
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |a, b| a + b)
    }
}
