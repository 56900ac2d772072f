use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Number of decimal places carried by every amount.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// A currency amount stored as a whole number of minor units (cents).
///
/// All arithmetic inside the engine happens on these integers, so the
/// order in which debts are summed can never change a result.
/// [`Decimal`] is only used at the edges: parsing input, rendering output
/// and serde.
///
/// # Examples
///
/// ```
/// use settle_engine::core::money::Money;
/// use rust_decimal_macros::dec;
///
/// let share = Money::from_decimal(dec!(33.333)).unwrap();
/// assert_eq!(share.minor_units(), 3333);
/// assert_eq!(share.to_string(), "33.33");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Money(i64);

/// Errors arising when converting external values into [`Money`].
#[derive(Debug, Error)]
pub enum MoneyError {
    #[error("invalid amount '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
    #[error("amount {0} does not fit in the supported range")]
    OutOfRange(Decimal),
}

impl Money {
    pub const ZERO: Money = Money(0);

    /// One minor unit (0.01).
    pub const CENT: Money = Money(1);

    /// Largest magnitude accepted from outside: 100,000,000,000.00.
    ///
    /// Summing fewer than 900,000 such amounts into one position stays
    /// inside `i64`, so aggregation cannot overflow on validated input.
    pub const MAX_ABS: Money = Money(10_000_000_000_000);

    pub const fn from_minor(units: i64) -> Self {
        Self(units)
    }

    /// Convert a decimal into minor units, rounding half away from zero.
    ///
    /// Fails for anything whose magnitude exceeds [`Money::MAX_ABS`].
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        let rounded =
            value.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|units| units.to_i64())
            .map(Self)
            .filter(|money| money.is_within_limit())
            .ok_or(MoneyError::OutOfRange(value))
    }

    /// Whether the magnitude is at most [`Money::MAX_ABS`].
    pub fn is_within_limit(self) -> bool {
        self.0.unsigned_abs() <= Self::MAX_ABS.0.unsigned_abs()
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MINOR_UNIT_SCALE)
    }

    pub fn minor_units(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_decimal(), f)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|source| MoneyError::Parse {
            input: s.to_string(),
            source,
        })?;
        Self::from_decimal(value)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.to_decimal()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.to_decimal(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::from_decimal(value).map_err(serde::de::Error::custom)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
