//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::{prelude::ToPrimitive as _, Decimal};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Non-negative amount of money.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(Decimal);

impl Money {
    /// Zero amount of [`Money`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Money`] if the provided `amount` is not negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then_some(Self(amount))
    }

    /// Returns the amount of this [`Money`].
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Multiplies this [`Money`] by the provided `times`, returning [`None`]
    /// on overflow.
    #[must_use]
    pub fn checked_mul(self, times: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(times)).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.0.normalize();
        match amount.to_i128().filter(|_| amount.is_integer()) {
            Some(int) => write!(f, "{int}"),
            None => write!(f, "{amount}"),
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| "invalid amount")?;
        Self::new(amount).ok_or("negative amount")
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0.normalize(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount)
            .ok_or_else(|| de::Error::custom("money amount must not be negative"))
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Money;

    fn money(s: &str) -> Money {
        Money::new(s.parse::<Decimal>().unwrap()).unwrap()
    }

    #[test]
    fn rejects_negative() {
        assert!(Money::new(Decimal::NEGATIVE_ONE).is_none());
        assert_eq!(Money::new(Decimal::ZERO), Some(Money::ZERO));

        assert!(Money::from_str("-0.01").is_err());
        assert!(Money::from_str("abc").is_err());
        assert_eq!(Money::from_str(" 49.99 ").unwrap(), money("49.99"));
    }

    #[test]
    fn to_string() {
        assert_eq!(money("123.45").to_string(), "123.45");
        assert_eq!(money("123.00").to_string(), "123");
        assert_eq!(money("123.10").to_string(), "123.1");
        assert_eq!(Money::ZERO.to_string(), "0");
    }

    #[test]
    fn multiplies_by_days() {
        assert_eq!(money("50").checked_mul(3), Some(money("150")));
        assert_eq!(money("19.99").checked_mul(2), Some(money("39.98")));
        assert_eq!(money("50").checked_mul(0), Some(Money::ZERO));
    }

    #[test]
    fn overflows_without_panic() {
        let max = Money::new(Decimal::MAX).unwrap();

        assert_eq!(max.checked_mul(1), Some(max));
        assert_eq!(max.checked_mul(2), None);
    }

    #[test]
    fn json_number() {
        assert_eq!(serde_json::to_string(&money("150")).unwrap(), "150.0");
        assert_eq!(serde_json::to_string(&money("12.5")).unwrap(), "12.5");

        assert_eq!(serde_json::from_str::<Money>("150").unwrap(), money("150"));
        assert_eq!(
            serde_json::from_str::<Money>("99.5").unwrap(),
            money("99.5"),
        );
        assert!(serde_json::from_str::<Money>("-1").is_err());
    }
}
