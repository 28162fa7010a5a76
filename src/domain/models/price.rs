use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound accepted from clients: 1,000,000.00.
const MAX_MINOR_UNITS: i64 = 100_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("price must not be negative")]
    Negative,
    #[error("price must have at most two decimal places")]
    TooPrecise,
    #[error("price is too large")]
    TooLarge,
    #[error("invalid price: {0:?}")]
    Invalid(String),
}

/// A per-player cost held in minor currency units (pence).
///
/// Serialized as a JSON number with two decimal places of precision, e.g.
/// `4.5` for 450 pence. Accepts either a JSON number or a decimal string when
/// deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct Price(i64);

impl Price {
    pub const fn from_minor_units(minor: i64) -> Self {
        Self(minor)
    }

    pub fn minor_units(self) -> i64 {
        self.0
    }

    pub fn try_from_minor_units(minor: i64) -> Result<Self, PriceError> {
        if minor < 0 {
            return Err(PriceError::Negative);
        }
        if minor > MAX_MINOR_UNITS {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(minor))
    }

    /// Converts a floating point amount, rounding to the nearest minor unit.
    pub fn from_decimal(amount: f64) -> Result<Self, PriceError> {
        if !amount.is_finite() {
            return Err(PriceError::Invalid(amount.to_string()));
        }
        if amount < 0.0 {
            return Err(PriceError::Negative);
        }
        let minor = (amount * 100.0).round();
        if minor > MAX_MINOR_UNITS as f64 {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(minor as i64))
    }

    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || PriceError::Invalid(s.to_string());

        if raw.starts_with('-') {
            return Err(PriceError::Negative);
        }

        let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(PriceError::TooPrecise);
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| PriceError::TooLarge)? };
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let minor = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(fraction))
            .ok_or(PriceError::TooLarge)?;
        Self::try_from_minor_units(minor)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Price::from_decimal(n),
            Raw::Text(s) => s.parse(),
        }
        .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_strings_exactly() {
        assert_eq!("4".parse::<Price>().unwrap().minor_units(), 400);
        assert_eq!("4.5".parse::<Price>().unwrap().minor_units(), 450);
        assert_eq!(" 12.05 ".parse::<Price>().unwrap().minor_units(), 1205);
        assert_eq!(".75".parse::<Price>().unwrap().minor_units(), 75);
    }

    #[test]
    fn rejects_bad_strings() {
        assert_eq!("-1".parse::<Price>(), Err(PriceError::Negative));
        assert_eq!("1.234".parse::<Price>(), Err(PriceError::TooPrecise));
        assert!(matches!("abc".parse::<Price>(), Err(PriceError::Invalid(_))));
        assert!(matches!(".".parse::<Price>(), Err(PriceError::Invalid(_))));
        assert_eq!("99999999999999999999".parse::<Price>(), Err(PriceError::TooLarge));
    }

    #[test]
    fn float_amounts_round_to_pence() {
        assert_eq!(Price::from_decimal(4.0).unwrap().minor_units(), 400);
        assert_eq!(Price::from_decimal(0.1 + 0.2).unwrap().minor_units(), 30);
        assert_eq!(Price::from_decimal(-0.01), Err(PriceError::Negative));
        assert!(Price::from_decimal(f64::NAN).is_err());
    }

    #[test]
    fn displays_two_decimal_places() {
        assert_eq!(Price::from_minor_units(400).to_string(), "4.00");
        assert_eq!(Price::from_minor_units(1205).to_string(), "12.05");
        assert_eq!(Price::from_minor_units(7).to_string(), "0.07");
    }

    #[test]
    fn json_accepts_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("3.5").unwrap();
        let from_int: Price = serde_json::from_str("6").unwrap();
        let from_text: Price = serde_json::from_str("\"2.25\"").unwrap();
        assert_eq!(from_number.minor_units(), 350);
        assert_eq!(from_int.minor_units(), 600);
        assert_eq!(from_text.minor_units(), 225);
        assert!(serde_json::from_str::<Price>("-3").is_err());

        assert_eq!(serde_json::to_string(&Price::from_minor_units(450)).unwrap(), "4.5");
    }
}
