//! Consultation fee amounts

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// A non-negative currency amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Fee(Decimal);

impl Fee {
    pub const ZERO: Fee = Fee(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Result<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(Error::Decode(format!("negative fee: {}", amount)));
        }
        Ok(Self(amount))
    }

    /// Fee from a whole currency amount
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Fee from a JSON number as sent by the backend
    pub fn from_f64(amount: f64) -> Result<Self> {
        let decimal = Decimal::try_from(amount)
            .map_err(|e| Error::Decode(format!("invalid fee {}: {}", amount, e)))?;
        Self::new(decimal.normalize())
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Value as a JSON number for the wire
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Fee {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Fee::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_fee_rejected() {
        assert!(Fee::from_f64(-10.0).is_err());
        assert!(Fee::new(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_fee_deserializes_and_rejects_negative() {
        let fee: Fee = serde_json::from_str("1500").unwrap();
        assert_eq!(fee, Fee::from_units(1500));
        assert!(serde_json::from_str::<Fee>("-5").is_err());
    }

    #[test]
    fn test_fee_from_wire_number() {
        let fee = Fee::from_f64(1500.0).unwrap();
        assert_eq!(fee, Fee::from_units(1500));
        assert_eq!(fee.to_string(), "1500");
        assert_eq!(fee.to_f64(), 1500.0);
    }

    #[test]
    fn test_fractional_fee_kept() {
        let fee = Fee::from_f64(99.5).unwrap();
        assert_eq!(fee.amount(), Decimal::new(995, 1));
    }
}
