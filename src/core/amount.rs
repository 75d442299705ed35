//! Fixed-point currency amounts.
//!
//! Payment amounts are stored as cents in a scaled `i64` so that arithmetic
//! and comparisons are exact. The wire format is a plain JSON number with up
//! to two decimal places (e.g. `9.99`).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed-point decimal with 2 decimal places, stored as a scaled integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 100;

    /// Build an amount from a float, rounding to the nearest cent.
    pub fn from_float(value: f64) -> Self {
        Amount((value * Self::SCALE as f64).round() as i64)
    }

    /// Build an amount from a raw cent count.
    pub fn from_cents(cents: i64) -> Self {
        Amount(cents)
    }

    pub fn as_cents(&self) -> i64 {
        self.0
    }

    pub fn as_float(&self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / Self::SCALE;
        let frac = abs % Self::SCALE;
        write!(f, "{sign}{whole}.{frac:02}")
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_float())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(Amount::from_float(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_float_converts_correctly() {
        assert_eq!(Amount::from_float(9.99), Amount::from_cents(999));
        assert_eq!(Amount::from_float(100.0), Amount::from_cents(10_000));
        assert_eq!(Amount::from_float(0.01), Amount::from_cents(1));
    }

    #[test]
    fn from_float_rounds_correctly() {
        assert_eq!(Amount::from_float(1.499), Amount::from_cents(150));
        assert_eq!(Amount::from_float(1.494), Amount::from_cents(149));
    }

    #[test]
    fn display_formats_cents() {
        assert_eq!(Amount::from_cents(999).to_string(), "9.99");
        assert_eq!(Amount::from_cents(10_000).to_string(), "100.00");
        assert_eq!(Amount::from_cents(5).to_string(), "0.05");
        assert_eq!(Amount::from_cents(-250).to_string(), "-2.50");
    }

    #[test]
    fn is_positive() {
        assert!(Amount::from_cents(1).is_positive());
        assert!(!Amount::from_cents(0).is_positive());
        assert!(!Amount::from_cents(-1).is_positive());
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_value(Amount::from_cents(999)).unwrap();
        assert_eq!(json, serde_json::json!(9.99));
    }

    #[test]
    fn deserializes_from_number() {
        let amount: Amount = serde_json::from_value(serde_json::json!(12.5)).unwrap();
        assert_eq!(amount, Amount::from_cents(1250));
    }

    #[test]
    fn roundtrip_preserves_value() {
        let amount = Amount::from_float(42.42);
        let json = serde_json::to_string(&amount).unwrap();
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
