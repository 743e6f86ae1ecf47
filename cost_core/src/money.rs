//! # Money Types
//!
//! Currency handling and rounding for cost estimates. Iraq quotes building
//! work in dinar (IQD, no circulating subunit) with dollar pricing common
//! for imported material, so the engine supports both.
//!
//! Monetary rounding is round-half-up at the currency's precision and is
//! applied once, to the total - see [`crate::aggregate`].

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Supported estimate currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Iraqi dinar
    #[serde(rename = "IQD")]
    Iqd,
    /// US dollar
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    /// All currencies for UI selection
    pub const ALL: [Currency; 2] = [Currency::Iqd, Currency::Usd];

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Iqd => "IQD",
            Currency::Usd => "USD",
        }
    }

    /// Rounding precision in decimal places.
    ///
    /// IQD has no circulating subunit; USD rounds to cents.
    pub fn decimals(&self) -> u32 {
        match self {
            Currency::Iqd => 0,
            Currency::Usd => 2,
        }
    }

    /// Round an amount to this currency's precision, half up.
    pub fn round(&self, amount: f64) -> f64 {
        let factor = 10f64.powi(self.decimals() as i32);
        (amount * factor).round() / factor
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "IQD" | "DINAR" => Ok(Currency::Iqd),
            "USD" | "DOLLAR" | "$" => Ok(Currency::Usd),
            _ => Err(EstimateError::unknown_material_type("currency", s)),
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Iqd
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One itemized monetary component of an estimate.
///
/// Amounts are carried at full precision; only the aggregated total is
/// rounded (see [`crate::aggregate::aggregate`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    /// Line label (e.g. "bricks", "labor", "mortar")
    pub label: String,

    /// Amount in the estimate currency, unrounded
    pub amount: f64,
}

impl CostLine {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        CostLine {
            label: label.into(),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_codes() {
        assert_eq!(Currency::Iqd.code(), "IQD");
        assert_eq!(Currency::Usd.code(), "USD");
        assert_eq!(Currency::default(), Currency::Iqd);
    }

    #[test]
    fn test_rounding_precision() {
        // IQD has no subunit
        assert_eq!(Currency::Iqd.round(1250.4), 1250.0);
        assert_eq!(Currency::Iqd.round(1250.5), 1251.0);

        // USD rounds to cents, half up
        assert_eq!(Currency::Usd.round(10.124), 10.12);
        assert_eq!(Currency::Usd.round(10.125), 10.13);
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(Currency::from_str_flexible("iqd").unwrap(), Currency::Iqd);
        assert_eq!(Currency::from_str_flexible("Dollar").unwrap(), Currency::Usd);
        assert!(Currency::from_str_flexible("EUR").is_err());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Currency::Iqd).unwrap();
        assert_eq!(json, "\"IQD\"");
        let roundtrip: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, Currency::Iqd);
    }
}
