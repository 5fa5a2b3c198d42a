//! Exchange-rate collaborator for currency conversion
//!
//! The unit engine never fetches or caches rates itself. It asks a
//! [`RateResolver`] to convert an amount between two currency codes and
//! turns any failure into [`crate::CalcError::ConversionFailed`].
//!
//! [`RateTable`] is the in-memory resolver the CLI feeds from a JSON
//! rate document:
//!
//! ```json
//! { "base": "USD", "rates": { "EUR": 0.92, "GBP": 0.79, "BTC": 0.0000105 } }
//! ```
//!
//! Each rate means "1 unit of `base` = X units of the currency".

use std::collections::HashMap;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Number;

#[derive(Debug, Clone, Error)]
pub enum RateError {
    #[error("no exchange rate available for {code}")]
    RateUnavailable { code: String },

    #[error("exchange rates are not loaded")]
    NoRates,

    #[error("invalid rate document: {0}")]
    InvalidDocument(String),
}

/// Converts an amount between two currency codes
pub trait RateResolver {
    fn resolve(&self, amount: &Number, from: &str, to: &str) -> Result<Number, RateError>;
}

/// Resolver used when no rates were supplied; every lookup fails
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRates;

impl RateResolver for NoRates {
    fn resolve(&self, _amount: &Number, _from: &str, _to: &str) -> Result<Number, RateError> {
        Err(RateError::NoRates)
    }
}

/// Rate document format
#[derive(Debug, Serialize, Deserialize)]
struct RateDocument {
    base: String,
    rates: HashMap<String, Decimal>,
}

/// Exchange rates relative to a single base currency
#[derive(Debug, Clone)]
pub struct RateTable {
    base: String,
    /// code -> units of that currency per one unit of `base`
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.to_uppercase(),
            rates: HashMap::new(),
        }
    }

    /// Parse a JSON rate document
    pub fn from_json_str(json: &str) -> Result<Self, RateError> {
        let doc: RateDocument =
            serde_json::from_str(json).map_err(|e| RateError::InvalidDocument(e.to_string()))?;
        let mut table = Self::new(&doc.base);
        for (code, rate) in doc.rates {
            table.set_rate(&code, rate);
        }
        Ok(table)
    }

    /// Set "1 base = `rate` code"
    pub fn set_rate(&mut self, code: &str, rate: Decimal) {
        self.rates.insert(code.to_uppercase(), rate);
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Units of `code` per one unit of the base currency
    fn per_base(&self, code: &str) -> Result<BigRational, RateError> {
        let code = code.to_uppercase();
        if code == self.base {
            return Ok(BigRational::from_integer(BigInt::from(1)));
        }
        match self.rates.get(&code) {
            Some(rate) if !rate.is_zero() => Ok(decimal_to_ratio(rate)),
            _ => Err(RateError::RateUnavailable { code }),
        }
    }
}

impl RateResolver for RateTable {
    fn resolve(&self, amount: &Number, from: &str, to: &str) -> Result<Number, RateError> {
        if from.eq_ignore_ascii_case(to) {
            return Ok(amount.clone());
        }
        // amount[from] -> base -> to
        let from_rate = self.per_base(from)?;
        let to_rate = self.per_base(to)?;
        Ok(Number::from_ratio(amount.to_ratio() * to_rate / from_rate))
    }
}

impl FromStr for RateTable {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(s)
    }
}

/// Exact value of a decimal as a ratio
fn decimal_to_ratio(d: &Decimal) -> BigRational {
    let mantissa = BigInt::from(d.mantissa());
    let scale = BigInt::from(10u32).pow(d.scale());
    BigRational::new(mantissa, scale)
}
