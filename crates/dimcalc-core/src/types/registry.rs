//! Unit registry
//!
//! To add a unit, add an entry to the UNITS array. Units marked
//! `prefixable` also get every SI-prefixed variant (km, ms, μA, ...).
//! Currencies come from [`CURRENCIES`] and derived symbols from
//! COMPOSITES. The whole table is validated once on first use; a symbol
//! defined twice is reported as [`CalcError::DuplicateUnitSymbol`].

use std::collections::HashMap;
use std::sync::Arc;

use num_bigint::BigInt;
use num_rational::BigRational;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{CalcError, Result};
use crate::types::currency::{CurrencyDef, CURRENCIES};
use crate::types::unit::{BaseUnit, Dimension, TemperatureScale, Unit};
use crate::types::Number;

/// Conversion rule of a table entry
pub enum Rule {
    /// numerator / denominator of the reference unit
    Scale(i64, i64),
    /// scale, is-difference
    Temperature(TemperatureScale, bool),
}

/// Unit metadata
pub struct UnitDef {
    /// Display name
    pub symbol: &'static str,
    /// Other accepted spellings
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub dimension: Dimension,
    pub rule: Rule,
    /// Generate SI-prefixed variants
    pub prefixable: bool,
}

/// A named unit spanning several dimensions, e.g. J = kg·m²/s²
pub struct CompositeDef {
    pub symbol: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub terms: &'static [(&'static str, i32)],
}

const fn scale(
    symbol: &'static str,
    description: &'static str,
    dimension: Dimension,
    numer: i64,
    denom: i64,
    prefixable: bool,
) -> UnitDef {
    UnitDef {
        symbol,
        aliases: &[],
        description,
        dimension,
        rule: Rule::Scale(numer, denom),
        prefixable,
    }
}

const GALLON: i64 = 3_785_411_784;
const NANO: i64 = 1_000_000_000;

pub static UNITS: &[UnitDef] = &[
    // Time (reference: second)
    scale("s", "seconds", Dimension::Time, 1, 1, true),
    scale("min", "minutes", Dimension::Time, 60, 1, false),
    scale("hr", "hours", Dimension::Time, 3600, 1, false),
    scale("day", "days", Dimension::Time, 86400, 1, false),
    // Length (reference: meter)
    scale("m", "meters", Dimension::Length, 1, 1, true),
    scale("in", "inches", Dimension::Length, 254, 10_000, false),
    scale("ft", "feet", Dimension::Length, 254 * 12, 10_000, false),
    scale("yd", "yards", Dimension::Length, 254 * 36, 10_000, false),
    scale("mi", "miles", Dimension::Length, 254 * 63_360, 10_000, false),
    // Volume (reference: liter)
    scale("l", "liters", Dimension::Volume, 1, 1, true),
    scale("gal", "us gallons", Dimension::Volume, GALLON, NANO, false),
    scale("qt", "quarts", Dimension::Volume, GALLON, 4 * NANO, false),
    scale("pt", "pints", Dimension::Volume, GALLON, 8 * NANO, false),
    scale("cup", "cups", Dimension::Volume, GALLON, 16 * NANO, false),
    scale("foz", "fluid ounces", Dimension::Volume, GALLON, 128 * NANO, false),
    // Mass (reference: gram)
    scale("g", "grams", Dimension::Mass, 1, 1, true),
    scale("oz", "ounces", Dimension::Mass, 28_349_523_125, NANO, false),
    scale("lb", "pounds", Dimension::Mass, 45_359_237, 100_000, false),
    // Current (reference: ampere)
    scale("A", "amperes", Dimension::Current, 1, 1, true),
    // Temperature
    UnitDef {
        symbol: "°C",
        aliases: &["C"],
        description: "degrees celsius",
        dimension: Dimension::Temperature,
        rule: Rule::Temperature(TemperatureScale::Celsius, false),
        prefixable: false,
    },
    UnitDef {
        symbol: "°F",
        aliases: &["F"],
        description: "degrees fahrenheit",
        dimension: Dimension::Temperature,
        rule: Rule::Temperature(TemperatureScale::Fahrenheit, false),
        prefixable: false,
    },
    UnitDef {
        symbol: "°CΔ",
        aliases: &["dC"],
        description: "celsius difference",
        dimension: Dimension::Temperature,
        rule: Rule::Temperature(TemperatureScale::Celsius, true),
        prefixable: false,
    },
    UnitDef {
        symbol: "°FΔ",
        aliases: &["dF"],
        description: "fahrenheit difference",
        dimension: Dimension::Temperature,
        rule: Rule::Temperature(TemperatureScale::Fahrenheit, true),
        prefixable: false,
    },
];

/// SI prefixes and their power of ten
pub static SI_PREFIXES: &[(&str, i32)] = &[
    ("da", 1),
    ("h", 2),
    ("k", 3),
    ("M", 6),
    ("G", 9),
    ("T", 12),
    ("P", 15),
    ("E", 18),
    ("d", -1),
    ("c", -2),
    ("m", -3),
    ("μ", -6),
    ("u", -6),
    ("n", -9),
    ("p", -12),
    ("f", -15),
    ("a", -18),
];

pub static COMPOSITES: &[CompositeDef] = &[
    CompositeDef {
        symbol: "J",
        aliases: &[],
        description: "joules",
        terms: &[("kg", 1), ("m", 2), ("s", -2)],
    },
    CompositeDef {
        symbol: "N",
        aliases: &[],
        description: "newtons",
        terms: &[("kg", 1), ("m", 1), ("s", -2)],
    },
    CompositeDef {
        symbol: "W",
        aliases: &[],
        description: "watts",
        terms: &[("kg", 1), ("m", 2), ("s", -3)],
    },
    CompositeDef {
        symbol: "V",
        aliases: &[],
        description: "volts",
        terms: &[("kg", 1), ("m", 2), ("s", -3), ("A", -1)],
    },
    CompositeDef {
        symbol: "Ω",
        aliases: &["ohm"],
        description: "ohms",
        terms: &[("kg", 1), ("m", 2), ("s", -3), ("A", -2)],
    },
];

/// Validated, read-only symbol table
#[derive(Debug)]
pub struct UnitRegistry {
    units: HashMap<String, Unit>,
    composites: Vec<(&'static str, Unit)>,
}

impl UnitRegistry {
    /// Build a registry from static tables, rejecting duplicate symbols
    pub fn build(
        units: &[UnitDef],
        currencies: &[CurrencyDef],
        prefixes: &[(&str, i32)],
        composites: &[CompositeDef],
    ) -> Result<Self> {
        let mut registry = Self {
            units: HashMap::new(),
            composites: Vec::new(),
        };

        for def in units {
            let base = Arc::new(base_unit(def, def.symbol, 0));
            registry.insert_all(def.symbol, def.aliases, Unit::from_base(base, 1))?;
        }

        for def in currencies {
            let base = Arc::new(BaseUnit::currency(def.code, def.description));
            registry.insert_all(def.code, def.aliases, Unit::from_base(base, 1))?;
        }

        for def in units.iter().filter(|d| d.prefixable) {
            for (prefix, exponent) in prefixes {
                let symbol = format!("{prefix}{}", def.symbol);
                let base = Arc::new(base_unit(def, &symbol, *exponent));
                registry.insert(symbol, Unit::from_base(base, 1))?;
            }
        }

        for def in composites {
            let mut unit = Unit::dimensionless();
            for (symbol, power) in def.terms {
                let term = registry
                    .lookup(symbol)
                    .ok_or_else(|| CalcError::Parse((*symbol).to_string()))?;
                unit = unit.multiply(&term.powi(*power)?);
            }
            registry.insert_all(def.symbol, def.aliases, unit.clone())?;
            registry.composites.push((def.symbol, unit));
        }

        debug!(symbols = registry.units.len(), "unit registry built");
        Ok(registry)
    }

    fn insert(&mut self, symbol: String, unit: Unit) -> Result<()> {
        if self.units.contains_key(&symbol) {
            return Err(CalcError::DuplicateUnitSymbol(symbol));
        }
        self.units.insert(symbol, unit);
        Ok(())
    }

    fn insert_all(&mut self, symbol: &str, aliases: &[&str], unit: Unit) -> Result<()> {
        for alias in aliases {
            self.insert((*alias).to_string(), unit.clone())?;
        }
        self.insert(symbol.to_string(), unit)
    }

    /// Unit for an exact symbol or alias
    pub fn lookup(&self, symbol: &str) -> Option<&Unit> {
        self.units.get(symbol)
    }

    /// Derived symbol whose vector equals `unit`, powers and base units alike
    pub fn composite_symbol(&self, unit: &Unit) -> Option<&'static str> {
        self.composites
            .iter()
            .find(|(_, composite)| composite == unit)
            .map(|(symbol, _)| *symbol)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }
}

fn base_unit(def: &UnitDef, name: &str, prefix_exponent: i32) -> BaseUnit {
    match def.rule {
        Rule::Scale(numer, denom) => {
            let factor = scaled_factor(numer, denom, prefix_exponent);
            BaseUnit::linear(name, def.description, def.dimension, factor)
        }
        Rule::Temperature(scale, delta) => BaseUnit::temperature(name, def.description, scale, delta),
    }
}

/// numer / denom * 10^exponent, exactly
fn scaled_factor(numer: i64, denom: i64, exponent: i32) -> Number {
    let ten = BigInt::from(10u32).pow(exponent.unsigned_abs());
    let (numer, denom) = (BigInt::from(numer), BigInt::from(denom));
    let ratio = if exponent >= 0 {
        BigRational::new(numer * ten, denom)
    } else {
        BigRational::new(numer, denom * ten)
    };
    Number::from_ratio(ratio)
}

static REGISTRY: Lazy<Result<UnitRegistry>> =
    Lazy::new(|| UnitRegistry::build(UNITS, CURRENCIES, SI_PREFIXES, COMPOSITES));

/// The process-wide unit table
pub fn registry() -> Result<&'static UnitRegistry> {
    REGISTRY.as_ref().map_err(CalcError::clone)
}
