//! Dimension vectors and unit conversion
//!
//! A [`Unit`] holds one slot per [`Dimension`]. Each non-zero slot names
//! the base unit that realizes it (meter, °F, EUR, ...) and an integer
//! power, so `km/hr` is `{Length: km^1, Time: hr^-1}`.
//!
//! Conversion between two compatible units walks the slots and applies
//! each slot's [`Conversion`] rule raised to the slot power. The rules
//! are tried in a fixed order: static linear factors, then temperature
//! scales, then external currency rates. A pair matching none of them is
//! reported as [`CalcError::NoConversionRule`].

use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use num_rational::BigRational;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CalcError, Result};
use crate::parser::{self, to_superscript};
use crate::rates::RateResolver;
use crate::types::registry::registry;
use crate::types::Number;

/// Physical and financial axes, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Mass,
    Length,
    Time,
    Volume,
    Temperature,
    Currency,
    Current,
}

impl Dimension {
    pub const COUNT: usize = 7;

    pub const ALL: [Dimension; Dimension::COUNT] = [
        Dimension::Mass,
        Dimension::Length,
        Dimension::Time,
        Dimension::Volume,
        Dimension::Temperature,
        Dimension::Currency,
        Dimension::Current,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
}

impl TemperatureScale {
    /// Degrees of `to` per degree of `self`
    fn degree_ratio(self, to: TemperatureScale) -> BigRational {
        let ratio = |n: i32, d: i32| BigRational::new(BigInt::from(n), BigInt::from(d));
        match (self, to) {
            (TemperatureScale::Celsius, TemperatureScale::Fahrenheit) => ratio(9, 5),
            (TemperatureScale::Fahrenheit, TemperatureScale::Celsius) => ratio(5, 9),
            _ => ratio(1, 1),
        }
    }
}

/// How a base unit converts to another unit of the same dimension
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// Exact factor relative to the dimension's reference unit
    Linear(Number),
    /// Absolute reading or difference (`delta`) on a temperature scale
    AffineTemperature { scale: TemperatureScale, delta: bool },
    /// Rate looked up at conversion time
    ExternalCurrency { code: String },
}

/// A named unit that realizes one dimension
#[derive(Debug, Clone, PartialEq)]
pub struct BaseUnit {
    pub name: String,
    pub description: String,
    pub dimension: Dimension,
    pub conversion: Conversion,
}

impl BaseUnit {
    pub fn linear(name: &str, description: &str, dimension: Dimension, factor: Number) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            dimension,
            conversion: Conversion::Linear(factor),
        }
    }

    pub fn temperature(name: &str, description: &str, scale: TemperatureScale, delta: bool) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            dimension: Dimension::Temperature,
            conversion: Conversion::AffineTemperature { scale, delta },
        }
    }

    pub fn currency(code: &str, description: &str) -> Self {
        Self {
            name: code.to_string(),
            description: description.to_string(),
            dimension: Dimension::Currency,
            conversion: Conversion::ExternalCurrency {
                code: code.to_string(),
            },
        }
    }

    pub fn is_delta(&self) -> bool {
        matches!(
            self.conversion,
            Conversion::AffineTemperature { delta: true, .. }
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Slot {
    base: Option<Arc<BaseUnit>>,
    power: i32,
}

/// Rendering options for unit strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitFormat {
    /// `m²` instead of `m^2`
    pub superscript: bool,
    /// Show J, N, W, ... for matching vectors
    pub derived_units: bool,
}

impl Default for UnitFormat {
    fn default() -> Self {
        Self {
            superscript: true,
            derived_units: true,
        }
    }
}

/// Per-dimension powers, each realized by a base unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unit {
    slots: [Slot; Dimension::COUNT],
}

impl Unit {
    pub fn dimensionless() -> Self {
        Self::default()
    }

    /// A unit with a single dimension
    pub fn from_base(base: Arc<BaseUnit>, power: i32) -> Self {
        let mut unit = Self::default();
        if power != 0 {
            let slot = &mut unit.slots[base.dimension.index()];
            slot.power = power;
            slot.base = Some(base);
        }
        unit
    }

    /// Parse a unit expression such as `km/hr`, `kg·m²/s^2` or `num`
    pub fn parse(text: &str) -> Result<Unit> {
        if text == "num" {
            return Ok(Unit::dimensionless());
        }
        let registry = registry()?;
        if let Some(unit) = registry.lookup(text) {
            return Ok(unit.clone());
        }

        let mut unit = Unit::dimensionless();
        for term in parser::parse_unit_expr(text)? {
            let named = registry
                .lookup(term.symbol)
                .ok_or_else(|| CalcError::Parse(text.to_string()))?;
            let scaled = named.powi(term.power)?;
            // m·ft has no single base unit for Length
            if !unit.bases_agree(&scaled) {
                return Err(CalcError::Parse(text.to_string()));
            }
            unit = unit.multiply(&scaled);
        }
        Ok(unit)
    }

    pub fn power(&self, dimension: Dimension) -> i32 {
        self.slots[dimension.index()].power
    }

    pub fn base(&self, dimension: Dimension) -> Option<&BaseUnit> {
        self.slots[dimension.index()].base.as_deref()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.slots.iter().all(|s| s.power == 0)
    }

    /// Same power in every dimension
    pub fn compatible(&self, other: &Unit) -> bool {
        self.slots
            .iter()
            .zip(&other.slots)
            .all(|(a, b)| a.power == b.power)
    }

    pub fn multiply(&self, other: &Unit) -> Unit {
        let mut unit = self.clone();
        for (slot, rhs) in unit.slots.iter_mut().zip(&other.slots) {
            if rhs.power == 0 {
                continue;
            }
            if slot.power == 0 {
                slot.base = rhs.base.clone();
            }
            slot.power += rhs.power;
            if slot.power == 0 {
                slot.base = None;
            }
        }
        unit
    }

    pub fn divide(&self, other: &Unit) -> Unit {
        self.multiply(&other.inverse())
    }

    pub fn inverse(&self) -> Unit {
        let mut unit = self.clone();
        for slot in unit.slots.iter_mut() {
            slot.power = -slot.power;
        }
        unit
    }

    /// Every power multiplied by `n`
    pub fn powi(&self, n: i32) -> Result<Unit> {
        let mut unit = self.clone();
        for slot in unit.slots.iter_mut() {
            slot.power = slot
                .power
                .checked_mul(n)
                .ok_or_else(|| CalcError::invalid_argument("**", "unit power overflow"))?;
            if slot.power == 0 {
                slot.base = None;
            }
        }
        Ok(unit)
    }

    /// Raise to a numeric exponent, which must be an exact integer
    pub fn combine_power(&self, exponent: &Number) -> Result<Unit> {
        if !exponent.is_integer() {
            return Err(CalcError::NonIntegralExponent(exponent.to_string()));
        }
        let n = exponent
            .to_i32()
            .ok_or_else(|| CalcError::invalid_argument("**", "exponent out of range"))?;
        self.powi(n)
    }

    fn temperature(&self) -> Option<(&BaseUnit, i32)> {
        let slot = &self.slots[Dimension::Temperature.index()];
        match (&slot.base, slot.power) {
            (_, 0) | (None, _) => None,
            (Some(base), power) => Some((base.as_ref(), power)),
        }
    }

    /// The base unit of `dimension` when it is the only one, to the first power
    pub fn sole(&self, dimension: Dimension) -> Option<&BaseUnit> {
        let alone = Dimension::ALL.iter().all(|&d| match d {
            d if d == dimension => self.power(d) == 1,
            d => self.power(d) == 0,
        });
        if alone {
            self.base(dimension)
        } else {
            None
        }
    }

    /// Only a temperature, to the first power
    pub fn is_pure_temperature(&self) -> bool {
        self.sole(Dimension::Temperature).is_some()
    }

    /// Whether `self + other` is meaningful for temperatures.
    ///
    /// Two readings on different absolute scales (°C + °F) are rejected;
    /// any pairing involving a difference is fine.
    pub fn temperature_addable(&self, other: &Unit) -> bool {
        match (self.temperature(), other.temperature()) {
            (None, None) => true,
            (Some((a, 1)), Some((b, 1))) => a.name == b.name || a.is_delta() || b.is_delta(),
            _ => false,
        }
    }

    /// At most one side may carry a temperature
    pub fn temperature_multipliable(&self, other: &Unit) -> bool {
        self.temperature().is_none() || other.temperature().is_none()
    }

    /// Convert `value` expressed in `self` into `to`
    pub fn convert(&self, value: &Number, to: &Unit, rates: &dyn RateResolver) -> Result<Number> {
        if !self.compatible(to) {
            return Err(CalcError::IncompatibleUnits {
                left: self.to_string(),
                right: to.to_string(),
            });
        }

        // offsets only apply to a bare temperature reading
        let affine = self.is_pure_temperature();
        let mut out = value.clone();
        for (from_slot, to_slot) in self.slots.iter().zip(&to.slots) {
            if from_slot.power == 0 {
                continue;
            }
            let (Some(from), Some(target)) = (&from_slot.base, &to_slot.base) else {
                continue;
            };
            if same_base(from, target) {
                continue;
            }
            out = convert_slot(&out, from, target, from_slot.power, affine, rates)?;
        }

        debug!(from = %self, to = %to, "{value} -> {out}");
        Ok(out)
    }

    /// Re-express `value` so each dimension shared with `onto` uses the
    /// base unit `onto` uses there. Used before `*` and `/` so the
    /// combined vector has one base unit per dimension.
    ///
    /// With `keep_temperature` the temperature slot is left as is; the
    /// caller sets it when the temperature powers cancel in the result.
    pub fn rebase(
        &self,
        value: &Number,
        onto: &Unit,
        keep_temperature: bool,
        rates: &dyn RateResolver,
    ) -> Result<(Number, Unit)> {
        let mut out = value.clone();
        let mut unit = self.clone();
        for (dimension, (slot, target)) in Dimension::ALL
            .iter()
            .zip(unit.slots.iter_mut().zip(&onto.slots))
        {
            if slot.power == 0 || target.power == 0 {
                continue;
            }
            if keep_temperature && *dimension == Dimension::Temperature {
                continue;
            }
            let (Some(from), Some(to)) = (&slot.base, &target.base) else {
                continue;
            };
            if same_base(from, to) {
                continue;
            }
            let to = Arc::clone(to);
            out = convert_slot(&out, from, &to, slot.power, false, rates)?;
            slot.base = Some(to);
        }
        Ok((out, unit))
    }

    /// Where both sides are dimensioned, they use the same base unit
    fn bases_agree(&self, other: &Unit) -> bool {
        self.slots.iter().zip(&other.slots).all(|(a, b)| {
            match (&a.base, &b.base) {
                (Some(x), Some(y)) => same_base(x, y),
                _ => true,
            }
        })
    }

    /// Render as `kg·m/s²`, or a derived symbol such as `N`
    pub fn format(&self, fmt: &UnitFormat) -> String {
        if self.is_dimensionless() {
            return String::new();
        }
        if fmt.derived_units {
            if let Some(symbol) = registry().ok().and_then(|r| r.composite_symbol(self)) {
                return symbol.to_string();
            }
        }

        let term = |base: &BaseUnit, power: i32| match power {
            1 => base.name.clone(),
            p if fmt.superscript => format!("{}{}", base.name, to_superscript(p)),
            p => format!("{}^{p}", base.name),
        };
        let numer: Vec<String> = self
            .slots
            .iter()
            .filter(|s| s.power > 0)
            .filter_map(|s| s.base.as_deref().map(|b| term(b, s.power)))
            .collect();
        let denom: Vec<String> = self
            .slots
            .iter()
            .filter(|s| s.power < 0)
            .filter_map(|s| s.base.as_deref().map(|b| term(b, -s.power)))
            .collect();

        match (numer.is_empty(), denom.is_empty()) {
            (_, true) => numer.join("·"),
            (true, false) => format!("1/{}", denom.join("·")),
            (false, false) => format!("{}/{}", numer.join("·"), denom.join("·")),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(&UnitFormat::default()))
    }
}

fn same_base(a: &Arc<BaseUnit>, b: &Arc<BaseUnit>) -> bool {
    Arc::ptr_eq(a, b) || a == b
}

/// Convert one slot. Rule order: linear, temperature, currency.
fn convert_slot(
    value: &Number,
    from: &BaseUnit,
    to: &BaseUnit,
    power: i32,
    affine: bool,
    rates: &dyn RateResolver,
) -> Result<Number> {
    match (&from.conversion, &to.conversion) {
        (Conversion::Linear(a), Conversion::Linear(b)) => {
            let ratio = a.divide(b)?.power(&Number::from(power))?;
            Ok(value.multiply(&ratio))
        }
        (
            Conversion::AffineTemperature {
                scale: from_scale,
                delta: from_delta,
            },
            Conversion::AffineTemperature {
                scale: to_scale,
                delta: to_delta,
            },
        ) => {
            let absolute = affine && !from_delta && !to_delta;
            Ok(convert_temperature(value, *from_scale, *to_scale, power, absolute))
        }
        (Conversion::AffineTemperature { .. }, _) | (_, Conversion::AffineTemperature { .. }) => {
            Err(CalcError::UnsupportedTemperaturePair {
                from: from.name.clone(),
                to: to.name.clone(),
            })
        }
        (
            Conversion::ExternalCurrency { code: from_code },
            Conversion::ExternalCurrency { code: to_code },
        ) => {
            // a per-currency rate converts the other way round
            let (src, dst) = if power > 0 {
                (from_code, to_code)
            } else {
                (to_code, from_code)
            };
            let mut out = value.clone();
            for _ in 0..power.unsigned_abs() {
                out = rates
                    .resolve(&out, src, dst)
                    .map_err(|source| CalcError::ConversionFailed {
                        from: from.name.clone(),
                        to: to.name.clone(),
                        source,
                    })?;
            }
            Ok(out)
        }
        _ => Err(CalcError::NoConversionRule {
            from: from.name.clone(),
            to: to.name.clone(),
        }),
    }
}

/// °F -> °C: (x - 32) * 5/9; °C -> °F: x * 9/5 + 32. Differences and
/// compound units scale only.
fn convert_temperature(
    value: &Number,
    from: TemperatureScale,
    to: TemperatureScale,
    power: i32,
    absolute: bool,
) -> Number {
    if from == to {
        return value.clone();
    }
    let ratio = Number::from_ratio(from.degree_ratio(to));
    if !absolute {
        let mut out = value.clone();
        let step = if power > 0 {
            ratio
        } else {
            Number::from_ratio(to.degree_ratio(from))
        };
        for _ in 0..power.unsigned_abs() {
            out = out.multiply(&step);
        }
        return out;
    }

    let offset = Number::from(32);
    match from {
        TemperatureScale::Fahrenheit => value.subtract(&offset).multiply(&ratio),
        TemperatureScale::Celsius => value.multiply(&ratio).addition(&offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{NoRates, RateTable};
    use rust_decimal::Decimal;

    fn unit(s: &str) -> Unit {
        Unit::parse(s).unwrap()
    }

    fn n(s: &str) -> Number {
        s.parse().unwrap()
    }

    fn convert(value: &str, from: &str, to: &str) -> Number {
        unit(from).convert(&n(value), &unit(to), &NoRates).unwrap()
    }

    #[test]
    fn test_parse_simple_and_compound() {
        assert_eq!(unit("m").power(Dimension::Length), 1);
        let speed = unit("km/hr");
        assert_eq!(speed.power(Dimension::Length), 1);
        assert_eq!(speed.power(Dimension::Time), -1);
        assert_eq!(speed.to_string(), "km/hr");

        let accel = unit("m/s²");
        assert_eq!(accel.power(Dimension::Time), -2);
        assert_eq!(unit("m/s^2"), accel);
    }

    #[test]
    fn test_parse_failures() {
        assert!(Unit::parse("furlong").is_err());
        assert!(Unit::parse("m/s/s").is_err());
        assert!(Unit::parse("m·ft").is_err());
        assert!(Unit::parse("").is_err());
    }

    #[test]
    fn test_num_is_dimensionless() {
        assert!(unit("num").is_dimensionless());
        assert_eq!(unit("num").to_string(), "");
    }

    #[test]
    fn test_sole_dimension() {
        assert_eq!(unit("hr").sole(Dimension::Time).map(|b| b.name.as_str()), Some("hr"));
        assert!(unit("hr²").sole(Dimension::Time).is_none());
        assert!(unit("km/hr").sole(Dimension::Time).is_none());
        assert!(unit("m").sole(Dimension::Time).is_none());
        assert!(unit("°C").is_pure_temperature());
        assert!(!unit("°C/s").is_pure_temperature());
    }

    #[test]
    fn test_compatible_reflexive_symmetric() {
        let units = ["m", "ft", "km/hr", "mi/hr", "s", "°C", "dF", "kg·m²/s²", "usd"];
        for a in units {
            assert!(unit(a).compatible(&unit(a)));
            for b in units {
                assert_eq!(unit(a).compatible(&unit(b)), unit(b).compatible(&unit(a)));
            }
        }
        assert!(unit("km/hr").compatible(&unit("mi/s")));
        assert!(!unit("m").compatible(&unit("m²")));
    }

    #[test]
    fn test_linear_conversion() {
        assert_eq!(convert("1", "mi", "ft"), n("5280"));
        assert_eq!(convert("1", "in", "cm"), n("2.54"));
        assert_eq!(convert("1", "gal", "qt"), n("4"));
        assert_eq!(convert("1", "lb", "oz"), n("16"));
        assert_eq!(convert("1", "m²", "cm²"), n("10000"));
        let per_minute = unit("s")
            .inverse()
            .convert(&n("1"), &unit("min").inverse(), &NoRates)
            .unwrap();
        assert_eq!(per_minute, n("60"));
        assert_eq!(convert("60", "mi/hr", "ft/s"), n("88"));
    }

    #[test]
    fn test_round_trip() {
        for (from, to) in [("mi", "km"), ("°C", "°F"), ("dF", "dC"), ("gal", "ml"), ("km/hr", "mi/day")] {
            for value in ["0", "1", "-40", "123.456"] {
                let there = convert(value, from, to);
                let back = unit(to).convert(&there, &unit(from), &NoRates).unwrap();
                assert_eq!(back, n(value), "{value} {from} -> {to}");
            }
        }
    }

    #[test]
    fn test_temperature_conversion() {
        assert_eq!(convert("0", "°C", "°F"), n("32"));
        assert_eq!(convert("100", "°C", "°F"), n("212"));
        assert_eq!(convert("-40", "°F", "°C"), n("-40"));
        assert_eq!(convert("212", "F", "C"), n("100"));
        assert_eq!(convert("18", "dF", "dC"), n("10"));
        assert_eq!(convert("10", "dC", "dF"), n("18"));
        assert_eq!(convert("5", "dC", "dC"), n("5"));
        // difference to reading: scale only
        assert_eq!(convert("18", "dF", "°C"), n("10"));
        // compound: no offset
        assert_eq!(convert("9", "°F/s", "°C/s"), n("5"));
    }

    #[test]
    fn test_temperature_addable() {
        assert!(unit("C").temperature_addable(&unit("C")));
        assert!(unit("C").temperature_addable(&unit("dF")));
        assert!(unit("dC").temperature_addable(&unit("dF")));
        assert!(unit("dC").temperature_addable(&unit("F")));
        assert!(!unit("C").temperature_addable(&unit("F")));
        assert!(unit("m").temperature_addable(&unit("m")));
        assert!(!unit("°C²").temperature_addable(&unit("°C²")));
    }

    #[test]
    fn test_temperature_multipliable() {
        assert!(!unit("C").temperature_multipliable(&unit("C")));
        assert!(!unit("C").temperature_multipliable(&unit("F")));
        assert!(unit("C").temperature_multipliable(&unit("num")));
        assert!(unit("m").temperature_multipliable(&unit("F")));
    }

    #[test]
    fn test_combine() {
        let area = unit("m").multiply(&unit("m"));
        assert_eq!(area, unit("m²"));
        assert!(unit("m").divide(&unit("m")).is_dimensionless());
        assert_eq!(unit("s").inverse().to_string(), "1/s");
        assert_eq!(unit("1/s"), unit("s").inverse());
        assert_eq!(unit(&unit("hr·A").inverse().to_string()), unit("hr·A").inverse());
        assert_eq!(unit("m/s").combine_power(&n("2")).unwrap(), unit("m²/s²"));
        assert!(matches!(
            unit("m").combine_power(&n("0.5")),
            Err(CalcError::NonIntegralExponent(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(unit("kg·m/s²").to_string(), "N");
        assert_eq!(unit("kg*m^2/s^2").to_string(), "J");
        assert_eq!(unit("ohm").to_string(), "Ω");
        // only the exact base units match a derived symbol
        assert_eq!(unit("g·m/s²").to_string(), "g·m/s²");

        let plain = UnitFormat {
            superscript: false,
            derived_units: false,
        };
        assert_eq!(unit("N").format(&plain), "kg·m/s^2");
        assert_eq!(unit("°CΔ").to_string(), "°CΔ");
        assert_eq!(unit("$").to_string(), "USD");
    }

    #[test]
    fn test_currency_conversion() {
        let mut rates = RateTable::new("USD");
        rates.set_rate("EUR", Decimal::new(5, 1));
        let eur = unit("usd").convert(&n("10"), &unit("eur"), &rates).unwrap();
        assert_eq!(eur, n("5"));
        // per-currency prices convert the other way
        let per = unit("usd")
            .inverse()
            .convert(&n("10"), &unit("eur").inverse(), &rates)
            .unwrap();
        assert_eq!(per, n("20"));
    }

    #[test]
    fn test_currency_failure_is_conversion_failed() {
        let err = unit("usd").convert(&n("1"), &unit("gbp"), &NoRates).unwrap_err();
        assert!(matches!(err, CalcError::ConversionFailed { .. }));
    }

    #[test]
    fn test_conversion_rule_order() {
        let linear = Arc::new(BaseUnit::linear("lx", "linear", Dimension::Currency, n("2")));
        let money = Arc::new(BaseUnit::currency("XYZ", "money"));
        let warm = Arc::new(BaseUnit::temperature(
            "tx",
            "odd temperature",
            TemperatureScale::Celsius,
            false,
        ));
        let also_linear = Arc::new(BaseUnit::linear("ly", "linear", Dimension::Currency, n("4")));

        // linear pair resolves through the static ratio
        let value = Unit::from_base(Arc::clone(&linear), 1)
            .convert(&n("6"), &Unit::from_base(also_linear, 1), &NoRates)
            .unwrap();
        assert_eq!(value, n("3"));

        // linear against currency has no rule
        let err = Unit::from_base(Arc::clone(&linear), 1)
            .convert(&n("1"), &Unit::from_base(money, 1), &NoRates)
            .unwrap_err();
        assert!(matches!(err, CalcError::NoConversionRule { .. }));

        // a temperature rule paired with anything else is rejected as such
        let lx_temp = Arc::new(BaseUnit::linear("lt", "linear", Dimension::Temperature, n("1")));
        let err = Unit::from_base(warm, 1)
            .convert(&n("1"), &Unit::from_base(lx_temp, 1), &NoRates)
            .unwrap_err();
        assert!(matches!(err, CalcError::UnsupportedTemperaturePair { .. }));
    }

    #[test]
    fn test_incompatible_convert() {
        let err = unit("m").convert(&n("1"), &unit("s"), &NoRates).unwrap_err();
        assert!(matches!(err, CalcError::IncompatibleUnits { .. }));
    }

    #[test]
    fn test_rebase() {
        let (value, rebased) = unit("ft")
            .rebase(&n("3"), &unit("yd/s"), false, &NoRates)
            .unwrap();
        assert_eq!(value, n("1"));
        assert_eq!(rebased, unit("yd"));
    }
}
