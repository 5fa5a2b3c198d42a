//! Display and evaluation settings supplied by the caller

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric bases a value can be rendered in.
///
/// Ordering is the column order used by the stack display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Base {
    Decimal,
    Hex,
    Octal,
    Binary,
}

impl Base {
    pub fn radix(self) -> u32 {
        match self {
            Base::Binary => 2,
            Base::Octal => 8,
            Base::Decimal => 10,
            Base::Hex => 16,
        }
    }

    /// Literal prefix used when rendering integers in this base
    pub fn prefix(self) -> &'static str {
        match self {
            Base::Binary => "0b",
            Base::Octal => "0o",
            Base::Decimal => "",
            Base::Hex => "0x",
        }
    }
}

impl TryFrom<u32> for Base {
    type Error = String;

    fn try_from(radix: u32) -> Result<Self, Self::Error> {
        match radix {
            2 => Ok(Base::Binary),
            8 => Ok(Base::Octal),
            10 => Ok(Base::Decimal),
            16 => Ok(Base::Hex),
            _ => Err(format!("unsupported base: {radix}")),
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.radix())
    }
}

/// Settings recognized by the core at evaluation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Maximum number of decimal places shown for non-terminating values
    pub display_precision: usize,
    /// Bases shown for every stack entry
    pub enabled_bases: BTreeSet<Base>,
    /// Render non-integral values as hex floats in the hex column
    pub allow_hex_float: bool,
    /// Digit grouping separator for base-10 output
    pub grouping_separator: Option<char>,
    /// Skip the derived-unit table (J, N, ...) when rendering units
    pub display_base_units_only: bool,
    /// Render unit powers as superscripts (m²) instead of `^n` (m^2)
    pub use_superscript_powers: bool,
    /// Add a dotted-quad column for integers in `0..2^32`
    pub show_ipv4: bool,
    /// Add a `(numerator/denominator)` column
    pub show_rational: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            display_precision: 4,
            enabled_bases: BTreeSet::from([Base::Decimal]),
            allow_hex_float: false,
            grouping_separator: None,
            display_base_units_only: false,
            use_superscript_powers: true,
            show_ipv4: false,
            show_rational: false,
        }
    }
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.display_precision = precision;
        self
    }

    pub fn with_base(mut self, base: Base) -> Self {
        self.enabled_bases.insert(base);
        self
    }

    /// Replace the set of displayed bases
    pub fn with_bases(mut self, bases: impl IntoIterator<Item = Base>) -> Self {
        self.enabled_bases = bases.into_iter().collect();
        self
    }

    pub fn with_hex_float(mut self, allow: bool) -> Self {
        self.allow_hex_float = allow;
        self
    }

    pub fn with_grouping(mut self, separator: Option<char>) -> Self {
        self.grouping_separator = separator;
        self
    }

    pub fn with_base_units_only(mut self, base_only: bool) -> Self {
        self.display_base_units_only = base_only;
        self
    }

    pub fn with_superscript(mut self, superscript: bool) -> Self {
        self.use_superscript_powers = superscript;
        self
    }

    pub fn with_ipv4(mut self, show: bool) -> Self {
        self.show_ipv4 = show;
        self
    }

    pub fn with_rational(mut self, show: bool) -> Self {
        self.show_rational = show;
        self
    }

    /// Formatting options for a single number
    pub(crate) fn number_format(&self) -> crate::types::NumberFormat {
        crate::types::NumberFormat {
            precision: self.display_precision,
            grouping: self.grouping_separator,
            allow_hex_float: self.allow_hex_float,
        }
    }

    /// Formatting options for a unit vector
    pub(crate) fn unit_format(&self) -> crate::types::UnitFormat {
        crate::types::UnitFormat {
            superscript: self.use_superscript_powers,
            derived_units: !self.display_base_units_only,
        }
    }
}
