//! Value types for dimcalc calculations

pub mod currency;
mod number;
pub mod registry;
mod unit;
mod value;

pub use currency::{CurrencyDef, CURRENCIES};
pub use number::{Number, NumberFormat};
pub use registry::{registry, UnitDef, UnitRegistry, UNITS};
pub use unit::{BaseUnit, Conversion, Dimension, TemperatureScale, Unit, UnitFormat};
pub use value::{BinaryOp, UnaryOp, Value};
