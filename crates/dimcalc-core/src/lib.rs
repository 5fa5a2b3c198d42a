//! dimcalc-core: exact RPN arithmetic with dimensional units
//!
//! Numbers are arbitrary-precision integers or rationals. Every value
//! carries a unit vector over a fixed set of dimensions, and the stack
//! converts between compatible units (including temperature offsets and
//! currencies via a caller-supplied rate table) as tokens are applied.
//!
//! # Example
//!
//! ```
//! use dimcalc_core::{evaluate, EvalConfig};
//!
//! // 5 km + 1000 m, expressed in the left operand's unit
//! let lines = evaluate(&["5", "km", "1000", "m", "+"], &EvalConfig::default()).unwrap();
//! assert_eq!(lines, vec!["6 km"]);
//!
//! // Absolute temperatures convert with their offset
//! let lines = evaluate(&["100 °C °F"], &EvalConfig::default()).unwrap();
//! assert_eq!(lines, vec!["212 °F"]);
//! ```

pub mod config;
pub mod error;
pub mod eval;
pub mod parser;
pub mod rates;
pub mod types;

pub use config::{Base, EvalConfig};
pub use error::{CalcError, Result};
pub use eval::{evaluate, evaluate_with_rates, Calculator, Stack, Statistic};
pub use rates::{NoRates, RateError, RateResolver, RateTable};
pub use types::{BinaryOp, Dimension, Number, UnaryOp, Unit, Value};
