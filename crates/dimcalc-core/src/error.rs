//! Error taxonomy for the evaluation core
//!
//! Every failure inside the library is a recoverable `CalcError` value.
//! Only the process boundary decides whether to print and exit.

use thiserror::Error;

use crate::rates::RateError;

pub type Result<T> = std::result::Result<T, CalcError>;

#[derive(Debug, Clone, Error)]
pub enum CalcError {
    /// Malformed numeric literal, unit expression, or unknown token
    #[error("cannot parse '{0}'")]
    Parse(String),

    #[error("stack is empty")]
    EmptyStack,

    #[error("not enough operands for '{op}': need {needed}, have {available}")]
    NotEnoughOperands {
        op: String,
        needed: usize,
        available: usize,
    },

    #[error("incompatible units: '{left}' vs '{right}'")]
    IncompatibleUnits { left: String, right: String },

    #[error("operation not supported on dimensioned values: {0}")]
    DimensionedOperationNotSupported(String),

    #[error("dimensioned values can only be raised to integral powers, got {0}")]
    NonIntegralExponent(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("no conversion rule from '{from}' to '{to}'")]
    NoConversionRule { from: String, to: String },

    #[error("unsupported temperature conversion '{from}' -> '{to}'")]
    UnsupportedTemperaturePair { from: String, to: String },

    #[error("conversion '{from}' -> '{to}' failed")]
    ConversionFailed {
        from: String,
        to: String,
        #[source]
        source: RateError,
    },

    #[error("duplicate unit symbol '{0}'")]
    DuplicateUnitSymbol(String),

    #[error("integer values required for '{0}'")]
    IntegerRequired(String),

    #[error("invalid argument for '{op}': {reason}")]
    InvalidArgument { op: String, reason: String },
}

impl CalcError {
    /// True for the errors raised by dimension checks on an operation
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            CalcError::IncompatibleUnits { .. }
                | CalcError::DimensionedOperationNotSupported(_)
                | CalcError::NonIntegralExponent(_)
        )
    }

    pub(crate) fn invalid_argument(op: &str, reason: impl Into<String>) -> Self {
        CalcError::InvalidArgument {
            op: op.to_string(),
            reason: reason.into(),
        }
    }
}
