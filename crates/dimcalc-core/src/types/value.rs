//! Numbers paired with units, and operator dispatch

use std::fmt;

use crate::error::{CalcError, Result};
use crate::rates::RateResolver;
use crate::types::{Dimension, Number, Unit};

/// Two-operand operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOp {
    /// Operator for a token, including the aliases `.`, `•` and `pow`
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" | "." | "•" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Modulo,
            "**" | "pow" => BinaryOp::Power,
            "&" => BinaryOp::BitAnd,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "<<" => BinaryOp::ShiftLeft,
            ">>" => BinaryOp::ShiftRight,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "**",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
        }
    }

    fn integer_only(self) -> bool {
        matches!(
            self,
            BinaryOp::BitAnd
                | BinaryOp::BitOr
                | BinaryOp::BitXor
                | BinaryOp::ShiftLeft
                | BinaryOp::ShiftRight
        )
    }

    /// The right operand must carry no unit
    fn dimensionless_rhs(self) -> bool {
        !matches!(
            self,
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide
        )
    }
}

/// Single-operand operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    Truncate,
    Reciprocal,
    Ln,
    Log10,
    Log2,
    Sqrt,
    BitNot,
    Mask,
    Random,
    StripUnits,
}

impl UnaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "chs" => UnaryOp::Negate,
            "t" => UnaryOp::Truncate,
            "r" => UnaryOp::Reciprocal,
            "log" => UnaryOp::Ln,
            "log10" => UnaryOp::Log10,
            "log2" => UnaryOp::Log2,
            "sqrt" => UnaryOp::Sqrt,
            "~" => UnaryOp::BitNot,
            "mask" => UnaryOp::Mask,
            "rand" => UnaryOp::Random,
            "num" => UnaryOp::StripUnits,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "chs",
            UnaryOp::Truncate => "t",
            UnaryOp::Reciprocal => "r",
            UnaryOp::Ln => "log",
            UnaryOp::Log10 => "log10",
            UnaryOp::Log2 => "log2",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::BitNot => "~",
            UnaryOp::Mask => "mask",
            UnaryOp::Random => "rand",
            UnaryOp::StripUnits => "num",
        }
    }

    fn integer_only(self) -> bool {
        matches!(self, UnaryOp::BitNot | UnaryOp::Mask)
    }

    fn dimensionless_only(self) -> bool {
        matches!(
            self,
            UnaryOp::Ln
                | UnaryOp::Log10
                | UnaryOp::Log2
                | UnaryOp::Sqrt
                | UnaryOp::BitNot
                | UnaryOp::Mask
                | UnaryOp::Random
        )
    }
}

/// A number with its unit vector
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub number: Number,
    pub unit: Unit,
}

impl Value {
    pub fn new(number: Number, unit: Unit) -> Self {
        Self { number, unit }
    }

    /// A dimensionless value
    pub fn scalar(number: Number) -> Self {
        Self::new(number, Unit::dimensionless())
    }

    /// Attach or convert to `target`.
    ///
    /// A bare number takes the unit as is (`5 km`). A dimensioned value is
    /// converted (`5 km mi`); applying the dimensionless unit strips it.
    pub fn apply(&self, target: &Unit, rates: &dyn RateResolver) -> Result<Value> {
        if self.unit.is_dimensionless() || target.is_dimensionless() {
            return Ok(Value::new(self.number.clone(), target.clone()));
        }
        self.convert_to(target, rates)
    }

    /// Convert to a compatible unit
    pub fn convert_to(&self, target: &Unit, rates: &dyn RateResolver) -> Result<Value> {
        let number = self.unit.convert(&self.number, target, rates)?;
        Ok(Value::new(number, target.clone()))
    }

    pub fn binary_op(&self, op: BinaryOp, rhs: &Value, rates: &dyn RateResolver) -> Result<Value> {
        if op.integer_only() && !(self.number.is_integer() && rhs.number.is_integer()) {
            return Err(CalcError::IntegerRequired(op.symbol().to_string()));
        }
        if op.dimensionless_rhs() && !rhs.unit.is_dimensionless() {
            return Err(CalcError::DimensionedOperationNotSupported(format!(
                "'{}' needs a dimensionless right operand, got '{rhs}'",
                op.symbol()
            )));
        }

        match op {
            BinaryOp::Add | BinaryOp::Subtract => self.additive(op, rhs, rates),
            BinaryOp::Multiply | BinaryOp::Divide => self.multiplicative(op, rhs, rates),
            BinaryOp::Power => {
                let unit = if self.unit.is_dimensionless() {
                    Unit::dimensionless()
                } else {
                    self.unit.combine_power(&rhs.number)?
                };
                Ok(Value::new(self.number.power(&rhs.number)?, unit))
            }
            BinaryOp::Modulo => self.with_number(self.number.modulo(&rhs.number)?),
            BinaryOp::BitAnd => self.with_number(self.number.bit_and(&rhs.number)?),
            BinaryOp::BitOr => self.with_number(self.number.bit_or(&rhs.number)?),
            BinaryOp::BitXor => self.with_number(self.number.bit_xor(&rhs.number)?),
            BinaryOp::ShiftLeft => self.with_number(self.number.bit_shl(&rhs.number)?),
            BinaryOp::ShiftRight => self.with_number(self.number.bit_shr(&rhs.number)?),
        }
    }

    fn with_number(&self, number: Number) -> Result<Value> {
        Ok(Value::new(number, self.unit.clone()))
    }

    fn additive(&self, op: BinaryOp, rhs: &Value, rates: &dyn RateResolver) -> Result<Value> {
        if !self.unit.compatible(&rhs.unit) || !self.unit.temperature_addable(&rhs.unit) {
            return Err(CalcError::IncompatibleUnits {
                left: self.unit.to_string(),
                right: rhs.unit.to_string(),
            });
        }

        // a difference combined with a reading yields a reading
        let (lhs, rhs_number, unit) = if self.is_temperature_delta() && rhs.is_temperature_reading() {
            let lhs = self.unit.convert(&self.number, &rhs.unit, rates)?;
            (lhs, rhs.number.clone(), rhs.unit.clone())
        } else {
            let converted = rhs.unit.convert(&rhs.number, &self.unit, rates)?;
            (self.number.clone(), converted, self.unit.clone())
        };

        let number = match op {
            BinaryOp::Add => lhs.addition(&rhs_number),
            _ => lhs.subtract(&rhs_number),
        };
        Ok(Value::new(number, unit))
    }

    fn multiplicative(&self, op: BinaryOp, rhs: &Value, rates: &dyn RateResolver) -> Result<Value> {
        if op == BinaryOp::Multiply && !self.unit.temperature_multipliable(&rhs.unit) {
            return Err(CalcError::DimensionedOperationNotSupported(format!(
                "cannot multiply temperatures '{}' and '{}'",
                self.unit, rhs.unit
            )));
        }

        let lhs_temp = self.unit.power(Dimension::Temperature);
        let rhs_temp = rhs.unit.power(Dimension::Temperature);
        // only absolute readings keep their own scale; differences rescale
        let cancels = lhs_temp != 0
            && !self.is_temperature_delta()
            && !rhs.is_temperature_delta()
            && match op {
                BinaryOp::Multiply => lhs_temp + rhs_temp == 0,
                _ => lhs_temp == rhs_temp,
            };

        let (rhs_number, rhs_unit) = rhs.unit.rebase(&rhs.number, &self.unit, cancels, rates)?;
        match op {
            BinaryOp::Multiply => Ok(Value::new(
                self.number.multiply(&rhs_number),
                self.unit.multiply(&rhs_unit),
            )),
            _ => Ok(Value::new(
                self.number.divide(&rhs_number)?,
                self.unit.divide(&rhs_unit),
            )),
        }
    }

    fn is_temperature_delta(&self) -> bool {
        self.unit
            .base(Dimension::Temperature)
            .is_some_and(|b| b.is_delta())
    }

    fn is_temperature_reading(&self) -> bool {
        self.unit
            .base(Dimension::Temperature)
            .is_some_and(|b| !b.is_delta())
    }

    pub fn unary_op(&self, op: UnaryOp) -> Result<Value> {
        if op.integer_only() && !self.number.is_integer() {
            return Err(CalcError::IntegerRequired(op.symbol().to_string()));
        }
        if op.dimensionless_only() && !self.unit.is_dimensionless() {
            return Err(CalcError::DimensionedOperationNotSupported(format!(
                "'{}' needs a dimensionless operand, got '{self}'",
                op.symbol()
            )));
        }

        Ok(match op {
            UnaryOp::Negate => Value::new(self.number.negate(), self.unit.clone()),
            UnaryOp::Truncate => Value::new(self.number.truncate(), self.unit.clone()),
            UnaryOp::Reciprocal => Value::new(self.number.reciprocal()?, self.unit.inverse()),
            UnaryOp::Ln => Value::scalar(self.number.ln()?),
            UnaryOp::Log10 => Value::scalar(self.number.log10()?),
            UnaryOp::Log2 => Value::scalar(self.number.log2()?),
            UnaryOp::Sqrt => Value::scalar(self.number.sqrt()?),
            UnaryOp::BitNot => Value::scalar(self.number.bit_not()?),
            UnaryOp::Mask => Value::scalar(self.number.mask()?),
            UnaryOp::Random => Value::scalar(self.number.random()?),
            UnaryOp::StripUnits => Value::scalar(self.number.clone()),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_dimensionless() {
            write!(f, "{}", self.number)
        } else {
            write!(f, "{} {}", self.number, self.unit)
        }
    }
}
