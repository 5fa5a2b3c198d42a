//! The RPN value stack

use crate::error::{CalcError, Result};
use crate::rates::RateResolver;
use crate::types::{BinaryOp, Number, UnaryOp, Unit, Value};

/// Aggregates over the whole stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Min,
    Max,
    Mean,
    Size,
}

impl Statistic {
    /// `min` is the minute unit, so the minimum is spelled `mini`
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "mini" => Some(Statistic::Min),
            "max" => Some(Statistic::Max),
            "mean" => Some(Statistic::Mean),
            "size" => Some(Statistic::Size),
            _ => None,
        }
    }
}

/// Ordered values, top = last pushed. Each slot owns its value.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    values: Vec<Value>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bottom to top
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn pop(&mut self) -> Result<Value> {
        self.values.pop().ok_or(CalcError::EmptyStack)
    }

    pub fn peek(&self) -> Result<&Value> {
        self.values.last().ok_or(CalcError::EmptyStack)
    }

    pub fn peek_mut(&mut self) -> Result<&mut Value> {
        self.values.last_mut().ok_or(CalcError::EmptyStack)
    }

    fn require(&self, op: &str, needed: usize) -> Result<()> {
        if self.values.len() < needed {
            return Err(CalcError::NotEnoughOperands {
                op: op.to_string(),
                needed,
                available: self.values.len(),
            });
        }
        Ok(())
    }

    /// Swap the top two values
    pub fn exchange(&mut self) -> Result<()> {
        self.require("x", 2)?;
        let n = self.values.len();
        self.values.swap(n - 1, n - 2);
        Ok(())
    }

    /// Push an independent copy of the top value
    pub fn duplicate(&mut self) -> Result<()> {
        let copy = self.peek()?.clone();
        self.values.push(copy);
        Ok(())
    }

    /// Replace the top two values with `second op top`
    pub fn apply_binary(&mut self, op: BinaryOp, rates: &dyn RateResolver) -> Result<()> {
        self.require(op.symbol(), 2)?;
        let n = self.values.len();
        let result = self.values[n - 2].binary_op(op, &self.values[n - 1], rates)?;
        self.values.truncate(n - 2);
        self.values.push(result);
        Ok(())
    }

    pub fn apply_unary(&mut self, op: UnaryOp) -> Result<()> {
        self.require(op.symbol(), 1)?;
        let top = self.peek_mut()?;
        *top = top.unary_op(op)?;
        Ok(())
    }

    /// Attach or convert the top value to `unit`
    pub fn apply_unit(&mut self, unit: &Unit, rates: &dyn RateResolver) -> Result<()> {
        let top = self.peek_mut()?;
        *top = top.apply(unit, rates)?;
        Ok(())
    }

    /// Fold the whole stack bottom to top with `op`, leaving one value
    pub fn reduce(&mut self, op: BinaryOp, rates: &dyn RateResolver) -> Result<()> {
        self.require(&format!("@{}", op.symbol()), 2)?;
        let (first, rest) = self.values.split_first().ok_or(CalcError::EmptyStack)?;
        let mut acc = first.clone();
        for value in rest {
            acc = acc.binary_op(op, value, rates)?;
        }
        self.values = vec![acc];
        Ok(())
    }

    /// Compute a statistic in the unit of the bottom value
    pub fn statistic(&self, stat: Statistic, rates: &dyn RateResolver) -> Result<Value> {
        if stat == Statistic::Size {
            return Ok(Value::scalar(Number::from(self.values.len() as i64)));
        }

        let unit = &self.values.first().ok_or(CalcError::EmptyStack)?.unit;
        let numbers = self
            .values
            .iter()
            .map(|v| v.unit.convert(&v.number, unit, rates))
            .collect::<Result<Vec<_>>>()?;

        let number = match stat {
            Statistic::Min => numbers.into_iter().min(),
            Statistic::Max => numbers.into_iter().max(),
            _ => {
                let count = Number::from(numbers.len() as i64);
                let sum = numbers
                    .iter()
                    .fold(Number::zero(), |acc, n| acc.addition(n));
                Some(sum.divide(&count)?)
            }
        }
        .ok_or(CalcError::EmptyStack)?;
        Ok(Value::new(number, unit.clone()))
    }

    /// Push a statistic, or with `replace` make it the only value
    pub fn apply_statistic(
        &mut self,
        stat: Statistic,
        replace: bool,
        rates: &dyn RateResolver,
    ) -> Result<()> {
        let value = self.statistic(stat, rates)?;
        if replace {
            self.values.clear();
        }
        self.values.push(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::NoRates;

    fn scalar(n: i64) -> Value {
        Value::scalar(Number::from(n))
    }

    fn with_unit(n: &str, unit: &str) -> Value {
        Value::new(n.parse().unwrap(), Unit::parse(unit).unwrap())
    }

    #[test]
    fn test_pop_empty() {
        let mut stack = Stack::new();
        assert!(matches!(stack.pop(), Err(CalcError::EmptyStack)));
        assert!(matches!(stack.peek(), Err(CalcError::EmptyStack)));
        assert!(matches!(stack.duplicate(), Err(CalcError::EmptyStack)));
    }

    #[test]
    fn test_exchange() {
        let mut stack = Stack::new();
        stack.push(scalar(1));
        assert!(matches!(
            stack.exchange(),
            Err(CalcError::NotEnoughOperands { needed: 2, available: 1, .. })
        ));
        stack.push(scalar(2));
        stack.exchange().unwrap();
        assert_eq!(stack.values(), &[scalar(2), scalar(1)]);
    }

    #[test]
    fn test_duplicate_is_independent() {
        let mut stack = Stack::new();
        stack.push(scalar(7));
        stack.duplicate().unwrap();
        let top = stack.peek_mut().unwrap();
        top.number = top.number.addition(&Number::from(1));
        assert_eq!(stack.values(), &[scalar(7), scalar(8)]);
    }

    #[test]
    fn test_apply_binary_order() {
        let mut stack = Stack::new();
        stack.push(scalar(10));
        stack.push(scalar(4));
        stack.apply_binary(BinaryOp::Subtract, &NoRates).unwrap();
        assert_eq!(stack.values(), &[scalar(6)]);
        assert!(matches!(
            stack.apply_binary(BinaryOp::Add, &NoRates),
            Err(CalcError::NotEnoughOperands { .. })
        ));
    }

    #[test]
    fn test_failed_binary_keeps_operands() {
        let mut stack = Stack::new();
        stack.push(scalar(1));
        stack.push(scalar(0));
        assert!(stack.apply_binary(BinaryOp::Divide, &NoRates).is_err());
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_reduce() {
        let mut stack = Stack::new();
        for n in [1, 2, 3] {
            stack.push(scalar(n));
        }
        stack.reduce(BinaryOp::Add, &NoRates).unwrap();
        assert_eq!(stack.values(), &[scalar(6)]);
        assert!(matches!(
            stack.reduce(BinaryOp::Add, &NoRates),
            Err(CalcError::NotEnoughOperands { .. })
        ));

        // left to right
        let mut stack = Stack::new();
        for n in [100, 10, 5] {
            stack.push(scalar(n));
        }
        stack.reduce(BinaryOp::Subtract, &NoRates).unwrap();
        assert_eq!(stack.values(), &[scalar(85)]);
    }

    #[test]
    fn test_statistics_convert_units() {
        let mut stack = Stack::new();
        stack.push(with_unit("1", "m"));
        stack.push(with_unit("50", "cm"));
        stack.push(with_unit("2", "m"));

        let min = stack.statistic(Statistic::Min, &NoRates).unwrap();
        assert_eq!(min, with_unit("0.5", "m"));
        let max = stack.statistic(Statistic::Max, &NoRates).unwrap();
        assert_eq!(max, with_unit("2", "m"));
        let mean = stack.statistic(Statistic::Mean, &NoRates).unwrap();
        let expected = with_unit("3.5", "m")
            .binary_op(BinaryOp::Divide, &scalar(3), &NoRates)
            .unwrap();
        assert_eq!(mean, expected);
        let size = stack.statistic(Statistic::Size, &NoRates).unwrap();
        assert_eq!(size, scalar(3));

        stack.apply_statistic(Statistic::Max, true, &NoRates).unwrap();
        assert_eq!(stack.values(), &[with_unit("2", "m")]);
    }

    #[test]
    fn test_statistics_reject_incompatible() {
        let mut stack = Stack::new();
        stack.push(with_unit("1", "m"));
        stack.push(with_unit("1", "s"));
        assert!(matches!(
            stack.statistic(Statistic::Max, &NoRates),
            Err(CalcError::IncompatibleUnits { .. })
        ));
        assert!(matches!(
            Stack::new().statistic(Statistic::Mean, &NoRates),
            Err(CalcError::EmptyStack)
        ));
    }
}
