//! Token evaluation over the value stack

pub mod display;
mod stack;

use tracing::{debug, trace};

use crate::config::EvalConfig;
use crate::error::{CalcError, Result};
use crate::rates::{NoRates, RateResolver};
use crate::types::{BinaryOp, Number, UnaryOp, Unit, Value};

pub use stack::{Stack, Statistic};

/// Named constants: symbol, value, unit
const CONSTANTS: &[(&str, &str, &str)] = &[
    ("pi", "3.141592653589793238462643383279502884197", ""),
    ("π", "3.141592653589793238462643383279502884197", ""),
    ("e", "2.718281828459045235360287471352662497757", ""),
    ("c", "299792458", "m/s"),
    ("G", "9.80665", "m/s²"),
    ("acre", "4046.8564224", "m²"),
    ("hectare", "10000", "m²"),
];

fn constant(name: &str) -> Option<Result<Value>> {
    let &(_, number, unit) = CONSTANTS.iter().find(|(symbol, ..)| *symbol == name)?;
    Some(build_constant(number, unit))
}

fn build_constant(number: &str, unit: &str) -> Result<Value> {
    let unit = if unit.is_empty() {
        Unit::dimensionless()
    } else {
        Unit::parse(unit)?
    };
    Ok(Value::new(number.parse()?, unit))
}

/// Literal forms tried in order: plain number, `h:m:s`, dotted quad
fn literal(word: &str) -> Option<Number> {
    word.parse::<Number>()
        .ok()
        .or_else(|| Number::parse_sexagesimal(word).ok())
        .or_else(|| Number::parse_ipv4(word).ok())
}

/// An RPN calculator: a stack plus the settings used to display it
pub struct Calculator {
    stack: Stack,
    config: EvalConfig,
    rates: Box<dyn RateResolver>,
}

impl Calculator {
    /// Calculator without exchange rates; currency conversion fails
    pub fn new(config: EvalConfig) -> Self {
        Self::with_rates(config, NoRates)
    }

    pub fn with_rates(config: EvalConfig, rates: impl RateResolver + 'static) -> Self {
        Self {
            stack: Stack::new(),
            config,
            rates: Box::new(rates),
        }
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate one argument; it may hold several whitespace-separated words
    pub fn eval_token(&mut self, token: &str) -> Result<()> {
        for word in token.split_whitespace() {
            self.eval_word(word)?;
            trace!(token = word, stack = %self.oneline(), "evaluated");
        }
        Ok(())
    }

    /// Evaluate tokens in order, stopping at the first failure
    pub fn eval_all<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<()> {
        tokens.iter().try_for_each(|t| self.eval_token(t.as_ref()))
    }

    fn eval_word(&mut self, word: &str) -> Result<()> {
        let rates = self.rates.as_ref();

        if let Some(number) = literal(word) {
            self.stack.push(Value::scalar(number));
            return Ok(());
        }

        match word {
            "x" => return self.stack.exchange(),
            "d" | "dup" => return self.stack.duplicate(),
            "p" | "pop" => return self.stack.pop().map(drop),
            _ => {}
        }

        let (name, replace) = match word.strip_suffix('!') {
            Some(name) => (name, true),
            None => (word, false),
        };
        if let Some(stat) = Statistic::from_symbol(name) {
            return self.stack.apply_statistic(stat, replace, rates);
        }

        if let Some(symbol) = word.strip_prefix('@') {
            let op = BinaryOp::from_symbol(symbol)
                .ok_or_else(|| CalcError::Parse(word.to_string()))?;
            return self.stack.reduce(op, rates);
        }
        if let Some(op) = BinaryOp::from_symbol(word) {
            return self.stack.apply_binary(op, rates);
        }
        if let Some(op) = UnaryOp::from_symbol(word) {
            return self.stack.apply_unary(op);
        }

        if let Some(value) = constant(word) {
            self.stack.push(value?);
            return Ok(());
        }

        let unit = Unit::parse(word).map_err(|e| match e {
            CalcError::Parse(_) => CalcError::Parse(word.to_string()),
            other => other,
        })?;
        debug!(unit = %unit, "apply");
        self.stack.apply_unit(&unit, rates)
    }

    /// Stack lines, top first, in every enabled base
    pub fn render(&self) -> Vec<String> {
        display::render(self.stack.values(), &self.config)
    }

    /// Stack on one line, bottom first
    pub fn oneline(&self) -> String {
        display::oneline(self.stack.values(), &self.config)
    }
}

/// Evaluate `tokens` on a fresh stack and render the result
pub fn evaluate<S: AsRef<str>>(tokens: &[S], config: &EvalConfig) -> Result<Vec<String>> {
    evaluate_with_rates(tokens, config, NoRates)
}

/// As [`evaluate`], converting currencies through `rates`
pub fn evaluate_with_rates<S: AsRef<str>>(
    tokens: &[S],
    config: &EvalConfig,
    rates: impl RateResolver + 'static,
) -> Result<Vec<String>> {
    let mut calc = Calculator::with_rates(config.clone(), rates);
    calc.eval_all(tokens)?;
    Ok(calc.render())
}
