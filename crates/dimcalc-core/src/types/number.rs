//! Arbitrary-precision numbers
//!
//! A `Number` is either an exact integer or an exact fraction. Every
//! operation that produces an integral result collapses back to the
//! integer variant, so `6 / 3` is `Integer(2)` while `1 / 3` stays a
//! fraction. Logarithms, square roots of non-squares, and non-integral
//! powers go through `f64` and are only as accurate as `f64`.

use std::cmp::Ordering;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rand::Rng;

use crate::config::Base;
use crate::error::{CalcError, Result};
use crate::parser;

/// Integral exponents above this magnitude are computed through `f64`
const MAX_EXACT_EXPONENT: u32 = 1 << 16;

/// Width of the mask used by bitwise NOT
const NOT_MASK: u64 = u64::MAX;

/// Largest left shift; the result grows by one bit per step
const MAX_SHIFT: usize = 1 << 16;

#[derive(Debug, Clone)]
pub enum Number {
    Integer(BigInt),
    Fraction(BigRational),
}

/// Options for rendering a single number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    /// Decimal places for values whose expansion does not terminate
    pub precision: usize,
    /// Separator inserted every three integer digits in base 10
    pub grouping: Option<char>,
    /// Render fractions in the hex column as hex floats
    pub allow_hex_float: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            precision: 4,
            grouping: None,
            allow_hex_float: false,
        }
    }
}

impl Number {
    pub fn zero() -> Self {
        Number::Integer(BigInt::zero())
    }

    pub fn one() -> Self {
        Number::Integer(BigInt::one())
    }

    /// Build a number from a ratio, collapsing integral values
    pub fn from_ratio(r: BigRational) -> Self {
        if r.is_integer() {
            Number::Integer(r.to_integer())
        } else {
            Number::Fraction(r)
        }
    }

    /// Exact ratio `numer / denom`
    pub fn ratio(numer: i64, denom: i64) -> Result<Self> {
        if denom == 0 {
            return Err(CalcError::DivisionByZero);
        }
        Ok(Number::from_ratio(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    /// Convert a float result back into a number. Lossy by nature.
    pub fn from_f64(f: f64) -> Result<Self> {
        BigRational::from_float(f)
            .map(Number::from_ratio)
            .ok_or_else(|| CalcError::invalid_argument("float", format!("{f} is not finite")))
    }

    /// Parse a numeric literal from the start of `text`, returning the
    /// unconsumed remainder
    pub fn parse(text: &str) -> Result<(Number, &str)> {
        parser::parse_number_prefix(text)
    }

    /// Parse `SS`, `MM:SS` or `HH:MM:SS`.
    ///
    /// The result is expressed in the unit of the leading component:
    /// `1:30` is 1.5 (minutes), `1:30:45` is 1.5125 (hours). Only the
    /// last component may be fractional.
    pub fn parse_sexagesimal(text: &str) -> Result<Number> {
        let parse_err = || CalcError::Parse(text.to_string());
        let parts: Vec<&str> = text.split(':').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(parse_err());
        }

        let (last, leading) = parts.split_last().ok_or_else(parse_err)?;
        let sixty = BigRational::from_integer(BigInt::from(60));
        let mut total = BigRational::zero();
        for part in leading {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(parse_err());
            }
            let value = BigInt::parse_bytes(part.as_bytes(), 10).ok_or_else(parse_err)?;
            total = total * &sixty + BigRational::from_integer(value);
        }

        let seconds: Number = last.parse()?;
        if seconds.is_negative() {
            return Err(parse_err());
        }
        total = total * &sixty + seconds.to_ratio();

        let scale = num_traits::pow(sixty, leading.len());
        Ok(Number::from_ratio(total / scale))
    }

    /// Parse a dotted-quad IPv4 address into its 32-bit integer value
    pub fn parse_ipv4(text: &str) -> Result<Number> {
        let parse_err = || CalcError::Parse(text.to_string());
        let octets: Vec<&str> = text.split('.').collect();
        if octets.len() != 4 {
            return Err(parse_err());
        }

        let mut value: u32 = 0;
        for octet in octets {
            if octet.is_empty() || !octet.bytes().all(|b| b.is_ascii_digit()) {
                return Err(parse_err());
            }
            let byte: u8 = octet.parse().map_err(|_| parse_err())?;
            value = (value << 8) | u32::from(byte);
        }
        Ok(Number::Integer(BigInt::from(value)))
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Number::Integer(_) => true,
            Number::Fraction(r) => r.is_integer(),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Integer(i) => i.is_zero(),
            Number::Fraction(r) => r.is_zero(),
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Integer(i) => i.is_negative(),
            Number::Fraction(r) => r.is_negative(),
        }
    }

    pub fn to_ratio(&self) -> BigRational {
        match self {
            Number::Integer(i) => BigRational::from_integer(i.clone()),
            Number::Fraction(r) => r.clone(),
        }
    }

    /// The integer value, if this number is integral
    pub fn to_integer(&self) -> Option<BigInt> {
        match self {
            Number::Integer(i) => Some(i.clone()),
            Number::Fraction(r) if r.is_integer() => Some(r.to_integer()),
            Number::Fraction(_) => None,
        }
    }

    pub fn to_i32(&self) -> Option<i32> {
        self.to_integer().and_then(|i| i.to_i32())
    }

    /// Nearest `f64`; lossy
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Number::Integer(i) => i.to_f64(),
            Number::Fraction(r) => r.to_f64(),
        }
    }

    pub fn addition(&self, rhs: &Number) -> Number {
        match (self, rhs) {
            (Number::Integer(a), Number::Integer(b)) => Number::Integer(a + b),
            _ => Number::from_ratio(self.to_ratio() + rhs.to_ratio()),
        }
    }

    pub fn subtract(&self, rhs: &Number) -> Number {
        match (self, rhs) {
            (Number::Integer(a), Number::Integer(b)) => Number::Integer(a - b),
            _ => Number::from_ratio(self.to_ratio() - rhs.to_ratio()),
        }
    }

    pub fn multiply(&self, rhs: &Number) -> Number {
        match (self, rhs) {
            (Number::Integer(a), Number::Integer(b)) => Number::Integer(a * b),
            _ => Number::from_ratio(self.to_ratio() * rhs.to_ratio()),
        }
    }

    /// Division; integer operands that divide evenly stay integral
    pub fn divide(&self, rhs: &Number) -> Result<Number> {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        match (self, rhs) {
            (Number::Integer(a), Number::Integer(b)) => {
                let (q, r) = a.div_rem(b);
                if r.is_zero() {
                    Ok(Number::Integer(q))
                } else {
                    Ok(Number::Fraction(BigRational::new(a.clone(), b.clone())))
                }
            }
            _ => Ok(Number::from_ratio(self.to_ratio() / rhs.to_ratio())),
        }
    }

    /// Floored modulo: `x - y * floor(x / y)`
    pub fn modulo(&self, rhs: &Number) -> Result<Number> {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        match (self, rhs) {
            (Number::Integer(a), Number::Integer(b)) => Ok(Number::Integer(a.mod_floor(b))),
            _ => {
                let x = self.to_ratio();
                let y = rhs.to_ratio();
                let floor = (&x / &y).floor();
                Ok(Number::from_ratio(x - y * floor))
            }
        }
    }

    /// Raise to a power.
    ///
    /// Integral exponents are exact (negative ones via the reciprocal);
    /// anything else is approximated through `f64`.
    pub fn power(&self, exponent: &Number) -> Result<Number> {
        if let Some(exp) = exponent.to_integer() {
            if let Some(magnitude) = exp.magnitude().to_u32() {
                if magnitude <= MAX_EXACT_EXPONENT {
                    let base = if exp.sign() == Sign::Minus {
                        self.reciprocal()?
                    } else {
                        self.clone()
                    };
                    return Ok(base.fast_power(magnitude));
                }
            }
        }

        let base = self.to_f64_for("**")?;
        let exp = exponent.to_f64_for("**")?;
        if base < 0.0 && exp.fract() != 0.0 {
            return Err(CalcError::invalid_argument(
                "**",
                "negative base with a non-integral exponent",
            ));
        }
        Number::from_f64(base.powf(exp))
    }

    fn fast_power(&self, exponent: u32) -> Number {
        match self {
            Number::Integer(i) => Number::Integer(i.pow(exponent)),
            Number::Fraction(r) => {
                let mut result = BigRational::one();
                let mut base = r.clone();
                let mut exp = exponent;
                while exp > 0 {
                    if exp & 1 == 1 {
                        result = &result * &base;
                    }
                    exp >>= 1;
                    if exp > 0 {
                        base = &base * &base;
                    }
                }
                Number::from_ratio(result)
            }
        }
    }

    pub fn negate(&self) -> Number {
        match self {
            Number::Integer(i) => Number::Integer(-i),
            Number::Fraction(r) => Number::Fraction(-r),
        }
    }

    pub fn reciprocal(&self) -> Result<Number> {
        Number::one().divide(self)
    }

    /// Round toward zero; always integral
    pub fn truncate(&self) -> Number {
        match self {
            Number::Integer(_) => self.clone(),
            Number::Fraction(r) => Number::Integer(r.trunc().to_integer()),
        }
    }

    pub fn abs(&self) -> Number {
        if self.is_negative() {
            self.negate()
        } else {
            self.clone()
        }
    }

    pub fn ln(&self) -> Result<Number> {
        self.float_log("log", f64::ln)
    }

    pub fn log2(&self) -> Result<Number> {
        self.float_log("log2", f64::log2)
    }

    pub fn log10(&self) -> Result<Number> {
        self.float_log("log10", f64::log10)
    }

    fn float_log(&self, op: &str, f: fn(f64) -> f64) -> Result<Number> {
        if self.is_negative() || self.is_zero() {
            return Err(CalcError::invalid_argument(op, "argument must be positive"));
        }
        Number::from_f64(f(self.to_f64_for(op)?))
    }

    /// Square root, exact for perfect squares
    pub fn sqrt(&self) -> Result<Number> {
        if self.is_negative() {
            return Err(CalcError::invalid_argument("sqrt", "argument must not be negative"));
        }
        let r = self.to_ratio();
        let numer = r.numer().sqrt();
        let denom = r.denom().sqrt();
        if &numer * &numer == *r.numer() && &denom * &denom == *r.denom() {
            return Ok(Number::from_ratio(BigRational::new(numer, denom)));
        }
        Number::from_f64(self.to_f64_for("sqrt")?.sqrt())
    }

    fn to_f64_for(&self, op: &str) -> Result<f64> {
        self.to_f64()
            .filter(|f| f.is_finite())
            .ok_or_else(|| CalcError::invalid_argument(op, "value out of float range"))
    }

    fn integer_for(&self, op: &str) -> Result<BigInt> {
        self.to_integer()
            .ok_or_else(|| CalcError::IntegerRequired(op.to_string()))
    }

    pub fn bit_and(&self, rhs: &Number) -> Result<Number> {
        Ok(Number::Integer(self.integer_for("&")? & rhs.integer_for("&")?))
    }

    pub fn bit_or(&self, rhs: &Number) -> Result<Number> {
        Ok(Number::Integer(self.integer_for("|")? | rhs.integer_for("|")?))
    }

    pub fn bit_xor(&self, rhs: &Number) -> Result<Number> {
        Ok(Number::Integer(self.integer_for("^")? ^ rhs.integer_for("^")?))
    }

    pub fn bit_shl(&self, rhs: &Number) -> Result<Number> {
        let value = self.integer_for("<<")?;
        let shift = shift_amount("<<", rhs)?;
        if shift > MAX_SHIFT {
            return Err(CalcError::invalid_argument(
                "<<",
                format!("shift must be at most {MAX_SHIFT}"),
            ));
        }
        Ok(Number::Integer(value << shift))
    }

    pub fn bit_shr(&self, rhs: &Number) -> Result<Number> {
        let value = self.integer_for(">>")?;
        Ok(Number::Integer(value >> shift_amount(">>", rhs)?))
    }

    /// Bitwise NOT against a 64-bit mask
    pub fn bit_not(&self) -> Result<Number> {
        let value = self.integer_for("~")?;
        Ok(Number::Integer(value ^ BigInt::from(NOT_MASK)))
    }

    /// IPv4 netmask with the given number of leading one bits
    pub fn mask(&self) -> Result<Number> {
        let bits = self
            .integer_for("mask")?
            .to_u32()
            .filter(|b| *b <= 32)
            .ok_or_else(|| CalcError::invalid_argument("mask", "bits must be between 0 and 32"))?;
        let mask = if bits == 0 {
            0
        } else {
            u32::MAX << (32 - bits)
        };
        Ok(Number::Integer(BigInt::from(mask)))
    }

    /// Uniform draw from `[0, self)`
    pub fn random(&self) -> Result<Number> {
        self.random_with(&mut rand::thread_rng())
    }

    pub fn random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Number> {
        let unit = Number::from_f64(rng.gen::<f64>())?;
        Ok(self.multiply(&unit))
    }

    /// Dotted quad for integers in `0..2^32`
    pub fn to_ipv4(&self) -> Option<String> {
        let addr = self.to_integer()?.to_u32()?;
        Some(Ipv4Addr::from(addr).to_string())
    }

    /// Render in the given base.
    ///
    /// Negative values carry the sign before the prefix (`-0x10`).
    /// Fractions fall back to base 10 unless hex floats are allowed.
    pub fn format(&self, base: Base, fmt: &NumberFormat) -> String {
        match (self, base) {
            (_, Base::Decimal) => format_decimal(&self.to_ratio(), fmt),
            (Number::Integer(i), _) => format_radix(i, base, fmt.grouping.is_some()),
            (Number::Fraction(r), Base::Hex) if fmt.allow_hex_float => format_hex_float(r),
            (Number::Fraction(r), _) => format_decimal(r, fmt),
        }
    }
}

fn shift_amount(op: &str, n: &Number) -> Result<usize> {
    n.integer_for(op)?
        .to_usize()
        .ok_or_else(|| CalcError::invalid_argument(op, "shift must be a non-negative integer"))
}

/// Number of decimal places needed to show `1/denom` exactly, if finite
fn terminating_digits(denom: &BigInt) -> Option<usize> {
    let two = BigInt::from(2);
    let five = BigInt::from(5);
    let mut rest = denom.abs();
    let (mut twos, mut fives) = (0usize, 0usize);
    while rest.is_even() && !rest.is_zero() {
        rest /= &two;
        twos += 1;
    }
    while (&rest % &five).is_zero() && !rest.is_zero() {
        rest /= &five;
        fives += 1;
    }
    rest.is_one().then_some(twos.max(fives))
}

fn format_decimal(r: &BigRational, fmt: &NumberFormat) -> String {
    let places = match terminating_digits(r.denom()) {
        Some(needed) => needed.min(fmt.precision),
        None => fmt.precision,
    };

    let scale = BigInt::from(10u32).pow(places as u32);
    let abs = r.abs();
    let (mut scaled, rem) = (abs.numer() * &scale).div_rem(abs.denom());
    // half away from zero
    if rem * 2 >= *abs.denom() {
        scaled += 1;
    }

    let digits = scaled.to_string();
    let (int_part, frac_part) = if places == 0 {
        (digits, String::new())
    } else {
        let padded = format!("{digits:0>width$}", width = places + 1);
        let split = padded.len() - places;
        let frac = padded[split..].trim_end_matches('0').to_string();
        (padded[..split].to_string(), frac)
    };

    let int_part = match fmt.grouping {
        Some(sep) => group_digits(&int_part, sep, 3),
        None => int_part,
    };

    let sign = if r.is_negative() && !scaled.is_zero() {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    }
}

fn format_radix(i: &BigInt, base: Base, grouped: bool) -> String {
    let digits = i.magnitude().to_str_radix(base.radix());
    let digits = if grouped {
        group_digits(&digits, '_', 4)
    } else {
        digits
    };
    let sign = if i.is_negative() { "-" } else { "" };
    format!("{sign}{}{digits}", base.prefix())
}

/// Normalized hex float: `0x1.8p+3`, exponent in bits
fn format_hex_float(r: &BigRational) -> String {
    let denom = r.denom().magnitude();
    let dyadic = (denom & (denom - num_bigint::BigUint::one())).is_zero();
    let exact = if dyadic {
        r.clone()
    } else {
        // only dyadic rationals have a finite hex expansion
        match r.to_f64().and_then(BigRational::from_float) {
            Some(approx) => approx,
            None => return format_decimal(r, &NumberFormat::default()),
        }
    };
    if exact.is_zero() {
        return "0x0p+0".to_string();
    }

    let numer = exact.numer().magnitude().clone();
    let shift = exact.denom().bits() as i64 - 1;
    let bits = numer.bits();
    let exponent = bits as i64 - 1 - shift;

    let frac_bits = bits - 1;
    let fraction = numer - (num_bigint::BigUint::one() << frac_bits);
    let pad = (4 - frac_bits % 4) % 4;
    let width = ((frac_bits + pad) / 4) as usize;
    let frac_hex = if width == 0 {
        String::new()
    } else {
        let hex = (fraction << pad).to_str_radix(16);
        format!("{hex:0>width$}").trim_end_matches('0').to_string()
    };

    let sign = if exact.is_negative() { "-" } else { "" };
    let frac_hex = if frac_hex.is_empty() {
        frac_hex
    } else {
        format!(".{frac_hex}")
    };
    format!("{sign}0x1{frac_hex}p{exponent:+}")
}

/// Insert `sep` every `every` digits from the right
fn group_digits(digits: &str, sep: char, every: usize) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / every);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % every == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Number) -> Ordering {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a.cmp(b),
            _ => self.to_ratio().cmp(&other.to_ratio()),
        }
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Number::Integer(BigInt::from(i))
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Integer(BigInt::from(i))
    }
}

impl From<BigInt> for Number {
    fn from(i: BigInt) -> Self {
        Number::Integer(i)
    }
}

impl From<BigRational> for Number {
    fn from(r: BigRational) -> Self {
        Number::from_ratio(r)
    }
}

impl FromStr for Number {
    type Err = CalcError;

    /// Parse a literal that must consume the whole input
    fn from_str(s: &str) -> Result<Self> {
        match Number::parse(s)? {
            (n, "") => Ok(n),
            _ => Err(CalcError::Parse(s.to_string())),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(Base::Decimal, &NumberFormat::default()))
    }
}
