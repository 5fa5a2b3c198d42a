//! Token parsing using pest
//!
//! Numeric literals are matched as a prefix so the caller can tell a
//! full match from a partial one. Unit expressions must match the whole
//! token; symbol lookup happens in the unit registry.

use num_bigint::BigInt;
use num_rational::BigRational;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::error::{CalcError, Result};
use crate::types::Number;

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
pub struct TokenParser;

/// Decimal exponents beyond this are rejected rather than expanded
const MAX_EXPONENT: i64 = 1 << 20;

/// Binary magnitude suffixes, in increasing powers of 1024
pub const MAGNITUDE: &str = "KMGTPEZY";

/// One `symbol^power` segment of a unit expression.
/// Segments after `/` carry a negated power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitTerm<'a> {
    pub symbol: &'a str,
    pub power: i32,
}

/// Parse a numeric literal from the start of `input`.
///
/// Returns the number and the unconsumed remainder.
pub fn parse_number_prefix(input: &str) -> Result<(Number, &str)> {
    let mut pairs =
        TokenParser::parse(Rule::number, input).map_err(|_| CalcError::Parse(input.to_string()))?;
    let pair = pairs
        .next()
        .ok_or_else(|| CalcError::Parse(input.to_string()))?;
    let consumed = pair.as_span().end();
    let number = build_number(pair, input)?;
    Ok((number, &input[consumed..]))
}

/// Parse a full unit expression into its segments
pub fn parse_unit_expr(input: &str) -> Result<Vec<UnitTerm<'_>>> {
    let pairs = TokenParser::parse(Rule::unit_expr, input)
        .map_err(|_| CalcError::Parse(input.to_string()))?;

    let mut terms = Vec::new();
    for pair in pairs.flatten() {
        let sign = match pair.as_rule() {
            Rule::numerator => 1,
            Rule::denominator => -1,
            _ => continue,
        };
        for term in pair.into_inner() {
            let (symbol, power) = build_unit_term(term, input)?;
            let power = power
                .checked_mul(sign)
                .ok_or_else(|| CalcError::Parse(input.to_string()))?;
            terms.push(UnitTerm { symbol, power });
        }
    }
    Ok(terms)
}

fn build_number(pair: Pair<'_, Rule>, input: &str) -> Result<Number> {
    let parse_err = || CalcError::Parse(input.to_string());
    let mut negative = false;
    let mut value: Option<BigRational> = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::sign => negative = inner.as_str() == "-",
            Rule::binary | Rule::octal => {
                let radix = if inner.as_rule() == Rule::binary { 2 } else { 8 };
                let digits = inner.into_inner().next().ok_or_else(parse_err)?;
                let int = parse_digits(digits.as_str(), radix).ok_or_else(parse_err)?;
                value = Some(BigRational::from_integer(int));
            }
            Rule::hex => value = Some(build_hex(inner).ok_or_else(parse_err)?),
            Rule::decimal => value = Some(build_decimal(inner).ok_or_else(parse_err)?),
            Rule::magnitude => {
                let index = MAGNITUDE.find(inner.as_str()).ok_or_else(parse_err)?;
                let factor = BigInt::from(1024u32).pow(index as u32 + 1);
                value = value.map(|v| v * BigRational::from_integer(factor));
            }
            _ => {}
        }
    }

    let value = value.ok_or_else(parse_err)?;
    Ok(Number::from_ratio(if negative { -value } else { value }))
}

fn build_decimal(pair: Pair<'_, Rule>) -> Option<BigRational> {
    let mut int_digits = String::new();
    let mut frac_digits = String::new();
    let mut exponent: i64 = 0;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::dec_int => int_digits = strip_separators(inner.as_str()),
            Rule::dec_frac => frac_digits = strip_separators(inner.as_str()),
            Rule::dec_exp => exponent = inner.as_str()[1..].parse().ok()?,
            _ => {}
        }
    }

    let mantissa = parse_digits(&format!("{int_digits}{frac_digits}"), 10)?;
    let shift = exponent - frac_digits.len() as i64;
    if shift.abs() > MAX_EXPONENT {
        return None;
    }
    Some(scale_by_power(mantissa, 10, shift))
}

fn build_hex(pair: Pair<'_, Rule>) -> Option<BigRational> {
    let mut int_digits = String::new();
    let mut frac_digits = String::new();
    let mut exponent: i64 = 0;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::hex_int => int_digits = strip_separators(inner.as_str()),
            Rule::hex_frac => frac_digits = strip_separators(inner.as_str()),
            Rule::hex_exp => exponent = inner.as_str()[1..].parse().ok()?,
            _ => {}
        }
    }

    let mantissa = parse_digits(&format!("{int_digits}{frac_digits}"), 16)?;
    // each hex fraction digit is four bits
    let shift = exponent - 4 * frac_digits.len() as i64;
    if shift.abs() > MAX_EXPONENT {
        return None;
    }
    Some(scale_by_power(mantissa, 2, shift))
}

fn build_unit_term<'a>(pair: Pair<'a, Rule>, input: &str) -> Result<(&'a str, i32)> {
    let mut symbol = "";
    let mut power = 1;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::unit_symbol => symbol = inner.as_str(),
            Rule::unit_power => {
                let text = inner.as_str().trim_start_matches('^');
                power = normalize_superscript(text)
                    .parse()
                    .map_err(|_| CalcError::Parse(input.to_string()))?;
            }
            _ => {}
        }
    }
    Ok((symbol, power))
}

/// mantissa * base^shift, exactly
fn scale_by_power(mantissa: BigInt, base: u32, shift: i64) -> BigRational {
    let factor = BigInt::from(base).pow(shift.unsigned_abs() as u32);
    if shift >= 0 {
        BigRational::from_integer(mantissa * factor)
    } else {
        BigRational::new(mantissa, factor)
    }
}

fn parse_digits(digits: &str, radix: u32) -> Option<BigInt> {
    let digits = strip_separators(digits);
    if digits.is_empty() {
        return Some(BigInt::from(0));
    }
    BigInt::parse_bytes(digits.as_bytes(), radix)
}

fn strip_separators(s: &str) -> String {
    s.chars().filter(|c| *c != '_' && *c != ',').collect()
}

/// Map superscript digits and minus to ASCII
pub fn normalize_superscript(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '⁰' => '0',
            '¹' => '1',
            '²' => '2',
            '³' => '3',
            '⁴' => '4',
            '⁵' => '5',
            '⁶' => '6',
            '⁷' => '7',
            '⁸' => '8',
            '⁹' => '9',
            '⁻' => '-',
            other => other,
        })
        .collect()
}

/// Render an integer power with superscript digits
pub fn to_superscript(power: i32) -> String {
    power
        .to_string()
        .chars()
        .map(|c| match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            '-' => '⁻',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_full(input: &str) -> Number {
        let (n, rest) = parse_number_prefix(input).unwrap();
        assert_eq!(rest, "", "unconsumed input for {input}");
        n
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_full("42"), Number::from(42));
        assert_eq!(parse_full("-7"), Number::from(-7));
        assert_eq!(parse_full("1.5").to_string(), "1.5");
        assert_eq!(parse_full(".25").to_string(), "0.25");
        assert_eq!(parse_full("1e3"), Number::from(1000));
        assert_eq!(parse_full("15e-1").to_string(), "1.5");
        assert_eq!(parse_full("1,000,000"), Number::from(1_000_000));
        assert_eq!(parse_full("1_000"), Number::from(1000));
    }

    #[test]
    fn test_parse_prefixed_integers() {
        assert_eq!(parse_full("0b101"), Number::from(5));
        assert_eq!(parse_full("0B110"), Number::from(6));
        assert_eq!(parse_full("0o17"), Number::from(15));
        assert_eq!(parse_full("0x1F"), Number::from(31));
        assert_eq!(parse_full("0X10"), Number::from(16));
        assert_eq!(parse_full("-0x10"), Number::from(-16));
    }

    #[test]
    fn test_parse_hex_float() {
        assert_eq!(parse_full("0x10.8").to_string(), "16.5");
        assert_eq!(parse_full("0x1p-2").to_string(), "0.25");
        assert_eq!(parse_full("0x10p2"), Number::from(64));
    }

    #[test]
    fn test_parse_magnitude() {
        assert_eq!(parse_full("1K"), Number::from(1024));
        assert_eq!(parse_full("1.5K"), Number::from(1536));
        assert_eq!(parse_full("2M"), Number::from(2 * 1024 * 1024));
        assert_eq!(parse_full("0x10K"), Number::from(16 * 1024));
    }

    #[test]
    fn test_only_first_magnitude_consumed() {
        let (n, rest) = parse_number_prefix("1KK").unwrap();
        assert_eq!(n, Number::from(1024));
        assert_eq!(rest, "K");

        let (n, rest) = parse_number_prefix("5kg").unwrap();
        assert_eq!(n, Number::from(5));
        assert_eq!(rest, "kg");
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        assert!(parse_number_prefix("abc").is_err());
        assert!(parse_number_prefix("-").is_err());
        assert!(parse_number_prefix("").is_err());
    }

    #[test]
    fn test_parse_unit_expr() {
        let terms = parse_unit_expr("kg·m²/s^2").unwrap();
        assert_eq!(
            terms,
            vec![
                UnitTerm { symbol: "kg", power: 1 },
                UnitTerm { symbol: "m", power: 2 },
                UnitTerm { symbol: "s", power: -2 },
            ]
        );

        let terms = parse_unit_expr("m*s⁻¹").unwrap();
        assert_eq!(terms[1], UnitTerm { symbol: "s", power: -1 });
    }

    #[test]
    fn test_parse_unit_expr_rejects_second_slash() {
        assert!(parse_unit_expr("m/s/s").is_err());
        assert!(parse_unit_expr("m/").is_err());
        assert!(parse_unit_expr("").is_err());
        assert!(parse_unit_expr("1").is_err());
        assert!(parse_unit_expr("2/s").is_err());
    }

    #[test]
    fn test_parse_inverse_unit() {
        assert_eq!(
            parse_unit_expr("1/s·A").unwrap(),
            vec![
                UnitTerm { symbol: "s", power: -1 },
                UnitTerm { symbol: "A", power: -1 },
            ]
        );
    }

    #[test]
    fn test_superscript_round_trip() {
        assert_eq!(to_superscript(-12), "⁻¹²");
        assert_eq!(normalize_superscript("⁻¹²"), "-12");
    }
}
