//! Columnar stack rendering

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::config::{Base, EvalConfig};
use crate::types::{Dimension, Value};

/// Gap between base columns
const COLUMN_GAP: &str = "  ";

/// One column cell, split at the radix point
struct Cell {
    whole: String,
    fraction: String,
}

impl Cell {
    fn new(text: String) -> Self {
        match text.find('.') {
            Some(i) => Self {
                fraction: text[i..].to_string(),
                whole: text[..i].to_string(),
            },
            None => Self::plain(text),
        }
    }

    /// Right-aligned as a whole, for text whose dots are not radix points
    fn plain(text: String) -> Self {
        Self {
            whole: text,
            fraction: String::new(),
        }
    }
}

/// Render the stack top to bottom, one line per value.
///
/// Each enabled base gets a column; integer parts are right-aligned and
/// fractional parts left-aligned so radix points line up. The IPv4 and
/// rational columns follow the bases when enabled.
pub fn render(values: &[Value], config: &EvalConfig) -> Vec<String> {
    let number_fmt = config.number_format();
    let unit_fmt = config.unit_format();
    let rows: Vec<&Value> = values.iter().rev().collect();

    let mut columns: Vec<Vec<Cell>> = config
        .enabled_bases
        .iter()
        .map(|&base| {
            rows.iter()
                .map(|v| match (base, clock_time(v)) {
                    (Base::Decimal, Some(clock)) => Cell::new(clock),
                    _ => Cell::new(v.number.format(base, &number_fmt)),
                })
                .collect()
        })
        .collect();
    if config.show_ipv4 {
        columns.push(
            rows.iter()
                .map(|v| Cell::plain(v.number.to_ipv4().unwrap_or_default()))
                .collect(),
        );
    }
    if config.show_rational {
        columns.push(rows.iter().map(|v| Cell::plain(rational(v))).collect());
    }

    let widths: Vec<(usize, usize)> = columns
        .iter()
        .map(|cells| {
            cells.iter().fold((0, 0), |(w, f), cell| {
                (
                    w.max(cell.whole.chars().count()),
                    f.max(cell.fraction.chars().count()),
                )
            })
        })
        .collect();

    rows.iter()
        .enumerate()
        .map(|(row, value)| {
            let mut line = columns
                .iter()
                .zip(&widths)
                .map(|(cells, &(whole_width, fraction_width))| {
                    let cell = &cells[row];
                    format!(
                        "{}{}{}{}",
                        pad(whole_width, &cell.whole),
                        cell.whole,
                        cell.fraction,
                        pad(fraction_width, &cell.fraction)
                    )
                })
                .collect::<Vec<_>>()
                .join(COLUMN_GAP);
            let unit = value.unit.format(&unit_fmt);
            if !unit.is_empty() {
                line.push(' ');
                line.push_str(&unit);
            }
            line.trim_end().to_string()
        })
        .collect()
}

fn pad(width: usize, text: &str) -> String {
    " ".repeat(width.saturating_sub(text.chars().count()))
}

/// `H:MM:SS` for a plain hour value, `M:SS` for a plain minute value.
///
/// Seconds are rounded to hundredths; a non-zero remainder is shown as
/// `.cc` after the seconds.
fn clock_time(value: &Value) -> Option<String> {
    let seconds_per_unit: u32 = match value.unit.sole(Dimension::Time)?.name.as_str() {
        "hr" => 3600,
        "min" => 60,
        _ => return None,
    };
    let scale = BigRational::from_integer(BigInt::from(seconds_per_unit * 100));
    let centis = (value.number.to_ratio() * scale).round().to_integer();
    let sign = if centis.is_negative() { "-" } else { "" };

    let (seconds, centis) = centis.abs().div_rem(&BigInt::from(100));
    let (minutes, seconds) = seconds.div_rem(&BigInt::from(60));
    let mut text = if seconds_per_unit == 3600 {
        let (hours, minutes) = minutes.div_rem(&BigInt::from(60));
        format!("{sign}{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{minutes}:{seconds:02}")
    };
    if !centis.is_zero() {
        text.push_str(&format!(".{centis:02}"));
    }
    Some(text)
}

/// `(numerator/denominator)` in lowest terms
fn rational(value: &Value) -> String {
    let ratio = value.number.to_ratio();
    format!("({}/{})", ratio.numer(), ratio.denom())
}

/// Render a single value in base 10 with the configured formats
pub fn format_value(value: &Value, config: &EvalConfig) -> String {
    let mut text = clock_time(value)
        .unwrap_or_else(|| value.number.format(Base::Decimal, &config.number_format()));
    if config.show_rational {
        text.push(' ');
        text.push_str(&rational(value));
    }
    let unit = value.unit.format(&config.unit_format());
    if !unit.is_empty() {
        text.push(' ');
        text.push_str(&unit);
    }
    text
}

/// Bottom-to-top, space separated
pub fn oneline(values: &[Value], config: &EvalConfig) -> String {
    values
        .iter()
        .map(|v| format_value(v, config))
        .collect::<Vec<_>>()
        .join(" ")
}
