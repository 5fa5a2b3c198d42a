//! dimcalc - RPN calculator with units
//!
//! Usage:
//!   dimcalc 5 km 3 mi +          # Tokens as arguments
//!   dimcalc -x 255               # Also show hex
//!   du -k * | dimcalc -c 1 @+    # Sum a column read from stdin

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dimcalc_core::{Base, Calculator, EvalConfig, RateTable};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "dimcalc")]
#[command(about = "An RPN calculator with exact arithmetic and units", long_about = None)]
struct Args {
    /// Show binary representation of integers
    #[arg(short = 'b')]
    binary: bool,

    /// Show octal representation of integers
    #[arg(short = 'o')]
    octal: bool,

    /// Show hex representation of integers
    #[arg(short = 'x')]
    hex: bool,

    /// Show hex representation of integers and fractions
    #[arg(short = 'X')]
    hex_float: bool,

    /// Show IPv4 representation of integers
    #[arg(short = 'i')]
    ipv4: bool,

    /// Show rational representation (numerator/denominator)
    #[arg(short = 'r')]
    rational: bool,

    /// Group decimal digits with ',' and other bases with '_'
    #[arg(short = 'g')]
    group: bool,

    /// Write powers as ^n instead of superscripts
    #[arg(short = 'S')]
    no_superscript: bool,

    /// Decimal places for non-terminating values
    #[arg(short = 'p', value_name = "N", default_value_t = 4)]
    precision: usize,

    /// Show units in base terms only (kg·m/s² instead of N)
    #[arg(long = "base")]
    base_units: bool,

    /// Print the final stack on one line
    #[arg(short = 'O')]
    oneline: bool,

    /// Exchange rates as JSON: {"base": "USD", "rates": {"EUR": 0.92}}
    #[arg(long, value_name = "FILE")]
    rates: Option<PathBuf>,

    /// Column to take from each stdin line (negative counts from the end)
    #[arg(short = 'c', value_name = "N", allow_negative_numbers = true)]
    column: Option<i64>,

    /// Log the stack after every token
    #[arg(short = 't', long)]
    trace: bool,

    /// Log unit application and conversions
    #[arg(long)]
    debug: bool,

    /// Numbers, units and operators
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

impl Args {
    fn config(&self) -> EvalConfig {
        let mut bases = vec![Base::Decimal];
        if self.binary {
            bases.push(Base::Binary);
        }
        if self.octal {
            bases.push(Base::Octal);
        }
        if self.hex || self.hex_float {
            bases.push(Base::Hex);
        }

        EvalConfig::new()
            .with_bases(bases)
            .with_hex_float(self.hex_float)
            .with_grouping(self.group.then_some(','))
            .with_precision(self.precision)
            .with_base_units_only(self.base_units)
            .with_superscript(!self.no_superscript)
            .with_ipv4(self.ipv4)
            .with_rational(self.rational)
    }

    fn log_level(&self) -> Level {
        if self.trace {
            Level::TRACE
        } else if self.debug {
            Level::DEBUG
        } else {
            Level::WARN
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let piped = !stdin.is_terminal();
    if args.tokens.is_empty() && !piped {
        bail!("no input: pass tokens as arguments or on stdin (see --help)");
    }

    let mut tokens = if piped {
        read_tokens(stdin.lock(), args.column)?
    } else {
        Vec::new()
    };
    tokens.extend(args.tokens.iter().cloned());

    let config = args.config();
    let mut calc = match &args.rates {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading rates from {}", path.display()))?;
            let table: RateTable = text
                .parse()
                .with_context(|| format!("parsing rates in {}", path.display()))?;
            Calculator::with_rates(config, table)
        }
        None => Calculator::new(config),
    };

    calc.eval_all(tokens.as_slice())?;

    if args.oneline {
        println!("{}", calc.oneline());
    } else {
        for line in calc.render() {
            println!("{line}");
        }
    }
    Ok(())
}

/// Non-empty trimmed lines, or one field from each when `column` is set
fn read_tokens(reader: impl BufRead, column: Option<i64>) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    for line in reader.lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match column {
            None | Some(0) => tokens.push(line.to_string()),
            Some(column) => {
                if let Some(field) = select_field(line, column) {
                    tokens.push(field.to_string());
                }
            }
        }
    }
    Ok(tokens)
}

/// 1-based field; negative counts from the end. Short lines yield `None`.
fn select_field(line: &str, column: i64) -> Option<&str> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let index = if column > 0 {
        usize::try_from(column - 1).ok()?
    } else {
        let back = usize::try_from(column.unsigned_abs()).ok()?;
        fields.len().checked_sub(back)?
    };
    fields.get(index).copied()
}
