//! Currency definitions
//!
//! To add a currency, add an entry to the CURRENCIES array. The unit
//! registry picks up every code and alias from here; conversion between
//! currencies is delegated to a [`crate::rates::RateResolver`].

/// Currency metadata
pub struct CurrencyDef {
    /// ISO 4217 style code, also used as the display name (e.g., "USD")
    pub code: &'static str,
    /// Human readable name
    pub description: &'static str,
    /// Accepted spellings in unit expressions, besides the code itself
    pub aliases: &'static [&'static str],
}

pub static CURRENCIES: &[CurrencyDef] = &[
    CurrencyDef {
        code: "USD",
        description: "US dollars",
        aliases: &["usd", "$"],
    },
    CurrencyDef {
        code: "EUR",
        description: "euros",
        aliases: &["eur", "€"],
    },
    CurrencyDef {
        code: "GBP",
        description: "british pounds",
        aliases: &["gbp", "£"],
    },
    CurrencyDef {
        code: "JPY",
        description: "japanese yen",
        aliases: &["jpy", "yen", "¥"],
    },
    CurrencyDef {
        code: "BTC",
        description: "bitcoin",
        aliases: &["btc", "₿"],
    },
];

/// Find a currency by code or alias
pub fn find_currency(symbol: &str) -> Option<&'static CurrencyDef> {
    CURRENCIES
        .iter()
        .find(|def| def.code == symbol || def.aliases.contains(&symbol))
}
