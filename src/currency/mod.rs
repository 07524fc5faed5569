//! Supported currencies and how amounts in each are written.
//!
//! The table doubles as the set of codes the stores accept, so validation
//! and formatting cannot drift apart.

use crate::errors::ValidationError;

/// Formatting rule for a single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub code: &'static str,
    pub symbol: &'static str,
    /// Comma as decimal separator and dot for grouping (`1.234,56`).
    pub decimal_comma: bool,
    pub decimals: bool,
    pub spaced: bool,
    /// Symbol after the number instead of before it.
    pub symbol_after: bool,
}

const fn rule(
    code: &'static str,
    symbol: &'static str,
    decimal_comma: bool,
    decimals: bool,
    spaced: bool,
    symbol_after: bool,
) -> CurrencyFormat {
    CurrencyFormat {
        code,
        symbol,
        decimal_comma,
        decimals,
        spaced,
        symbol_after,
    }
}

pub const CURRENCIES: [CurrencyFormat; 30] = [
    rule("usd", "$", false, true, false, false),
    rule("eur", "€", true, true, false, false),
    rule("gbp", "£", false, true, false, false),
    rule("jpy", "¥", false, false, false, false),
    rule("cny", "¥", false, true, false, false),
    rule("krw", "₩", false, false, false, false),
    rule("inr", "₹", false, true, false, false),
    rule("rub", "₽", true, true, false, false),
    rule("brl", "R$", true, true, false, false),
    rule("zar", "R", false, true, true, true),
    rule("aed", "AED", false, true, true, true),
    rule("aud", "A$", false, true, false, false),
    rule("cad", "C$", false, true, false, false),
    rule("chf", "Fr", false, true, true, true),
    rule("hkd", "HK$", false, true, false, false),
    rule("bdt", "৳", false, true, false, false),
    rule("sgd", "S$", false, true, false, false),
    rule("thb", "฿", false, true, false, false),
    rule("try", "₺", true, true, false, false),
    rule("mxn", "Mex$", false, true, false, false),
    rule("php", "₱", false, true, false, false),
    rule("pln", "zł", true, true, true, true),
    rule("sek", "kr", false, true, true, true),
    rule("nzd", "NZ$", false, true, false, false),
    rule("dkk", "kr.", true, true, true, true),
    rule("idr", "Rp", false, true, true, true),
    rule("ils", "₪", false, true, false, false),
    rule("vnd", "₫", true, false, true, true),
    rule("myr", "RM", false, true, false, false),
    rule("mad", "DH", false, true, true, true),
];

/// Used for codes outside the table.
pub const FALLBACK_FORMAT: CurrencyFormat = rule("usd", "$", false, true, false, false);

pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "ms"];

pub fn lookup(code: &str) -> Option<&'static CurrencyFormat> {
    let code = code.trim();
    CURRENCIES
        .iter()
        .find(|format| format.code.eq_ignore_ascii_case(code))
}

pub fn format_for(code: &str) -> &'static CurrencyFormat {
    lookup(code).unwrap_or(&FALLBACK_FORMAT)
}

pub fn is_supported_currency(code: &str) -> bool {
    lookup(code).is_some()
}

/// Returns the canonical lowercase code, or rejects it.
pub fn normalize_currency(code: &str) -> Result<String, ValidationError> {
    lookup(code)
        .map(|format| format.code.to_string())
        .ok_or_else(|| ValidationError::UnsupportedCurrency(code.to_string()))
}

pub fn normalize_language(language: &str) -> Result<String, ValidationError> {
    let candidate = language.trim().to_ascii_lowercase();
    if SUPPORTED_LANGUAGES.contains(&candidate.as_str()) {
        Ok(candidate)
    } else {
        Err(ValidationError::UnsupportedLanguage(language.to_string()))
    }
}

/// Writes the absolute value of `amount` the way the currency expects.
pub fn format_amount(amount: f64, code: &str) -> String {
    let format = format_for(code);
    let number = if format.decimals {
        group_with_decimals(amount.abs(), format.decimal_comma)
    } else {
        group_digits(&format!("{:.0}", amount.abs()), ',')
    };
    let gap = if format.spaced { " " } else { "" };
    if format.symbol_after {
        format!("{number}{gap}{}", format.symbol)
    } else {
        format!("{}{gap}{number}", format.symbol)
    }
}

fn group_with_decimals(amount: f64, decimal_comma: bool) -> String {
    let fixed = format!("{amount:.2}");
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    if decimal_comma {
        format!("{},{}", group_digits(integer, '.'), fraction)
    } else {
        format!("{}.{}", group_digits(integer, ','), fraction)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.chars().count();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}
