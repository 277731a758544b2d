//! Field validation and display helpers for identity, contact, money and date values.
//!
//! Everything here is stateless. Validators accept raw user or backend input and tolerate
//! surrounding whitespace and lowercase letters; formatters fall back to the trimmed input
//! when a value cannot be interpreted.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use super::domain::TipoPersona;

fn rfc_persona_fisica() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-ZÑ&]{4}[0-9]{6}[A-Z0-9]{3}$").expect("valid RFC (PF) pattern")
    })
}

fn rfc_persona_moral() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-ZÑ&]{3}[0-9]{6}[A-Z0-9]{3}$").expect("valid RFC (PM) pattern")
    })
}

fn curp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Z]{4}[0-9]{6}[HM][A-Z]{5}[A-Z0-9][0-9]$").expect("valid CURP pattern")
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern")
    })
}

fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Accepts either RFC shape: 13 characters for natural persons, 12 for legal persons.
pub fn is_valid_rfc(raw: &str) -> bool {
    let rfc = normalize_identifier(raw);
    rfc_persona_fisica().is_match(&rfc) || rfc_persona_moral().is_match(&rfc)
}

/// RFC validation restricted to the shape expected for the given person type.
pub fn is_valid_rfc_for(raw: &str, tipo_persona: TipoPersona) -> bool {
    let rfc = normalize_identifier(raw);
    match tipo_persona {
        TipoPersona::Pm => rfc_persona_moral().is_match(&rfc),
        TipoPersona::Pf | TipoPersona::PfAe => rfc_persona_fisica().is_match(&rfc),
    }
}

pub fn is_valid_curp(raw: &str) -> bool {
    curp_pattern().is_match(&normalize_identifier(raw))
}

pub fn is_valid_email(raw: &str) -> bool {
    email_pattern().is_match(raw.trim())
}

/// Ten national digits, optionally prefixed with the +52 country code.
fn national_digits(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => Some(digits),
        12 if digits.starts_with("52") => Some(digits[2..].to_string()),
        _ => None,
    }
}

pub fn is_valid_phone(raw: &str) -> bool {
    national_digits(raw).is_some()
}

/// `5512345678` becomes `(55) 1234-5678`.
pub fn format_phone(raw: &str) -> String {
    match national_digits(raw) {
        Some(digits) => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        None => raw.trim().to_string(),
    }
}

/// Peso amount with thousands separators and two decimals, e.g. `$1,234,567.89`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{fraction}")
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_percentage(value: u8) -> String {
    format!("{value}%")
}

/// Signed number of days from `today` until `date` (negative once past).
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    date.signed_duration_since(today).num_days()
}
