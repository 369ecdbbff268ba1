//! Tolerant scalar decoding for fields that spreadsheet imports filled with
//! whatever came to hand: numbers, numeric strings with comma decimals,
//! booleans, formula errors or nulls.

use serde::{Deserialize, Serialize};

/// A raw scalar as it sits in a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Bool(bool),
    Num(f64),
    Text(String),
    /// Dates, arrays, objects: present but not a scalar we can read.
    Other(serde_json::Value),
}

impl Loose {
    /// Numeric reading of the value. Malformed text and non-finite numbers
    /// yield `None` so callers can substitute their own default.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Loose::Num(n) => n.is_finite().then_some(*n),
            Loose::Bool(_) | Loose::Other(_) => None,
            Loose::Text(s) => parse_number(s),
        }
    }

    /// Non-negative integral reading, used for counts.
    pub fn as_count(&self) -> Option<u64> {
        self.as_f64().filter(|n| *n >= 0.0).map(|n| n.round() as u64)
    }

    pub fn as_year(&self) -> Option<i32> {
        self.as_f64().filter(|n| (1900.0..=2200.0).contains(n)).map(|n| n as i32)
    }

    /// Trimmed text reading; numbers are rendered without a trailing `.0`.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            Loose::Text(s) => s.trim().to_string(),
            Loose::Num(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            Loose::Num(n) => n.to_string(),
            Loose::Bool(b) => b.to_string(),
            Loose::Other(_) => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// Reading of an electrification flag.
    pub fn as_flag(&self) -> bool {
        match self {
            Loose::Bool(b) => *b,
            Loose::Num(n) => *n != 0.0,
            Loose::Text(s) => matches!(
                s.trim().to_lowercase().as_str(),
                "ya" | "y" | "yes" | "sudah" | "true" | "1" | "berlistrik"
            ),
            Loose::Other(_) => false,
        }
    }
}

/// Parse a number written either as `1234.5`, `1234,5`, or with thousands
/// separators such as `1.234.567`.
fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() { return None }
    if let Ok(n) = s.parse::<f64>() { return n.is_finite().then_some(n) }

    let dots = s.matches('.').count();
    let commas = s.matches(',').count();
    let cleaned = match (dots, commas) {
        (0, 1) => s.replace(',', "."),
        (d, 0) if d > 1 => s.replace('.', ""),
        (_, 1) => s.replace('.', "").replace(',', "."),
        (0, c) if c > 1 => s.replace(',', ""),
        (1, c) if c > 1 => s.replace(',', ""),
        _ => return None,
    };
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[inline] pub(crate) fn f64_of(value: &Option<Loose>) -> Option<f64> { value.as_ref().and_then(Loose::as_f64) }
#[inline] pub(crate) fn count_of(value: &Option<Loose>) -> Option<u64> { value.as_ref().and_then(Loose::as_count) }
#[inline] pub(crate) fn year_of(value: &Option<Loose>) -> Option<i32> { value.as_ref().and_then(Loose::as_year) }
#[inline] pub(crate) fn text_of(value: &Option<Loose>) -> Option<String> { value.as_ref().and_then(Loose::as_text) }
