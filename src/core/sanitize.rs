// src/core/sanitize.rs
//
// Text cleaning shared by the scrapers and the matcher.
//
// Storefront text, portal text and hand-edited spreadsheet text disagree on
// case, spacing and decoration. Everything that gets compared goes through
// `normalize` (names, categories) or `format_number` (prices) first.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::error::{Error, Result};

/// Collapse whitespace runs to a single space and trim both ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

// Combining marks (Arabic harakat, detached accents) count as decoration,
// not letters, even where Unicode calls them alphabetic.
#[inline]
fn is_kept(ch: char) -> bool {
    if is_combining_mark(ch) {
        return false;
    }
    ch.is_alphanumeric() || ch.is_whitespace() || matches!(ch, '_' | '-' | '.' | '\\')
}

/// Comparison key for free text.
///
/// Input is NFC-composed first, so precomposed and decomposed accents agree.
///
/// 1. drop every char that is not a letter, digit, `_`, `-`, `.`, `\` or space
/// 2. collapse whitespace and trim
/// 3. lower-case
/// 4. remove the remaining spaces
///
/// `"Extra Cheese (Full)"` and `"extra cheese full"` both become
/// `"extracheesefull"`.
pub fn normalize(text: &str) -> String {
    let kept: String = text.nfc().filter(|&c| is_kept(c)).collect();
    normalize_ws(&kept)
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Render a number the way the portal prints it: integral values without a
/// decimal point (`12.0` -> `"12"`), everything else in its shortest form.
pub fn format_number(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(Error::InvalidArgument(format!("not a number: {value}")));
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        // also folds -0.0 into "0"
        return Ok(format!("{}", value as i64));
    }
    Ok(format!("{value}"))
}

/// Strict numeric parse for spreadsheet cells and form values.
pub fn parse_number(text: &str) -> Result<f64> {
    let t = text.trim();
    t.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidArgument(format!("not a number: {t:?}")))
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("static regex"))
}

/// First number embedded in free text: `"AED 12.50"` -> `Some(12.5)`,
/// `"Choose up to 3"` -> `Some(3.0)`.
pub fn first_number(text: &str) -> Option<f64> {
    number_re()
        .find(&text.replace(',', ""))
        .and_then(|m| m.as_str().parse().ok())
}

/// Price from storefront text; no number at all means free.
pub fn parse_price(text: &str) -> f64 {
    first_number(text).unwrap_or(0.0)
}

/// `"EXTRA   toppings"` -> `"Extra Toppings"`.
pub fn capitalize_words(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Drop everything from the first `(`: `"Fries (Large)"` -> `"Fries"`.
pub fn cut_at_paren(s: &str) -> String {
    match s.find('(') {
        Some(i) => s[..i].trim().to_string(),
        None => s.trim().to_string(),
    }
}
