//! # Numeric Module
//!
//! Turns what the user typed into decimals, and decimals back into the text
//! a form field shows.
//!
//! ## Why Decimal, Not f64?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    1.83 × 30 = 54.900000000000006   ← ends up in the cantidad field    │
//! │                                                                         │
//! │  With rust_decimal:                                                     │
//! │    1.83 × 30 = 54.90 → rendered "54.9"                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Parsing Rules
//! Parsing is lenient because it runs on every keystroke:
//! - surrounding whitespace is ignored
//! - `,` counts as the decimal separator
//! - the longest numeric prefix is used ("12kg" → 12)
//! - anything else, including the empty string, is zero

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parses user text into a decimal, falling back to zero.
///
/// ## Example
/// ```rust
/// use compras_core::numeric::parse_lenient;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_lenient("12,5"), Decimal::new(125, 1));
/// assert_eq!(parse_lenient("30 u"), Decimal::from(30));
/// assert!(parse_lenient("").is_zero());
/// assert!(parse_lenient("abc").is_zero());
/// ```
pub fn parse_lenient(raw: &str) -> Decimal {
    let prefix = numeric_prefix(raw.trim());
    Decimal::from_str(&prefix).unwrap_or(Decimal::ZERO)
}

/// Extracts the leading `[+-]digits[.digits]` run, normalising `,` to `.`.
fn numeric_prefix(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut seen_dot = false;

    for (i, c) in text.chars().enumerate() {
        match c {
            '+' if i == 0 => {}
            '-' if i == 0 => out.push(c),
            '0'..='9' => out.push(c),
            '.' | ',' if !seen_dot => {
                seen_dot = true;
                out.push('.');
            }
            _ => break,
        }
    }

    // "12." and "-" are valid mid-typing states but not valid decimals
    while out.ends_with('.') {
        out.pop();
    }
    if out == "-" {
        out.clear();
    }
    out
}

/// Rounds half away from zero to `dp` places and renders exactly `dp` digits.
///
/// ## Example
/// ```rust
/// use compras_core::numeric::render_fixed;
/// use rust_decimal::Decimal;
///
/// assert_eq!(render_fixed(Decimal::from(12000), 2), "12000.00");
/// assert_eq!(render_fixed(Decimal::new(18333, 4), 2), "1.83");
/// ```
pub fn render_fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Renders a decimal without trailing zeros ("45.0" → "45").
pub fn render_exact(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Returns `Some(numerator / denominator)` when both are strictly positive.
#[inline]
pub fn positive_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if numerator > Decimal::ZERO && denominator > Decimal::ZERO {
        numerator.checked_div(denominator)
    } else {
        None
    }
}

/// Returns `Some(a * b)` when both are strictly positive.
#[inline]
pub fn positive_product(a: Decimal, b: Decimal) -> Option<Decimal> {
    if a > Decimal::ZERO && b > Decimal::ZERO {
        a.checked_mul(b)
    } else {
        None
    }
}

/// Purchase cost of a line, `cantidad × precio`, clamped to the `Decimal`
/// range instead of overflowing.
#[inline]
pub fn line_cost(cantidad: Decimal, precio: Decimal) -> Decimal {
    cantidad.saturating_mul(precio)
}

// =============================================================================
// Unit Tests
// =============================================================================
