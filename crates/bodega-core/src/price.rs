//! # Price Module
//!
//! Converts between numeric prices and the strings the admin dashboard
//! shows and accepts, using the Colombian-peso convention: `.` groups
//! thousands, `,` separates the two decimal digits.
//!
//! ## The Three String Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where Each Shape Is Used                             │
//! │                                                                         │
//! │  DISPLAY       "$1.250,00"   product cards, tables, cart totals        │
//! │     format_price ──►  ◄── parse_price                                  │
//! │                                                                         │
//! │  INPUT VALUE   "1250,00"     pre-filling an edit form                  │
//! │     number_to_input_value ──►                                          │
//! │                                                                         │
//! │  INPUT MASK    "1.250,5"     what the field shows while typing         │
//! │     format_input_mask ──►  ◄── input_mask_to_number                    │
//! │                                                                         │
//! │  Storage never sees any of these: records keep integer cents           │
//! │  (see `to_cents` / `from_cents`).                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Model
//! Nothing here returns an error. Unreadable text parses as `0.0` and
//! non-finite numbers format as zero. Callers that must distinguish "typed
//! zero" from "typed garbage" use [`is_valid_price`].
//!
//! ## Usage
//! ```rust
//! use bodega_core::price::{format_input_mask, format_price, input_mask_to_number};
//!
//! assert_eq!(format_price(1250.0), "$1.250,00");
//!
//! // Keystroke by keystroke
//! assert_eq!(format_input_mask("1"), "1");
//! assert_eq!(format_input_mask("1250"), "1.250");
//! assert_eq!(format_input_mask("1.2505,759"), "12.505,75");
//! assert_eq!(input_mask_to_number("12.505,75"), 12505.75);
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Price Format
// =============================================================================

/// Locale settings for price strings.
///
/// The free functions in this module use [`PriceFormat::default`]; build a
/// custom value when a screen needs another symbol or wants zero shown in
/// edit forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFormat {
    /// Prefix shown before the amount.
    pub symbol: String,

    /// Thousands grouping separator.
    pub thousands_separator: char,

    /// Decimal separator.
    pub decimal_separator: char,

    /// Render an amount of exactly zero as `""` in edit forms, so the
    /// field shows its placeholder instead of `0,00`.
    pub blank_zero: bool,
}

impl Default for PriceFormat {
    fn default() -> Self {
        PriceFormat {
            symbol: "$".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
            blank_zero: true,
        }
    }
}

impl PriceFormat {
    /// Returns a copy with a different currency symbol.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Returns a copy with zero blanking switched on or off.
    pub fn with_blank_zero(mut self, blank_zero: bool) -> Self {
        self.blank_zero = blank_zero;
        self
    }

    /// Formats an amount for display: symbol, grouped integer part and
    /// exactly two decimals.
    ///
    /// ## Example
    /// ```rust
    /// use bodega_core::price::PriceFormat;
    ///
    /// let fmt = PriceFormat::default();
    /// assert_eq!(fmt.format(1250.0), "$1.250,00");
    /// assert_eq!(fmt.format(0.5), "$0,50");
    /// assert_eq!(fmt.format(1_000_000.999), "$1.000.001,00");
    /// ```
    pub fn format(&self, amount: f64) -> String {
        let (negative, integer, fraction) = split_amount(amount);
        self.display(negative, &integer, fraction)
    }

    /// Formats an amount already held as integer cents.
    pub fn format_cents(&self, cents: i64) -> String {
        let abs = cents.unsigned_abs();
        self.display(cents < 0, &(abs / 100).to_string(), abs % 100)
    }

    fn display(&self, negative: bool, integer: &str, fraction: u64) -> String {
        format!(
            "{}{}{}{}{:02}",
            if negative { "-" } else { "" },
            self.symbol,
            group_digits(integer, self.thousands_separator),
            self.decimal_separator,
            fraction
        )
    }

    /// Reads a display string back into a number, `None` if it is not one.
    ///
    /// Steps: drop the symbol and all whitespace, drop thousands
    /// separators, turn the decimal separator into `.`, then accept only a
    /// plain decimal (optional sign, digits, at most one point).
    pub fn try_parse(&self, text: &str) -> Option<f64> {
        let without_symbol = if self.symbol.is_empty() {
            text.to_string()
        } else {
            text.replace(self.symbol.as_str(), "")
        };

        let normalized: String = without_symbol
            .chars()
            .filter(|c| !c.is_whitespace() && *c != self.thousands_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();

        parse_decimal(&normalized)
    }

    /// Reads a display string back into a number, `0.0` if it is not one.
    pub fn parse(&self, text: &str) -> f64 {
        self.try_parse(text).unwrap_or(0.0)
    }

    /// True iff the text reads as a non-negative amount.
    pub fn is_valid(&self, text: &str) -> bool {
        self.try_parse(text).is_some_and(|value| value >= 0.0)
    }

    /// Re-formats a text field on every keystroke.
    ///
    /// ## Algorithm
    /// ```text
    /// raw "1.2505,759"
    ///      │  keep digits and the decimal comma
    ///      ▼
    /// "12505,759"
    ///      │  split at the first comma
    ///      ▼
    /// integer "12505"        fraction "759"
    ///      │                      │ keep two digits
    ///      ▼                      ▼
    /// "12.505"               "75"
    ///      └──────── "12.505,75" ─┘
    /// ```
    ///
    /// A trailing comma survives (`"12,"`) so the user can keep typing
    /// decimals. Running the mask over its own output changes nothing.
    pub fn input_mask(&self, raw: &str) -> String {
        let filtered: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == self.decimal_separator)
            .collect();

        if filtered.is_empty() {
            return String::new();
        }

        let mut parts = filtered.split(self.decimal_separator);
        let integer = parts.next().unwrap_or("");
        let fraction = parts.next();

        let mut masked = group_digits(integer, self.thousands_separator);
        if let Some(fraction) = fraction {
            masked.push(self.decimal_separator);
            masked.extend(fraction.chars().take(2));
        }

        masked
    }

    /// Reads masked field text into a number, `0.0` when empty or unreadable.
    pub fn mask_to_number(&self, masked: &str) -> f64 {
        let normalized: String = masked
            .trim()
            .chars()
            .filter(|c| *c != self.thousands_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();

        parse_decimal(&normalized).unwrap_or(0.0)
    }

    /// Formats an amount to pre-fill an edit form: two decimals, decimal
    /// comma, no symbol and no grouping.
    ///
    /// With `blank_zero` on, exactly `0` (and non-finite input) becomes `""`.
    pub fn to_input_value(&self, amount: f64) -> String {
        if self.blank_zero && (amount == 0.0 || !amount.is_finite()) {
            return String::new();
        }

        let (negative, integer, fraction) = split_amount(amount);
        format!(
            "{}{}{}{:02}",
            if negative { "-" } else { "" },
            integer,
            self.decimal_separator,
            fraction
        )
    }
}

// =============================================================================
// Free Functions (default locale)
// =============================================================================

/// Formats an amount for display, e.g. `1250.0` → `"$1.250,00"`.
pub fn format_price(amount: f64) -> String {
    PriceFormat::default().format(amount)
}

/// Parses a display string, returning `0.0` for anything unreadable.
///
/// ## Example
/// ```rust
/// use bodega_core::price::parse_price;
///
/// assert_eq!(parse_price("$1.250,00"), 1250.0);
/// assert_eq!(parse_price("$ 19,99"), 19.99);
/// assert_eq!(parse_price("abc"), 0.0);
/// ```
pub fn parse_price(formatted: &str) -> f64 {
    PriceFormat::default().parse(formatted)
}

/// Form gate: true iff the text is a readable, non-negative price.
///
/// ## Example
/// ```rust
/// use bodega_core::price::is_valid_price;
///
/// assert!(is_valid_price("$1.250,00"));
/// assert!(is_valid_price("0"));
/// assert!(!is_valid_price("abc"));
/// assert!(!is_valid_price("-5"));
/// ```
pub fn is_valid_price(text: &str) -> bool {
    PriceFormat::default().is_valid(text)
}

/// Keystroke mask for price fields, e.g. `"1250,5"` → `"1.250,5"`.
pub fn format_input_mask(raw: &str) -> String {
    PriceFormat::default().input_mask(raw)
}

/// Inverse of the mask, e.g. `"1.250,5"` → `1250.5`.
pub fn input_mask_to_number(masked: &str) -> f64 {
    PriceFormat::default().mask_to_number(masked)
}

/// Edit-form value, e.g. `1250.5` → `"1250,50"`; `0.0` → `""`.
pub fn number_to_input_value(amount: f64) -> String {
    PriceFormat::default().to_input_value(amount)
}

// =============================================================================
// Cents Bridge
// =============================================================================

/// Largest price a product form accepts, in cents (one trillion).
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000_000;

/// Rounds a display amount to integer cents (half away from zero).
///
/// Non-finite input yields `0`. Amounts beyond the `i64` cent range
/// saturate, so callers storing cents check [`MAX_PRICE_CENTS`] first.
///
/// ## Example
/// ```rust
/// use bodega_core::price::to_cents;
///
/// assert_eq!(to_cents(19.99), 1999);
/// assert_eq!(to_cents(0.125), 13);
/// assert_eq!(to_cents(f64::NAN), 0);
/// ```
pub fn to_cents(amount: f64) -> i64 {
    if !amount.is_finite() {
        return 0;
    }
    // float -> int casts saturate
    (amount * 100.0).round() as i64
}

/// Converts integer cents to a display amount.
#[inline]
pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

// =============================================================================
// Helpers
// =============================================================================

/// From 2^52 up every `f64` is a whole number.
const EXACT_INTEGER: f64 = 4_503_599_627_370_496.0;

/// Splits an amount into sign, integer digits and two rounded decimals
/// without going through a bounded integer type.
fn split_amount(amount: f64) -> (bool, String, u64) {
    if !amount.is_finite() {
        return (false, "0".to_string(), 0);
    }

    let abs = amount.abs();
    let (integer, fraction) = if abs >= EXACT_INTEGER {
        (format!("{abs:.0}"), 0)
    } else {
        // below 2^52 the scaled value stays under u64::MAX
        let cents = (abs * 100.0).round() as u64;
        ((cents / 100).to_string(), cents % 100)
    };

    let negative = amount < 0.0 && (integer != "0" || fraction != 0);
    (negative, integer, fraction)
}

/// Inserts `separator` every three digits counting from the right.
fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.chars().count();
    let mut grouped = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }

    grouped
}

/// Accepts `[+-]digits[.digits]` (either side of the point may be empty,
/// not both) and rejects everything `f64::from_str` would otherwise let
/// through, such as `inf`, `NaN` or exponents.
fn parse_decimal(text: &str) -> Option<f64> {
    let body = text.strip_prefix(['-', '+']).unwrap_or(text);

    let mut digits = 0usize;
    let mut points = 0usize;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return None,
        }
    }

    if digits == 0 || points > 1 {
        return None;
    }

    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_DECIMAL_AMOUNTS: &[f64] = &[
        0.0, 0.01, 0.1, 0.5, 1.0, 9.99, 19.99, 100.0, 999.99, 1000.0, 1250.0, 1250.5, 12_505.75,
        99_999.01, 1_000_000.0, 1_234_567.89,
    ];

    #[test]
    fn test_format_grouping() {
        assert_eq!(format_price(0.0), "$0,00");
        assert_eq!(format_price(5.0), "$5,00");
        assert_eq!(format_price(999.0), "$999,00");
        assert_eq!(format_price(1000.0), "$1.000,00");
        assert_eq!(format_price(1250.0), "$1.250,00");
        assert_eq!(format_price(12_345.6), "$12.345,60");
        assert_eq!(format_price(1_234_567.89), "$1.234.567,89");
    }

    #[test]
    fn test_format_rounds_half_away_from_zero() {
        // 0.125 is exact in binary, so this is a true half
        assert_eq!(format_price(0.125), "$0,13");
        assert_eq!(format_price(-0.125), "-$0,13");
        assert_eq!(format_price(2.994), "$2,99");
    }

    #[test]
    fn test_format_clamps_non_finite() {
        assert_eq!(format_price(f64::NAN), "$0,00");
        assert_eq!(format_price(f64::INFINITY), "$0,00");
        assert_eq!(format_price(f64::NEG_INFINITY), "$0,00");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_price(-1250.0), "-$1.250,00");
        assert_eq!(parse_price("-$1.250,00"), -1250.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_price("$1.250,00"), 1250.0);
        assert_eq!(parse_price("$ 1.250,50"), 1250.5);
        assert_eq!(parse_price("1250"), 1250.0);
        assert_eq!(parse_price("\u{a0}$19,99 "), 19.99);
        assert_eq!(parse_price(",5"), 0.5);
    }

    #[test]
    fn test_parse_invalid_is_zero() {
        assert_eq!(parse_price("abc"), 0.0);
        assert_eq!(parse_price(""), 0.0);
        assert_eq!(parse_price("$"), 0.0);
        assert_eq!(parse_price("1,2,3"), 0.0);
        assert_eq!(parse_price("NaN"), 0.0);
        assert_eq!(parse_price("inf"), 0.0);
        assert_eq!(parse_price("1e5"), 0.0);
        assert_eq!(parse_price("12abc"), 0.0);
    }

    #[test]
    fn test_parse_format_round_trip() {
        for &x in TWO_DECIMAL_AMOUNTS {
            assert_eq!(parse_price(&format_price(x)), x, "round trip of {x}");
        }
    }

    #[test]
    fn test_parse_format_round_trip_rounds_to_cents() {
        let x = 10.0 / 3.0;
        assert_eq!(parse_price(&format_price(x)), 3.33);
        assert_eq!(parse_price(&format_price(2.675_01)), 2.68);
    }

    #[test]
    fn test_large_amounts_do_not_saturate() {
        assert_eq!(format_price(1e17), "$100.000.000.000.000.000,00");
        assert_eq!(format_price(-1e17), "-$100.000.000.000.000.000,00");
        assert_eq!(number_to_input_value(1e17), "100000000000000000,00");

        for x in [9.3e16, 1e17, 123_456_789_012_345_680.0, 1e300, f64::MAX] {
            assert_eq!(parse_price(&format_price(x)), x, "round trip of {x}");
        }
    }

    #[test]
    fn test_is_valid_price() {
        assert!(is_valid_price("$1.250,00"));
        assert!(is_valid_price("0"));
        assert!(is_valid_price("0,99"));
        assert!(!is_valid_price("abc"));
        assert!(!is_valid_price("-5"));
        assert!(!is_valid_price(""));
        assert!(!is_valid_price("   "));
    }

    #[test]
    fn test_input_mask_while_typing() {
        let keystrokes = [
            ("1", "1"),
            ("12", "12"),
            ("125", "125"),
            ("1250", "1.250"),
            ("1.2505", "12.505"),
            ("12.505,", "12.505,"),
            ("12.505,7", "12.505,7"),
            ("12.505,75", "12.505,75"),
            ("12.505,759", "12.505,75"),
        ];

        for (raw, expected) in keystrokes {
            assert_eq!(format_input_mask(raw), expected, "mask of {raw:?}");
        }
    }

    #[test]
    fn test_input_mask_discards_noise() {
        assert_eq!(format_input_mask(""), "");
        assert_eq!(format_input_mask("abc"), "");
        assert_eq!(format_input_mask("$ 1a2b3c4"), "1.234");
        assert_eq!(format_input_mask("-5"), "5");
        assert_eq!(format_input_mask(","), ",");
        assert_eq!(format_input_mask("1,2,3"), "1,2");
        assert_eq!(format_input_mask("1000000"), "1.000.000");
    }

    #[test]
    fn test_input_mask_idempotent() {
        let samples = [
            "", "0", "7", "1250", "1.250,5", "12,", ",", ",,", "1,2,3", "abc", "9999999,999",
            "$ 1.2.3.4,56", "00012", "1..2", " 12 345 ,6",
        ];

        for s in samples {
            let once = format_input_mask(s);
            assert_eq!(format_input_mask(&once), once, "idempotence of {s:?}");
        }
    }

    #[test]
    fn test_input_mask_to_number() {
        assert_eq!(input_mask_to_number("1.250,5"), 1250.5);
        assert_eq!(input_mask_to_number("12,"), 12.0);
        assert_eq!(input_mask_to_number(",75"), 0.75);
        assert_eq!(input_mask_to_number(""), 0.0);
        assert_eq!(input_mask_to_number(","), 0.0);
        assert_eq!(input_mask_to_number("abc"), 0.0);
    }

    #[test]
    fn test_number_to_input_value() {
        assert_eq!(number_to_input_value(1250.5), "1250,50");
        assert_eq!(number_to_input_value(0.99), "0,99");
        assert_eq!(number_to_input_value(1_000_000.0), "1000000,00");
        assert_eq!(number_to_input_value(0.0), "");
    }

    #[test]
    fn test_zero_shown_when_blanking_disabled() {
        let fmt = PriceFormat::default().with_blank_zero(false);
        assert_eq!(fmt.to_input_value(0.0), "0,00");
        assert_eq!(fmt.to_input_value(f64::NAN), "0,00");
    }

    #[test]
    fn test_mask_round_trip() {
        for &x in TWO_DECIMAL_AMOUNTS.iter().filter(|x| **x != 0.0) {
            let masked = format_input_mask(&number_to_input_value(x));
            assert_eq!(input_mask_to_number(&masked), x, "mask round trip of {x}");
        }
    }

    #[test]
    fn test_custom_symbol() {
        let fmt = PriceFormat::default().with_symbol("Bs. ");
        assert_eq!(fmt.format(1250.0), "Bs. 1.250,00");
        assert_eq!(fmt.parse("Bs. 1.250,00"), 1250.0);
    }

    #[test]
    fn test_cents_bridge() {
        assert_eq!(to_cents(1250.5), 125_050);
        assert_eq!(to_cents(-0.125), -13);
        assert_eq!(from_cents(125_050), 1250.5);
        assert_eq!(PriceFormat::default().format_cents(125_050), "$1.250,50");
    }
}
