//! JavaScript coercion rules
//!
//! Formulas were authored against JavaScript semantics, and deployed rules
//! depend on them: `1 == "1"` holds because equality compares `String(x)`,
//! `"" > -1` is numeric because `Number("")` is `0`, and so on. The helpers
//! here reproduce those conversions exactly:
//! - `string_to_number` is `Number(s)` for strings
//! - `format_js_number` is `String(n)` for numbers
//! - `compare_js_strings` is the `<`/`>` order JavaScript uses for strings

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static DECIMAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("decimal literal pattern is valid")
});

/// Whitespace as matched by JavaScript's `\s` and stripped by `trim()`.
///
/// Unicode `White_Space` minus NEL (U+0085), plus the byte order mark.
pub fn is_js_whitespace(ch: char) -> bool {
    (ch.is_whitespace() && ch != '\u{85}') || ch == '\u{feff}'
}

/// JavaScript `Number(s)` for a string.
///
/// Surrounding whitespace is ignored, the empty string is `0`, `Infinity`
/// is recognized with an optional sign, and `0x`/`0o`/`0b` prefixes are
/// accepted without a sign. Anything else that is not a decimal literal is
/// `NaN`.
pub fn string_to_number(input: &str) -> f64 {
    let s = input.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix_prefixed = s
        .get(..2)
        .and_then(|prefix| match prefix {
            "0x" | "0X" => Some(16),
            "0o" | "0O" => Some(8),
            "0b" | "0B" => Some(2),
            _ => None,
        })
        .map(|radix| (radix, &s[2..]));

    if let Some((radix, digits)) = radix_prefixed {
        return parse_radix(digits, radix);
    }

    if DECIMAL_LITERAL.is_match(s) {
        s.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut value = 0.0_f64;
    for ch in digits.chars() {
        match ch.to_digit(radix) {
            Some(d) => value = value * f64::from(radix) + f64::from(d),
            None => return f64::NAN,
        }
    }
    value
}

/// JavaScript `String(n)` for a number.
///
/// Uses the shortest round-trip digits, then lays them out the way
/// `Number.prototype.toString()` does: plain notation for exponents in
/// `[-7, 21)`, `d.ddde+N` otherwise.
pub fn format_js_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    let sci = format!("{:e}", n.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let k = digits.len() as i32;
    let point = exponent + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int_part, frac_part) = digits.split_at(point as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let e = point - 1;
        let exp_sign = if e >= 0 { "+" } else { "-" };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, exp_sign, e.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, exp_sign, e.abs())
        }
    };

    format!("{}{}", sign, body)
}

/// Order two strings the way JavaScript's relational operators do:
/// lexicographically by UTF-16 code unit.
pub fn compare_js_strings(left: &str, right: &str) -> Ordering {
    left.encode_utf16().cmp(right.encode_utf16())
}
