//! String functions
//!
//! Operands are converted with `String(x ?? '')`: null and undefined read as
//! the empty string, everything else uses its JavaScript string form.
//! Lengths and positions count UTF-16 code units, as JavaScript strings do.
//! A cut through a surrogate pair leaves U+FFFD in its place.

use crate::registry::{FunctionRegistry, arg};
use crm_formula_types::{FormulaValue, is_js_whitespace};
use regex::Regex;

pub fn register(registry: &mut FunctionRegistry) {
    registry.register("LEN", |args, _| Ok(len(arg(args, 0))));
    registry.register("CONTAINS", |args, _| Ok(contains(arg(args, 0), arg(args, 1))));
    registry.register("BEGINS", |args, _| Ok(begins(arg(args, 0), arg(args, 1))));
    registry.register("ENDS", |args, _| Ok(ends(arg(args, 0), arg(args, 1))));
    registry.register("REGEX", |args, _| Ok(regex_match(arg(args, 0), arg(args, 1))));
    registry.register("UPPER", |args, _| Ok(FormulaValue::String(arg(args, 0).to_text().to_uppercase())));
    registry.register("LOWER", |args, _| Ok(FormulaValue::String(arg(args, 0).to_text().to_lowercase())));
    registry.register("TRIM", |args, _| Ok(trim(arg(args, 0))));
    registry.register("LEFT", |args, _| Ok(left(arg(args, 0), arg(args, 1))));
    registry.register("RIGHT", |args, _| Ok(right(arg(args, 0), arg(args, 1))));
    registry.register("TEXT", |args, _| Ok(FormulaValue::String(arg(args, 0).to_text())));
}

/// `LEN(x)`: UTF-16 length of the text form
pub fn len(value: &FormulaValue) -> FormulaValue {
    FormulaValue::Number(value.to_text().encode_utf16().count() as f64)
}

/// `CONTAINS(a, b)`: case-insensitive substring test
pub fn contains(haystack: &FormulaValue, needle: &FormulaValue) -> FormulaValue {
    let (haystack, needle) = folded(haystack, needle);
    FormulaValue::Boolean(haystack.contains(&needle))
}

/// `BEGINS(a, b)`: case-insensitive prefix test
pub fn begins(text: &FormulaValue, prefix: &FormulaValue) -> FormulaValue {
    let (text, prefix) = folded(text, prefix);
    FormulaValue::Boolean(text.starts_with(&prefix))
}

/// `ENDS(a, b)`: case-insensitive suffix test
pub fn ends(text: &FormulaValue, suffix: &FormulaValue) -> FormulaValue {
    let (text, suffix) = folded(text, suffix);
    FormulaValue::Boolean(text.ends_with(&suffix))
}

fn folded(a: &FormulaValue, b: &FormulaValue) -> (String, String) {
    (a.to_text().to_lowercase(), b.to_text().to_lowercase())
}

/// `REGEX(text, pattern)`: unanchored match.
///
/// Patterns are user-authored; one that fails to compile yields `false`
/// rather than aborting the formula.
pub fn regex_match(text: &FormulaValue, pattern: &FormulaValue) -> FormulaValue {
    let pattern = pattern.to_text();
    match Regex::new(&pattern) {
        Ok(re) => FormulaValue::Boolean(re.is_match(&text.to_text())),
        Err(err) => {
            log::debug!("REGEX pattern {:?} does not compile: {}", pattern, err);
            FormulaValue::Boolean(false)
        }
    }
}

/// `TRIM(x)`: strip leading and trailing whitespace
pub fn trim(value: &FormulaValue) -> FormulaValue {
    FormulaValue::string(value.to_text().trim_matches(is_js_whitespace))
}

/// `LEFT(x, n)`: the first `n` code units
pub fn left(value: &FormulaValue, count: &FormulaValue) -> FormulaValue {
    let units: Vec<u16> = value.to_text().encode_utf16().collect();
    let n = unit_count(count).min(units.len());
    FormulaValue::String(String::from_utf16_lossy(&units[..n]))
}

/// `RIGHT(x, n)`: the last `n` code units
pub fn right(value: &FormulaValue, count: &FormulaValue) -> FormulaValue {
    let units: Vec<u16> = value.to_text().encode_utf16().collect();
    let skip = units.len().saturating_sub(unit_count(count));
    FormulaValue::String(String::from_utf16_lossy(&units[skip..]))
}

/// Length argument: `Number(n ?? 0)` truncated, negative and NaN as zero
fn unit_count(count: &FormulaValue) -> usize {
    let n = if count.is_nullish() { 0.0 } else { count.to_number() };
    if n.is_nan() || n <= 0.0 {
        0
    } else if n >= usize::MAX as f64 {
        usize::MAX
    } else {
        n.trunc() as usize
    }
}
