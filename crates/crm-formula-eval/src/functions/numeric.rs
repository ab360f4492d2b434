//! Numeric functions
//!
//! Operands default to 0 when null or undefined, then convert with `Number(x)`.

use crate::registry::{FunctionRegistry, arg};
use crm_formula_types::FormulaValue;

pub fn register(registry: &mut FunctionRegistry) {
    registry.register("ABS", |args, _| Ok(FormulaValue::Number(number_or_zero(arg(args, 0)).abs())));
    registry.register("MAX", |args, _| {
        Ok(FormulaValue::Number(js_max(number_or_zero(arg(args, 0)), number_or_zero(arg(args, 1)))))
    });
    registry.register("MIN", |args, _| {
        Ok(FormulaValue::Number(js_min(number_or_zero(arg(args, 0)), number_or_zero(arg(args, 1)))))
    });
    registry.register("VALUE", |args, _| Ok(FormulaValue::Number(number_or_zero(arg(args, 0)))));
    registry.register("ISNUMBER", |args, _| Ok(FormulaValue::Boolean(is_number(arg(args, 0)))));
}

/// `Number(x ?? 0)`
pub fn number_or_zero(value: &FormulaValue) -> f64 {
    if value.is_nullish() { 0.0 } else { value.to_number() }
}

/// `ISNUMBER(x)`: finite after conversion, and not empty or nullish
pub fn is_number(value: &FormulaValue) -> bool {
    match value {
        FormulaValue::Null | FormulaValue::Undefined => false,
        FormulaValue::String(s) if s.is_empty() => false,
        other => other.to_number().is_finite(),
    }
}

/// `Math.max` for two operands: NaN wins, `+0` beats `-0`
pub fn js_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else if a == b {
        if a.is_sign_positive() { a } else { b }
    } else if a > b {
        a
    } else {
        b
    }
}

/// `Math.min` for two operands: NaN wins, `-0` beats `+0`
pub fn js_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else if a == b {
        if a.is_sign_negative() { a } else { b }
    } else if a < b {
        a
    } else {
        b
    }
}
