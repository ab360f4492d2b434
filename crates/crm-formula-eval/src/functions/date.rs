//! Date functions
//!
//! `YEAR`, `MONTH` and `DAY` accept a date value directly; anything else is
//! converted to its string form and parsed. An unparseable operand yields
//! `NaN`, the component of an invalid date. Components are read in the
//! offset the date carries.

use crate::registry::{FunctionRegistry, arg};
use chrono::{DateTime, Datelike, FixedOffset};
use crm_formula_types::{FormulaValue, parse_date};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register("NOW", |_, ctx| Ok(FormulaValue::Date(ctx.now())));
    registry.register("TODAY", |_, ctx| Ok(FormulaValue::Date(ctx.today())));
    registry.register("YEAR", |args, _| Ok(component(arg(args, 0), |d| d.year() as f64)));
    registry.register("MONTH", |args, _| Ok(component(arg(args, 0), |d| d.month() as f64)));
    registry.register("DAY", |args, _| Ok(component(arg(args, 0), |d| d.day() as f64)));
}

/// Interpret a value as a date the way `new Date(String(x))` would
pub fn to_date(value: &FormulaValue) -> Option<DateTime<FixedOffset>> {
    match value {
        FormulaValue::Date(date) => Some(*date),
        other => parse_date(&other.to_js_string()),
    }
}

fn component(value: &FormulaValue, extract: impl Fn(&DateTime<FixedOffset>) -> f64) -> FormulaValue {
    FormulaValue::Number(to_date(value).map(|d| extract(&d)).unwrap_or(f64::NAN))
}
