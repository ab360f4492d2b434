//! Logical functions

use crate::registry::{FunctionRegistry, arg};
use crm_formula_types::{FormulaValue, is_js_whitespace};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register("ISBLANK", |args, _| Ok(FormulaValue::Boolean(is_blank(arg(args, 0)))));
    registry.register("NOT_BLANK", |args, _| Ok(FormulaValue::Boolean(!is_blank(arg(args, 0)))));
    // Both branches arrive already evaluated.
    registry.register("IF", |args, _| {
        let branch = if arg(args, 0).is_truthy() { 1 } else { 2 };
        Ok(arg(args, branch).clone())
    });
}

/// Null, undefined, whitespace-only strings and empty arrays are blank
pub fn is_blank(value: &FormulaValue) -> bool {
    match value {
        FormulaValue::Null | FormulaValue::Undefined => true,
        FormulaValue::String(s) => s.chars().all(is_js_whitespace),
        FormulaValue::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&FormulaValue::Null));
        assert!(is_blank(&FormulaValue::Undefined));
        assert!(is_blank(&FormulaValue::string("")));
        assert!(is_blank(&FormulaValue::string(" \t\n")));
        assert!(is_blank(&FormulaValue::Array(vec![])));
        assert!(!is_blank(&FormulaValue::string("x")));
        assert!(!is_blank(&FormulaValue::string("\u{85}")));
        assert!(!is_blank(&FormulaValue::Number(0.0)));
        assert!(!is_blank(&FormulaValue::Boolean(false)));
        assert!(!is_blank(&FormulaValue::from(serde_json::json!({}))));
    }
}
