//! Behavioral guarantees of the formula engine
//!
//! Covers:
//! - The inversion contract (truthy result = invalid record)
//! - String-coerced equality and the ordering fallbacks
//! - Eager evaluation of AND, OR and IF
//! - Function name case-insensitivity and the fixed function set
//! - Dot-path resolution and identifier date promotion
//! - Grouping and precedence
//! - Idempotence under a fixed clock

use crm_formula_eval::{EvalError, FixedClock, FormulaEngine, FunctionRegistry, arg};
use crm_formula_types::{FormulaValue, Record};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn engine() -> FormulaEngine {
    FormulaEngine::new().with_clock(FixedClock::parse("2024-06-15T12:00:00Z").unwrap())
}

fn record(value: serde_json::Value) -> Record {
    Record::from_json(value).unwrap()
}

fn eval(formula: &str, fields: serde_json::Value) -> FormulaValue {
    engine().evaluate(formula, &record(fields)).unwrap()
}

fn eval_bool(formula: &str, fields: serde_json::Value) -> bool {
    match eval(formula, fields) {
        FormulaValue::Boolean(b) => b,
        other => panic!("expected a boolean from {formula:?}, got {other:?}"),
    }
}

// ============================================================================
// Inversion contract
// ============================================================================

#[rstest]
#[case(json!({"x": ""}), true)]
#[case(json!({"x": "   "}), true)]
#[case(json!({"x": null}), true)]
#[case(json!({}), true)]
#[case(json!({"x": "val"}), false)]
fn test_required_field_rule(#[case] fields: serde_json::Value, #[case] violated: bool) {
    assert_eq!(eval_bool("ISBLANK(x)", fields), violated);
}

// ============================================================================
// Comparison semantics
// ============================================================================

#[test]
fn test_equality_coerces_to_string() {
    assert!(eval_bool("a == b", json!({"a": 1, "b": "1"})));
    assert!(!eval_bool("a != b", json!({"a": true, "b": "true"})));
}

#[test]
fn test_numeric_then_string_ordering() {
    assert!(eval_bool("a > b", json!({"a": 10, "b": 9})));
    assert!(!eval_bool("a > b", json!({"a": "apple", "b": "banana"})));
    // "10" < "9" as strings, but both are numeric
    assert!(eval_bool("a > b", json!({"a": "10", "b": "9"})));
}

#[test]
fn test_null_path_compares_as_null_string() {
    assert!(eval_bool("account.name == 'Acme'", json!({"account": {"name": "Acme"}})));
    assert!(!eval_bool("account.name == 'Acme'", json!({"account": null})));
    assert!(eval_bool("account.name == 'null'", json!({"account": null})));
}

#[test]
fn test_identifier_date_against_string_literal_uses_string_order() {
    // The field becomes a date, the literal stays a string, so the string
    // fallback decides: "Sat Jun 15 2024 ..." sorts after "2024-01-01".
    assert!(eval_bool("created_at > '2024-01-01'", json!({"created_at": "2024-06-15"})));
    assert!(!eval_bool("created_at < '2024-01-01'", json!({"created_at": "2024-06-15"})));
    assert!(eval_bool("created_at > '2099-01-01'", json!({"created_at": "2024-06-15"})));
}

#[test]
fn test_two_identifier_dates_compare_chronologically() {
    let fields = json!({"start": "2024-01-01", "end": "2024-06-15T09:30:00Z"});
    assert!(eval_bool("end > start", fields.clone()));
    assert!(eval_bool("start <= end", fields.clone()));
    assert!(!eval_bool("start >= end", fields));
}

#[test]
fn test_comparison_is_not_chainable() {
    // `1 < 5` is true; the dangling `< 3` is never applied
    assert_eq!(eval("1 < 5 < 3", json!({})), FormulaValue::Boolean(true));
}

// ============================================================================
// Eager evaluation
// ============================================================================

fn counting_engine(counter: Arc<AtomicUsize>) -> FormulaEngine {
    let functions = FunctionRegistry::builder()
        .function("SIDEEFFECT", move |args, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(arg(args, 0).clone())
        })
        .build();
    engine().with_functions(functions)
}

#[rstest]
#[case("TRUE OR sideEffect()", 1)]
#[case("FALSE AND sideEffect()", 1)]
#[case("sideEffect(TRUE) OR sideEffect() OR sideEffect()", 3)]
#[case("IF(TRUE, 1, sideEffect())", 1)]
#[case("IF(sideEffect(1), sideEffect(2), sideEffect(3))", 3)]
fn test_no_short_circuit(#[case] formula: &str, #[case] expected_calls: usize) {
    let counter = Arc::new(AtomicUsize::new(0));
    counting_engine(counter.clone())
        .evaluate(formula, &Record::new())
        .unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), expected_calls);
}

#[test]
fn test_arguments_run_before_unknown_function_fails() {
    let counter = Arc::new(AtomicUsize::new(0));
    let err = counting_engine(counter.clone())
        .evaluate("FOO(sideEffect())", &Record::new())
        .unwrap_err();
    assert_eq!(err.message(), "Unknown function: FOO");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Function dispatch
// ============================================================================

#[rstest]
#[case("contains(field, 'abc')")]
#[case("CONTAINS(field, 'abc')")]
#[case("Contains(field, 'ABC')")]
fn test_function_names_are_case_insensitive(#[case] formula: &str) {
    assert!(eval_bool(formula, json!({"field": "XABCX"})));
}

#[test]
fn test_unknown_function_is_fatal() {
    let err = engine().try_evaluate("FOO(1)", &Record::new()).unwrap_err();
    assert!(matches!(err, EvalError::UnknownFunction { ref name, .. } if name == "FOO"));
}

#[test]
fn test_unknown_characters_do_not_fail() {
    assert!(eval_bool("x == 'a' ; # @", json!({"x": "a"})));
}

#[rstest]
#[case("(1 == 1", "Expected RPAREN but got EOF (value: null)")]
#[case("1 == ", "Unexpected token: EOF (value: null)")]
#[case(") OR TRUE", "Unexpected token: RPAREN (value: ))")]
#[case("AND", "Unexpected token: AND (value: AND)")]
#[case("LEN('a' 'b')", "Expected RPAREN but got STRING (value: b)")]
#[case("LEN('a',)", "Unexpected token: RPAREN (value: ))")]
fn test_grammar_errors(#[case] formula: &str, #[case] message: &str) {
    let err = engine().evaluate(formula, &Record::new()).unwrap_err();
    assert_eq!(err.message(), message);
}

// ============================================================================
// Grouping and precedence
// ============================================================================

#[rstest]
#[case("(a AND b) OR c", true)]
#[case("a AND (b OR c)", true)]
#[case("a AND b OR c", true)]
#[case("NOT a OR c", true)]
#[case("NOT (a OR c)", false)]
#[case("a AND NOT b", true)]
fn test_grouping(#[case] formula: &str, #[case] expected: bool) {
    assert_eq!(eval_bool(formula, json!({"a": true, "b": false, "c": true})), expected);
}

#[test]
fn test_grouping_changes_result() {
    let fields = json!({"a": false, "b": true, "c": false});
    assert!(!eval_bool("a AND (b OR TRUE)", fields.clone()));
    assert!(eval_bool("(a AND b) OR TRUE", fields));
}

#[test]
fn test_trailing_tokens_are_ignored() {
    assert_eq!(eval("1 2 3", json!({})), FormulaValue::Number(1.0));
}

// ============================================================================
// Idempotence
// ============================================================================

proptest! {
    #[test]
    fn prop_evaluation_is_idempotent(
        formula in prop::sample::select(vec![
            "ISBLANK(name) OR LEN(name) > 10",
            "amount > 1000 AND stage != 'Closed'",
            "YEAR(TODAY()) > YEAR(created_at)",
            "NOW() > created_at",
            "IF(amount > 5, UPPER(name), LOWER(name))",
            "REGEX(name, '^[A-Z]')",
        ]),
        name in "[a-zA-Z ]{0,12}",
        amount in -5000.0f64..5000.0,
        stage in prop::sample::select(vec!["Open", "Closed", ""]),
    ) {
        let record = record(json!({
            "name": name,
            "amount": amount,
            "stage": stage,
            "created_at": "2023-03-01",
        }));
        let engine = engine();
        let first = engine.evaluate(formula, &record);
        let second = engine.evaluate(formula, &record);
        prop_assert_eq!(first.map_err(|e| e.to_string()), second.map_err(|e| e.to_string()));
    }

    #[test]
    fn prop_arbitrary_text_never_panics(formula in "\\PC{0,64}") {
        let _ = engine().evaluate(&formula, &Record::new());
    }
}
