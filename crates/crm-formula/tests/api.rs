//! End-to-end tests of the facade API

use crm_formula::{
    FormulaEngine, FormulaError, FormulaValue, FunctionRegistry, Record, TokenKind,
    evaluate_formula, tokenize,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn record(value: serde_json::Value) -> Record {
    Record::from_json(value).unwrap()
}

#[rstest]
#[case("ISBLANK(x)", json!({"x": ""}), true)]
#[case("ISBLANK(x)", json!({"x": "val"}), false)]
#[case("a == b", json!({"a": 1, "b": "1"}), true)]
#[case("a != b", json!({"a": true, "b": "true"}), false)]
#[case("a > b", json!({"a": 10, "b": 9}), true)]
#[case("a > b", json!({"a": "apple", "b": "banana"}), false)]
#[case("contains(field, 'abc')", json!({"field": "XABCX"}), true)]
#[case("account.name == 'Acme'", json!({"account": {"name": "Acme"}}), true)]
#[case("account.name == 'Acme'", json!({"account": null}), false)]
#[case("(a AND b) OR c", json!({"a": true, "b": false, "c": true}), true)]
#[case("a AND (b OR c)", json!({"a": true, "b": false, "c": true}), true)]
fn test_documented_behaviour(
    #[case] formula: &str,
    #[case] fields: serde_json::Value,
    #[case] expected: bool,
) {
    let value = evaluate_formula(formula, &record(fields)).unwrap();
    assert_eq!(value, FormulaValue::Boolean(expected));
}

#[test]
fn test_unknown_function_is_an_evaluation_error() {
    let err = evaluate_formula("FOO(1)", &Record::new()).unwrap_err();
    assert!(matches!(err, FormulaError::Evaluation { .. }));
    assert_eq!(err.to_string(), "FML0101: Unknown function: FOO");
}

#[test]
fn test_grammar_error_is_a_parse_error() {
    let err = evaluate_formula("LEN(name", &Record::new()).unwrap_err();
    assert!(matches!(err, FormulaError::Parse { .. }));
    let diagnostic = err.to_diagnostic();
    assert!(diagnostic.help.is_some());
}

#[test]
fn test_non_boolean_results_are_returned_as_is() {
    let fields = record(json!({"name": "Acme"}));
    assert_eq!(
        evaluate_formula("UPPER(name)", &fields).unwrap(),
        FormulaValue::string("ACME")
    );
    assert!(evaluate_formula("LEN(name)", &fields).unwrap().is_truthy());
}

#[test]
fn test_nested_relations() {
    let fields = record(json!({
        "account": {"owner": {"email": ""}, "contacts": [{"name": "Ann"}]},
    }));
    assert_eq!(
        evaluate_formula("ISBLANK(account.owner.email)", &fields).unwrap(),
        FormulaValue::Boolean(true)
    );
    assert_eq!(
        evaluate_formula("account.contacts.length == 1", &fields).unwrap(),
        FormulaValue::Boolean(true)
    );
    assert_eq!(
        evaluate_formula("account.contacts.0.name == 'Ann'", &fields).unwrap(),
        FormulaValue::Boolean(true)
    );
}

#[test]
fn test_custom_function() {
    let functions = FunctionRegistry::builder()
        .function("is_even", |args, _| {
            Ok(FormulaValue::Boolean(crm_formula::eval::arg(args, 0).to_number() % 2.0 == 0.0))
        })
        .build();
    let engine = FormulaEngine::new().with_functions(functions);

    let fields = record(json!({"seats": 4}));
    assert_eq!(
        engine.evaluate("IS_EVEN(seats)", &fields).unwrap(),
        FormulaValue::Boolean(true)
    );
    assert_eq!(
        engine.evaluate("NOT Is_Even(seats)", &fields).unwrap(),
        FormulaValue::Boolean(false)
    );
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = std::sync::Arc::new(FormulaEngine::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                let fields = Record::new().with_field("n", f64::from(i));
                engine.evaluate("n >= 2", &fields).unwrap()
            })
        })
        .collect();

    let results: Vec<FormulaValue> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        results,
        vec![
            FormulaValue::Boolean(false),
            FormulaValue::Boolean(false),
            FormulaValue::Boolean(true),
            FormulaValue::Boolean(true),
        ]
    );
}

#[test]
fn test_tokenize_reexport() {
    let kinds: Vec<TokenKind> = tokenize("NOT_BLANK(email)").iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Function,
            TokenKind::LParen,
            TokenKind::Identifier,
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}
