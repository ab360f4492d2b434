//! Rule set loading and validation through the public API

use crm_formula::diagnostics::{FML0002, FML0101, FML0103, FML0200, FML0201, FML0301};
use crm_formula::rules::{RuleSet, RuleValidator, ValidationRule};
use crm_formula::{FixedClock, FormulaEngine, FormulaError, Record};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use serde_json::json;
use std::io::Write;

const OPPORTUNITY_RULES: &str = r#"{
    "rules": [
        {
            "name": "amount_required",
            "formula": "ISBLANK(amount)",
            "error_message": "Amount is required",
            "error_field": "amount"
        },
        {
            "name": "discount_cap",
            "formula": "discount > 40 AND NOT stage == 'Negotiation'",
            "error_message": "Discounts above 40% need an active negotiation"
        },
        {
            "name": "close_date_future",
            "formula": "stage != 'Closed Won' AND close_date < TODAY()",
            "error_message": "Open opportunities cannot close in the past",
            "error_field": "close_date"
        },
        {
            "name": "legacy_check",
            "formula": "LEN(legacy_code) > 0",
            "error_message": "Legacy codes are retired",
            "active": false
        }
    ]
}"#;

#[fixture]
fn rules_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(OPPORTUNITY_RULES.as_bytes()).unwrap();
    file
}

fn validator(rules: RuleSet) -> RuleValidator {
    let engine = FormulaEngine::new().with_clock(FixedClock::parse("2024-06-15T09:00:00Z").unwrap());
    RuleValidator::with_engine(rules, engine)
}

fn record(value: serde_json::Value) -> Record {
    Record::from_json(value).unwrap()
}

#[rstest]
fn test_load_rule_file(rules_file: tempfile::NamedTempFile) {
    let rules = RuleSet::load(rules_file.path()).unwrap();
    assert_eq!(rules.rules.len(), 4);
    assert_eq!(rules.active_rules().count(), 3);
    assert_eq!(rules.rules[0].error_field.as_deref(), Some("amount"));
    assert!(!rules.rules[3].active);
}

#[rstest]
#[case::clean(json!({"amount": 5000, "discount": 10, "stage": "Prospecting", "close_date": "2024-09-01"}), vec![])]
#[case::missing_amount(json!({"amount": "", "discount": 10, "stage": "Prospecting", "close_date": "2024-09-01"}), vec!["amount_required"])]
#[case::big_discount(json!({"amount": 5000, "discount": 55, "stage": "Prospecting", "close_date": "2024-09-01"}), vec!["discount_cap"])]
#[case::negotiated_discount(json!({"amount": 5000, "discount": 55, "stage": "Negotiation", "close_date": "2024-09-01"}), vec![])]
#[case::past_close(json!({"amount": 5000, "discount": 0, "stage": "Prospecting", "close_date": "2024-01-10"}), vec!["close_date_future"])]
#[case::won_in_past(json!({"amount": 5000, "discount": 0, "stage": "Closed Won", "close_date": "2024-01-10"}), vec![])]
#[case::everything(json!({"discount": 90, "stage": "Prospecting", "close_date": "2023-12-31"}), vec!["amount_required", "discount_cap", "close_date_future"])]
fn test_opportunity_rules(
    rules_file: tempfile::NamedTempFile,
    #[case] fields: serde_json::Value,
    #[case] violated: Vec<&str>,
) {
    let report = validator(RuleSet::load(rules_file.path()).unwrap()).validate(&record(fields));

    let names: Vec<&str> = report.violations.iter().map(|v| v.rule.as_str()).collect();
    assert_eq!(names, violated);
    assert_eq!(report.is_valid(), violated.is_empty());
    assert_eq!(report.evaluated, 3);
    assert_eq!(report.skipped, 1);
    assert!(!report.has_configuration_errors());
}

#[rstest]
#[case("ISBLNK(email)", FML0101)]
#[case("LEN(email", FML0002)]
fn test_broken_rule_is_isolated(#[case] formula: &str, #[case] source_code: crm_formula::diagnostics::ErrorCode) {
    let rules = RuleSet::new(vec![
        ValidationRule::new("broken", formula, "never shown"),
        ValidationRule::new("email_required", "ISBLANK(email)", "Email is required"),
    ]);
    let report = validator(rules).validate(&Record::new());

    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].rule, "email_required");
    assert_eq!(report.configuration_errors.len(), 1);
    assert_eq!(report.configuration_errors[0].code, FML0200);
    assert_eq!(report.configuration_errors[0].source_code, source_code);
}

#[test]
fn test_rule_set_options_are_applied() {
    let rules = RuleSet::from_json(
        r#"{
            "options": {"max_depth": 3},
            "rules": [{"name": "deep", "formula": "((((TRUE))))", "error_message": "m"}]
        }"#,
    )
    .unwrap();
    let report = validator(rules).validate(&Record::new());
    assert_eq!(report.configuration_errors[0].source_code, FML0103);
    assert!(report.is_valid());
}

#[test]
fn test_invalid_rule_files() {
    let err = RuleSet::from_json(r#"{"rules": [{"name": "x"}]}"#).unwrap_err();
    assert_eq!(err.code(), FML0201);

    let err = RuleSet::from_json(r#"{"rules": [{"name": "", "formula": "TRUE", "error_message": "m"}]}"#)
        .unwrap_err();
    assert_eq!(err.code(), FML0200);

    let dir = tempfile::tempdir().unwrap();
    let err = RuleSet::load(dir.path().join("missing.json")).unwrap_err();
    assert_eq!(err.code(), FML0301);
    assert!(matches!(err, FormulaError::System { context: Some(_), .. }));
}

#[test]
fn test_report_json_shape() {
    let rules = RuleSet::new(vec![
        ValidationRule::new("name_required", "ISBLANK(name)", "Name is required").with_error_field("name"),
    ]);
    let report = validator(rules).validate(&Record::new());
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "violations": [{"rule": "name_required", "message": "Name is required", "field": "name"}],
            "configuration_errors": [],
            "evaluated": 1,
            "skipped": 0,
        })
    );
}
