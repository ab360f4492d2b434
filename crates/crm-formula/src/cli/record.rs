//! Building records from files and `name=value` flags

use crate::types::{FormulaValue, Record};
use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::Path;

/// Load a record from a JSON object file
pub fn load_record(path: &Path) -> Result<Record> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record file: {}", path.display()))?;
    Record::from_json_str(&text)
        .with_context(|| format!("Failed to parse record file: {}", path.display()))
}

/// Parse one `name=value` assignment.
///
/// The value is read as JSON when it parses as JSON (numbers, booleans,
/// `null`, objects, arrays, quoted strings) and as a bare string otherwise.
pub fn parse_assignment(assignment: &str) -> Result<(String, FormulaValue)> {
    let Some((name, value_str)) = assignment.split_once('=') else {
        anyhow::bail!("Invalid field format: '{}'. Expected 'name=value'", assignment);
    };

    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Invalid field format: '{}'. Field name is empty", assignment);
    }

    let value_str = value_str.trim();
    let value: Value = serde_json::from_str(value_str).unwrap_or_else(|_| json!(value_str));

    Ok((name.to_string(), FormulaValue::from(value)))
}

/// Apply `name=value` assignments on top of a record
pub fn apply_assignments(record: &mut Record, assignments: &[String]) -> Result<()> {
    for assignment in assignments {
        let (name, value) = parse_assignment(assignment)?;
        record.insert(name, value);
    }
    Ok(())
}

/// Load an optional record file and apply assignments
pub fn build_record(path: Option<&Path>, assignments: &[String]) -> Result<Record> {
    let mut record = match path {
        Some(path) => load_record(path)?,
        None => Record::new(),
    };
    apply_assignments(&mut record, assignments)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_assignment() {
        let cases = [
            ("name=John", FormulaValue::string("John")),
            ("age=30", FormulaValue::Number(30.0)),
            ("active=true", FormulaValue::Boolean(true)),
            ("score=98.5", FormulaValue::Number(98.5)),
            ("owner=null", FormulaValue::Null),
            ("closed=2024-01-01", FormulaValue::string("2024-01-01")),
            (r#"code="123""#, FormulaValue::string("123")),
            ("empty=", FormulaValue::string("")),
            ("limit=inf", FormulaValue::string("inf")),
        ];

        for (input, expected) in cases {
            let (_, value) = parse_assignment(input).unwrap();
            assert_eq!(value, expected, "{input}");
        }
    }

    #[test]
    fn test_parse_assignment_json() {
        let (name, value) = parse_assignment(r#"account={"name": "Acme"}"#).unwrap();
        assert_eq!(name, "account");
        assert_eq!(value, FormulaValue::from(json!({"name": "Acme"})));

        let (_, value) = parse_assignment("tags=[1,2,3]").unwrap();
        assert_eq!(value, FormulaValue::from(json!([1, 2, 3])));
    }

    #[test]
    fn test_parse_assignment_keeps_equals_in_value() {
        let (name, value) = parse_assignment("formula=a==b").unwrap();
        assert_eq!(name, "formula");
        assert_eq!(value, FormulaValue::string("a==b"));
    }

    #[test]
    fn test_parse_assignment_invalid() {
        assert!(parse_assignment("invalid").is_err());
        assert!(parse_assignment("=value").is_err());
    }

    #[test]
    fn test_build_record_from_file_and_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "Acme", "amount": 10}}"#).unwrap();

        let record = build_record(Some(file.path()), &["amount=20".to_string()]).unwrap();
        assert_eq!(record.get("name"), Some(&FormulaValue::string("Acme")));
        assert_eq!(record.get("amount"), Some(&FormulaValue::Number(20.0)));
    }

    #[test]
    fn test_load_record_rejects_non_objects() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        assert!(load_record(file.path()).is_err());
    }
}
