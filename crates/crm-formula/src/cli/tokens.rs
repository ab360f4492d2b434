//! Tokens command implementation

use super::output::{self, OutputFormat};
use crate::lexer::{Token, tokenize};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tabled::{Table, Tabled, settings::Style};

/// Configuration for tokens command
pub struct TokensConfig {
    pub formula: String,
    pub output_format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

#[derive(Tabled)]
struct TokenRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Span")]
    span: String,
}

/// Render tokens as a table
pub fn tokens_table(tokens: &[Token]) -> String {
    let rows: Vec<TokenRow> = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| TokenRow {
            index: i,
            kind: token.kind.name(),
            value: token.value.to_string(),
            span: token.span.to_string(),
        })
        .collect();
    Table::new(rows).with(Style::modern()).to_string()
}

/// Print the token stream of a formula
pub fn tokens(config: TokensConfig) -> Result<()> {
    let tokens = tokenize(&config.formula);

    let content = match config.output_format {
        OutputFormat::Table => tokens_table(&tokens),
        format => {
            let value = serde_json::to_value(&tokens).context("Failed to serialize tokens")?;
            output::render(&value, format)?
        }
    };

    output::write_output(&content, config.output_file.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_tokens_serialize() {
        let value = serde_json::to_value(tokenize("LEN(x)")).unwrap();
        assert_eq!(value[0], json!({"kind": "FUNCTION", "value": "LEN", "span": {"start": 0, "end": 3}}));
        assert_eq!(value[4]["kind"], "EOF");
        assert_eq!(value[4]["value"], serde_json::Value::Null);
    }

    #[test]
    fn test_tokens_table() {
        let table = tokens_table(&tokenize("a >= 1"));
        for expected in ["IDENTIFIER", "OPERATOR", ">=", "NUMBER", "EOF"] {
            assert!(table.contains(expected), "{expected} missing from\n{table}");
        }
    }
}
