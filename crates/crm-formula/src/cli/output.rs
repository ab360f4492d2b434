//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tabled::{Table, Tabled, settings::Style};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    Pretty,
    Table,
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Set up color output based on user preference
pub fn setup_colors(choice: ColorChoice) {
    match choice {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        // colored checks the terminal and NO_COLOR / CLICOLOR itself
        ColorChoice::Auto => colored::control::unset_override(),
    }
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {:#}", "Error:".red().bold(), error)
}

/// Format a warning for display
pub fn format_warning(warning: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), warning)
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Format a formula position (line:col)
pub fn format_location(line: usize, col: usize) -> String {
    format!("{}:{}", line, col).cyan().to_string()
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        eprintln!(
            "{}",
            format_success(&format!("Output written to {}", path.display()))
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Format JSON value for output
pub fn format_json(value: &Value, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

/// Format value as a table, if it has a tabular shape
pub fn format_as_table(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                return Some("(empty list)".to_string());
            }

            let Some(Value::Object(first)) = items.first() else {
                let lines: Vec<String> = items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| format!("  {}. {}", i + 1, format_value(v)))
                    .collect();
                return Some(lines.join("\n"));
            };

            // Objects sharing the first item's keys become one row each
            let keys: Vec<&String> = first.keys().collect();
            let same_shape = items.iter().all(|item| match item {
                Value::Object(obj) => {
                    obj.len() == keys.len() && keys.iter().all(|k| obj.contains_key(*k))
                }
                _ => false,
            });
            if !same_shape {
                return None;
            }

            #[derive(Tabled)]
            struct Row {
                #[tabled(rename = "#")]
                index: usize,
                #[tabled(rename = "Field")]
                field: String,
                #[tabled(rename = "Value")]
                value: String,
            }

            let rows: Vec<Row> = items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| match item {
                    Value::Object(obj) => Some((i, obj)),
                    _ => None,
                })
                .flat_map(|(i, obj)| {
                    keys.iter().map(move |k| Row {
                        index: i + 1,
                        field: (*k).clone(),
                        value: obj.get(*k).map(format_value).unwrap_or_default(),
                    })
                })
                .collect();

            Some(Table::new(rows).with(Style::modern()).to_string())
        }
        Value::Object(obj) => {
            #[derive(Tabled)]
            struct KeyValue {
                #[tabled(rename = "Key")]
                key: String,
                #[tabled(rename = "Value")]
                value: String,
            }

            let rows: Vec<KeyValue> = obj
                .iter()
                .map(|(k, v)| KeyValue {
                    key: k.clone(),
                    value: format_value(v),
                })
                .collect();

            Some(Table::new(rows).with(Style::modern()).to_string())
        }
        _ => None,
    }
}

/// Format a simple value for display
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{}} with {} fields", obj.len()),
    }
}

/// Print output in the specified format
pub fn print_output(value: &Value, format: OutputFormat, output_file: Option<&Path>) -> Result<()> {
    let content = render(value, format)?;
    write_output(&content, output_file)
}

/// Render a value in the specified format
pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_json(value, false),
        OutputFormat::Pretty => format_json(value, true),
        OutputFormat::Table => match format_as_table(value) {
            Some(table) => Ok(table),
            None => format_json(value, true),
        },
    }
}
