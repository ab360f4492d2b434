//! Eval command implementation

use super::{output, record};
use crate::diagnostics::FormulaError;
use crate::eval::{FixedClock, FormulaEngine};
use crate::types::FormulaValue;
use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::PathBuf;

/// Configuration for eval command
pub struct EvalConfig {
    pub formula: String,
    pub record: Option<PathBuf>,
    pub fields: Vec<String>,
    /// RFC 3339 timestamp used for `NOW()` and `TODAY()`
    pub now: Option<String>,
    pub verbose: bool,
    pub output_format: output::OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Build an engine, pinning the clock when a timestamp is given
pub fn engine_for(now: Option<&str>) -> Result<FormulaEngine> {
    let engine = FormulaEngine::new();
    match now {
        Some(now) => {
            let clock = FixedClock::parse(now)
                .with_context(|| format!("Invalid --now timestamp: '{}'", now))?;
            Ok(engine.with_clock(clock))
        }
        None => Ok(engine),
    }
}

/// Convert a formula error into a CLI error that mentions its position
pub fn formula_error(err: FormulaError) -> anyhow::Error {
    match err.location().map(|loc| output::format_location(loc.line, loc.column)) {
        Some(location) => anyhow::Error::new(err).context(format!("at {}", location)),
        None => anyhow::Error::new(err),
    }
}

/// Result document for one evaluation
pub fn result_json(formula: &str, value: &FormulaValue) -> Value {
    json!({
        "formula": formula,
        "result": value.to_json(),
        "valid": !value.is_truthy(),
    })
}

/// Evaluate a formula. Returns whether the record is valid.
pub fn eval(config: EvalConfig) -> Result<bool> {
    let record = record::build_record(config.record.as_deref(), &config.fields)?;

    if config.verbose {
        eprintln!("Record has {} field(s)", record.len());
    }

    let engine = engine_for(config.now.as_deref())?;
    let value = engine
        .evaluate(&config.formula, &record)
        .map_err(formula_error)?;

    let result = result_json(&config.formula, &value);
    output::print_output(&result, config.output_format, config.output_file.as_deref())?;

    Ok(!value.is_truthy())
}
