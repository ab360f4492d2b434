//! Validate command implementation

use super::output::{self, OutputFormat};
use super::record::load_record;
use crate::rules::{RuleSet, RuleValidator, ValidationReport};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Configuration for validate command
pub struct ValidateConfig {
    pub rules: PathBuf,
    pub records: Vec<PathBuf>,
    pub now: Option<String>,
    pub verbose: bool,
    pub output_format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Validation outcome for a single record file
#[derive(Debug, Serialize)]
pub struct RecordReport {
    pub record: PathBuf,
    pub valid: bool,
    #[serde(flatten)]
    pub report: ValidationReport,
}

/// Validate record files against a rule set.
///
/// Returns `true` when every record is valid and no rule is misconfigured.
pub fn validate(config: ValidateConfig) -> Result<bool> {
    if config.records.is_empty() {
        anyhow::bail!("No record files specified for validation");
    }

    let rules = RuleSet::load(&config.rules)
        .with_context(|| format!("Failed to load rules: {}", config.rules.display()))?;

    if config.verbose {
        eprintln!(
            "Loaded {} rule(s) from {}",
            rules.rules.len(),
            config.rules.display()
        );
    }

    let engine = super::eval::engine_for(config.now.as_deref())?;
    let validator = RuleValidator::with_engine(rules, engine);

    let mut reports = Vec::with_capacity(config.records.len());
    for path in &config.records {
        if config.verbose {
            eprintln!("Validating: {}", path.display());
        }
        let record = load_record(path)?;
        let report = validator.validate(&record);
        reports.push(RecordReport {
            record: path.clone(),
            valid: report.is_valid(),
            report,
        });
    }

    let content = match config.output_format {
        OutputFormat::Table => render_summary(&reports),
        format => {
            let value = serde_json::to_value(&reports).context("Failed to serialize reports")?;
            output::render(&value, format)?
        }
    };
    output::write_output(&content, config.output_file.as_deref())?;

    Ok(reports
        .iter()
        .all(|r| r.valid && !r.report.has_configuration_errors()))
}

/// Human-readable report with a closing summary line
pub fn render_summary(reports: &[RecordReport]) -> String {
    let mut out = String::new();
    let mut invalid = 0;
    let mut misconfigured = 0;

    for entry in reports {
        let status = if entry.valid {
            "✓".green()
        } else {
            invalid += 1;
            "✗".red()
        };
        let _ = writeln!(out, "{} {}", status, entry.record.display());

        for violation in &entry.report.violations {
            let field = violation
                .field
                .as_deref()
                .map(|f| format!(" [{}]", f))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {}{} {}",
                violation.rule.bold(),
                field,
                violation.message
            );
        }

        for error in &entry.report.configuration_errors {
            misconfigured += 1;
            let location = error
                .location
                .as_ref()
                .map(|loc| format!(" at {}", output::format_location(loc.line, loc.column)))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {}",
                output::format_warning(&format!(
                    "rule '{}' is misconfigured ({}{}): {}",
                    error.rule, error.source_code, location, error.message
                ))
            );
        }
    }

    out.push('\n');
    if invalid == 0 && misconfigured == 0 {
        out.push_str(&output::format_success(&format!(
            "All {} record(s) passed validation",
            reports.len()
        )));
    } else {
        let mut summary = Vec::new();
        if invalid > 0 {
            summary.push(format!("{} invalid record(s)", invalid).red().to_string());
        }
        if misconfigured > 0 {
            summary.push(
                format!("{} rule configuration error(s)", misconfigured)
                    .yellow()
                    .to_string(),
            );
        }
        let _ = write!(
            out,
            "{} Found {}",
            "Validation failed:".red().bold(),
            summary.join(", ")
        );
    }
    out
}
