//! Validation rules and the rule runner
//!
//! A rule set is a JSON document:
//!
//! ```json
//! {
//!   "options": { "max_depth": 64 },
//!   "rules": [
//!     {
//!       "name": "email_required",
//!       "formula": "ISBLANK(email)",
//!       "error_message": "Email is required",
//!       "error_field": "email"
//!     }
//!   ]
//! }
//! ```
//!
//! Each active rule is evaluated independently. A truthy result rejects the
//! record; a formula that fails to evaluate is reported as a misconfigured
//! rule and never stops the remaining rules from running.

use crate::diagnostics::{
    ErrorCode, FML0200, FML0201, FML0301, FormulaError, Result, SourceLocation,
};
use crate::eval::{EngineOptions, FormulaEngine};
use crate::types::Record;
use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;

/// One validation rule as authored by an administrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub name: String,
    /// Error condition: truthy means the record is invalid
    pub formula: String,
    pub error_message: String,
    /// Field the message is attached to in the UI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_field: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ValidationRule {
    pub fn new(
        name: impl Into<String>,
        formula: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            formula: formula.into(),
            error_message: error_message.into(),
            error_field: None,
            active: true,
        }
    }

    pub fn with_error_field(mut self, field: impl Into<String>) -> Self {
        self.error_field = Some(field.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Rules for one entity type plus the limits they are evaluated under
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub options: EngineOptions,
    pub rules: Vec<ValidationRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<ValidationRule>) -> Self {
        Self {
            options: EngineOptions::default(),
            rules,
        }
    }

    /// Parse a rule set from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let set: Self = serde_json::from_str(text)
            .map_err(|e| FormulaError::configuration(FML0201, format!("Invalid rule set: {e}")))?;
        set.check()?;
        Ok(set)
    }

    /// Read and parse a rule set file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            FormulaError::system(FML0301, format!("Failed to read rule set: {e}"))
                .with_context(path.display().to_string())
        })?;
        Self::from_json(&text).map_err(|e| e.with_context(path.display().to_string()))
    }

    /// Rules that will be evaluated
    pub fn active_rules(&self) -> impl Iterator<Item = &ValidationRule> {
        self.rules.iter().filter(|rule| rule.active)
    }

    fn check(&self) -> Result<()> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(FormulaError::configuration(
                    FML0200,
                    format!("Rule #{} has an empty name", index + 1),
                ));
            }
            if rule.formula.trim().is_empty() {
                return Err(FormulaError::configuration(
                    FML0200,
                    format!("Rule '{}' has an empty formula", rule.name),
                ));
            }
        }
        Ok(())
    }
}

/// A rule whose error condition held for the record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleViolation {
    pub rule: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// A rule whose formula could not be evaluated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleConfigurationError {
    pub rule: String,
    #[serde(serialize_with = "serialize_code")]
    pub code: ErrorCode,
    /// Code of the underlying evaluation failure
    #[serde(serialize_with = "serialize_code")]
    pub source_code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

fn serialize_code<S: Serializer>(
    code: &ErrorCode,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(code)
}

impl RuleConfigurationError {
    fn new(rule: &ValidationRule, error: &FormulaError) -> Self {
        Self {
            rule: rule.name.clone(),
            code: FML0200,
            source_code: error.code(),
            message: error.message().to_string(),
            location: error.location().cloned(),
        }
    }
}

/// Outcome of running a rule set against one record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<RuleViolation>,
    pub configuration_errors: Vec<RuleConfigurationError>,
    /// Number of active rules evaluated
    pub evaluated: usize,
    /// Number of inactive rules skipped
    pub skipped: usize,
}

impl ValidationReport {
    /// No rule rejected the record. Misconfigured rules do not count.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has_configuration_errors(&self) -> bool {
        !self.configuration_errors.is_empty()
    }

    /// Violation messages in rule order
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.message.as_str())
    }
}

/// Runs a rule set against records
#[derive(Debug, Clone)]
pub struct RuleValidator {
    rules: RuleSet,
    engine: FormulaEngine,
}

impl RuleValidator {
    pub fn new(rules: RuleSet) -> Self {
        Self::with_engine(rules, FormulaEngine::new())
    }

    /// Use a specific engine; the rule set's options replace the engine's
    pub fn with_engine(rules: RuleSet, engine: FormulaEngine) -> Self {
        let engine = engine.with_options(rules.options.clone());
        Self { rules, engine }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn engine(&self) -> &FormulaEngine {
        &self.engine
    }

    pub fn validate(&self, record: &Record) -> ValidationReport {
        let mut report = ValidationReport::default();

        for rule in &self.rules.rules {
            if !rule.active {
                report.skipped += 1;
                continue;
            }
            report.evaluated += 1;

            match self.engine.evaluate(&rule.formula, record) {
                Ok(value) if value.is_truthy() => {
                    log::debug!("rule {} rejected record ({})", rule.name, value);
                    report.violations.push(RuleViolation {
                        rule: rule.name.clone(),
                        message: rule.error_message.clone(),
                        field: rule.error_field.clone(),
                    });
                }
                Ok(_) => {}
                Err(err) => {
                    log::warn!("rule {} is misconfigured: {}", rule.name, err);
                    report
                        .configuration_errors
                        .push(RuleConfigurationError::new(rule, &err));
                }
            }
        }

        report
    }
}
