//! Validation-rule formulas for CRM records
//!
//! A validation rule pairs a user-authored formula with an error message.
//! The formula describes the *error* condition: when it evaluates to a
//! truthy value the record is rejected, when it is falsy the record is
//! valid. `ISBLANK(email)` therefore reads "email is required".
//!
//! - Lexing is lenient: unknown characters are skipped
//! - Evaluation is strict: unknown functions and operators are errors
//! - `AND`, `OR` and `IF` evaluate every operand
//! - `==` compares string forms; ordering is numeric, then by string
//!
//! # Example
//!
//! ```
//! use crm_formula::{Record, evaluate_formula};
//!
//! let record = Record::new().with_field("email", "");
//! let result = evaluate_formula("ISBLANK(email)", &record).unwrap();
//! assert!(result.is_truthy()); // blank email: the record is invalid
//! ```

// Re-export all public APIs from internal crates
pub use crm_formula_diagnostics as diagnostics;
pub use crm_formula_eval as eval;
pub use crm_formula_lexer as lexer;
pub use crm_formula_types as types;

// Convenience re-exports
pub use crm_formula_diagnostics::{FormulaError, Result};
pub use crm_formula_eval::{
    Clock, EngineOptions, FixedClock, FormulaEngine, FunctionRegistry, SystemClock,
};
pub use crm_formula_lexer::{Token, TokenKind, tokenize};
pub use crm_formula_types::{FormulaValue, Record};

pub mod rules;

pub use rules::{RuleSet, RuleValidator, ValidationReport, ValidationRule};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;

use once_cell::sync::Lazy;

static DEFAULT_ENGINE: Lazy<FormulaEngine> = Lazy::new(FormulaEngine::new);

/// Evaluate a formula against a record with the built-in functions, the
/// system clock and default limits.
pub fn evaluate_formula(formula: &str, record: &Record) -> Result<FormulaValue> {
    DEFAULT_ENGINE.evaluate(formula, record)
}
