//! Formula engine - the entry point for evaluating formulas

use crate::context::{Clock, SystemClock};
use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::options::EngineOptions;
use crate::registry::FunctionRegistry;
use crm_formula_diagnostics::Result;
use crm_formula_lexer::{Token, tokenize};
use crm_formula_types::{FormulaValue, Record};
use std::sync::Arc;

/// Evaluates formulas against records.
///
/// The engine holds only immutable configuration and is cheap to clone, so
/// one instance can serve concurrent evaluations. Every call tokenizes afresh
/// and builds a new [`Evaluator`]; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct FormulaEngine {
    functions: Arc<FunctionRegistry>,
    clock: Arc<dyn Clock>,
    options: EngineOptions,
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaEngine {
    /// Engine with the built-in functions, the system clock and default limits
    pub fn new() -> Self {
        Self {
            functions: Arc::new(FunctionRegistry::standard()),
            clock: Arc::new(SystemClock),
            options: EngineOptions::default(),
        }
    }

    /// Replace the function registry
    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = Arc::new(functions);
        self
    }

    /// Replace the clock used by `NOW()` and `TODAY()`
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace the resource limits
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Function registry in use
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Resource limits in use
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Tokenize and evaluate a formula.
    ///
    /// A truthy result means the rule's error condition holds and the record
    /// is invalid.
    pub fn evaluate(&self, formula: &str, record: &Record) -> Result<FormulaValue> {
        self.try_evaluate(formula, record)
            .map_err(|e| e.into_formula_error(formula))
    }

    /// Like [`evaluate`](Self::evaluate) but returns the raw evaluation error
    pub fn try_evaluate(&self, formula: &str, record: &Record) -> EvalResult<FormulaValue> {
        if let Some(limit) = self.options.max_formula_length {
            if formula.len() > limit {
                return Err(EvalError::FormulaTooLong {
                    length: formula.len(),
                    limit,
                });
            }
        }

        let tokens = tokenize(formula);
        log::trace!("tokens: {:?}", tokens);
        let result = self.evaluate_tokens(&tokens, record);
        match &result {
            Ok(value) => log::debug!("evaluated {:?} to {}", formula, value),
            Err(err) => log::debug!("evaluation of {:?} failed: {}", formula, err),
        }
        result
    }

    /// Evaluate an already tokenized formula
    pub fn evaluate_tokens(&self, tokens: &[Token], record: &Record) -> EvalResult<FormulaValue> {
        Evaluator::new(tokens, record, &self.functions, self.clock.as_ref())
            .with_max_depth(self.options.max_depth)
            .evaluate()
    }

    /// Evaluate a formula as a validation predicate: `true` means the record
    /// violates the rule
    pub fn is_violation(&self, formula: &str, record: &Record) -> Result<bool> {
        self.evaluate(formula, record).map(|value| value.is_truthy())
    }
}
