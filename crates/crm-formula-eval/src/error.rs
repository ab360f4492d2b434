//! Evaluation errors for the formula engine

use crm_formula_diagnostics::{
    ErrorCode, FML0001, FML0002, FML0003, FML0101, FML0102, FML0103, FML0104, FormulaError,
    SourceLocation, Span,
};
use crm_formula_lexer::{Token, TokenKind};
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that abort a formula evaluation.
///
/// The lexer never fails; every error here comes from the grammar, from
/// function dispatch or from the engine's resource limits.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// A token that cannot start a primary expression
    #[error("Unexpected token: {kind} (value: {value})")]
    UnexpectedToken {
        kind: TokenKind,
        value: String,
        span: Span,
    },

    /// A token of one kind was required but another was found
    #[error("Expected {expected} but got {found} (value: {value})")]
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
        value: String,
        span: Span,
    },

    /// Function name not present in the registry
    #[error("Unknown function: {name}")]
    UnknownFunction { name: String, span: Option<Span> },

    /// Operator text with no comparison semantics
    #[error("Unknown operator: {operator}")]
    UnknownOperator { operator: String, span: Option<Span> },

    /// Formula text exceeds the configured length limit
    #[error("Formula too long: {length} bytes exceeds the limit of {limit}")]
    FormulaTooLong { length: usize, limit: usize },

    /// Grammar recursion exceeds the configured depth limit
    #[error("Maximum nesting depth exceeded (limit {limit})")]
    MaxDepthExceeded { limit: usize, span: Span },

    /// A registered function reported a failure
    #[error("Function {name} failed: {message}")]
    FunctionFailed { name: String, message: String },
}

impl EvalError {
    /// Create an unexpected token error
    pub fn unexpected_token(token: &Token) -> Self {
        Self::UnexpectedToken {
            kind: token.kind,
            value: token.value.to_string(),
            span: token.span,
        }
    }

    /// Create an expected token error
    pub fn expected_token(expected: TokenKind, found: &Token) -> Self {
        Self::ExpectedToken {
            expected,
            found: found.kind,
            value: found.value.to_string(),
            span: found.span,
        }
    }

    /// Create an unknown function error
    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction {
            name: name.into(),
            span: None,
        }
    }

    /// Create an unknown operator error
    pub fn unknown_operator(operator: impl Into<String>) -> Self {
        Self::UnknownOperator {
            operator: operator.into(),
            span: None,
        }
    }

    /// Create a function failure, for use by registered functions
    pub fn function_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FunctionFailed {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Attach a span to errors that can carry one but were raised without it
    pub fn at(mut self, at: Span) -> Self {
        match &mut self {
            Self::UnknownFunction { span, .. } | Self::UnknownOperator { span, .. } => {
                span.get_or_insert(at);
            }
            _ => {}
        }
        self
    }

    /// Span of the offending token, if known
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::ExpectedToken { span, .. }
            | Self::MaxDepthExceeded { span, .. } => Some(*span),
            Self::UnknownFunction { span, .. } | Self::UnknownOperator { span, .. } => *span,
            Self::FormulaTooLong { .. } | Self::FunctionFailed { .. } => None,
        }
    }

    /// Error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnexpectedToken { .. } => FML0001,
            Self::ExpectedToken { .. } => FML0002,
            Self::FormulaTooLong { .. } => FML0003,
            Self::UnknownFunction { .. } => FML0101,
            Self::UnknownOperator { .. } => FML0102,
            Self::MaxDepthExceeded { .. } => FML0103,
            Self::FunctionFailed { .. } => FML0104,
        }
    }

    /// Convert into a [`FormulaError`], resolving the span against the formula text
    pub fn into_formula_error(self, formula: &str) -> FormulaError {
        let code = self.code();
        let message = self.to_string();
        let error = if code.is_parse_error() {
            FormulaError::parse(code, message, formula)
        } else {
            FormulaError::evaluation(code, message, formula)
        };
        match self.span() {
            Some(span) => error.with_location(SourceLocation::from_span(span, formula)),
            None => error,
        }
    }
}
