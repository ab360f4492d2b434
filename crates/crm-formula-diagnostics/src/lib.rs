//! Formula diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the
//! formula lexer, evaluator and validation-rule runner: error codes,
//! source locations and diagnostic reporting.

mod error;
mod error_code;
mod span;

pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for formula operations
pub type Result<T> = std::result::Result<T, FormulaError>;
