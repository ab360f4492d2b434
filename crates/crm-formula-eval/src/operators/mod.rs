//! Operator implementations
//!
//! `AND`, `OR` and `NOT` are folded directly by the evaluator; only the
//! comparison operators carry enough semantics to live here.

pub mod comparison;

pub use comparison::{ComparisonOperator, compare};
