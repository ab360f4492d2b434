//! Engine resource limits

use serde::{Deserialize, Serialize};

/// Default cap on formula text, in bytes
pub const DEFAULT_MAX_FORMULA_LENGTH: usize = 10_000;

/// Default cap on grammar nesting. Sized so a formula at the limit fits a
/// 2 MiB thread stack in an unoptimized build.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Limits applied to every evaluation.
///
/// User-authored formulas are untrusted input. Both limits turn what would
/// otherwise be unbounded work or a stack overflow into an ordinary error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Maximum formula length in bytes; `None` disables the check
    pub max_formula_length: Option<usize>,
    /// Maximum number of nested comparison levels (parentheses, `NOT`, function arguments)
    pub max_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_formula_length: Some(DEFAULT_MAX_FORMULA_LENGTH),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineOptions {
    /// Options with no length limit and the default depth limit
    pub fn unbounded_length() -> Self {
        Self {
            max_formula_length: None,
            ..Self::default()
        }
    }

    /// Set the maximum formula length
    pub fn with_max_formula_length(mut self, limit: Option<usize>) -> Self {
        self.max_formula_length = limit;
        self
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }
}
