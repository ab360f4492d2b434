//! CRM Formula Evaluation Engine
//!
//! Evaluates validation-rule formulas against CRM records. A formula is a
//! predicate describing an *error* condition: a truthy result means the
//! record is invalid, a falsy one means it is valid.
//!
//! - **Evaluator**: single-pass recursive descent over the token stream
//! - **Comparison**: string equality, numeric-then-string ordering
//! - **Function library**: string, numeric, date and logical built-ins
//! - **Registry**: immutable name-to-function map, extensible by callers
//!
//! # Example
//!
//! ```
//! use crm_formula_eval::FormulaEngine;
//! use crm_formula_types::Record;
//!
//! let engine = FormulaEngine::new();
//! let record = Record::new().with_field("email", "");
//! let result = engine.evaluate("ISBLANK(email)", &record).unwrap();
//! assert!(result.is_truthy());
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod operators;
pub mod options;
pub mod registry;

pub use context::{Clock, FixedClock, FunctionContext, SystemClock};
pub use engine::FormulaEngine;
pub use error::{EvalError, EvalResult};
pub use evaluator::Evaluator;
pub use operators::{ComparisonOperator, compare};
pub use options::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_FORMULA_LENGTH, EngineOptions};
pub use registry::{FormulaFn, FunctionRegistry, FunctionRegistryBuilder, arg};
