//! Built-in function library
//!
//! Every function receives fully evaluated arguments. Missing arguments read
//! as `Undefined` and surplus arguments are ignored, so no built-in ever
//! fails on arity.
//!
//! - **String**: LEN, CONTAINS, BEGINS, ENDS, REGEX, UPPER, LOWER, TRIM, LEFT, RIGHT, TEXT
//! - **Numeric**: ABS, MAX, MIN, VALUE, ISNUMBER
//! - **Date**: NOW, TODAY, YEAR, MONTH, DAY
//! - **Logical**: ISBLANK, NOT_BLANK, IF

pub mod date;
pub mod logical;
pub mod numeric;
pub mod string;

use crate::registry::FunctionRegistry;

/// Register the whole built-in library
pub fn register_standard(registry: &mut FunctionRegistry) {
    string::register(registry);
    numeric::register(registry);
    date::register(registry);
    logical::register(registry);
}
