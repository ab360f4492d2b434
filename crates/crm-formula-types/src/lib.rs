//! Formula runtime types
//!
//! This crate defines the values a validation formula operates on:
//! - `FormulaValue`, the runtime value model (mirrors what a CRM record can hold)
//! - JavaScript-style coercions (truthiness, `String(x)`, `Number(x)`)
//! - `Record`, the read-only field map a formula is evaluated against
//! - Date parsing used for identifier auto-promotion and date functions

pub mod coercion;
pub mod date;
pub mod record;
pub mod value;

pub use coercion::{compare_js_strings, format_js_number, is_js_whitespace, string_to_number};
pub use date::{format_js_date, looks_like_iso_date, parse_date};
pub use record::{Record, RecordError};
pub use value::FormulaValue;
