//! CLI functionality for the formula tool
//!
//! - Formula evaluation against a record
//! - Token stream inspection
//! - Rule set validation
//! - REPL
//! - Output formatting

#[cfg(feature = "cli")]
pub mod eval;
#[cfg(feature = "cli")]
pub mod output;
#[cfg(feature = "cli")]
pub mod record;
#[cfg(feature = "cli")]
pub mod repl;
#[cfg(feature = "cli")]
pub mod tokens;
#[cfg(feature = "cli")]
pub mod validate;
