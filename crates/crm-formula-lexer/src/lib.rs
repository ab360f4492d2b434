//! Formula lexer
//!
//! Converts formula text into a flat token stream terminated by `EOF`.
//! The lexer never fails: characters that match no rule are skipped and an
//! unterminated string simply runs to the end of the input. Strictness
//! lives in the evaluator.

mod lexer;
mod token;

pub use lexer::{Lexer, tokenize};
pub use token::{Token, TokenKind, TokenValue};
