//! Token definitions for the formula lexer

use crm_formula_diagnostics::Span;
use serde::Serialize;
use std::fmt;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Number,
    String,
    Boolean,
    /// Field reference, original casing preserved
    Identifier,
    /// Function name (upper-cased) immediately followed by `(`
    Function,
    /// Comparison operator: `==`, `!=`, `>=`, `<=`, `>`, `<`
    Operator,
    #[serde(rename = "LPAREN")]
    LParen,
    #[serde(rename = "RPAREN")]
    RParen,
    Comma,
    And,
    Or,
    Not,
    Eof,
}

impl TokenKind {
    /// The upper-case name used in error messages
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::Boolean => "BOOLEAN",
            Self::Identifier => "IDENTIFIER",
            Self::Function => "FUNCTION",
            Self::Operator => "OPERATOR",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::Comma => "COMMA",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload carried by a token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    None,
    Number(f64),
    Boolean(bool),
    Text(String),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "null"),
            Self::Number(n) => write!(f, "{}", crm_formula_types::format_js_number(*n)),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A classified lexical unit with its position in the formula
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub span: Span,
}

impl Token {
    /// Create a token
    pub fn new(kind: TokenKind, value: TokenValue, span: Span) -> Self {
        Self { kind, value, span }
    }

    /// Create a token whose value is its text
    pub fn text(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self::new(kind, TokenValue::Text(text.into()), span)
    }

    /// End-of-input marker at the given offset
    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, TokenValue::None, Span::point(offset))
    }

    /// Check the token's kind
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Text payload, for string, identifier, function and operator tokens
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.value)
    }
}
