//! Scans formula text and produces a stream of tokens.
//!
//! Rules are tried in order at each position:
//! 1. whitespace is skipped
//! 2. `'` or `"` opens a string closed by the same quote; `\x` emits `x`
//! 3. a digit, or `-` directly followed by a digit, starts a number
//! 4. `==`, `!=`, `>=`, `<=`, then `>`, `<`
//! 5. `(`, `)`, `,`
//! 6. a letter or `_` starts a word: keyword, boolean, function or identifier
//! 7. anything else is dropped

use crate::token::{Token, TokenKind, TokenValue};
use crm_formula_diagnostics::Span;
use crm_formula_types::is_js_whitespace;

/// Tokenize a formula. Always ends with an `EOF` token.
pub fn tokenize(formula: &str) -> Vec<Token> {
    Lexer::new(formula).tokenize()
}

pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer { source, pos: 0 }
    }

    /// Consume the whole input.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens.push(Token::eof(self.source.len()));
        log::trace!("tokenized {:?} into {} tokens", self.source, tokens.len());
        tokens
    }

    /// Advances the lexer and returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            let ch = self.peek()?;
            let start = self.pos;

            if is_js_whitespace(ch) {
                self.bump();
                continue;
            }

            if ch == '\'' || ch == '"' {
                return Some(self.read_string(ch));
            }

            if ch.is_ascii_digit() || (ch == '-' && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())) {
                return Some(self.read_number());
            }

            if let Some(token) = self.read_operator() {
                return Some(token);
            }

            let structural = match ch {
                '(' => Some(TokenKind::LParen),
                ')' => Some(TokenKind::RParen),
                ',' => Some(TokenKind::Comma),
                _ => None,
            };
            if let Some(kind) = structural {
                self.bump();
                return Some(Token::text(kind, ch.to_string(), self.span_from(start)));
            }

            if is_word_start(ch) {
                return Some(self.read_word());
            }

            log::trace!("skipping unrecognized character {:?} at offset {}", ch, start);
            self.bump();
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.pos)
    }

    /// Reads a quoted string. The closing quote must match the opening one;
    /// an unterminated string ends at end of input.
    fn read_string(&mut self, quote: char) -> Token {
        let start = self.pos;
        self.bump();

        let mut result = String::new();
        while let Some(ch) = self.bump() {
            if ch == '\\' {
                // A trailing backslash has nothing to escape and is dropped.
                if let Some(escaped) = self.bump() {
                    result.push(escaped);
                }
            } else if ch == quote {
                break;
            } else {
                result.push(ch);
            }
        }

        Token::text(TokenKind::String, result, self.span_from(start))
    }

    /// Reads an optional leading `-`, digits, and at most one decimal point.
    fn read_number(&mut self) -> Token {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }

        let mut has_dot = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.bump();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.bump();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.pos];
        let value = text.parse::<f64>().unwrap_or(f64::NAN);
        Token::new(TokenKind::Number, TokenValue::Number(value), self.span_from(start))
    }

    /// Two-character operators are checked before their one-character prefixes.
    fn read_operator(&mut self) -> Option<Token> {
        let start = self.pos;
        let rest = &self.source[self.pos..];

        let symbol = ["==", "!=", ">=", "<="]
            .into_iter()
            .find(|op| rest.starts_with(op))
            .or_else(|| [">", "<"].into_iter().find(|op| rest.starts_with(op)))?;

        self.pos += symbol.len();
        Some(Token::text(TokenKind::Operator, symbol, self.span_from(start)))
    }

    /// Reads a word and classifies it. Keywords are matched case-insensitively;
    /// a word directly followed by `(` is a function call with an upper-cased
    /// name; anything else is an identifier with its original casing.
    fn read_word(&mut self) -> Token {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if is_word_continue(ch) {
                self.bump();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.pos];
        let span = self.span_from(start);
        let upper = text.to_ascii_uppercase();

        match upper.as_str() {
            "AND" => Token::text(TokenKind::And, upper, span),
            "OR" => Token::text(TokenKind::Or, upper, span),
            "NOT" => Token::text(TokenKind::Not, upper, span),
            "TRUE" => Token::new(TokenKind::Boolean, TokenValue::Boolean(true), span),
            "FALSE" => Token::new(TokenKind::Boolean, TokenValue::Boolean(false), span),
            _ if self.peek() == Some('(') => Token::text(TokenKind::Function, upper, span),
            _ => Token::text(TokenKind::Identifier, text, span),
        }
    }
}

fn is_word_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Dots continue a word so nested field paths (`account.name`) stay one token.
fn is_word_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.'
}
