//! Single-pass recursive-descent evaluator
//!
//! Parses and evaluates in the same walk; no syntax tree is built.
//!
//! ```text
//! Or          := And (OR And)*
//! And         := Not (AND Not)*
//! Not         := NOT Comparison | Comparison
//! Comparison  := Primary (OPERATOR Primary)?
//! Primary     := NUMBER | STRING | BOOLEAN
//!              | FUNCTION '(' ArgList? ')'
//!              | IDENTIFIER
//!              | '(' Or ')'
//!              | NOT Comparison
//! ArgList     := Or (',' Or)*
//! ```
//!
//! Both operands of `AND` and `OR` are always evaluated, as are all function
//! arguments: there is no short-circuiting anywhere. A comparison consumes at
//! most one operator, so `a == b == c` leaves `== c` unparsed.

use crate::context::{Clock, FunctionContext};
use crate::error::{EvalError, EvalResult};
use crate::operators::{ComparisonOperator, compare};
use crate::registry::FunctionRegistry;
use crm_formula_diagnostics::Span;
use crm_formula_lexer::{Token, TokenKind, TokenValue};
use crm_formula_types::{FormulaValue, Record, looks_like_iso_date, parse_date};
use smallvec::SmallVec;

/// Arguments of one function call; most calls take two or fewer
type Args = SmallVec<[FormulaValue; 4]>;

/// Evaluates one token stream against one record.
///
/// Holds the read position as mutable state, so an evaluator serves exactly
/// one evaluation: [`Evaluator::evaluate`] consumes it.
pub struct Evaluator<'a> {
    tokens: &'a [Token],
    pos: usize,
    eof: Token,
    record: &'a Record,
    functions: &'a FunctionRegistry,
    clock: &'a dyn Clock,
    depth: usize,
    max_depth: usize,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator. A token stream without a trailing `EOF` is read
    /// as if it had one.
    pub fn new(
        tokens: &'a [Token],
        record: &'a Record,
        functions: &'a FunctionRegistry,
        clock: &'a dyn Clock,
    ) -> Self {
        let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
        Self {
            tokens,
            pos: 0,
            eof: Token::eof(end),
            record,
            functions,
            clock,
            depth: 0,
            max_depth: usize::MAX,
        }
    }

    /// Limit grammar nesting
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Evaluate the whole formula.
    ///
    /// Tokens left over after a complete top-level expression are ignored.
    pub fn evaluate(mut self) -> EvalResult<FormulaValue> {
        let value = self.or_expr()?;
        if !self.current().is(TokenKind::Eof) {
            log::debug!(
                "ignoring {} trailing token(s) starting at {}",
                self.tokens.len().saturating_sub(self.pos + 1),
                self.current()
            );
        }
        Ok(value)
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Consume a token of the given kind or fail with both kinds in the message
    fn consume(&mut self, expected: TokenKind) -> EvalResult<Token> {
        let token = self.current().clone();
        if token.kind != expected {
            return Err(EvalError::expected_token(expected, &token));
        }
        self.advance();
        Ok(token)
    }

    fn or_expr(&mut self) -> EvalResult<FormulaValue> {
        let mut left = self.and_expr()?;
        while self.current().is(TokenKind::Or) {
            self.advance();
            let right = self.and_expr()?;
            left = FormulaValue::Boolean(left.is_truthy() || right.is_truthy());
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> EvalResult<FormulaValue> {
        let mut left = self.not_expr()?;
        while self.current().is(TokenKind::And) {
            self.advance();
            let right = self.not_expr()?;
            left = FormulaValue::Boolean(left.is_truthy() && right.is_truthy());
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> EvalResult<FormulaValue> {
        if self.current().is(TokenKind::Not) {
            self.advance();
            let value = self.comparison()?;
            return Ok(FormulaValue::Boolean(!value.is_truthy()));
        }
        self.comparison()
    }

    /// Every recursive path through the grammar passes here, so this is
    /// where nesting depth is counted.
    fn comparison(&mut self) -> EvalResult<FormulaValue> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(EvalError::MaxDepthExceeded {
                limit: self.max_depth,
                span: self.current().span,
            });
        }
        let result = self.comparison_inner();
        self.depth -= 1;
        result
    }

    fn comparison_inner(&mut self) -> EvalResult<FormulaValue> {
        let left = self.primary()?;
        if !self.current().is(TokenKind::Operator) {
            return Ok(left);
        }

        let operator = self.consume(TokenKind::Operator)?;
        let right = self.primary()?;
        let op: ComparisonOperator = operator
            .value
            .to_string()
            .parse()
            .map_err(|e: EvalError| e.at(operator.span))?;
        Ok(FormulaValue::Boolean(compare(&left, op, &right)))
    }

    /// Recursion passes through here once per nesting level, so only the
    /// token payload is cloned, never the token.
    fn primary(&mut self) -> EvalResult<FormulaValue> {
        let token = self.current();
        let span = token.span;
        match (token.kind, &token.value) {
            (TokenKind::Number, TokenValue::Number(n)) => {
                let n = *n;
                self.advance();
                Ok(FormulaValue::Number(n))
            }
            (TokenKind::String, TokenValue::Text(s)) => {
                let s = s.clone();
                self.advance();
                Ok(FormulaValue::String(s))
            }
            (TokenKind::Boolean, TokenValue::Boolean(b)) => {
                let b = *b;
                self.advance();
                Ok(FormulaValue::Boolean(b))
            }
            (TokenKind::Function, TokenValue::Text(name)) => {
                let name = name.clone();
                self.advance();
                self.call(&name, span)
            }
            (TokenKind::Identifier, TokenValue::Text(path)) => {
                let path = path.clone();
                self.advance();
                Ok(self.resolve_field(&path))
            }
            (TokenKind::LParen, _) => {
                self.advance();
                let value = self.or_expr()?;
                self.consume(TokenKind::RParen)?;
                Ok(value)
            }
            (TokenKind::Not, _) => {
                self.advance();
                let value = self.comparison()?;
                Ok(FormulaValue::Boolean(!value.is_truthy()))
            }
            _ => Err(EvalError::unexpected_token(self.current())),
        }
    }

    /// Parse an argument list and dispatch. Arguments are evaluated before
    /// the function is looked up.
    fn call(&mut self, name: &str, span: Span) -> EvalResult<FormulaValue> {
        self.consume(TokenKind::LParen)?;
        let mut args = Args::new();
        if !self.current().is(TokenKind::RParen) {
            loop {
                args.push(self.or_expr()?);
                if !self.current().is(TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.consume(TokenKind::RParen)?;

        let Some(function) = self.functions.get(name) else {
            log::debug!("unknown function {} called with {} argument(s)", name, args.len());
            return Err(EvalError::unknown_function(name).at(span));
        };
        let ctx = FunctionContext::new(name, self.clock);
        function(args.as_slice(), &ctx)
    }

    /// Resolve a dot path, promoting ISO-looking date strings to dates.
    ///
    /// Only identifier values are promoted; string literals stay strings.
    fn resolve_field(&self, path: &str) -> FormulaValue {
        let value = self.record.resolve_path(path);
        if let FormulaValue::String(s) = &value {
            if looks_like_iso_date(s) {
                if let Some(date) = parse_date(s) {
                    return FormulaValue::Date(date);
                }
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FixedClock;
    use crm_formula_lexer::tokenize;
    use serde_json::json;

    fn eval(formula: &str, record: serde_json::Value) -> EvalResult<FormulaValue> {
        let tokens = tokenize(formula);
        let record = Record::from_json(record).unwrap();
        let functions = FunctionRegistry::standard();
        let clock = FixedClock::parse("2024-06-15T12:00:00Z").unwrap();
        Evaluator::new(&tokens, &record, &functions, &clock).evaluate()
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval("42", json!({})), Ok(FormulaValue::Number(42.0)));
        assert_eq!(eval("'x'", json!({})), Ok(FormulaValue::string("x")));
        assert_eq!(eval("false", json!({})), Ok(FormulaValue::Boolean(false)));
    }

    #[test]
    fn test_and_or_produce_booleans() {
        assert_eq!(eval("'a' OR 0", json!({})), Ok(FormulaValue::Boolean(true)));
        assert_eq!(eval("1 AND 'x'", json!({})), Ok(FormulaValue::Boolean(true)));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(eval("TRUE OR FALSE AND FALSE", json!({})), Ok(FormulaValue::Boolean(true)));
    }

    #[test]
    fn test_not_applies_to_comparison() {
        assert_eq!(eval("NOT 1 == 2", json!({})), Ok(FormulaValue::Boolean(true)));
        assert_eq!(eval("NOT NOT 'x'", json!({})), Ok(FormulaValue::Boolean(true)));
    }

    #[test]
    fn test_empty_formula_is_unexpected_eof() {
        assert_eq!(
            eval("", json!({})).unwrap_err().to_string(),
            "Unexpected token: EOF (value: null)"
        );
    }

    #[test]
    fn test_missing_close_paren() {
        assert_eq!(
            eval("(1 == 1", json!({})).unwrap_err().to_string(),
            "Expected RPAREN but got EOF (value: null)"
        );
    }

    #[test]
    fn test_identifier_dates_are_promoted() {
        let value = eval("created_at", json!({"created_at": "2024-06-15"})).unwrap();
        assert!(matches!(value, FormulaValue::Date(_)));

        let value = eval("note", json!({"note": "due 2024-06-15"})).unwrap();
        assert_eq!(value, FormulaValue::string("due 2024-06-15"));
    }

    #[test]
    fn test_depth_limit() {
        let tokens = tokenize("((((1))))");
        let record = Record::new();
        let functions = FunctionRegistry::standard();
        let clock = FixedClock::parse("2024-06-15T12:00:00Z").unwrap();
        let err = Evaluator::new(&tokens, &record, &functions, &clock)
            .with_max_depth(3)
            .evaluate()
            .unwrap_err();
        assert!(matches!(err, EvalError::MaxDepthExceeded { limit: 3, .. }));

        let ok = Evaluator::new(&tokens, &record, &functions, &clock)
            .with_max_depth(5)
            .evaluate();
        assert_eq!(ok, Ok(FormulaValue::Number(1.0)));
    }

    #[test]
    fn test_token_stream_without_eof() {
        let mut tokens = tokenize("1 == 1");
        tokens.pop();
        let record = Record::new();
        let functions = FunctionRegistry::standard();
        let clock = FixedClock::parse("2024-06-15T12:00:00Z").unwrap();
        let value = Evaluator::new(&tokens, &record, &functions, &clock).evaluate();
        assert_eq!(value, Ok(FormulaValue::Boolean(true)));
    }
}
