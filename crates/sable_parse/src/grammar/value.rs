//! Property/variable value grammar: map vs. list vs. expression.
//!
//! The three alternatives are tried in order, each speculatively: a
//! parenthesized `(key: value, ...)` map, then a comma-separated list of
//! space-separated sequences, then a single expression. A failed attempt
//! fully restores the cursor before the next one runs.

use sable_diagnostic::ErrorCode;
use sable_ir::{Expression, ListSeparator, TokenKind};
use tracing::trace;

use crate::{ParseError, Parser};

impl<'a> Parser<'a> {
    /// Check whether the cursor sits at a valid end of a value: the stop
    /// token, a block close, a trailing flag keyword, or end of input.
    fn at_value_end(&self, stop: &TokenKind) -> bool {
        self.cursor.check(stop)
            || self.cursor.check(&TokenKind::RBrace)
            || self.cursor.is_at_end()
            || self.cursor.current_kind().is_flag_keyword()
    }

    /// Parse a property or variable value.
    ///
    /// `stop` is the statement terminator that disambiguates the
    /// alternatives: a map or list parse only wins when it ends exactly
    /// at a value boundary.
    pub(crate) fn parse_value(&mut self, stop: &TokenKind) -> Result<Expression, ParseError> {
        trace!("parse_value at {}", self.cursor.position());

        let snapshot = self.snapshot();
        if let Ok(map) = self.parse_map() {
            if self.at_value_end(stop) {
                trace!("parse_value: map");
                return self.fold_expression(map);
            }
        }
        self.restore(snapshot);

        if let Ok(list) = self.parse_comma_sep_list() {
            if self.at_value_end(stop) {
                trace!("parse_value: list");
                return Ok(list);
            }
        }
        self.restore(snapshot);

        trace!("parse_value: expression");
        let expr = self.parse_expression(false)?;
        self.fold_expression(expr)
    }

    /// `( <expr> : <expr> [, <expr> : <expr>]* )` — a non-empty map.
    fn parse_map(&mut self) -> Result<Expression, ParseError> {
        let span = self.cursor.current_span();
        self.cursor.expect(&TokenKind::LParen)?;
        let mut entries = Vec::new();
        loop {
            if self.cursor.accept(&TokenKind::RParen) {
                break;
            }
            let key = self.parse_expression(false)?;
            self.cursor.expect(&TokenKind::Colon)?;
            let value = self.parse_expression(false)?;
            entries.push((key, value));
            if self.cursor.accept(&TokenKind::Comma) {
                continue;
            }
            self.cursor.expect(&TokenKind::RParen)?;
            break;
        }
        if entries.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E1002,
                "empty parentheses are not a map",
                span,
            ));
        }
        Ok(Expression::Map { entries })
    }

    /// Comma-separated sequence of space-separated sequences. A single
    /// element collapses to the element itself.
    fn parse_comma_sep_list(&mut self) -> Result<Expression, ParseError> {
        trace!("parse_comma_sep_list at {}", self.cursor.position());
        let mut items = Vec::new();
        loop {
            if self.cursor.check(&TokenKind::LParen) {
                self.cursor.advance();
                let sub = self.parse_comma_sep_list()?;
                self.cursor.expect(&TokenKind::RParen)?;
                items.push(sub);
            } else if let Some(element) = self.try_parse(|p| p.parse_space_sep_list()) {
                items.push(element);
            } else {
                break;
            }
            if !self.cursor.accept(&TokenKind::Comma) {
                break;
            }
        }
        match items.len() {
            0 => Err(ParseError::new(
                ErrorCode::E1002,
                "expected value",
                self.cursor.current_span(),
            )),
            1 => Ok(items.remove(0)),
            _ => Ok(Expression::List {
                items,
                separator: ListSeparator::Comma,
            }),
        }
    }

    /// Space-separated expression sequence; stops at a comma, terminator
    /// or flag keyword. A single element collapses to the element.
    fn parse_space_sep_list(&mut self) -> Result<Expression, ParseError> {
        let mut items = Vec::new();
        if self.cursor.check(&TokenKind::LParen) {
            self.cursor.advance();
            let sub = self.parse_comma_sep_list()?;
            self.cursor.expect(&TokenKind::RParen)?;
            items.push(sub);
        }
        loop {
            if self.space_list_ends() {
                break;
            }
            match self.try_parse(|p| p.parse_expression(false)) {
                Some(expr) => items.push(expr),
                None => break,
            }
        }
        match items.len() {
            0 => Err(ParseError::new(
                ErrorCode::E1002,
                "expected value",
                self.cursor.current_span(),
            )),
            1 => Ok(items.remove(0)),
            _ => Ok(Expression::List {
                items,
                separator: ListSeparator::Space,
            }),
        }
    }

    fn space_list_ends(&self) -> bool {
        matches!(
            self.cursor.current_kind(),
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Comma | TokenKind::Eof
        ) || self.cursor.current_kind().is_flag_keyword()
    }
}
