//! Control flow grammar: `@if` / `@else if` / `@else`, `@for`, `@while`.

use sable_diagnostic::ErrorCode;
use sable_ir::{Expression, ForStatement, IfStatement, Statement, TokenKind, WhileStatement};
use tracing::trace;

use crate::{ParseError, Parser};

impl<'a> Parser<'a> {
    /// `@if <cond> { } [@else if <cond> { }]* [@else { }]?`
    pub(crate) fn parse_if(&mut self) -> Result<Statement, ParseError> {
        trace!("parse_if");
        self.cursor.expect(&TokenKind::AtIf)?;
        let condition = self.parse_condition()?;
        let block = self.parse_block()?;

        let mut else_ifs = Vec::new();
        while self.cursor.check(&TokenKind::AtElseIf) {
            self.cursor.advance();
            let elseif_condition = self.parse_condition()?;
            let elseif_block = self.parse_block()?;
            else_ifs.push((elseif_condition, elseif_block));
        }

        let else_block = if self.cursor.accept(&TokenKind::AtElse) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Statement::If(IfStatement {
            condition,
            block,
            else_ifs,
            else_block,
        }))
    }

    /// `@for $var from <a> (through|to) <b> { }` or
    /// `@for $var in <a> .. <b> { }`
    ///
    /// Both bounds are eagerly folded when reducible; `through` and `to`
    /// stay distinct fields (inclusive vs. exclusive upper bound).
    pub(crate) fn parse_for(&mut self) -> Result<Statement, ParseError> {
        trace!("parse_for");
        self.cursor.expect(&TokenKind::AtFor)?;
        let variable = self.cursor.expect_variable()?;

        let from;
        let mut through = None;
        let mut to = None;

        if self.cursor.accept(&TokenKind::From) {
            from = self.parse_for_bound()?;

            match self.cursor.current_kind() {
                TokenKind::Through => {
                    self.cursor.advance();
                    through = Some(self.parse_for_bound()?);
                }
                TokenKind::To => {
                    self.cursor.advance();
                    to = Some(self.parse_for_bound()?);
                }
                kind => {
                    return Err(ParseError::new(
                        ErrorCode::E1006,
                        format!(
                            "expected `through` or `to` of range syntax, found {}",
                            kind.display_name()
                        ),
                        self.cursor.current_span(),
                    ))
                }
            }
        } else if self.cursor.accept(&TokenKind::In) {
            from = self.parse_for_bound()?;
            if !self.cursor.accept(&TokenKind::DotDot) {
                return Err(ParseError::new(
                    ErrorCode::E1006,
                    format!(
                        "expected `..` of range syntax, found {}",
                        self.cursor.current_kind().display_name()
                    ),
                    self.cursor.current_span(),
                ));
            }
            to = Some(self.parse_for_bound()?);
        } else {
            return Err(ParseError::new(
                ErrorCode::E1006,
                format!(
                    "expected `from` or `in` after @for variable, found {}",
                    self.cursor.current_kind().display_name()
                ),
                self.cursor.current_span(),
            ));
        }

        let block = self.parse_block()?;
        Ok(Statement::For(ForStatement {
            variable,
            from,
            through,
            to,
            block,
        }))
    }

    /// A `@for` range bound, eagerly folded.
    fn parse_for_bound(&mut self) -> Result<Expression, ParseError> {
        let expr = self.parse_expression(true)?;
        self.fold_expression(expr)
    }

    /// `@while <cond> { }`
    pub(crate) fn parse_while(&mut self) -> Result<Statement, ParseError> {
        trace!("parse_while");
        self.cursor.expect(&TokenKind::AtWhile)?;
        let condition = self.parse_condition()?;
        let block = self.parse_block()?;
        Ok(Statement::While(WhileStatement { condition, block }))
    }
}
