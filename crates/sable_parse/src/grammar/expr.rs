//! Expression grammar.
//!
//! Precedence, low to high: logical or → logical and → comparison →
//! additive (`+`, `-`, adjacency concat) → multiplicative (`*`, `/`) →
//! unary sign/not → factor. Additive and multiplicative levels are
//! left-associative accumulation loops.
//!
//! Every binary and unary construction runs through the constant folder;
//! statically-known sub-expressions never reach the AST as operator
//! nodes.

use sable_diagnostic::ErrorCode;
use sable_eval::{can_reduce, reduce, value_to_expression};
use sable_ir::{
    BinaryOp, Color, Expression, Number, QuoteKind, StringVal, TokenKind, UnaryOp, Unit,
};
use tracing::trace;

use crate::{ParseError, Parser};

impl<'a> Parser<'a> {
    /// Fold an expression to a literal when its operands are statically
    /// known; otherwise hand it back untouched.
    ///
    /// The pre-check is conservative: when it approves an expression the
    /// fold may still decline (`Ok(None)`), and the original tree is
    /// kept. Invalid operations (ordering across types) are fatal.
    pub(crate) fn fold_expression(&self, expr: Expression) -> Result<Expression, ParseError> {
        if !can_reduce(&expr) {
            return Ok(expr);
        }
        let span = expr.span();
        match reduce(&expr, None) {
            Ok(Some(value)) => Ok(value_to_expression(&value, span)),
            Ok(None) => Ok(expr),
            Err(err) => Err(ParseError::new(err.code, err.message, span)),
        }
    }

    /// Build a binary node and immediately attempt to fold it.
    fn fold_binary(
        &self,
        op: BinaryOp,
        left: Expression,
        right: Expression,
        in_paren: bool,
    ) -> Result<Expression, ParseError> {
        self.fold_expression(Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            in_paren,
        })
    }

    /// Condition of `@if` / `@else if` / `@while`: optional leading
    /// logical not, then the logic chain, folded.
    pub(crate) fn parse_condition(&mut self) -> Result<Expression, ParseError> {
        trace!("parse_condition");
        let expr = if matches!(self.cursor.current_kind(), TokenKind::Not | TokenKind::Bang) {
            let span = self.cursor.current_span();
            self.cursor.advance();
            let operand = self.parse_logic_or()?;
            Expression::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                span,
            }
        } else {
            self.parse_logic_or()?
        };
        self.fold_expression(expr)
    }

    fn parse_logic_or(&mut self) -> Result<Expression, ParseError> {
        let mut expr = self.parse_logic_and()?;
        while matches!(self.cursor.current_kind(), TokenKind::Or | TokenKind::OrOr) {
            self.cursor.advance();
            let rhs = self.parse_logic_and()?;
            expr = self.fold_binary(BinaryOp::Or, expr, rhs, false)?;
        }
        Ok(expr)
    }

    fn parse_logic_and(&mut self) -> Result<Expression, ParseError> {
        let mut expr = self.parse_comparison()?;
        while matches!(self.cursor.current_kind(), TokenKind::And | TokenKind::AndAnd) {
            self.cursor.advance();
            let rhs = self.parse_comparison()?;
            expr = self.fold_binary(BinaryOp::And, expr, rhs, false)?;
        }
        Ok(expr)
    }

    /// Comparison: each side is a parenthesized sub-expression or a bare
    /// additive expression. Comparisons do not chain associatively; the
    /// loop re-enters with the folded left side.
    fn parse_comparison(&mut self) -> Result<Expression, ParseError> {
        let mut expr = self.parse_comparison_operand()?;
        while let Some(op) = comparison_op(&self.cursor.current_kind()) {
            self.cursor.advance();
            let rhs = self.parse_comparison_operand()?;
            expr = self.fold_binary(op, expr, rhs, false)?;
        }
        Ok(expr)
    }

    fn parse_comparison_operand(&mut self) -> Result<Expression, ParseError> {
        if self.cursor.check(&TokenKind::LParen) {
            self.cursor.advance();
            let inner = self.parse_logic_or()?;
            self.cursor.expect(&TokenKind::RParen)?;
            Ok(inner)
        } else {
            self.parse_expression(false)
        }
    }

    /// Additive expression. `in_paren` marks operator nodes built inside
    /// parentheses, which is what separates real division from the CSS
    /// shorthand slash.
    pub(crate) fn parse_expression(&mut self, in_paren: bool) -> Result<Expression, ParseError> {
        trace!("parse_expression at {}", self.cursor.position());
        let mut expr = self.parse_term(in_paren)?;
        loop {
            match self.cursor.current_kind() {
                TokenKind::Plus => {
                    self.cursor.advance();
                    let rhs = self.parse_term(in_paren)?;
                    expr = self.fold_binary(BinaryOp::Add, expr, rhs, in_paren)?;
                }
                TokenKind::Minus => {
                    self.cursor.advance();
                    let rhs = self.parse_term(in_paren)?;
                    expr = self.fold_binary(BinaryOp::Sub, expr, rhs, in_paren)?;
                }
                // Literal concatenation: a string-ish fragment starting
                // exactly where the previous token ended (`#{$w}px`).
                TokenKind::Ident(_)
                | TokenKind::InterpStart
                | TokenKind::QuotedDouble(_)
                | TokenKind::QuotedSingle(_)
                    if self.cursor.prev_current_adjacent() =>
                {
                    let rhs = self.parse_term(in_paren)?;
                    expr = self.fold_expression(Expression::Concat {
                        left: Box::new(expr),
                        right: Box::new(rhs),
                    })?;
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Multiplicative expression, left-associative.
    fn parse_term(&mut self, in_paren: bool) -> Result<Expression, ParseError> {
        let mut expr = self.parse_factor(in_paren)?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.cursor.advance();
            let rhs = self.parse_factor(in_paren)?;
            expr = self.fold_binary(op, expr, rhs, in_paren)?;
        }
        Ok(expr)
    }

    /// Factor: parenthesized expression, literal, function call,
    /// variable, interpolation or signed factor.
    fn parse_factor(&mut self, in_paren: bool) -> Result<Expression, ParseError> {
        let span = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::LParen => {
                self.cursor.advance();
                let expr = self.parse_expression(true)?;
                self.cursor.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::InterpStart => self.parse_interpolation(),
            TokenKind::QuotedDouble(name) => {
                self.cursor.advance();
                Ok(Expression::Str(
                    StringVal::quoted(self.cursor.interner().resolve(name), QuoteKind::Double),
                    span,
                ))
            }
            TokenKind::QuotedSingle(name) => {
                self.cursor.advance();
                Ok(Expression::Str(
                    StringVal::quoted(self.cursor.interner().resolve(name), QuoteKind::Single),
                    span,
                ))
            }
            TokenKind::True => {
                self.cursor.advance();
                Ok(Expression::Boolean(true, span))
            }
            TokenKind::False => {
                self.cursor.advance();
                Ok(Expression::Boolean(false, span))
            }
            TokenKind::Null => {
                self.cursor.advance();
                Ok(Expression::Null(span))
            }
            TokenKind::Int(_) | TokenKind::Float(_) => self.parse_number(),
            TokenKind::Plus => {
                self.cursor.advance();
                let operand = self.parse_factor(in_paren)?;
                self.fold_expression(Expression::Unary {
                    op: UnaryOp::Plus,
                    operand: Box::new(operand),
                    span,
                })
            }
            TokenKind::Minus => {
                self.cursor.advance();
                let operand = self.parse_factor(in_paren)?;
                self.fold_expression(Expression::Unary {
                    op: UnaryOp::Minus,
                    operand: Box::new(operand),
                    span,
                })
            }
            TokenKind::Hash(name) => {
                let text = self.cursor.interner().resolve(name);
                match Color::from_hex_str(&text) {
                    Some(color) => {
                        self.cursor.advance();
                        Ok(Expression::Color(color, span))
                    }
                    None => Err(ParseError::new(
                        ErrorCode::E1001,
                        format!("invalid hex color `#{text}`"),
                        span,
                    )),
                }
            }
            TokenKind::Url(name) => {
                self.cursor.advance();
                Ok(Expression::Url(name, span))
            }
            TokenKind::Variable(name) => {
                self.cursor.advance();
                Ok(Expression::Variable(name, span))
            }
            TokenKind::Ident(name) => {
                if self.cursor.current_next_adjacent() && self.cursor.next_is_lparen() {
                    self.parse_function_call()
                } else {
                    self.cursor.advance();
                    // Bare identifiers in value position are unquoted
                    // strings (`color: red`).
                    Ok(Expression::Str(
                        StringVal::bare(self.cursor.interner().resolve(name)),
                        span,
                    ))
                }
            }
            _ => {
                if let Some(text) = self.cursor.soft_keyword_name() {
                    // Range/media keywords double as idents in value
                    // position (`linear-gradient(to right, ...)`).
                    self.cursor.advance();
                    Ok(Expression::Str(StringVal::bare(text), span))
                } else {
                    Err(ParseError::new(
                        ErrorCode::E1002,
                        format!(
                            "expected expression, found {}",
                            self.cursor.current_kind().display_name()
                        ),
                        span,
                    ))
                }
            }
        }
    }

    /// Numeric literal with an optional immediately-adjacent unit token.
    /// Units are never inferred across whitespace.
    fn parse_number(&mut self) -> Result<Expression, ParseError> {
        let span = self.cursor.current_span();
        let value = match self.cursor.current_kind() {
            TokenKind::Int(v) => v as f64,
            TokenKind::Float(bits) => f64::from_bits(bits),
            kind => {
                return Err(ParseError::new(
                    ErrorCode::E1002,
                    format!("expected number, found {}", kind.display_name()),
                    span,
                ))
            }
        };
        self.cursor.advance();

        let unit = if self.cursor.prev_current_adjacent() {
            match self.cursor.current_kind() {
                TokenKind::Percent => {
                    self.cursor.advance();
                    Some(Unit::Percent)
                }
                // `in` lexes as the range keyword even when it is the
                // length unit (`10in`).
                TokenKind::In => {
                    self.cursor.advance();
                    Some(Unit::In)
                }
                TokenKind::Ident(name) => {
                    match Unit::from_ident(&self.cursor.interner().resolve(name)) {
                        Some(unit) => {
                            self.cursor.advance();
                            Some(unit)
                        }
                        None => None,
                    }
                }
                _ => None,
            }
        } else {
            None
        };

        let number = match unit {
            Some(unit) => Number::with_unit(value, unit),
            None => Number::new(value),
        };
        Ok(Expression::Number(
            number,
            span.merge(self.cursor.previous_span()),
        ))
    }

    /// `#{ <expression> }`
    pub(crate) fn parse_interpolation(&mut self) -> Result<Expression, ParseError> {
        trace!("parse_interpolation");
        let start = self.cursor.current_span();
        self.cursor.expect(&TokenKind::InterpStart)?;
        let inner = self.parse_expression(true)?;
        let end = self.cursor.expect(&TokenKind::RBrace)?.span;
        Ok(Expression::Interpolation {
            inner: Box::new(inner),
            span: start.merge(end),
        })
    }

    /// `name( <factor> [, <factor>]* )` — arguments are a flat factor
    /// list; commas are separators and space-separated factors simply
    /// accumulate (`radial-gradient(#06c 0, #fc0 50%)`).
    fn parse_function_call(&mut self) -> Result<Expression, ParseError> {
        let span = self.cursor.current_span();
        let name = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        loop {
            if self.cursor.accept(&TokenKind::RParen) {
                break;
            }
            if self.cursor.is_at_end() {
                return Err(ParseError::new(
                    ErrorCode::E1003,
                    "unclosed function call",
                    self.cursor.current_span(),
                ));
            }
            args.push(self.parse_factor(true)?);
            self.cursor.accept(&TokenKind::Comma);
        }
        Ok(Expression::FunctionCall {
            name,
            args,
            span: span.merge(self.cursor.previous_span()),
        })
    }
}

/// Map a comparison token to its operator.
fn comparison_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::EqEq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Le => Some(BinaryOp::Le),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::Ge => Some(BinaryOp::Ge),
        _ => None,
    }
}
