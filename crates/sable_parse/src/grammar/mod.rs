//! Grammar productions, split by construct.
//!
//! `mod.rs` holds statement dispatch, blocks and declarations; the
//! submodules cover expressions, value disambiguation, selectors,
//! media/import rules and control flow.

mod control;
mod expr;
mod media;
mod selector;
mod value;

use sable_diagnostic::ErrorCode;
use sable_ir::{
    AssignFlags, Block, Expression, Property, Statement, TokenKind, VariableAssignment,
};
use tracing::trace;

use crate::{ParseError, Parser};

impl<'a> Parser<'a> {
    /// Dispatch one statement based on the current token.
    pub(crate) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        trace!("parse_statement at {}", self.cursor.position());
        match self.cursor.current_kind() {
            TokenKind::AtImport => self.parse_import(),
            TokenKind::AtCharset => self.parse_charset(),
            TokenKind::AtMedia => self.parse_media(),
            TokenKind::Variable(_) => self.parse_assignment(),
            TokenKind::AtIf => self.parse_if(),
            TokenKind::AtFor => self.parse_for(),
            TokenKind::AtWhile => self.parse_while(),
            kind if kind.is_selector_start() => self.parse_rule_set(),
            kind => Err(ParseError::new(
                ErrorCode::E1001,
                format!(
                    "unexpected token {} in statement position",
                    kind.display_name()
                ),
                self.cursor.current_span(),
            )),
        }
    }

    /// `{ <statement>* }` — the body of control-flow and `@media` rules.
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.cursor.expect(&TokenKind::LBrace)?;
        let mut block = Block::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                return Err(ParseError::new(
                    ErrorCode::E1003,
                    "unclosed block",
                    self.cursor.current_span(),
                ));
            }
            block.statements.push(self.parse_statement()?);
        }
        self.cursor.expect(&TokenKind::RBrace)?;
        Ok(block)
    }

    /// Declaration block: property declarations or nested statements
    /// until the closing brace.
    ///
    /// A property is attempted speculatively first; `a:hover { ... }`
    /// stops looking like a property only once its value production
    /// fails, at which point the cursor rewinds and the statement path
    /// parses it as a nested rule set.
    pub(crate) fn parse_declaration_block(&mut self) -> Result<Block, ParseError> {
        self.cursor.expect(&TokenKind::LBrace)?;
        let mut block = Block::new();
        loop {
            if self.cursor.check(&TokenKind::RBrace) {
                break;
            }
            if self.cursor.is_at_end() {
                return Err(ParseError::new(
                    ErrorCode::E1003,
                    "unclosed declaration block",
                    self.cursor.current_span(),
                ));
            }
            if let Some(property) = self.try_parse(Self::parse_property) {
                block.statements.push(Statement::Property(property));
            } else {
                block.statements.push(self.parse_statement()?);
            }
        }
        self.cursor.expect(&TokenKind::RBrace)?;
        Ok(block)
    }

    /// `<name-fragments> : <value> (; | })`
    fn parse_property(&mut self) -> Result<Property, ParseError> {
        let start = self.cursor.current_span();
        let name = self.parse_property_name()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let value = self.parse_value(&TokenKind::Semicolon)?;
        if !self.cursor.accept(&TokenKind::Semicolon) && !self.cursor.check(&TokenKind::RBrace) {
            return Err(ParseError::new(
                ErrorCode::E1008,
                format!(
                    "unexpected end of property value, got {}",
                    self.cursor.current_kind().display_name()
                ),
                self.cursor.current_span(),
            ));
        }
        Ok(Property {
            name,
            value,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    /// Property name: identifier or interpolation fragments chained by
    /// adjacency (`border-#{$side}-width` is three fragments).
    fn parse_property_name(&mut self) -> Result<Vec<Expression>, ParseError> {
        let mut fragments = vec![self.parse_property_name_fragment()?];
        while self.cursor.prev_current_adjacent()
            && matches!(
                self.cursor.current_kind(),
                TokenKind::Ident(_) | TokenKind::InterpStart
            )
        {
            fragments.push(self.parse_property_name_fragment()?);
        }
        Ok(fragments)
    }

    fn parse_property_name_fragment(&mut self) -> Result<Expression, ParseError> {
        let span = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(Expression::Ident(name, span))
            }
            TokenKind::InterpStart => self.parse_interpolation(),
            kind => Err(ParseError::new(
                ErrorCode::E1004,
                format!("expected property name, found {}", kind.display_name()),
                span,
            )),
        }
    }

    /// `$name: <value> <flags>* ;`
    ///
    /// The value is written into the innermost open scope (or the global
    /// table when no scope is open) the moment it parses — before the
    /// terminating `;` or any enclosing statement is known to be
    /// well-formed. A snapshot restore does not undo the write: this is
    /// the single deliberate side-effect exception to speculative
    /// parsing, pinned by `speculative_failure_keeps_variable_write`.
    pub(crate) fn parse_assignment(&mut self) -> Result<Statement, ParseError> {
        let start = self.cursor.current_span();
        let name = self.cursor.expect_variable()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let value = self.parse_value(&TokenKind::Semicolon)?;

        self.context.assign(name, value.clone());

        let mut flags = AssignFlags::NONE;
        loop {
            match self.cursor.current_kind() {
                TokenKind::Default => flags = flags.with(AssignFlags::DEFAULT),
                TokenKind::Optional => flags = flags.with(AssignFlags::OPTIONAL),
                TokenKind::Important => flags = flags.with(AssignFlags::IMPORTANT),
                TokenKind::Global => flags = flags.with(AssignFlags::GLOBAL),
                _ => break,
            }
            self.cursor.advance();
        }
        if flags.has(AssignFlags::GLOBAL) {
            self.context.assign_global(name, value.clone());
        }

        self.cursor.accept(&TokenKind::Semicolon);
        Ok(Statement::Assign(VariableAssignment {
            name,
            value,
            flags,
            span: start.merge(self.cursor.previous_span()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use sable_diagnostic::ErrorCode;
    use sable_ir::{Span, StringInterner};

    use crate::{ParseError, Parser};

    /// Pins the one deliberate backtracking exception: a variable write
    /// commits the moment the assignment's value parses, even when an
    /// enclosing speculative parse is abandoned afterwards.
    #[test]
    fn speculative_failure_keeps_variable_write() {
        let interner = StringInterner::new();
        let tokens = sable_lexer::lex("$width: 10px;", &interner).unwrap();
        let name = interner.intern("width");
        let mut parser = Parser::new(&tokens, &interner);

        let result: Option<()> = parser.try_parse(|p| {
            p.parse_assignment()?;
            Err(ParseError::new(
                ErrorCode::E1001,
                "forced backtrack",
                Span::DUMMY,
            ))
        });

        assert!(result.is_none());
        // The cursor rewound to the start of the assignment...
        assert_eq!(parser.cursor.position(), 0);
        // ...but the scope write survived the restore.
        assert!(parser.context.lookup(name).is_some());
    }

    /// Declaration blocks restore cleanly when the property attempt
    /// fails: `a:hover` must fall through to the nested-rule-set path
    /// with no tokens lost.
    #[test]
    fn property_speculation_restores_cursor() {
        let interner = StringInterner::new();
        let tokens = sable_lexer::lex("a:hover { color: red; }", &interner).unwrap();
        let mut parser = Parser::new(&tokens, &interner);

        let before = parser.cursor.position();
        let property = parser.try_parse(Parser::parse_property);
        assert!(property.is_none());
        assert_eq!(parser.cursor.position(), before);
    }
}
