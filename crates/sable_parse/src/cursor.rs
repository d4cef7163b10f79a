//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.
//! The cursor is a plain integer position into a materialized token
//! buffer; saving and restoring that integer is the whole backtracking
//! mechanism.

use sable_diagnostic::ErrorCode;
use sable_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList};

use crate::ParseError;

/// Cursor for navigating tokens.
///
/// Tracks the current position in the token stream and gives the grammar
/// productions their primitive operations: peek, advance, accept,
/// expect.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    interner: &'a StringInterner,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the token stream.
    ///
    /// The token list must end with `Eof` (the lexer guarantees this).
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        debug_assert!(
            matches!(tokens.get(tokens.len().saturating_sub(1)).map(|t| &t.kind), Some(TokenKind::Eof)),
            "token stream must end with Eof"
        );
        Cursor {
            tokens,
            interner,
            pos: 0,
        }
    }

    /// Get a reference to the string interner.
    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Get the current position in the token stream.
    ///
    /// Used by snapshots: compare or restore positions to backtrack
    /// after speculative parsing.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the cursor position directly.
    ///
    /// Used by snapshot restore to roll back the parser after
    /// speculative parsing.
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos < self.tokens.len(), "cursor position out of bounds");
        self.pos = pos;
    }

    /// Get the current token.
    ///
    /// Invariant: the position is always valid; the last token is Eof and
    /// is never advanced past.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Get the current token's kind (cheap clone: kinds carry at most an
    /// interned handle or a scalar).
    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind.clone()
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Get the previous token's span.
    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    /// Check if at end of token stream.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    /// Check if the current token matches the given kind.
    ///
    /// Intended for unit kinds (punctuation, keywords); data-carrying
    /// kinds have dedicated `check_*` methods.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current().kind == *kind
    }

    /// Check if the current token is an identifier.
    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current().kind, TokenKind::Ident(_))
    }

    /// Check if the current token is a variable.
    #[inline]
    pub fn check_variable(&self) -> bool {
        matches!(self.current().kind, TokenKind::Variable(_))
    }

    /// Check if the current token is a numeric literal.
    #[inline]
    pub fn check_number(&self) -> bool {
        matches!(self.current().kind, TokenKind::Int(_) | TokenKind::Float(_))
    }

    /// Peek at the next token (one-token lookahead). Returns the trailing
    /// Eof token when already at the end.
    pub fn peek_next(&self) -> &Token {
        self.tokens
            .get(self.pos + 1)
            .unwrap_or(&self.tokens[self.tokens.len() - 1])
    }

    /// Check if the previous and current tokens are adjacent (no
    /// whitespace between them).
    pub fn prev_current_adjacent(&self) -> bool {
        self.previous_span().is_adjacent_to(self.current_span())
    }

    /// Check if the current and next tokens are adjacent.
    pub fn current_next_adjacent(&self) -> bool {
        self.current_span().is_adjacent_to(self.peek_next().span)
    }

    /// Check if the next token (lookahead) is a left paren.
    #[inline]
    pub fn next_is_lparen(&self) -> bool {
        matches!(self.peek_next().kind, TokenKind::LParen)
    }

    /// Keywords that double as identifiers in value position
    /// (`background: linear-gradient(to right, ...)`).
    pub fn soft_keyword_name(&self) -> Option<&'static str> {
        match self.current().kind {
            TokenKind::From => Some("from"),
            TokenKind::Through => Some("through"),
            TokenKind::To => Some("to"),
            TokenKind::In => Some("in"),
            TokenKind::Only => Some("only"),
            _ => None,
        }
    }

    /// Advance to the next token and return the consumed token.
    ///
    /// Grammar rules always check the current token before advancing and
    /// the stream ends with Eof, so the cursor cannot run off the end.
    #[inline]
    pub fn advance(&mut self) -> &Token {
        let current = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Consume the current token if it matches, otherwise do nothing.
    /// Returns whether the token was consumed.
    #[inline]
    pub fn accept(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect the current token to be of the given kind, advance and
    /// return it. Structural mismatch is a fatal parse error.
    ///
    /// Split into inline happy path + `#[cold]` error path so the
    /// `format!()` allocation doesn't prevent inlining the fast case.
    #[inline]
    pub fn expect(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(kind))
        }
    }

    /// Build the error for a failed `expect()` call.
    #[cold]
    #[inline(never)]
    fn make_expect_error(&self, kind: &TokenKind) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected {}, found {}",
                kind.display_name(),
                self.current().kind.display_name()
            ),
            self.current_span(),
        )
        .with_context(format!("expected {}", kind.display_name()))
    }

    /// Expect and consume an identifier, returning its interned name.
    /// Also accepts soft keywords (`from`, `to`, ...) as identifiers.
    #[inline]
    pub fn expect_ident(&mut self) -> Result<Name, ParseError> {
        if let TokenKind::Ident(name) = self.current().kind {
            self.advance();
            Ok(name)
        } else if let Some(text) = self.soft_keyword_name() {
            let name = self.interner.intern(text);
            self.advance();
            Ok(name)
        } else {
            Err(self.make_expect_ident_error())
        }
    }

    /// Build the error for a failed `expect_ident()` call.
    #[cold]
    #[inline(never)]
    fn make_expect_ident_error(&self) -> ParseError {
        ParseError::new(
            ErrorCode::E1004,
            format!(
                "expected identifier, found {}",
                self.current().kind.display_name()
            ),
            self.current_span(),
        )
    }

    /// Expect and consume a variable token, returning its name.
    pub fn expect_variable(&mut self) -> Result<Name, ParseError> {
        if let TokenKind::Variable(name) = self.current().kind {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::new(
                ErrorCode::E1004,
                format!(
                    "expected variable, found {}",
                    self.current().kind.display_name()
                ),
                self.current_span(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str, interner: &StringInterner) -> TokenList {
        sable_lexer::lex(source, interner).unwrap()
    }

    #[test]
    fn cursor_navigation() {
        let interner = StringInterner::new();
        let list = tokens("$x: 42;", &interner);
        let mut cursor = Cursor::new(&list, &interner);

        assert!(cursor.check_variable());
        assert!(!cursor.is_at_end());

        cursor.advance();
        assert!(cursor.check(&TokenKind::Colon));

        cursor.advance();
        assert!(cursor.check_number());

        cursor.advance();
        assert!(cursor.check(&TokenKind::Semicolon));

        cursor.advance();
        assert!(cursor.is_at_end());
    }

    #[test]
    fn advance_saturates_at_eof() {
        let interner = StringInterner::new();
        let list = tokens("", &interner);
        let mut cursor = Cursor::new(&list, &interner);
        assert!(cursor.is_at_end());
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_at_end());
    }

    #[test]
    fn expect_success_and_failure() {
        let interner = StringInterner::new();
        let list = tokens("{ }", &interner);
        let mut cursor = Cursor::new(&list, &interner);

        assert!(cursor.expect(&TokenKind::LBrace).is_ok());
        let err = cursor.expect(&TokenKind::Semicolon).unwrap_err();
        assert_eq!(err.code, ErrorCode::E1001);
    }

    #[test]
    fn accept_consumes_only_on_match() {
        let interner = StringInterner::new();
        let list = tokens(", ;", &interner);
        let mut cursor = Cursor::new(&list, &interner);

        assert!(!cursor.accept(&TokenKind::Semicolon));
        assert_eq!(cursor.position(), 0);
        assert!(cursor.accept(&TokenKind::Comma));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn save_restore_position() {
        let interner = StringInterner::new();
        let list = tokens("a b c", &interner);
        let mut cursor = Cursor::new(&list, &interner);

        let saved = cursor.position();
        cursor.advance();
        cursor.advance();
        cursor.set_position(saved);
        assert_eq!(cursor.position(), 0);
        assert!(cursor.check_ident());
    }

    #[test]
    fn soft_keyword_as_ident() {
        let interner = StringInterner::new();
        let list = tokens("to", &interner);
        let mut cursor = Cursor::new(&list, &interner);
        let name = cursor.expect_ident().unwrap();
        assert_eq!(interner.resolve(name), "to");
    }

    #[test]
    fn adjacency() {
        let interner = StringInterner::new();
        let list = tokens("12px 20 px", &interner);
        let mut cursor = Cursor::new(&list, &interner);
        cursor.advance(); // past `12`
        assert!(cursor.prev_current_adjacent()); // `12` touches `px`
        cursor.advance(); // past `px`
        cursor.advance(); // past `20`
        assert!(!cursor.prev_current_adjacent()); // `20` does not touch `px`
    }
}
