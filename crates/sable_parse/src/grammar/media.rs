//! `@import`, `@charset` and `@media` grammar.

use sable_diagnostic::ErrorCode;
use sable_ir::{
    CharsetStatement, ImportStatement, ImportUrl, MediaFeature, MediaModifier, MediaQuery,
    MediaStatement, QuoteKind, Statement, StringVal, TokenKind,
};
use tracing::trace;

use crate::{ParseError, Parser};

impl<'a> Parser<'a> {
    /// `@import <url> [media-query-list] ;`
    ///
    /// A `url(...)` form classifies as an absolute import, a bare
    /// quoted/identifier URL as relative. The trailing media-query list
    /// is attached to the statement.
    pub(crate) fn parse_import(&mut self) -> Result<Statement, ParseError> {
        trace!("parse_import");
        let start = self.cursor.current_span();
        self.cursor.expect(&TokenKind::AtImport)?;

        let url = match self.cursor.current_kind() {
            TokenKind::Url(name) => {
                self.cursor.advance();
                ImportUrl::Absolute(name)
            }
            TokenKind::QuotedDouble(name) | TokenKind::QuotedSingle(name) => {
                self.cursor.advance();
                ImportUrl::Relative(name)
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                ImportUrl::Relative(name)
            }
            kind => {
                return Err(ParseError::new(
                    ErrorCode::E1007,
                    format!("invalid @import url: {}", kind.display_name()),
                    self.cursor.current_span(),
                ))
            }
        };

        let media = self.parse_media_query_list();

        if !self.cursor.accept(&TokenKind::Semicolon) {
            return Err(ParseError::new(
                ErrorCode::E1008,
                format!(
                    "expected `;` after @import, found {}",
                    self.cursor.current_kind().display_name()
                ),
                self.cursor.current_span(),
            ));
        }
        Ok(Statement::Import(ImportStatement {
            url,
            media,
            span: start.merge(self.cursor.previous_span()),
        }))
    }

    /// `@charset "<name>";`
    pub(crate) fn parse_charset(&mut self) -> Result<Statement, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(&TokenKind::AtCharset)?;
        let charset = match self.cursor.current_kind() {
            TokenKind::QuotedDouble(name) => {
                self.cursor.advance();
                StringVal::quoted(self.cursor.interner().resolve(name), QuoteKind::Double)
            }
            TokenKind::QuotedSingle(name) => {
                self.cursor.advance();
                StringVal::quoted(self.cursor.interner().resolve(name), QuoteKind::Single)
            }
            kind => {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    format!("expected charset string, found {}", kind.display_name()),
                    self.cursor.current_span(),
                ))
            }
        };
        if !self.cursor.accept(&TokenKind::Semicolon) {
            return Err(ParseError::new(
                ErrorCode::E1008,
                "expected `;` after @charset",
                self.cursor.current_span(),
            ));
        }
        Ok(Statement::Charset(CharsetStatement {
            charset,
            span: start.merge(self.cursor.previous_span()),
        }))
    }

    /// `@media <query-list> { ... }` — the query list may be empty, and
    /// the block's nested statements are kept on the statement.
    pub(crate) fn parse_media(&mut self) -> Result<Statement, ParseError> {
        trace!("parse_media");
        let start = self.cursor.current_span();
        self.cursor.expect(&TokenKind::AtMedia)?;
        let queries = self.parse_media_query_list();
        let block = self.parse_block()?;
        Ok(Statement::Media(MediaStatement {
            queries,
            block,
            span: start.merge(self.cursor.previous_span()),
        }))
    }

    /// Comma-separated media queries; empty when no query parses.
    pub(crate) fn parse_media_query_list(&mut self) -> Vec<MediaQuery> {
        let mut queries = Vec::new();
        if let Some(query) = self.try_parse(|p| p.parse_media_query()) {
            queries.push(query);
            while self.cursor.accept(&TokenKind::Comma) {
                if let Some(query) = self.try_parse(|p| p.parse_media_query()) {
                    queries.push(query);
                }
            }
        }
        queries
    }

    /// `[not|only]? <media-type>? [and]? (feature[: value]) [and (...)]*`
    fn parse_media_query(&mut self) -> Result<MediaQuery, ParseError> {
        let mut query = MediaQuery::default();

        match self.cursor.current_kind() {
            TokenKind::Not => {
                self.cursor.advance();
                query.modifier = Some(MediaModifier::Not);
                query.media_type = Some(self.cursor.expect_ident()?);
            }
            TokenKind::Only => {
                self.cursor.advance();
                query.modifier = Some(MediaModifier::Only);
                query.media_type = Some(self.cursor.expect_ident()?);
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                query.media_type = Some(name);
            }
            _ => {}
        }

        // A bare media type is a complete query unless `and` joins
        // feature expressions.
        if query.media_type.is_some() && !self.cursor.accept(&TokenKind::And) {
            return Ok(query);
        }

        loop {
            if !self.cursor.check(&TokenKind::LParen) {
                if query.media_type.is_none() && query.features.is_empty() {
                    return Err(ParseError::new(
                        ErrorCode::E1002,
                        "expected media query",
                        self.cursor.current_span(),
                    ));
                }
                break;
            }
            query.features.push(self.parse_media_feature()?);
            if !self.cursor.accept(&TokenKind::And) {
                break;
            }
        }
        Ok(query)
    }

    /// `( <feature> )` or `( <feature> : <value> )`
    fn parse_media_feature(&mut self) -> Result<MediaFeature, ParseError> {
        self.cursor.expect(&TokenKind::LParen)?;
        let name = self.parse_expression(false)?;
        let value = if self.cursor.accept(&TokenKind::Colon) {
            Some(self.parse_expression(false)?)
        } else {
            None
        };
        self.cursor.expect(&TokenKind::RParen)?;
        Ok(MediaFeature { name, value })
    }
}
