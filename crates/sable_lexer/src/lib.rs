//! Lexer for the sable CSS preprocessor, built on logos.
//!
//! Tokenization is context-free: position-sensitive kinds (`*` as
//! universal selector vs. multiplication, `#name` as id selector vs. hex
//! color, `+`/`>` as combinator vs. operator) are emitted once and
//! classified by the parser. The produced [`TokenList`] is fully
//! materialized and always ends with an `Eof` token, which is what makes
//! integer-cursor backtracking safe.

mod raw_token;

use logos::Logos;
use sable_diagnostic::{Diagnostic, ErrorCode};
use sable_ir::{Span, StringInterner, Token, TokenKind, TokenList};

use raw_token::RawToken;

/// Lexing error: code, message and offending span.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LexError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl LexError {
    fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        LexError {
            code,
            message: message.into(),
            span,
        }
    }

    /// Convert to a full diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, "here")
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} at {}", self.code, self.message, self.span)
    }
}

impl std::error::Error for LexError {}

/// Tokenize `source` into a [`TokenList`], interning names into
/// `interner`.
///
/// Fails fast on the first lexical error.
pub fn lex(source: &str, interner: &StringInterner) -> Result<TokenList, LexError> {
    let mut tokens = TokenList::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let raw = result.map_err(|()| {
            let slice = lexer.slice();
            if slice.starts_with("url(") {
                LexError::new(ErrorCode::E0004, "unterminated url()", span)
            } else if slice.starts_with('"') || slice.starts_with('\'') {
                LexError::new(ErrorCode::E0001, "unterminated string literal", span)
            } else {
                LexError::new(
                    ErrorCode::E0002,
                    format!("invalid character `{slice}`"),
                    span,
                )
            }
        })?;
        let kind = cook(raw, lexer.slice(), span, interner)?;
        tokens.push(Token::new(kind, span));
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    tokens.push(Token::new(TokenKind::Eof, Span::point(end)));
    Ok(tokens)
}

/// Convert a raw logos token into a cooked [`TokenKind`], interning and
/// parsing literal text.
fn cook(
    raw: RawToken,
    slice: &str,
    span: Span,
    interner: &StringInterner,
) -> Result<TokenKind, LexError> {
    let kind = match raw {
        RawToken::Int => {
            let value: i64 = slice.parse().map_err(|_| {
                LexError::new(
                    ErrorCode::E0003,
                    format!("invalid integer literal `{slice}`"),
                    span,
                )
            })?;
            TokenKind::Int(value)
        }
        RawToken::Float => {
            let value: f64 = slice.parse().map_err(|_| {
                LexError::new(
                    ErrorCode::E0003,
                    format!("invalid float literal `{slice}`"),
                    span,
                )
            })?;
            TokenKind::Float(value.to_bits())
        }
        RawToken::QuotedDouble => TokenKind::QuotedDouble(interner.intern(strip_quotes(slice))),
        RawToken::QuotedSingle => TokenKind::QuotedSingle(interner.intern(strip_quotes(slice))),
        RawToken::Url => {
            // slice is `url( ... )`; capture the interior verbatim,
            // stripping one matching pair of quotes when present.
            let interior = slice["url(".len()..slice.len() - 1].trim();
            let interior = if (interior.starts_with('"') && interior.ends_with('"')
                || interior.starts_with('\'') && interior.ends_with('\''))
                && interior.len() >= 2
            {
                &interior[1..interior.len() - 1]
            } else {
                interior
            };
            TokenKind::Url(interner.intern(interior))
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),
        RawToken::Variable => TokenKind::Variable(interner.intern(&slice[1..])),
        RawToken::Hash => TokenKind::Hash(interner.intern(&slice[1..])),
        RawToken::Class => TokenKind::Class(interner.intern(&slice[1..])),

        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,

        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,

        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Bang => TokenKind::Bang,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Le => TokenKind::Le,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Ge => TokenKind::Ge,
        RawToken::AndAnd => TokenKind::AndAnd,
        RawToken::OrOr => TokenKind::OrOr,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,

        RawToken::InterpStart => TokenKind::InterpStart,

        RawToken::AtImport => TokenKind::AtImport,
        RawToken::AtMedia => TokenKind::AtMedia,
        RawToken::AtCharset => TokenKind::AtCharset,
        RawToken::AtIf => TokenKind::AtIf,
        RawToken::AtElse => TokenKind::AtElse,
        RawToken::AtElseIf => TokenKind::AtElseIf,
        RawToken::AtFor => TokenKind::AtFor,
        RawToken::AtWhile => TokenKind::AtWhile,

        RawToken::From => TokenKind::From,
        RawToken::Through => TokenKind::Through,
        RawToken::To => TokenKind::To,
        RawToken::In => TokenKind::In,
        RawToken::DotDot => TokenKind::DotDot,
        RawToken::Only => TokenKind::Only,

        RawToken::Default => TokenKind::Default,
        RawToken::Optional => TokenKind::Optional,
        RawToken::Important => TokenKind::Important,
        RawToken::Global => TokenKind::Global,

        RawToken::Amp => TokenKind::Amp,
    };
    Ok(kind)
}

/// Strip the surrounding quote pair from a quoted literal.
fn strip_quotes(slice: &str) -> &str {
    &slice[1..slice.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let interner = StringInterner::new();
        lex(source, &interner)
            .unwrap()
            .iter()
            .map(|t| t.kind.clone())
            .collect()
    }

    #[test]
    fn lex_rule_set() {
        let interner = StringInterner::new();
        let tokens = lex("div { color: red; }", &interner).unwrap();
        let div = interner.intern("div");
        let color = interner.intern("color");
        let red = interner.intern("red");
        assert_eq!(
            tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
            vec![
                TokenKind::Ident(div),
                TokenKind::LBrace,
                TokenKind::Ident(color),
                TokenKind::Colon,
                TokenKind::Ident(red),
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_variable_assignment() {
        let interner = StringInterner::new();
        let tokens = lex("$foo: 12px !default;", &interner).unwrap();
        let foo = interner.intern("foo");
        let px = interner.intern("px");
        assert_eq!(
            tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
            vec![
                TokenKind::Variable(foo),
                TokenKind::Colon,
                TokenKind::Int(12),
                TokenKind::Ident(px),
                TokenKind::Default,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_number_and_unit_are_adjacent() {
        let interner = StringInterner::new();
        let tokens = lex("12px 20 px", &interner).unwrap();
        // `12px`: number span touches unit span.
        assert!(tokens[0].span.is_adjacent_to(tokens[1].span));
        // `20 px`: whitespace between.
        assert!(!tokens[2].span.is_adjacent_to(tokens[3].span));
    }

    #[test]
    fn lex_selectors() {
        let interner = StringInterner::new();
        let tokens = lex("div#myId.first-name, *", &interner).unwrap();
        let my_id = interner.intern("myId");
        let first = interner.intern("first-name");
        assert_eq!(tokens[1].kind, TokenKind::Hash(my_id));
        assert_eq!(tokens[2].kind, TokenKind::Class(first));
        assert_eq!(tokens[3].kind, TokenKind::Comma);
        assert_eq!(tokens[4].kind, TokenKind::Star);
    }

    #[test]
    fn lex_hex_color_and_interpolation() {
        let interner = StringInterner::new();
        let tokens = lex("#fff #{ $w }", &interner).unwrap();
        let fff = interner.intern("fff");
        let w = interner.intern("w");
        assert_eq!(tokens[0].kind, TokenKind::Hash(fff));
        assert_eq!(tokens[1].kind, TokenKind::InterpStart);
        assert_eq!(tokens[2].kind, TokenKind::Variable(w));
        assert_eq!(tokens[3].kind, TokenKind::RBrace);
    }

    #[test]
    fn lex_url_quoted_and_bare() {
        let interner = StringInterner::new();
        let tokens = lex(r#"url("http://foo.com/bar.css") url(color.css)"#, &interner).unwrap();
        let quoted = interner.intern("http://foo.com/bar.css");
        let bare = interner.intern("color.css");
        assert_eq!(tokens[0].kind, TokenKind::Url(quoted));
        assert_eq!(tokens[1].kind, TokenKind::Url(bare));
    }

    #[test]
    fn lex_operators() {
        assert_eq!(
            kinds("== != <= >= && || < >"),
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_flags_beat_bang() {
        assert_eq!(
            kinds("!default !optional !important !global !"),
            vec![
                TokenKind::Default,
                TokenKind::Optional,
                TokenKind::Important,
                TokenKind::Global,
                TokenKind::Bang,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_at_rules() {
        assert_eq!(
            kinds("@if @else if @else @for @while @import @media @charset"),
            vec![
                TokenKind::AtIf,
                TokenKind::AtElseIf,
                TokenKind::AtElse,
                TokenKind::AtFor,
                TokenKind::AtWhile,
                TokenKind::AtImport,
                TokenKind::AtMedia,
                TokenKind::AtCharset,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_range_forms() {
        assert_eq!(
            kinds("from 1 through 20 in 1 .. 10"),
            vec![
                TokenKind::From,
                TokenKind::Int(1),
                TokenKind::Through,
                TokenKind::Int(20),
                TokenKind::In,
                TokenKind::Int(1),
                TokenKind::DotDot,
                TokenKind::Int(10),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_keyword_prefix_stays_ident() {
        let interner = StringInterner::new();
        let tokens = lex("fromage torn intact", &interner).unwrap();
        for token in tokens.iter().take(3) {
            assert!(
                matches!(token.kind, TokenKind::Ident(_)),
                "expected identifier, got {:?}",
                token.kind
            );
        }
    }

    #[test]
    fn lex_floats() {
        assert_eq!(
            kinds("33.3 .5"),
            vec![
                TokenKind::Float(33.3_f64.to_bits()),
                TokenKind::Float(0.5_f64.to_bits()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_comments_skipped() {
        assert_eq!(
            kinds("1 /* two */ 3 // four\n5"),
            vec![
                TokenKind::Int(1),
                TokenKind::Int(3),
                TokenKind::Int(5),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_invalid_character_errors() {
        let interner = StringInterner::new();
        let err = lex("div ^ {}", &interner).unwrap_err();
        assert_eq!(err.code, ErrorCode::E0002);
    }

    #[test]
    fn lex_unterminated_string_errors() {
        let interner = StringInterner::new();
        let err = lex("\"foo", &interner).unwrap_err();
        assert_eq!(err.code, ErrorCode::E0001);
    }

    #[test]
    fn lex_unterminated_url_errors() {
        let interner = StringInterner::new();
        let err = lex("url(foo.css", &interner).unwrap_err();
        assert_eq!(err.code, ErrorCode::E0004);
    }

    #[test]
    fn lex_strings() {
        let interner = StringInterner::new();
        let tokens = lex(r#""foo.css" 'bar'"#, &interner).unwrap();
        let foo = interner.intern("foo.css");
        let bar = interner.intern("bar");
        assert_eq!(tokens[0].kind, TokenKind::QuotedDouble(foo));
        assert_eq!(tokens[1].kind, TokenKind::QuotedSingle(bar));
    }
}
