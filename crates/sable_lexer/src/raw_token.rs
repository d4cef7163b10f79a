//! Raw token definitions for logos (before interning and literal
//! parsing).

use logos::{Lexer, Logos};

/// Consume the interior of a `url(...)` form through the closing paren.
///
/// The opening `url(` has already matched; everything up to and
/// including the first `)` becomes part of the token. A missing closer
/// is a lex error.
fn lex_url(lex: &mut Lexer<RawToken>) -> bool {
    match lex.remainder().find(')') {
        Some(end) => {
            lex.bump(end + 1);
            true
        }
        None => false,
    }
}

/// Raw token from logos (before cooking).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
pub enum RawToken {
    // Literals. Floats before ints so `33.3` never splits.
    #[regex(r"[0-9]*\.[0-9]+")]
    Float,
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r#""[^"]*""#)]
    QuotedDouble,
    #[regex(r"'[^']*'")]
    QuotedSingle,
    #[regex(r"url\(", lex_url)]
    Url,

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Keywords that the parser may also accept as identifiers.
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("from")]
    From,
    #[token("through")]
    Through,
    #[token("to")]
    To,
    #[token("in")]
    In,
    #[token("only")]
    Only,

    // Identifiers allow up to two leading hyphens for vendor prefixes
    // (`-webkit-...`) and trailing/interior hyphens (`first-name`,
    // `border-`).
    #[regex(r"-{0,2}[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_-]*")]
    Variable,
    #[regex(r"#[a-zA-Z0-9_-]+")]
    Hash,
    #[regex(r"\.-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    Class,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,

    #[token("#{")]
    InterpStart,

    #[token("@import")]
    AtImport,
    #[token("@media")]
    AtMedia,
    #[token("@charset")]
    AtCharset,
    #[token("@if")]
    AtIf,
    #[regex(r"@else[ \t]+if")]
    AtElseIf,
    #[token("@else")]
    AtElse,
    #[token("@for")]
    AtFor,
    #[token("@while")]
    AtWhile,

    #[token("..")]
    DotDot,

    #[token("!default")]
    Default,
    #[token("!optional")]
    Optional,
    #[token("!important")]
    Important,
    #[token("!global")]
    Global,

    #[token("&")]
    Amp,
}
