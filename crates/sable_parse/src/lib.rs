//! Recursive descent parser for the sable CSS preprocessor.
//!
//! Single-token lookahead with integer-cursor backtracking for the
//! ambiguous productions (map vs. list vs. expression, property vs.
//! nested rule set). The parser owns the compilation unit's scope stack
//! and invokes the constant folder at the end of each expression
//! production, so constant sub-expressions arrive in the AST already
//! collapsed to literals.
//!
//! Parsing is fail-fast: the first structural error aborts the unit.
//! There is no recovery or resynchronization mode.

mod cursor;
mod grammar;
mod snapshot;

pub use cursor::Cursor;
pub use snapshot::ParserSnapshot;

use sable_diagnostic::{Diagnostic, ErrorCode};
use sable_eval::Context;
use sable_ir::{Span, Statement, StringInterner, TokenList};

/// Parse error with error code for rich diagnostics.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseError {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Location of the error.
    pub span: Span,
    /// Optional context for suggestions.
    pub context: Option<String>,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Add context for better error messages.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Convert to a full Diagnostic for rich error reporting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, self.context.as_deref().unwrap_or("here"))
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} at {}", self.code, self.message, self.span)
    }
}

impl std::error::Error for ParseError {}

/// Parser state: token cursor plus the compilation unit's scope stack.
///
/// No ambient state — everything the grammar productions touch lives
/// here and is passed by `&mut self` through the call graph.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    context: Context,
}

impl<'a> Parser<'a> {
    /// Create a new parser over a token stream.
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
            context: Context::new(),
        }
    }

    /// Parse a whole stylesheet: statements until end of input.
    ///
    /// Returns the statement list together with the scope stack, whose
    /// global table holds every top-level variable assignment for the
    /// downstream evaluator.
    pub fn parse_stylesheet(mut self) -> Result<(Vec<Statement>, Context), ParseError> {
        let mut statements = Vec::new();
        while !self.cursor.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        debug_assert_eq!(self.context.depth(), 0, "unbalanced scope stack");
        Ok((statements, self.context))
    }
}

/// Parse tokens into a statement list.
pub fn parse(
    tokens: &TokenList,
    interner: &StringInterner,
) -> Result<Vec<Statement>, ParseError> {
    let (statements, _context) = Parser::new(tokens, interner).parse_stylesheet()?;
    Ok(statements)
}
