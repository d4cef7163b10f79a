//! Parser snapshots for speculative parsing.
//!
//! Several productions are ambiguous until a full alternative has been
//! tried: a parenthesized value may be a map, a list or a plain
//! expression, and inside a declaration block `a:hover` only stops
//! looking like a property declaration once its value fails to parse.
//! Snapshots make those attempts cheap — the parser state worth saving
//! is a single integer cursor position.
//!
//! Prefer simple lookahead (`check`/`peek_next`) when one or two tokens
//! decide the question; reach for [`Parser::try_parse`] when the
//! decision requires attempting a whole production.
//!
//! # Side effects
//!
//! Restoring a snapshot rolls back the cursor, nothing else. The one
//! deliberate exception is documented on `parse_assignment`: a variable
//! write commits to the scope stack the moment the assignment's value is
//! parsed, and is not undone if an enclosing speculative parse is later
//! abandoned.

use crate::{ParseError, Parser};

/// A lightweight snapshot of parser state for speculative parsing.
#[derive(Clone, Copy, Debug)]
pub struct ParserSnapshot {
    pub(crate) cursor_pos: usize,
}

impl<'a> Parser<'a> {
    /// Capture the current parser state.
    #[inline]
    pub(crate) fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            cursor_pos: self.cursor.position(),
        }
    }

    /// Restore a previously captured state.
    #[inline]
    pub(crate) fn restore(&mut self, snapshot: ParserSnapshot) {
        self.cursor.set_position(snapshot.cursor_pos);
    }

    /// Attempt a full parse, restoring the cursor on failure.
    ///
    /// Returns `Some` with the production's result when it succeeds, or
    /// `None` with the cursor back where it started when it fails.
    pub(crate) fn try_parse<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Option<T> {
        let snapshot = self.snapshot();
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.restore(snapshot);
                None
            }
        }
    }
}
