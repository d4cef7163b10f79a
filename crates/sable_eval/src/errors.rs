//! Evaluation errors.

use std::fmt;

use sable_diagnostic::{Diagnostic, ErrorCode};

/// A fatal evaluation error (e.g. an ordering comparison between
/// incomparable types).
///
/// Most failed folds are not errors — the reducer signals "cannot fold"
/// by returning `None` and the expression is deferred. `EvalError` is
/// reserved for operations the language defines as invalid.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EvalError {
    pub code: ErrorCode,
    pub message: String,
}

impl EvalError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        EvalError {
            code,
            message: message.into(),
        }
    }

    /// Convert to a full diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code).with_message(&self.message)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for EvalError {}

/// Outcome of a fold attempt: `Ok(Some(value))` when the fold succeeded,
/// `Ok(None)` when the expression must be deferred, `Err` on an invalid
/// operation.
pub type EvalResult = Result<Option<sable_ir::Value>, EvalError>;

/// Ordering comparison across incomparable operand types.
pub fn ordering_type_mismatch(left: &'static str, right: &'static str) -> EvalError {
    EvalError::new(
        ErrorCode::E2002,
        format!("cannot order {left} against {right}"),
    )
}
