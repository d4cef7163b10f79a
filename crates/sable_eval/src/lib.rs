//! Compile-time expression evaluation for the sable CSS preprocessor.
//!
//! The parser calls into this crate at the end of each expression
//! production to fold constant sub-expressions into literals. Anything
//! that cannot be folded (unresolved variables, function calls) is left
//! as-is for downstream evaluation — deferred work, not an error.

mod context;
mod errors;
mod operators;
mod reduce;

pub use context::{Context, ScopeFrame, SymbolTable};
pub use errors::{EvalError, EvalResult};
pub use operators::{evaluate_binary, evaluate_concat, evaluate_unary};
pub use reduce::{can_reduce, literal_to_value, reduce, value_to_expression};
