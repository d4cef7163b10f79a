//! Intermediate representation for the sable CSS preprocessor.
//!
//! Holds everything the pipeline stages share: source spans, interned
//! names, the token stream, the statement/expression AST and the
//! computed value/color model.

mod ast;
mod color;
mod interner;
mod name;
mod span;
mod token;
mod value;

pub use ast::{
    AssignFlags, BinaryOp, Block, CharsetStatement, Expression, ForStatement, IfStatement,
    ImportStatement, ImportUrl, MediaFeature, MediaModifier, MediaQuery, MediaStatement, Property,
    RuleSet, SelectorPart, Statement, UnaryOp, VariableAssignment, WhileStatement,
};
pub use color::{hsl_to_rgb, hue_to_rgb, rgb_to_hsl, Color};
pub use interner::StringInterner;
pub use name::Name;
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};
pub use value::{ListSeparator, ListValue, MapValue, Number, QuoteKind, StringVal, Unit, Value};
