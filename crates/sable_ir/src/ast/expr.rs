//! Expression nodes.

use crate::{Color, ListSeparator, Name, Number, Span, StringVal};

/// Unary operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Plus,
    Minus,
    /// `!` or `not`.
    Not,
}

/// Binary operator.
///
/// Literal concatenation is not an operator; adjacency produces a
/// dedicated [`Expression::Concat`] node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    /// Check whether this is a comparison operator.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    /// Check whether this is an ordering comparison (`<`, `<=`, `>`, `>=`).
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    /// Operator text for diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

/// An expression node.
///
/// Leaf literal variants double as the spliced-in results of constant
/// folding: the reducer converts a folded [`Value`] back into the
/// matching literal node.
///
/// [`Value`]: crate::Value
#[derive(Clone, PartialEq, Debug)]
pub enum Expression {
    Number(Number, Span),
    Color(Color, Span),
    Str(StringVal, Span),
    Boolean(bool, Span),
    Null(Span),
    /// Bare identifier in a non-value position (property-name fragment,
    /// media type). In value position bare identifiers become unquoted
    /// `Str` literals.
    Ident(Name, Span),
    Variable(Name, Span),
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        /// Whether this operator appeared inside parentheses. Division is
        /// only foldable between unit-carrying literals when it did (the
        /// CSS shorthand-slash rule).
        in_paren: bool,
    },
    FunctionCall {
        name: Name,
        args: Vec<Expression>,
        span: Span,
    },
    Interpolation {
        inner: Box<Expression>,
        span: Span,
    },
    List {
        items: Vec<Expression>,
        separator: ListSeparator,
    },
    Map {
        entries: Vec<(Expression, Expression)>,
    },
    /// Literal concatenation of two adjacent fragments (`#{$w}px`).
    Concat {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Url(Name, Span),
}

impl Expression {
    /// Source span covering this expression, where one is known.
    pub fn span(&self) -> Span {
        match self {
            Expression::Number(_, span)
            | Expression::Color(_, span)
            | Expression::Str(_, span)
            | Expression::Boolean(_, span)
            | Expression::Null(span)
            | Expression::Ident(_, span)
            | Expression::Variable(_, span)
            | Expression::Unary { span, .. }
            | Expression::FunctionCall { span, .. }
            | Expression::Interpolation { span, .. }
            | Expression::Url(_, span) => *span,
            Expression::Binary { left, right, .. } | Expression::Concat { left, right } => {
                left.span().merge(right.span())
            }
            Expression::List { items, .. } => items
                .iter()
                .map(Expression::span)
                .reduce(Span::merge)
                .unwrap_or(Span::DUMMY),
            Expression::Map { entries } => entries
                .iter()
                .map(|(k, v)| k.span().merge(v.span()))
                .reduce(Span::merge)
                .unwrap_or(Span::DUMMY),
        }
    }

    /// Check whether this node is a literal leaf (already a value).
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::Number(..)
                | Expression::Color(..)
                | Expression::Str(..)
                | Expression::Boolean(..)
                | Expression::Null(..)
        )
    }
}
