//! Constant folding over expression trees.
//!
//! [`can_reduce`] is a conservative shape pre-check; [`reduce`] attempts
//! the fold. The contract is asymmetric: `can_reduce` may say no to a
//! foldable expression (the fold is just skipped), but a yes that turns
//! out wrong must not crash — `reduce` returns `Ok(None)` and the caller
//! keeps the original tree.

use sable_ir::{
    BinaryOp, Expression, ListValue, MapValue, Span, StringVal, Value,
};

use crate::errors::EvalResult;
use crate::operators::{evaluate_binary, evaluate_concat, evaluate_unary};
use crate::Context;

/// Cap on variable-chain resolution, guarding against self-referential
/// bindings (`$x: $x`).
const MAX_RESOLVE_DEPTH: usize = 64;

/// Conservative pre-check: could [`reduce`] produce a value for this
/// expression without scope access?
///
/// Anything containing a variable, function call, bare identifier or url
/// is not statically reducible. A top-level unparenthesized division of
/// two unit-carrying number literals is CSS shorthand-slash notation and
/// must survive verbatim, so it reports unreducible too.
pub fn can_reduce(expr: &Expression) -> bool {
    match expr {
        Expression::Number(..)
        | Expression::Color(..)
        | Expression::Str(..)
        | Expression::Boolean(..)
        | Expression::Null(..) => true,
        Expression::Unary { operand, .. } => can_reduce(operand),
        Expression::Binary {
            op,
            left,
            right,
            in_paren,
        } => {
            if is_css_slash(*op, *in_paren, left, right) {
                return false;
            }
            can_reduce(left) && can_reduce(right)
        }
        Expression::Concat { left, right } => can_reduce(left) && can_reduce(right),
        Expression::Interpolation { inner, .. } => can_reduce(inner),
        Expression::List { items, .. } => items.iter().all(can_reduce),
        Expression::Map { entries } => entries
            .iter()
            .all(|(k, v)| can_reduce(k) && can_reduce(v)),
        Expression::Ident(..)
        | Expression::Variable(..)
        | Expression::FunctionCall { .. }
        | Expression::Url(..) => false,
    }
}

/// CSS shorthand-slash shape: `12px/24px` outside parentheses.
fn is_css_slash(op: BinaryOp, in_paren: bool, left: &Expression, right: &Expression) -> bool {
    op == BinaryOp::Div && !in_paren && is_unit_number(left) && is_unit_number(right)
}

fn is_unit_number(expr: &Expression) -> bool {
    matches!(expr, Expression::Number(n, _) if n.unit.is_some())
}

/// Attempt to fold `expr` to a value.
///
/// With a scope, variable references resolve through it (innermost
/// outward); without one — the parser's configuration — any variable
/// reference defers the fold.
pub fn reduce(expr: &Expression, scope: Option<&Context>) -> EvalResult {
    reduce_inner(expr, scope, 0)
}

fn reduce_inner(expr: &Expression, scope: Option<&Context>, depth: usize) -> EvalResult {
    if depth > MAX_RESOLVE_DEPTH {
        return Ok(None);
    }
    match expr {
        Expression::Number(n, _) => Ok(Some(Value::Number(*n))),
        Expression::Color(c, _) => Ok(Some(Value::Color(*c))),
        Expression::Str(s, _) => Ok(Some(Value::Str(s.clone()))),
        Expression::Boolean(b, _) => Ok(Some(Value::Bool(*b))),
        Expression::Null(_) => Ok(Some(Value::Null)),

        Expression::Variable(name, _) => match scope.and_then(|ctx| ctx.lookup(*name)) {
            Some(bound) => reduce_inner(bound, scope, depth + 1),
            None => Ok(None),
        },

        Expression::Unary { op, operand, .. } => {
            match reduce_inner(operand, scope, depth + 1)? {
                Some(value) => evaluate_unary(*op, &value),
                None => Ok(None),
            }
        }

        Expression::Binary {
            op,
            left,
            right,
            in_paren,
        } => {
            if is_css_slash(*op, *in_paren, left, right) {
                return Ok(None);
            }
            let Some(lhs) = reduce_inner(left, scope, depth + 1)? else {
                return Ok(None);
            };
            let Some(rhs) = reduce_inner(right, scope, depth + 1)? else {
                return Ok(None);
            };
            evaluate_binary(&lhs, &rhs, *op)
        }

        Expression::Concat { left, right } => {
            let Some(lhs) = reduce_inner(left, scope, depth + 1)? else {
                return Ok(None);
            };
            let Some(rhs) = reduce_inner(right, scope, depth + 1)? else {
                return Ok(None);
            };
            Ok(Some(evaluate_concat(&lhs, &rhs)))
        }

        Expression::Interpolation { inner, .. } => {
            match reduce_inner(inner, scope, depth + 1)? {
                Some(value) => Ok(Some(Value::Str(StringVal::bare(value.to_string())))),
                None => Ok(None),
            }
        }

        Expression::List { items, separator } => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                match reduce_inner(item, scope, depth + 1)? {
                    Some(value) => values.push(value),
                    None => return Ok(None),
                }
            }
            Ok(Some(Value::List(ListValue {
                items: values,
                separator: *separator,
            })))
        }

        Expression::Map { entries } => {
            let mut map = MapValue::new();
            for (key, value) in entries {
                let Some(k) = reduce_inner(key, scope, depth + 1)? else {
                    return Ok(None);
                };
                let Some(v) = reduce_inner(value, scope, depth + 1)? else {
                    return Ok(None);
                };
                map.insert(k, v);
            }
            Ok(Some(Value::Map(map)))
        }

        Expression::Ident(..) | Expression::FunctionCall { .. } | Expression::Url(..) => Ok(None),
    }
}

/// Convert a literal leaf (or literal-only list/map) to its value.
pub fn literal_to_value(expr: &Expression) -> Option<Value> {
    match expr {
        Expression::Number(n, _) => Some(Value::Number(*n)),
        Expression::Color(c, _) => Some(Value::Color(*c)),
        Expression::Str(s, _) => Some(Value::Str(s.clone())),
        Expression::Boolean(b, _) => Some(Value::Bool(*b)),
        Expression::Null(_) => Some(Value::Null),
        Expression::List { items, separator } => {
            let values = items
                .iter()
                .map(literal_to_value)
                .collect::<Option<Vec<_>>>()?;
            Some(Value::List(ListValue {
                items: values,
                separator: *separator,
            }))
        }
        Expression::Map { entries } => {
            let mut map = MapValue::new();
            for (key, value) in entries {
                map.insert(literal_to_value(key)?, literal_to_value(value)?);
            }
            Some(Value::Map(map))
        }
        _ => None,
    }
}

/// Splice a folded value back into the tree as a literal node.
pub fn value_to_expression(value: &Value, span: Span) -> Expression {
    match value {
        Value::Number(n) => Expression::Number(*n, span),
        Value::Color(c) => Expression::Color(*c, span),
        Value::Str(s) => Expression::Str(s.clone(), span),
        Value::Bool(b) => Expression::Boolean(*b, span),
        Value::Null => Expression::Null(span),
        Value::List(list) => Expression::List {
            items: list
                .items
                .iter()
                .map(|item| value_to_expression(item, span))
                .collect(),
            separator: list.separator,
        },
        Value::Map(map) => Expression::Map {
            entries: map
                .entries
                .iter()
                .map(|(k, v)| (value_to_expression(k, span), value_to_expression(v, span)))
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sable_ir::{Number, StringInterner, Unit};

    fn px(value: f64) -> Expression {
        Expression::Number(Number::with_unit(value, Unit::Px), Span::DUMMY)
    }

    fn plain(value: f64) -> Expression {
        Expression::Number(Number::new(value), Span::DUMMY)
    }

    fn binary(op: BinaryOp, left: Expression, right: Expression, in_paren: bool) -> Expression {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            in_paren,
        }
    }

    #[test]
    fn fold_chained_addition() {
        // 12px + 20px + 20px, left-associated
        let expr = binary(
            BinaryOp::Add,
            binary(BinaryOp::Add, px(12.0), px(20.0), false),
            px(20.0),
            false,
        );
        assert!(can_reduce(&expr));
        let value = reduce(&expr, None).unwrap().unwrap();
        assert_eq!(value, Value::Number(Number::with_unit(52.0, Unit::Px)));
    }

    #[test]
    fn css_slash_not_folded() {
        let expr = binary(BinaryOp::Div, px(12.0), px(24.0), false);
        assert!(!can_reduce(&expr));
        assert_eq!(reduce(&expr, None).unwrap(), None);
    }

    #[test]
    fn parenthesized_division_folds() {
        let expr = binary(BinaryOp::Div, px(4.0), plain(2.0), true);
        let value = reduce(&expr, None).unwrap().unwrap();
        assert_eq!(value, Value::Number(Number::with_unit(2.0, Unit::Px)));
    }

    #[test]
    fn parenthesized_unit_division_defers_without_crash() {
        // `(12px / 24px)` passes the shape pre-check but the unit rule
        // rejects the fold; the reducer must fall back, not fail.
        let expr = binary(BinaryOp::Div, px(12.0), px(24.0), true);
        assert!(can_reduce(&expr));
        assert_eq!(reduce(&expr, None).unwrap(), None);
    }

    #[test]
    fn fold_comparison_of_folded_sides() {
        // (3 + 3) > 2
        let expr = binary(
            BinaryOp::Gt,
            binary(BinaryOp::Add, plain(3.0), plain(3.0), true),
            plain(2.0),
            false,
        );
        let value = reduce(&expr, None).unwrap().unwrap();
        assert_eq!(value, Value::Bool(true));
    }

    #[test]
    fn variable_defers_without_scope() {
        let interner = StringInterner::new();
        let name = interner.intern("i");
        let expr = binary(
            BinaryOp::Gt,
            Expression::Variable(name, Span::DUMMY),
            plain(0.0),
            false,
        );
        assert!(!can_reduce(&expr));
        assert_eq!(reduce(&expr, None).unwrap(), None);
    }

    #[test]
    fn variable_resolves_with_scope() {
        let interner = StringInterner::new();
        let name = interner.intern("width");
        let mut ctx = Context::new();
        ctx.assign(name, px(10.0));
        let expr = binary(
            BinaryOp::Add,
            Expression::Variable(name, Span::DUMMY),
            px(5.0),
            false,
        );
        let value = reduce(&expr, Some(&ctx)).unwrap().unwrap();
        assert_eq!(value, Value::Number(Number::with_unit(15.0, Unit::Px)));
    }

    #[test]
    fn self_referential_variable_defers() {
        let interner = StringInterner::new();
        let name = interner.intern("x");
        let mut ctx = Context::new();
        ctx.assign(name, Expression::Variable(name, Span::DUMMY));
        let expr = Expression::Variable(name, Span::DUMMY);
        assert_eq!(reduce(&expr, Some(&ctx)).unwrap(), None);
    }

    #[test]
    fn interpolation_concat_folds_to_string() {
        // #{ 10 + 20 }px
        let interp = Expression::Interpolation {
            inner: Box::new(binary(BinaryOp::Add, plain(10.0), plain(20.0), true)),
            span: Span::DUMMY,
        };
        let expr = Expression::Concat {
            left: Box::new(interp),
            right: Box::new(Expression::Str(StringVal::bare("px"), Span::DUMMY)),
        };
        let value = reduce(&expr, None).unwrap().unwrap();
        assert_eq!(value, Value::Str(StringVal::bare("30px")));
    }

    #[test]
    fn value_expression_round_trip() {
        let value = Value::Number(Number::with_unit(52.0, Unit::Px));
        let expr = value_to_expression(&value, Span::DUMMY);
        assert_eq!(literal_to_value(&expr), Some(value));
    }

    #[test]
    fn bool_logic_chain_folds() {
        // true and true or true
        let expr = binary(
            BinaryOp::Or,
            binary(
                BinaryOp::And,
                Expression::Boolean(true, Span::DUMMY),
                Expression::Boolean(true, Span::DUMMY),
                false,
            ),
            Expression::Boolean(true, Span::DUMMY),
            false,
        );
        assert_eq!(reduce(&expr, None).unwrap(), Some(Value::Bool(true)));
    }

    #[test]
    fn function_call_defers() {
        let interner = StringInterner::new();
        let name = interner.intern("rgb");
        let expr = Expression::FunctionCall {
            name,
            args: vec![plain(255.0), plain(255.0), plain(255.0)],
            span: Span::DUMMY,
        };
        assert!(!can_reduce(&expr));
        assert_eq!(reduce(&expr, None).unwrap(), None);
    }
}
