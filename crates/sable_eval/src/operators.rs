//! Binary and unary operator implementations for the constant folder.
//!
//! Direct enum-based dispatch per type pair. The value set is fixed, so
//! pattern matching is preferred over trait objects for exhaustiveness
//! checking. `Ok(None)` means "not foldable here — defer"; `Err` is
//! reserved for operations the language defines as invalid.

use sable_ir::{rgb_to_hsl, BinaryOp, Color, Number, StringVal, UnaryOp, Unit, Value};

use crate::errors::{ordering_type_mismatch, EvalResult};

/// Unit of an additive (`+`/`-`) or comparison result: identical units
/// or one operand unitless, propagating the non-empty unit. `None` means
/// the units are incompatible and the fold must be deferred.
fn combine_additive(a: Option<Unit>, b: Option<Unit>) -> Option<Option<Unit>> {
    match (a, b) {
        (None, None) => Some(None),
        (Some(u), None) | (None, Some(u)) => Some(Some(u)),
        (Some(u), Some(v)) if u == v => Some(Some(u)),
        _ => None,
    }
}

/// Unit of a multiplicative (`*`/`/`) result: at most one operand may
/// carry a unit, which propagates.
fn combine_multiplicative(a: Option<Unit>, b: Option<Unit>) -> Option<Option<Unit>> {
    match (a, b) {
        (Some(_), Some(_)) => None,
        (Some(u), None) | (None, Some(u)) => Some(Some(u)),
        (None, None) => Some(None),
    }
}

/// Evaluate a binary operation between two folded values.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => eval_number_binary(*a, *b, op),
        (Value::Color(c), Value::Number(n)) => eval_color_number_binary(*c, *n, op),
        // Commutative color arithmetic: re-expressed in the color's family.
        (Value::Number(n), Value::Color(c)) if matches!(op, BinaryOp::Add | BinaryOp::Mul) => {
            eval_color_number_binary(*c, *n, op)
        }
        (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(*a, *b, op),
        (Value::Str(a), Value::Str(b)) => eval_string_binary(a, b, op),
        (Value::Null, Value::Null) => match op {
            BinaryOp::Eq => Ok(Some(Value::Bool(true))),
            BinaryOp::NotEq => Ok(Some(Value::Bool(false))),
            _ => Ok(None),
        },
        (Value::List(a), Value::List(b)) => match op {
            BinaryOp::Eq => Ok(Some(Value::Bool(a == b))),
            BinaryOp::NotEq => Ok(Some(Value::Bool(a != b))),
            _ => Ok(None),
        },
        (Value::Map(a), Value::Map(b)) => match op {
            BinaryOp::Eq => Ok(Some(Value::Bool(a == b))),
            BinaryOp::NotEq => Ok(Some(Value::Bool(a != b))),
            _ => Ok(None),
        },
        // Mismatched types: unequal for equality, fatal for ordering.
        _ => match op {
            BinaryOp::Eq => Ok(Some(Value::Bool(false))),
            BinaryOp::NotEq => Ok(Some(Value::Bool(true))),
            op if op.is_ordering() => {
                Err(ordering_type_mismatch(left.type_name(), right.type_name()))
            }
            _ => Ok(None),
        },
    }
}

/// Binary operations on numbers, with unit propagation.
fn eval_number_binary(a: Number, b: Number, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add | BinaryOp::Sub => {
            let Some(unit) = combine_additive(a.unit, b.unit) else {
                return Ok(None);
            };
            let value = match op {
                BinaryOp::Add => a.value + b.value,
                _ => a.value - b.value,
            };
            Ok(Some(Value::Number(Number { value, unit })))
        }
        BinaryOp::Mul => {
            let Some(unit) = combine_multiplicative(a.unit, b.unit) else {
                return Ok(None);
            };
            Ok(Some(Value::Number(Number {
                value: a.value * b.value,
                unit,
            })))
        }
        BinaryOp::Div => {
            if b.value == 0.0 {
                return Ok(None);
            }
            let Some(unit) = combine_multiplicative(a.unit, b.unit) else {
                return Ok(None);
            };
            Ok(Some(Value::Number(Number {
                value: a.value / b.value,
                unit,
            })))
        }
        op if op.is_comparison() => {
            if combine_additive(a.unit, b.unit).is_none() {
                // Incompatible units: unequal, but not orderable.
                return match op {
                    BinaryOp::Eq => Ok(Some(Value::Bool(false))),
                    BinaryOp::NotEq => Ok(Some(Value::Bool(true))),
                    _ => Ok(None),
                };
            }
            let result = match op {
                BinaryOp::Eq => a.value == b.value,
                BinaryOp::NotEq => a.value != b.value,
                BinaryOp::Lt => a.value < b.value,
                BinaryOp::Le => a.value <= b.value,
                BinaryOp::Gt => a.value > b.value,
                _ => a.value >= b.value,
            };
            Ok(Some(Value::Bool(result)))
        }
        // `and`/`or` on numbers is not folded.
        _ => Ok(None),
    }
}

/// Color ⊕ number: channel-wise arithmetic on the RGB(A) representation,
/// clamped, re-expressed in the color's own family.
fn eval_color_number_binary(color: Color, n: Number, op: BinaryOp) -> EvalResult {
    if !matches!(
        op,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
    ) {
        return match op {
            BinaryOp::Eq => Ok(Some(Value::Bool(false))),
            BinaryOp::NotEq => Ok(Some(Value::Bool(true))),
            op if op.is_ordering() => Err(ordering_type_mismatch("color", "number")),
            _ => Ok(None),
        };
    }
    // A unit on the numeric operand makes the arithmetic meaningless.
    if n.unit.is_some() {
        return Ok(None);
    }
    if matches!(op, BinaryOp::Div) && n.value == 0.0 {
        return Ok(None);
    }

    let (r, g, b) = color.channels();
    let apply = |channel: u8| -> u8 {
        let value = f64::from(channel);
        let result = match op {
            BinaryOp::Add => value + n.value,
            BinaryOp::Sub => value - n.value,
            BinaryOp::Mul => value * n.value,
            BinaryOp::Div => value / n.value,
            _ => return channel,
        };
        result.clamp(0.0, 255.0) as u8
    };

    let (r, g, b) = (apply(r), apply(g), apply(b));
    let scale = |v: u8| u32::from(v) * 0x101;
    let result = match color {
        Color::Hex { a, .. } => Color::Hex { r, g, b, a },
        Color::Rgb { .. } => Color::Rgb {
            r: scale(r),
            g: scale(g),
            b: scale(b),
        },
        Color::Rgba { a, .. } => Color::Rgba {
            r: scale(r),
            g: scale(g),
            b: scale(b),
            a,
        },
        Color::Hsl { .. } => {
            let (h, s, l) = rgb_to_hsl(r, g, b);
            Color::Hsl { h, s, l }
        }
        Color::Hsla { a, .. } => {
            let (h, s, l) = rgb_to_hsl(r, g, b);
            Color::Hsla { h, s, l, a }
        }
    };
    Ok(Some(Value::Color(result)))
}

/// Binary operations on booleans.
fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::And => Ok(Some(Value::Bool(a && b))),
        BinaryOp::Or => Ok(Some(Value::Bool(a || b))),
        BinaryOp::Eq => Ok(Some(Value::Bool(a == b))),
        BinaryOp::NotEq => Ok(Some(Value::Bool(a != b))),
        op if op.is_ordering() => Err(ordering_type_mismatch("bool", "bool")),
        _ => Ok(None),
    }
}

/// Binary operations on strings: lexical comparison.
fn eval_string_binary(a: &StringVal, b: &StringVal, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq => Ok(Some(Value::Bool(a.value == b.value))),
        BinaryOp::NotEq => Ok(Some(Value::Bool(a.value != b.value))),
        BinaryOp::Lt => Ok(Some(Value::Bool(a.value < b.value))),
        BinaryOp::Le => Ok(Some(Value::Bool(a.value <= b.value))),
        BinaryOp::Gt => Ok(Some(Value::Bool(a.value > b.value))),
        BinaryOp::Ge => Ok(Some(Value::Bool(a.value >= b.value))),
        _ => Ok(None),
    }
}

/// Literal concatenation: the textual forms joined into an unquoted
/// string. No numeric coercion happens — numbers contribute their
/// serialized text.
pub fn evaluate_concat(left: &Value, right: &Value) -> Value {
    Value::Str(StringVal::bare(format!(
        "{}{}",
        concat_text(left),
        concat_text(right)
    )))
}

/// Text a value contributes to a concatenation: string content without
/// quotes, serialized form otherwise.
fn concat_text(value: &Value) -> String {
    match value {
        Value::Str(s) => s.value.clone(),
        other => other.to_string(),
    }
}

/// Evaluate a unary operation on a folded value.
pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> EvalResult {
    match (op, operand) {
        (UnaryOp::Minus, Value::Number(n)) => Ok(Some(Value::Number(Number {
            value: -n.value,
            unit: n.unit,
        }))),
        (UnaryOp::Plus, Value::Number(n)) => Ok(Some(Value::Number(*n))),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Some(Value::Bool(!b))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn px(value: f64) -> Value {
        Value::Number(Number::with_unit(value, Unit::Px))
    }

    fn plain(value: f64) -> Value {
        Value::Number(Number::new(value))
    }

    #[test]
    fn add_same_units() {
        let result = evaluate_binary(&px(10.0), &px(20.0), BinaryOp::Add).unwrap();
        assert_eq!(result, Some(px(30.0)));
    }

    #[test]
    fn add_unitless_adopts_unit() {
        let result = evaluate_binary(&px(10.0), &plain(5.0), BinaryOp::Add).unwrap();
        assert_eq!(result, Some(px(15.0)));
        let result = evaluate_binary(&plain(5.0), &px(10.0), BinaryOp::Sub).unwrap();
        assert_eq!(result, Some(px(-5.0)));
    }

    #[test]
    fn add_incompatible_units_defers() {
        let em = Value::Number(Number::with_unit(2.0, Unit::Em));
        let result = evaluate_binary(&px(10.0), &em, BinaryOp::Add).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn mul_one_unit_propagates() {
        let result = evaluate_binary(&plain(30.0), &px(3.0), BinaryOp::Mul).unwrap();
        assert_eq!(result, Some(px(90.0)));
    }

    #[test]
    fn mul_two_units_defers() {
        let result = evaluate_binary(&px(2.0), &px(3.0), BinaryOp::Mul).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn div_propagates_unit() {
        let result = evaluate_binary(&px(4.0), &plain(2.0), BinaryOp::Div).unwrap();
        assert_eq!(result, Some(px(2.0)));
    }

    #[test]
    fn div_by_zero_defers() {
        let result = evaluate_binary(&px(4.0), &plain(0.0), BinaryOp::Div).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn comparison_unit_aware() {
        let result = evaluate_binary(&px(6.0), &plain(2.0), BinaryOp::Gt).unwrap();
        assert_eq!(result, Some(Value::Bool(true)));
        let em = Value::Number(Number::with_unit(6.0, Unit::Em));
        let result = evaluate_binary(&px(6.0), &em, BinaryOp::Eq).unwrap();
        assert_eq!(result, Some(Value::Bool(false)));
        // Ordering across units is deferred, not invented.
        let result = evaluate_binary(&px(6.0), &em, BinaryOp::Lt).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn ordering_type_mismatch_is_fatal() {
        let s = Value::Str(StringVal::bare("a"));
        let result = evaluate_binary(&plain(1.0), &s, BinaryOp::Lt);
        assert!(result.is_err());
    }

    #[test]
    fn equality_type_mismatch_is_unequal() {
        let s = Value::Str(StringVal::bare("a"));
        assert_eq!(
            evaluate_binary(&plain(1.0), &s, BinaryOp::Eq).unwrap(),
            Some(Value::Bool(false))
        );
        assert_eq!(
            evaluate_binary(&plain(1.0), &s, BinaryOp::NotEq).unwrap(),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn color_plus_number() {
        let black = Value::Color(Color::Hex {
            r: 0,
            g: 0,
            b: 0,
            a: None,
        });
        let result = evaluate_binary(&black, &plain(10.0), BinaryOp::Add).unwrap();
        assert_eq!(
            result,
            Some(Value::Color(Color::Hex {
                r: 10,
                g: 10,
                b: 10,
                a: None
            }))
        );
    }

    #[test]
    fn color_mul_number() {
        let color = Value::Color(Color::Hex {
            r: 1,
            g: 1,
            b: 1,
            a: None,
        });
        let result = evaluate_binary(&color, &plain(20.0), BinaryOp::Mul).unwrap();
        assert_eq!(
            result,
            Some(Value::Color(Color::Hex {
                r: 20,
                g: 20,
                b: 20,
                a: None
            }))
        );
    }

    #[test]
    fn color_div_number() {
        let color = Value::Color(Color::Hex {
            r: 0x12,
            g: 0x12,
            b: 0x12,
            a: None,
        });
        let result = evaluate_binary(&color, &plain(2.0), BinaryOp::Div).unwrap();
        assert_eq!(
            result,
            Some(Value::Color(Color::Hex {
                r: 9,
                g: 9,
                b: 9,
                a: None
            }))
        );
    }

    #[test]
    fn color_channels_clamp() {
        let white = Value::Color(Color::Hex {
            r: 250,
            g: 250,
            b: 250,
            a: None,
        });
        let result = evaluate_binary(&white, &plain(100.0), BinaryOp::Add).unwrap();
        assert_eq!(
            result,
            Some(Value::Color(Color::Hex {
                r: 255,
                g: 255,
                b: 255,
                a: None
            }))
        );
        let result = evaluate_binary(&white, &plain(1000.0), BinaryOp::Sub).unwrap();
        assert_eq!(
            result,
            Some(Value::Color(Color::Hex {
                r: 0,
                g: 0,
                b: 0,
                a: None
            }))
        );
    }

    #[test]
    fn color_arithmetic_with_unit_defers() {
        let black = Value::Color(Color::Hex {
            r: 0,
            g: 0,
            b: 0,
            a: None,
        });
        let result = evaluate_binary(&black, &px(10.0), BinaryOp::Add).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn rgb_family_preserved() {
        let color = Value::Color(Color::Rgb {
            r: 0,
            g: 0,
            b: 0,
        });
        let result = evaluate_binary(&color, &plain(1.0), BinaryOp::Add).unwrap();
        assert_eq!(
            result,
            Some(Value::Color(Color::Rgb {
                r: 0x101,
                g: 0x101,
                b: 0x101
            }))
        );
    }

    #[test]
    fn bool_logic() {
        let t = Value::Bool(true);
        let f = Value::Bool(false);
        assert_eq!(
            evaluate_binary(&f, &t, BinaryOp::Or).unwrap(),
            Some(Value::Bool(true))
        );
        assert_eq!(
            evaluate_binary(&t, &f, BinaryOp::And).unwrap(),
            Some(Value::Bool(false))
        );
    }

    #[test]
    fn string_lexical_ordering() {
        let a = Value::Str(StringVal::bare("apple"));
        let b = Value::Str(StringVal::bare("banana"));
        assert_eq!(
            evaluate_binary(&a, &b, BinaryOp::Lt).unwrap(),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn concat_produces_bare_string() {
        let n = plain(30.0);
        let px_str = Value::Str(StringVal::bare("px"));
        let result = evaluate_concat(&n, &px_str);
        assert_eq!(result, Value::Str(StringVal::bare("30px")));
    }

    #[test]
    fn unary_negation() {
        assert_eq!(
            evaluate_unary(UnaryOp::Minus, &px(3.0)).unwrap(),
            Some(px(-3.0))
        );
        assert_eq!(
            evaluate_unary(UnaryOp::Not, &Value::Bool(true)).unwrap(),
            Some(Value::Bool(false))
        );
        assert_eq!(evaluate_unary(UnaryOp::Not, &plain(1.0)).unwrap(), None);
    }
}
