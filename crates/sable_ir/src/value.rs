//! Computed value model.
//!
//! The closed algebra the constant folder works over: numbers with
//! optional units, colors, strings, booleans, null, lists and maps.

use std::fmt;

use crate::Color;

/// CSS unit attached to a numeric value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Unit {
    Px,
    Pt,
    Em,
    Rem,
    Percent,
    Deg,
    Vh,
    Vw,
    Cm,
    Mm,
    In,
    Ms,
    S,
}

impl Unit {
    /// Classify an identifier as a unit suffix.
    ///
    /// Units are never inferred; the parser calls this only for a token
    /// immediately adjacent to a numeric literal.
    pub fn from_ident(text: &str) -> Option<Unit> {
        match text {
            "px" => Some(Unit::Px),
            "pt" => Some(Unit::Pt),
            "em" => Some(Unit::Em),
            "rem" => Some(Unit::Rem),
            "deg" => Some(Unit::Deg),
            "vh" => Some(Unit::Vh),
            "vw" => Some(Unit::Vw),
            "cm" => Some(Unit::Cm),
            "mm" => Some(Unit::Mm),
            "in" => Some(Unit::In),
            "ms" => Some(Unit::Ms),
            "s" => Some(Unit::S),
            _ => None,
        }
    }

    /// The suffix as written in CSS.
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Pt => "pt",
            Unit::Em => "em",
            Unit::Rem => "rem",
            Unit::Percent => "%",
            Unit::Deg => "deg",
            Unit::Vh => "vh",
            Unit::Vw => "vw",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
            Unit::In => "in",
            Unit::Ms => "ms",
            Unit::S => "s",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric value with an optional unit.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Number {
    pub value: f64,
    pub unit: Option<Unit>,
}

impl Number {
    /// Unitless number.
    pub fn new(value: f64) -> Self {
        Number { value, unit: None }
    }

    /// Number carrying a unit.
    pub fn with_unit(value: f64, unit: Unit) -> Self {
        Number {
            value,
            unit: Some(unit),
        }
    }

    /// Check whether the value has no fractional part.
    pub fn is_integral(&self) -> bool {
        self.value.fract() == 0.0 && self.value.is_finite()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integral() {
            write!(f, "{}", self.value as i64)?;
        } else {
            write!(f, "{}", self.value)?;
        }
        if let Some(unit) = self.unit {
            write!(f, "{unit}")?;
        }
        Ok(())
    }
}

/// Quote style of a string value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum QuoteKind {
    Double,
    Single,
    None,
}

/// A string value with its quote style.
#[derive(Clone, PartialEq, Debug)]
pub struct StringVal {
    pub value: String,
    pub quote: QuoteKind,
}

impl StringVal {
    pub fn quoted(value: impl Into<String>, quote: QuoteKind) -> Self {
        StringVal {
            value: value.into(),
            quote,
        }
    }

    /// Bare (unquoted) string, e.g. an identifier used as a value.
    pub fn bare(value: impl Into<String>) -> Self {
        StringVal {
            value: value.into(),
            quote: QuoteKind::None,
        }
    }
}

impl fmt::Display for StringVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quote {
            QuoteKind::Double => write!(f, "\"{}\"", self.value),
            QuoteKind::Single => write!(f, "'{}'", self.value),
            QuoteKind::None => f.write_str(&self.value),
        }
    }
}

/// Separator of a list value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ListSeparator {
    Comma,
    Space,
}

impl ListSeparator {
    pub fn as_str(self) -> &'static str {
        match self {
            ListSeparator::Comma => ", ",
            ListSeparator::Space => " ",
        }
    }
}

/// An ordered list of values.
#[derive(Clone, PartialEq, Debug)]
pub struct ListValue {
    pub items: Vec<Value>,
    pub separator: ListSeparator,
}

impl fmt::Display for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(self.separator.as_str())?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// An ordered map of value pairs.
///
/// Keys may repeat; lookup returns the last binding, iteration preserves
/// insertion order.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct MapValue {
    pub entries: Vec<(Value, Value)>,
}

impl MapValue {
    pub fn new() -> Self {
        MapValue {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: Value, value: Value) {
        self.entries.push((key, value));
    }

    /// Last-wins lookup.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        f.write_str(")")
    }
}

/// A computed value.
///
/// This is the closed output set of the expression reducer. The type set
/// is fixed, so pattern matching is preferred over trait objects for
/// exhaustiveness checking.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Number(Number),
    Color(Color),
    Str(StringVal),
    Bool(bool),
    Null,
    List(ListValue),
    Map(MapValue),
}

impl Value {
    /// Type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Color(_) => "color",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Color(c) => write!(f, "{c}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
            Value::List(l) => write!(f, "{l}"),
            Value::Map(m) => write!(f, "{m}"),
        }
    }
}
