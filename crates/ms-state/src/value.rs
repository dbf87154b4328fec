//! Typed cell content.

use std::fmt;

/// The content of one value cell.
///
/// A cell keeps its variant for life: `Set` must supply the same variant and
/// numeric changes only apply to `Int` and `Float`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_)  => "bool",
            Value::Int(_)   => "int",
            Value::Float(_) => "float",
            Value::Text(_)  => "text",
        }
    }

    #[inline]
    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Numeric view: `Float` as is, `Int` widened.
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Value::Float(f) => Some(f),
            Value::Int(i)   => Some(i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// `self + by`, keeping `self`'s variant.  `None` if the kinds don't mix.
    ///
    /// An `Int` cell only accepts an `Int` delta; a `Float` cell accepts both.
    pub(crate) fn offset(&self, by: &Value, negate: bool) -> Option<Value> {
        match (self, by) {
            (Value::Int(a), Value::Int(b)) => {
                let b = if negate { b.saturating_neg() } else { *b };
                Some(Value::Int(a.saturating_add(b)))
            }
            (Value::Float(a), b) if b.is_numeric() => {
                let b = b.as_float()?;
                Some(Value::Float(if negate { a - b } else { a + b }))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b)  => write!(f, "{b}"),
            Value::Int(i)   => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s)  => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}
