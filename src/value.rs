use crate::bindings::{NativeFunction, ObjectBinding};
use std::fmt;
use std::sync::Arc;

/// A runtime value.
///
/// `Nil` is the absent-binding marker: it is what a lookup of an unknown
/// name or property produces, and it is the only value the `??` operator
/// replaces. Everything coerces; evaluation never fails on a value of the
/// wrong type, it degrades to a neutral zero, false or empty string.
///
/// There is no boolean variant: booleans are the numbers `1` and `0`.
///
/// Objects and functions are shared behind [`Arc`], so values are cheap to
/// clone and safe to move across threads.
#[derive(Clone, Default)]
pub enum Value {
    /// The absent-binding marker.
    #[default]
    Nil,
    /// A finite double. NaN and infinities are normalized away on entry.
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Arc<dyn ObjectBinding>),
    Function(Arc<dyn NativeFunction>),
}

impl Value {
    /// Wraps a double, normalizing non-finite values to zero so they can
    /// never leak into scripts or propagate through arithmetic.
    pub fn number(value: f64) -> Value {
        if value.is_finite() {
            Value::Number(value)
        } else {
            Value::Number(0.0)
        }
    }

    pub fn string(value: impl Into<String>) -> Value {
        Value::String(value.into())
    }

    pub fn object(binding: impl ObjectBinding + 'static) -> Value {
        Value::Object(Arc::new(binding))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Numeric view: numbers are themselves, everything else is zero.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            _ => 0.0,
        }
    }

    /// Truth view: zero, `Nil` and empty strings/arrays are false,
    /// everything else is true.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// String view, used by `+` concatenation.
    pub fn as_string(&self) -> String {
        match self {
            Value::Nil => String::new(),
            Value::Number(n) => format!("{}", n),
            Value::String(s) => s.clone(),
            other => format!("{}", other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            // objects and functions compare by identity
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("Nil"),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::Object(_) => f.write_str("Object"),
            Value::Function(_) => f.write_str("Function"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("null"),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(_) => f.write_str("<object>"),
            Value::Function(_) => f.write_str("<function>"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Number(if value { 1.0 } else { 0.0 })
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(value)
    }
}
