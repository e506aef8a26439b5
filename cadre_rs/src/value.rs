//! Typed values for arguments and options.
//!
//! Every declared argument and option field carries a [`ValueKind`]; the
//! parser coerces raw tokens into [`Value`]s of that kind during binding.

use std::fmt;

/// The type a declared argument or option field coerces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Boolean flag; presence without a value means `true`.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// Unsigned 64-bit integer.
    Uint,
    /// 64-bit float.
    Float,
    /// String, passed through unchanged (including the empty string).
    Str,
    /// String sequence: repeated option occurrences accumulate, a variadic
    /// trailing argument captures all remaining positionals.
    StrList,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bool => write!(f, "boolean"),
            ValueKind::Int => write!(f, "integer"),
            ValueKind::Uint => write!(f, "unsigned integer"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::Str => write!(f, "string"),
            ValueKind::StrList => write!(f, "string list"),
        }
    }
}

/// A typed value bound from one or more tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    StrList(Vec<String>),
}

impl Value {
    /// The kind this value belongs to.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Uint(_) => ValueKind::Uint,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::StrList(_) => ValueKind::StrList,
        }
    }

    /// Coerce a raw token into a value of the given kind.
    ///
    /// Returns `None` on failure; the caller decides whether that is an
    /// `OptionInvalidValue` or an `ArgumentInvalidValue`. A `StrList` kind
    /// coerces a single occurrence; accumulation happens in the binder.
    pub fn coerce(kind: ValueKind, raw: &str) -> Option<Value> {
        match kind {
            ValueKind::Bool => parse_bool(raw).map(Value::Bool),
            ValueKind::Int => raw.parse::<i64>().ok().map(Value::Int),
            ValueKind::Uint => raw.parse::<u64>().ok().map(Value::Uint),
            ValueKind::Float => raw.parse::<f64>().ok().map(Value::Float),
            ValueKind::Str => Some(Value::Str(raw.to_string())),
            ValueKind::StrList => Some(Value::StrList(vec![raw.to_string()])),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::StrList(items) => Some(items),
            _ => None,
        }
    }
}

/// Parse a boolean token.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
