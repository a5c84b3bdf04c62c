use serde::Serialize;

use crate::number;

/// A tagged value as stored in constant tables and on the value stack.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Integer(_) | Value::Number(_) => "number",
            Value::Text(_) => "string",
        }
    }

    /// Only `nil` and `false` are falsy.
    pub fn truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Float view of a number or numeric string.
    pub fn to_float(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Integer(i) => Some(*i as f64),
            Value::Text(s) => match str_to_number(s)? {
                Value::Integer(i) => Some(i as f64),
                Value::Number(n) => Some(n),
                _ => None,
            },
            Value::Nil | Value::Bool(_) => None,
        }
    }

    /// Integer view; floats must be exact and strings numeric.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Number(n) => number::float_to_integer(*n),
            Value::Text(s) => match str_to_number(s)? {
                Value::Integer(i) => Some(i),
                Value::Number(n) => number::float_to_integer(n),
                _ => None,
            },
            Value::Nil | Value::Bool(_) => None,
        }
    }
}

/// Parses a numeral, preferring the integer form.
pub fn str_to_number(s: &str) -> Option<Value> {
    number::parse_integer(s)
        .map(Value::Integer)
        .or_else(|| number::parse_float(s).map(Value::Number))
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Number(n) => f.write_str(&number::format_float(*n)),
            Value::Text(s) => write_quoted(f, s),
        }
    }
}

/// Quotes `s` the way `luac -l` prints string constants: C escapes for
/// control characters, `\ddd` for any other byte outside printable ASCII.
fn write_quoted(f: &mut std::fmt::Formatter<'_>, s: &str) -> std::fmt::Result {
    f.write_str("\"")?;
    for b in s.bytes() {
        match b {
            b'"' => f.write_str("\\\"")?,
            b'\\' => f.write_str("\\\\")?,
            0x07 => f.write_str("\\a")?,
            0x08 => f.write_str("\\b")?,
            0x0C => f.write_str("\\f")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            0x0B => f.write_str("\\v")?,
            0x20..=0x7E => write!(f, "{}", b as char)?,
            _ => write!(f, "\\{:03}", b)?,
        }
    }
    f.write_str("\"")
}
