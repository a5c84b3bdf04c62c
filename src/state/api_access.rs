use super::{LuaState, Result};
use crate::value::Value;

// ── Push ────────────────────────────────────────────────────────────

impl LuaState<'_> {
    pub fn push_nil(&mut self) -> Result<()> {
        self.stack.push(Value::Nil)
    }

    pub fn push_boolean(&mut self, b: bool) -> Result<()> {
        self.stack.push(Value::Bool(b))
    }

    pub fn push_integer(&mut self, n: i64) -> Result<()> {
        self.stack.push(Value::Integer(n))
    }

    pub fn push_number(&mut self, n: f64) -> Result<()> {
        self.stack.push(Value::Number(n))
    }

    pub fn push_string(&mut self, s: impl Into<String>) -> Result<()> {
        self.stack.push(Value::Text(s.into()))
    }

    // ── Inspect ─────────────────────────────────────────────────────

    /// Type name of the value at `idx`, or `"no value"` for an index
    /// outside the live stack.
    pub fn type_name(&self, idx: i32) -> &'static str {
        match self.stack.get(idx) {
            Ok(v) => v.type_name(),
            Err(_) => "no value",
        }
    }

    pub fn is_none(&self, idx: i32) -> bool {
        !self.stack.is_valid(idx)
    }

    pub fn is_nil(&self, idx: i32) -> bool {
        matches!(self.stack.get(idx), Ok(Value::Nil))
    }

    pub fn is_none_or_nil(&self, idx: i32) -> bool {
        matches!(self.stack.get(idx), Ok(Value::Nil) | Err(_))
    }

    pub fn is_boolean(&self, idx: i32) -> bool {
        matches!(self.stack.get(idx), Ok(Value::Bool(_)))
    }

    pub fn is_integer(&self, idx: i32) -> bool {
        matches!(self.stack.get(idx), Ok(Value::Integer(_)))
    }

    /// True for numbers and strings convertible to a number.
    pub fn is_number(&self, idx: i32) -> bool {
        self.to_numberx(idx).is_some()
    }

    /// Numbers count as strings since they convert to one.
    pub fn is_string(&self, idx: i32) -> bool {
        matches!(self.stack.get(idx), Ok(Value::Text(_) | Value::Integer(_) | Value::Number(_)))
    }

    // ── Convert ─────────────────────────────────────────────────────

    pub fn to_boolean(&self, idx: i32) -> bool {
        self.stack.get(idx).is_ok_and(Value::truthy)
    }

    pub fn to_integerx(&self, idx: i32) -> Option<i64> {
        self.stack.get(idx).ok()?.to_integer()
    }

    pub fn to_integer(&self, idx: i32) -> i64 {
        self.to_integerx(idx).unwrap_or(0)
    }

    pub fn to_numberx(&self, idx: i32) -> Option<f64> {
        self.stack.get(idx).ok()?.to_float()
    }

    pub fn to_number(&self, idx: i32) -> f64 {
        self.to_numberx(idx).unwrap_or(0.0)
    }

    /// String form of a string or number; other values have none.
    pub fn to_stringx(&self, idx: i32) -> Option<String> {
        match self.stack.get(idx).ok()? {
            Value::Text(s) => Some(s.clone()),
            v @ (Value::Integer(_) | Value::Number(_)) => Some(v.to_string()),
            _ => None,
        }
    }
}
