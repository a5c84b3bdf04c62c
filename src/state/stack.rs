use tracing::trace;

use super::{LUA_REGISTRYINDEX, Result, VmError};
use crate::value::Value;

/// Growable array of values for one frame. `top` is one past the last
/// live slot and never exceeds the backing storage.
#[derive(Debug, Clone)]
pub struct LuaStack {
    slots: Vec<Value>,
    top: usize,
}

impl LuaStack {
    pub fn new(size: usize) -> Self {
        LuaStack { slots: vec![Value::Nil; size], top: 0 }
    }

    pub fn top(&self) -> i32 {
        self.top as i32
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Makes room for at least `n` more values above the top. Existing
    /// slots are kept.
    pub fn check(&mut self, n: usize) {
        let free = self.slots.len() - self.top;
        if free < n {
            trace!(top = self.top, from = self.slots.len(), to = self.top + n, "growing stack");
            self.slots.resize(self.top + n, Value::Nil);
        }
    }

    /// Does not grow; callers reserve with [`check`](Self::check) first.
    pub fn push(&mut self, val: Value) -> Result<()> {
        if self.top == self.slots.len() {
            return Err(VmError::StackOverflow);
        }
        self.slots[self.top] = val;
        self.top += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Value> {
        if self.top == 0 {
            return Err(VmError::StackUnderflow);
        }
        self.top -= 1;
        Ok(std::mem::take(&mut self.slots[self.top]))
    }

    pub fn abs_index(&self, idx: i32) -> i32 {
        if idx >= 0 || idx <= LUA_REGISTRYINDEX {
            idx
        } else {
            idx + self.top as i32 + 1
        }
    }

    pub fn is_valid(&self, idx: i32) -> bool {
        let abs = self.abs_index(idx);
        abs > 0 && abs <= self.top as i32
    }

    pub fn get(&self, idx: i32) -> Result<&Value> {
        if !self.is_valid(idx) {
            return Err(VmError::InvalidIndex { idx });
        }
        Ok(&self.slots[self.abs_index(idx) as usize - 1])
    }

    /// Writes to a pseudo-index are discarded: no registry or upvalue
    /// storage lives at this layer.
    pub fn set(&mut self, idx: i32, val: Value) -> Result<()> {
        if idx <= LUA_REGISTRYINDEX {
            return Ok(());
        }
        if !self.is_valid(idx) {
            return Err(VmError::InvalidIndex { idx });
        }
        let abs = self.abs_index(idx) as usize;
        self.slots[abs - 1] = val;
        Ok(())
    }

    /// Reverses the closed range of 0-based slots `[from, to]` in place;
    /// a range with `from >= to` is left alone.
    pub(crate) fn reverse(&mut self, from: i32, to: i32) {
        if 0 <= from && from < to {
            self.slots[from as usize..=to as usize].reverse();
        }
    }
}
