use super::{LuaState, Result, VmError};
use crate::value::Value;

impl LuaState<'_> {
    pub fn get_top(&self) -> i32 {
        self.stack.top()
    }

    pub fn abs_index(&self, idx: i32) -> i32 {
        self.stack.abs_index(idx)
    }

    /// Reserves `n` free slots. Growth has no ceiling, so this always
    /// reports success.
    pub fn check_stack(&mut self, n: usize) -> bool {
        self.stack.check(n);
        true
    }

    pub fn pop(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.stack.pop()?;
        }
        Ok(())
    }

    pub fn copy(&mut self, from_idx: i32, to_idx: i32) -> Result<()> {
        let val = self.stack.get(from_idx)?.clone();
        self.stack.set(to_idx, val)
    }

    pub fn push_value(&mut self, idx: i32) -> Result<()> {
        let val = self.stack.get(idx)?.clone();
        self.stack.push(val)
    }

    /// Moves the top value into `idx`. `idx` is resolved before the pop.
    pub fn replace(&mut self, idx: i32) -> Result<()> {
        self.copy(-1, idx)?;
        self.pop(1)
    }

    pub fn insert(&mut self, idx: i32) -> Result<()> {
        self.rotate(idx, 1)
    }

    pub fn remove(&mut self, idx: i32) -> Result<()> {
        self.rotate(idx, -1)?;
        self.pop(1)
    }

    /// Rotates the values from `idx` to the top by `n` positions towards
    /// the top (`n < 0` rotates towards `idx`), by reversing the two
    /// halves around the split point and then the whole range.
    ///
    /// `idx` must be a live index and `|n|` at most the length of the
    /// rotated range; there is no wrap-around.
    pub fn rotate(&mut self, idx: i32, n: i32) -> Result<()> {
        let t = self.stack.top() - 1;
        let p = self.stack.abs_index(idx) - 1;
        if !self.stack.is_valid(idx) || n.unsigned_abs() > (t - p + 1) as u32 {
            return Err(VmError::InvalidRotate { idx, n });
        }
        let m = if n >= 0 { t - n } else { p - n - 1 };
        self.stack.reverse(p, m);
        self.stack.reverse(m + 1, t);
        self.stack.reverse(p, t);
        Ok(())
    }

    /// Sets the top to `idx`: shrinking drops values, growing fills with
    /// nil.
    pub fn set_top(&mut self, idx: i32) -> Result<()> {
        let new_top = self.stack.abs_index(idx);
        if new_top < 0 {
            return Err(VmError::StackUnderflow);
        }

        let n = self.stack.top() - new_top;
        if n > 0 {
            self.pop(n as usize)?;
        } else if n < 0 {
            self.stack.check(n.unsigned_abs() as usize);
            for _ in n..0 {
                self.stack.push(Value::Nil)?;
            }
        }
        Ok(())
    }
}
