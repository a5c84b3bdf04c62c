use tracing::trace;

use super::{LuaState, Result, VmError};
use crate::vm::Instruction;

/// Operand values above this select a constant rather than a register.
const RK_CONSTANT_BIT: i32 = 0xFF;

impl LuaState<'_> {
    pub fn pc(&self) -> i32 {
        self.pc
    }

    /// Moves the program counter by `n`. Bounds are checked by the next
    /// [`fetch`](Self::fetch).
    pub fn add_pc(&mut self, n: i32) {
        self.pc = self.pc.wrapping_add(n);
    }

    /// Returns the instruction at the program counter and advances it.
    pub fn fetch(&mut self) -> Result<Instruction> {
        let code = &self.proto.code;
        let word = usize::try_from(self.pc)
            .ok()
            .and_then(|pc| code.get(pc))
            .ok_or(VmError::PcOutOfRange { pc: self.pc, len: code.len() })?;
        let inst = Instruction(*word);
        trace!(pc = self.pc, op = inst.op_name(), "fetch");
        self.pc += 1;
        Ok(inst)
    }

    /// Pushes constant `idx` of the current prototype.
    pub fn get_const(&mut self, idx: i32) -> Result<()> {
        let constants = &self.proto.constants;
        let val = usize::try_from(idx)
            .ok()
            .and_then(|i| constants.get(i))
            .ok_or(VmError::ConstantOutOfRange { idx, len: constants.len() })?
            .clone();
        self.stack.push(val)
    }

    /// Pushes the value an RK operand names: constant `rk & 0xFF` when
    /// `rk > 0xFF`, otherwise register `rk` (stack index `rk + 1`).
    pub fn get_rk(&mut self, rk: i32) -> Result<()> {
        if rk > RK_CONSTANT_BIT {
            self.get_const(rk & RK_CONSTANT_BIT)
        } else {
            self.push_value(rk + 1)
        }
    }
}
