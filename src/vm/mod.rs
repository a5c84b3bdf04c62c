mod opcodes;

pub use opcodes::*;

// ── Instruction encoding ────────────────────────────────────────────
//
//  31       22       13       5    0
//   +--------+--------+-------+----+
//   | B:9    | C:9    | A:8   |OP:6|   iABC
//   | Bx:18           | A:8   |OP:6|   iABx
//   | sBx:18          | A:8   |OP:6|   iAsBx
//   | Ax:26                   |OP:6|   iAx
//   +--------+--------+-------+----+

pub const MAXARG_BX: i32 = (1 << 18) - 1;
pub const MAXARG_SBX: i32 = MAXARG_BX >> 1;

/// One packed 32-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction(pub u32);

impl Instruction {
    #[inline(always)]
    pub fn opcode(self) -> u8 {
        (self.0 & 0x3F) as u8
    }

    #[inline(always)]
    pub fn abc(self) -> (i32, i32, i32) {
        let a = (self.0 >> 6 & 0xFF) as i32;
        let c = (self.0 >> 14 & 0x1FF) as i32;
        let b = (self.0 >> 23 & 0x1FF) as i32;
        (a, b, c)
    }

    #[inline(always)]
    pub fn a_bx(self) -> (i32, i32) {
        let a = (self.0 >> 6 & 0xFF) as i32;
        let bx = (self.0 >> 14) as i32;
        (a, bx)
    }

    /// sBx is stored as Bx biased by `MAXARG_SBX`, covering
    /// `-131071..=131072`.
    #[inline(always)]
    pub fn a_sbx(self) -> (i32, i32) {
        let (a, bx) = self.a_bx();
        (a, bx - MAXARG_SBX)
    }

    #[inline(always)]
    pub fn ax(self) -> i32 {
        (self.0 >> 6) as i32
    }

    fn info(self) -> &'static OpCode {
        &OPCODES[self.opcode() as usize]
    }

    pub fn op_name(self) -> &'static str {
        self.info().name
    }

    pub fn op_mode(self) -> OpMode {
        self.info().op_mode
    }

    pub fn b_mode(self) -> OpArgMode {
        self.info().arg_b_mode
    }

    pub fn c_mode(self) -> OpArgMode {
        self.info().arg_c_mode
    }

    pub fn test_flag(self) -> bool {
        self.info().test_flag
    }

    pub fn set_a_flag(self) -> bool {
        self.info().set_a_flag
    }

    // Operands are masked to their field width.

    pub fn encode_abc(op: u8, a: u32, b: u32, c: u32) -> Self {
        Instruction((op as u32 & 0x3F) | (a & 0xFF) << 6 | (c & 0x1FF) << 14 | (b & 0x1FF) << 23)
    }

    pub fn encode_abx(op: u8, a: u32, bx: u32) -> Self {
        Instruction((op as u32 & 0x3F) | (a & 0xFF) << 6 | (bx & 0x3FFFF) << 14)
    }

    pub fn encode_asbx(op: u8, a: u32, sbx: i32) -> Self {
        Self::encode_abx(op, a, (sbx + MAXARG_SBX) as u32)
    }

    pub fn encode_ax(op: u8, ax: u32) -> Self {
        Instruction((op as u32 & 0x3F) | (ax & 0x3FF_FFFF) << 6)
    }
}

impl From<u32> for Instruction {
    fn from(word: u32) -> Self {
        Instruction(word)
    }
}
