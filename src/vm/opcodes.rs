// ── Opcode metadata ─────────────────────────────────────────────────
//
// Every 6-bit opcode value has an entry: the 47 defined opcodes followed
// by RESERVED no-ops up to 63, so table lookups never fail.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    IABC,
    IABx,
    IAsBx,
    IAx,
}

/// How an instruction uses its B or C operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpArgMode {
    /// Not used.
    N,
    /// Used as a plain number (count, upvalue index, flag).
    U,
    /// Register or jump offset.
    R,
    /// Constant or register/constant (RK).
    K,
}

#[derive(Debug, Clone, Copy)]
pub struct OpCode {
    /// Instruction is a test; the next instruction must be a jump.
    pub test_flag: bool,
    /// Instruction writes register A.
    pub set_a_flag: bool,
    pub arg_b_mode: OpArgMode,
    pub arg_c_mode: OpArgMode,
    pub op_mode: OpMode,
    pub name: &'static str,
}

pub const OP_MOVE: u8 = 0;
pub const OP_LOADK: u8 = 1;
pub const OP_LOADKX: u8 = 2;
pub const OP_LOADBOOL: u8 = 3;
pub const OP_LOADNIL: u8 = 4;
pub const OP_GETUPVAL: u8 = 5;
pub const OP_GETTABUP: u8 = 6;
pub const OP_GETTABLE: u8 = 7;
pub const OP_SETTABUP: u8 = 8;
pub const OP_SETUPVAL: u8 = 9;
pub const OP_SETTABLE: u8 = 10;
pub const OP_NEWTABLE: u8 = 11;
pub const OP_SELF: u8 = 12;
pub const OP_ADD: u8 = 13;
pub const OP_SUB: u8 = 14;
pub const OP_MUL: u8 = 15;
pub const OP_MOD: u8 = 16;
pub const OP_POW: u8 = 17;
pub const OP_DIV: u8 = 18;
pub const OP_IDIV: u8 = 19;
pub const OP_BAND: u8 = 20;
pub const OP_BOR: u8 = 21;
pub const OP_BXOR: u8 = 22;
pub const OP_SHL: u8 = 23;
pub const OP_SHR: u8 = 24;
pub const OP_UNM: u8 = 25;
pub const OP_BNOT: u8 = 26;
pub const OP_NOT: u8 = 27;
pub const OP_LEN: u8 = 28;
pub const OP_CONCAT: u8 = 29;
pub const OP_JMP: u8 = 30;
pub const OP_EQ: u8 = 31;
pub const OP_LT: u8 = 32;
pub const OP_LE: u8 = 33;
pub const OP_TEST: u8 = 34;
pub const OP_TESTSET: u8 = 35;
pub const OP_CALL: u8 = 36;
pub const OP_TAILCALL: u8 = 37;
pub const OP_RETURN: u8 = 38;
pub const OP_FORLOOP: u8 = 39;
pub const OP_FORPREP: u8 = 40;
pub const OP_TFORCALL: u8 = 41;
pub const OP_TFORLOOP: u8 = 42;
pub const OP_SETLIST: u8 = 43;
pub const OP_CLOSURE: u8 = 44;
pub const OP_VARARG: u8 = 45;
pub const OP_EXTRAARG: u8 = 46;

/// Number of opcodes with defined semantics.
pub const NUM_OPCODES: usize = 47;

use OpArgMode::{K, N, R, U};
use OpMode::{IABC, IABx, IAsBx, IAx};

const fn op(
    test_flag: bool,
    set_a_flag: bool,
    arg_b_mode: OpArgMode,
    arg_c_mode: OpArgMode,
    op_mode: OpMode,
    name: &'static str,
) -> OpCode {
    OpCode { test_flag, set_a_flag, arg_b_mode, arg_c_mode, op_mode, name }
}

const RESERVED: OpCode = op(false, false, N, N, IABC, "RESERVED");

pub static OPCODES: [OpCode; 64] = [
    //  T      A      B  C  mode    name
    op(false, true,  R, N, IABC,  "MOVE"),
    op(false, true,  K, N, IABx,  "LOADK"),
    op(false, true,  N, N, IABx,  "LOADKX"),
    op(false, true,  U, U, IABC,  "LOADBOOL"),
    op(false, true,  U, N, IABC,  "LOADNIL"),
    op(false, true,  U, N, IABC,  "GETUPVAL"),
    op(false, true,  U, K, IABC,  "GETTABUP"),
    op(false, true,  R, K, IABC,  "GETTABLE"),
    op(false, false, K, K, IABC,  "SETTABUP"),
    op(false, false, U, N, IABC,  "SETUPVAL"),
    op(false, false, K, K, IABC,  "SETTABLE"),
    op(false, true,  U, U, IABC,  "NEWTABLE"),
    op(false, true,  R, K, IABC,  "SELF"),
    op(false, true,  K, K, IABC,  "ADD"),
    op(false, true,  K, K, IABC,  "SUB"),
    op(false, true,  K, K, IABC,  "MUL"),
    op(false, true,  K, K, IABC,  "MOD"),
    op(false, true,  K, K, IABC,  "POW"),
    op(false, true,  K, K, IABC,  "DIV"),
    op(false, true,  K, K, IABC,  "IDIV"),
    op(false, true,  K, K, IABC,  "BAND"),
    op(false, true,  K, K, IABC,  "BOR"),
    op(false, true,  K, K, IABC,  "BXOR"),
    op(false, true,  K, K, IABC,  "SHL"),
    op(false, true,  K, K, IABC,  "SHR"),
    op(false, true,  R, N, IABC,  "UNM"),
    op(false, true,  R, N, IABC,  "BNOT"),
    op(false, true,  R, N, IABC,  "NOT"),
    op(false, true,  R, N, IABC,  "LEN"),
    op(false, true,  R, R, IABC,  "CONCAT"),
    op(false, false, R, N, IAsBx, "JMP"),
    op(true,  false, K, K, IABC,  "EQ"),
    op(true,  false, K, K, IABC,  "LT"),
    op(true,  false, K, K, IABC,  "LE"),
    op(true,  false, N, U, IABC,  "TEST"),
    op(true,  true,  R, U, IABC,  "TESTSET"),
    op(false, true,  U, U, IABC,  "CALL"),
    op(false, true,  U, U, IABC,  "TAILCALL"),
    op(false, false, U, N, IABC,  "RETURN"),
    op(false, true,  R, N, IAsBx, "FORLOOP"),
    op(false, true,  R, N, IAsBx, "FORPREP"),
    op(false, false, N, U, IABC,  "TFORCALL"),
    op(false, true,  R, N, IAsBx, "TFORLOOP"),
    op(false, false, U, U, IABC,  "SETLIST"),
    op(false, true,  U, N, IABx,  "CLOSURE"),
    op(false, true,  U, N, IABC,  "VARARG"),
    op(false, false, U, U, IAx,   "EXTRAARG"),
    RESERVED, RESERVED, RESERVED, RESERVED, RESERVED, RESERVED,
    RESERVED, RESERVED, RESERVED, RESERVED, RESERVED, RESERVED,
    RESERVED, RESERVED, RESERVED, RESERVED, RESERVED,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_six_bit_value() {
        assert_eq!(OPCODES.len(), 64);
        assert!(OPCODES[NUM_OPCODES..].iter().all(|o| o.name == "RESERVED"));
        assert!(OPCODES[..NUM_OPCODES].iter().all(|o| o.name != "RESERVED"));
    }

    #[test]
    fn constants_index_their_entries() {
        assert_eq!(OPCODES[OP_MOVE as usize].name, "MOVE");
        assert_eq!(OPCODES[OP_JMP as usize].name, "JMP");
        assert_eq!(OPCODES[OP_CLOSURE as usize].name, "CLOSURE");
        assert_eq!(OPCODES[OP_EXTRAARG as usize].name, "EXTRAARG");
        assert_eq!(OPCODES[OP_EXTRAARG as usize].op_mode, OpMode::IAx);
        assert_eq!(OPCODES[OP_FORPREP as usize].op_mode, OpMode::IAsBx);
        assert_eq!(OPCODES[OP_LOADK as usize].arg_b_mode, OpArgMode::K);
    }

    #[test]
    fn test_opcodes_are_flagged() {
        let tests: Vec<&str> = OPCODES.iter().filter(|o| o.test_flag).map(|o| o.name).collect();
        assert_eq!(tests, ["EQ", "LT", "LE", "TEST", "TESTSET"]);
    }
}
