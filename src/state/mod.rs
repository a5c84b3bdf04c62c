//! Per-frame execution state: the value stack and the program counter
//! over one function prototype.
//!
//! Stack indices follow the embedding-API convention. Positive indices
//! count from the bottom of the frame starting at 1, negative indices
//! count down from the top (-1 is the topmost value), and indices at or
//! below [`LUA_REGISTRYINDEX`] are pseudo-indices passed through to
//! collaborators that own the registry and upvalues.

mod api_access;
mod api_arith;
mod api_stack;
mod api_vm;
mod stack;

pub use api_arith::ArithOp;
pub use stack::LuaStack;

use crate::binchunk::Prototype;

/// Free slots guaranteed to a frame on entry.
pub const LUA_MINSTACK: usize = 20;
pub const LUAI_MAXSTACK: i32 = 1_000_000;
pub const LUA_REGISTRYINDEX: i32 = -LUAI_MAXSTACK - 1000;

/// Faults raised while manipulating a frame. None are recovered inside
/// the core; the caller of the entry point decides how to report them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VmError {
    #[error("stack underflow")]
    StackUnderflow,
    #[error("stack overflow")]
    StackOverflow,
    #[error("invalid stack index {idx}")]
    InvalidIndex { idx: i32 },
    #[error("cannot rotate by {n} at index {idx}")]
    InvalidRotate { idx: i32, n: i32 },
    #[error("program counter {pc} outside code of length {len}")]
    PcOutOfRange { pc: i32, len: usize },
    #[error("constant index {idx} outside constant table of length {len}")]
    ConstantOutOfRange { idx: i32, len: usize },
    #[error("attempt to perform '{op}'")]
    DivisionByZero { op: &'static str },
    #[error("attempt to perform arithmetic on a {type_name} value")]
    ArithType { type_name: &'static str },
    #[error("number has no integer representation")]
    NoIntegerRepresentation,
}

impl VmError {
    pub fn code(&self) -> &'static str {
        match self {
            VmError::StackUnderflow => "LVM-S001",
            VmError::StackOverflow => "LVM-S002",
            VmError::InvalidIndex { .. } => "LVM-S003",
            VmError::InvalidRotate { .. } => "LVM-S004",
            VmError::PcOutOfRange { .. } => "LVM-S005",
            VmError::ConstantOutOfRange { .. } => "LVM-S006",
            VmError::DivisionByZero { .. } => "LVM-S007",
            VmError::ArithType { .. } => "LVM-S008",
            VmError::NoIntegerRepresentation => "LVM-S009",
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, VmError>;

/// One frame: a value stack, the prototype it executes and a program
/// counter into that prototype's code.
pub struct LuaState<'p> {
    stack: LuaStack,
    proto: &'p Prototype,
    pc: i32,
}

impl<'p> LuaState<'p> {
    pub fn new(stack_size: usize, proto: &'p Prototype) -> Self {
        LuaState { stack: LuaStack::new(stack_size), proto, pc: 0 }
    }

    pub fn proto(&self) -> &'p Prototype {
        self.proto
    }

    pub fn stack(&self) -> &LuaStack {
        &self.stack
    }
}
