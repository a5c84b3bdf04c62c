//! Binary chunk format.
//!
//! A chunk is a fixed header followed by the size of the main closure's
//! upvalue list and the main function prototype, which recursively
//! contains every nested prototype. [`undump`] parses a chunk and
//! [`dump`] produces one.
//!
//! The header does not declare byte order or float layout; it embeds a
//! known integer and float instead, and a reader whose decoding of those
//! does not match bit for bit rejects the chunk.

mod reader;
mod writer;

use serde::Serialize;
use tracing::debug;

use crate::value::Value;

pub use writer::dump;

pub const LUA_SIGNATURE: &[u8; 4] = b"\x1bLua";
pub const LUAC_VERSION: u8 = 0x53;
pub const LUAC_FORMAT: u8 = 0;
pub const LUAC_DATA: &[u8; 6] = b"\x19\x93\r\n\x1a\n";
pub const CINT_SIZE: u8 = 4;
pub const CSIZET_SIZE: u8 = 8;
pub const INSTRUCTION_SIZE: u8 = 4;
pub const LUA_INTEGER_SIZE: u8 = 8;
pub const LUA_NUMBER_SIZE: u8 = 8;
pub const LUAC_INT: i64 = 0x5678;
pub const LUAC_NUM: f64 = 370.5;

/// Bytes in the header, up to and excluding the upvalue-count byte.
pub const HEADER_SIZE: usize = 33;

pub const TAG_NIL: u8 = 0x00;
pub const TAG_BOOLEAN: u8 = 0x01;
pub const TAG_NUMBER: u8 = 0x03;
pub const TAG_INTEGER: u8 = 0x13;
pub const TAG_SHORT_STR: u8 = 0x04;
pub const TAG_LONG_STR: u8 = 0x14;

/// Longest string written with the short-string tag.
pub const LUAI_MAXSHORTLEN: usize = 40;

/// Deepest prototype nesting accepted before the chunk is rejected.
pub const MAX_NESTING: usize = 200;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("not a precompiled chunk")]
    NotAChunk { offset: usize },
    #[error("version mismatch: expected {expected:#04x}, found {found:#04x}", expected = LUAC_VERSION)]
    VersionMismatch { offset: usize, found: u8 },
    #[error("format mismatch: expected {expected}, found {found}", expected = LUAC_FORMAT)]
    FormatMismatch { offset: usize, found: u8 },
    #[error("corrupted chunk: LUAC_DATA does not match")]
    Corrupted { offset: usize },
    #[error("{field} size mismatch: expected {expected}, found {found}")]
    SizeMismatch { offset: usize, field: &'static str, expected: u8, found: u8 },
    #[error("endianness mismatch: LUAC_INT read back as {found:#x}")]
    EndiannessMismatch { offset: usize, found: i64 },
    #[error("float format mismatch: LUAC_NUM read back as {found}")]
    FloatFormatMismatch { offset: usize, found: f64 },
    #[error("truncated chunk: {needed} byte(s) needed at offset {offset}")]
    Truncated { offset: usize, needed: u64 },
    #[error("unknown constant tag {tag:#04x}")]
    UnknownConstantTag { offset: usize, tag: u8 },
    #[error("bad string length {len}")]
    BadStringLength { offset: usize, len: u64 },
    #[error("function prototypes nested deeper than {max}", max = MAX_NESTING)]
    NestingTooDeep { offset: usize },
}

impl FormatError {
    /// Byte offset of the field that failed to decode.
    pub fn offset(&self) -> usize {
        match self {
            FormatError::NotAChunk { offset }
            | FormatError::VersionMismatch { offset, .. }
            | FormatError::FormatMismatch { offset, .. }
            | FormatError::Corrupted { offset }
            | FormatError::SizeMismatch { offset, .. }
            | FormatError::EndiannessMismatch { offset, .. }
            | FormatError::FloatFormatMismatch { offset, .. }
            | FormatError::Truncated { offset, .. }
            | FormatError::UnknownConstantTag { offset, .. }
            | FormatError::BadStringLength { offset, .. }
            | FormatError::NestingTooDeep { offset } => *offset,
        }
    }

    /// Stable code, see [`crate::diagnostic::registry`].
    pub fn code(&self) -> &'static str {
        match self {
            FormatError::NotAChunk { .. } => "LVM-F001",
            FormatError::VersionMismatch { .. } => "LVM-F002",
            FormatError::FormatMismatch { .. } => "LVM-F003",
            FormatError::Corrupted { .. } => "LVM-F004",
            FormatError::SizeMismatch { .. } => "LVM-F005",
            FormatError::EndiannessMismatch { .. } => "LVM-F006",
            FormatError::FloatFormatMismatch { .. } => "LVM-F007",
            FormatError::Truncated { .. } => "LVM-F008",
            FormatError::UnknownConstantTag { .. } => "LVM-F009",
            FormatError::BadStringLength { .. } => "LVM-F010",
            FormatError::NestingTooDeep { .. } => "LVM-F011",
        }
    }
}

// ── Prototype tree ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Prototype {
    pub source: String,
    pub line_defined: u32,
    pub last_line_defined: u32,
    pub num_params: u8,
    pub is_vararg: u8,
    pub max_stack_size: u8,
    pub code: Vec<u32>,
    pub constants: Vec<Value>,
    pub upvalues: Vec<Upvalue>,
    pub protos: Vec<Prototype>,
    pub line_info: Vec<u32>,
    pub loc_vars: Vec<LocVar>,
    pub upvalue_names: Vec<String>,
}

/// Where a closure finds an upvalue when it is created: a register of
/// the enclosing function (`instack != 0`) or one of its upvalues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Upvalue {
    pub instack: u8,
    pub idx: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocVar {
    pub var_name: String,
    pub start_pc: u32,
    pub end_pc: u32,
}

/// Parses a complete chunk into its main function prototype. Bytes after
/// the main function are ignored.
pub fn undump(data: &[u8]) -> Result<Prototype, FormatError> {
    let (main, used) = undump_prefix(data)?;
    if used < data.len() {
        debug!(trailing = data.len() - used, "ignoring bytes after main function");
    }
    Ok(main)
}

/// Like [`undump`], also returning how many bytes the chunk occupied.
pub fn undump_prefix(data: &[u8]) -> Result<(Prototype, usize), FormatError> {
    let mut reader = reader::Reader::new(data);
    reader.check_header()?;
    debug!(len = data.len(), "chunk header validated");
    reader.read_byte()?; // size_upvalues of the main closure
    let main = reader.read_proto("", 0)?;
    Ok((main, data.len() - reader.remaining()))
}
