use tracing::debug;

use super::*;

type Result<T> = std::result::Result<T, FormatError>;

/// Smallest encoded prototype: empty source, two lines, three flags and
/// seven empty arrays.
const MIN_PROTO_SIZE: usize = 1 + 4 + 4 + 3 + 7 * 4;

/// Forward-only cursor over a chunk buffer.
pub(super) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(super) fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    pub(super) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(FormatError::Truncated { offset: self.pos, needed: n as u64 });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub(super) fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    fn read_lua_integer(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    fn read_lua_number(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Size prefix is one byte holding `len + 1`, or `0xFF` followed by
    /// a 64-bit `len + 1`. A zero byte is the empty string.
    fn read_string(&mut self) -> Result<String> {
        let offset = self.pos;
        let size = match self.read_byte()? {
            0 => return Ok(String::new()),
            0xFF => self.read_u64()?,
            b => b as u64,
        };
        let len = size
            .checked_sub(1)
            .ok_or(FormatError::BadStringLength { offset, len: size })?;
        if len > self.remaining() as u64 {
            return Err(FormatError::Truncated { offset: self.pos, needed: len });
        }
        let bytes = self.read_bytes(len as usize)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Every array in a prototype is a u32 count followed by that many
    /// elements, each encoded in at least `min_size` bytes.
    fn read_vec<T>(
        &mut self,
        min_size: usize,
        mut read: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let n = self.read_u32()? as usize;
        // a corrupt count must not drive the allocation
        let mut items = Vec::with_capacity(n.min(self.remaining() / min_size));
        for _ in 0..n {
            items.push(read(self)?);
        }
        Ok(items)
    }

    // ── Header ──────────────────────────────────────────────────────

    pub(super) fn check_header(&mut self) -> Result<()> {
        let offset = self.pos;
        if self.read_bytes(4)? != LUA_SIGNATURE {
            return Err(FormatError::NotAChunk { offset });
        }

        let offset = self.pos;
        let found = self.read_byte()?;
        if found != LUAC_VERSION {
            return Err(FormatError::VersionMismatch { offset, found });
        }

        let offset = self.pos;
        let found = self.read_byte()?;
        if found != LUAC_FORMAT {
            return Err(FormatError::FormatMismatch { offset, found });
        }

        let offset = self.pos;
        if self.read_bytes(6)? != LUAC_DATA {
            return Err(FormatError::Corrupted { offset });
        }

        for (field, expected) in [
            ("int", CINT_SIZE),
            ("size_t", CSIZET_SIZE),
            ("instruction", INSTRUCTION_SIZE),
            ("lua_Integer", LUA_INTEGER_SIZE),
            ("lua_Number", LUA_NUMBER_SIZE),
        ] {
            let offset = self.pos;
            let found = self.read_byte()?;
            if found != expected {
                return Err(FormatError::SizeMismatch { offset, field, expected, found });
            }
        }

        let offset = self.pos;
        let found = self.read_lua_integer()?;
        if found != LUAC_INT {
            return Err(FormatError::EndiannessMismatch { offset, found });
        }

        let offset = self.pos;
        let found = self.read_lua_number()?;
        if found.to_bits() != LUAC_NUM.to_bits() {
            return Err(FormatError::FloatFormatMismatch { offset, found });
        }
        Ok(())
    }

    // ── Prototypes ──────────────────────────────────────────────────

    pub(super) fn read_proto(&mut self, parent_source: &str, depth: usize) -> Result<Prototype> {
        if depth > MAX_NESTING {
            return Err(FormatError::NestingTooDeep { offset: self.pos });
        }

        let mut source = self.read_string()?;
        if source.is_empty() {
            source = parent_source.to_string();
        }

        let line_defined = self.read_u32()?;
        let last_line_defined = self.read_u32()?;
        let num_params = self.read_byte()?;
        let is_vararg = self.read_byte()?;
        let max_stack_size = self.read_byte()?;
        let code = self.read_vec(4, Self::read_u32)?;
        let constants = self.read_vec(1, Self::read_constant)?;
        let upvalues = self.read_vec(2, |r| {
            Ok(Upvalue { instack: r.read_byte()?, idx: r.read_byte()? })
        })?;
        let protos = self.read_vec(MIN_PROTO_SIZE, |r| r.read_proto(&source, depth + 1))?;
        let line_info = self.read_vec(4, Self::read_u32)?;
        let loc_vars = self.read_vec(9, |r| {
            Ok(LocVar {
                var_name: r.read_string()?,
                start_pc: r.read_u32()?,
                end_pc: r.read_u32()?,
            })
        })?;
        let upvalue_names = self.read_vec(1, Self::read_string)?;

        debug!(
            source = %source,
            line_defined,
            instructions = code.len(),
            constants = constants.len(),
            functions = protos.len(),
            "prototype loaded"
        );

        Ok(Prototype {
            source,
            line_defined,
            last_line_defined,
            num_params,
            is_vararg,
            max_stack_size,
            code,
            constants,
            upvalues,
            protos,
            line_info,
            loc_vars,
            upvalue_names,
        })
    }

    fn read_constant(&mut self) -> Result<Value> {
        let offset = self.pos;
        match self.read_byte()? {
            TAG_NIL => Ok(Value::Nil),
            TAG_BOOLEAN => Ok(Value::Bool(self.read_byte()? != 0)),
            TAG_INTEGER => Ok(Value::Integer(self.read_lua_integer()?)),
            TAG_NUMBER => Ok(Value::Number(self.read_lua_number()?)),
            TAG_SHORT_STR | TAG_LONG_STR => Ok(Value::Text(self.read_string()?)),
            tag => Err(FormatError::UnknownConstantTag { offset, tag }),
        }
    }
}
