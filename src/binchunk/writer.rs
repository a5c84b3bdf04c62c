use super::*;

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn write_byte(&mut self, b: u8) {
        self.buf.push(b);
    }

    fn write_u32(&mut self, n: u32) {
        self.buf.extend_from_slice(&n.to_le_bytes());
    }

    fn write_u64(&mut self, n: u64) {
        self.buf.extend_from_slice(&n.to_le_bytes());
    }

    fn write_lua_integer(&mut self, n: i64) {
        self.buf.extend_from_slice(&n.to_le_bytes());
    }

    fn write_lua_number(&mut self, n: f64) {
        self.buf.extend_from_slice(&n.to_bits().to_le_bytes());
    }

    fn write_string(&mut self, s: &str) {
        let size = s.len() as u64 + 1;
        if size < 0xFF {
            self.write_byte(size as u8);
        } else {
            self.write_byte(0xFF);
            self.write_u64(size);
        }
        self.buf.extend_from_slice(s.as_bytes());
    }

    fn write_vec<T>(&mut self, items: &[T], mut write: impl FnMut(&mut Self, &T)) {
        self.write_u32(items.len() as u32);
        for item in items {
            write(self, item);
        }
    }

    fn write_header(&mut self) {
        self.buf.extend_from_slice(LUA_SIGNATURE);
        self.write_byte(LUAC_VERSION);
        self.write_byte(LUAC_FORMAT);
        self.buf.extend_from_slice(LUAC_DATA);
        self.write_byte(CINT_SIZE);
        self.write_byte(CSIZET_SIZE);
        self.write_byte(INSTRUCTION_SIZE);
        self.write_byte(LUA_INTEGER_SIZE);
        self.write_byte(LUA_NUMBER_SIZE);
        self.write_lua_integer(LUAC_INT);
        self.write_lua_number(LUAC_NUM);
    }

    fn write_constant(&mut self, value: &Value) {
        match value {
            Value::Nil => self.write_byte(TAG_NIL),
            Value::Bool(b) => {
                self.write_byte(TAG_BOOLEAN);
                self.write_byte(*b as u8);
            }
            Value::Integer(i) => {
                self.write_byte(TAG_INTEGER);
                self.write_lua_integer(*i);
            }
            Value::Number(n) => {
                self.write_byte(TAG_NUMBER);
                self.write_lua_number(*n);
            }
            Value::Text(s) => {
                let tag = if s.len() <= LUAI_MAXSHORTLEN { TAG_SHORT_STR } else { TAG_LONG_STR };
                self.write_byte(tag);
                self.write_string(s);
            }
        }
    }

    fn write_proto(&mut self, proto: &Prototype, parent_source: &str) {
        // children sharing the parent's source store it once, at the top
        if proto.source == parent_source {
            self.write_byte(0);
        } else {
            self.write_string(&proto.source);
        }
        self.write_u32(proto.line_defined);
        self.write_u32(proto.last_line_defined);
        self.write_byte(proto.num_params);
        self.write_byte(proto.is_vararg);
        self.write_byte(proto.max_stack_size);
        self.write_vec(&proto.code, |w, inst| w.write_u32(*inst));
        self.write_vec(&proto.constants, Self::write_constant);
        self.write_vec(&proto.upvalues, |w, up| {
            w.write_byte(up.instack);
            w.write_byte(up.idx);
        });
        self.write_vec(&proto.protos, |w, child| w.write_proto(child, &proto.source));
        self.write_vec(&proto.line_info, |w, line| w.write_u32(*line));
        self.write_vec(&proto.loc_vars, |w, var| {
            w.write_string(&var.var_name);
            w.write_u32(var.start_pc);
            w.write_u32(var.end_pc);
        });
        self.write_vec(&proto.upvalue_names, |w, name| w.write_string(name));
    }
}

/// Serializes `proto` as a complete chunk with `proto` as the main function.
///
/// An empty source on a nested function is stored the same way as "same
/// as the parent", so loading the chunk back gives that function its
/// parent's source. Every other tree loads back unchanged.
pub fn dump(proto: &Prototype) -> Vec<u8> {
    let mut w = Writer { buf: Vec::with_capacity(HEADER_SIZE + 64) };
    w.write_header();
    w.write_byte(proto.upvalues.len() as u8);
    w.write_proto(proto, "");
    w.buf
}
