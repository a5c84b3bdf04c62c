/// An entry in the error code registry.
pub struct ErrorEntry {
    pub code: &'static str,
    pub short: &'static str, // one line, listed when --explain gets an unknown code
    pub long: &'static str,  // full explanation for --explain
}

/// All stable error codes reported by luavm.
pub static REGISTRY: &[ErrorEntry] = &[
    // ── Chunk format ─────────────────────────────────────────────────────────
    ErrorEntry {
        code: "LVM-F001",
        short: "not a precompiled chunk",
        long: r#"## LVM-F001: not a precompiled chunk

The file does not start with the signature `\x1bLua`. Only compiled
chunks can be loaded; Lua source text must be compiled first.

**Fix:**

    luac -o hello.luac hello.lua
    luavm hello.luac
"#,
    },
    ErrorEntry {
        code: "LVM-F002",
        short: "chunk version mismatch",
        long: r#"## LVM-F002: chunk version mismatch

The version byte after the signature is not `0x53`. The chunk was
produced by a compiler for another Lua version, and chunk layouts
differ between versions.

Recompile the source with `luac` from Lua 5.3.
"#,
    },
    ErrorEntry {
        code: "LVM-F003",
        short: "chunk format mismatch",
        long: r#"## LVM-F003: chunk format mismatch

The format byte is not `0`, the official format. Chunks written by
modified compilers with a custom format cannot be loaded.
"#,
    },
    ErrorEntry {
        code: "LVM-F004",
        short: "corrupted chunk",
        long: r#"## LVM-F004: corrupted chunk

The six bytes `19 93 0d 0a 1a 0a` that follow the format byte did not
match. They exist to detect files damaged by text-mode transfers, which
rewrite line endings.

Copy the chunk again in binary mode.
"#,
    },
    ErrorEntry {
        code: "LVM-F005",
        short: "type size mismatch",
        long: r#"## LVM-F005: type size mismatch

One of the size bytes in the header (int, size_t, instruction,
lua_Integer, lua_Number) differs from the 4, 8, 4, 8, 8 this loader
expects. The chunk was compiled on a platform with different C type
sizes, or with a non-default integer or float type.
"#,
    },
    ErrorEntry {
        code: "LVM-F006",
        short: "endianness mismatch",
        long: r#"## LVM-F006: endianness mismatch

The header embeds the integer `0x5678`. Decoding it little-endian
produced a different value, so the chunk uses another byte order or
integer layout.
"#,
    },
    ErrorEntry {
        code: "LVM-F007",
        short: "float format mismatch",
        long: r#"## LVM-F007: float format mismatch

The header embeds the float `370.5`. Decoding it as a little-endian
IEEE 754 double produced a different value, so the chunk uses another
float representation.
"#,
    },
    ErrorEntry {
        code: "LVM-F008",
        short: "truncated chunk",
        long: r#"## LVM-F008: truncated chunk

The file ended in the middle of a field. The reported offset is where
the missing data should have started.

**Common causes:**
- an interrupted download or copy
- reading a chunk that is still being written
"#,
    },
    ErrorEntry {
        code: "LVM-F009",
        short: "unknown constant tag",
        long: r#"## LVM-F009: unknown constant tag

Each entry of a constant table starts with a type tag: `0x00` nil,
`0x01` boolean, `0x03` float, `0x13` integer, `0x04` or `0x14` string.
Any other tag means the chunk is corrupt or misaligned.
"#,
    },
    ErrorEntry {
        code: "LVM-F010",
        short: "bad string length",
        long: r#"## LVM-F010: bad string length

A long-form string prefix (`0xFF` followed by an 8-byte size) stored a
size of zero. Sizes count one byte more than the string length, so zero
is never valid.
"#,
    },
    ErrorEntry {
        code: "LVM-F011",
        short: "prototypes nested too deeply",
        long: r#"## LVM-F011: prototypes nested too deeply

Function prototypes are nested more than 200 levels deep. The Lua
compiler never produces such chunks, so the file is corrupt or crafted.
"#,
    },

    // ── Stack and VM ─────────────────────────────────────────────────────────
    ErrorEntry {
        code: "LVM-S001",
        short: "stack underflow",
        long: r#"## LVM-S001: stack underflow

A value was popped from an empty stack, or the top was set below the
bottom of the frame.
"#,
    },
    ErrorEntry {
        code: "LVM-S002",
        short: "stack overflow",
        long: r#"## LVM-S002: stack overflow

A value was pushed onto a full stack. Pushing never grows the stack;
space must be reserved first with `check_stack`.
"#,
    },
    ErrorEntry {
        code: "LVM-S003",
        short: "invalid stack index",
        long: r#"## LVM-S003: invalid stack index

An index did not name a live slot. Valid indices are `1..=top` and
`-top..=-1`; `0` is never valid.
"#,
    },
    ErrorEntry {
        code: "LVM-S004",
        short: "invalid rotation",
        long: r#"## LVM-S004: invalid rotation

`rotate(idx, n)` needs a live `idx` and `|n|` no larger than the number
of values from `idx` to the top. Rotations do not wrap around.
"#,
    },
    ErrorEntry {
        code: "LVM-S005",
        short: "program counter out of range",
        long: r#"## LVM-S005: program counter out of range

An instruction was fetched at a pc outside the function's code,
usually after a jump with a bad offset.
"#,
    },
    ErrorEntry {
        code: "LVM-S006",
        short: "constant index out of range",
        long: r#"## LVM-S006: constant index out of range

An instruction referenced a constant beyond the end of the function's
constant table.
"#,
    },
    ErrorEntry {
        code: "LVM-S007",
        short: "integer division by zero",
        long: r#"## LVM-S007: integer division by zero

Floor division (`//`) or modulo (`%`) with two integer operands and a
zero divisor. Float operands yield infinity or NaN instead.

**Example:**

    1 // 0     -- error
    1 // 0.0   -- inf
"#,
    },
    ErrorEntry {
        code: "LVM-S008",
        short: "arithmetic on a non-number",
        long: r#"## LVM-S008: arithmetic on a non-number

An arithmetic operand was nil, a boolean, or a string that does not
parse as a numeral.
"#,
    },
    ErrorEntry {
        code: "LVM-S009",
        short: "number has no integer representation",
        long: r#"## LVM-S009: number has no integer representation

Bitwise operators work on integers. A float operand is accepted only if
it has an exact integer value within the 64-bit range, so `3.0 & 1` is
fine but `3.5 & 1` is not.
"#,
    },
];

/// Look up an error entry by code (e.g. `"LVM-F008"`).
pub fn lookup(code: &str) -> Option<&'static ErrorEntry> {
    REGISTRY.iter().find(|e| e.code == code)
}
