//! Human-readable disassembly of a prototype tree, laid out like
//! `luac -l -l`.

use crate::binchunk::Prototype;
use crate::vm::{Instruction, OpArgMode, OpMode};

pub fn list(proto: &Prototype) -> String {
    let mut out = String::new();
    list_proto(&mut out, proto);
    out
}

fn list_proto(out: &mut String, proto: &Prototype) {
    emit_header(out, proto);
    emit_code(out, proto);
    emit_detail(out, proto);
    for child in &proto.protos {
        list_proto(out, child);
    }
}

/// `@file` and `=name` sources print without their marker.
fn display_source(source: &str) -> &str {
    source.strip_prefix(['@', '=']).unwrap_or(source)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 { format!("{n} {word}") } else { format!("{n} {word}s") }
}

fn emit_header(out: &mut String, proto: &Prototype) {
    let kind = if proto.line_defined > 0 { "function" } else { "main" };
    out.push_str(&format!(
        "\n{} <{}:{},{}> ({})\n",
        kind,
        display_source(&proto.source),
        proto.line_defined,
        proto.last_line_defined,
        plural(proto.code.len(), "instruction"),
    ));
    let vararg = if proto.is_vararg > 0 { "+" } else { "" };
    out.push_str(&format!(
        "{}{} params, {} slots, {}, {}, {}, {}\n",
        proto.num_params,
        vararg,
        proto.max_stack_size,
        plural(proto.upvalues.len(), "upvalue"),
        plural(proto.loc_vars.len(), "local"),
        plural(proto.constants.len(), "constant"),
        plural(proto.protos.len(), "function"),
    ));
}

fn emit_code(out: &mut String, proto: &Prototype) {
    for (pc, word) in proto.code.iter().enumerate() {
        let inst = Instruction(*word);
        let line = match proto.line_info.get(pc) {
            Some(&line) if line > 0 => line.to_string(),
            _ => "-".to_string(),
        };
        out.push_str(&format!(
            "\t{}\t[{}]\t{:<9}\t{}\n",
            pc + 1,
            line,
            inst.op_name(),
            operands(inst)
        ));
    }
}

/// RK operands naming a constant print as `-1 - k`.
fn rk(x: i32) -> i32 {
    if x > 0xFF { -1 - (x & 0xFF) } else { x }
}

pub fn operands(inst: Instruction) -> String {
    match inst.op_mode() {
        OpMode::IABC => {
            let (a, b, c) = inst.abc();
            let mut s = a.to_string();
            if inst.b_mode() != OpArgMode::N {
                s.push_str(&format!(" {}", rk(b)));
            }
            if inst.c_mode() != OpArgMode::N {
                s.push_str(&format!(" {}", rk(c)));
            }
            s
        }
        OpMode::IABx => {
            let (a, bx) = inst.a_bx();
            match inst.b_mode() {
                OpArgMode::K => format!("{a} {}", -1 - bx),
                OpArgMode::U => format!("{a} {bx}"),
                _ => a.to_string(),
            }
        }
        OpMode::IAsBx => {
            let (a, sbx) = inst.a_sbx();
            format!("{a} {sbx}")
        }
        OpMode::IAx => format!("{}", -1 - inst.ax()),
    }
}

fn emit_detail(out: &mut String, proto: &Prototype) {
    out.push_str(&format!("constants ({}) for {}:\n", proto.constants.len(), proto_id(proto)));
    for (i, k) in proto.constants.iter().enumerate() {
        out.push_str(&format!("\t{}\t{}\n", i + 1, k));
    }

    out.push_str(&format!("locals ({}) for {}:\n", proto.loc_vars.len(), proto_id(proto)));
    for (i, var) in proto.loc_vars.iter().enumerate() {
        out.push_str(&format!(
            "\t{}\t{}\t{}\t{}\n",
            i,
            var.var_name,
            var.start_pc + 1,
            var.end_pc + 1
        ));
    }

    out.push_str(&format!("upvalues ({}) for {}:\n", proto.upvalues.len(), proto_id(proto)));
    for (i, up) in proto.upvalues.iter().enumerate() {
        let name = proto.upvalue_names.get(i).map_or("-", String::as_str);
        out.push_str(&format!("\t{}\t{}\t{}\t{}\n", i, name, up.instack, up.idx));
    }
}

fn proto_id(proto: &Prototype) -> String {
    format!("{}:{}", display_source(&proto.source), proto.line_defined)
}
