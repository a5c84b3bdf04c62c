use std::io::Write;
use std::process::{Command, Output};

use luavm::binchunk::{Prototype, dump};
use luavm::value::Value;
use luavm::vm::{Instruction, OP_LOADK, OP_RETURN};

fn luavm() -> Command {
    Command::new(env!("CARGO_BIN_EXE_luavm"))
}

fn sample() -> Prototype {
    Prototype {
        source: "@answer.lua".into(),
        max_stack_size: 2,
        code: vec![
            Instruction::encode_abx(OP_LOADK, 0, 0).0,
            Instruction::encode_abc(OP_RETURN, 0, 2, 0).0,
        ],
        constants: vec![Value::Integer(42)],
        line_info: vec![1, 1],
        ..Prototype::default()
    }
}

fn chunk_file(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(bytes).expect("write chunk");
    f
}

fn run(args: &[&str], file: &tempfile::NamedTempFile) -> Output {
    luavm()
        .args(args)
        .arg(file.path())
        .output()
        .expect("failed to run luavm")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// --- Listing ---

#[test]
fn lists_a_valid_chunk() {
    let file = chunk_file(&dump(&sample()));
    let out = run(&[], &file);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("main <answer.lua:0,0> (2 instructions)"), "{text}");
    assert!(text.contains("LOADK    \t0 -1"), "{text}");
    assert!(text.contains("constants (1) for answer.lua:0:\n\t1\t42\n"), "{text}");
}

#[test]
fn trailing_bytes_warn_but_succeed() {
    let mut bytes = dump(&sample());
    bytes.extend_from_slice(&[0, 0, 0]);
    let file = chunk_file(&bytes);
    let out = run(&["--no-color"], &file);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("warning: 3 trailing byte(s)"), "{}", stderr(&out));
    assert!(stdout(&out).contains("main <answer.lua"));
}

// --- JSON ---

#[test]
fn json_format_prints_prototype_tree() {
    let file = chunk_file(&dump(&sample()));
    let out = run(&["--format", "json"], &file);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let v: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("valid JSON");
    assert_eq!(v["source"], "@answer.lua");
    assert_eq!(v["code"].as_array().unwrap().len(), 2);
    assert_eq!(v["constants"][0]["type"], "integer");
    assert_eq!(v["constants"][0]["value"], 42);
}

#[test]
fn json_diagnostic_for_corrupt_chunk() {
    let mut bytes = dump(&sample());
    bytes[4] = 0x54;
    let file = chunk_file(&bytes);
    let out = run(&["--format", "json"], &file);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    let line = err.lines().find(|l| l.starts_with('{')).expect("JSON diagnostic line");
    let v: serde_json::Value = serde_json::from_str(line).expect("valid JSON");
    assert_eq!(v["severity"], "error");
    assert_eq!(v["code"], "LVM-F002");
    assert_eq!(v["label"]["start"], 4);
}

// --- Errors ---

#[test]
fn corrupt_chunk_exits_with_code() {
    let file = chunk_file(b"print('not compiled')\n");
    let out = run(&["--no-color"], &file);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("error[LVM-F001]: not a precompiled chunk"), "{err}");
    assert!(err.contains("--> byte 0"), "{err}");
    assert!(!err.contains("\x1b["), "{err}");
    assert!(stdout(&out).is_empty());
}

#[test]
fn truncated_chunk_exits_with_code() {
    let bytes = dump(&sample());
    let file = chunk_file(&bytes[..bytes.len() - 3]);
    let out = run(&["--no-color"], &file);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("error[LVM-F008]"), "{}", stderr(&out));
}

#[test]
fn missing_file_fails() {
    let out = luavm()
        .args(["--no-color", "/nonexistent/chunk.luac"])
        .output()
        .expect("failed to run luavm");
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("cannot read"), "{}", stderr(&out));
}

// --- Explain ---

#[test]
fn explain_known_code() {
    let out = luavm().args(["--explain", "LVM-F008"]).output().expect("failed to run luavm");
    assert!(out.status.success());
    assert!(stdout(&out).starts_with("## LVM-F008: truncated chunk"), "{}", stdout(&out));
}

#[test]
fn explain_unknown_code_lists_codes() {
    let out = luavm().args(["--explain", "LVM-X000"]).output().expect("failed to run luavm");
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("unknown error code 'LVM-X000'"), "{err}");
    assert!(err.contains("LVM-S004  invalid rotation"), "{err}");
}
