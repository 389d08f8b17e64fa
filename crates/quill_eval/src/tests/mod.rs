//! End-to-end behavioral tests: source text through the real lexer and
//! parser, evaluated against a buffered printer.

mod imports_tests;
mod objects_tests;
mod operators_tests;

use std::rc::Rc;

use quill_ir::SharedInterner;

use crate::errors::{ErrorKind, RuntimeError};
use crate::print::BufferPrint;
use crate::value::Value;
use crate::Interpreter;

/// Run a program; return its result value and captured print output.
pub(crate) fn eval_with_output(source: &str) -> Result<(Value, String), RuntimeError> {
    let interner = SharedInterner::new();
    let program = quill_parse::parse_source(source, &interner).expect("test program must parse");
    let mut interp = Interpreter::with_interner(interner, "<test>", source);
    let buffer = Rc::new(BufferPrint::new());
    interp.set_printer(buffer.clone());
    let value = interp.run(&program)?;
    Ok((value, buffer.contents()))
}

/// Run a program expected to succeed; return its last value.
pub(crate) fn eval_ok(source: &str) -> Value {
    match eval_with_output(source) {
        Ok((value, _)) => value,
        Err(err) => panic!("program failed: {err}\nsource: {source}"),
    }
}

/// Run a program expected to succeed; return what it printed.
pub(crate) fn output_of(source: &str) -> String {
    match eval_with_output(source) {
        Ok((_, output)) => output,
        Err(err) => panic!("program failed: {err}\nsource: {source}"),
    }
}

/// Run a program expected to fail; return the error.
pub(crate) fn eval_err(source: &str) -> RuntimeError {
    match eval_with_output(source) {
        Ok((value, _)) => panic!("expected failure, got {value:?}\nsource: {source}"),
        Err(err) => err,
    }
}

pub(crate) fn as_num(value: &Value) -> f64 {
    match value {
        Value::Num(n) => *n,
        other => panic!("expected Num, got {other:?}"),
    }
}

pub(crate) fn as_str(value: &Value) -> String {
    match value {
        Value::Str(s) => s.as_str().to_string(),
        other => panic!("expected Str, got {other:?}"),
    }
}

pub(crate) fn as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        other => panic!("expected Bool, got {other:?}"),
    }
}

// The two end-to-end scenarios every change must keep passing.

#[test]
fn e2e_arithmetic_and_print() {
    let output = output_of("pub x = 1; pub y = x + 2; print[y];");
    assert_eq!(output, "3\n");
}

#[test]
fn e2e_try_raise_catch() {
    let (_, output) =
        eval_with_output(r#"try { raise "boom"; } catch as e { print[e]; }"#).expect("must catch");
    assert_eq!(output, "boom\n");
}

#[test]
fn uncaught_raise_reports_kind_and_location() {
    let err = eval_err(r#"raise "kaboom";"#);
    assert_eq!(err.kind, ErrorKind::Raised);
    assert_eq!(err.message, "kaboom");
    assert!(err.has_location());
    let diagnostic = err.to_diagnostic();
    let rendered = diagnostic.render(quill_diagnostic::ColorMode::Never, false);
    assert!(rendered.contains("<test>:1:1"));
    assert!(rendered.contains("raise"));
}

#[test]
fn last_statement_value_is_the_program_result() {
    assert_eq!(as_num(&eval_ok("1 + 1; 2 + 2;")), 4.0);
    assert!(matches!(eval_ok("pub x = 9;"), Value::Null));
}

#[test]
fn undeclared_assignment_is_a_name_error() {
    let err = eval_err("y = 1;");
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(err.message.contains("undeclared"));
}

#[test]
fn undefined_name_is_a_name_error() {
    let err = eval_err("pub y = x + 2;");
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(err.message.contains("'x'"));
}

#[test]
fn del_removes_bindings() {
    let err = eval_err("pub x = 1; del x; x;");
    assert_eq!(err.kind, ErrorKind::NameError);
}

#[test]
fn dynamic_identifier_reads_and_writes() {
    assert_eq!(as_num(&eval_ok(r#"pub x = 5; $("x");"#)), 5.0);
    assert_eq!(as_num(&eval_ok(r#"pub x = 5; $("x") = 6; x;"#)), 6.0);
}

#[test]
fn fstring_interpolation_and_padding() {
    assert_eq!(
        as_str(&eval_ok(r#"pub x = 3; f"x is {x}!";"#)),
        "x is 3!"
    );
    assert_eq!(as_str(&eval_ok(r#"f"{5:03}";"#)), "005");
    assert_eq!(as_str(&eval_ok(r#"f"{1.5:.2}";"#)), "1.50");
}

#[test]
fn regex_literal_compiles_and_matches() {
    assert_eq!(
        as_str(&eval_ok(r#"re"[0-9]+".find("ab12cd");"#)),
        "12"
    );
    assert!(as_bool(&eval_ok(r#"re"^a".matches("abc");"#)));
    let err = eval_err(r#"re"(";"#);
    assert_eq!(err.kind, ErrorKind::ValueError);
}

#[test]
fn version_requirements() {
    // Interpreter::VERSION is 0.4.0.
    eval_ok("req v0.4;");
    eval_ok("req +v0.1;");
    eval_ok("req -v1.0;");
    eval_ok("req v0.1 - v1.0;");
    assert_eq!(eval_err("req v0.3;").kind, ErrorKind::VersionConflict);
    assert_eq!(eval_err("req +v1.0;").kind, ErrorKind::VersionConflict);
    assert_eq!(eval_err("req -v0.3;").kind, ErrorKind::VersionConflict);
    let err = eval_err("req v0.5 - v0.9;");
    assert!(err.message.contains("0.4.0"));
}
