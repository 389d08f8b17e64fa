use pretty_assertions::assert_eq;

use crate::errors::ErrorKind;
use crate::tests::{as_bool, as_num, as_str, eval_err, eval_ok};

#[test]
fn import_caching_returns_the_identical_module() {
    assert!(as_bool(&eval_ok(
        "import math; import math as m2; math === m2;"
    )));
}

#[test]
fn missing_module_is_not_found() {
    let err = eval_err("import nonexistent;");
    assert_eq!(err.kind, ErrorKind::ImportError);
    assert!(err.message.contains("not found"));
}

#[test]
fn math_module() {
    assert_eq!(as_num(&eval_ok("import math; math.sqrt(16);")), 4.0);
    assert_eq!(as_num(&eval_ok("import math; math.max(2, 9);")), 9.0);
    assert!(as_bool(&eval_ok("import math; math.pi > 3.14;")));
    assert_eq!(
        eval_err("import math; math.sqrt(-1);").kind,
        ErrorKind::ValueError
    );
}

#[test]
fn json_module_round_trip() {
    let source = r#"
        import json;
        pub parsed = json.parse("{\"a\": [1, 2], \"b\": null}");
        parsed["a"][1];
    "#;
    assert_eq!(as_num(&eval_ok(source)), 2.0);

    let source = r#"
        import json;
        json.parse(json.dumps({"k": [1, true, "s"]}))["k"][2];
    "#;
    assert_eq!(as_str(&eval_ok(source)), "s");

    assert_eq!(
        eval_err(r#"import json; json.parse("{oops");"#).kind,
        ErrorKind::ValueError
    );
}

#[test]
fn json_dumps_rejects_exotic_kinds_without_fallback() {
    assert_eq!(
        eval_err("import json; json.dumps(Object());").kind,
        ErrorKind::TypeError
    );
    // With the repr fallback flag, they serialize as strings.
    assert_eq!(
        as_str(&eval_ok("import json; json.dumps(Object(), true);")),
        "\"<Object>\""
    );
}

#[test]
fn toml_module() {
    let source = r#"
        import toml;
        pub parsed = toml.parse("x = 1\n[table]\ny = \"s\"");
        parsed["x"] + len(parsed["table"]["y"]);
    "#;
    assert_eq!(as_num(&eval_ok(source)), 2.0);
    assert_eq!(
        eval_err(r#"import toml; toml.parse("= bad");"#).kind,
        ErrorKind::ValueError
    );
}

#[test]
fn regex_module_compiles_patterns() {
    let source = r#"
        import regex;
        pub re = regex.compile("[a-z]+");
        re.find_all("ab1cd2")[1];
    "#;
    assert_eq!(as_str(&eval_ok(source)), "cd");
    assert_eq!(
        as_str(&eval_ok(
            r#"import regex; regex.compile("a+").replace("caaat", "a");"#
        )),
        "cat"
    );
}

#[test]
fn strings_module_is_partly_bootstrapped_in_language() {
    assert_eq!(
        as_str(&eval_ok(r#"import strings; strings.reverse("abc");"#)),
        "cba"
    );
    assert_eq!(
        as_str(&eval_ok(r#"import strings; strings.repeat("ab", 3);"#)),
        "ababab"
    );
    // capitalize and title come from the nested-eval bootstrap.
    assert_eq!(
        as_str(&eval_ok(r#"import strings; strings.capitalize("hello");"#)),
        "Hello"
    );
    assert_eq!(
        as_str(&eval_ok(r#"import strings; strings.title("ada lovelace");"#)),
        "Ada Lovelace"
    );
}

#[test]
fn module_repr_names_the_module() {
    assert_eq!(as_str(&eval_ok("import json; repr(json);")), "<json>");
}

#[test]
fn registered_modules_take_priority_over_loaders() {
    use quill_ir::SharedInterner;

    let interner = SharedInterner::new();
    let source = "import math; math.custom;";
    let program = quill_parse::parse_source(source, &interner).expect("parse");
    let mut interp = crate::Interpreter::with_interner(interner, "<test>", source);

    let mut module = crate::value::ObjectValue::named(interp.interner.intern("math"));
    module.public.insert(
        interp.interner.intern("custom"),
        crate::value::Value::num(99.0),
    );
    interp.register_module("math", crate::value::Value::object(module));

    let result = interp.run(&program).expect("registered module wins");
    assert_eq!(crate::tests::as_num(&result), 99.0);
}
