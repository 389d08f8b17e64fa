use pretty_assertions::assert_eq;

use crate::errors::ErrorKind;
use crate::tests::{as_bool, as_num, as_str, eval_err, eval_ok};
use crate::value::Value;

#[test]
fn truthiness_defaults() {
    let cases = [
        ("?null;", false),
        ("?0;", false),
        ("?1;", true),
        ("?-3.5;", true),
        (r#"?"";"#, false),
        (r#"?"a";"#, true),
        ("?[];", false),
        ("?[1];", true),
        ("?();", false),
        ("?(1,);", true),
        ("pub d = {}; ?d;", false),
        (r#"pub d = {"k": 1}; ?d;"#, true),
        ("pub o = Object(); ?o;", true),
    ];
    for (source, expected) in cases {
        assert_eq!(as_bool(&eval_ok(source)), expected, "source: {source}");
    }
}

#[test]
fn or_is_value_preserving() {
    assert_eq!(as_str(&eval_ok(r#"0 || "x";"#)), "x");
    assert!(matches!(eval_ok("0 || null;"), Value::Null));
    assert_eq!(as_num(&eval_ok("5 || 9;")), 5.0);
}

#[test]
fn and_collapses_to_bool() {
    // Deliberate asymmetry with `||`: `&&` never returns an operand.
    assert!(as_bool(&eval_ok("1 && 2;")));
    assert!(!as_bool(&eval_ok("0 && 2;")));
    assert!(!as_bool(&eval_ok("1 && 0;")));
}

#[test]
fn short_circuit_skips_the_right_operand() {
    // `missing` is undefined; short-circuiting must not evaluate it.
    assert_eq!(as_num(&eval_ok("1 || missing;")), 1.0);
    assert!(!as_bool(&eval_ok("0 && missing;")));
}

#[test]
fn identity_vs_equality() {
    assert!(as_bool(&eval_ok("pub a = [1]; pub b = a; a === b;")));
    assert!(!as_bool(&eval_ok("[1] === [1];")));
    assert!(as_bool(&eval_ok("[1] == [1];")));
    assert!(as_bool(&eval_ok("1 === 1;")));
}

#[test]
fn default_equality_per_kind() {
    assert!(as_bool(&eval_ok("null == null;")));
    assert!(as_bool(&eval_ok(r#""ab" == "ab";"#)));
    assert!(as_bool(&eval_ok("(1, 2) == (1, 2);")));
    assert!(!as_bool(&eval_ok("(1, 2) == (1, 3);")));
    assert!(as_bool(&eval_ok(r#"{"a": 1} == {"a": 1};"#)));
    assert!(!as_bool(&eval_ok(r#"{"a": 1} == {"a": 2};"#)));
    // Bool is a Num specialization.
    assert!(as_bool(&eval_ok("true == 1;")));
    // Distinct kinds are not equal.
    assert!(!as_bool(&eval_ok(r#"1 == "1";"#)));
    // Objects default to identity.
    assert!(!as_bool(&eval_ok("Object() == Object();")));
    assert!(as_bool(&eval_ok("pub o = Object(); o == o;")));
}

#[test]
fn neq_is_always_the_negation_of_eq() {
    assert!(!as_bool(&eval_ok("1 != 1;")));
    assert!(as_bool(&eval_ok(r#"1 != "1";"#)));
    // Even with a perverse user eq that says everything is equal.
    let source = r#"
        pub o = Object();
        edit o { spec fn eq(self, other) { return true; } }
        o != 12;
    "#;
    assert!(!as_bool(&eval_ok(source)));
}

#[test]
fn arithmetic_and_division_by_zero() {
    assert_eq!(as_num(&eval_ok("2 + 3 * 4;")), 14.0);
    assert_eq!(as_num(&eval_ok("2 ** 10;")), 1024.0);
    assert_eq!(as_num(&eval_ok("7 / 2;")), 3.5);
    assert_eq!(as_num(&eval_ok("true + true;")), 2.0);
    let err = eval_err("1 / 0;");
    assert_eq!(err.kind, ErrorKind::ValueError);
    assert!(err.message.contains("division by zero"));
}

#[test]
fn string_concat_coerces_the_right_operand() {
    assert_eq!(as_str(&eval_ok(r#""n=" + 1;"#)), "n=1");
    assert_eq!(as_str(&eval_ok(r#""v: " + null;"#)), "v: null");
    // But a number on the left does not coerce.
    assert_eq!(eval_err(r#"1 + "x";"#).kind, ErrorKind::TypeError);
}

#[test]
fn sequence_operators() {
    assert_eq!(as_num(&eval_ok("pub xs = [1] + [2, 3]; len(xs);")), 3.0);
    assert_eq!(as_str(&eval_ok(r#""ab" * 3;"#)), "ababab");
    assert_eq!(as_num(&eval_ok("len([0] * 4);")), 4.0);
}

#[test]
fn comparisons() {
    assert!(as_bool(&eval_ok("1 < 2;")));
    assert!(as_bool(&eval_ok("2 <= 2;")));
    assert!(as_bool(&eval_ok(r#""abc" < "abd";"#)));
    assert_eq!(eval_err("1 < \"2\";").kind, ErrorKind::TypeError);
}

#[test]
fn has_item_dispatches_on_the_container() {
    assert!(as_bool(&eval_ok("2 in [1, 2, 3];")));
    assert!(!as_bool(&eval_ok("9 in [1, 2, 3];")));
    assert!(as_bool(&eval_ok(r#""k" in {"k": 1};"#)));
    assert!(as_bool(&eval_ok(r#""bc" in "abcd";"#)));
    assert!(as_bool(&eval_ok("2 in (1, 2);")));
}

#[test]
fn pipe_merges_dicts_right_biased() {
    let source = r#"
        pub merged = {"a": 1, "b": 2} | {"b": 20, "c": 30};
        merged["a"] + merged["b"] + merged["c"];
    "#;
    assert_eq!(as_num(&eval_ok(source)), 51.0);
}

#[test]
fn pipe_builds_type_unions() {
    assert!(as_bool(&eval_ok("(Num | Str).check(1);")));
    assert!(as_bool(&eval_ok(r#"(Num | Str).check("x");"#)));
    assert!(!as_bool(&eval_ok("(Num | Str).check(null);")));
    // Unions flatten.
    assert!(as_bool(&eval_ok("(Num | Str | Null).check(null);")));
}

#[test]
fn amp_has_no_default() {
    assert_eq!(eval_err("1 & 2;").kind, ErrorKind::TypeError);
}

#[test]
fn unary_defaults() {
    assert_eq!(as_num(&eval_ok("-5;")), -5.0);
    assert_eq!(as_num(&eval_ok("+5;")), 5.0);
    assert_eq!(eval_err(r#"-"x";"#).kind, ErrorKind::TypeError);
}

#[test]
fn spec_override_routes_operators() {
    let source = r#"
        pub o = Object();
        edit o { spec fn add(self, other) { return 42; } }
        o + 1;
    "#;
    assert_eq!(as_num(&eval_ok(source)), 42.0);
}

#[test]
fn spec_override_routes_truthiness() {
    let source = r#"
        pub o = Object();
        edit o { spec fn bool(self) { return false; } }
        ?o;
    "#;
    assert!(!as_bool(&eval_ok(source)));
}

#[test]
fn repr_defaults() {
    assert_eq!(as_str(&eval_ok("repr(null);")), "null");
    assert_eq!(as_str(&eval_ok("repr(3);")), "3");
    assert_eq!(as_str(&eval_ok("repr(2.5);")), "2.5");
    assert_eq!(as_str(&eval_ok(r#"repr("a\nb");"#)), "\"a\\nb\"");
    assert_eq!(as_str(&eval_ok(r#"repr([1, "a"]);"#)), r#"[1, "a"]"#);
    assert_eq!(as_str(&eval_ok("repr((1,));")), "(1,)");
    assert_eq!(as_str(&eval_ok("repr(Object());")), "<Object>");
    assert_eq!(as_str(&eval_ok("repr(Num);")), "<type Num>");
}

#[test]
fn custom_repr_is_honoured_by_nested_containers() {
    let source = r#"
        pub o = Object();
        edit o { spec fn repr(self) { return "<custom>"; } }
        repr([o]);
    "#;
    assert_eq!(as_str(&eval_ok(source)), "[<custom>]");
}

#[test]
fn str_conversion() {
    assert_eq!(as_str(&eval_ok("str(3);")), "3");
    assert_eq!(as_str(&eval_ok(r#"str("x");"#)), "x");
    assert_eq!(as_str(&eval_ok("str(true);")), "true");
}

#[test]
fn unhashable_kinds_are_type_errors_as_dict_keys() {
    let err = eval_err("pub d = {[1]: 2};");
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("hashable"));
}
