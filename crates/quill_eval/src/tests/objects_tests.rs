use pretty_assertions::assert_eq;

use crate::errors::ErrorKind;
use crate::tests::{as_bool, as_num, as_str, eval_err, eval_ok};

const POINT: &str = r#"
    pub type Point {
        pub fn init(x, y) {
            self.x = x;
            self.y = y;
        }
        pub fn dist2(self) {
            return self.x * self.x + self.y * self.y;
        }
        spec fn repr(self) {
            return f"Point({self.x}, {self.y})";
        }
    }
"#;

#[test]
fn type_construction_and_attributes() {
    assert_eq!(as_num(&eval_ok(&format!("{POINT} Point(3, 4).x;"))), 3.0);
    assert_eq!(
        as_num(&eval_ok(&format!("{POINT} Point(3, 4).dist2();"))),
        25.0
    );
}

#[test]
fn custom_repr_spec_on_instances() {
    assert_eq!(
        as_str(&eval_ok(&format!("{POINT} repr(Point(1, 2));"))),
        "Point(1, 2)"
    );
}

#[test]
fn type_check_and_type_of() {
    assert!(as_bool(&eval_ok(&format!(
        "{POINT} Point.check(Point(0, 0));"
    ))));
    assert!(!as_bool(&eval_ok(&format!("{POINT} Point.check(3);"))));
    assert!(as_bool(&eval_ok(&format!(
        "{POINT} type_of(Point(0, 0)) === Point;"
    ))));
    assert!(as_bool(&eval_ok("type_of(3) === Num;")));
    assert!(as_bool(&eval_ok(r#"type_of("s") === Str;"#)));
}

#[test]
fn methods_are_bound_on_access() {
    let source = format!(
        r#"{POINT}
        pub p = Point(3, 4);
        pub m = p.dist2;
        m();
    "#
    );
    assert_eq!(as_num(&eval_ok(&source)), 25.0);
}

#[test]
fn attribute_assignment_mutates_the_instance() {
    let source = format!(
        r#"{POINT}
        pub p = Point(1, 1);
        p.x = 10;
        p.dist2();
    "#
    );
    assert_eq!(as_num(&eval_ok(&source)), 101.0);
}

#[test]
fn missing_attribute_is_an_attribute_error() {
    let err = eval_err(&format!("{POINT} Point(0, 0).z;"));
    assert_eq!(err.kind, ErrorKind::AttributeError);
    assert!(err.message.contains("'z'"));
}

#[test]
fn properties_auto_invoke_on_read() {
    let source = r#"
        pub type Circle {
            pub fn init(r) { self.r = r; }
            pub property area { return 3 * self.r * self.r; }
        }
        Circle(2).area;
    "#;
    assert_eq!(as_num(&eval_ok(source)), 12.0);
}

#[test]
fn edit_adds_attributes_in_place() {
    let source = r#"
        pub o = Object();
        edit o {
            pub a = 1;
            pub fn double(self) { return self.a * 2; }
        }
        o.a + o.double();
    "#;
    assert_eq!(as_num(&eval_ok(source)), 3.0);
}

#[test]
fn private_attributes_are_scoped() {
    let vault = r#"
        pub type Vault {
            pub fn init(code) { self.#code = code; }
            pub fn peek(self) { return self.#code; }
        }
    "#;
    // Inside a method the instance is part of the scope chain.
    assert_eq!(
        as_num(&eval_ok(&format!("{vault} Vault(42).peek();"))),
        42.0
    );
    // Outside it is a ScopeError.
    let err = eval_err(&format!("{vault} Vault(42).#code;"));
    assert_eq!(err.kind, ErrorKind::ScopeError);
}

#[test]
fn priv_declarations_are_invisible_to_lookup_and_attrs() {
    let source = r#"
        pub o = Object();
        edit o { priv hidden = 1; pub shown = 2; }
        o.hidden;
    "#;
    let err = eval_err(source);
    assert_eq!(err.kind, ErrorKind::AttributeError);
}

#[test]
fn parent_spec_rewires_attribute_lookup() {
    // `spec parent = ...` re-parents an object dynamically; lookup
    // through the child follows the new chain.
    let source = r#"
        pub donor = Object();
        edit donor { pub greeting = "hi"; }
        pub o = Object();
        edit o { spec parent = donor; }
        o.greeting;
    "#;
    assert_eq!(as_str(&eval_ok(source)), "hi");
}

#[test]
fn scope_objects_survive_their_block_when_captured() {
    // The block's scope frame is discarded, but the scope *object*
    // lives on inside the closure.
    let source = r#"
        pub f = null;
        {
            pub n = 10;
            f = fn () { return n; };
        }
        f();
    "#;
    assert_eq!(as_num(&eval_ok(source)), 10.0);
}

#[test]
fn dict_keys_go_through_the_hash_spec() {
    let source = r#"
        pub d = {1: "one", (1, 2): "pair", "s": "str"};
        d[1] + d[(1, 2)] + d["s"];
    "#;
    assert_eq!(as_str(&eval_ok(source)), "onepairstr");
}

#[test]
fn dict_key_identity_survives() {
    let source = r#"
        pub key = (1, 2);
        pub d = {key: "v"};
        d.keys()[0] === key;
    "#;
    assert!(as_bool(&eval_ok(source)));
}

#[test]
fn bool_and_num_keys_collide_by_value() {
    let source = r#"
        pub d = {1: "one"};
        d[true];
    "#;
    assert_eq!(as_str(&eval_ok(source)), "one");
}

#[test]
fn user_hash_and_eq_specs_key_dicts() {
    let source = r#"
        pub type Key {
            pub fn init(k) { self.k = k; }
            spec fn hash(self) { return 7; }
            spec fn eq(self, other) { return self.k == other.k; }
        }
        pub d = {Key(1): "a", Key(2): "b"};
        d[Key(2)];
    "#;
    assert_eq!(as_str(&eval_ok(source)), "b");
}

#[test]
fn dict_insert_overwrite_and_methods() {
    let source = r#"
        pub d = {"a": 1};
        d["b"] = 2;
        d["a"] = 10;
        pub total = 0;
        for pair in d.items() { total = total + pair[1]; }
        total + len(d.keys()) + num(d.has("a"));
    "#;
    assert_eq!(as_num(&eval_ok(source)), 15.0);
}

#[test]
fn missing_dict_key_is_a_key_error() {
    let err = eval_err(r#"pub d = {"a": 1}; d["b"];"#);
    assert_eq!(err.kind, ErrorKind::KeyError);
}

#[test]
fn list_indexing_and_assignment() {
    assert_eq!(as_num(&eval_ok("pub xs = [1, 2, 3]; xs[1];")), 2.0);
    assert_eq!(as_num(&eval_ok("pub xs = [1, 2, 3]; xs[-1];")), 3.0);
    assert_eq!(
        as_num(&eval_ok("pub xs = [1, 2, 3]; xs[0] = 9; xs[0];")),
        9.0
    );
    assert_eq!(
        eval_err("pub xs = [1]; xs[5];").kind,
        ErrorKind::IndexError
    );
    assert_eq!(
        eval_err("pub t = (1, 2); t[0] = 5;").kind,
        ErrorKind::TypeError
    );
}

#[test]
fn string_indexing_and_methods() {
    assert_eq!(as_str(&eval_ok(r#""abc"[1];"#)), "b");
    assert_eq!(as_str(&eval_ok(r#""abc"[-1];"#)), "c");
    assert_eq!(as_str(&eval_ok(r#""hello".upper();"#)), "HELLO");
    assert_eq!(
        as_str(&eval_ok(r#""a,b,c".split(",")[1];"#)),
        "b"
    );
    assert_eq!(
        as_str(&eval_ok(r#""-".join(["x", "y"]);"#)),
        "x-y"
    );
    assert_eq!(as_str(&eval_ok(r#""a b".replace(" ", "_");"#)), "a_b");
}

#[test]
fn list_methods() {
    assert_eq!(
        as_num(&eval_ok("pub xs = [1]; xs.push(2); xs.push(3); len(xs);")),
        3.0
    );
    assert_eq!(as_num(&eval_ok("pub xs = [1, 2]; xs.pop();")), 2.0);
    assert_eq!(
        as_num(&eval_ok("[1, 2, 3].map(fn (x) { return x * 2; })[2];")),
        6.0
    );
    assert_eq!(
        as_num(&eval_ok(
            "len([1, 2, 3, 4].filter(fn (x) { return x > 2; }));"
        )),
        2.0
    );
    assert_eq!(as_num(&eval_ok("[5, 6].index_of(6);")), 1.0);
    assert_eq!(
        as_str(&eval_ok(r#"pub xs = ["a", "b"]; xs.reverse(); xs.join("");"#)),
        "ba"
    );
}

#[test]
fn type_union_as_catch_filter_shape() {
    // check() drives catch filtering; unions work there too.
    let source = r#"
        pub caught = "";
        try { raise "boom"; } catch (Num | Str) as e { caught = e; }
        caught;
    "#;
    assert_eq!(as_str(&eval_ok(source)), "boom");
}

#[test]
fn generic_type_parameters_are_erased_but_arity_checked() {
    assert!(as_bool(&eval_ok("List[Num].check([1]);")));
    let err = eval_err("List[Num, Str];");
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("parameter"));
}

#[test]
fn objects_as_scopes_chain_to_globals_in_methods() {
    // Method bodies see module globals through the scope chain.
    let source = r#"
        pub factor = 3;
        pub type Scaler {
            pub fn init(v) { self.v = v; }
            pub fn scaled(self) { return self.v * factor; }
        }
        Scaler(7).scaled();
    "#;
    assert_eq!(as_num(&eval_ok(source)), 21.0);
}
