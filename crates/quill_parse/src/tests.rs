use pretty_assertions::assert_eq;
use quill_ir::{
    BinaryOp, ExprKind, FormatPart, ParamKind, SharedInterner, StmtKind, UnaryOp, VersionReq, Vis,
};

use crate::parse_source;

fn parse(source: &str) -> Vec<quill_ir::Stmt> {
    let interner = SharedInterner::new();
    parse_source(source, &interner).expect("parse failure")
}

fn parse_err(source: &str) -> crate::ParseError {
    let interner = SharedInterner::new();
    parse_source(source, &interner).expect_err("expected parse error")
}

#[test]
fn var_decl_with_value() {
    let stmts = parse("pub x = 1;");
    let StmtKind::VarDecl { vis, value, .. } = &stmts[0].kind else {
        panic!("expected var decl");
    };
    assert_eq!(*vis, Vis::Pub);
    assert!(matches!(
        value.as_ref().unwrap().kind,
        ExprKind::Num(n) if n == 1.0
    ));
}

#[test]
fn var_decl_without_value() {
    let stmts = parse("priv cache;");
    let StmtKind::VarDecl { vis, value, .. } = &stmts[0].kind else {
        panic!("expected var decl");
    };
    assert_eq!(*vis, Vis::Priv);
    assert!(value.is_none());
}

#[test]
fn arithmetic_precedence() {
    let stmts = parse("1 + 2 * 3;");
    let StmtKind::ExprStmt(expr) = &stmts[0].kind else {
        panic!("expected expr stmt");
    };
    let ExprKind::Binary { op, right, .. } = &expr.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert!(matches!(
        right.kind,
        ExprKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn power_is_right_associative() {
    let stmts = parse("2 ** 3 ** 2;");
    let StmtKind::ExprStmt(expr) = &stmts[0].kind else {
        panic!("expected expr stmt");
    };
    let ExprKind::Binary { op, left, right } = &expr.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Pow);
    assert!(matches!(left.kind, ExprKind::Num(n) if n == 2.0));
    assert!(matches!(
        right.kind,
        ExprKind::Binary {
            op: BinaryOp::Pow,
            ..
        }
    ));
}

#[test]
fn comparison_and_logic_layers() {
    let stmts = parse("a < b && c || d === e;");
    let StmtKind::ExprStmt(expr) = &stmts[0].kind else {
        panic!("expected expr stmt");
    };
    // `||` binds loosest.
    assert!(matches!(
        expr.kind,
        ExprKind::Binary {
            op: BinaryOp::Or,
            ..
        }
    ));
}

#[test]
fn truthy_unary() {
    let stmts = parse("?x;");
    let StmtKind::ExprStmt(expr) = &stmts[0].kind else {
        panic!("expected expr stmt");
    };
    assert!(matches!(
        expr.kind,
        ExprKind::Unary {
            op: UnaryOp::Truthy,
            ..
        }
    ));
}

#[test]
fn postfix_chain_mixes_calls_and_attrs() {
    let stmts = parse("obj.items[0](1, k=2).name;");
    let StmtKind::ExprStmt(expr) = &stmts[0].kind else {
        panic!("expected expr stmt");
    };
    // Outermost is the trailing attribute access.
    let ExprKind::GetAttr { target, .. } = &expr.kind else {
        panic!("expected attr access, got {:?}", expr.kind);
    };
    let ExprKind::Call { alt, kwargs, .. } = &target.kind else {
        panic!("expected call");
    };
    assert!(!alt);
    assert_eq!(kwargs.len(), 1);
}

#[test]
fn altcall_is_flagged() {
    let stmts = parse("f[1][2](3);");
    let StmtKind::ExprStmt(expr) = &stmts[0].kind else {
        panic!("expected expr stmt");
    };
    let ExprKind::Call { alt, callee, .. } = &expr.kind else {
        panic!("expected call");
    };
    assert!(!alt);
    let ExprKind::Call { alt: inner_alt, .. } = &callee.kind else {
        panic!("expected inner call");
    };
    assert!(inner_alt);
}

#[test]
fn private_access_parses() {
    let stmts = parse("self.#secret;");
    let StmtKind::ExprStmt(expr) = &stmts[0].kind else {
        panic!("expected expr stmt");
    };
    assert!(matches!(expr.kind, ExprKind::GetPriv { .. }));
}

#[test]
fn dynamic_id_parses() {
    let stmts = parse("$(\"na\" + \"me\");");
    let StmtKind::ExprStmt(expr) = &stmts[0].kind else {
        panic!("expected expr stmt");
    };
    assert!(matches!(expr.kind, ExprKind::DynamicId(_)));
}

#[test]
fn paren_vs_tuple() {
    let stmts = parse("(1); (1,); (1, 2); ();");
    let kinds: Vec<_> = stmts
        .iter()
        .map(|s| {
            let StmtKind::ExprStmt(e) = &s.kind else {
                panic!("expected expr stmt");
            };
            &e.kind
        })
        .collect();
    assert!(matches!(kinds[0], ExprKind::Par(_)));
    assert!(matches!(kinds[1], ExprKind::Tuple(items) if items.len() == 1));
    assert!(matches!(kinds[2], ExprKind::Tuple(items) if items.len() == 2));
    assert!(matches!(kinds[3], ExprKind::Tuple(items) if items.is_empty()));
}

#[test]
fn brace_is_block_in_stmt_position_dict_in_expr_position() {
    let stmts = parse("{ pub x = 1; } pub d = {\"a\": 1};");
    assert!(matches!(stmts[0].kind, StmtKind::Block(_)));
    let StmtKind::VarDecl { value, .. } = &stmts[1].kind else {
        panic!("expected var decl");
    };
    assert!(matches!(
        value.as_ref().unwrap().kind,
        ExprKind::Dict(ref entries) if entries.len() == 1
    ));
}

#[test]
fn param_markers() {
    let stmts = parse("pub fn f(a, /, b, *rest, c, **extra) { }");
    let StmtKind::FuncDecl { func, .. } = &stmts[0].kind else {
        panic!("expected func decl");
    };
    let kinds: Vec<_> = func.params.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ParamKind::Arg,
            ParamKind::ArgOrKwarg,
            ParamKind::Vararg,
            ParamKind::Kwarg,
            ParamKind::Varkwarg,
        ]
    );
}

#[test]
fn bare_star_makes_following_kwarg_only() {
    let stmts = parse("pub fn f(a, *, b) { }");
    let StmtKind::FuncDecl { func, .. } = &stmts[0].kind else {
        panic!("expected func decl");
    };
    assert_eq!(func.params.len(), 2);
    assert_eq!(func.params[0].kind, ParamKind::ArgOrKwarg);
    assert_eq!(func.params[1].kind, ParamKind::Kwarg);
}

#[test]
fn param_defaults_are_expressions() {
    let stmts = parse("pub fn f(a, b = 1 + 2) { }");
    let StmtKind::FuncDecl { func, .. } = &stmts[0].kind else {
        panic!("expected func decl");
    };
    assert!(func.params[0].default.is_none());
    assert!(matches!(
        func.params[1].default.as_ref().unwrap().kind,
        ExprKind::Binary { .. }
    ));
}

#[test]
fn decorator_desugars_to_bracket_call() {
    let stmts = parse("@trace pub fn f() { }");
    let StmtKind::VarDecl { vis, value, .. } = &stmts[0].kind else {
        panic!("decorated fn should desugar to a var decl, got {:?}", stmts[0].kind);
    };
    assert_eq!(*vis, Vis::Pub);
    let ExprKind::Call { alt, args, .. } = &value.as_ref().unwrap().kind else {
        panic!("expected bracket call");
    };
    assert!(alt);
    assert!(matches!(args[0].kind, ExprKind::Lambda(_)));
}

#[test]
fn stacked_decorators_apply_innermost_first() {
    let stmts = parse("@outer @inner pub fn f() { }");
    let StmtKind::VarDecl { value, .. } = &stmts[0].kind else {
        panic!("expected var decl");
    };
    // outer[ inner[ fn ] ]
    let ExprKind::Call { callee, args, .. } = &value.as_ref().unwrap().kind else {
        panic!("expected call");
    };
    assert!(matches!(callee.kind, ExprKind::Ident(_)));
    assert!(matches!(args[0].kind, ExprKind::Call { alt: true, .. }));
}

#[test]
fn if_elif_else_chain() {
    let stmts = parse("if a { } elif b { } elif c { } else { }");
    let StmtKind::If {
        branches,
        else_body,
    } = &stmts[0].kind
    else {
        panic!("expected if");
    };
    assert_eq!(branches.len(), 3);
    assert!(else_body.is_some());
}

#[test]
fn try_catch_variants() {
    let stmts = parse(
        "try { } catch { } \
         try { } catch as e { } \
         try { } catch TypeError { } \
         try { } catch TypeError as e { }",
    );
    let get = |i: usize| {
        let StmtKind::TryCatch {
            filter, binding, ..
        } = &stmts[i].kind
        else {
            panic!("expected try/catch");
        };
        (filter.is_some(), binding.is_some())
    };
    assert_eq!(get(0), (false, false));
    assert_eq!(get(1), (false, true));
    assert_eq!(get(2), (true, false));
    assert_eq!(get(3), (true, true));
}

#[test]
fn switch_with_cases_and_default() {
    let stmts = parse("switch x { case 1 { } case \"two\" { } default { } }");
    let StmtKind::SwitchCase { cases, default, .. } = &stmts[0].kind else {
        panic!("expected switch");
    };
    assert_eq!(cases.len(), 2);
    assert!(default.is_some());
}

#[test]
fn req_forms() {
    let stmts = parse("req v1.2; req +v1.0; req -v2.0; req v1.0 - v2.0;");
    let reqs: Vec<_> = stmts
        .iter()
        .map(|s| {
            let StmtKind::VersionReq(req) = &s.kind else {
                panic!("expected req");
            };
            req
        })
        .collect();
    assert!(matches!(reqs[0], VersionReq::Exact(_)));
    assert!(matches!(reqs[1], VersionReq::AtLeast(_)));
    assert!(matches!(reqs[2], VersionReq::AtMost(_)));
    assert!(matches!(reqs[3], VersionReq::Range(_, _)));
}

#[test]
fn import_with_alias() {
    let interner = SharedInterner::new();
    let stmts = parse_source("import json as j;", &interner).unwrap();
    let StmtKind::ImportReq { name, alias } = &stmts[0].kind else {
        panic!("expected import");
    };
    assert_eq!(interner.lookup(*name), "json");
    assert_eq!(interner.lookup(alias.unwrap()), "j");
}

#[test]
fn assignment_targets() {
    parse("x = 1; obj.attr = 2; xs[0] = 3; self.#hidden = 4; $(\"n\") = 5;");
}

#[test]
fn invalid_assignment_target_rejected() {
    let err = parse_err("1 + 2 = 3;");
    assert!(err.message.contains("invalid assignment target"));
}

#[test]
fn undeclared_assignment_is_still_a_parse_success() {
    // Binding discipline is a runtime concern; the parser only checks shape.
    parse("y = 1;");
}

#[test]
fn fstring_splits_text_and_exprs() {
    let interner = SharedInterner::new();
    let stmts = parse_source(r#"f"a {x} b {y:04} c";"#, &interner).unwrap();
    let StmtKind::ExprStmt(expr) = &stmts[0].kind else {
        panic!("expected expr stmt");
    };
    let ExprKind::Format(parts) = &expr.kind else {
        panic!("expected format");
    };
    assert_eq!(parts.len(), 5);
    assert!(matches!(parts[0], FormatPart::Text(_)));
    assert!(matches!(parts[1], FormatPart::Expr(_, None)));
    let FormatPart::Expr(_, Some(spec)) = &parts[3] else {
        panic!("expected spec on second interpolation");
    };
    assert_eq!(interner.lookup(*spec), "04");
}

#[test]
fn fstring_escaped_braces() {
    let interner = SharedInterner::new();
    let stmts = parse_source(r#"f"{{literal}}";"#, &interner).unwrap();
    let StmtKind::ExprStmt(expr) = &stmts[0].kind else {
        panic!("expected expr stmt");
    };
    let ExprKind::Format(parts) = &expr.kind else {
        panic!("expected format");
    };
    let FormatPart::Text(text) = &parts[0] else {
        panic!("expected text part");
    };
    assert_eq!(interner.lookup(*text), "{literal}");
}

#[test]
fn unterminated_block_reports_open_brace() {
    let err = parse_err("pub fn f() { pub x = 1;");
    assert!(err.message.contains("unclosed block"));
}

#[test]
fn edit_statement() {
    let stmts = parse("edit obj { pub x = 1; }");
    assert!(matches!(stmts[0].kind, StmtKind::Edit { .. }));
}

#[test]
fn del_requires_name_or_attribute() {
    parse("del x; del obj.attr;");
    let err = parse_err("del f();");
    assert!(err.message.contains("'del' target"));
}

#[test]
fn deeply_nested_expression_does_not_overflow() {
    let mut source = String::from("pub x = ");
    for _ in 0..2_000 {
        source.push('(');
    }
    source.push('1');
    for _ in 0..2_000 {
        source.push(')');
    }
    source.push(';');
    parse(&source);
}
