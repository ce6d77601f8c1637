use crate::core::ast::NodeKind;
use crate::frontend::semantic::CastOp;
use crate::tests::{analyze_err, analyze_ok, analyze_source_with, find_node};

#[test]
fn test_adding_const_is_implicit() {
    analyze_ok("fn f(p: &i32) -> &const i32 { return p; }");
}

#[test]
fn test_dropping_const_is_rejected() {
    analyze_err(
        "fn f(p: &const i32) -> &i32 { return p; }",
        &["expected type '&i32', got '&const i32'"],
    );
}

#[test]
fn test_slice_const_conversion() {
    analyze_ok("fn f(s: []u8) -> []const u8 { return s; }");
    analyze_err(
        "fn f(s: []const u8) -> []u8 { return s; }",
        &["expected type '[]u8', got '[]const u8'"],
    );
}

#[test]
fn test_implicit_int_widening() {
    let messages = analyze_source_with("fn f(x: u8) -> u32 { return x; }", |analyzer| {
        let ret = find_node(analyzer, |k| matches!(k, NodeKind::Return(_))).unwrap();
        let expr = match analyzer.ast.kind(ret) {
            NodeKind::Return(r) => r.expr.unwrap(),
            _ => unreachable!(),
        };
        assert_eq!(analyzer.cast_op(expr), CastOp::IntWidenOrShorten);
    });
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_implicit_narrowing_rejected() {
    analyze_err(
        "fn f(x: u32) -> u8 { return x; }",
        &["expected type 'u8', got 'u32'"],
    );
}

#[test]
fn test_signedness_mismatch_rejected() {
    analyze_err(
        "fn f(x: u8) -> i32 { return x; }",
        &["expected type 'i32', got 'u8'"],
    );
}

#[test]
fn test_explicit_int_shorten() {
    let messages = analyze_source_with("fn f(x: u32) -> u8 { return u8(x); }", |analyzer| {
        let call = find_node(analyzer, |k| {
            matches!(k, NodeKind::FnCall(c) if !c.is_builtin)
        })
        .unwrap();
        assert_eq!(analyzer.cast_op(call), CastOp::IntWidenOrShorten);
    });
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_array_to_slice() {
    let messages = analyze_source_with(r#"const s: []const u8 = "abc";"#, |analyzer| {
        let decl = find_node(analyzer, |k| matches!(k, NodeKind::VarDecl(_))).unwrap();
        let init = match analyzer.ast.kind(decl) {
            NodeKind::VarDecl(d) => d.init.unwrap(),
            _ => unreachable!(),
        };
        assert_eq!(analyzer.cast_op(init), CastOp::ToSlice);
        assert_eq!(analyzer.const_slice_bytes(init).unwrap(), b"abc");
    });
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_ptr_to_int_cast() {
    let messages = analyze_source_with("fn f(p: &u8) -> isize { return isize(p); }", |analyzer| {
        let call = find_node(analyzer, |k| {
            matches!(k, NodeKind::FnCall(c) if !c.is_builtin)
        })
        .unwrap();
        assert_eq!(analyzer.cast_op(call), CastOp::PtrToInt);
    });
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_int_to_ptr_cast() {
    let messages = analyze_source_with(
        "fn f(x: usize) -> &u8 { return (&u8)(x); }",
        |analyzer| {
            let call = find_node(analyzer, |k| {
                matches!(k, NodeKind::FnCall(c) if !c.is_builtin)
            })
            .unwrap();
            assert_eq!(analyzer.cast_op(call), CastOp::IntToPtr);
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_pointer_reinterpret_cast() {
    let messages = analyze_source_with(
        "fn f(p: &u8) -> &const i32 { return (&const i32)(p); }",
        |analyzer| {
            let call = find_node(analyzer, |k| {
                matches!(k, NodeKind::FnCall(c) if !c.is_builtin)
            })
            .unwrap();
            assert_eq!(analyzer.cast_op(call), CastOp::PointerReinterpret);
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_explicit_maybe_wrap() {
    let messages = analyze_source_with(
        "fn f(x: i32) -> ?i32 { return (?i32)(x); }",
        |analyzer| {
            let call = find_node(analyzer, |k| {
                matches!(k, NodeKind::FnCall(c) if !c.is_builtin)
            })
            .unwrap();
            assert_eq!(analyzer.cast_op(call), CastOp::MaybeWrap);
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_err_to_int_cast() {
    let messages = analyze_source_with(
        r#"
error OutOfMemory;
error FileNotFound;
fn f(e: error) -> u8 { return u8(e); }
"#,
        |analyzer| {
            let call = find_node(analyzer, |k| {
                matches!(k, NodeKind::FnCall(c) if !c.is_builtin)
            })
            .unwrap();
            assert_eq!(analyzer.cast_op(call), CastOp::ErrToInt);
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_invalid_cast() {
    analyze_err(
        "fn f(x: bool) -> i32 { return i32(x); }",
        &["invalid cast from type 'bool' to 'i32'"],
    );
}

#[test]
fn test_cast_unreachable() {
    analyze_err(
        "fn f() -> i32 {\n    i32(return 1)\n}",
        &["invalid cast from type 'unreachable' to 'i32'"],
    );
}

#[test]
fn test_cast_arity() {
    analyze_err(
        "fn f() -> i32 { return i32(1, 2); }",
        &["cast expression expects exactly one parameter"],
    );
}

#[test]
fn test_pure_error_wraps_into_error_union() {
    analyze_ok(
        r#"
error Bad;
fn f() -> %i32 {
    return error.Bad;
}
"#,
    );
}

#[test]
fn test_numeric_literal_fits() {
    analyze_ok("const x: u8 = 255;");
    analyze_err(
        "const x: u8 = 300;",
        &["integer value 300 cannot be implicitly casted to type 'u8'"],
    );
    analyze_ok("const y: i8 = -128;");
    analyze_err(
        "const z: i8 = -129;",
        &["integer value -129 cannot be implicitly casted to type 'i8'"],
    );
}

#[test]
fn test_incompatible_number_literals() {
    analyze_err(
        "const x = 2 == 2.0;",
        &["integer value 2 cannot be implicitly casted to type '(float literal)'"],
    );
}

#[test]
fn test_peer_literal_coerces_to_concrete() {
    analyze_ok("fn f(c: bool, x: i32) -> i32 { return if (c) x else 0; }");
}

#[test]
fn test_peer_unreachable_absorbed() {
    analyze_ok("fn f(c: bool, x: i32) -> i32 { return if (c) x else return 0; }");
}

#[test]
fn test_peer_float_widens() {
    analyze_ok("fn f(c: bool, a: f32, b: f64) -> f64 { return if (c) a else b; }");
}

#[test]
fn test_error_union_absorbs_payload_peer() {
    analyze_ok(
        r#"
error Bad;
fn h() -> %i32 { return 1; }
fn f(c: bool) -> %i32 {
    return if (c) h() else 7;
}
"#,
    );
}
