use crate::core::ast::{NodeKind, ReturnKind};
use crate::core::bignum::BigNum;
use crate::core::types::TypeKind;
use crate::frontend::semantic::{CastOp, ConstVal};
use crate::tests::{analyze_err, analyze_ok, analyze_source_with, analyze_sources_with, find_node};

#[test]
fn test_recursive_struct_detection() {
    let messages = analyze_source_with("struct S { a: S, }", |analyzer| {
        // the container entry still completes so nothing re-reports
        let decl = find_node(analyzer, |k| matches!(k, NodeKind::ContainerDecl(_))).unwrap();
        let type_id = analyzer.meta[decl.0 as usize].container_type.unwrap();
        let info = analyzer.interner.entry(type_id).struct_info().unwrap();
        assert!(info.complete);
        assert!(info.reported_infinite_err);
    });
    assert_eq!(
        messages
            .iter()
            .filter(|m| m.contains("struct has infinite size"))
            .count(),
        1
    );
    assert_eq!(messages.len(), 1, "unexpected extra errors: {:?}", messages);
}

#[test]
fn test_optional_wrap_on_return() {
    let messages = analyze_source_with("fn f() -> ?i32 { return 5; }", |analyzer| {
        let ret = find_node(analyzer, |k| {
            matches!(k, NodeKind::Return(r) if r.kind == ReturnKind::Unconditional)
        })
        .unwrap();
        let expr = match analyzer.ast.kind(ret) {
            NodeKind::Return(r) => r.expr.unwrap(),
            _ => unreachable!(),
        };
        // the literal was rewritten into an implicit maybe-wrap cast
        assert_eq!(analyzer.cast_op(expr), CastOp::MaybeWrap);
        assert!(matches!(
            analyzer.interner.entry(analyzer.expr_type(expr)).kind,
            TypeKind::Maybe { .. }
        ));
        let inner = match analyzer.ast.kind(expr) {
            NodeKind::ImplicitCast(cast) => cast.expr,
            other => panic!("expected implicit cast, got {:?}", other),
        };
        assert!(matches!(
            analyzer.interner.entry(analyzer.expr_type(inner)).kind,
            TypeKind::NumLitInt
        ));
        match analyzer.const_val(inner) {
            Some(ConstVal::Num(num)) => assert_eq!(*num, BigNum::from_unsigned(5)),
            other => panic!("expected numeric constant, got {:?}", other),
        }
        match analyzer.const_val(expr) {
            Some(ConstVal::Maybe(_)) => {}
            other => panic!("expected wrapped constant, got {:?}", other),
        }
    });
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_peer_int_unification_rejected() {
    analyze_err(
        r#"
fn f(cond: bool, a: i32, b: i64) {
    const x = if (cond) a else b;
}
"#,
        &["incompatible types: 'i32' and 'i64'"],
    );
}

#[test]
fn test_error_return_desugar() {
    let messages = analyze_source_with(
        r#"
error Bad;
fn h() -> %i32 { return 1; }
fn g() -> %i32 { %return h(); }
"#,
        |analyzer| {
            let ret = find_node(analyzer, |k| {
                matches!(k, NodeKind::Return(r) if r.kind == ReturnKind::Error)
            })
            .unwrap();
            // the ok branch yields the payload type
            assert_eq!(analyzer.expr_type(ret), analyzer.interner.i32_);
            let call = match analyzer.ast.kind(ret) {
                NodeKind::Return(r) => r.expr.unwrap(),
                _ => unreachable!(),
            };
            assert!(matches!(
                analyzer.interner.entry(analyzer.expr_type(call)).kind,
                TypeKind::ErrorUnion { .. }
            ));
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_string_concatenation() {
    let messages = analyze_source_with(r#"const s = "foo" ++ "bar";"#, |analyzer| {
        let decl = find_node(analyzer, |k| matches!(k, NodeKind::VarDecl(_))).unwrap();
        let init = match analyzer.ast.kind(decl) {
            NodeKind::VarDecl(d) => d.init.unwrap(),
            _ => unreachable!(),
        };
        match analyzer.const_val(init) {
            Some(ConstVal::Slice { len, .. }) => assert_eq!(*len, 6),
            other => panic!("expected constant slice, got {:?}", other),
        }
        assert_eq!(analyzer.const_slice_bytes(init).unwrap(), b"foobar");
        assert!(matches!(
            analyzer.interner.entry(analyzer.expr_type(init)).kind,
            TypeKind::Slice { is_const: true, .. }
        ));
    });
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_demand_driven_resolution() {
    let messages = analyze_source_with(
        r#"
const A: B = 0;
const B = i32;
"#,
        |analyzer| {
            let decl = find_node(analyzer, |k| {
                matches!(k, NodeKind::VarDecl(d) if d.name == "A")
            })
            .unwrap();
            let var = analyzer.meta[decl.0 as usize].var.unwrap();
            assert_eq!(analyzer.scopes.var(var).type_id, analyzer.interner.i32_);
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_undeclared_identifier() {
    analyze_err(
        "fn a() {\n    b();\n}",
        &["use of undeclared identifier 'b'"],
    );
}

#[test]
fn test_redefinition_of_function() {
    analyze_err("fn a() {}\nfn a() {}", &["redefinition of 'a'"]);
}

#[test]
fn test_wrong_number_of_arguments() {
    analyze_err(
        r#"
fn a() {
    b(1);
}
fn b(x: i32, y: i32, z: i32) { }
"#,
        &["expected 3 arguments, got 1"],
    );
}

#[test]
fn test_unreachable_code() {
    analyze_err(
        r#"
fn a() {
    return;
    b();
}
fn b() {}
"#,
        &["unreachable code"],
    );
}

#[test]
fn test_control_reaches_end_of_non_void_function() {
    analyze_err("fn a() -> i32 {}", &["expected type 'i32', got 'void'"]);
}

#[test]
fn test_assign_to_constant() {
    analyze_err(
        r#"
fn f() {
    const a = 3;
    a = 4;
}
"#,
        &["cannot assign to constant"],
    );
}

#[test]
fn test_invalid_assignment_target() {
    analyze_err(
        r#"
fn f() {
    3 = 3;
}
"#,
        &["invalid assignment target"],
    );
}

#[test]
fn test_local_variable_redeclaration() {
    analyze_err(
        r#"
fn f() {
    const a: i32 = 0;
    const a = 0;
}
"#,
        &["redeclaration of variable 'a'"],
    );
}

#[test]
fn test_parameter_redeclaration() {
    analyze_err(
        "fn f(a: i32, a: i32) {\n}",
        &["redeclaration of variable 'a'"],
    );
}

#[test]
fn test_variable_shadows_type() {
    analyze_err(
        r#"
struct Foo {}
fn f(Foo: i32) {
}
"#,
        &["variable shadows type 'Foo'"],
    );
}

#[test]
fn test_if_condition_must_be_bool() {
    analyze_err(
        "fn f() {\n    if (0) {}\n}",
        &["integer value 0 cannot be implicitly casted to type 'bool'"],
    );
}

#[test]
fn test_unreachable_variable_type() {
    analyze_err(
        r#"
fn f() {
    const a: unreachable = return;
}
"#,
        &["variable of type 'unreachable' not allowed"],
    );
}

#[test]
fn test_variable_initialization_is_unreachable() {
    analyze_err(
        r#"
fn f() {
    const a = return;
}
"#,
        &["variable initialization is unreachable"],
    );
}

#[test]
fn test_unable_to_infer_variable_type() {
    analyze_err(
        "fn f() {\n    var x = 2;\n}",
        &["unable to infer variable type"],
    );
}

#[test]
fn test_type_variables_must_be_constant() {
    analyze_err("var foo = u8;", &["variable of type 'type' must be constant"]);
}

#[test]
fn test_break_outside_loop() {
    analyze_err(
        "fn f() {\n    break;\n}",
        &["'break' expression outside loop"],
    );
}

#[test]
fn test_continue_outside_loop() {
    analyze_err(
        "fn f() {\n    continue;\n}",
        &["'continue' expression outside loop"],
    );
}

#[test]
fn test_missing_else_clause() {
    analyze_err(
        r#"
fn f() {
    const x: i32 = if (true) { 1 };
}
"#,
        &["expected type 'i32', got 'void'"],
    );
}

#[test]
fn test_struct_fields() {
    analyze_ok(
        r#"
struct Point {
    x: i32,
    y: i32,
}
fn f() -> i32 {
    var p: Point = undefined;
    p.x = 1;
    p.y = 2;
    return p.x + p.y;
}
"#,
    );
}

#[test]
fn test_invalid_struct_field() {
    analyze_err(
        r#"
struct A { x: i32, }
fn f() {
    var a: A = undefined;
    a.foo = 1;
}
"#,
        &["no member named 'foo' in 'A'"],
    );
}

#[test]
fn test_struct_value_expression() {
    let messages = analyze_source_with(
        r#"
struct A {
    x: i32,
    y: i32,
}
const a = A { .x = 1, .y = 2, };
"#,
        |analyzer| {
            let init = find_node(analyzer, |k| matches!(k, NodeKind::ContainerInit(_))).unwrap();
            match analyzer.const_val(init) {
                Some(ConstVal::Struct(fields)) => assert_eq!(fields.len(), 2),
                other => panic!("expected constant struct, got {:?}", other),
            }
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_duplicate_field_in_struct_value() {
    analyze_err(
        r#"
struct A {
    x: i32,
    y: i32,
}
fn f() {
    const a = A { .x = 1, .y = 2, .x = 3, };
}
"#,
        &["duplicate field"],
    );
}

#[test]
fn test_missing_field_in_struct_value() {
    analyze_err(
        r#"
struct A {
    x: i32,
    y: i32,
}
fn f() {
    const a = A { .y = 2, };
}
"#,
        &["missing field: 'x'"],
    );
}

#[test]
fn test_struct_init_syntax_for_slice() {
    analyze_err(
        "const foo = []u16 { .x = 1024, };",
        &["type '[]u16' does not support struct initialization syntax"],
    );
}

#[test]
fn test_struct_methods() {
    analyze_ok(
        r#"
struct Point {
    x: i32,
    y: i32,
    fn sum(p: Point) -> i32 { return p.x + p.y; }
}
fn f() -> i32 {
    var p: Point = undefined;
    return p.sum();
}
"#,
    );
}

#[test]
fn test_no_function_named_in_struct() {
    analyze_err(
        r#"
struct A { x: i32, }
fn f() {
    var a: A = undefined;
    a.frob();
}
"#,
        &["no function named 'frob' in 'A'"],
    );
}

#[test]
fn test_enum_values() {
    let messages = analyze_source_with(
        r#"
enum Color {
    Red,
    Green,
    Blue,
}
const c = Color.Green;
const n = @member_count(Color);
"#,
        |analyzer| {
            let decl = find_node(analyzer, |k| {
                matches!(k, NodeKind::VarDecl(d) if d.name == "c")
            })
            .unwrap();
            let init = match analyzer.ast.kind(decl) {
                NodeKind::VarDecl(d) => d.init.unwrap(),
                _ => unreachable!(),
            };
            match analyzer.const_val(init) {
                Some(ConstVal::EnumTag { tag, payload }) => {
                    assert_eq!(*tag, 1);
                    assert!(payload.is_none());
                }
                other => panic!("expected enum constant, got {:?}", other),
            }

            let count_decl = find_node(analyzer, |k| {
                matches!(k, NodeKind::VarDecl(d) if d.name == "n")
            })
            .unwrap();
            let count_init = match analyzer.ast.kind(count_decl) {
                NodeKind::VarDecl(d) => d.init.unwrap(),
                _ => unreachable!(),
            };
            match analyzer.const_val(count_init) {
                Some(ConstVal::Num(num)) => assert_eq!(*num, BigNum::from_unsigned(3)),
                other => panic!("expected member count, got {:?}", other),
            }
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_enum_payload_construction() {
    analyze_ok(
        r#"
enum Shape {
    Circle: i32,
    Square,
}
fn f() -> Shape {
    return Shape.Circle(4);
}
"#,
    );
}

#[test]
fn test_enum_value_requires_parameter() {
    analyze_err(
        r#"
enum Shape {
    Circle: i32,
    Square,
}
fn f() -> Shape {
    return Shape.Circle;
}
"#,
        &["enum value 'Shape.Circle' requires parameter of type 'i32'"],
    );
}

#[test]
fn test_enum_tag_equality_folds() {
    let messages = analyze_source_with(
        r#"
enum Color { Red, Green, }
const a = Color.Red;
const b = Color.Red;
const same = a == b;
"#,
        |analyzer| {
            let decl = find_node(analyzer, |k| {
                matches!(k, NodeKind::VarDecl(d) if d.name == "same")
            })
            .unwrap();
            let init = match analyzer.ast.kind(decl) {
                NodeKind::VarDecl(d) => d.init.unwrap(),
                _ => unreachable!(),
            };
            assert!(matches!(
                analyzer.const_val(init),
                Some(ConstVal::Bool(true))
            ));
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_all_void_enum_collapses_to_tag() {
    let messages = analyze_source_with(
        r#"
enum Flag { On, Off, }
const size = @sizeof(Flag);
"#,
        |analyzer| {
            let decl = find_node(analyzer, |k| {
                matches!(k, NodeKind::VarDecl(d) if d.name == "size")
            })
            .unwrap();
            let init = match analyzer.ast.kind(decl) {
                NodeKind::VarDecl(d) => d.init.unwrap(),
                _ => unreachable!(),
            };
            match analyzer.const_val(init) {
                Some(ConstVal::Num(num)) => assert_eq!(*num, BigNum::from_unsigned(1)),
                other => panic!("expected size constant, got {:?}", other),
            }
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_redefinition_of_error_values() {
    analyze_err("error A;\nerror A;", &["redefinition of error 'A'"]);
}

#[test]
fn test_error_literal() {
    analyze_ok(
        r#"
error OutOfMemory;
const e = error.OutOfMemory;
"#,
    );
}

#[test]
fn test_undeclared_error_value() {
    analyze_err(
        "const e = error.Bogus;",
        &["use of undeclared error value 'Bogus'"],
    );
}

#[test]
fn test_unwrap_error_with_binding() {
    analyze_ok(
        r#"
error Bad;
fn h() -> %i32 { return 1; }
fn f() -> i32 {
    const x = h() %% |err| 0;
    return x;
}
"#,
    );
}

#[test]
fn test_unwrap_maybe() {
    analyze_ok("fn f(x: ?i32) -> i32 { return x ?? 0; }")
}

#[test]
fn test_if_var_binds_in_then_branch() {
    analyze_ok(
        r#"
fn f(x: ?i32) -> i32 {
    if (var v ?= x) { return v; }
    return 0;
}
"#,
    );
}

#[test]
fn test_if_var_requires_maybe() {
    analyze_err(
        "fn f() {\n    if (const x ?= true) { }\n}",
        &["expected maybe type"],
    );
}

#[test]
fn test_while_and_for_loops() {
    analyze_ok(
        r#"
fn f(arr: []i32) -> i32 {
    var sum: i32 = 0;
    for (x, arr) { sum += x; }
    for (x, arr, i) { sum += x; }
    var i: i32 = 0;
    while (i < 10) { i += 1; }
    return sum;
}
"#,
    );
}

#[test]
fn test_while_true_is_unreachable() {
    analyze_ok("fn f() -> unreachable { while (true) {} }");
}

#[test]
fn test_iteration_over_non_array() {
    analyze_err(
        "fn f(x: i32) {\n    for (v, x) {}\n}",
        &["iteration over non array type 'i32'"],
    );
}

#[test]
fn test_slices_and_field_access() {
    analyze_ok(
        r#"
fn f() -> isize {
    var arr: [10]u8 = undefined;
    const s = arr[0..5];
    return s.len;
}
"#,
    );
}

#[test]
fn test_array_len_is_compile_time() {
    let messages = analyze_source_with(
        r#"
fn f() -> isize {
    var arr: [10]u8 = undefined;
    return arr.len;
}
"#,
        |analyzer| {
            let access = find_node(analyzer, |k| {
                matches!(k, NodeKind::FieldAccess(a) if a.field_name == "len")
            })
            .unwrap();
            match analyzer.const_val(access) {
                Some(ConstVal::Num(num)) => assert_eq!(*num, BigNum::from_unsigned(10)),
                other => panic!("expected folded array length, got {:?}", other),
            }
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_array_access_of_non_array() {
    analyze_err(
        r#"
fn f() {
    var bad: bool = undefined;
    bad[bad] = bad[bad];
}
"#,
        &["array access of non-array type 'bool'"],
    );
}

#[test]
fn test_switch_with_expected_type() {
    analyze_ok(
        r#"
fn f(x: i32) -> i32 {
    return switch (x) {
        1 => 10,
        2, 3 => 20,
        else => 30,
    };
}
"#,
    );
}

#[test]
fn test_switch_exhaustive_enum() {
    analyze_ok(
        r#"
enum E { A, B, }
fn f(e: E) -> i32 {
    return switch (e) {
        E.A => 1,
        E.B => 2,
    };
}
"#,
    );
}

#[test]
fn test_switch_not_exhaustive() {
    analyze_err(
        r#"
enum E { A, B, }
fn f(e: E) -> i32 {
    return switch (e) {
        E.A => 1,
    };
}
"#,
        &["switch must handle all possibilities"],
    );
}

#[test]
fn test_switch_multiple_else_prongs() {
    analyze_err(
        r#"
fn f(x: i32) -> i32 {
    return switch (x) {
        1 => 10,
        else => 20,
        else => 30,
    };
}
"#,
        &["multiple else prongs in switch expression"],
    );
}

#[test]
fn test_switch_items_must_be_constant() {
    analyze_err(
        r#"
fn f(x: i32, y: i32) -> i32 {
    return switch (x) {
        y => 10,
        else => 20,
    };
}
"#,
        &["unable to resolve constant expression"],
    );
}

#[test]
fn test_labels_and_goto() {
    analyze_ok(
        r#"
fn f() {
    goto done;
done:
    return;
}
"#,
    );
}

#[test]
fn test_unused_label() {
    analyze_err(
        "fn f() {\na_label:\n}",
        &["label 'a_label' defined but not used"],
    );
}

#[test]
fn test_undeclared_label() {
    analyze_err(
        "fn f() {\n    goto nowhere;\n}",
        &["use of undeclared label 'nowhere'"],
    );
}

#[test]
fn test_global_initializer_requires_constant() {
    analyze_err(
        r#"
extern fn foo() -> i32;
const x = foo();
"#,
        &["global variable initializer requires constant expression"],
    );
}

#[test]
fn test_string_concat_requires_constant() {
    analyze_err(
        r#"
fn f(s: []u8) -> []const u8 {
    s ++ "foo"
}
"#,
        &["string concatenation requires constant expression"],
    );
}

#[test]
fn test_variadic_only_in_extern() {
    analyze_err(
        "fn f(...) {}",
        &["variadic arguments only allowed in extern functions"],
    );
}

#[test]
fn test_extern_variadic_ok() {
    analyze_ok(
        r#"
extern fn printf(fmt: &const u8, ...) -> i32;
fn f() -> i32 {
    return printf(c"hello\n");
}
"#,
    );
}

#[test]
fn test_noalias_on_non_pointer() {
    analyze_err(
        "fn f(noalias x: i32) {}",
        &["noalias on non-pointer parameter"],
    );
}

#[test]
fn test_byvalue_struct_on_exported_function() {
    analyze_err(
        r#"
struct A { x: i32, }
export fn f(a: A) {}
"#,
        &["byvalue struct parameters not yet supported on exported functions"],
    );
}

#[test]
fn test_invalid_directive() {
    analyze_err(
        r#"
#bogus1("")
extern fn b();
#bogus2("")
fn a() {}
"#,
        &["invalid directive: 'bogus1'", "invalid directive: 'bogus2'"],
    );
}

#[test]
fn test_fn_attributes() {
    analyze_ok(
        r#"
#attribute("naked")
fn f() {}
#attribute("inline")
fn g() {}
"#,
    );
}

#[test]
fn test_bad_version_string() {
    analyze_err(
        r#"
#version("aoeu")
export executable "test";
"#,
        &["invalid version string"],
    );
}

#[test]
fn test_root_export_with_version() {
    let messages = analyze_source_with(
        r#"
#version("1.2.3")
#link("c")
export executable "test";
"#,
        |analyzer| {
            assert!(analyzer.root_export.is_some());
            assert_eq!(analyzer.version, (1, 2, 3));
            assert_eq!(analyzer.link_libs, vec!["c".to_string()]);
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_c_include_outside_c_import() {
    analyze_err(
        "fn f() {\n    @c_include(\"stdio.h\");\n}",
        &["@c_include valid only in c_import blocks"],
    );
}

#[test]
fn test_c_import_without_ingest_fails() {
    analyze_err(
        r#"
c_import {
    @c_include("stdio.h");
}
"#,
        &["C import failed"],
    );
}

#[test]
fn test_invalid_builtin() {
    analyze_err(
        "fn f() -> @bogus(foo) {\n}",
        &["invalid builtin function: 'bogus'"],
    );
}

#[test]
fn test_typeof_numeric_literal_rejected() {
    analyze_err(
        r#"
const x = 3;
struct Foo {
    index: @typeof(x),
}
"#,
        &["type '(integer literal)' not eligible for @typeof"],
    );
}

#[test]
fn test_typeof_variable() {
    analyze_ok(
        r#"
fn f() -> i32 {
    var x: i32 = 1;
    var y: @typeof(x) = 2;
    return y;
}
"#,
    );
}

#[test]
fn test_member_reference_base_not_struct() {
    analyze_err(
        "fn f(x: i32) {\n    x.foo();\n}",
        &["member reference base type not struct or enum"],
    );
}

#[test]
fn test_pointer_roundtrip() {
    analyze_ok(
        r#"
fn f() -> i32 {
    var x: i32 = 1;
    const p = &x;
    *p = 2;
    return x;
}
"#,
    );
}

#[test]
fn test_address_of_number_literal() {
    analyze_err(
        r#"
const x = 3;
const y = &x;
"#,
        &["unable to get address of type '(integer literal)'"],
    );
}

#[test]
fn test_indirection_requires_pointer() {
    analyze_err(
        "fn f(x: i32) -> i32 {\n    return *x;\n}",
        &["indirection requires pointer operand ('i32' invalid)"],
    );
}

#[test]
fn test_null_needs_maybe_context() {
    analyze_err(
        "fn f() {\n    const x = null;\n}",
        &["unable to determine null type"],
    );
    analyze_ok("fn f() -> ?i32 { return null; }");
}

#[test]
fn test_imports_share_pub_decls() {
    let messages = analyze_sources_with(
        &[
            (
                "main.byl",
                r#"
import "lib.byl";
fn f() -> i32 { return helper(); }
"#,
            ),
            (
                "lib.byl",
                r#"
pub fn helper() -> i32 { return 3; }
"#,
            ),
        ],
        |_| {},
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_import_of_function_overrides() {
    let messages = analyze_sources_with(
        &[
            (
                "main.byl",
                r#"
import "lib.byl";
fn helper() -> i32 { return 1; }
"#,
            ),
            (
                "lib.byl",
                r#"
pub fn helper() -> i32 { return 3; }
"#,
            ),
        ],
        |_| {},
    );
    assert!(
        messages
            .iter()
            .any(|m| m.contains("import of function 'helper' overrides existing definition")),
        "got: {:?}",
        messages
    );
}

#[test]
fn test_analysis_is_deterministic() {
    let source = r#"
const a: @typeof(b) = 0;
const b: @typeof(a) = 0;
struct S { s: S, }
fn f() { undefined_name(); }
"#;
    let first = analyze_source_with(source, |_| {});
    for _ in 0..4 {
        let again = analyze_source_with(source, |_| {});
        assert_eq!(first, again);
    }
}
