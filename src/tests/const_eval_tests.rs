use crate::core::ast::NodeKind;
use crate::core::bignum::BigNum;
use crate::frontend::semantic::ConstVal;
use crate::tests::{analyze_err, analyze_source_with, find_node};

fn const_of_decl(source: &str, name: &str) -> Option<ConstVal> {
    let mut result = None;
    let messages = analyze_source_with(source, |analyzer| {
        let decl = find_node(analyzer, |k| {
            matches!(k, NodeKind::VarDecl(d) if d.name == name)
        })
        .expect("declaration not found");
        let init = match analyzer.ast.kind(decl) {
            NodeKind::VarDecl(d) => d.init.expect("no initializer"),
            _ => unreachable!(),
        };
        result = analyzer.const_val(init).cloned();
    });
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
    result
}

fn assert_const_int(source: &str, name: &str, expected: i64) {
    match const_of_decl(source, name) {
        Some(ConstVal::Num(num)) => assert_eq!(num, BigNum::from_signed(expected)),
        other => panic!("expected numeric constant, got {:?}", other),
    }
}

#[test]
fn test_integer_arithmetic_folds() {
    assert_const_int("const x = 2 + 3 * 4;", "x", 14);
    assert_const_int("const x = 10 - 4;", "x", 6);
    assert_const_int("const x = 9 / 2;", "x", 4);
    assert_const_int("const x = 9 % 2;", "x", 1);
    assert_const_int("const x = 1 << 4;", "x", 16);
    assert_const_int("const x = 255 >> 4;", "x", 15);
    assert_const_int("const x = 12 | 3;", "x", 15);
    assert_const_int("const x = 12 & 10;", "x", 8);
    assert_const_int("const x = 12 ^ 10;", "x", 6);
}

#[test]
fn test_negation_folds() {
    assert_const_int("const x = -5;", "x", -5);
    assert_const_int("const x: i32 = -5;", "x", -5);
}

#[test]
fn test_typed_overflow_is_rejected() {
    analyze_err(
        "const z: u8 = 200 + 100;",
        &["integer value 300 cannot be implicitly casted to type 'u8'"],
    );
}

#[test]
fn test_untyped_overflow_is_rejected() {
    analyze_err(
        "const v = 18446744073709551615 + 1;",
        &["value cannot be represented in any integer type"],
    );
}

#[test]
fn test_division_by_zero() {
    analyze_err("const d = 1 / 0;", &["division by zero"]);
}

#[test]
fn test_bool_ops_fold() {
    assert!(matches!(
        const_of_decl("const b = true && false;", "b"),
        Some(ConstVal::Bool(false))
    ));
    assert!(matches!(
        const_of_decl("const b = true || false;", "b"),
        Some(ConstVal::Bool(true))
    ));
    assert!(matches!(
        const_of_decl("const b = !true;", "b"),
        Some(ConstVal::Bool(false))
    ));
}

#[test]
fn test_comparison_folds() {
    assert!(matches!(
        const_of_decl("const c = 3 < 4;", "c"),
        Some(ConstVal::Bool(true))
    ));
    assert!(matches!(
        const_of_decl("const c = 3 == 4;", "c"),
        Some(ConstVal::Bool(false))
    ));
    assert!(matches!(
        const_of_decl("const c = -1 < 1;", "c"),
        Some(ConstVal::Bool(true))
    ));
}

#[test]
fn test_float_arithmetic_folds() {
    match const_of_decl("const f = 1.5 + 2.25;", "f") {
        Some(ConstVal::Num(BigNum::Float(value))) => assert_eq!(value, 3.75),
        other => panic!("expected float constant, got {:?}", other),
    }
}

#[test]
fn test_char_literal_is_numeric() {
    assert_const_int("const c = 'A';", "c", 65);
}

#[test]
fn test_sizeof_folds() {
    assert_const_int("const s = @sizeof(u32);", "s", 4);
    assert_const_int("const s = @sizeof(&u8);", "s", 8);
    assert_const_int("const s = @sizeof([4]u16);", "s", 8);
    assert_const_int(
        "struct S { a: i32, b: i32, }\nconst s = @sizeof(S);",
        "s",
        8,
    );
}

#[test]
fn test_min_max_value_fold() {
    assert_const_int("const a = @max_value(u8);", "a", 255);
    assert_const_int("const a = @max_value(i8);", "a", 127);
    assert_const_int("const a = @min_value(i8);", "a", -128);
    assert_const_int("const a = @min_value(u32);", "a", 0);
    assert!(matches!(
        const_of_decl("const a = @max_value(bool);", "a"),
        Some(ConstVal::Bool(true))
    ));
}

#[test]
fn test_constant_condition_folds_taken_branch() {
    assert_const_int("const k = if (true) 1 else 2;", "k", 1);
    assert_const_int("const k = if (false) 1 else 2;", "k", 2);
}

#[test]
fn test_const_propagates_through_names() {
    assert_const_int(
        r#"
const a = 6;
const b = a * 7;
"#,
        "b",
        42,
    );
}

#[test]
fn test_c_string_literal_value() {
    let value = const_of_decl(r#"const s = c"hi";"#, "s");
    match value {
        Some(ConstVal::Ptr { elems, len }) => {
            // trailing NUL included
            assert_eq!(len, 3);
            assert_eq!(elems.len(), 3);
            assert!(matches!(&elems[2], ConstVal::Num(num) if *num == BigNum::from_unsigned(0)));
        }
        other => panic!("expected c string pointer, got {:?}", other),
    }
}

#[test]
fn test_undefined_is_a_value() {
    assert!(matches!(
        const_of_decl("const u: i32 = undefined;", "u"),
        Some(ConstVal::Undef)
    ));
}
