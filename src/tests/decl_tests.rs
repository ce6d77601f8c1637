use crate::core::ast::NodeKind;
use crate::core::bignum::BigNum;
use crate::frontend::semantic::ConstVal;
use crate::tests::{analyze_err, analyze_ok, analyze_source_with, find_node};

#[test]
fn test_use_before_declaration() {
    // x depends on S, which is declared later in the file
    let messages = analyze_source_with(
        r#"
const x = @sizeof(S);
struct S { a: i32, }
"#,
        |analyzer| {
            let decl = find_node(analyzer, |k| {
                matches!(k, NodeKind::VarDecl(d) if d.name == "x")
            })
            .unwrap();
            let init = match analyzer.ast.kind(decl) {
                NodeKind::VarDecl(d) => d.init.unwrap(),
                _ => unreachable!(),
            };
            match analyzer.const_val(init) {
                Some(ConstVal::Num(num)) => assert_eq!(*num, BigNum::from_unsigned(4)),
                other => panic!("expected folded size, got {:?}", other),
            }
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_function_use_before_declaration() {
    analyze_ok(
        r#"
fn f() -> i32 { return g(); }
fn g() -> i32 { return 1; }
"#,
    );
}

#[test]
fn test_top_level_dependency_loop() {
    analyze_err(
        r#"
const a: @typeof(b) = 0;
const b: @typeof(a) = 0;
"#,
        &["use of undeclared identifier"],
    );
}

#[test]
fn test_indirect_struct_loop() {
    let messages = analyze_source_with(
        r#"
struct A { b: B, }
struct B { c: C, }
struct C { a: A, }
"#,
        |_| {},
    );
    assert_eq!(
        messages
            .iter()
            .filter(|m| m.contains("struct has infinite size"))
            .count(),
        1,
        "got: {:?}",
        messages
    );
}

#[test]
fn test_struct_cycle_through_pointer_is_fine() {
    analyze_ok(
        r#"
struct Node {
    next: &Node,
    value: i32,
}
"#,
    );
}

#[test]
fn test_struct_cycle_through_slice_is_fine() {
    analyze_ok(
        r#"
struct Tree {
    children: []Tree,
    value: i32,
}
"#,
    );
}

#[test]
fn test_enum_infinite_size() {
    let messages = analyze_source_with("enum E { Self_: E, }", |_| {});
    assert_eq!(
        messages
            .iter()
            .filter(|m| m.contains("enum has infinite size"))
            .count(),
        1,
        "got: {:?}",
        messages
    );
}

#[test]
fn test_redefinition_of_struct() {
    analyze_err(
        "struct A { x: i32, }\nstruct A { y: i32, }",
        &["redefinition of 'A'"],
    );
}

#[test]
fn test_redefinition_of_enum() {
    analyze_err("enum A {}\nenum A {}", &["redefinition of 'A'"]);
}

#[test]
fn test_redefinition_of_global_variable() {
    analyze_err(
        "var a: i32 = 1;\nvar a: i32 = 2;",
        &["redeclaration of variable 'a'"],
    );
}

#[test]
fn test_chained_const_types() {
    // each declaration depends on the next one textually
    analyze_ok(
        r#"
const A: B = 0;
const B = C;
const C = i32;
"#,
    );
}

#[test]
fn test_error_values_get_monotonic_indices() {
    let messages = analyze_source_with(
        r#"
error First;
error Second;
error Third;
"#,
        |analyzer| {
            assert_eq!(analyzer.error_value_count(), 3);
            let values: Vec<u64> = analyzer.error_values.iter().map(|e| e.value).collect();
            assert_eq!(values, vec![0, 1, 2]);
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_error_tag_width_tracks_error_count() {
    let messages = analyze_source_with(
        r#"
error A;
error B;
"#,
        |analyzer| {
            // two error values fit in a byte
            assert_eq!(analyzer.interner.err_tag_type(), analyzer.interner.u8_);
            assert_eq!(analyzer.interner.size_in_bits(analyzer.interner.pure_error), 8);
        },
    );
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_error_tag_width_at_the_byte_boundary() {
    // 256 error values use tags 0..=255, which still fit in a byte
    let mut source = String::new();
    for i in 0..256 {
        source.push_str(&format!("error E{};\n", i));
    }
    let messages = analyze_source_with(&source, |analyzer| {
        assert_eq!(analyzer.error_value_count(), 256);
        assert_eq!(analyzer.interner.err_tag_type(), analyzer.interner.u8_);
        assert_eq!(analyzer.interner.size_in_bits(analyzer.interner.pure_error), 8);
    });
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);

    // the 257th value is tag 256 and forces the next width
    let mut source = String::new();
    for i in 0..257 {
        source.push_str(&format!("error E{};\n", i));
    }
    let messages = analyze_source_with(&source, |analyzer| {
        assert_eq!(analyzer.error_value_count(), 257);
        assert_eq!(analyzer.interner.err_tag_type(), analyzer.interner.u16_);
        assert_eq!(analyzer.interner.size_in_bits(analyzer.interner.pure_error), 16);
    });
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_enum_tag_width_at_the_byte_boundary() {
    // 256 variants use tags 0..=255; the all-void enum is the bare tag
    let mut source = String::from("enum Big {\n");
    for i in 0..256 {
        source.push_str(&format!("    V{},\n", i));
    }
    source.push_str("}\nconst size = @sizeof(Big);\n");
    let messages = analyze_source_with(&source, |analyzer| {
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
    });
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
}

#[test]
fn test_err_to_int_cast_at_the_byte_boundary() {
    // 256 error values still fit a u8: the highest tag is 255
    let mut source = String::new();
    for i in 0..256 {
        source.push_str(&format!("error E{};\n", i));
    }
    source.push_str("fn f(e: error) -> u8 { return u8(e); }\n");
    let messages = analyze_source_with(&source, |_| {});
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);

    // one more and the cast no longer fits
    let mut source = String::new();
    for i in 0..257 {
        source.push_str(&format!("error E{};\n", i));
    }
    source.push_str("fn f(e: error) -> u8 { return u8(e); }\n");
    let messages = analyze_source_with(&source, |_| {});
    assert!(
        messages
            .iter()
            .any(|m| m.contains("too many error values to fit in 'u8'")),
        "got: {:?}",
        messages
    );
}

#[test]
fn test_diagnostics_come_out_in_source_order() {
    // the struct resolves eagerly and reports first in time, but the
    // reporter hands diagnostics back in source order
    let source = r#"
const a: Missing = 0;
struct S { s: S, }
"#;
    let messages = analyze_source_with(source, |_| {});
    assert_eq!(messages.len(), 2, "got: {:?}", messages);
    assert!(
        messages[0].contains("use of undeclared identifier 'Missing'"),
        "got: {:?}",
        messages
    );
    assert!(
        messages[1].contains("struct has infinite size"),
        "got: {:?}",
        messages
    );
}
