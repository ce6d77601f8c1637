use crate::core::ast::{
    Ast, BinOp, ContainerInitKind, ContainerKind, ImportId, NodeId, NodeKind, PrefixOp, ReturnKind,
};
use crate::error::Reporter;
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;

fn parse(source: &str) -> (Ast, NodeId, Reporter) {
    let mut reporter = Reporter::new();
    let mut ast = Ast::new();
    let file_id = reporter.add_file("test.byl".to_string(), source.to_string());
    let mut lexer = Lexer::new(source, file_id, &mut reporter);
    let tokens = lexer.tokenize();
    let mut parser = Parser::new(tokens, file_id, ImportId(0), &mut ast, &mut reporter);
    let root = parser.parse_root();
    (ast, root, reporter)
}

fn parse_ok(source: &str) -> (Ast, NodeId) {
    let (ast, root, reporter) = parse(source);
    assert!(
        !reporter.has_errors(),
        "unexpected parse errors: {:?}",
        reporter
            .diagnostics()
            .iter()
            .map(|d| d.message.clone())
            .collect::<Vec<_>>()
    );
    (ast, root)
}

fn root_decls(ast: &Ast, root: NodeId) -> Vec<NodeId> {
    match ast.kind(root) {
        NodeKind::Root(r) => r.decls.clone(),
        other => panic!("expected root, got {:?}", other),
    }
}

fn find<F: Fn(&NodeKind) -> bool>(ast: &Ast, predicate: F) -> Option<NodeId> {
    (0..ast.len() as u32).map(NodeId).find(|&id| predicate(ast.kind(id)))
}

#[test]
fn test_parse_fn_def() {
    let (ast, root) = parse_ok("fn add(a: i32, b: i32) -> i32 { return a + b; }");
    let decls = root_decls(&ast, root);
    assert_eq!(decls.len(), 1);
    let proto = match ast.kind(decls[0]) {
        NodeKind::FnDef(def) => def.proto,
        other => panic!("expected fn def, got {:?}", other),
    };
    match ast.kind(proto) {
        NodeKind::FnProto(p) => {
            assert_eq!(p.name, "add");
            assert_eq!(p.params.len(), 2);
            assert!(p.return_type.is_some());
            assert!(!p.is_var_args);
        }
        other => panic!("expected fn proto, got {:?}", other),
    }
}

#[test]
fn test_parse_extern_fn() {
    let (ast, root) = parse_ok("extern fn puts(s: &const u8) -> i32;");
    let decls = root_decls(&ast, root);
    match ast.kind(decls[0]) {
        NodeKind::FnProto(p) => {
            assert!(p.is_extern);
            assert_eq!(p.name, "puts");
        }
        other => panic!("expected extern proto, got {:?}", other),
    }
}

#[test]
fn test_parse_var_decls() {
    let (ast, root) = parse_ok("var x: i32 = 1;\nconst y = 2;");
    let decls = root_decls(&ast, root);
    assert_eq!(decls.len(), 2);
    match ast.kind(decls[0]) {
        NodeKind::VarDecl(d) => {
            assert!(!d.is_const);
            assert!(d.type_expr.is_some());
            assert!(d.init.is_some());
        }
        other => panic!("expected var decl, got {:?}", other),
    }
    match ast.kind(decls[1]) {
        NodeKind::VarDecl(d) => assert!(d.is_const),
        other => panic!("expected const decl, got {:?}", other),
    }
}

#[test]
fn test_parse_containers() {
    let (ast, root) = parse_ok(
        r#"
struct Point {
    x: i32,
    y: i32,
    fn len2(p: Point) -> i32 { return p.x * p.x + p.y * p.y; }
}
enum Shape {
    Circle: i32,
    Square,
}
"#,
    );
    let decls = root_decls(&ast, root);
    match ast.kind(decls[0]) {
        NodeKind::ContainerDecl(d) => {
            assert_eq!(d.kind, ContainerKind::Struct);
            assert_eq!(d.fields.len(), 2);
            assert_eq!(d.fns.len(), 1);
        }
        other => panic!("expected struct, got {:?}", other),
    }
    match ast.kind(decls[1]) {
        NodeKind::ContainerDecl(d) => {
            assert_eq!(d.kind, ContainerKind::Enum);
            assert_eq!(d.fields.len(), 2);
        }
        other => panic!("expected enum, got {:?}", other),
    }
}

#[test]
fn test_parse_precedence() {
    // 1 + 2 * 3 parses as 1 + (2 * 3)
    let (ast, _) = parse_ok("const x = 1 + 2 * 3;");
    let add = find(&ast, |k| matches!(k, NodeKind::BinOp(b) if b.op == BinOp::Add)).unwrap();
    let mul = match ast.kind(add) {
        NodeKind::BinOp(b) => b.op2,
        _ => unreachable!(),
    };
    assert!(matches!(ast.kind(mul), NodeKind::BinOp(b) if b.op == BinOp::Mult));
}

#[test]
fn test_parse_prefix_operators() {
    let (ast, _) = parse_ok("const x = &const y;");
    assert!(find(&ast, |k| {
        matches!(k, NodeKind::PrefixOp(p) if p.op == PrefixOp::ConstAddressOf)
    })
    .is_some());

    let (ast, _) = parse_ok("fn f() -> ?i32 { return null; }");
    assert!(
        find(&ast, |k| matches!(k, NodeKind::PrefixOp(p) if p.op == PrefixOp::Maybe)).is_some()
    );

    let (ast, _) = parse_ok("fn f() -> %i32 { return 1; }");
    assert!(
        find(&ast, |k| matches!(k, NodeKind::PrefixOp(p) if p.op == PrefixOp::Error)).is_some()
    );
}

#[test]
fn test_parse_error_return() {
    let (ast, _) = parse_ok("fn g() -> %i32 { %return h(); }\nextern fn h() -> %i32;");
    assert!(find(&ast, |k| {
        matches!(k, NodeKind::Return(r) if r.kind == ReturnKind::Error)
    })
    .is_some());
}

#[test]
fn test_parse_unwrap_operators() {
    let (ast, _) = parse_ok("fn f(x: ?i32) -> i32 { return x ?? 0; }");
    assert!(find(&ast, |k| {
        matches!(k, NodeKind::BinOp(b) if b.op == BinOp::UnwrapMaybe)
    })
    .is_some());

    let (ast, _) = parse_ok("fn f() -> i32 { return g() %% |e| 0; }\nextern fn g() -> %i32;");
    let unwrap = find(&ast, |k| matches!(k, NodeKind::UnwrapErr(_))).unwrap();
    match ast.kind(unwrap) {
        NodeKind::UnwrapErr(u) => assert!(u.symbol.is_some()),
        _ => unreachable!(),
    }
}

#[test]
fn test_parse_slice_and_index() {
    let (ast, _) = parse_ok("fn f(a: []u8) -> u8 { const s = a[1..3]; return a[0]; }");
    assert!(find(&ast, |k| matches!(k, NodeKind::Slice(s) if s.end.is_some())).is_some());
    assert!(find(&ast, |k| matches!(k, NodeKind::ArrayAccess(_))).is_some());
}

#[test]
fn test_parse_container_init() {
    let (ast, _) = parse_ok("const p = Point { .x = 1, .y = 2, };");
    let init = find(&ast, |k| matches!(k, NodeKind::ContainerInit(_))).unwrap();
    match ast.kind(init) {
        NodeKind::ContainerInit(i) => {
            assert_eq!(i.kind, ContainerInitKind::Struct);
            assert_eq!(i.entries.len(), 2);
        }
        _ => unreachable!(),
    }

    let (ast, _) = parse_ok("const a = []u8 { 1, 2, 3, };");
    let init = find(&ast, |k| matches!(k, NodeKind::ContainerInit(_))).unwrap();
    match ast.kind(init) {
        NodeKind::ContainerInit(i) => {
            assert_eq!(i.kind, ContainerInitKind::Array);
            assert_eq!(i.entries.len(), 3);
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_parse_switch() {
    let (ast, _) = parse_ok(
        r#"
fn f(x: i32) -> i32 {
    return switch (x) {
        1, 2 => 10,
        3 => |v| 20,
        else => 30,
    };
}
"#,
    );
    let switch = find(&ast, |k| matches!(k, NodeKind::Switch(_))).unwrap();
    match ast.kind(switch) {
        NodeKind::Switch(s) => assert_eq!(s.prongs.len(), 3),
        _ => unreachable!(),
    }
}

#[test]
fn test_parse_loops() {
    let (ast, _) = parse_ok(
        r#"
fn f(arr: []i32) {
    while (true) { break; }
    for (x, arr) { continue; }
    for (x, arr, i) {}
}
"#,
    );
    assert!(find(&ast, |k| matches!(k, NodeKind::While(_))).is_some());
    assert!(find(&ast, |k| matches!(k, NodeKind::For(f) if f.index.is_some())).is_some());
}

#[test]
fn test_parse_if_var() {
    let (ast, _) = parse_ok("fn f(x: ?i32) { if (var v ?= x) {} else {} }");
    let if_var = find(&ast, |k| matches!(k, NodeKind::IfVar(_))).unwrap();
    match ast.kind(if_var) {
        NodeKind::IfVar(v) => {
            assert_eq!(v.var_name, "v");
            assert!(!v.is_const);
            assert!(v.else_node.is_some());
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_parse_root_export_and_directives() {
    let (ast, root) = parse_ok(
        r#"
#version("0.1.0")
#link("c")
export executable "hello";
fn main_() {}
"#,
    );
    let decls = root_decls(&ast, root);
    match ast.kind(decls[0]) {
        NodeKind::RootExport(e) => {
            assert_eq!(e.kind, "executable");
            assert_eq!(e.name, "hello");
            assert_eq!(e.directives.len(), 2);
        }
        other => panic!("expected root export, got {:?}", other),
    }
}

#[test]
fn test_parse_imports() {
    let (ast, root) = parse_ok("import \"other.byl\";\nc_import {\n    @c_include(\"stdio.h\");\n}");
    let decls = root_decls(&ast, root);
    assert!(matches!(ast.kind(decls[0]), NodeKind::Import(_)));
    assert!(matches!(ast.kind(decls[1]), NodeKind::CImport(_)));
}

#[test]
fn test_parse_labels_and_goto() {
    let (ast, _) = parse_ok("fn f() {\n    goto out;\nout:\n    return;\n}");
    assert!(find(&ast, |k| matches!(k, NodeKind::Label(l) if l.name == "out")).is_some());
    assert!(find(&ast, |k| matches!(k, NodeKind::Goto(g) if g.name == "out")).is_some());
}

#[test]
fn test_parse_array_types() {
    let (ast, _) = parse_ok("const a: [4]u8 = undefined;\nconst b: []const u8 = \"x\";");
    let sized = find(&ast, |k| matches!(k, NodeKind::ArrayType(t) if t.size.is_some())).unwrap();
    assert!(matches!(ast.kind(sized), NodeKind::ArrayType(t) if !t.is_const));
    assert!(find(&ast, |k| {
        matches!(k, NodeKind::ArrayType(t) if t.size.is_none() && t.is_const)
    })
    .is_some());
}

#[test]
fn test_missing_semicolon_is_an_error() {
    let (_, _, reporter) = parse("fn f() { const a = 1 const b = 2; }");
    assert!(reporter.has_errors());
}

#[test]
fn test_invalid_token_is_an_error() {
    let (_, _, reporter) = parse("fn f() { (const a = 0); }");
    assert!(reporter.has_errors());
}

#[test]
fn test_stray_top_level_token_is_an_error() {
    let (_, _, reporter) = parse("42;");
    assert!(reporter.has_errors());
}
