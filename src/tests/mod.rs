mod const_eval_tests;
mod conv_tests;
mod decl_tests;
mod lexer_tests;
mod parser_tests;
mod semantic_tests;

use crate::core::ast::{Ast, ImportId, NodeId, NodeKind};
use crate::error::Reporter;
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::frontend::semantic::{Analyzer, NullHeaderIngest, Session};

/// runs the whole pipeline over one source string; assertions that need the
/// analyzer run inside the closure, diagnostics are returned for the rest
pub(crate) fn analyze_source_with<F>(source: &str, check: F) -> Vec<String>
where
    F: FnOnce(&Analyzer<'_>),
{
    analyze_sources_with(&[("test.byl", source)], check)
}

/// like analyze_source_with but over several files; `import "name";`
/// declarations are wired to the file with that name
pub(crate) fn analyze_sources_with<F>(sources: &[(&str, &str)], check: F) -> Vec<String>
where
    F: FnOnce(&Analyzer<'_>),
{
    let mut reporter = Reporter::new();
    let mut ast = Ast::new();

    let mut parsed = Vec::new();
    for (index, (name, source)) in sources.iter().enumerate() {
        let file_id = reporter.add_file(name.to_string(), source.to_string());
        let mut lexer = Lexer::new(source, file_id, &mut reporter);
        let tokens = lexer.tokenize();
        let mut parser = Parser::new(
            tokens,
            file_id,
            ImportId(index as u32),
            &mut ast,
            &mut reporter,
        );
        let root = parser.parse_root();
        parsed.push((root, file_id, name.to_string()));
    }

    // wire import declarations to their files by name
    let mut edges = Vec::new();
    for (root, _, _) in &parsed {
        let decls = match ast.kind(*root) {
            NodeKind::Root(root_node) => root_node.decls.clone(),
            _ => continue,
        };
        for decl in decls {
            if let NodeKind::Import(import) = ast.kind(decl) {
                if let Some(target) = parsed.iter().position(|(_, _, name)| *name == import.path) {
                    edges.push((decl, ImportId(target as u32)));
                }
            }
        }
    }

    let mut header = NullHeaderIngest;
    let mut analyzer = Analyzer::new(&mut reporter, &mut ast, Session::default(), &mut header);
    for (root, file_id, name) in &parsed {
        analyzer.add_import(*root, *file_id, name.clone());
    }
    for (node, target) in edges {
        analyzer.set_import_target(node, target);
    }

    if !analyzer.reporter.has_errors() {
        analyzer.analyze();
    }

    check(&analyzer);
    drop(analyzer);

    reporter
        .diagnostics()
        .iter()
        .map(|d| d.message.clone())
        .collect()
}

/// asserts the source analyzes without diagnostics
pub(crate) fn analyze_ok(source: &str) {
    let messages = analyze_source_with(source, |_| {});
    assert!(
        messages.is_empty(),
        "expected no errors, got: {:?}",
        messages
    );
}

/// asserts each expected message appears among the diagnostics
pub(crate) fn analyze_err(source: &str, expected: &[&str]) {
    let messages = analyze_source_with(source, |_| {});
    assert!(!messages.is_empty(), "expected errors, got none");
    for needle in expected {
        assert!(
            messages.iter().any(|m| m.contains(needle)),
            "expected a diagnostic containing {:?}, got: {:?}",
            needle,
            messages
        );
    }
}

/// finds the first node matching the predicate
pub(crate) fn find_node<F>(analyzer: &Analyzer<'_>, predicate: F) -> Option<NodeId>
where
    F: Fn(&NodeKind) -> bool,
{
    (0..analyzer.ast.len() as u32)
        .map(NodeId)
        .find(|&id| predicate(analyzer.ast.kind(id)))
}
