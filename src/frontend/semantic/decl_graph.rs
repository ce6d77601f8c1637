use crate::core::ast::{Ast, ImportId, NodeId, NodeKind};
use crate::core::types::TypeInterner;
use crate::frontend::semantic::scope::{ScopeArena, ScopeId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// per top-level-declaration dependency record
#[derive(Debug)]
pub struct TopDecl {
    pub name: String,
    pub import: ImportId,
    pub deps: BTreeSet<String>,
    // set while the declaration's dependencies are being resolved; seeing it
    // again means a dependency loop
    pub in_current_deps: bool,
}

/// dependency bookkeeping for demand-driven top-level resolution.
/// btree containers keep diagnostics independent of hash iteration order.
pub struct DeclGraph {
    pub decls: HashMap<NodeId, TopDecl>,
    unresolved: BTreeMap<String, NodeId>,
}

impl DeclGraph {
    pub fn new() -> Self {
        Self {
            decls: HashMap::new(),
            unresolved: BTreeMap::new(),
        }
    }

    pub fn add_decl(&mut self, node: NodeId, decl: TopDecl) {
        self.decls.insert(node, decl);
    }

    pub fn mark_unresolved(&mut self, name: String, node: NodeId) {
        self.unresolved.insert(name, node);
    }

    pub fn unresolved_by_name(&self, name: &str) -> Option<NodeId> {
        self.unresolved.get(name).copied()
    }

    /// drop a just-resolved declaration from the unresolved set
    pub fn satisfy_dep(&mut self, name: &str) {
        self.unresolved.remove(name);
    }

    pub fn has_unresolved(&self) -> bool {
        !self.unresolved.is_empty()
    }

    /// the unresolved declaration with the smallest creation index, so the
    /// resolution order is the same on every run
    pub fn pick_next(&self) -> Option<NodeId> {
        self.unresolved.values().copied().min()
    }
}

impl Default for DeclGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// walks a declaration's type/initializer subexpressions collecting every
/// bare identifier that is not a primitive and not already a known type in
/// the import's scope; those names are the declaration's dependencies
pub fn collect_expr_decl_deps(
    ast: &Ast,
    interner: &TypeInterner,
    scopes: &ScopeArena,
    import_scope: ScopeId,
    node: NodeId,
    deps: &mut BTreeSet<String>,
) {
    match ast.kind(node) {
        NodeKind::NumberLit(_)
        | NodeKind::StringLit(_)
        | NodeKind::CharLit(_)
        | NodeKind::BoolLit(_)
        | NodeKind::NullLit
        | NodeKind::UndefinedLit
        | NodeKind::Goto(_)
        | NodeKind::Break
        | NodeKind::Continue
        | NodeKind::Label(_)
        | NodeKind::ErrorType => {}
        NodeKind::Symbol(sym) => {
            if interner.get_primitive(&sym.name).is_none()
                && scopes.lookup_type(import_scope, &sym.name).is_none()
            {
                deps.insert(sym.name.clone());
            }
        }
        NodeKind::BinOp(bin) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, bin.op1, deps);
            collect_expr_decl_deps(ast, interner, scopes, import_scope, bin.op2, deps);
        }
        NodeKind::UnwrapErr(unwrap) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, unwrap.op1, deps);
            collect_expr_decl_deps(ast, interner, scopes, import_scope, unwrap.op2, deps);
        }
        NodeKind::Return(ret) => {
            if let Some(expr) = ret.expr {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, expr, deps);
            }
        }
        NodeKind::PrefixOp(prefix) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, prefix.expr, deps);
        }
        NodeKind::ImplicitCast(cast) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, cast.expr, deps);
        }
        NodeKind::FnCall(call) => {
            if !call.is_builtin {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, call.callee, deps);
            }
            for &param in &call.params {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, param, deps);
            }
        }
        NodeKind::ArrayAccess(access) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, access.array, deps);
            collect_expr_decl_deps(ast, interner, scopes, import_scope, access.subscript, deps);
        }
        NodeKind::Slice(slice) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, slice.array, deps);
            collect_expr_decl_deps(ast, interner, scopes, import_scope, slice.start, deps);
            if let Some(end) = slice.end {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, end, deps);
            }
        }
        NodeKind::FieldAccess(access) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, access.base, deps);
        }
        NodeKind::IfBool(if_expr) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, if_expr.condition, deps);
            collect_expr_decl_deps(ast, interner, scopes, import_scope, if_expr.then_block, deps);
            if let Some(else_node) = if_expr.else_node {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, else_node, deps);
            }
        }
        NodeKind::IfVar(if_var) => {
            if let Some(type_expr) = if_var.type_expr {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, type_expr, deps);
            }
            collect_expr_decl_deps(ast, interner, scopes, import_scope, if_var.init, deps);
            collect_expr_decl_deps(ast, interner, scopes, import_scope, if_var.then_block, deps);
            if let Some(else_node) = if_var.else_node {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, else_node, deps);
            }
        }
        NodeKind::While(while_expr) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, while_expr.condition, deps);
            collect_expr_decl_deps(ast, interner, scopes, import_scope, while_expr.body, deps);
        }
        NodeKind::For(for_expr) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, for_expr.array, deps);
            collect_expr_decl_deps(ast, interner, scopes, import_scope, for_expr.body, deps);
        }
        NodeKind::Block(block) => {
            for &stmt in &block.statements {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, stmt, deps);
            }
        }
        NodeKind::ContainerInit(init) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, init.type_expr, deps);
            for &entry in &init.entries {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, entry, deps);
            }
        }
        NodeKind::StructValField(field) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, field.expr, deps);
        }
        NodeKind::ArrayType(array_type) => {
            if let Some(size) = array_type.size {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, size, deps);
            }
            collect_expr_decl_deps(ast, interner, scopes, import_scope, array_type.elem, deps);
        }
        NodeKind::Switch(switch) => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, switch.expr, deps);
            for &prong in &switch.prongs {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, prong, deps);
            }
        }
        NodeKind::SwitchProng(prong) => {
            for &item in &prong.items {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, item, deps);
            }
            collect_expr_decl_deps(ast, interner, scopes, import_scope, prong.expr, deps);
        }
        NodeKind::SwitchRange { start, end } => {
            collect_expr_decl_deps(ast, interner, scopes, import_scope, *start, deps);
            collect_expr_decl_deps(ast, interner, scopes, import_scope, *end, deps);
        }
        NodeKind::VarDecl(decl) => {
            if let Some(type_expr) = decl.type_expr {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, type_expr, deps);
            }
            if let Some(init) = decl.init {
                collect_expr_decl_deps(ast, interner, scopes, import_scope, init, deps);
            }
        }
        // declarations are walked by the detection pass, not here
        NodeKind::Root(_)
        | NodeKind::RootExport(_)
        | NodeKind::Directive(_)
        | NodeKind::FnProto(_)
        | NodeKind::FnDef(_)
        | NodeKind::ParamDecl(_)
        | NodeKind::ErrorValueDecl(_)
        | NodeKind::ContainerDecl(_)
        | NodeKind::ContainerField(_)
        | NodeKind::Import(_)
        | NodeKind::CImport(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_next_is_smallest_create_index() {
        let mut graph = DeclGraph::new();
        graph.mark_unresolved("b".to_string(), NodeId(7));
        graph.mark_unresolved("a".to_string(), NodeId(12));
        graph.mark_unresolved("c".to_string(), NodeId(3));
        assert_eq!(graph.pick_next(), Some(NodeId(3)));
        graph.satisfy_dep("c");
        assert_eq!(graph.pick_next(), Some(NodeId(7)));
        graph.satisfy_dep("b");
        graph.satisfy_dep("a");
        assert_eq!(graph.pick_next(), None);
    }
}
