use crate::core::ast::*;
use crate::core::bignum::BigNum;
use crate::core::types::{CallConv, FnId, FnSig, TypeId, TypeKind};
use crate::error::{Diagnostic, DiagnosticKind, Reporter};
use crate::frontend::semantic::builtins::{builtin_fn_table, BuiltinFn};
use crate::frontend::semantic::c_import::HeaderIngest;
use crate::frontend::semantic::const_eval::ConstVal;
use crate::frontend::semantic::conv::CastOp;
use crate::frontend::semantic::decl_graph::{collect_expr_decl_deps, DeclGraph, TopDecl};
use crate::frontend::semantic::scope::{
    DeclareVarError, ErrorEntry, ErrorId, ScopeArena, ScopeId, VarId,
};
use codespan::FileId;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// immutable per-compilation configuration
#[derive(Debug, Clone)]
pub struct Session {
    pub pointer_size_bytes: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            pointer_size_bytes: 8,
        }
    }
}

/// per-node analysis result: the resolved type, the folded value when one
/// exists, and the cast classification for call/cast nodes
#[derive(Debug, Clone)]
pub struct ResolvedExpr {
    pub type_id: Option<TypeId>,
    pub const_val: Option<ConstVal>,
    pub cast_op: CastOp,
}

impl Default for ResolvedExpr {
    fn default() -> Self {
        Self {
            type_id: None,
            const_val: None,
            cast_op: CastOp::NoCast,
        }
    }
}

/// analyzer-filled facts that are not part of the type/value result
#[derive(Debug, Clone, Default)]
pub struct NodeMeta {
    pub scope: Option<ScopeId>,
    pub block_scope: Option<ScopeId>,
    pub var: Option<VarId>,
    pub fn_entry: Option<FnId>,
    pub field_index: Option<usize>,
    pub enum_field_index: Option<usize>,
    pub import_target: Option<ImportId>,
    pub member_of: Option<TypeId>,
    pub container_type: Option<TypeId>,
    pub fn_def: Option<NodeId>,
    pub skip: bool,
    pub contains_break: bool,
    pub condition_always_true: bool,
    pub implicit_return_type: Option<TypeId>,
    pub has_global_const: bool,
}

#[derive(Debug, Clone)]
pub struct FnLabel {
    pub name: String,
    pub node: NodeId,
    pub used: bool,
    pub entered_from_fallthrough: bool,
}

pub struct FnEntry {
    pub proto_node: NodeId,
    pub fn_def_node: Option<NodeId>,
    pub import: ImportId,
    pub type_id: TypeId,
    pub symbol_name: String,
    pub member_of: Option<TypeId>,
    pub is_extern: bool,
    pub is_inline: bool,
    pub internal_linkage: bool,
    pub labels: HashMap<String, usize>,
    pub label_list: Vec<FnLabel>,
    // pre-order list of scopes for debug-scope construction
    pub all_scopes: Vec<ScopeId>,
}

pub struct Import {
    pub root: NodeId,
    pub file_id: FileId,
    pub path: String,
    pub scope: ScopeId,
    pub fn_table: HashMap<String, FnId>,
    pub importers: Vec<(ImportId, NodeId)>,
    pub is_c_import: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LValPurpose {
    Assign,
    AddressOf,
}

/// the semantic core: resolves declarations on demand, assigns a type (and
/// when possible a value) to every expression, and records what the backend
/// needs. one instance per compilation.
pub struct Analyzer<'a> {
    pub reporter: &'a mut Reporter,
    pub ast: &'a mut Ast,
    pub session: Session,
    pub header: &'a mut dyn HeaderIngest,

    pub interner: crate::core::types::TypeInterner,
    pub scopes: ScopeArena,
    pub imports: Vec<Import>,
    pub fns: Vec<FnEntry>,
    pub fn_defs: Vec<FnId>,
    pub error_values: Vec<ErrorEntry>,
    pub resolved: Vec<ResolvedExpr>,
    pub meta: Vec<NodeMeta>,
    pub decls: DeclGraph,
    pub c_import_bufs: Vec<String>,
    pub global_vars: Vec<VarId>,
    pub global_consts: Vec<NodeId>,
    pub root_export: Option<NodeId>,
    pub version: (u64, u64, u64),
    pub link_libs: Vec<String>,

    pub(crate) builtins: HashMap<String, BuiltinFn>,
    error_value_count: u64,
    next_error_index: u64,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        reporter: &'a mut Reporter,
        ast: &'a mut Ast,
        session: Session,
        header: &'a mut dyn HeaderIngest,
    ) -> Self {
        let interner = crate::core::types::TypeInterner::new(session.pointer_size_bytes);
        Self {
            reporter,
            ast,
            session,
            header,
            interner,
            scopes: ScopeArena::new(),
            imports: Vec::new(),
            fns: Vec::new(),
            fn_defs: Vec::new(),
            error_values: Vec::new(),
            resolved: Vec::new(),
            meta: Vec::new(),
            decls: DeclGraph::new(),
            c_import_bufs: Vec::new(),
            global_vars: Vec::new(),
            global_consts: Vec::new(),
            root_export: None,
            version: (0, 0, 0),
            link_libs: Vec::new(),
            builtins: builtin_fn_table(),
            error_value_count: 0,
            next_error_index: 0,
        }
    }

    /// registers a parsed file. must be called in the same order the files
    /// were given to the parser, so node owners line up.
    pub fn add_import(&mut self, root: NodeId, file_id: FileId, path: String) -> ImportId {
        let id = ImportId(self.imports.len() as u32);
        let scope = self.scopes.new_scope(root, None, None);
        self.imports.push(Import {
            root,
            file_id,
            path,
            scope,
            fn_table: HashMap::new(),
            importers: Vec::new(),
            is_c_import: false,
        });
        id
    }

    pub fn set_import_target(&mut self, import_node: NodeId, target: ImportId) {
        self.grow_side_tables();
        self.meta[import_node.0 as usize].import_target = Some(target);
    }

    // ---- small accessors ----

    pub fn expr_type(&self, node: NodeId) -> TypeId {
        self.resolved
            .get(node.0 as usize)
            .and_then(|r| r.type_id)
            .unwrap_or(self.interner.invalid)
    }

    pub fn const_val(&self, node: NodeId) -> Option<&ConstVal> {
        self.resolved.get(node.0 as usize)?.const_val.as_ref()
    }

    pub fn cast_op(&self, node: NodeId) -> CastOp {
        self.resolved
            .get(node.0 as usize)
            .map(|r| r.cast_op)
            .unwrap_or(CastOp::NoCast)
    }

    pub fn error_value_count(&self) -> u64 {
        self.error_value_count
    }

    pub(crate) fn set_const(&mut self, node: NodeId, value: ConstVal) {
        self.grow_side_tables();
        self.resolved[node.0 as usize].const_val = Some(value);
    }

    pub(crate) fn grow_side_tables(&mut self) {
        while self.resolved.len() < self.ast.len() {
            self.resolved.push(ResolvedExpr::default());
        }
        while self.meta.len() < self.ast.len() {
            self.meta.push(NodeMeta::default());
        }
    }

    pub(crate) fn add_node_error(&mut self, node: NodeId, kind: DiagnosticKind, message: String) {
        let span = self.ast.span(node);
        let owner = self.ast.owner(node);
        let file_id = self.imports[owner.0 as usize].file_id;
        self.reporter
            .add_diagnostic(Diagnostic::error(kind, span, file_id, message));
    }

    /// invariant violation surfaced through the normal diagnostic channel
    pub(crate) fn ice(&mut self, node: NodeId, message: &str) {
        let span = self.ast.span(node);
        let owner = self.ast.owner(node);
        let file_id = self.imports[owner.0 as usize].file_id;
        self.reporter
            .add_diagnostic(Diagnostic::internal(span, file_id, message.to_string()));
    }

    fn is_invalid(&self, type_id: TypeId) -> bool {
        self.interner.entry(type_id).is_invalid()
    }

    fn is_unreachable(&self, type_id: TypeId) -> bool {
        matches!(self.interner.entry(type_id).kind, TypeKind::Unreachable)
    }

    fn register_fn_scope(&mut self, scope: ScopeId) {
        if let Some(fn_id) = self.scopes.scope(scope).fn_entry {
            self.fns[fn_id.0 as usize].all_scopes.push(scope);
        }
    }

    fn fn_return_type(&self, fn_id: FnId) -> TypeId {
        match self.interner.entry(self.fns[fn_id.0 as usize].type_id).fn_sig() {
            Some(sig) => sig.return_type,
            None => self.interner.invalid,
        }
    }

    fn type_has_codegen_value(&self, type_id: TypeId) -> bool {
        !matches!(
            self.interner.entry(type_id).kind,
            TypeKind::Invalid
                | TypeKind::MetaType
                | TypeKind::Void
                | TypeKind::Unreachable
                | TypeKind::NumLitInt
                | TypeKind::NumLitFloat
                | TypeKind::UndefLit
        )
    }

    fn register_global_const(&mut self, node: NodeId) {
        let Some(type_id) = self.resolved[node.0 as usize].type_id else {
            return;
        };
        if self.resolved[node.0 as usize].const_val.is_some()
            && self.type_has_codegen_value(type_id)
            && self.interner.size_in_bits(type_id) > 0
            && !self.meta[node.0 as usize].has_global_const
        {
            self.meta[node.0 as usize].has_global_const = true;
            self.global_consts.push(node);
        }
    }

    // ---- session driver ----

    /// runs the whole semantic pass over every registered import
    pub fn analyze(&mut self) {
        let initial_import_count = self.imports.len();

        // count error values and wire importer edges before anything else,
        // so the error tag width is fixed for the whole session
        for import_index in 0..initial_import_count {
            let root = self.imports[import_index].root;
            let decls = match self.ast.kind(root) {
                NodeKind::Root(root_node) => root_node.decls.clone(),
                _ => continue,
            };
            for decl in decls {
                match self.ast.kind(decl).clone() {
                    NodeKind::Import(import_node) => {
                        for directive in &import_node.directives {
                            let name = match self.ast.kind(*directive) {
                                NodeKind::Directive(d) => d.name.clone(),
                                _ => continue,
                            };
                            self.add_node_error(
                                *directive,
                                DiagnosticKind::Semantic,
                                format!("invalid directive: '{}'", name),
                            );
                        }
                        self.grow_side_tables();
                        if let Some(target) = self.meta[decl.0 as usize].import_target {
                            self.imports[target.0 as usize]
                                .importers
                                .push((ImportId(import_index as u32), decl));
                        }
                    }
                    NodeKind::ErrorValueDecl(_) => {
                        self.error_value_count += 1;
                    }
                    _ => {}
                }
            }
        }

        // error values are assigned 0..count, so the tag only has to hold
        // count - 1
        let tag = self
            .interner
            .smallest_unsigned_fitting(self.error_value_count.saturating_sub(1));
        self.interner.set_error_tag_type(tag);

        for import_index in 0..initial_import_count {
            let root = self.imports[import_index].root;
            self.detect_top_level_decl_deps(ImportId(import_index as u32), root);
        }

        debug_assert_eq!(self.error_value_count, self.next_error_index);

        // demand-driven resolution, smallest creation index first
        while let Some(node) = self.decls.pick_next() {
            if let Some(decl) = self.decls.decls.get_mut(&node) {
                decl.in_current_deps = true;
            }
            self.recursive_resolve_decl(node);
            if let Some(decl) = self.decls.decls.get_mut(&node) {
                decl.in_current_deps = false;
            }
        }

        // function bodies, in import then source order
        for import_index in 0..self.imports.len() {
            let root = self.imports[import_index].root;
            let decls = match self.ast.kind(root) {
                NodeKind::Root(root_node) => root_node.decls.clone(),
                _ => continue,
            };
            for decl in decls {
                self.analyze_top_level_decl(ImportId(import_index as u32), decl);
            }
        }
    }

    fn recursive_resolve_decl(&mut self, node: NodeId) {
        let (deps, import) = match self.decls.decls.get(&node) {
            Some(decl) => (
                decl.deps.iter().cloned().collect::<Vec<_>>(),
                decl.import,
            ),
            None => return,
        };

        for dep in deps {
            let Some(child) = self.decls.unresolved_by_name(&dep) else {
                continue;
            };
            let in_progress = self
                .decls
                .decls
                .get(&child)
                .map(|d| d.in_current_deps)
                .unwrap_or(false);
            if in_progress {
                // dependency loop; the missing name surfaces as an
                // undeclared identifier where it is used
                continue;
            }
            if let Some(child_decl) = self.decls.decls.get_mut(&child) {
                child_decl.in_current_deps = true;
            }
            self.recursive_resolve_decl(child);
            if let Some(child_decl) = self.decls.decls.get_mut(&child) {
                child_decl.in_current_deps = false;
            }
        }

        self.resolve_top_level_decl(import, node);
    }

    // ---- declaration detection ----

    fn detect_top_level_decl_deps(&mut self, import: ImportId, node: NodeId) {
        match self.ast.kind(node).clone() {
            NodeKind::Root(root) => {
                for decl in root.decls {
                    self.detect_top_level_decl_deps(import, decl);
                }
            }
            NodeKind::ContainerDecl(decl) => {
                let type_id = self.preview_container_decl(import, node);
                self.grow_side_tables();
                self.meta[node.0 as usize].container_type = Some(type_id);

                let mut deps = BTreeSet::new();
                let import_scope = self.imports[import.0 as usize].scope;
                for field in &decl.fields {
                    let type_node = match self.ast.kind(*field) {
                        NodeKind::ContainerField(f) => f.type_expr,
                        _ => continue,
                    };
                    collect_expr_decl_deps(
                        self.ast,
                        &self.interner,
                        &self.scopes,
                        import_scope,
                        type_node,
                        &mut deps,
                    );
                }
                self.add_decl_record(import, node, decl.name.clone(), deps);

                // member functions resolve independently
                for fn_def in decl.fns {
                    let proto = match self.ast.kind(fn_def) {
                        NodeKind::FnDef(def) => def.proto,
                        _ => continue,
                    };
                    self.grow_side_tables();
                    self.meta[proto.0 as usize].member_of = Some(type_id);
                    self.detect_top_level_decl_deps(import, fn_def);
                }
            }
            NodeKind::FnDef(def) => {
                self.grow_side_tables();
                self.meta[def.proto.0 as usize].fn_def = Some(node);
                self.detect_top_level_decl_deps(import, def.proto);
            }
            NodeKind::FnProto(proto) => {
                let mut deps = BTreeSet::new();
                let import_scope = self.imports[import.0 as usize].scope;
                for param in &proto.params {
                    let type_node = match self.ast.kind(*param) {
                        NodeKind::ParamDecl(p) => p.type_expr,
                        _ => continue,
                    };
                    collect_expr_decl_deps(
                        self.ast,
                        &self.interner,
                        &self.scopes,
                        import_scope,
                        type_node,
                        &mut deps,
                    );
                }
                if let Some(return_type) = proto.return_type {
                    collect_expr_decl_deps(
                        self.ast,
                        &self.interner,
                        &self.scopes,
                        import_scope,
                        return_type,
                        &mut deps,
                    );
                }
                self.add_decl_record(import, node, proto.name.clone(), deps);
            }
            NodeKind::VarDecl(decl) => {
                let mut deps = BTreeSet::new();
                let import_scope = self.imports[import.0 as usize].scope;
                if let Some(type_expr) = decl.type_expr {
                    collect_expr_decl_deps(
                        self.ast,
                        &self.interner,
                        &self.scopes,
                        import_scope,
                        type_expr,
                        &mut deps,
                    );
                }
                if let Some(init) = decl.init {
                    collect_expr_decl_deps(
                        self.ast,
                        &self.interner,
                        &self.scopes,
                        import_scope,
                        init,
                        &mut deps,
                    );
                }
                self.add_decl_record(import, node, decl.name.clone(), deps);
            }
            NodeKind::CImport(c_import) => {
                let mut deps = BTreeSet::new();
                let import_scope = self.imports[import.0 as usize].scope;
                collect_expr_decl_deps(
                    self.ast,
                    &self.interner,
                    &self.scopes,
                    import_scope,
                    c_import.block,
                    &mut deps,
                );
                let name = format!("c_import_{}", node.0);
                self.add_decl_record(import, node, name, deps);
            }
            NodeKind::RootExport(_) => {
                self.resolve_root_export(import, node);
            }
            NodeKind::ErrorValueDecl(_) => {
                self.decls.add_decl(
                    node,
                    TopDecl {
                        name: String::new(),
                        import,
                        deps: BTreeSet::new(),
                        in_current_deps: false,
                    },
                );
                self.resolve_top_level_decl(import, node);
            }
            NodeKind::Import(_) => {}
            _ => self.ice(node, "unexpected node at top level"),
        }
    }

    fn add_decl_record(&mut self, import: ImportId, node: NodeId, name: String, deps: BTreeSet<String>) {
        let has_deps = !deps.is_empty();
        self.decls.add_decl(
            node,
            TopDecl {
                name: name.clone(),
                import,
                deps,
                in_current_deps: false,
            },
        );
        if has_deps {
            self.decls.mark_unresolved(name, node);
        } else {
            self.resolve_top_level_decl(import, node);
        }
    }

    fn resolve_top_level_decl(&mut self, import: ImportId, node: NodeId) {
        match self.ast.kind(node).clone() {
            NodeKind::FnProto(_) => self.preview_fn_proto(import, node),
            NodeKind::ContainerDecl(_) => {
                self.grow_side_tables();
                if let Some(type_id) = self.meta[node.0 as usize].container_type {
                    self.resolve_container_type(import, type_id);
                }
            }
            NodeKind::VarDecl(decl) => {
                let scope = self.imports[import.0 as usize].scope;
                let var = self.analyze_variable_declaration_raw(
                    import,
                    scope,
                    node,
                    &decl.name,
                    decl.is_const,
                    decl.visib,
                    decl.type_expr,
                    decl.init,
                    false,
                );
                self.global_vars.push(var);
            }
            NodeKind::ErrorValueDecl(_) => self.resolve_error_value_decl(import, node),
            NodeKind::CImport(_) => self.resolve_c_import_decl(import, node),
            NodeKind::RootExport(_) | NodeKind::Import(_) => {}
            _ => self.ice(node, "unexpected node in declaration resolution"),
        }

        if let Some(decl) = self.decls.decls.get(&node) {
            let name = decl.name.clone();
            if !name.is_empty() {
                self.decls.satisfy_dep(&name);
            }
        }
    }

    fn resolve_root_export(&mut self, _import: ImportId, node: NodeId) {
        let export = match self.ast.kind(node) {
            NodeKind::RootExport(e) => e.clone(),
            _ => return,
        };
        for directive in &export.directives {
            let (name, param) = match self.ast.kind(*directive) {
                NodeKind::Directive(d) => (d.name.clone(), d.param.clone()),
                _ => continue,
            };
            match name.as_str() {
                "version" => {
                    let parts: Vec<_> = param.split('.').collect();
                    let parsed = if parts.len() == 3 {
                        let major = parts[0].parse::<u64>().ok();
                        let minor = parts[1].parse::<u64>().ok();
                        let patch = parts[2].parse::<u64>().ok();
                        match (major, minor, patch) {
                            (Some(major), Some(minor), Some(patch)) => Some((major, minor, patch)),
                            _ => None,
                        }
                    } else {
                        None
                    };
                    match parsed {
                        Some(version) => self.version = version,
                        None => self.add_node_error(
                            *directive,
                            DiagnosticKind::Semantic,
                            "invalid version string".to_string(),
                        ),
                    }
                }
                "link" => self.link_libs.push(param),
                _ => self.add_node_error(
                    *directive,
                    DiagnosticKind::Semantic,
                    format!("invalid directive: '{}'", name),
                ),
            }
        }
        if self.root_export.is_none() {
            self.root_export = Some(node);
        }
    }

    fn resolve_error_value_decl(&mut self, import: ImportId, node: NodeId) {
        let decl = match self.ast.kind(node) {
            NodeKind::ErrorValueDecl(e) => e.clone(),
            _ => return,
        };

        let value = self.next_error_index;
        self.next_error_index += 1;
        let error_id = ErrorId(self.error_values.len() as u32);
        self.error_values.push(ErrorEntry {
            name: decl.name.clone(),
            value,
            decl_node: node,
        });

        let import_scope = self.imports[import.0 as usize].scope;
        if self.scopes.scope(import_scope).errors.contains_key(&decl.name) {
            self.add_node_error(
                node,
                DiagnosticKind::Resolution,
                format!("redefinition of error '{}'", decl.name),
            );
        } else {
            self.scopes
                .scope_mut(import_scope)
                .errors
                .insert(decl.name.clone(), error_id);
        }

        if decl.visib != VisibMod::Private {
            let importers = self.imports[import.0 as usize].importers.clone();
            for (importer, import_node) in importers {
                let importer_scope = self.imports[importer.0 as usize].scope;
                if self
                    .scopes
                    .scope(importer_scope)
                    .errors
                    .contains_key(&decl.name)
                {
                    self.add_node_error(
                        import_node,
                        DiagnosticKind::Resolution,
                        format!(
                            "import of error '{}' overrides existing definition",
                            decl.name
                        ),
                    );
                } else {
                    self.scopes
                        .scope_mut(importer_scope)
                        .errors
                        .insert(decl.name.clone(), error_id);
                }
            }
        }
    }

    fn resolve_c_import_decl(&mut self, import: ImportId, node: NodeId) {
        let block = match self.ast.kind(node) {
            NodeKind::CImport(c) => c.block,
            _ => return,
        };

        let buf_index = self.c_import_bufs.len();
        self.c_import_bufs.push(String::new());

        let import_scope = self.imports[import.0 as usize].scope;
        let child_scope = self.scopes.new_scope(node, Some(import_scope), None);
        self.scopes.scope_mut(child_scope).c_import_buf = Some(buf_index);

        let void = self.interner.void;
        let resolved = self.analyze_expression(import, child_scope, Some(void), block);
        if self.is_invalid(resolved) {
            return;
        }

        let child_import = ImportId(self.imports.len() as u32);
        let directives = self.c_import_bufs[buf_index].clone();
        let result = self.header.parse_header(
            &directives,
            &mut *self.ast,
            child_import,
            &mut *self.reporter,
        );
        match result {
            Ok(decl_nodes) => {
                let span = self.ast.span(node);
                let root = self.ast.push(
                    NodeKind::Root(RootNode { decls: decl_nodes }),
                    span,
                    child_import,
                );
                self.grow_side_tables();
                let scope = self.scopes.new_scope(root, None, None);
                let file_id = self.imports[import.0 as usize].file_id;
                self.imports.push(Import {
                    root,
                    file_id,
                    path: format!("(c import at node {})", node.0),
                    scope,
                    fn_table: HashMap::new(),
                    importers: vec![(import, node)],
                    is_c_import: true,
                });
                self.detect_top_level_decl_deps(child_import, root);
            }
            Err(err) => {
                let span = self.ast.span(node);
                let file_id = self.imports[import.0 as usize].file_id;
                self.reporter.add_diagnostic(
                    Diagnostic::error(
                        DiagnosticKind::Semantic,
                        span,
                        file_id,
                        "C import failed".to_string(),
                    )
                    .with_note(err.to_string()),
                );
            }
        }
    }

    // ---- function prototypes ----

    fn preview_fn_proto(&mut self, import: ImportId, proto_node: NodeId) {
        let proto = match self.ast.kind(proto_node) {
            NodeKind::FnProto(p) => p.clone(),
            _ => return,
        };
        self.grow_side_tables();
        let member_of = self.meta[proto_node.0 as usize].member_of;
        let fn_def_node = self.meta[proto_node.0 as usize].fn_def;

        let already_defined = match member_of {
            Some(container) => match &self.interner.entry(container).kind {
                TypeKind::Struct(info) => info.methods.contains_key(&proto.name),
                TypeKind::Enum(info) => info.methods.contains_key(&proto.name),
                _ => false,
            },
            None => self.imports[import.0 as usize]
                .fn_table
                .contains_key(&proto.name),
        };
        if already_defined {
            self.add_node_error(
                proto_node,
                DiagnosticKind::Resolution,
                format!("redefinition of '{}'", proto.name),
            );
            self.meta[proto_node.0 as usize].skip = true;
            return;
        }

        if !proto.is_extern && proto.is_var_args {
            self.add_node_error(
                proto_node,
                DiagnosticKind::Semantic,
                "variadic arguments only allowed in extern functions".to_string(),
            );
        }

        let internal_linkage = proto.visib != VisibMod::Export && !proto.is_extern;
        let symbol_name = match member_of {
            Some(container) => {
                format!("{}_{}", self.interner.name(container), proto.name)
            }
            None => proto.name.clone(),
        };

        let fn_id = FnId(self.fns.len() as u32);
        self.fns.push(FnEntry {
            proto_node,
            fn_def_node,
            import,
            type_id: self.interner.invalid,
            symbol_name,
            member_of,
            is_extern: proto.is_extern,
            is_inline: false,
            internal_linkage,
            labels: HashMap::new(),
            label_list: Vec::new(),
            all_scopes: Vec::new(),
        });
        if fn_def_node.is_some() {
            self.fn_defs.push(fn_id);
        }
        self.meta[proto_node.0 as usize].fn_entry = Some(fn_id);

        match member_of {
            Some(container) => match &mut self.interner.entry_mut(container).kind {
                TypeKind::Struct(info) => {
                    info.methods.insert(proto.name.clone(), fn_id);
                }
                TypeKind::Enum(info) => {
                    info.methods.insert(proto.name.clone(), fn_id);
                }
                _ => {}
            },
            None => {
                self.imports[import.0 as usize]
                    .fn_table
                    .insert(proto.name.clone(), fn_id);
            }
        }

        self.resolve_function_proto(import, proto_node, fn_id, &proto);

        if let Some(def) = fn_def_node {
            if let NodeKind::FnDef(fn_def) = self.ast.kind(def) {
                let body = fn_def.body;
                self.preview_function_labels(fn_id, body);
            }
        }

        // pub functions are visible to every importer
        if proto.visib != VisibMod::Private && member_of.is_none() {
            let importers = self.imports[import.0 as usize].importers.clone();
            for (importer, import_node) in importers {
                if self.imports[importer.0 as usize]
                    .fn_table
                    .contains_key(&proto.name)
                {
                    self.add_node_error(
                        import_node,
                        DiagnosticKind::Resolution,
                        format!(
                            "import of function '{}' overrides existing definition",
                            proto.name
                        ),
                    );
                } else {
                    self.imports[importer.0 as usize]
                        .fn_table
                        .insert(proto.name.clone(), fn_id);
                }
            }
        }
    }

    fn resolve_function_proto(
        &mut self,
        import: ImportId,
        proto_node: NodeId,
        fn_id: FnId,
        proto: &FnProtoNode,
    ) {
        let mut is_naked = false;
        let mut is_inline = false;
        let has_def = self.fns[fn_id.0 as usize].fn_def_node.is_some();
        for directive in &proto.directives {
            let (name, param) = match self.ast.kind(*directive) {
                NodeKind::Directive(d) => (d.name.clone(), d.param.clone()),
                _ => continue,
            };
            if name == "attribute" {
                if has_def && param == "naked" {
                    is_naked = true;
                } else if has_def && param == "inline" {
                    is_inline = true;
                } else {
                    self.add_node_error(
                        *directive,
                        DiagnosticKind::Semantic,
                        format!("invalid function attribute: '{}'", param),
                    );
                }
            } else {
                self.add_node_error(
                    *directive,
                    DiagnosticKind::Semantic,
                    format!("invalid directive: '{}'", name),
                );
            }
        }
        self.fns[fn_id.0 as usize].is_inline = is_inline;

        let import_scope = self.imports[import.0 as usize].scope;
        let mut skip = false;
        let mut param_types = Vec::with_capacity(proto.params.len());
        for &param in &proto.params {
            let type_node = match self.ast.kind(param) {
                NodeKind::ParamDecl(p) => p.type_expr,
                _ => continue,
            };
            let param_type = self.analyze_type_expr(import, import_scope, type_node);
            if self.is_unreachable(param_type) {
                self.add_node_error(
                    type_node,
                    DiagnosticKind::Type,
                    "parameter of type 'unreachable' not allowed".to_string(),
                );
                skip = true;
            } else if self.is_invalid(param_type) {
                skip = true;
            }
            param_types.push(param_type);
        }

        let return_type = match proto.return_type {
            Some(return_node) => {
                let t = self.analyze_type_expr(import, import_scope, return_node);
                if self.is_invalid(t) {
                    skip = true;
                }
                t
            }
            None => self.interner.void,
        };

        let internal_linkage = self.fns[fn_id.0 as usize].internal_linkage;
        let sig = FnSig {
            params: param_types,
            return_type,
            is_var_args: proto.is_var_args,
            is_naked,
            is_inline,
            convention: if internal_linkage {
                CallConv::Fast
            } else {
                CallConv::C
            },
        };
        let fn_type = self.interner.fn_type(sig);
        self.fns[fn_id.0 as usize].type_id = fn_type;
        self.meta[proto_node.0 as usize].skip = skip;
        self.resolve_const_fn(proto_node, fn_id);
    }

    fn preview_function_labels(&mut self, fn_id: FnId, body: NodeId) {
        let statements = match self.ast.kind(body) {
            NodeKind::Block(block) => block.statements.clone(),
            _ => return,
        };
        for stmt in statements {
            match self.ast.kind(stmt).clone() {
                NodeKind::Label(label) => {
                    let index = self.fns[fn_id.0 as usize].label_list.len();
                    self.fns[fn_id.0 as usize].label_list.push(FnLabel {
                        name: label.name.clone(),
                        node: stmt,
                        used: false,
                        entered_from_fallthrough: false,
                    });
                    self.fns[fn_id.0 as usize].labels.insert(label.name, index);
                }
                NodeKind::Block(_) => self.preview_function_labels(fn_id, stmt),
                _ => {}
            }
        }
    }

    // ---- top level bodies ----

    fn analyze_top_level_decl(&mut self, import: ImportId, node: NodeId) {
        match self.ast.kind(node).clone() {
            NodeKind::FnDef(_) => self.analyze_top_level_fn_def(import, node),
            NodeKind::ContainerDecl(decl) => {
                for fn_def in decl.fns {
                    self.analyze_top_level_fn_def(import, fn_def);
                }
            }
            _ => {}
        }
    }

    fn analyze_top_level_fn_def(&mut self, import: ImportId, fn_def_node: NodeId) {
        let (proto_node, body) = match self.ast.kind(fn_def_node) {
            NodeKind::FnDef(def) => (def.proto, def.body),
            _ => return,
        };
        self.grow_side_tables();
        if self.meta[proto_node.0 as usize].skip {
            // an earlier error prevents analyzing the body
            return;
        }
        let Some(fn_id) = self.meta[proto_node.0 as usize].fn_entry else {
            return;
        };

        let proto = match self.ast.kind(proto_node) {
            NodeKind::FnProto(p) => p.clone(),
            _ => return,
        };

        let import_scope = self.imports[import.0 as usize].scope;
        let fn_scope = self.scopes.new_scope(fn_def_node, Some(import_scope), Some(fn_id));
        self.register_fn_scope(fn_scope);
        self.meta[fn_def_node.0 as usize].block_scope = Some(fn_scope);

        let sig = self
            .interner
            .entry(self.fns[fn_id.0 as usize].type_id)
            .fn_sig()
            .cloned();
        let Some(sig) = sig else { return };

        let is_exported = proto.visib == VisibMod::Export;
        for (index, &param_node) in proto.params.iter().enumerate() {
            let param = match self.ast.kind(param_node) {
                NodeKind::ParamDecl(p) => p.clone(),
                _ => continue,
            };
            let param_type = sig.params.get(index).copied().unwrap_or(self.interner.invalid);

            if param.is_noalias
                && !matches!(self.interner.entry(param_type).kind, TypeKind::Pointer { .. })
            {
                self.add_node_error(
                    param_node,
                    DiagnosticKind::Type,
                    "noalias on non-pointer parameter".to_string(),
                );
            }
            if is_exported && matches!(self.interner.entry(param_type).kind, TypeKind::Struct(_)) {
                self.add_node_error(
                    param_node,
                    DiagnosticKind::Semantic,
                    "byvalue struct parameters not yet supported on exported functions"
                        .to_string(),
                );
            }

            let var = self.add_local_var(param_node, fn_scope, Some(&param.name), param_type, true);
            self.scopes.var_mut(var).arg_index = Some(index);
            self.meta[param_node.0 as usize].var = Some(var);
        }

        let block_return = self.analyze_expression(import, fn_scope, Some(sig.return_type), body);
        self.meta[fn_def_node.0 as usize].implicit_return_type = Some(block_return);

        let labels = self.fns[fn_id.0 as usize].label_list.clone();
        for label in labels {
            if !label.used {
                self.add_node_error(
                    label.node,
                    DiagnosticKind::Semantic,
                    format!("label '{}' defined but not used", label.name),
                );
            }
        }
    }

    // ---- variables ----

    /// declares a local or global variable, reporting redeclarations and
    /// type shadowing; on error the variable is registered with an invalid
    /// type so downstream lookups stay quiet
    pub(crate) fn add_local_var(
        &mut self,
        source_node: NodeId,
        scope: ScopeId,
        name: Option<&str>,
        type_id: TypeId,
        is_const: bool,
    ) -> VarId {
        let (var, error) =
            self.scopes
                .declare_var(&self.interner, scope, name, type_id, is_const, source_node);
        match error {
            Some(DeclareVarError::Redeclaration) => {
                let name = name.unwrap_or("");
                self.add_node_error(
                    source_node,
                    DiagnosticKind::Resolution,
                    format!("redeclaration of variable '{}'", name),
                );
            }
            Some(DeclareVarError::ShadowsType(shadowed)) => {
                let type_name = self.interner.name(shadowed).to_string();
                self.add_node_error(
                    source_node,
                    DiagnosticKind::Resolution,
                    format!("variable shadows type '{}'", type_name),
                );
            }
            None => {}
        }
        var
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn analyze_variable_declaration_raw(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        source_node: NodeId,
        name: &str,
        is_const: bool,
        visib: VisibMod,
        type_expr: Option<NodeId>,
        init: Option<NodeId>,
        expr_is_maybe: bool,
    ) -> VarId {
        let is_export = visib == VisibMod::Export;

        let mut explicit_type = None;
        if let Some(type_node) = type_expr {
            let mut t = self.analyze_type_expr(import, scope, type_node);
            if self.is_unreachable(t) {
                self.add_node_error(
                    type_node,
                    DiagnosticKind::Type,
                    "variable of type 'unreachable' not allowed".to_string(),
                );
                t = self.interner.invalid;
            }
            explicit_type = Some(t);
        }

        let mut implicit_type = None;
        if let Some(init_node) = init {
            let mut t = self.analyze_expression(import, scope, explicit_type, init_node);
            if self.is_invalid(t) {
                // poison; no further diagnostics
            } else if expr_is_maybe {
                if let TypeKind::Maybe { child } = self.interner.entry(t).kind {
                    t = child;
                } else {
                    self.add_node_error(
                        init_node,
                        DiagnosticKind::Type,
                        "expected maybe type".to_string(),
                    );
                    t = self.interner.invalid;
                }
            } else if self.is_unreachable(t) {
                self.add_node_error(
                    source_node,
                    DiagnosticKind::Semantic,
                    "variable initialization is unreachable".to_string(),
                );
                t = self.interner.invalid;
            } else if (!is_const || is_export) && self.interner.entry(t).is_num_lit() {
                self.add_node_error(
                    source_node,
                    DiagnosticKind::Type,
                    "unable to infer variable type".to_string(),
                );
                t = self.interner.invalid;
            } else if matches!(self.interner.entry(t).kind, TypeKind::MetaType) && !is_const {
                self.add_node_error(
                    source_node,
                    DiagnosticKind::Type,
                    "variable of type 'type' must be constant".to_string(),
                );
                t = self.interner.invalid;
            }

            let at_module_scope = self.scopes.scope(scope).fn_entry.is_none();
            if !self.is_invalid(t) && at_module_scope && self.const_val(init_node).is_none() {
                let first = self.ast.first_executing_node(init_node);
                self.add_node_error(
                    first,
                    DiagnosticKind::Semantic,
                    "global variable initializer requires constant expression".to_string(),
                );
            }
            implicit_type = Some(t);
        } else if explicit_type.is_none() || !self.is_invalid(explicit_type.unwrap()) {
            self.add_node_error(
                source_node,
                DiagnosticKind::Semantic,
                "variables must be initialized".to_string(),
            );
            implicit_type = Some(self.interner.invalid);
        }

        let type_id = explicit_type
            .or(implicit_type)
            .unwrap_or(self.interner.invalid);
        let var = self.add_local_var(source_node, scope, Some(name), type_id, is_const);
        self.grow_side_tables();
        self.meta[source_node.0 as usize].var = Some(var);

        // pub globals are visible to every importer
        let at_module_scope = self.scopes.scope(scope).fn_entry.is_none();
        if at_module_scope && visib != VisibMod::Private {
            let import_entry = &self.imports[import.0 as usize];
            let importers = import_entry.importers.clone();
            for (importer, import_node) in importers {
                let importer_scope = self.imports[importer.0 as usize].scope;
                if self.scopes.scope(importer_scope).vars.contains_key(name) {
                    self.add_node_error(
                        import_node,
                        DiagnosticKind::Resolution,
                        format!("import of variable '{}' overrides existing definition", name),
                    );
                } else {
                    let scope_mut = self.scopes.scope_mut(importer_scope);
                    scope_mut.vars.insert(name.to_string(), var);
                    scope_mut.var_list.push(var);
                }
            }
        }

        var
    }

    // ---- expressions ----

    /// assigns a type (and, when possible, a value) to the node, then checks
    /// it against the expectation, possibly rewriting the node into an
    /// implicit cast. the returned type is the post-conversion type.
    pub(crate) fn analyze_expression(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        expected: Option<TypeId>,
        node: NodeId,
    ) -> TypeId {
        self.grow_side_tables();
        let kind = self.ast.kind(node).clone();
        let return_type = match kind {
            NodeKind::Block(block) => {
                self.analyze_block_expr(import, scope, expected, node, &block.statements)
            }
            NodeKind::Return(_) => self.analyze_return_expr(import, scope, expected, node),
            NodeKind::VarDecl(decl) => {
                self.analyze_variable_declaration_raw(
                    import,
                    scope,
                    node,
                    &decl.name,
                    decl.is_const,
                    decl.visib,
                    decl.type_expr,
                    decl.init,
                    false,
                );
                self.interner.void
            }
            NodeKind::BinOp(bin) => self.analyze_bin_op_expr(import, scope, expected, node, &bin),
            NodeKind::UnwrapErr(unwrap) => {
                self.analyze_unwrap_error_expr(import, scope, node, &unwrap)
            }
            NodeKind::PrefixOp(prefix) => {
                self.analyze_prefix_op_expr(import, scope, expected, node, &prefix)
            }
            NodeKind::FnCall(_) => self.analyze_fn_call_expr(import, scope, expected, node),
            NodeKind::ArrayAccess(access) => {
                self.analyze_array_access_expr(import, scope, node, &access)
            }
            NodeKind::Slice(slice) => self.analyze_slice_expr(import, scope, node, &slice),
            NodeKind::FieldAccess(access) => {
                self.analyze_field_access_expr(import, scope, node, &access)
            }
            NodeKind::ContainerInit(init) => {
                self.analyze_container_init_expr(import, scope, node, &init)
            }
            NodeKind::NumberLit(lit) => self.analyze_number_literal_expr(node, expected, &lit),
            NodeKind::StringLit(lit) => {
                if lit.is_c {
                    self.resolve_const_c_string_lit(node, &lit.value)
                } else {
                    self.resolve_const_string_lit(node, &lit.value)
                }
            }
            NodeKind::CharLit(value) => self.resolve_const_unsigned_num_lit(node, value as u64),
            NodeKind::BoolLit(value) => self.resolve_const_bool(node, value),
            NodeKind::NullLit => self.analyze_null_literal_expr(scope, expected, node),
            NodeKind::UndefinedLit => {
                self.set_const(node, ConstVal::Undef);
                expected.unwrap_or(self.interner.undef_lit)
            }
            NodeKind::Symbol(sym) => self.analyze_symbol_expr(import, scope, node, &sym.name),
            NodeKind::IfBool(if_expr) => {
                self.analyze_if_bool_expr(import, scope, expected, node, &if_expr)
            }
            NodeKind::IfVar(if_var) => {
                self.analyze_if_var_expr(import, scope, expected, node, &if_var)
            }
            NodeKind::While(while_expr) => {
                self.analyze_while_expr(import, scope, node, &while_expr)
            }
            NodeKind::For(for_expr) => self.analyze_for_expr(import, scope, node, &for_expr),
            NodeKind::Switch(switch) => {
                self.analyze_switch_expr(import, scope, expected, node, &switch)
            }
            NodeKind::ArrayType(array_type) => {
                self.analyze_array_type(import, scope, node, &array_type)
            }
            NodeKind::ErrorType => {
                let pure_error = self.interner.pure_error;
                self.resolve_const_type(node, pure_error)
            }
            NodeKind::Goto(goto) => self.analyze_goto_expr(scope, node, &goto.name),
            NodeKind::Break => self.analyze_break_expr(scope, node),
            NodeKind::Continue => self.analyze_continue_expr(scope, node),
            NodeKind::Label(_) => {
                // labels are handled by the enclosing block
                self.interner.void
            }
            NodeKind::ImplicitCast(_) => {
                // created fully resolved by the conversion engine
                return self.expr_type(node);
            }
            _ => {
                self.ice(node, "unexpected node in expression position");
                self.interner.invalid
            }
        };

        self.meta[node.0 as usize].scope = Some(scope);
        self.resolved[node.0 as usize].type_id = Some(return_type);
        let resolved_type = self.resolve_type_compatibility(scope, node, expected, return_type);
        self.register_global_const(node);
        resolved_type
    }

    fn analyze_block_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        expected: Option<TypeId>,
        node: NodeId,
        statements: &[NodeId],
    ) -> TypeId {
        let child = self.scopes.new_scope(node, Some(scope), None);
        self.register_fn_scope(child);
        self.meta[node.0 as usize].block_scope = Some(child);

        let mut return_type = self.interner.void;
        let count = statements.len();
        for (i, &stmt) in statements.iter().enumerate() {
            if let NodeKind::Label(label) = self.ast.kind(stmt).clone() {
                let fell_through = !self.is_unreachable(return_type);
                if let Some(fn_id) = self.scopes.scope(child).fn_entry {
                    if let Some(&index) = self.fns[fn_id.0 as usize].labels.get(&label.name) {
                        self.fns[fn_id.0 as usize].label_list[index].entered_from_fallthrough =
                            fell_through;
                    }
                }
                self.meta[stmt.0 as usize].scope = Some(child);
                self.resolved[stmt.0 as usize].type_id = Some(self.interner.void);
                return_type = self.interner.void;
                continue;
            }
            if self.is_unreachable(return_type) {
                if self.ast.is_void_expr(stmt) {
                    // {unreachable; void; void} is allowed
                    let void = self.interner.void;
                    self.analyze_expression(import, child, Some(void), stmt);
                    continue;
                }
                let first = self.ast.first_executing_node(stmt);
                self.add_node_error(
                    first,
                    DiagnosticKind::Semantic,
                    "unreachable code".to_string(),
                );
                break;
            }
            let is_last = i == count - 1;
            let passed = if is_last { expected } else { None };
            return_type = self.analyze_expression(import, child, passed, stmt);
            if !is_last {
                if matches!(self.interner.entry(return_type).kind, TypeKind::MetaType) {
                    self.add_node_error(
                        stmt,
                        DiagnosticKind::Semantic,
                        "expected expression, found type".to_string(),
                    );
                } else if matches!(self.interner.entry(return_type).kind, TypeKind::ErrorUnion { .. })
                {
                    self.add_node_error(
                        stmt,
                        DiagnosticKind::Semantic,
                        "statement ignores error value".to_string(),
                    );
                }
            }
        }
        return_type
    }

    fn analyze_return_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        expected: Option<TypeId>,
        node: NodeId,
    ) -> TypeId {
        let Some(fn_id) = self.scopes.scope(scope).fn_entry else {
            self.add_node_error(
                node,
                DiagnosticKind::Semantic,
                "return expression outside function definition".to_string(),
            );
            return self.interner.invalid;
        };

        let (kind, expr) = match self.ast.kind(node) {
            NodeKind::Return(ret) => (ret.kind, ret.expr),
            _ => return self.interner.invalid,
        };
        let expr = match expr {
            Some(expr) => expr,
            None => {
                let void_node = self.synthesize_void_node(node);
                if let NodeKind::Return(ret) = self.ast.kind_mut(node) {
                    ret.expr = Some(void_node);
                }
                void_node
            }
        };

        match kind {
            ReturnKind::Unconditional => {
                let expected_return = self.fn_return_type(fn_id);
                self.analyze_expression(import, scope, Some(expected_return), expr);
                self.interner.unreachable
            }
            ReturnKind::Error => {
                // an error-union expectation is already in the right shape;
                // anything else expects the payload, so the operand must be
                // the matching union
                let expected_err = expected.map(|t| {
                    if matches!(self.interner.entry(t).kind, TypeKind::ErrorUnion { .. }) {
                        t
                    } else {
                        self.interner.error_union_of(t)
                    }
                });
                let resolved = self.analyze_expression(import, scope, expected_err, expr);
                if self.is_invalid(resolved) {
                    return resolved;
                }
                match self.interner.entry(resolved).kind {
                    TypeKind::ErrorUnion { ok } => ok,
                    _ => {
                        let name = self.interner.name(resolved).to_string();
                        self.add_node_error(
                            expr,
                            DiagnosticKind::Type,
                            format!("expected error type, got '{}'", name),
                        );
                        self.interner.invalid
                    }
                }
            }
        }
    }

    fn analyze_symbol_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        name: &str,
    ) -> TypeId {
        if let Some(primitive) = self.interner.get_primitive(name) {
            return self.resolve_const_type(node, primitive);
        }

        if let Some(var_id) = self.scopes.lookup_var(scope, name) {
            self.meta[node.0 as usize].var = Some(var_id);
            let var_type = self.scopes.var(var_id).type_id;
            let is_const = self.scopes.var(var_id).is_const;
            if is_const {
                let decl_node = self.scopes.var(var_id).decl_node;
                let init = match self.ast.kind(decl_node) {
                    NodeKind::VarDecl(decl) => decl.init,
                    _ => None,
                };
                if let Some(init) = init {
                    if self.const_val(init).is_some() {
                        return self.resolve_const_copy(node, init);
                    }
                }
            }
            return var_type;
        }

        if let Some(container) = self.scopes.lookup_type(scope, name) {
            return self.resolve_const_type(node, container);
        }

        if let Some(&fn_id) = self.imports[import.0 as usize].fn_table.get(name) {
            self.meta[node.0 as usize].fn_entry = Some(fn_id);
            return self.resolve_const_fn(node, fn_id);
        }

        self.add_node_error(
            node,
            DiagnosticKind::Resolution,
            format!("use of undeclared identifier '{}'", name),
        );
        self.interner.invalid
    }

    fn analyze_null_literal_expr(
        &mut self,
        scope: ScopeId,
        expected: Option<TypeId>,
        node: NodeId,
    ) -> TypeId {
        match expected {
            Some(expected) if matches!(self.interner.entry(expected).kind, TypeKind::Maybe { .. }) =>
            {
                self.scopes.scope_mut(scope).struct_val_exprs.push(node);
                self.resolve_const_null(node, expected)
            }
            _ => {
                self.add_node_error(
                    node,
                    DiagnosticKind::Type,
                    "unable to determine null type".to_string(),
                );
                self.interner.invalid
            }
        }
    }

    fn analyze_number_literal_expr(
        &mut self,
        node: NodeId,
        expected: Option<TypeId>,
        lit: &NumberLitExpr,
    ) -> TypeId {
        if lit.overflow {
            self.add_node_error(
                node,
                DiagnosticKind::Semantic,
                "number literal too large to be represented in any type".to_string(),
            );
            return self.interner.invalid;
        }
        match lit.value {
            NumLitValue::Int(value) => self.resolve_const_unsigned_num_lit(node, value),
            NumLitValue::Float(value) => self.resolve_const_float_num_lit(node, expected, value),
        }
    }

    fn analyze_bin_op_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        expected: Option<TypeId>,
        node: NodeId,
        bin: &BinOpExpr,
    ) -> TypeId {
        if bin.op.is_assign() {
            return self.analyze_assignment(import, scope, node, bin);
        }
        match bin.op {
            BinOp::BoolOr | BinOp::BoolAnd => self.analyze_logic_bin_op(import, scope, node, bin),
            BinOp::CmpEq
            | BinOp::CmpNotEq
            | BinOp::CmpLessThan
            | BinOp::CmpGreaterThan
            | BinOp::CmpLessOrEq
            | BinOp::CmpGreaterOrEq => self.analyze_cmp_bin_op(import, scope, node, bin),
            BinOp::UnwrapMaybe => {
                let lhs_type = self.analyze_expression(import, scope, None, bin.op1);
                if self.is_invalid(lhs_type) {
                    return lhs_type;
                }
                match self.interner.entry(lhs_type).kind {
                    TypeKind::Maybe { child } => {
                        self.analyze_expression(import, scope, Some(child), bin.op2);
                        child
                    }
                    _ => {
                        let name = self.interner.name(lhs_type).to_string();
                        self.add_node_error(
                            bin.op1,
                            DiagnosticKind::Type,
                            format!("expected maybe type, got '{}'", name),
                        );
                        self.interner.invalid
                    }
                }
            }
            BinOp::StrCat => self.analyze_str_cat_expr(import, scope, node, bin),
            _ => self.analyze_arith_bin_op(import, scope, expected, node, bin),
        }
    }

    fn analyze_assignment(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        bin: &BinOpExpr,
    ) -> TypeId {
        let lhs_type = self.analyze_lvalue(import, scope, bin.op1, LValPurpose::Assign);
        if !self.is_invalid(lhs_type) && !self.is_op_allowed(lhs_type, bin.op) {
            let name = self.interner.name(lhs_type).to_string();
            self.add_node_error(
                bin.op1,
                DiagnosticKind::Type,
                format!("operator not allowed for type '{}'", name),
            );
        }
        self.analyze_expression(import, scope, Some(lhs_type), bin.op2);
        self.interner.void
    }

    fn is_op_allowed(&self, type_id: TypeId, op: BinOp) -> bool {
        let kind = &self.interner.entry(type_id).kind;
        match op {
            BinOp::Assign => true,
            BinOp::AssignTimes | BinOp::AssignDiv | BinOp::AssignMod => {
                matches!(kind, TypeKind::Int { .. } | TypeKind::Float)
            }
            BinOp::AssignPlus | BinOp::AssignMinus => matches!(
                kind,
                TypeKind::Int { .. } | TypeKind::Float | TypeKind::Pointer { .. }
            ),
            BinOp::AssignBitShiftLeft
            | BinOp::AssignBitShiftRight
            | BinOp::AssignBitAnd
            | BinOp::AssignBitXor
            | BinOp::AssignBitOr => matches!(kind, TypeKind::Int { .. }),
            BinOp::AssignBoolAnd | BinOp::AssignBoolOr => matches!(kind, TypeKind::Bool),
            _ => false,
        }
    }

    fn analyze_logic_bin_op(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        bin: &BinOpExpr,
    ) -> TypeId {
        let bool_ = self.interner.bool_;
        let lhs_type = self.analyze_expression(import, scope, Some(bool_), bin.op1);
        let rhs_type = self.analyze_expression(import, scope, Some(bool_), bin.op2);
        if self.is_invalid(lhs_type) || self.is_invalid(rhs_type) {
            return self.interner.invalid;
        }
        let lhs_val = self.const_val(bin.op1).and_then(|v| v.as_bool());
        let rhs_val = self.const_val(bin.op2).and_then(|v| v.as_bool());
        if let (Some(lhs), Some(rhs)) = (lhs_val, rhs_val) {
            let answer = if bin.op == BinOp::BoolOr {
                lhs || rhs
            } else {
                lhs && rhs
            };
            return self.resolve_const_bool(node, answer);
        }
        bool_
    }

    fn analyze_cmp_bin_op(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        bin: &BinOpExpr,
    ) -> TypeId {
        let lhs_type = self.analyze_expression(import, scope, None, bin.op1);
        let rhs_type = self.analyze_expression(import, scope, None, bin.op2);

        let children = [(Some(bin.op1), lhs_type), (Some(bin.op2), rhs_type)];
        let resolved_type = self.resolve_peer_type_compatibility(scope, node, &children);
        if self.is_invalid(resolved_type) {
            return self.interner.invalid;
        }

        let lhs_val = self.const_val(bin.op1).cloned();
        let rhs_val = self.const_val(bin.op2).cloned();
        let (Some(lhs_val), Some(rhs_val)) = (lhs_val, rhs_val) else {
            return self.interner.bool_;
        };

        let resolved_kind = self.interner.entry(resolved_type).kind.clone();
        match resolved_kind {
            TypeKind::NumLitInt | TypeKind::NumLitFloat | TypeKind::Int { .. } | TypeKind::Float => {
                let (Some(lhs), Some(rhs)) = (lhs_val.as_num(), rhs_val.as_num()) else {
                    return self.interner.bool_;
                };
                let ordering = BigNum::compare(lhs, rhs);
                let answer = match bin.op {
                    BinOp::CmpEq => ordering == Ordering::Equal,
                    BinOp::CmpNotEq => ordering != Ordering::Equal,
                    BinOp::CmpLessThan => ordering == Ordering::Less,
                    BinOp::CmpGreaterThan => ordering == Ordering::Greater,
                    BinOp::CmpLessOrEq => ordering != Ordering::Greater,
                    BinOp::CmpGreaterOrEq => ordering != Ordering::Less,
                    _ => return self.interner.bool_,
                };
                self.resolve_const_bool(node, answer)
            }
            TypeKind::Enum(info) => {
                if !matches!(bin.op, BinOp::CmpEq | BinOp::CmpNotEq) {
                    let name = self.interner.name(resolved_type).to_string();
                    self.add_node_error(
                        node,
                        DiagnosticKind::Type,
                        format!("operator not allowed for type '{}'", name),
                    );
                    return self.interner.bool_;
                }
                let (ConstVal::EnumTag { tag: lhs_tag, .. }, ConstVal::EnumTag { tag: rhs_tag, .. }) =
                    (&lhs_val, &rhs_val)
                else {
                    return self.interner.bool_;
                };
                let mut are_equal = false;
                if lhs_tag == rhs_tag {
                    let payload_size = info
                        .fields
                        .get(*lhs_tag as usize)
                        .map(|field| self.interner.size_in_bits(field.type_id))
                        .unwrap_or(0);
                    if payload_size > 0 {
                        // TODO compare payload values once enum payload
                        // equality is defined
                        self.add_node_error(
                            node,
                            DiagnosticKind::Type,
                            "equality comparison of enum payloads is not supported".to_string(),
                        );
                        return self.interner.bool_;
                    }
                    are_equal = true;
                }
                let answer = if bin.op == BinOp::CmpEq {
                    are_equal
                } else {
                    !are_equal
                };
                self.resolve_const_bool(node, answer)
            }
            TypeKind::Bool => {
                let (Some(lhs), Some(rhs)) = (lhs_val.as_bool(), rhs_val.as_bool()) else {
                    return self.interner.bool_;
                };
                let answer = match bin.op {
                    BinOp::CmpEq => lhs == rhs,
                    BinOp::CmpNotEq => lhs != rhs,
                    _ => return self.interner.bool_,
                };
                self.resolve_const_bool(node, answer)
            }
            _ => self.interner.bool_,
        }
    }

    fn analyze_arith_bin_op(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        expected: Option<TypeId>,
        node: NodeId,
        bin: &BinOpExpr,
    ) -> TypeId {
        let lhs_type = self.analyze_expression(import, scope, expected, bin.op1);
        let rhs_type = self.analyze_expression(import, scope, expected, bin.op2);

        let children = [(Some(bin.op1), lhs_type), (Some(bin.op2), rhs_type)];
        let resolved_type = self.resolve_peer_type_compatibility(scope, node, &children);
        if self.is_invalid(resolved_type) {
            return resolved_type;
        }

        let numeric_ok = match bin.op {
            BinOp::BinOr
            | BinOp::BinXor
            | BinOp::BinAnd
            | BinOp::BitShiftLeft
            | BinOp::BitShiftRight => matches!(
                self.interner.entry(resolved_type).kind,
                TypeKind::Int { .. } | TypeKind::NumLitInt
            ),
            _ => matches!(
                self.interner.entry(resolved_type).kind,
                TypeKind::Int { .. } | TypeKind::Float | TypeKind::NumLitInt | TypeKind::NumLitFloat
            ),
        };
        if !numeric_ok {
            let name = self.interner.name(resolved_type).to_string();
            self.add_node_error(
                node,
                DiagnosticKind::Type,
                format!("operator not allowed for type '{}'", name),
            );
            return self.interner.invalid;
        }

        if self.const_val(bin.op1).is_none() || self.const_val(bin.op2).is_none() {
            return resolved_type;
        }
        self.eval_const_bignum_op(node, bin.op, bin.op1, bin.op2, resolved_type)
    }

    fn analyze_str_cat_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        bin: &BinOpExpr,
    ) -> TypeId {
        let str_type = self.interner.slice_of(self.interner.u8_, true);
        let lhs_type = self.analyze_expression(import, scope, Some(str_type), bin.op1);
        let rhs_type = self.analyze_expression(import, scope, Some(str_type), bin.op2);
        if self.is_invalid(lhs_type) || self.is_invalid(rhs_type) {
            return self.interner.invalid;
        }

        let bad_node = if self.const_val(bin.op1).is_none() {
            Some(bin.op1)
        } else if self.const_val(bin.op2).is_none() {
            Some(bin.op2)
        } else {
            None
        };
        if let Some(bad) = bad_node {
            let first = self.ast.first_executing_node(bad);
            self.add_node_error(
                first,
                DiagnosticKind::Semantic,
                "string concatenation requires constant expression".to_string(),
            );
            return self.interner.invalid;
        }

        self.eval_const_str_cat(node, bin.op1, bin.op2);
        str_type
    }

    fn analyze_unwrap_error_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        unwrap: &UnwrapErrExpr,
    ) -> TypeId {
        let lhs_type = self.analyze_expression(import, scope, None, unwrap.op1);
        if self.is_invalid(lhs_type) {
            return lhs_type;
        }
        match self.interner.entry(lhs_type).kind {
            TypeKind::ErrorUnion { ok } => {
                let child_scope = if let Some(symbol) = unwrap.symbol {
                    let child = self.scopes.new_scope(node, Some(scope), None);
                    self.register_fn_scope(child);
                    let name = match self.ast.kind(symbol) {
                        NodeKind::Symbol(sym) => sym.name.clone(),
                        _ => String::new(),
                    };
                    let pure_error = self.interner.pure_error;
                    let var = self.add_local_var(symbol, child, Some(&name), pure_error, true);
                    self.meta[symbol.0 as usize].var = Some(var);
                    self.resolved[symbol.0 as usize].type_id = Some(pure_error);
                    self.meta[node.0 as usize].var = Some(var);
                    child
                } else {
                    scope
                };
                self.analyze_expression(import, child_scope, Some(ok), unwrap.op2);
                ok
            }
            _ => {
                let name = self.interner.name(lhs_type).to_string();
                self.add_node_error(
                    unwrap.op1,
                    DiagnosticKind::Type,
                    format!("expected error type, got '{}'", name),
                );
                self.interner.invalid
            }
        }
    }

    pub(crate) fn analyze_lvalue(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        lhs: NodeId,
        purpose: LValPurpose,
    ) -> TypeId {
        self.grow_side_tables();
        let kind = self.ast.kind(lhs).clone();
        let result = match kind {
            NodeKind::Symbol(sym) => {
                if purpose == LValPurpose::AddressOf {
                    self.analyze_symbol_expr(import, scope, lhs, &sym.name)
                } else {
                    match self.scopes.lookup_var(scope, &sym.name) {
                        Some(var_id) => {
                            self.meta[lhs.0 as usize].var = Some(var_id);
                            if self.scopes.var(var_id).is_const {
                                self.add_node_error(
                                    lhs,
                                    DiagnosticKind::Type,
                                    "cannot assign to constant".to_string(),
                                );
                                self.interner.invalid
                            } else {
                                self.scopes.var(var_id).type_id
                            }
                        }
                        None => {
                            self.add_node_error(
                                lhs,
                                DiagnosticKind::Resolution,
                                format!("use of undeclared identifier '{}'", sym.name),
                            );
                            self.interner.invalid
                        }
                    }
                }
            }
            NodeKind::ArrayAccess(access) => {
                self.analyze_array_access_expr(import, scope, lhs, &access)
            }
            NodeKind::FieldAccess(access) => {
                self.analyze_field_access_expr(import, scope, lhs, &access)
            }
            NodeKind::PrefixOp(prefix)
                if prefix.op == PrefixOp::Dereference && purpose == LValPurpose::Assign =>
            {
                let target_type = self.analyze_expression(import, scope, None, prefix.expr);
                match self.interner.entry(target_type).kind {
                    TypeKind::Invalid => self.interner.invalid,
                    TypeKind::Pointer { pointee, .. } => pointee,
                    _ => {
                        let name = self.interner.name(target_type).to_string();
                        self.add_node_error(
                            prefix.expr,
                            DiagnosticKind::Type,
                            format!("indirection requires pointer operand ('{}' invalid)", name),
                        );
                        self.interner.invalid
                    }
                }
            }
            _ => {
                if purpose == LValPurpose::Assign {
                    self.add_node_error(
                        lhs,
                        DiagnosticKind::Type,
                        "invalid assignment target".to_string(),
                    );
                    self.interner.invalid
                } else {
                    let type_id = self.analyze_expression(import, scope, None, lhs);
                    if self.is_invalid(type_id) {
                        self.interner.invalid
                    } else if matches!(self.interner.entry(type_id).kind, TypeKind::MetaType) {
                        type_id
                    } else {
                        self.add_node_error(
                            lhs,
                            DiagnosticKind::Type,
                            "invalid addressof target".to_string(),
                        );
                        self.interner.invalid
                    }
                }
            }
        };
        self.meta[lhs.0 as usize].scope = Some(scope);
        if self.resolved[lhs.0 as usize].type_id.is_none() {
            self.resolved[lhs.0 as usize].type_id = Some(result);
        }
        result
    }

    fn analyze_prefix_op_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        expected: Option<TypeId>,
        node: NodeId,
        prefix: &PrefixOpExpr,
    ) -> TypeId {
        let expr_node = prefix.expr;
        match prefix.op {
            PrefixOp::BoolNot => {
                let bool_ = self.interner.bool_;
                let type_id = self.analyze_expression(import, scope, Some(bool_), expr_node);
                if self.is_invalid(type_id) {
                    return bool_;
                }
                match self.const_val(expr_node).and_then(|v| v.as_bool()) {
                    Some(value) => self.resolve_const_bool(node, !value),
                    None => bool_,
                }
            }
            PrefixOp::BinNot => {
                let type_id = self.analyze_expression(import, scope, expected, expr_node);
                if self.is_invalid(type_id) {
                    return type_id;
                }
                if matches!(
                    self.interner.entry(type_id).kind,
                    TypeKind::Int { .. } | TypeKind::NumLitInt
                ) {
                    // TODO fold ~ once the result width is pinned down
                    type_id
                } else {
                    let name = self.interner.name(type_id).to_string();
                    self.add_node_error(
                        expr_node,
                        DiagnosticKind::Type,
                        format!("invalid binary not type: '{}'", name),
                    );
                    self.interner.invalid
                }
            }
            PrefixOp::Negation => {
                let type_id = self.analyze_expression(import, scope, expected, expr_node);
                if self.is_invalid(type_id) {
                    return type_id;
                }
                let negatable = matches!(
                    self.interner.entry(type_id).kind,
                    TypeKind::Int { is_signed: true }
                        | TypeKind::Float
                        | TypeKind::NumLitInt
                        | TypeKind::NumLitFloat
                );
                if !negatable {
                    let name = self.interner.name(type_id).to_string();
                    self.add_node_error(
                        node,
                        DiagnosticKind::Type,
                        format!("invalid negation type: '{}'", name),
                    );
                    return self.interner.invalid;
                }
                match self.const_val(expr_node).and_then(|v| v.as_num()) {
                    Some(num) => {
                        let negated = num.negated();
                        self.set_const(node, ConstVal::Num(negated));
                        type_id
                    }
                    None => type_id,
                }
            }
            PrefixOp::AddressOf | PrefixOp::ConstAddressOf => {
                let is_const = prefix.op == PrefixOp::ConstAddressOf;
                let child_type =
                    self.analyze_lvalue(import, scope, expr_node, LValPurpose::AddressOf);
                if self.is_invalid(child_type) {
                    return self.interner.invalid;
                }
                if matches!(self.interner.entry(child_type).kind, TypeKind::MetaType) {
                    let meta = self.resolve_type(expr_node);
                    if self.is_invalid(meta) {
                        return self.interner.invalid;
                    }
                    if self.is_unreachable(meta) {
                        self.add_node_error(
                            node,
                            DiagnosticKind::Type,
                            "pointer to unreachable not allowed".to_string(),
                        );
                        return self.interner.invalid;
                    }
                    let pointer = self.interner.pointer_to(meta, is_const);
                    return self.resolve_const_type(node, pointer);
                }
                if self.interner.entry(child_type).is_num_lit() {
                    let name = self.interner.name(child_type).to_string();
                    self.add_node_error(
                        expr_node,
                        DiagnosticKind::Type,
                        format!("unable to get address of type '{}'", name),
                    );
                    return self.interner.invalid;
                }
                self.interner.pointer_to(child_type, is_const)
            }
            PrefixOp::Dereference => {
                let type_id = self.analyze_expression(import, scope, None, expr_node);
                match self.interner.entry(type_id).kind {
                    TypeKind::Invalid => type_id,
                    TypeKind::Pointer { pointee, .. } => pointee,
                    _ => {
                        let name = self.interner.name(type_id).to_string();
                        self.add_node_error(
                            expr_node,
                            DiagnosticKind::Type,
                            format!("indirection requires pointer operand ('{}' invalid)", name),
                        );
                        self.interner.invalid
                    }
                }
            }
            PrefixOp::Maybe => {
                let type_id = self.analyze_expression(import, scope, None, expr_node);
                match self.interner.entry(type_id).kind {
                    TypeKind::Invalid => type_id,
                    TypeKind::MetaType => {
                        let meta = self.resolve_type(expr_node);
                        if self.is_invalid(meta) {
                            return self.interner.invalid;
                        }
                        if self.is_unreachable(meta) {
                            self.add_node_error(
                                node,
                                DiagnosticKind::Type,
                                "unable to wrap unreachable in maybe type".to_string(),
                            );
                            return self.interner.invalid;
                        }
                        let maybe = self.interner.maybe_of(meta);
                        self.resolve_const_type(node, maybe)
                    }
                    TypeKind::Unreachable => {
                        self.add_node_error(
                            expr_node,
                            DiagnosticKind::Type,
                            "unable to wrap unreachable in maybe type".to_string(),
                        );
                        self.interner.invalid
                    }
                    // TODO fold ? applied to a constant operand
                    _ => self.interner.maybe_of(type_id),
                }
            }
            PrefixOp::Error => {
                let type_id = self.analyze_expression(import, scope, None, expr_node);
                match self.interner.entry(type_id).kind {
                    TypeKind::Invalid => type_id,
                    TypeKind::MetaType => {
                        let meta = self.resolve_type(expr_node);
                        if self.is_invalid(meta) {
                            return meta;
                        }
                        if self.is_unreachable(meta) {
                            self.add_node_error(
                                node,
                                DiagnosticKind::Type,
                                "unable to wrap unreachable in error type".to_string(),
                            );
                            return self.interner.invalid;
                        }
                        let error_union = self.interner.error_union_of(meta);
                        self.resolve_const_type(node, error_union)
                    }
                    TypeKind::Unreachable => {
                        self.add_node_error(
                            expr_node,
                            DiagnosticKind::Type,
                            "unable to wrap unreachable in error type".to_string(),
                        );
                        self.interner.invalid
                    }
                    // TODO fold % applied to a constant operand
                    _ => self.interner.error_union_of(type_id),
                }
            }
            PrefixOp::UnwrapError => {
                let type_id = self.analyze_expression(import, scope, None, expr_node);
                match self.interner.entry(type_id).kind {
                    TypeKind::Invalid => type_id,
                    TypeKind::ErrorUnion { ok } => ok,
                    _ => {
                        let name = self.interner.name(type_id).to_string();
                        self.add_node_error(
                            expr_node,
                            DiagnosticKind::Type,
                            format!("expected error type, got '{}'", name),
                        );
                        self.interner.invalid
                    }
                }
            }
        }
    }

    fn analyze_array_access_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        access: &ArrayAccessExpr,
    ) -> TypeId {
        let array_type = self.analyze_expression(import, scope, None, access.array);
        let return_type = match self.interner.entry(array_type).kind {
            TypeKind::Invalid => self.interner.invalid,
            TypeKind::Array { elem, .. } => elem,
            TypeKind::Pointer { pointee, .. } => pointee,
            TypeKind::Slice { elem, .. } => elem,
            _ => {
                let name = self.interner.name(array_type).to_string();
                self.add_node_error(
                    node,
                    DiagnosticKind::Type,
                    format!("array access of non-array type '{}'", name),
                );
                self.interner.invalid
            }
        };
        let isize_ = self.interner.isize_;
        self.analyze_expression(import, scope, Some(isize_), access.subscript);
        return_type
    }

    fn analyze_slice_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        slice: &SliceExpr,
    ) -> TypeId {
        let array_type = self.analyze_expression(import, scope, None, slice.array);
        let return_type = match self.interner.entry(array_type).kind {
            TypeKind::Invalid => self.interner.invalid,
            TypeKind::Array { elem, .. } => self.interner.slice_of(elem, slice.is_const),
            TypeKind::Pointer { pointee, .. } => {
                if slice.end.is_none() {
                    self.add_node_error(
                        node,
                        DiagnosticKind::Type,
                        "slice of a pointer requires an end index".to_string(),
                    );
                }
                self.interner.slice_of(pointee, slice.is_const)
            }
            TypeKind::Slice { elem, .. } => self.interner.slice_of(elem, slice.is_const),
            _ => {
                let name = self.interner.name(array_type).to_string();
                self.add_node_error(
                    node,
                    DiagnosticKind::Type,
                    format!("slice of non-array type '{}'", name),
                );
                self.interner.invalid
            }
        };

        if !self.is_invalid(return_type) {
            self.scopes.scope_mut(scope).struct_val_exprs.push(node);
        }

        let isize_ = self.interner.isize_;
        self.analyze_expression(import, scope, Some(isize_), slice.start);
        if let Some(end) = slice.end {
            self.analyze_expression(import, scope, Some(isize_), end);
        }
        return_type
    }

    fn analyze_field_access_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        access: &FieldAccessExpr,
    ) -> TypeId {
        let base_type = self.analyze_expression(import, scope, None, access.base);
        let base_kind = self.interner.entry(base_type).kind.clone();

        // struct field, through a pointer or not
        let bare_struct = match &base_kind {
            TypeKind::Struct(_) => Some(base_type),
            TypeKind::Pointer { pointee, .. }
                if matches!(self.interner.entry(*pointee).kind, TypeKind::Struct(_)) =>
            {
                Some(*pointee)
            }
            _ => None,
        };
        if let Some(struct_type) = bare_struct {
            let field = self
                .interner
                .entry(struct_type)
                .struct_info()
                .and_then(|info| {
                    info.fields
                        .iter()
                        .find(|f| f.name == access.field_name)
                        .map(|f| (f.src_index, f.type_id))
                });
            return match field {
                Some((index, field_type)) => {
                    self.meta[node.0 as usize].field_index = Some(index);
                    field_type
                }
                None => {
                    let name = self.interner.name(base_type).to_string();
                    self.add_node_error(
                        node,
                        DiagnosticKind::Resolution,
                        format!("no member named '{}' in '{}'", access.field_name, name),
                    );
                    self.interner.invalid
                }
            };
        }

        match base_kind {
            TypeKind::Array { elem, len } => match access.field_name.as_str() {
                "len" => {
                    self.set_const(node, ConstVal::Num(BigNum::from_unsigned(len)));
                    self.interner.isize_
                }
                "ptr" => self.interner.pointer_to(elem, false),
                _ => {
                    let name = self.interner.name(base_type).to_string();
                    self.add_node_error(
                        node,
                        DiagnosticKind::Resolution,
                        format!("no member named '{}' in '{}'", access.field_name, name),
                    );
                    self.interner.invalid
                }
            },
            TypeKind::Slice { elem, is_const } => match access.field_name.as_str() {
                "len" => self.interner.isize_,
                "ptr" => self.interner.pointer_to(elem, is_const),
                _ => {
                    let name = self.interner.name(base_type).to_string();
                    self.add_node_error(
                        node,
                        DiagnosticKind::Resolution,
                        format!("no member named '{}' in '{}'", access.field_name, name),
                    );
                    self.interner.invalid
                }
            },
            TypeKind::MetaType => {
                let child = self.resolve_type(access.base);
                match self.interner.entry(child).kind.clone() {
                    TypeKind::Invalid => self.interner.invalid,
                    TypeKind::Enum(_) => self.analyze_enum_value_expr(
                        import,
                        scope,
                        node,
                        None,
                        child,
                        &access.field_name.clone(),
                    ),
                    TypeKind::PureError => {
                        self.analyze_error_literal_expr(import, scope, node, &access.field_name)
                    }
                    _ => {
                        let name = self.interner.name(base_type).to_string();
                        self.add_node_error(
                            node,
                            DiagnosticKind::Type,
                            format!("type '{}' does not support field access", name),
                        );
                        self.interner.invalid
                    }
                }
            }
            TypeKind::Invalid => self.interner.invalid,
            _ => {
                let name = self.interner.name(base_type).to_string();
                self.add_node_error(
                    node,
                    DiagnosticKind::Type,
                    format!("type '{}' does not support field access", name),
                );
                self.interner.invalid
            }
        }
    }

    fn analyze_error_literal_expr(
        &mut self,
        _import: ImportId,
        scope: ScopeId,
        node: NodeId,
        err_name: &str,
    ) -> TypeId {
        match self.scopes.lookup_error(scope, err_name) {
            Some(error_id) => self.resolve_const_err(node, error_id),
            None => {
                self.add_node_error(
                    node,
                    DiagnosticKind::Resolution,
                    format!("use of undeclared error value '{}'", err_name),
                );
                let void = self.interner.void;
                self.interner.error_union_of(void)
            }
        }
    }

    fn analyze_fn_call_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        expected: Option<TypeId>,
        node: NodeId,
    ) -> TypeId {
        let call = match self.ast.kind(node) {
            NodeKind::FnCall(call) => call.clone(),
            _ => return self.interner.invalid,
        };

        if call.is_builtin {
            return self.analyze_builtin_fn_call(import, scope, expected, node);
        }

        // method call or enum value construction
        if let NodeKind::FieldAccess(access) = self.ast.kind(call.callee).clone() {
            let base_type = self.analyze_expression(import, scope, None, access.base);
            let base_kind = self.interner.entry(base_type).kind.clone();

            let bare_struct = match &base_kind {
                TypeKind::Struct(_) => Some(base_type),
                TypeKind::Pointer { pointee, .. }
                    if matches!(self.interner.entry(*pointee).kind, TypeKind::Struct(_)) =>
                {
                    Some(*pointee)
                }
                _ => None,
            };
            if let Some(struct_type) = bare_struct {
                let method = self
                    .interner
                    .entry(struct_type)
                    .struct_info()
                    .and_then(|info| info.methods.get(&access.field_name).copied());
                return match method {
                    Some(fn_id) => {
                        self.analyze_fn_call_raw(import, scope, node, fn_id, Some(struct_type))
                    }
                    None => {
                        let name = self.interner.name(struct_type).to_string();
                        self.add_node_error(
                            call.callee,
                            DiagnosticKind::Resolution,
                            format!("no function named '{}' in '{}'", access.field_name, name),
                        );
                        // still analyze the arguments
                        for param in call.params {
                            self.analyze_expression(import, scope, None, param);
                        }
                        self.interner.invalid
                    }
                };
            }

            match base_kind {
                TypeKind::Invalid => return self.interner.invalid,
                TypeKind::MetaType => {
                    let child = self.resolve_type(access.base);
                    if self.is_invalid(child) {
                        return self.interner.invalid;
                    }
                    if matches!(self.interner.entry(child).kind, TypeKind::Enum(_)) {
                        if call.params.len() > 1 {
                            let first = self.ast.first_executing_node(call.params[1]);
                            self.add_node_error(
                                first,
                                DiagnosticKind::Semantic,
                                "enum values accept only one parameter".to_string(),
                            );
                            return child;
                        }
                        let value_node = call.params.first().copied();
                        return self.analyze_enum_value_expr(
                            import,
                            scope,
                            call.callee,
                            value_node,
                            child,
                            &access.field_name,
                        );
                    }
                    self.add_node_error(
                        access.base,
                        DiagnosticKind::Type,
                        "member reference base type not struct or enum".to_string(),
                    );
                    return self.interner.invalid;
                }
                _ => {
                    self.add_node_error(
                        access.base,
                        DiagnosticKind::Type,
                        "member reference base type not struct or enum".to_string(),
                    );
                    return self.interner.invalid;
                }
            }
        }

        let invoke_type = self.analyze_expression(import, scope, None, call.callee);
        if self.is_invalid(invoke_type) {
            return self.interner.invalid;
        }

        if let Some(const_val) = self.const_val(call.callee).cloned() {
            if matches!(self.interner.entry(invoke_type).kind, TypeKind::MetaType) {
                return self.analyze_cast_expr(import, scope, node);
            }
            if let ConstVal::Fn(fn_id) = const_val {
                return self.analyze_fn_call_raw(import, scope, node, fn_id, None);
            }
            let name = self.interner.name(invoke_type).to_string();
            self.add_node_error(
                call.callee,
                DiagnosticKind::Type,
                format!("type '{}' not a function", name),
            );
            return self.interner.invalid;
        }

        // function pointer call
        if let Some(sig) = self.interner.entry(invoke_type).fn_sig().cloned() {
            for (i, param) in call.params.iter().enumerate() {
                let expected_param = sig.params.get(i).copied();
                self.analyze_expression(import, scope, expected_param, *param);
            }
            return sig.return_type;
        }

        let name = self.interner.name(invoke_type).to_string();
        self.add_node_error(
            call.callee,
            DiagnosticKind::Type,
            format!("type '{}' not a function", name),
        );
        self.interner.invalid
    }

    fn analyze_fn_call_raw(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        fn_id: FnId,
        struct_type: Option<TypeId>,
    ) -> TypeId {
        self.meta[node.0 as usize].fn_entry = Some(fn_id);

        let sig = self
            .interner
            .entry(self.fns[fn_id.0 as usize].type_id)
            .fn_sig()
            .cloned();
        let Some(sig) = sig else {
            return self.interner.invalid;
        };

        let params = match self.ast.kind(node) {
            NodeKind::FnCall(call) => call.params.clone(),
            _ => return self.interner.invalid,
        };

        let expected_param_count = sig.params.len();
        let mut actual_param_count = params.len();
        if struct_type.is_some() {
            // the receiver fills the first parameter
            actual_param_count += 1;
        }

        if sig.is_var_args {
            if actual_param_count < expected_param_count {
                self.add_node_error(
                    node,
                    DiagnosticKind::Type,
                    format!(
                        "expected at least {} arguments, got {}",
                        expected_param_count, actual_param_count
                    ),
                );
            }
        } else if expected_param_count != actual_param_count {
            self.add_node_error(
                node,
                DiagnosticKind::Type,
                format!(
                    "expected {} arguments, got {}",
                    expected_param_count, actual_param_count
                ),
            );
        }

        let offset = if struct_type.is_some() { 1 } else { 0 };
        for (i, param) in params.iter().enumerate() {
            let expected_param = sig.params.get(i + offset).copied();
            self.analyze_expression(import, scope, expected_param, *param);
        }

        let return_type = sig.return_type;
        if self.is_invalid(return_type) {
            return return_type;
        }
        if self.interner.is_aggregate(return_type) {
            self.scopes.scope_mut(scope).cast_allocas.push(node);
        }
        return_type
    }

    fn analyze_container_init_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        init: &ContainerInitExpr,
    ) -> TypeId {
        let container_type = self.analyze_type_expr(import, scope, init.type_expr);
        let container_kind = self.interner.entry(container_type).kind.clone();

        match container_kind {
            TypeKind::Invalid => container_type,
            TypeKind::Struct(info) if init.kind == ContainerInitKind::Struct => {
                self.scopes.scope_mut(scope).struct_val_exprs.push(node);

                let field_count = info.fields.len();
                let mut field_use_counts = vec![0usize; field_count];
                let mut field_vals: Vec<Option<ConstVal>> = vec![None; field_count];
                let mut all_const = true;

                for &entry in &init.entries {
                    let field = match self.ast.kind(entry) {
                        NodeKind::StructValField(f) => f.clone(),
                        _ => continue,
                    };
                    self.meta[entry.0 as usize].scope = Some(scope);
                    self.resolved[entry.0 as usize].type_id = Some(self.interner.void);

                    let matching = info
                        .fields
                        .iter()
                        .find(|f| f.name == field.name)
                        .map(|f| (f.src_index, f.type_id));
                    let Some((field_index, field_type)) = matching else {
                        let name = self.interner.name(container_type).to_string();
                        self.add_node_error(
                            entry,
                            DiagnosticKind::Resolution,
                            format!("no member named '{}' in '{}'", field.name, name),
                        );
                        continue;
                    };

                    field_use_counts[field_index] += 1;
                    if field_use_counts[field_index] > 1 {
                        self.add_node_error(
                            entry,
                            DiagnosticKind::Semantic,
                            "duplicate field".to_string(),
                        );
                        continue;
                    }
                    self.meta[entry.0 as usize].field_index = Some(field_index);

                    self.analyze_expression(import, scope, Some(field_type), field.expr);
                    match self.const_val(field.expr).cloned() {
                        Some(value) => field_vals[field_index] = Some(value),
                        None => all_const = false,
                    }
                }

                for (i, &count) in field_use_counts.iter().enumerate() {
                    if count == 0 {
                        let field_name = info.fields[i].name.clone();
                        self.add_node_error(
                            node,
                            DiagnosticKind::Semantic,
                            format!("missing field: '{}'", field_name),
                        );
                    }
                }

                if all_const && field_vals.iter().all(|v| v.is_some()) {
                    let values = field_vals.into_iter().map(|v| v.unwrap()).collect();
                    self.set_const(node, ConstVal::Struct(values));
                }
                container_type
            }
            TypeKind::Struct(_) => {
                let name = self.interner.name(container_type).to_string();
                self.add_node_error(
                    node,
                    DiagnosticKind::Type,
                    format!("type '{}' does not support array initialization syntax", name),
                );
                self.interner.invalid
            }
            TypeKind::Slice { elem, .. } if init.kind == ContainerInitKind::Array => {
                let elem_count = init.entries.len() as u64;
                let mut values = Vec::with_capacity(init.entries.len());
                let mut all_const = true;
                for &entry in &init.entries {
                    self.analyze_expression(import, scope, Some(elem), entry);
                    match self.const_val(entry).cloned() {
                        Some(value) => values.push(value),
                        None => all_const = false,
                    }
                }
                let fixed = self.interner.array_of(elem, elem_count);
                self.scopes.scope_mut(scope).struct_val_exprs.push(node);
                if all_const {
                    self.set_const(node, ConstVal::Array(std::rc::Rc::new(values)));
                }
                fixed
            }
            TypeKind::Slice { .. } => {
                let name = self.interner.name(container_type).to_string();
                self.add_node_error(
                    node,
                    DiagnosticKind::Type,
                    format!("type '{}' does not support struct initialization syntax", name),
                );
                self.interner.invalid
            }
            TypeKind::Void => {
                if !init.entries.is_empty() {
                    self.add_node_error(
                        node,
                        DiagnosticKind::Semantic,
                        "void expression expects no arguments".to_string(),
                    );
                    self.interner.invalid
                } else {
                    self.resolve_const_void(node)
                }
            }
            TypeKind::Unreachable => {
                if !init.entries.is_empty() {
                    self.add_node_error(
                        node,
                        DiagnosticKind::Semantic,
                        "unreachable expression expects no arguments".to_string(),
                    );
                    self.interner.invalid
                } else {
                    container_type
                }
            }
            TypeKind::Array { .. } => {
                self.ice(
                    node,
                    "initialization with an explicit fixed array type is not implemented",
                );
                container_type
            }
            TypeKind::Enum(_) => {
                self.ice(node, "enum initialization syntax is not implemented");
                container_type
            }
            _ => {
                let syntax = match init.kind {
                    ContainerInitKind::Struct => "struct",
                    ContainerInitKind::Array => "array",
                };
                let name = self.interner.name(container_type).to_string();
                self.add_node_error(
                    node,
                    DiagnosticKind::Type,
                    format!(
                        "type '{}' does not support {} initialization syntax",
                        name, syntax
                    ),
                );
                self.interner.invalid
            }
        }
    }

    fn analyze_if_then_else(
        &mut self,
        import: ImportId,
        then_scope: ScopeId,
        else_scope: ScopeId,
        expected: Option<TypeId>,
        then_block: NodeId,
        else_node: Option<NodeId>,
        parent_node: NodeId,
    ) -> TypeId {
        let then_type = self.analyze_expression(import, then_scope, expected, then_block);
        let else_type = match else_node {
            Some(else_node) => self.analyze_expression(import, else_scope, expected, else_node),
            None => {
                let void = self.interner.void;
                self.resolve_type_compatibility(else_scope, parent_node, expected, void)
            }
        };

        if expected.is_some() {
            return if self.is_unreachable(then_type) {
                else_type
            } else {
                then_type
            };
        }

        let children = [(Some(then_block), then_type), (else_node, else_type)];
        self.resolve_peer_type_compatibility(else_scope, parent_node, &children)
    }

    fn analyze_if_bool_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        expected: Option<TypeId>,
        node: NodeId,
        if_expr: &IfBoolExpr,
    ) -> TypeId {
        let bool_ = self.interner.bool_;
        self.analyze_expression(import, scope, Some(bool_), if_expr.condition);

        let result = self.analyze_if_then_else(
            import,
            scope,
            scope,
            expected,
            if_expr.then_block,
            if_expr.else_node,
            node,
        );

        // a constant condition folds to the taken branch's value; both
        // branches were still analyzed above
        if let Some(cond) = self.const_val(if_expr.condition).and_then(|v| v.as_bool()) {
            let taken = if cond {
                Some(if_expr.then_block)
            } else {
                if_expr.else_node
            };
            match taken {
                Some(branch) => {
                    if let Some(value) = self.const_val(branch).cloned() {
                        self.set_const(node, value);
                    }
                }
                None => self.set_const(node, ConstVal::Void),
            }
        }
        result
    }

    fn analyze_if_var_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        expected: Option<TypeId>,
        node: NodeId,
        if_var: &IfVarExpr,
    ) -> TypeId {
        // the unwrapped binding is visible in the then branch only
        let child = self.scopes.new_scope(node, Some(scope), None);
        self.register_fn_scope(child);
        self.meta[node.0 as usize].block_scope = Some(child);

        self.analyze_variable_declaration_raw(
            import,
            child,
            node,
            &if_var.var_name,
            if_var.is_const,
            VisibMod::Private,
            if_var.type_expr,
            Some(if_var.init),
            true,
        );

        self.analyze_if_then_else(
            import,
            child,
            scope,
            expected,
            if_var.then_block,
            if_var.else_node,
            node,
        )
    }

    fn analyze_while_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        while_expr: &WhileExpr,
    ) -> TypeId {
        let bool_ = self.interner.bool_;
        let condition_type =
            self.analyze_expression(import, scope, Some(bool_), while_expr.condition);

        let child = self.scopes.new_scope(node, Some(scope), None);
        self.register_fn_scope(child);
        self.scopes.scope_mut(child).parent_loop = Some(node);
        self.meta[node.0 as usize].block_scope = Some(child);

        let void = self.interner.void;
        self.analyze_expression(import, child, Some(void), while_expr.body);

        if self.is_invalid(condition_type) {
            return self.interner.invalid;
        }

        // a constant-true condition with no break never falls through
        if let Some(true) = self.const_val(while_expr.condition).and_then(|v| v.as_bool()) {
            self.meta[node.0 as usize].condition_always_true = true;
            if !self.meta[node.0 as usize].contains_break {
                return self.interner.unreachable;
            }
        }
        self.interner.void
    }

    fn analyze_for_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        for_expr: &ForExpr,
    ) -> TypeId {
        let array_type = self.analyze_expression(import, scope, None, for_expr.array);
        let child_type = match self.interner.entry(array_type).kind {
            TypeKind::Invalid => array_type,
            TypeKind::Array { elem, .. } => elem,
            TypeKind::Slice { elem, .. } => elem,
            _ => {
                let name = self.interner.name(array_type).to_string();
                self.add_node_error(
                    node,
                    DiagnosticKind::Type,
                    format!("iteration over non array type '{}'", name),
                );
                self.interner.invalid
            }
        };

        let child = self.scopes.new_scope(node, Some(scope), None);
        self.register_fn_scope(child);
        self.scopes.scope_mut(child).parent_loop = Some(node);
        self.meta[node.0 as usize].block_scope = Some(child);

        let elem_name = match self.ast.kind(for_expr.elem) {
            NodeKind::Symbol(sym) => sym.name.clone(),
            _ => String::new(),
        };
        let elem_var = self.add_local_var(for_expr.elem, child, Some(&elem_name), child_type, true);
        self.meta[for_expr.elem.0 as usize].var = Some(elem_var);
        self.resolved[for_expr.elem.0 as usize].type_id = Some(child_type);

        let isize_ = self.interner.isize_;
        match for_expr.index {
            Some(index_node) => {
                let index_name = match self.ast.kind(index_node) {
                    NodeKind::Symbol(sym) => sym.name.clone(),
                    _ => String::new(),
                };
                let index_var =
                    self.add_local_var(index_node, child, Some(&index_name), isize_, true);
                self.meta[index_node.0 as usize].var = Some(index_var);
                self.resolved[index_node.0 as usize].type_id = Some(isize_);
            }
            None => {
                // implicit loop counter for the backend
                self.add_local_var(node, child, None, isize_, true);
            }
        }

        let void = self.interner.void;
        self.analyze_expression(import, child, Some(void), for_expr.body);
        self.interner.void
    }

    fn analyze_switch_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        expected: Option<TypeId>,
        node: NodeId,
        switch: &SwitchExpr,
    ) -> TypeId {
        let expr_type = self.analyze_expression(import, scope, None, switch.expr);
        if self.is_invalid(expr_type) {
            return expr_type;
        }
        if self.is_unreachable(expr_type) {
            let first = self.ast.first_executing_node(switch.expr);
            self.add_node_error(
                first,
                DiagnosticKind::Semantic,
                "switch on unreachable expression not allowed".to_string(),
            );
            return self.interner.invalid;
        }

        let mut else_prong: Option<NodeId> = None;
        let mut covered_tags: std::collections::HashSet<u64> = std::collections::HashSet::new();
        let mut prong_results: Vec<(Option<NodeId>, TypeId)> = Vec::new();

        for &prong_node in &switch.prongs {
            let prong = match self.ast.kind(prong_node) {
                NodeKind::SwitchProng(p) => p.clone(),
                _ => continue,
            };

            if prong.items.is_empty() {
                if else_prong.is_some() {
                    self.add_node_error(
                        prong_node,
                        DiagnosticKind::Semantic,
                        "multiple else prongs in switch expression".to_string(),
                    );
                } else {
                    else_prong = Some(prong_node);
                }
            } else {
                for &item in &prong.items {
                    if matches!(self.ast.kind(item), NodeKind::SwitchRange { .. }) {
                        self.ice(item, "switch ranges are not implemented");
                        continue;
                    }
                    self.analyze_expression(import, scope, Some(expr_type), item);
                    match self.const_val(item) {
                        Some(ConstVal::EnumTag { tag, .. }) => {
                            covered_tags.insert(*tag);
                        }
                        Some(ConstVal::Num(num)) => {
                            covered_tags.insert(num.unsigned_value());
                        }
                        Some(_) => {}
                        None => {
                            self.add_node_error(
                                item,
                                DiagnosticKind::Semantic,
                                "unable to resolve constant expression".to_string(),
                            );
                        }
                    }
                }
            }

            let child = self.scopes.new_scope(prong_node, Some(scope), None);
            self.register_fn_scope(child);
            self.meta[prong_node.0 as usize].block_scope = Some(child);
            if let Some(payload) = prong.payload {
                let payload_name = match self.ast.kind(payload) {
                    NodeKind::Symbol(sym) => sym.name.clone(),
                    _ => String::new(),
                };
                let var = self.add_local_var(payload, child, Some(&payload_name), expr_type, true);
                self.meta[payload.0 as usize].var = Some(var);
                self.resolved[payload.0 as usize].type_id = Some(expr_type);
            }

            let prong_type = self.analyze_expression(import, child, expected, prong.expr);
            self.resolved[prong_node.0 as usize].type_id = Some(prong_type);
            prong_results.push((Some(prong.expr), prong_type));
        }

        // exhaustiveness: every enum tag covered, or a single else prong
        if else_prong.is_none() {
            let exhaustive = match self.interner.entry(expr_type).enum_info() {
                Some(info) => covered_tags.len() >= info.fields.len(),
                None => false,
            };
            if !exhaustive {
                self.add_node_error(
                    node,
                    DiagnosticKind::Semantic,
                    "switch must handle all possibilities".to_string(),
                );
            }
        }

        if let Some(expected) = expected {
            return expected;
        }
        if prong_results.is_empty() {
            return self.interner.void;
        }
        self.resolve_peer_type_compatibility(scope, node, &prong_results)
    }

    fn analyze_array_type(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        array_type: &ArrayTypeExpr,
    ) -> TypeId {
        let elem = self.analyze_type_expr(import, scope, array_type.elem);
        if self.is_unreachable(elem) {
            self.add_node_error(
                node,
                DiagnosticKind::Type,
                "array of unreachable not allowed".to_string(),
            );
            return self.interner.invalid;
        }
        if self.is_invalid(elem) {
            return self.interner.invalid;
        }

        match array_type.size {
            Some(size_node) => {
                let isize_ = self.interner.isize_;
                let size_type = self.analyze_expression(import, scope, Some(isize_), size_node);
                if self.is_invalid(size_type) {
                    return self.interner.invalid;
                }
                match self.const_val(size_node).and_then(|v| v.as_num()).copied() {
                    Some(num) => {
                        if num.is_negative() {
                            self.add_node_error(
                                size_node,
                                DiagnosticKind::Semantic,
                                format!("array size {} is negative", num),
                            );
                            self.interner.invalid
                        } else {
                            let array = self.interner.array_of(elem, num.unsigned_value());
                            self.resolve_const_type(node, array)
                        }
                    }
                    None => {
                        let slice = self.interner.slice_of(elem, array_type.is_const);
                        self.resolve_const_type(node, slice)
                    }
                }
            }
            None => {
                let slice = self.interner.slice_of(elem, array_type.is_const);
                self.resolve_const_type(node, slice)
            }
        }
    }

    fn analyze_goto_expr(&mut self, scope: ScopeId, node: NodeId, name: &str) -> TypeId {
        if let Some(fn_id) = self.scopes.scope(scope).fn_entry {
            match self.fns[fn_id.0 as usize].labels.get(name).copied() {
                Some(index) => {
                    self.fns[fn_id.0 as usize].label_list[index].used = true;
                }
                None => {
                    self.add_node_error(
                        node,
                        DiagnosticKind::Resolution,
                        format!("use of undeclared label '{}'", name),
                    );
                }
            }
        }
        self.interner.unreachable
    }

    fn analyze_break_expr(&mut self, scope: ScopeId, node: NodeId) -> TypeId {
        match self.scopes.scope(scope).parent_loop {
            Some(loop_node) => {
                if matches!(self.ast.kind(loop_node), NodeKind::While(_)) {
                    self.meta[loop_node.0 as usize].contains_break = true;
                }
            }
            None => {
                self.add_node_error(
                    node,
                    DiagnosticKind::Semantic,
                    "'break' expression outside loop".to_string(),
                );
            }
        }
        self.interner.unreachable
    }

    fn analyze_continue_expr(&mut self, scope: ScopeId, node: NodeId) -> TypeId {
        if self.scopes.scope(scope).parent_loop.is_none() {
            self.add_node_error(
                node,
                DiagnosticKind::Semantic,
                "'continue' expression outside loop".to_string(),
            );
        }
        self.interner.unreachable
    }
}
