use crate::core::ast::NodeId;
use crate::core::types::{FnId, TypeId, TypeInterner};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorId(pub u32);

#[derive(Debug, Clone)]
pub struct Var {
    pub name: String,
    pub type_id: TypeId,
    pub is_const: bool,
    pub decl_node: NodeId,
    pub arg_index: Option<usize>,
}

/// error value; the index is assigned at first sight of the declaration and
/// never changes
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub name: String,
    pub value: u64,
    pub decl_node: NodeId,
}

#[derive(Debug)]
pub struct Scope {
    pub node: NodeId,
    pub parent: Option<ScopeId>,
    pub fn_entry: Option<FnId>,
    pub vars: HashMap<String, VarId>,
    pub var_list: Vec<VarId>,
    pub types: HashMap<String, TypeId>,
    pub errors: HashMap<String, ErrorId>,
    pub parent_loop: Option<NodeId>,
    // index into the session's c-import text buffers
    pub c_import_buf: Option<usize>,
    // temporaries the backend must allocate
    pub cast_allocas: Vec<NodeId>,
    pub struct_val_exprs: Vec<NodeId>,
}

pub enum DeclareVarError {
    Redeclaration,
    ShadowsType(TypeId),
}

/// scope tree of the whole session; scopes are created on block entry and
/// never removed, so later passes can still walk them
pub struct ScopeArena {
    scopes: Vec<Scope>,
    pub vars: Vec<Var>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            vars: Vec::new(),
        }
    }

    pub fn new_scope(
        &mut self,
        node: NodeId,
        parent: Option<ScopeId>,
        fn_entry: Option<FnId>,
    ) -> ScopeId {
        let (parent_loop, c_import_buf, inherited_fn) = match parent {
            Some(parent_id) => {
                let parent_scope = self.scope(parent_id);
                (
                    parent_scope.parent_loop,
                    parent_scope.c_import_buf,
                    parent_scope.fn_entry,
                )
            }
            None => (None, None, None),
        };
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            node,
            parent,
            fn_entry: fn_entry.or(inherited_fn),
            vars: HashMap::new(),
            var_list: Vec::new(),
            types: HashMap::new(),
            errors: HashMap::new(),
            parent_loop,
            c_import_buf,
            cast_allocas: Vec::new(),
            struct_val_exprs: Vec::new(),
        });
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn var(&self, id: VarId) -> &Var {
        &self.vars[id.0 as usize]
    }

    pub fn var_mut(&mut self, id: VarId) -> &mut Var {
        &mut self.vars[id.0 as usize]
    }

    pub fn lookup_var(&self, scope: ScopeId, name: &str) -> Option<VarId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(&var) = s.vars.get(name) {
                return Some(var);
            }
            current = s.parent;
        }
        None
    }

    /// like lookup_var but stops at the function boundary
    pub fn lookup_var_local(&self, scope: ScopeId, name: &str) -> Option<VarId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if s.fn_entry.is_none() {
                return None;
            }
            if let Some(&var) = s.vars.get(name) {
                return Some(var);
            }
            current = s.parent;
        }
        None
    }

    pub fn lookup_type(&self, scope: ScopeId, name: &str) -> Option<TypeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(&ty) = s.types.get(name) {
                return Some(ty);
            }
            current = s.parent;
        }
        None
    }

    pub fn lookup_error(&self, scope: ScopeId, name: &str) -> Option<ErrorId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(&err) = s.errors.get(name) {
                return Some(err);
            }
            current = s.parent;
        }
        None
    }

    /// declares a variable in the scope. pass no name for a backend-internal
    /// temporary: it lands in the variable list but not the lookup map.
    /// on failure the variable is still registered, with an invalid type, so
    /// later lookups do not cascade.
    pub fn declare_var(
        &mut self,
        interner: &TypeInterner,
        scope: ScopeId,
        name: Option<&str>,
        type_id: TypeId,
        is_const: bool,
        decl_node: NodeId,
    ) -> (VarId, Option<DeclareVarError>) {
        let Some(name) = name else {
            let id = VarId(self.vars.len() as u32);
            self.vars.push(Var {
                name: "_anon".to_string(),
                type_id,
                is_const,
                decl_node,
                arg_index: None,
            });
            self.scope_mut(scope).var_list.push(id);
            return (id, None);
        };

        let in_fn = self.scope(scope).fn_entry.is_some();
        let existing = if in_fn {
            self.lookup_var_local(scope, name)
        } else {
            self.lookup_var(scope, name)
        };

        let mut error = None;
        let mut final_type = type_id;
        if existing.is_some() {
            error = Some(DeclareVarError::Redeclaration);
            final_type = interner.invalid;
        } else {
            let shadowed = interner
                .get_primitive(name)
                .or_else(|| self.lookup_type(scope, name));
            if let Some(shadowed_type) = shadowed {
                error = Some(DeclareVarError::ShadowsType(shadowed_type));
                final_type = interner.invalid;
            }
        }

        let id = VarId(self.vars.len() as u32);
        self.vars.push(Var {
            name: name.to_string(),
            type_id: final_type,
            is_const,
            decl_node,
            arg_index: None,
        });
        let s = self.scope_mut(scope);
        s.vars.insert(name.to_string(), id);
        s.var_list.push(id);
        (id, error)
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}
