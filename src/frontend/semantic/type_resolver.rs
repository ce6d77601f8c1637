use crate::core::ast::{ContainerKind, ImportId, NodeId, NodeKind};
use crate::core::types::{EnumField, StructField, TypeId, TypeKind};
use crate::error::DiagnosticKind;
use crate::frontend::semantic::analyzer::Analyzer;
use crate::frontend::semantic::const_eval::ConstVal;
use crate::frontend::semantic::scope::ScopeId;

impl<'a> Analyzer<'a> {
    /// reads the type out of an already-analyzed type expression. the node
    /// must have resolved to a constant of meta type.
    pub(crate) fn resolve_type(&mut self, node: NodeId) -> TypeId {
        let resolved = &self.resolved[node.0 as usize];
        let Some(type_id) = resolved.type_id else {
            return self.interner.invalid;
        };
        if self.interner.entry(type_id).is_invalid() {
            return self.interner.invalid;
        }
        if !matches!(self.interner.entry(type_id).kind, TypeKind::MetaType) {
            self.add_node_error(
                node,
                DiagnosticKind::Type,
                "expected type, found expression".to_string(),
            );
            return self.interner.invalid;
        }
        match resolved.const_val.as_ref().and_then(|v| v.as_type()) {
            Some(inner) => inner,
            None => {
                self.add_node_error(
                    node,
                    DiagnosticKind::Semantic,
                    "unable to resolve constant expression".to_string(),
                );
                self.interner.invalid
            }
        }
    }

    /// analyzes a node as a type expression and resolves it to a handle
    pub(crate) fn analyze_type_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
    ) -> TypeId {
        self.analyze_expression(import, scope, None, node);
        self.resolve_type(node)
    }

    pub(crate) fn resolve_container_type(&mut self, import: ImportId, type_id: TypeId) {
        match &self.interner.entry(type_id).kind {
            TypeKind::Struct(_) => self.resolve_struct_type(import, type_id),
            TypeKind::Enum(_) => self.resolve_enum_type(import, type_id),
            _ => {}
        }
    }

    pub(crate) fn resolve_struct_type(&mut self, import: ImportId, type_id: TypeId) {
        let (decl_node, already_resolved, embedded) = {
            let info = self.interner.entry(type_id).struct_info().unwrap();
            (info.decl_node, info.fields_resolved, info.embedded_in_current)
        };

        if embedded {
            let reported = {
                let info = self.interner.entry(type_id).struct_info().unwrap();
                info.reported_infinite_err
            };
            if !reported {
                if let TypeKind::Struct(info) = &mut self.interner.entry_mut(type_id).kind {
                    info.reported_infinite_err = true;
                }
                self.add_node_error(
                    decl_node,
                    DiagnosticKind::Semantic,
                    "struct has infinite size".to_string(),
                );
            }
            return;
        }

        if already_resolved {
            return;
        }

        let field_nodes = match self.ast.kind(decl_node) {
            NodeKind::ContainerDecl(decl) => decl.fields.clone(),
            _ => return,
        };

        // the flag is only set while descending into field types
        if let TypeKind::Struct(info) = &mut self.interner.entry_mut(type_id).kind {
            info.embedded_in_current = true;
            info.fields_resolved = true;
        }

        let import_scope = self.imports[import.0 as usize].scope;
        let mut fields = Vec::with_capacity(field_nodes.len());
        let mut is_invalid = false;
        let mut gen_field_index = 0usize;
        let mut total_size_in_bits = 0u64;
        let mut first_field_align_in_bits = 0u64;

        for (src_index, &field_node) in field_nodes.iter().enumerate() {
            let (field_name, field_type_node) = match self.ast.kind(field_node) {
                NodeKind::ContainerField(field) => (field.name.clone(), field.type_expr),
                _ => continue,
            };
            let field_type = self.analyze_type_expr(import, import_scope, field_type_node);
            self.resolve_container_type(import, field_type);

            let mut gen_index = None;
            match &self.interner.entry(field_type).kind {
                TypeKind::Invalid => {
                    is_invalid = true;
                }
                TypeKind::Void => {}
                _ => {
                    gen_index = Some(gen_field_index);
                    gen_field_index += 1;
                    let entry = self.interner.entry(field_type);
                    total_size_in_bits += entry.size_in_bits;
                    if first_field_align_in_bits == 0 {
                        first_field_align_in_bits = entry.align_in_bits;
                    }
                }
            }

            fields.push(StructField {
                name: field_name,
                type_id: field_type,
                src_index,
                gen_index,
            });
        }

        let mut final_invalid = is_invalid;
        if let TypeKind::Struct(info) = &mut self.interner.entry_mut(type_id).kind {
            info.embedded_in_current = false;
            info.fields = fields;
            info.gen_field_count = gen_field_index;
            final_invalid = info.is_invalid || is_invalid;
            info.is_invalid = final_invalid;
            info.complete = true;
        }
        if !final_invalid {
            let entry = self.interner.entry_mut(type_id);
            entry.size_in_bits = total_size_in_bits;
            entry.align_in_bits = first_field_align_in_bits;
        }
    }

    pub(crate) fn resolve_enum_type(&mut self, import: ImportId, type_id: TypeId) {
        let (decl_node, already_resolved, embedded) = {
            let info = self.interner.entry(type_id).enum_info().unwrap();
            (info.decl_node, info.fields_resolved, info.embedded_in_current)
        };

        if embedded {
            let reported = {
                let info = self.interner.entry(type_id).enum_info().unwrap();
                info.reported_infinite_err
            };
            if !reported {
                if let TypeKind::Enum(info) = &mut self.interner.entry_mut(type_id).kind {
                    info.reported_infinite_err = true;
                }
                self.add_node_error(
                    decl_node,
                    DiagnosticKind::Semantic,
                    "enum has infinite size".to_string(),
                );
            }
            return;
        }

        if already_resolved {
            return;
        }

        let field_nodes = match self.ast.kind(decl_node) {
            NodeKind::ContainerDecl(decl) => decl.fields.clone(),
            _ => return,
        };

        if let TypeKind::Enum(info) = &mut self.interner.entry_mut(type_id).kind {
            info.embedded_in_current = true;
            info.fields_resolved = true;
        }

        let import_scope = self.imports[import.0 as usize].scope;
        let mut fields = Vec::with_capacity(field_nodes.len());
        let mut is_invalid = false;
        let mut gen_field_count = 0usize;
        let mut biggest_payload_size_in_bits = 0u64;
        let mut biggest_align_in_bits = 0u64;

        for (tag, &field_node) in field_nodes.iter().enumerate() {
            let (field_name, field_type_node) = match self.ast.kind(field_node) {
                NodeKind::ContainerField(field) => (field.name.clone(), field.type_expr),
                _ => continue,
            };
            let field_type = self.analyze_type_expr(import, import_scope, field_type_node);
            self.resolve_container_type(import, field_type);

            match &self.interner.entry(field_type).kind {
                TypeKind::Invalid => {
                    is_invalid = true;
                }
                TypeKind::Void => {}
                _ => {
                    gen_field_count += 1;
                    let entry = self.interner.entry(field_type);
                    biggest_payload_size_in_bits =
                        biggest_payload_size_in_bits.max(entry.size_in_bits);
                    biggest_align_in_bits = biggest_align_in_bits.max(entry.align_in_bits);
                }
            }

            fields.push(EnumField {
                name: field_name,
                type_id: field_type,
                tag_value: tag as u64,
            });
        }

        // tags are assigned 0..field_count, so the widest stored value is
        // field_count - 1
        let field_count = fields.len() as u64;
        let tag_type = self
            .interner
            .smallest_unsigned_fitting(field_count.saturating_sub(1));
        let tag_bits = self.interner.size_in_bits(tag_type);

        let mut final_invalid = is_invalid;
        if let TypeKind::Enum(info) = &mut self.interner.entry_mut(type_id).kind {
            info.embedded_in_current = false;
            info.fields = fields;
            info.gen_field_count = gen_field_count;
            final_invalid = info.is_invalid || is_invalid;
            info.is_invalid = final_invalid;
            info.tag_type = Some(tag_type);
            info.complete = true;
        }
        if !final_invalid {
            let entry = self.interner.entry_mut(type_id);
            if gen_field_count == 0 {
                // all payloads are void: the representation is the tag
                entry.size_in_bits = tag_bits;
                entry.align_in_bits = tag_bits;
            } else {
                entry.size_in_bits = tag_bits + biggest_payload_size_in_bits;
                entry.align_in_bits = biggest_align_in_bits.max(tag_bits);
            }
        }
    }

    /// registers the container's nominal type handle in the import scope;
    /// body resolution happens later, on demand
    pub(crate) fn preview_container_decl(&mut self, import: ImportId, node: NodeId) -> TypeId {
        let (name, kind) = match self.ast.kind(node) {
            NodeKind::ContainerDecl(decl) => (decl.name.clone(), decl.kind),
            _ => return self.interner.invalid,
        };

        let import_scope = self.imports[import.0 as usize].scope;
        let existing = self
            .interner
            .get_primitive(&name)
            .or_else(|| self.scopes.lookup_type(import_scope, &name));
        if existing.is_some() {
            self.add_node_error(
                node,
                DiagnosticKind::Resolution,
                format!("redefinition of '{}'", name),
            );
            return existing.unwrap();
        }

        let type_id = match kind {
            ContainerKind::Struct => self.interner.new_struct(&name, node, false),
            ContainerKind::Enum => self.interner.new_enum(&name, node),
        };
        self.scopes
            .scope_mut(import_scope)
            .types
            .insert(name.clone(), type_id);

        // pub containers are visible to every importer
        let visib = match self.ast.kind(node) {
            NodeKind::ContainerDecl(decl) => decl.visib,
            _ => crate::core::ast::VisibMod::Private,
        };
        if visib != crate::core::ast::VisibMod::Private {
            let importers = self.imports[import.0 as usize].importers.clone();
            for (importer, import_node) in importers {
                let importer_scope = self.imports[importer.0 as usize].scope;
                if self.scopes.scope(importer_scope).types.contains_key(&name) {
                    self.add_node_error(
                        import_node,
                        DiagnosticKind::Resolution,
                        format!("import of type '{}' overrides existing definition", name),
                    );
                } else {
                    self.scopes
                        .scope_mut(importer_scope)
                        .types
                        .insert(name.clone(), type_id);
                }
            }
        }

        type_id
    }

    /// the constant enum value `E.Field`, or an initialized enum value when
    /// called with an argument
    pub(crate) fn analyze_enum_value_expr(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        field_access_node: NodeId,
        value_node: Option<NodeId>,
        enum_type: TypeId,
        field_name: &str,
    ) -> TypeId {
        let field = self
            .interner
            .entry(enum_type)
            .enum_info()
            .and_then(|info| {
                info.fields
                    .iter()
                    .enumerate()
                    .find(|(_, f)| f.name == field_name)
                    .map(|(i, f)| (i, f.type_id, f.tag_value))
            });

        let Some((field_index, payload_type, tag_value)) = field else {
            let enum_name = self.interner.name(enum_type).to_string();
            self.add_node_error(
                field_access_node,
                DiagnosticKind::Resolution,
                format!("no member named '{}' in '{}'", field_name, enum_name),
            );
            return enum_type;
        };

        self.meta[field_access_node.0 as usize].enum_field_index = Some(field_index);

        if let Some(value_node) = value_node {
            self.analyze_expression(import, scope, Some(payload_type), value_node);
            self.scopes
                .scope_mut(scope)
                .struct_val_exprs
                .push(field_access_node);
            // fold when the payload folded
            if let Some(payload_val) = self.const_val(value_node).cloned() {
                self.set_const(
                    field_access_node,
                    ConstVal::EnumTag {
                        tag: tag_value,
                        payload: Some(Box::new(payload_val)),
                    },
                );
            }
        } else if !matches!(self.interner.entry(payload_type).kind, TypeKind::Void) {
            let enum_name = self.interner.name(enum_type).to_string();
            let payload_name = self.interner.name(payload_type).to_string();
            self.add_node_error(
                field_access_node,
                DiagnosticKind::Semantic,
                format!(
                    "enum value '{}.{}' requires parameter of type '{}'",
                    enum_name, field_name, payload_name
                ),
            );
        } else {
            self.set_const(
                field_access_node,
                ConstVal::EnumTag {
                    tag: tag_value,
                    payload: None,
                },
            );
        }
        enum_type
    }
}
