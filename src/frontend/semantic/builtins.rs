use crate::core::ast::{ImportId, NodeId, NodeKind};
use crate::core::bignum::BigNum;
use crate::core::types::{TypeId, TypeKind};
use crate::error::DiagnosticKind;
use crate::frontend::semantic::analyzer::Analyzer;
use crate::frontend::semantic::const_eval::ConstVal;
use crate::frontend::semantic::scope::ScopeId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFnId {
    Memcpy,
    Memset,
    Sizeof,
    MaxValue,
    MinValue,
    MemberCount,
    Typeof,
    AddWithOverflow,
    SubWithOverflow,
    MulWithOverflow,
    CInclude,
    CDefine,
    CUndef,
}

#[derive(Debug, Clone, Copy)]
pub struct BuiltinFn {
    pub id: BuiltinFnId,
    pub param_count: usize,
}

pub fn builtin_fn_table() -> HashMap<String, BuiltinFn> {
    let mut table = HashMap::new();
    let mut add = |name: &str, id, param_count| {
        table.insert(name.to_string(), BuiltinFn { id, param_count });
    };
    add("memcpy", BuiltinFnId::Memcpy, 3);
    add("memset", BuiltinFnId::Memset, 3);
    add("sizeof", BuiltinFnId::Sizeof, 1);
    add("max_value", BuiltinFnId::MaxValue, 1);
    add("min_value", BuiltinFnId::MinValue, 1);
    add("member_count", BuiltinFnId::MemberCount, 1);
    add("typeof", BuiltinFnId::Typeof, 1);
    add("add_with_overflow", BuiltinFnId::AddWithOverflow, 4);
    add("sub_with_overflow", BuiltinFnId::SubWithOverflow, 4);
    add("mul_with_overflow", BuiltinFnId::MulWithOverflow, 4);
    add("c_include", BuiltinFnId::CInclude, 1);
    add("c_define", BuiltinFnId::CDefine, 2);
    add("c_undef", BuiltinFnId::CUndef, 1);
    table
}

impl<'a> Analyzer<'a> {
    pub(crate) fn analyze_builtin_fn_call(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        _expected: Option<TypeId>,
        node: NodeId,
    ) -> TypeId {
        let (name, params) = match self.ast.kind(node) {
            NodeKind::FnCall(call) => (
                call.builtin_name.clone().unwrap_or_default(),
                call.params.clone(),
            ),
            _ => return self.interner.invalid,
        };

        let Some(builtin) = self.builtins.get(&name).copied() else {
            self.add_node_error(
                node,
                DiagnosticKind::Semantic,
                format!("invalid builtin function: '{}'", name),
            );
            return self.interner.invalid;
        };

        if builtin.param_count != params.len() {
            self.add_node_error(
                node,
                DiagnosticKind::Semantic,
                format!(
                    "expected {} arguments, got {}",
                    builtin.param_count,
                    params.len()
                ),
            );
            return self.interner.invalid;
        }

        match builtin.id {
            BuiltinFnId::AddWithOverflow
            | BuiltinFnId::SubWithOverflow
            | BuiltinFnId::MulWithOverflow => {
                let int_type = self.analyze_type_expr(import, scope, params[0]);
                if self.interner.entry(int_type).is_invalid() {
                    return self.interner.bool_;
                }
                if matches!(self.interner.entry(int_type).kind, TypeKind::Int { .. }) {
                    let result_ptr = self.interner.pointer_to(int_type, false);
                    self.analyze_expression(import, scope, Some(int_type), params[1]);
                    self.analyze_expression(import, scope, Some(int_type), params[2]);
                    self.analyze_expression(import, scope, Some(result_ptr), params[3]);
                } else {
                    let name = self.interner.name(int_type).to_string();
                    self.add_node_error(
                        params[0],
                        DiagnosticKind::Type,
                        format!("expected integer type, got '{}'", name),
                    );
                }
                self.interner.bool_
            }
            BuiltinFnId::Memcpy => {
                let dest_type = self.analyze_expression(import, scope, None, params[0]);
                let src_type = self.analyze_expression(import, scope, None, params[1]);
                let isize_ = self.interner.isize_;
                self.analyze_expression(import, scope, Some(isize_), params[2]);

                for (arg, arg_type) in [(params[0], dest_type), (params[1], src_type)] {
                    if !self.interner.entry(arg_type).is_invalid()
                        && !matches!(self.interner.entry(arg_type).kind, TypeKind::Pointer { .. })
                    {
                        let name = self.interner.name(arg_type).to_string();
                        self.add_node_error(
                            arg,
                            DiagnosticKind::Type,
                            format!("expected pointer argument, got '{}'", name),
                        );
                    }
                }

                if let (
                    TypeKind::Pointer { pointee: dest_pointee, .. },
                    TypeKind::Pointer { pointee: src_pointee, .. },
                ) = (
                    &self.interner.entry(dest_type).kind,
                    &self.interner.entry(src_type).kind,
                ) {
                    let dest_align = self.interner.entry(*dest_pointee).align_in_bits;
                    let src_align = self.interner.entry(*src_pointee).align_in_bits;
                    if dest_align != src_align {
                        let dest_name = self.interner.name(dest_type).to_string();
                        let src_name = self.interner.name(src_type).to_string();
                        self.add_node_error(
                            params[0],
                            DiagnosticKind::Type,
                            format!(
                                "misaligned memcpy, '{}' has alignment {}, '{}' has alignment {}",
                                dest_name,
                                dest_align / 8,
                                src_name,
                                src_align / 8
                            ),
                        );
                    }
                }

                self.interner.void
            }
            BuiltinFnId::Memset => {
                let dest_type = self.analyze_expression(import, scope, None, params[0]);
                let u8_ = self.interner.u8_;
                let isize_ = self.interner.isize_;
                self.analyze_expression(import, scope, Some(u8_), params[1]);
                self.analyze_expression(import, scope, Some(isize_), params[2]);

                if !self.interner.entry(dest_type).is_invalid()
                    && !matches!(self.interner.entry(dest_type).kind, TypeKind::Pointer { .. })
                {
                    let name = self.interner.name(dest_type).to_string();
                    self.add_node_error(
                        params[0],
                        DiagnosticKind::Type,
                        format!("expected pointer argument, got '{}'", name),
                    );
                }
                self.interner.void
            }
            BuiltinFnId::Sizeof => {
                let type_entry = self.analyze_type_expr(import, scope, params[0]);
                if self.interner.entry(type_entry).is_invalid() {
                    self.interner.invalid
                } else if matches!(self.interner.entry(type_entry).kind, TypeKind::Unreachable) {
                    let first = self.ast.first_executing_node(params[0]);
                    let name = self.interner.name(type_entry).to_string();
                    self.add_node_error(
                        first,
                        DiagnosticKind::Type,
                        format!("no size available for type '{}'", name),
                    );
                    self.interner.invalid
                } else {
                    let size_in_bytes = self.interner.size_in_bits(type_entry) / 8;
                    self.resolve_const_unsigned_num_lit(node, size_in_bytes)
                }
            }
            BuiltinFnId::MaxValue => self.analyze_min_max_value(import, scope, node, params[0], true),
            BuiltinFnId::MinValue => {
                self.analyze_min_max_value(import, scope, node, params[0], false)
            }
            BuiltinFnId::MemberCount => {
                let type_entry = self.analyze_type_expr(import, scope, params[0]);
                if self.interner.entry(type_entry).is_invalid() {
                    return type_entry;
                }
                match &self.interner.entry(type_entry).kind {
                    TypeKind::Enum(info) => {
                        let count = info.fields.len() as u64;
                        self.resolve_const_unsigned_num_lit(node, count)
                    }
                    _ => {
                        let name = self.interner.name(type_entry).to_string();
                        self.add_node_error(
                            node,
                            DiagnosticKind::Type,
                            format!("no value count available for type '{}'", name),
                        );
                        self.interner.invalid
                    }
                }
            }
            BuiltinFnId::Typeof => {
                let type_entry = self.analyze_expression(import, scope, None, params[0]);
                match &self.interner.entry(type_entry).kind {
                    TypeKind::Invalid => type_entry,
                    TypeKind::NumLitFloat | TypeKind::NumLitInt | TypeKind::UndefLit => {
                        let name = self.interner.name(type_entry).to_string();
                        self.add_node_error(
                            params[0],
                            DiagnosticKind::Type,
                            format!("type '{}' not eligible for @typeof", name),
                        );
                        self.interner.invalid
                    }
                    _ => self.resolve_const_type(node, type_entry),
                }
            }
            BuiltinFnId::CInclude => {
                let Some(text) = self.c_import_directive_arg(import, scope, node, params[0], "@c_include")
                else {
                    return self.interner.void;
                };
                let buf_index = self.scopes.scope(scope).c_import_buf.unwrap();
                self.c_import_bufs[buf_index].push_str(&format!("#include <{}>\n", text));
                self.interner.void
            }
            BuiltinFnId::CDefine => {
                let Some(name_text) =
                    self.c_import_directive_arg(import, scope, node, params[0], "@c_define")
                else {
                    return self.interner.void;
                };
                let Some(value_text) =
                    self.c_import_directive_arg(import, scope, node, params[1], "@c_define")
                else {
                    return self.interner.void;
                };
                let buf_index = self.scopes.scope(scope).c_import_buf.unwrap();
                self.c_import_bufs[buf_index]
                    .push_str(&format!("#define {} {}\n", name_text, value_text));
                self.interner.void
            }
            BuiltinFnId::CUndef => {
                let Some(text) = self.c_import_directive_arg(import, scope, node, params[0], "@c_undef")
                else {
                    return self.interner.void;
                };
                let buf_index = self.scopes.scope(scope).c_import_buf.unwrap();
                self.c_import_bufs[buf_index].push_str(&format!("#undef {}\n", text));
                self.interner.void
            }
        }
    }

    /// validates a constant string argument of a c-import directive and
    /// returns its text
    fn c_import_directive_arg(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        arg: NodeId,
        builtin_name: &str,
    ) -> Option<String> {
        if self.scopes.scope(scope).c_import_buf.is_none() {
            self.add_node_error(
                node,
                DiagnosticKind::Semantic,
                format!("{} valid only in c_import blocks", builtin_name),
            );
            return None;
        }

        let str_type = self.interner.slice_of(self.interner.u8_, true);
        let resolved = self.analyze_expression(import, scope, Some(str_type), arg);
        if self.interner.entry(resolved).is_invalid() {
            return None;
        }

        match self.const_slice_bytes(arg) {
            Some(bytes) => Some(String::from_utf8_lossy(&bytes).to_string()),
            None => {
                self.add_node_error(
                    arg,
                    DiagnosticKind::Semantic,
                    format!("{} requires constant expression", builtin_name),
                );
                None
            }
        }
    }

    fn analyze_min_max_value(
        &mut self,
        import: ImportId,
        scope: ScopeId,
        node: NodeId,
        type_node: NodeId,
        is_max: bool,
    ) -> TypeId {
        let type_entry = self.analyze_type_expr(import, scope, type_node);
        let entry_kind = self.interner.entry(type_entry).kind.clone();
        match entry_kind {
            TypeKind::Invalid => self.interner.invalid,
            TypeKind::Int { is_signed } => {
                let bits = self.interner.size_in_bits(type_entry) as u32;
                let value = if is_max {
                    if is_signed {
                        let magnitude = if bits >= 64 {
                            i64::MAX as u64
                        } else {
                            (1u64 << (bits - 1)) - 1
                        };
                        BigNum::from_unsigned(magnitude)
                    } else {
                        let magnitude = if bits >= 64 {
                            u64::MAX
                        } else {
                            (1u64 << bits) - 1
                        };
                        BigNum::from_unsigned(magnitude)
                    }
                } else if is_signed {
                    let magnitude = if bits >= 64 {
                        1u64 << 63
                    } else {
                        1u64 << (bits - 1)
                    };
                    BigNum::Int {
                        negative: true,
                        magnitude,
                    }
                } else {
                    BigNum::from_unsigned(0)
                };
                self.set_const(node, ConstVal::Num(value));
                type_entry
            }
            TypeKind::Float => {
                // the float limits are not folded yet; the expression keeps
                // its type so analysis can continue
                self.ice(
                    node,
                    "min/max value folding for float types is not implemented",
                );
                type_entry
            }
            TypeKind::Bool => self.resolve_const_bool(node, is_max),
            _ => {
                let name = self.interner.name(type_entry).to_string();
                let which = if is_max { "max" } else { "min" };
                self.add_node_error(
                    node,
                    DiagnosticKind::Type,
                    format!("no {} value available for type '{}'", which, name),
                );
                self.interner.invalid
            }
        }
    }
}
