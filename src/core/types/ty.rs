use crate::core::ast::NodeId;
use std::collections::HashMap;

/// interned type handle; two types are equal iff their handles are equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// handle into the analyzer's function table; carried by container method
/// tables so member calls resolve without a name search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FnId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallConv {
    C,
    Fast,
}

#[derive(Debug, Clone)]
pub struct StructField {
    pub name: String,
    pub type_id: TypeId,
    pub src_index: usize,
    // index into the generated layout; zero-size fields carry no slot
    pub gen_index: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct StructInfo {
    pub decl_node: NodeId,
    pub is_packed: bool,
    pub fields: Vec<StructField>,
    pub fields_resolved: bool,
    pub gen_field_count: usize,
    pub is_invalid: bool,
    pub methods: HashMap<String, FnId>,
    // set while descending into field types; a recursive visit that sees it
    // reports infinite size
    pub embedded_in_current: bool,
    pub reported_infinite_err: bool,
    pub complete: bool,
}

#[derive(Debug, Clone)]
pub struct EnumField {
    pub name: String,
    pub type_id: TypeId,
    pub tag_value: u64,
}

#[derive(Debug, Clone)]
pub struct EnumInfo {
    pub decl_node: NodeId,
    pub fields: Vec<EnumField>,
    pub fields_resolved: bool,
    pub gen_field_count: usize,
    pub is_invalid: bool,
    pub tag_type: Option<TypeId>,
    pub methods: HashMap<String, FnId>,
    pub embedded_in_current: bool,
    pub reported_infinite_err: bool,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FnSig {
    pub params: Vec<TypeId>,
    pub return_type: TypeId,
    pub is_var_args: bool,
    pub is_naked: bool,
    pub is_inline: bool,
    pub convention: CallConv,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Invalid,
    MetaType,
    Void,
    Bool,
    Unreachable,
    Int { is_signed: bool },
    Float,
    NumLitInt,
    NumLitFloat,
    UndefLit,
    Pointer { pointee: TypeId, is_const: bool },
    Array { elem: TypeId, len: u64 },
    // fat pointer { ptr, len }; const and non-const variants share a layout
    // but are distinct handles
    Slice { elem: TypeId, is_const: bool },
    Maybe { child: TypeId },
    ErrorUnion { ok: TypeId },
    PureError,
    Struct(StructInfo),
    Enum(EnumInfo),
    Fn(FnSig),
}

#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub kind: TypeKind,
    pub name: String,
    pub size_in_bits: u64,
    pub align_in_bits: u64,
}

impl TypeEntry {
    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, TypeKind::Invalid)
    }

    pub fn is_int(&self) -> bool {
        matches!(self.kind, TypeKind::Int { .. })
    }

    pub fn is_signed_int(&self) -> bool {
        matches!(self.kind, TypeKind::Int { is_signed: true })
    }

    pub fn is_num_lit(&self) -> bool {
        matches!(self.kind, TypeKind::NumLitInt | TypeKind::NumLitFloat)
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_) | TypeKind::Enum(_))
    }

    pub fn struct_info(&self) -> Option<&StructInfo> {
        match &self.kind {
            TypeKind::Struct(info) => Some(info),
            _ => None,
        }
    }

    pub fn enum_info(&self) -> Option<&EnumInfo> {
        match &self.kind {
            TypeKind::Enum(info) => Some(info),
            _ => None,
        }
    }

    pub fn fn_sig(&self) -> Option<&FnSig> {
        match &self.kind {
            TypeKind::Fn(sig) => Some(sig),
            _ => None,
        }
    }
}
