use crate::core::ast::NodeId;
use crate::core::types::ty::{
    EnumInfo, FnSig, StructInfo, TypeEntry, TypeId, TypeKind,
};
use std::collections::HashMap;

/// canonicalizes every structural type behind a single handle.
/// idempotent and order independent: two calls with equal parameters
/// return the same handle.
pub struct TypeInterner {
    entries: Vec<TypeEntry>,
    pointer_types: HashMap<(TypeId, bool), TypeId>,
    slice_types: HashMap<(TypeId, bool), TypeId>,
    array_types: HashMap<(TypeId, u64), TypeId>,
    maybe_types: HashMap<TypeId, TypeId>,
    error_union_types: HashMap<TypeId, TypeId>,
    fn_types: HashMap<FnSig, TypeId>,
    primitive_names: HashMap<String, TypeId>,

    pointer_size_bytes: u64,
    // width of the shared error tag; fixed once error values are counted
    err_tag_type: Option<TypeId>,

    pub invalid: TypeId,
    pub meta_type: TypeId,
    pub void: TypeId,
    pub bool_: TypeId,
    pub unreachable: TypeId,
    pub num_lit_int: TypeId,
    pub num_lit_float: TypeId,
    pub undef_lit: TypeId,
    pub pure_error: TypeId,
    pub isize_: TypeId,
    pub usize_: TypeId,
    pub f32_: TypeId,
    pub f64_: TypeId,
    pub u8_: TypeId,
    pub u16_: TypeId,
    pub u32_: TypeId,
    pub u64_: TypeId,
    pub i8_: TypeId,
    pub i16_: TypeId,
    pub i32_: TypeId,
    pub i64_: TypeId,
}

impl TypeInterner {
    pub fn new(pointer_size_bytes: u64) -> Self {
        let mut interner = TypeInterner {
            entries: Vec::new(),
            pointer_types: HashMap::new(),
            slice_types: HashMap::new(),
            array_types: HashMap::new(),
            maybe_types: HashMap::new(),
            error_union_types: HashMap::new(),
            fn_types: HashMap::new(),
            primitive_names: HashMap::new(),
            pointer_size_bytes,
            err_tag_type: None,
            invalid: TypeId(0),
            meta_type: TypeId(0),
            void: TypeId(0),
            bool_: TypeId(0),
            unreachable: TypeId(0),
            num_lit_int: TypeId(0),
            num_lit_float: TypeId(0),
            undef_lit: TypeId(0),
            pure_error: TypeId(0),
            isize_: TypeId(0),
            usize_: TypeId(0),
            f32_: TypeId(0),
            f64_: TypeId(0),
            u8_: TypeId(0),
            u16_: TypeId(0),
            u32_: TypeId(0),
            u64_: TypeId(0),
            i8_: TypeId(0),
            i16_: TypeId(0),
            i32_: TypeId(0),
            i64_: TypeId(0),
        };

        interner.invalid = interner.push(TypeKind::Invalid, "(invalid)", 0, 0);
        interner.meta_type = interner.push(TypeKind::MetaType, "type", 0, 0);
        interner.void = interner.push(TypeKind::Void, "void", 0, 0);
        interner.bool_ = interner.push(TypeKind::Bool, "bool", 8, 8);
        interner.unreachable = interner.push(TypeKind::Unreachable, "unreachable", 0, 0);
        interner.num_lit_int = interner.push(TypeKind::NumLitInt, "(integer literal)", 0, 0);
        interner.num_lit_float = interner.push(TypeKind::NumLitFloat, "(float literal)", 0, 0);
        interner.undef_lit = interner.push(TypeKind::UndefLit, "(undefined)", 0, 0);
        // size assigned once the error value count is known
        interner.pure_error = interner.push(TypeKind::PureError, "error", 8, 8);

        interner.u8_ = interner.push_int(false, 8, "u8");
        interner.u16_ = interner.push_int(false, 16, "u16");
        interner.u32_ = interner.push_int(false, 32, "u32");
        interner.u64_ = interner.push_int(false, 64, "u64");
        interner.i8_ = interner.push_int(true, 8, "i8");
        interner.i16_ = interner.push_int(true, 16, "i16");
        interner.i32_ = interner.push_int(true, 32, "i32");
        interner.i64_ = interner.push_int(true, 64, "i64");
        let ptr_bits = pointer_size_bytes * 8;
        interner.isize_ = interner.push_int(true, ptr_bits, "isize");
        interner.usize_ = interner.push_int(false, ptr_bits, "usize");

        interner.f32_ = interner.push(TypeKind::Float, "f32", 32, 32);
        interner.f64_ = interner.push(TypeKind::Float, "f64", 64, 64);

        for id in [
            interner.void,
            interner.bool_,
            interner.unreachable,
            interner.u8_,
            interner.u16_,
            interner.u32_,
            interner.u64_,
            interner.i8_,
            interner.i16_,
            interner.i32_,
            interner.i64_,
            interner.isize_,
            interner.usize_,
            interner.f32_,
            interner.f64_,
        ] {
            let name = interner.entries[id.0 as usize].name.clone();
            interner.primitive_names.insert(name, id);
        }

        interner
    }

    fn push(&mut self, kind: TypeKind, name: &str, size_in_bits: u64, align_in_bits: u64) -> TypeId {
        let id = TypeId(self.entries.len() as u32);
        self.entries.push(TypeEntry {
            kind,
            name: name.to_string(),
            size_in_bits,
            align_in_bits,
        });
        id
    }

    fn push_int(&mut self, is_signed: bool, bits: u64, name: &str) -> TypeId {
        self.push(TypeKind::Int { is_signed }, name, bits, bits)
    }

    pub fn entry(&self, id: TypeId) -> &TypeEntry {
        &self.entries[id.0 as usize]
    }

    pub fn entry_mut(&mut self, id: TypeId) -> &mut TypeEntry {
        &mut self.entries[id.0 as usize]
    }

    pub fn name(&self, id: TypeId) -> &str {
        &self.entries[id.0 as usize].name
    }

    pub fn size_in_bits(&self, id: TypeId) -> u64 {
        self.entries[id.0 as usize].size_in_bits
    }

    pub fn pointer_size_bytes(&self) -> u64 {
        self.pointer_size_bytes
    }

    pub fn get_primitive(&self, name: &str) -> Option<TypeId> {
        self.primitive_names.get(name).copied()
    }

    pub fn int_type(&self, is_signed: bool, bits: u64) -> TypeId {
        match (is_signed, bits) {
            (false, 8) => self.u8_,
            (false, 16) => self.u16_,
            (false, 32) => self.u32_,
            (false, 64) => self.u64_,
            (true, 8) => self.i8_,
            (true, 16) => self.i16_,
            (true, 32) => self.i32_,
            (true, 64) => self.i64_,
            _ => self.invalid,
        }
    }

    /// narrowest of u8/u16/u32/u64 that represents x
    pub fn smallest_unsigned_fitting(&self, x: u64) -> TypeId {
        if x <= u8::MAX as u64 {
            self.u8_
        } else if x <= u16::MAX as u64 {
            self.u16_
        } else if x <= u32::MAX as u64 {
            self.u32_
        } else {
            self.u64_
        }
    }

    pub fn set_error_tag_type(&mut self, tag: TypeId) {
        self.err_tag_type = Some(tag);
        let size = self.size_in_bits(tag);
        let entry = self.entry_mut(self.pure_error);
        entry.size_in_bits = size;
        entry.align_in_bits = size;
    }

    pub fn err_tag_type(&self) -> TypeId {
        self.err_tag_type.unwrap_or(self.u8_)
    }

    pub fn pointer_to(&mut self, pointee: TypeId, is_const: bool) -> TypeId {
        if let Some(&existing) = self.pointer_types.get(&(pointee, is_const)) {
            return existing;
        }
        let const_str = if is_const { "const " } else { "" };
        let name = format!("&{}{}", const_str, self.name(pointee));
        let bits = self.pointer_size_bytes * 8;
        let id = self.push(TypeKind::Pointer { pointee, is_const }, &name, bits, bits);
        self.pointer_types.insert((pointee, is_const), id);
        id
    }

    pub fn array_of(&mut self, elem: TypeId, len: u64) -> TypeId {
        if let Some(&existing) = self.array_types.get(&(elem, len)) {
            return existing;
        }
        let name = format!("[{}]{}", len, self.name(elem));
        let size = self.size_in_bits(elem) * len;
        let align = self.entry(elem).align_in_bits;
        let id = self.push(TypeKind::Array { elem, len }, &name, size, align);
        self.array_types.insert((elem, len), id);
        id
    }

    pub fn slice_of(&mut self, elem: TypeId, is_const: bool) -> TypeId {
        if let Some(&existing) = self.slice_types.get(&(elem, is_const)) {
            return existing;
        }
        // materialize the pointer half of the layout
        self.pointer_to(elem, is_const);
        let const_str = if is_const { "const " } else { "" };
        let name = format!("[]{}{}", const_str, self.name(elem));
        let ptr_bits = self.pointer_size_bytes * 8;
        let id = self.push(
            TypeKind::Slice { elem, is_const },
            &name,
            ptr_bits * 2,
            ptr_bits,
        );
        self.slice_types.insert((elem, is_const), id);
        id
    }

    pub fn maybe_of(&mut self, child: TypeId) -> TypeId {
        if let Some(&existing) = self.maybe_types.get(&child) {
            return existing;
        }
        let name = format!("?{}", self.name(child));
        let size = self.size_in_bits(child) + 8;
        let align = self.entry(child).align_in_bits.max(8);
        let id = self.push(TypeKind::Maybe { child }, &name, size, align);
        self.maybe_types.insert(child, id);
        id
    }

    pub fn error_union_of(&mut self, ok: TypeId) -> TypeId {
        if let Some(&existing) = self.error_union_types.get(&ok) {
            return existing;
        }
        let tag = self.err_tag_type();
        let tag_bits = self.size_in_bits(tag);
        let ok_bits = self.size_in_bits(ok);
        let name = format!("%{}", self.name(ok));
        // zero size payload degenerates to the bare tag
        let (size, align) = if ok_bits == 0 {
            (tag_bits, self.entry(tag).align_in_bits)
        } else {
            (tag_bits + ok_bits, self.entry(tag).align_in_bits)
        };
        let id = self.push(TypeKind::ErrorUnion { ok }, &name, size, align);
        self.error_union_types.insert(ok, id);
        id
    }

    pub fn fn_type(&mut self, sig: FnSig) -> TypeId {
        if let Some(&existing) = self.fn_types.get(&sig) {
            return existing;
        }
        let export_str = if sig.convention == crate::core::types::ty::CallConv::C {
            "export "
        } else {
            ""
        };
        let inline_str = if sig.is_inline { "inline " } else { "" };
        let naked_str = if sig.is_naked { "naked " } else { "" };
        let mut name = format!("{}{}{}fn(", export_str, inline_str, naked_str);
        for (i, param) in sig.params.iter().enumerate() {
            if i != 0 {
                name.push_str(", ");
            }
            name.push_str(self.name(*param));
        }
        if sig.is_var_args {
            if !sig.params.is_empty() {
                name.push_str(", ");
            }
            name.push_str("...");
        }
        name.push(')');
        if sig.return_type != self.void {
            name.push(' ');
            name.push_str(self.name(sig.return_type));
        }
        let bits = self.pointer_size_bytes * 8;
        let id = self.push(TypeKind::Fn(sig.clone()), &name, bits, bits);
        self.fn_types.insert(sig, id);
        id
    }

    /// fresh nominal struct entry; incomplete until its body is resolved
    pub fn new_struct(&mut self, name: &str, decl_node: NodeId, is_packed: bool) -> TypeId {
        self.push(
            TypeKind::Struct(StructInfo {
                decl_node,
                is_packed,
                fields: Vec::new(),
                fields_resolved: false,
                gen_field_count: 0,
                is_invalid: false,
                methods: HashMap::new(),
                embedded_in_current: false,
                reported_infinite_err: false,
                complete: false,
            }),
            name,
            0,
            0,
        )
    }

    /// fresh nominal enum entry; incomplete until its body is resolved
    pub fn new_enum(&mut self, name: &str, decl_node: NodeId) -> TypeId {
        self.push(
            TypeKind::Enum(EnumInfo {
                decl_node,
                fields: Vec::new(),
                fields_resolved: false,
                gen_field_count: 0,
                is_invalid: false,
                tag_type: None,
                methods: HashMap::new(),
                embedded_in_current: false,
                reported_infinite_err: false,
                complete: false,
            }),
            name,
            0,
            0,
        )
    }

    /// whether a value of this type is passed around by pointer
    pub fn is_aggregate(&self, id: TypeId) -> bool {
        match &self.entry(id).kind {
            TypeKind::Array { .. }
            | TypeKind::Struct(_)
            | TypeKind::Slice { .. }
            | TypeKind::Maybe { .. } => true,
            TypeKind::ErrorUnion { ok } => self.size_in_bits(*ok) > 0,
            TypeKind::Enum(info) => info.gen_field_count != 0,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ast::NodeId;

    #[test]
    fn test_interning_is_idempotent() {
        let mut interner = TypeInterner::new(8);
        let p1 = interner.pointer_to(interner.i32_, false);
        let p2 = interner.pointer_to(interner.i32_, false);
        assert_eq!(p1, p2);
        let pc = interner.pointer_to(interner.i32_, true);
        assert_ne!(p1, pc);

        let a1 = interner.array_of(interner.u8_, 4);
        let a2 = interner.array_of(interner.u8_, 4);
        assert_eq!(a1, a2);
        assert_ne!(a1, interner.array_of(interner.u8_, 5));

        let m1 = interner.maybe_of(interner.i32_);
        assert_eq!(m1, interner.maybe_of(interner.i32_));

        let e1 = interner.error_union_of(interner.i32_);
        assert_eq!(e1, interner.error_union_of(interner.i32_));
    }

    #[test]
    fn test_slice_const_variants_are_distinct() {
        let mut interner = TypeInterner::new(8);
        let s = interner.slice_of(interner.u8_, false);
        let sc = interner.slice_of(interner.u8_, true);
        assert_ne!(s, sc);
        // same physical layout
        assert_eq!(interner.size_in_bits(s), interner.size_in_bits(sc));
        assert_eq!(interner.name(s), "[]u8");
        assert_eq!(interner.name(sc), "[]const u8");
    }

    #[test]
    fn test_smallest_unsigned_fitting() {
        let interner = TypeInterner::new(8);
        assert_eq!(interner.smallest_unsigned_fitting(0), interner.u8_);
        assert_eq!(interner.smallest_unsigned_fitting(255), interner.u8_);
        assert_eq!(interner.smallest_unsigned_fitting(256), interner.u16_);
        assert_eq!(interner.smallest_unsigned_fitting(65535), interner.u16_);
        assert_eq!(interner.smallest_unsigned_fitting(65536), interner.u32_);
        assert_eq!(
            interner.smallest_unsigned_fitting(u32::MAX as u64 + 1),
            interner.u64_
        );
    }

    #[test]
    fn test_type_names() {
        let mut interner = TypeInterner::new(8);
        let p = interner.pointer_to(interner.u8_, true);
        assert_eq!(interner.name(p), "&const u8");
        let a = interner.array_of(interner.u8_, 3);
        assert_eq!(interner.name(a), "[3]u8");
        let m = interner.maybe_of(interner.i32_);
        assert_eq!(interner.name(m), "?i32");
        let e = interner.error_union_of(interner.i32_);
        assert_eq!(interner.name(e), "%i32");
    }

    #[test]
    fn test_struct_entries_are_nominal() {
        let mut interner = TypeInterner::new(8);
        let s1 = interner.new_struct("Foo", NodeId(0), false);
        let s2 = interner.new_struct("Foo", NodeId(1), false);
        assert_ne!(s1, s2);
    }
}
