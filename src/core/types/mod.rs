pub mod interner;
pub mod ty;

pub use interner::TypeInterner;
pub use ty::{CallConv, EnumField, EnumInfo, FnId, FnSig, StructField, StructInfo, TypeEntry, TypeId, TypeKind};
