pub mod codegen;
pub mod emitter;

pub use codegen::{BuildKind, CodeGen, CodeGenError, Module};
pub use emitter::{EmitError, Emitter};
