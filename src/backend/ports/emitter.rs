use crate::backend::ports::codegen::Module;
use std::path::Path;
use thiserror::Error;

/// writes a compiled module to disk and optionally invokes the linker
pub trait Emitter {
    fn emit_object(&self, module: &Module, output: &Path) -> Result<(), EmitError>;

    fn link_executable(
        &self,
        module: &Module,
        output: &Path,
        link_libs: &[String],
    ) -> Result<(), EmitError>;
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("emission failed: {0}")]
    EmissionFailed(String),

    #[error("link failed: {0}")]
    LinkFailed(String),
}
