use crate::frontend::semantic::Analyzer;
use thiserror::Error;

/// a compiled module, opaque to the front-end
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildKind {
    Exe,
    Lib,
    Obj,
}

impl BuildKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "executable" | "exe" => Some(Self::Exe),
            "lib" => Some(Self::Lib),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }
}

/// consumes the typed output of the semantic core: for every function
/// definition the resolved fn type, the body with populated per-node
/// results, the alloca lists and the pre-order scope list; for every global
/// constant the folded value verbatim. the backend never re-evaluates
/// constants.
pub trait CodeGen {
    fn generate(&mut self, program: &Analyzer<'_>, name: &str) -> Result<Module, CodeGenError>;

    fn set_build_kind(&mut self, kind: BuildKind);

    fn set_target_triple(&mut self, triple: String);
}

#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error("code generation failed: {0}")]
    GenerationFailed(String),

    #[error("invalid target triple: {0}")]
    InvalidTarget(String),

    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),
}
