use crate::backend::factory::{BackendError, BackendFactory, BackendType};
use crate::backend::ports::codegen::{BuildKind, CodeGen, CodeGenError, Module};
use crate::backend::ports::emitter::{EmitError, Emitter};
use crate::frontend::semantic::Analyzer;
use std::path::Path;

/// backend used by check builds and tests: consumes the typed program and
/// produces nothing
pub struct NullBackendFactory;

impl BackendFactory for NullBackendFactory {
    fn create_codegen(&self) -> Result<Box<dyn CodeGen>, BackendError> {
        Ok(Box::new(NullCodeGen::new()))
    }

    fn create_emitter(&self) -> Result<Box<dyn Emitter>, BackendError> {
        Ok(Box::new(NullEmitter))
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Null
    }
}

struct NullCodeGen {
    build_kind: BuildKind,
    target_triple: String,
}

impl NullCodeGen {
    fn new() -> Self {
        Self {
            build_kind: BuildKind::Obj,
            target_triple: "unknown-unknown-unknown".to_string(),
        }
    }
}

impl CodeGen for NullCodeGen {
    fn generate(&mut self, program: &Analyzer<'_>, name: &str) -> Result<Module, CodeGenError> {
        // walk the typed output so contract violations surface even with no
        // real backend: every function definition must carry a resolved type
        for &fn_id in &program.fn_defs {
            let entry = &program.fns[fn_id.0 as usize];
            if program.interner.entry(entry.type_id).fn_sig().is_none() {
                return Err(CodeGenError::GenerationFailed(format!(
                    "function '{}' has no resolved type",
                    entry.symbol_name
                )));
            }
        }
        let _ = (self.build_kind, &self.target_triple);
        Ok(Module {
            name: name.to_string(),
        })
    }

    fn set_build_kind(&mut self, kind: BuildKind) {
        self.build_kind = kind;
    }

    fn set_target_triple(&mut self, triple: String) {
        self.target_triple = triple;
    }
}

struct NullEmitter;

impl Emitter for NullEmitter {
    fn emit_object(&self, _module: &Module, _output: &Path) -> Result<(), EmitError> {
        Err(EmitError::EmissionFailed(
            "null backend does not support object emission".to_string(),
        ))
    }

    fn link_executable(
        &self,
        _module: &Module,
        _output: &Path,
        _link_libs: &[String],
    ) -> Result<(), EmitError> {
        Err(EmitError::LinkFailed(
            "null backend does not support linking".to_string(),
        ))
    }
}
