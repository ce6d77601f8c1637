use crate::backend::null::NullBackendFactory;
use crate::backend::ports::{CodeGen, Emitter};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Null,
}

impl BackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Null => "null",
        }
    }
}

pub trait BackendFactory {
    fn create_codegen(&self) -> Result<Box<dyn CodeGen>, BackendError>;

    fn create_emitter(&self) -> Result<Box<dyn Emitter>, BackendError>;

    fn backend_type(&self) -> BackendType;
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend '{0}' is not available")]
    NotAvailable(String),

    #[error("backend creation failed: {0}")]
    CreationFailed(String),
}

pub struct BackendRegistry {
    factories: Vec<Box<dyn BackendFactory>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            factories: vec![Box::new(NullBackendFactory)],
        }
    }

    pub fn get_factory(&self, backend_type: BackendType) -> Option<&dyn BackendFactory> {
        self.factories
            .iter()
            .find(|f| f.backend_type() == backend_type)
            .map(|f| f.as_ref())
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}
