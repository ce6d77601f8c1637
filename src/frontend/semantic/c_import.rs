use crate::core::ast::{Ast, ImportId, NodeId};
use crate::error::Reporter;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeaderIngestError {
    #[error("header ingestion is not available in this build")]
    Unavailable,
    #[error("{0}")]
    Failed(String),
}

/// boundary to the external C header parser. the analyzer hands it the
/// accumulated `#include`/`#define`/`#undef` directive text; the adapter
/// returns extra top-level declarations (extern fns, const aliases) that are
/// merged into the session and fed back through the dependency resolver.
pub trait HeaderIngest {
    fn parse_header(
        &mut self,
        directives: &str,
        ast: &mut Ast,
        owner: ImportId,
        reporter: &mut Reporter,
    ) -> Result<Vec<NodeId>, HeaderIngestError>;
}

/// used by check builds and tests; every c_import fails cleanly
pub struct NullHeaderIngest;

impl HeaderIngest for NullHeaderIngest {
    fn parse_header(
        &mut self,
        _directives: &str,
        _ast: &mut Ast,
        _owner: ImportId,
        _reporter: &mut Reporter,
    ) -> Result<Vec<NodeId>, HeaderIngestError> {
        Err(HeaderIngestError::Unavailable)
    }
}
