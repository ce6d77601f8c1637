use codespan::{FileId, Span};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

/// the pipeline's error taxonomy: shape errors from the tokenizer and
/// parser, then what resolution, typing, conversion checking, and the
/// semantic rules report. `Internal` marks invariant violations, which are
/// surfaced through this channel instead of aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error("parse error")]
    Parse,
    #[error("resolution error")]
    Resolution,
    #[error("type error")]
    Type,
    #[error("conversion error")]
    Conversion,
    #[error("semantic error")]
    Semantic,
    #[error("internal error")]
    Internal,
}

impl DiagnosticKind {
    /// stable code shown by the terminal renderer
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::Parse => "E0001",
            DiagnosticKind::Resolution => "E0002",
            DiagnosticKind::Type => "E0003",
            DiagnosticKind::Conversion => "E0004",
            DiagnosticKind::Semantic => "E0005",
            DiagnosticKind::Internal => "E0006",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub span: Span,
    pub file_id: FileId,
    pub message: String,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        kind: DiagnosticKind,
        span: Span,
        file_id: FileId,
        message: String,
    ) -> Self {
        Self {
            severity,
            kind,
            span,
            file_id,
            message,
            notes: Vec::new(),
        }
    }

    pub fn error(kind: DiagnosticKind, span: Span, file_id: FileId, message: String) -> Self {
        Self::new(Severity::Error, kind, span, file_id, message)
    }

    pub fn warning(kind: DiagnosticKind, span: Span, file_id: FileId, message: String) -> Self {
        Self::new(Severity::Warning, kind, span, file_id, message)
    }

    /// an invariant violation; always error severity
    pub fn internal(span: Span, file_id: FileId, message: String) -> Self {
        Self::new(Severity::Error, DiagnosticKind::Internal, span, file_id, message)
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.kind, DiagnosticKind::Internal)
    }
}
