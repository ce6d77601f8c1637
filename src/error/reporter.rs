use crate::error::diagnostic::{Diagnostic, Severity};
use codespan::{FileId, Files};

/// append-only diagnostic sink for one compilation session.
///
/// declarations resolve on demand, out of textual order, so diagnostics
/// arrive out of order too. the sink keeps them sorted by file
/// registration order and byte offset, which is the emission order the
/// pipeline guarantees: source order within a file, import order across
/// files.
pub struct Reporter {
    files: Files<String>,
    // registration order of file ids, the cross-file sort key
    file_sequence: Vec<FileId>,
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
    internal_count: usize,
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            files: Files::new(),
            file_sequence: Vec::new(),
            diagnostics: Vec::new(),
            error_count: 0,
            warning_count: 0,
            internal_count: 0,
        }
    }

    pub fn add_file(&mut self, name: String, source: String) -> FileId {
        let file_id = self.files.add(name, source);
        self.file_sequence.push(file_id);
        file_id
    }

    /// where a diagnostic belongs in the emission order; diagnostics of
    /// files never registered here sort last
    fn source_order(&self, diagnostic: &Diagnostic) -> (usize, usize) {
        let file_index = self
            .file_sequence
            .iter()
            .position(|&file_id| file_id == diagnostic.file_id)
            .unwrap_or(usize::MAX);
        (file_index, diagnostic.span.start().to_usize())
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Note => {}
        }
        if diagnostic.is_internal() {
            self.internal_count += 1;
        }

        // stable insertion: later reports at the same position stay later
        let key = self.source_order(&diagnostic);
        let index = self
            .diagnostics
            .partition_point(|existing| self.source_order(existing) <= key);
        self.diagnostics.insert(index, diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// a compiler bug was reported through the normal channel
    pub fn has_internal_errors(&self) -> bool {
        self.internal_count > 0
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn files(&self) -> &Files<String> {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut Files<String> {
        &mut self.files
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
