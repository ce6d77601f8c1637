use crate::error::{Diagnostic, Reporter, Severity};
use codespan_reporting::diagnostic::{
    Diagnostic as CodespanDiagnostic, Label, Severity as CodespanSeverity,
};
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use codespan_reporting::term::{self, Config};

use codespan::FileId;

/// convert a beryl diagnostic to a codespan-reporting diagnostic
pub fn convert_diagnostic(diag: &Diagnostic) -> CodespanDiagnostic<FileId> {
    let severity = match diag.severity {
        Severity::Error => CodespanSeverity::Error,
        Severity::Warning => CodespanSeverity::Warning,
        Severity::Note => CodespanSeverity::Note,
    };

    let mut codespan_diag = CodespanDiagnostic::new(severity)
        .with_code(diag.kind.code())
        .with_message(&diag.message)
        .with_labels(vec![Label::primary(
            diag.file_id,
            usize::from(diag.span.start())..usize::from(diag.span.end()),
        )]);

    if !diag.notes.is_empty() {
        codespan_diag = codespan_diag.with_notes(diag.notes.clone());
    }

    codespan_diag
}

/// display all diagnostics from a reporter, in its emission order
pub fn display_diagnostics(reporter: &Reporter, color_choice: ColorChoice) {
    let files = reporter.files();
    let diagnostics = reporter.diagnostics();

    if diagnostics.is_empty() {
        return;
    }

    let writer = StandardStream::stderr(color_choice);
    let config = Config::default();

    for diag in diagnostics {
        let codespan_diag = convert_diagnostic(diag);
        let _ = term::emit(&mut writer.lock(), &config, files, &codespan_diag);
    }
}

/// error and warning totals; the reporter counts as it accumulates
pub fn count_diagnostics(reporter: &Reporter) -> (usize, usize) {
    (reporter.error_count(), reporter.warning_count())
}
