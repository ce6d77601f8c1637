use crate::backend::ports::codegen::BuildKind;
use crate::backend::{BackendRegistry, BackendType};
use crate::cli::args::CompileConfig;
use crate::cli::error_display::{count_diagnostics, display_diagnostics};
use crate::cli::output::Output;
use crate::core::ast::{Ast, ImportId, NodeId, NodeKind};
use crate::error::{Diagnostic, DiagnosticKind, Reporter};
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::frontend::semantic::{Analyzer, NullHeaderIngest, Session};
use codespan::{ByteIndex, FileId, Span};
use codespan_reporting::term::termcolor::ColorChoice;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::PathBuf;

pub struct CompileResult {
    pub reporter: Reporter,
    pub success: bool,
    pub files_compiled: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("IO error: {0}")]
    IoError(String),
}

struct ParsedFile {
    root: NodeId,
    file_id: FileId,
    path: String,
}

/// compiler orchestrator: reads the root file, follows imports, runs the
/// semantic core, and hands the typed output to a backend
pub struct Compiler {
    config: CompileConfig,
}

impl Compiler {
    pub fn new(config: CompileConfig) -> Self {
        Self { config }
    }

    pub fn compile(&mut self) -> Result<CompileResult, CompileError> {
        let mut reporter = Reporter::new();
        let mut ast = Ast::new();

        if self.config.verbose {
            Output::processing_file(self.config.input.to_string_lossy().as_ref());
        }

        let source_dir = self
            .config
            .input
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();

        let root_source = fs::read_to_string(&self.config.input)
            .map_err(|e| CompileError::IoError(format!("failed to read input file: {}", e)))?;

        let mut files: Vec<ParsedFile> = Vec::new();
        let mut path_to_index: HashMap<String, usize> = HashMap::new();
        let mut import_edges: Vec<(NodeId, usize)> = Vec::new();

        let root_path = self.config.input.to_string_lossy().to_string();
        let (root_node, root_file_id) =
            parse_source(&mut ast, &mut reporter, root_path.clone(), root_source, 0);
        files.push(ParsedFile {
            root: root_node,
            file_id: root_file_id,
            path: root_path.clone(),
        });
        path_to_index.insert(root_path, 0);

        // transitively parse sibling imports, each file once
        let mut queue: VecDeque<usize> = VecDeque::from([0usize]);
        while let Some(index) = queue.pop_front() {
            let decls = match ast.kind(files[index].root) {
                NodeKind::Root(root) => root.decls.clone(),
                _ => continue,
            };
            for decl in decls {
                let import_path = match ast.kind(decl) {
                    NodeKind::Import(import) => import.path.clone(),
                    _ => continue,
                };
                if let Some(&target) = path_to_index.get(&import_path) {
                    import_edges.push((decl, target));
                    continue;
                }
                let full_path = source_dir.join(&import_path);
                match fs::read_to_string(&full_path) {
                    Ok(source) => {
                        let next_index = files.len();
                        let (root, file_id) = parse_source(
                            &mut ast,
                            &mut reporter,
                            import_path.clone(),
                            source,
                            next_index,
                        );
                        files.push(ParsedFile {
                            root,
                            file_id,
                            path: import_path.clone(),
                        });
                        path_to_index.insert(import_path, next_index);
                        import_edges.push((decl, next_index));
                        queue.push_back(next_index);
                    }
                    Err(_) => {
                        let span = ast.span(decl);
                        let file_id = files[index].file_id;
                        reporter.add_diagnostic(Diagnostic::error(
                            DiagnosticKind::Semantic,
                            span,
                            file_id,
                            format!("unable to find '{}'", import_path),
                        ));
                    }
                }
            }
        }

        let parse_ok = !reporter.has_errors();
        let files_compiled = files.len();

        let mut header = NullHeaderIngest;
        let mut analyzer = Analyzer::new(&mut reporter, &mut ast, Session::default(), &mut header);
        for file in &files {
            analyzer.add_import(file.root, file.file_id, file.path.clone());
        }
        for (node, target) in import_edges {
            analyzer.set_import_target(node, ImportId(target as u32));
        }

        if parse_ok {
            analyzer.analyze();

            // the output name comes from the export declaration or --name
            if analyzer.root_export.is_none()
                && self.config.name.is_none()
                && !self.config.check_only
            {
                let file_id = files[0].file_id;
                analyzer.reporter.add_diagnostic(Diagnostic::error(
                    DiagnosticKind::Semantic,
                    Span::new(ByteIndex(0), ByteIndex(0)),
                    file_id,
                    "missing export declaration and output name not provided".to_string(),
                ));
            }
        }

        // a non-empty error list suppresses backend artifacts
        if parse_ok && !analyzer.reporter.has_errors() && !self.config.check_only {
            if let Err(e) = self.run_backend(&analyzer) {
                if self.config.verbose {
                    Output::warning(&format!("backend codegen failed: {}", e));
                }
            }
        }

        drop(analyzer);

        let success = !reporter.has_errors();
        Ok(CompileResult {
            reporter,
            success,
            files_compiled,
        })
    }

    fn run_backend(&self, program: &Analyzer<'_>) -> Result<(), String> {
        let registry = BackendRegistry::new();
        let factory = registry
            .get_factory(BackendType::Null)
            .ok_or_else(|| "no backend available".to_string())?;

        let mut codegen = factory
            .create_codegen()
            .map_err(|e| format!("failed to create backend: {}", e))?;

        let (build_kind, export_name) = match program.root_export {
            Some(node) => match program.ast.kind(node) {
                NodeKind::RootExport(export) => (
                    BuildKind::from_str(&export.kind).unwrap_or(BuildKind::Obj),
                    Some(export.name.clone()),
                ),
                _ => (BuildKind::Obj, None),
            },
            None => (BuildKind::Obj, None),
        };
        let name = export_name
            .or_else(|| self.config.name.clone())
            .unwrap_or_else(|| "out".to_string());

        codegen.set_build_kind(build_kind);
        if let Some(target) = &self.config.target {
            codegen.set_target_triple(target.clone());
        }

        let module = codegen
            .generate(program, &name)
            .map_err(|e| format!("backend compilation failed: {}", e))?;

        if let Some(output) = &self.config.output {
            let emitter = factory
                .create_emitter()
                .map_err(|e| format!("failed to create emitter: {}", e))?;
            let mut link_libs = program.link_libs.clone();
            link_libs.extend(self.config.link_libs.iter().cloned());
            match build_kind {
                BuildKind::Exe => emitter
                    .link_executable(&module, output, &link_libs)
                    .map_err(|e| e.to_string())?,
                BuildKind::Lib | BuildKind::Obj => emitter
                    .emit_object(&module, output)
                    .map_err(|e| e.to_string())?,
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }
}

fn parse_source(
    ast: &mut Ast,
    reporter: &mut Reporter,
    name: String,
    source: String,
    import_index: usize,
) -> (NodeId, FileId) {
    let file_id = reporter.add_file(name, source.clone());
    let mut lexer = Lexer::new(&source, file_id, reporter);
    let tokens = lexer.tokenize();
    let mut parser = Parser::new(tokens, file_id, ImportId(import_index as u32), ast, reporter);
    let root = parser.parse_root();
    (root, file_id)
}

/// display compilation results
pub fn display_results(result: &CompileResult, config: &CompileConfig) {
    let color_choice = match config.color {
        crate::cli::args::ColorWhen::Always => ColorChoice::Always,
        crate::cli::args::ColorWhen::Never => ColorChoice::Never,
        crate::cli::args::ColorWhen::Auto => ColorChoice::Auto,
    };

    let (errors, warnings) = count_diagnostics(&result.reporter);

    if !result.reporter.diagnostics().is_empty() {
        display_diagnostics(&result.reporter, color_choice);
    }

    if result.reporter.has_internal_errors() {
        Output::error("an internal invariant was violated; this is a compiler bug");
    }

    if config.verbose {
        let stats = crate::cli::output::CompileStats {
            files_compiled: result.files_compiled,
            errors,
            warnings,
        };
        Output::summary(&stats);
    }

    if !config.quiet {
        if result.success {
            if let Some(output) = &config.output {
                Output::build_success(output.to_string_lossy().as_ref());
            } else {
                Output::build_success("(no output file specified)");
            }
        } else {
            Output::build_failure();
        }
    }
}
