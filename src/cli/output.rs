use owo_colors::OwoColorize;

/// color coded output utilities
pub struct Output;

impl Output {
    pub fn error(msg: &str) {
        eprintln!("{} {}", "error:".red().bold(), msg);
    }

    pub fn warning(msg: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), msg);
    }

    pub fn info(msg: &str) {
        println!("{} {}", "info:".blue().bold(), msg);
    }

    pub fn note(msg: &str) {
        println!("{} {}", "note:".cyan(), msg);
    }

    /// print compilation phase
    pub fn phase(phase: &str) {
        println!("{} {}", "→".bright_blue(), phase.bright_white());
    }

    pub fn processing_file(file: &str) {
        println!("{} {}", "Processing:".bright_cyan(), file.bright_white());
    }

    pub fn summary(stats: &CompileStats) {
        println!("\n{}", "Compilation Summary".bold().underline());
        println!(
            "  {} {}",
            "Files compiled:".bright_white(),
            stats.files_compiled.to_string().bright_green()
        );
        println!("  {} {}", "Errors:".bright_white(), stats.errors.to_string().red());
        println!(
            "  {} {}",
            "Warnings:".bright_white(),
            stats.warnings.to_string().yellow()
        );
    }

    pub fn build_success(output: &str) {
        println!("\n{} {}", "✓".green().bold(), "Build successful!".green().bold());
        println!("  {}", format!("Output: {}", output).bright_white());
    }

    pub fn build_failure() {
        println!("\n{} {}", "✗".red().bold(), "Build failed!".red().bold());
    }
}

#[derive(Debug, Default)]
pub struct CompileStats {
    pub files_compiled: usize,
    pub errors: usize,
    pub warnings: usize,
}
