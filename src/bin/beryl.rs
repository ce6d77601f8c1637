use byc::cli::args::{Cli, CompileConfig};
use byc::cli::compiler::{display_results, Compiler};
use byc::cli::output::Output;
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();

    match CompileConfig::from_cli(&cli) {
        Ok(config) => {
            let mut compiler = Compiler::new(config.clone());
            match compiler.compile() {
                Ok(result) => {
                    display_results(&result, &config);
                    if !result.success {
                        process::exit(1);
                    }
                }
                Err(e) => {
                    Output::error(&format!("compilation failed: {}", e));
                    process::exit(1);
                }
            }
        }
        Err(e) => {
            Output::error(&e);
            process::exit(1);
        }
    }
}
