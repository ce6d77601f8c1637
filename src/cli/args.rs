use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "beryl")]
#[command(about = "Beryl compiler - a small systems programming language", long_about = None)]
#[command(version)]
pub struct Cli {
    /// input source file
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// output file path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// output name when the source has no export declaration
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// target triple
    #[arg(long, value_name = "TRIPLE")]
    pub target: Option<String>,

    /// link library
    #[arg(short = 'l', long, value_name = "LIB")]
    pub link: Vec<String>,

    /// verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// quiet mode
    #[arg(short, long)]
    pub quiet: bool,

    /// when to use colors
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorWhen,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// build the input file
    Build {
        /// input source file
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// output file path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// type check without codegen
    Check {
        /// input source file
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl ColorWhen {
    pub fn should_color(&self) -> bool {
        match self {
            ColorWhen::Always => true,
            ColorWhen::Never => false,
            ColorWhen::Auto => atty::is(atty::Stream::Stdout),
        }
    }
}

/// compilation configuration derived from cli arguments
#[derive(Debug, Clone)]
pub struct CompileConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub name: Option<String>,
    pub target: Option<String>,
    pub link_libs: Vec<String>,
    pub verbose: bool,
    pub quiet: bool,
    pub color: ColorWhen,
    pub check_only: bool,
}

impl CompileConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, String> {
        let (input, output, check_only) = match &cli.command {
            Some(Commands::Build { input, output }) => (
                input.clone().or_else(|| cli.input.clone()),
                output.clone().or_else(|| cli.output.clone()),
                false,
            ),
            Some(Commands::Check { input }) => {
                (input.clone().or_else(|| cli.input.clone()), None, true)
            }
            None => (cli.input.clone(), cli.output.clone(), false),
        };
        let input = input.ok_or_else(|| "No input file specified".to_string())?;

        Ok(CompileConfig {
            input,
            output,
            name: cli.name.clone(),
            target: cli.target.clone(),
            link_libs: cli.link.clone(),
            verbose: cli.verbose,
            quiet: cli.quiet,
            color: cli.color,
            check_only,
        })
    }
}
