//! CDSN CLI
//!
//! Command-line interface for the CDSN grammar toolchain

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "cdsn")]
#[command(about = "CDSN: format, validate and analyze syntax notation documents")]
#[command(version = cdsn_core::VERSION)]
#[command(
    long_about = "cdsn works with documents written in the Crater Dog Syntax Notation.\n\
\n\
Examples:\n  \
cdsn fmt --check grammars/         # Check that documents are canonical\n  \
cdsn fmt --write language.cdsn     # Rewrite a document in canonical layout\n  \
cdsn validate grammars/            # Report syntax and semantic errors\n  \
cdsn analyze --json language.cdsn  # Names and regexes for a code generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.cdsnrc.toml/.cdsnrc.json/cdsn.yaml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write documents in canonical layout
    #[command(alias = "format")]
    Fmt {
        /// Files or directories to format
        #[arg(help = "Files or directories to format (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Rewrite files in place
        #[arg(long, help = "Write formatted output back to the files")]
        write: bool,

        /// Check formatting without modifying files
        #[arg(
            long,
            help = "Exit with an error if any file is not in canonical layout",
            conflicts_with = "write"
        )]
        check: bool,

        /// Indentation size
        #[arg(long, help = "Number of spaces for indentation")]
        indent_size: Option<usize>,
    },

    /// Parse and validate documents
    #[command(alias = "check")]
    Validate {
        /// Files or directories to validate
        #[arg(help = "Files or directories to validate (default: current directory)")]
        paths: Vec<PathBuf>,
    },

    /// Analyze a document for code generation
    Analyze {
        /// Document to analyze
        path: PathBuf,

        /// Print the analysis as JSON
        #[arg(long, help = "Output the analysis as JSON")]
        json: bool,
    },

    /// Print the token stream of a document
    Tokens {
        /// Document to scan
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    let log_level = match cli.verbose {
        0 => "cdsn=error",
        1 => "cdsn=warn",
        2 => "cdsn=info",
        3 => "cdsn=debug",
        _ => "cdsn=trace",
    };
    cdsn_core::init_tracing(log_level);

    match run_command(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("cdsn failed: {:#}", e);
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Fmt {
            paths,
            write,
            check,
            indent_size,
        } => commands::format_command(with_default(paths), write, check, indent_size, cli.config),
        Commands::Validate { paths } => commands::validate_command(with_default(paths), cli.config),
        Commands::Analyze { path, json } => commands::analyze_command(path, json, cli.config),
        Commands::Tokens { path } => commands::tokens_command(path),
    }
}

fn with_default(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    }
}
