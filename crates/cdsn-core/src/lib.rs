//! CDSN Core
//!
//! Toolchain for the Crater Dog Syntax Notation, a notation for writing
//! down the syntax of other languages. This crate scans and parses notation
//! documents, validates them, writes them back out in canonical layout, and
//! analyzes them into the names and regular expressions a code generator
//! for the described language needs.
//!
//! ```rust,ignore
//! let syntax = cdsn_core::parse_source(&source)?;
//! cdsn_core::Validator::new().validate_syntax(&syntax)?;
//! let canonical = cdsn_core::Formatter::new().format_syntax(&syntax)?;
//! let analysis = cdsn_core::Analyzer::new().analyze_syntax(&syntax)?;
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod notation;
pub mod result;
pub mod semantic;

// Configuration system
pub use config::{
    AnalyzerConfiguration, CdsnConfig, ConfigLoader, FormatterConfiguration, ScannerConfiguration,
};
pub use error::{ErrorKind, NotationError};
pub use notation::{
    FormatOptions, Formatter, Methodical, Parser, Processor, RoundTripReport, RoundTripValidator,
    Scanner, Syntax, Token, TokenType, Visitor, scan,
};
pub use result::{Result, ResultExt};
pub use semantic::{Analysis, Analyzer, Attribute, AttributeKind, Validator};

/// Parse a notation document with default settings
pub fn parse_source(source: &str) -> Result<Syntax> {
    Parser::new().parse_source(source)
}

/// Parse and validate a document, then render it in canonical layout
pub fn format_source(source: &str) -> Result<String> {
    let syntax = parse_source(source)?;
    Validator::new().validate_syntax(&syntax)?;
    Formatter::new().format_syntax(&syntax)
}

/// Parse, validate and analyze a document
pub fn analyze_source(source: &str) -> Result<Analysis> {
    let syntax = parse_source(source)?;
    Validator::new().validate_syntax(&syntax)?;
    Analyzer::new().analyze_syntax(&syntax)
}

/// Initialize the tracing subscriber for logging
///
/// `directive` is used unless `RUST_LOG` is set. Output goes to stderr so it
/// never mixes with formatted documents or JSON written to stdout.
pub fn init_tracing(directive: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
