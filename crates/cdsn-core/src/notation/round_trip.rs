//! Round-trip checking for notation documents
//!
//! A document is canonical when parsing and formatting it reproduces it
//! exactly. Formatting must also be idempotent: formatting the formatted text
//! again changes nothing.
//!
//! ```rust,ignore
//! use cdsn_core::notation::RoundTripValidator;
//!
//! let report = RoundTripValidator::new().check(source)?;
//! if !report.is_canonical() {
//!     println!("first difference at {:?}", report.first_difference());
//! }
//! ```

use super::formatter::{FormatOptions, Formatter};
use super::parser::Parser;
use crate::result::Result;
use crate::semantic::Validator;

/// The three texts of a round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripReport {
    /// Source as given
    pub original: String,
    /// Source after one parse and format
    pub formatted: String,
    /// Formatted text after a second parse and format
    pub reformatted: String,
}

impl RoundTripReport {
    /// The original was already in canonical layout
    pub fn is_canonical(&self) -> bool {
        self.original == self.formatted
    }

    /// Formatting a second time changed nothing
    pub fn is_idempotent(&self) -> bool {
        self.formatted == self.reformatted
    }

    /// 1-based line and column of the first mismatch
    ///
    /// Compares the original with the formatted text, or when those agree the
    /// formatted text with the reformatted one.
    pub fn first_difference(&self) -> Option<(usize, usize)> {
        if !self.is_canonical() {
            return first_difference(&self.original, &self.formatted);
        }
        first_difference(&self.formatted, &self.reformatted)
    }
}

fn first_difference(left: &str, right: &str) -> Option<(usize, usize)> {
    let mut line = 1;
    let mut column = 1;
    let mut left_chars = left.chars();
    let mut right_chars = right.chars();
    loop {
        match (left_chars.next(), right_chars.next()) {
            (None, None) => return None,
            (Some(a), Some(b)) if a == b => {
                if a == '\n' {
                    line += 1;
                    column = 1;
                } else {
                    column += 1;
                }
            }
            _ => return Some((line, column)),
        }
    }
}

/// Parses, validates and formats a source twice
#[derive(Debug, Clone, Default)]
pub struct RoundTripValidator {
    parser: Parser,
    format_options: FormatOptions,
}

impl RoundTripValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(parser: Parser, format_options: FormatOptions) -> Self {
        Self {
            parser,
            format_options,
        }
    }

    /// Run the round trip, failing on the first parse or validation error
    pub fn check(&self, source: &str) -> Result<RoundTripReport> {
        let mut formatter = Formatter::with_options(self.format_options.clone());

        let syntax = self.parser.parse_source(source)?;
        Validator::new().validate_syntax(&syntax)?;
        let formatted = formatter.format_syntax(&syntax)?;

        let reparsed = self.parser.parse_source(&formatted)?;
        let reformatted = formatter.format_syntax(&reparsed)?;

        Ok(RoundTripReport {
            original: source.to_string(),
            formatted,
            reformatted,
        })
    }
}
