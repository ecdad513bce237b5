//! Canonical formatter for notation documents
//!
//! Formatting a parsed canonical document reproduces it byte for byte, and
//! formatting is idempotent: `format(parse(format(parse(x)))) == format(parse(x))`.
//!
//! ```rust,ignore
//! use cdsn_core::notation::{Formatter, Parser};
//!
//! let syntax = Parser::new().parse_source(source)?;
//! let canonical = Formatter::new().format_syntax(&syntax)?;
//! ```
//!
//! The formatter does not validate; run the validator first.

use tracing::debug;

use super::ast::{
    Character, Expression, Group, Inline, Line, Multiline, Pattern, Repetition, Rule, Syntax, Term,
};
use super::visitor::{Methodical, Visitor};
use crate::result::Result;

/// Formatting options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Number of spaces per indentation level of multiline rules
    pub indent_size: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { indent_size: 2 }
    }
}

/// Writes a syntax tree back out as canonical notation text
#[derive(Debug, Default)]
pub struct Formatter {
    options: FormatOptions,
    output: String,
    depth: usize,
    groups: usize,
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FormatOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Render `syntax` as canonical source text
    pub fn format_syntax(&mut self, syntax: &Syntax) -> Result<String> {
        self.output.clear();
        self.depth = 0;
        self.groups = 0;

        Visitor::new(&mut *self).visit_syntax(syntax)?;

        let formatted = std::mem::take(&mut self.output);
        debug!("Formatted {} bytes", formatted.len());
        Ok(formatted)
    }

    fn write_indent(&mut self) {
        let indent = " ".repeat(self.depth * self.options.indent_size);
        self.output.push_str(&indent);
    }
}

impl Methodical for Formatter {
    fn process_comment(&mut self, comment: &str) -> Result<()> {
        self.output.push_str(comment);
        self.output.push_str("\n\n");
        Ok(())
    }

    fn process_delimiter(&mut self, delimiter: &str) -> Result<()> {
        match delimiter {
            "|" => self.output.push_str(" | "),
            "-" => self.output.push_str("- "),
            other => self.output.push_str(other),
        }
        Ok(())
    }

    fn process_excluded(&mut self, excluded: &str) -> Result<()> {
        self.output.push_str(excluded);
        Ok(())
    }

    fn process_glyph(&mut self, glyph: &str) -> Result<()> {
        self.output.push_str(glyph);
        Ok(())
    }

    fn process_intrinsic(&mut self, intrinsic: &str) -> Result<()> {
        self.output.push_str(intrinsic);
        Ok(())
    }

    fn process_literal(&mut self, literal: &str) -> Result<()> {
        self.output.push_str(literal);
        Ok(())
    }

    fn process_lowercase(&mut self, lowercase: &str) -> Result<()> {
        self.output.push_str(lowercase);
        Ok(())
    }

    fn process_note(&mut self, note: &str) -> Result<()> {
        self.output.push_str("  ");
        self.output.push_str(note);
        Ok(())
    }

    fn process_number(&mut self, number: &str) -> Result<()> {
        self.output.push_str(number);
        Ok(())
    }

    fn process_quantified(&mut self, quantified: &str) -> Result<()> {
        self.output.push_str(quantified);
        Ok(())
    }

    fn process_uppercase(&mut self, uppercase: &str) -> Result<()> {
        self.output.push_str(uppercase);
        Ok(())
    }

    fn postprocess_rule(&mut self, _rule: &Rule, _index: usize, _size: usize) -> Result<()> {
        self.output.push_str("\n\n");
        Ok(())
    }

    fn preprocess_multiline(&mut self, _multiline: &Multiline) -> Result<()> {
        self.depth += 1;
        Ok(())
    }

    fn postprocess_multiline(&mut self, _multiline: &Multiline) -> Result<()> {
        self.depth -= 1;
        Ok(())
    }

    fn preprocess_line(&mut self, _line: &Line, _index: usize, _size: usize) -> Result<()> {
        self.output.push('\n');
        self.write_indent();
        Ok(())
    }

    fn preprocess_inline(&mut self, _inline: &Inline) -> Result<()> {
        self.output.push(' ');
        Ok(())
    }

    fn preprocess_term(&mut self, _term: &Term, index: usize, _size: usize) -> Result<()> {
        if index > 1 {
            self.output.push(' ');
        }
        Ok(())
    }

    fn postprocess_expression(
        &mut self,
        _expression: &Expression,
        index: usize,
        size: usize,
    ) -> Result<()> {
        self.output.push('\n');
        if index < size {
            self.output.push('\n');
        }
        Ok(())
    }

    fn preprocess_pattern(&mut self, _pattern: &Pattern) -> Result<()> {
        // Only the top-level pattern is separated from the colon.
        if self.groups == 0 {
            self.output.push(' ');
        }
        Ok(())
    }

    fn preprocess_group(&mut self, _group: &Group) -> Result<()> {
        self.groups += 1;
        Ok(())
    }

    fn postprocess_group(&mut self, _group: &Group) -> Result<()> {
        self.groups -= 1;
        Ok(())
    }

    fn preprocess_repetition(
        &mut self,
        _repetition: &Repetition,
        index: usize,
        _size: usize,
    ) -> Result<()> {
        if index > 1 {
            self.output.push(' ');
        }
        Ok(())
    }

    fn preprocess_character(
        &mut self,
        _character: &Character,
        index: usize,
        _size: usize,
    ) -> Result<()> {
        if index > 1 {
            self.output.push(' ');
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parser::Parser;

    const HEADER: &str = "!>\nNOTICE\n<!\n\n!>\nRULES\n<!\n\n";

    fn reformat(source: &str) -> String {
        let syntax = Parser::new().parse_source(source).unwrap();
        Formatter::new().format_syntax(&syntax).unwrap()
    }

    #[test]
    fn canonical_source_is_reproduced() {
        let source = format!(
            "{HEADER}Document: (Item \",\")* Item  ! a list\n\nItem:\n  - Name\n  - value  ! plain\n\nName: value{{1..3}}\n\n!>\nEXPRESSIONS\n<!\n\nname: UPPER (LOWER | DIGIT)*\n\nvalue: ~['\"' CONTROL]+ | 'a'..'z'{{2..}}\n"
        );
        assert_eq!(reformat(&source), source);
    }

    #[test]
    fn layout_is_normalized() {
        let messy = "!>\nNOTICE\n<!\n!>\nRULES\n<!\nDocument:Item\n\n\n\nItem:   \"x\"\n!>\nEXPRESSIONS\n<!\nvalue:\"b\"|\"a\"   ( DIGIT )\nfirst: ~[ 'a' ]\n";
        let expected = format!(
            "{HEADER}Document: Item\n\nItem: \"x\"\n\n!>\nEXPRESSIONS\n<!\n\nfirst: ~['a']\n\nvalue: \"b\" | \"a\" (DIGIT)\n"
        );
        assert_eq!(reformat(messy), expected);
    }

    #[test]
    fn indent_size_is_configurable() {
        let source = format!(
            "{HEADER}Item:\n  - Name\n\nName: \"n\"\n\n!>\nEXPRESSIONS\n<!\n\nvalue: ANY\n"
        );
        let syntax = Parser::new().parse_source(&source).unwrap();
        let formatted = Formatter::with_options(FormatOptions { indent_size: 4 })
            .format_syntax(&syntax)
            .unwrap();
        assert!(formatted.contains("Item:\n    - Name\n\n"));
    }

    #[test]
    fn formatter_is_reusable() {
        let source = format!("{HEADER}Document: \"x\"\n\n!>\nEXPRESSIONS\n<!\n\nvalue: ANY\n");
        let syntax = Parser::new().parse_source(&source).unwrap();
        let mut formatter = Formatter::new();
        let first = formatter.format_syntax(&syntax).unwrap();
        let second = formatter.format_syntax(&syntax).unwrap();
        assert_eq!(first, second);
    }
}
