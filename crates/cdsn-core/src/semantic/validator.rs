//! Semantic validation of a parsed syntax
//!
//! The validator walks the tree once and stops at the first problem:
//!
//! - every token leaf must match its token pattern, which also guards trees
//!   built by hand rather than by the parser
//! - rule and expression names are defined at most once
//! - every referenced rule and expression is defined somewhere
//! - character ranges and count constraints are not decreasing
//! - an excluded filter does not contain `ANY`, which would leave nothing to match

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::error::NotationError;
use crate::notation::ast::{
    Bounded, Constrained, Expression, Filter, Identifier, Rule, Syntax, Text,
};
use crate::notation::token::{TokenType, glyph_character};
use crate::notation::visitor::{Methodical, Visitor};
use crate::result::Result;

/// Checks a [`Syntax`] for semantic consistency
#[derive(Debug, Default)]
pub struct Validator {
    rules: HashSet<String>,
    expressions: HashSet<String>,
    referenced_rules: BTreeSet<String>,
    referenced_expressions: BTreeSet<String>,
    excluding: bool,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `syntax`, returning the first violation found
    pub fn validate_syntax(&mut self, syntax: &Syntax) -> Result<()> {
        self.rules.clear();
        self.expressions.clear();
        self.referenced_rules.clear();
        self.referenced_expressions.clear();
        self.excluding = false;

        Visitor::new(&mut *self).visit_syntax(syntax)?;

        debug!(
            "Validated {} rules and {} expressions",
            self.rules.len(),
            self.expressions.len()
        );
        Ok(())
    }

    fn check(token_type: TokenType, value: &str) -> Result<()> {
        if token_type.matches(value) {
            return Ok(());
        }
        Err(NotationError::semantic_error(format!(
            "The {token_type} {value:?} does not match the {token_type} token pattern."
        )))
    }
}

impl Methodical for Validator {
    fn process_comment(&mut self, comment: &str) -> Result<()> {
        Self::check(TokenType::Comment, comment)
    }

    fn process_delimiter(&mut self, delimiter: &str) -> Result<()> {
        Self::check(TokenType::Delimiter, delimiter)
    }

    fn process_excluded(&mut self, excluded: &str) -> Result<()> {
        Self::check(TokenType::Excluded, excluded)
    }

    fn process_glyph(&mut self, glyph: &str) -> Result<()> {
        Self::check(TokenType::Glyph, glyph)
    }

    fn process_intrinsic(&mut self, intrinsic: &str) -> Result<()> {
        Self::check(TokenType::Intrinsic, intrinsic)?;
        if self.excluding && intrinsic == "ANY" {
            return Err(NotationError::semantic_error(
                "The filter excludes ANY and so matches no character.",
            ));
        }
        Ok(())
    }

    fn process_literal(&mut self, literal: &str) -> Result<()> {
        Self::check(TokenType::Literal, literal)
    }

    fn process_lowercase(&mut self, lowercase: &str) -> Result<()> {
        Self::check(TokenType::Lowercase, lowercase)
    }

    fn process_note(&mut self, note: &str) -> Result<()> {
        Self::check(TokenType::Note, note)
    }

    fn process_number(&mut self, number: &str) -> Result<()> {
        Self::check(TokenType::Number, number)
    }

    fn process_quantified(&mut self, quantified: &str) -> Result<()> {
        Self::check(TokenType::Quantified, quantified)
    }

    fn process_uppercase(&mut self, uppercase: &str) -> Result<()> {
        Self::check(TokenType::Uppercase, uppercase)
    }

    fn postprocess_syntax(&mut self, _syntax: &Syntax) -> Result<()> {
        if let Some(name) = self
            .referenced_rules
            .iter()
            .find(|name| !self.rules.contains(*name))
        {
            return Err(NotationError::semantic_error(format!(
                "The rule {name} is referenced but never defined."
            )));
        }
        if let Some(name) = self
            .referenced_expressions
            .iter()
            .find(|name| !self.expressions.contains(*name))
        {
            return Err(NotationError::semantic_error(format!(
                "The expression {name} is referenced but never defined."
            )));
        }
        Ok(())
    }

    fn preprocess_rule(&mut self, rule: &Rule, _index: usize, _size: usize) -> Result<()> {
        let name = rule.uppercase();
        if !self.rules.insert(name.to_string()) {
            return Err(NotationError::semantic_error(format!(
                "The rule {name} is defined more than once."
            )));
        }
        Ok(())
    }

    fn preprocess_identifier(&mut self, identifier: &Identifier) -> Result<()> {
        match identifier {
            Identifier::Uppercase(name) => self.referenced_rules.insert(name.clone()),
            Identifier::Lowercase(name) => self.referenced_expressions.insert(name.clone()),
        };
        Ok(())
    }

    fn preprocess_expression(
        &mut self,
        expression: &Expression,
        _index: usize,
        _size: usize,
    ) -> Result<()> {
        let name = expression.lowercase();
        if !self.expressions.insert(name.to_string()) {
            return Err(NotationError::semantic_error(format!(
                "The expression {name} is defined more than once."
            )));
        }
        Ok(())
    }

    fn preprocess_text(&mut self, text: &Text) -> Result<()> {
        if let Text::Lowercase(name) = text {
            self.referenced_expressions.insert(name.clone());
        }
        Ok(())
    }

    fn preprocess_filter(&mut self, filter: &Filter) -> Result<()> {
        self.excluding = filter.is_excluded();
        Ok(())
    }

    fn postprocess_filter(&mut self, _filter: &Filter) -> Result<()> {
        self.excluding = false;
        Ok(())
    }

    fn preprocess_bounded(&mut self, bounded: &Bounded) -> Result<()> {
        let Some(extent) = bounded.extent() else {
            return Ok(());
        };
        let initial = glyph_character(bounded.glyph());
        let last = glyph_character(extent.glyph());
        match (initial, last) {
            (Some(initial), Some(last)) if initial <= last => Ok(()),
            (Some(_), Some(_)) => Err(NotationError::semantic_error(format!(
                "The range {}..{} is in decreasing order.",
                bounded.glyph(),
                extent.glyph()
            ))),
            _ => Err(NotationError::semantic_error(format!(
                "The range {}..{} is not made of glyphs.",
                bounded.glyph(),
                extent.glyph()
            ))),
        }
    }

    fn preprocess_constrained(&mut self, constrained: &Constrained) -> Result<()> {
        let Some(maximum) = constrained.limit().and_then(|limit| limit.number()) else {
            return Ok(());
        };
        let minimum = constrained.number();
        match (minimum.parse::<u64>(), maximum.parse::<u64>()) {
            (Ok(low), Ok(high)) if low <= high => Ok(()),
            (Ok(_), Ok(_)) => Err(NotationError::semantic_error(format!(
                "The constraint {{{minimum}..{maximum}}} has a minimum above its maximum."
            ))),
            _ => Err(NotationError::semantic_error(format!(
                "The constraint {{{minimum}..{maximum}}} has an unusable count."
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::notation::ast::{
        Definition, Element, Inline, Notice, Pattern, Repetition, Sequence, Term,
    };
    use crate::notation::parser::Parser;

    const HEADER: &str = "!>\nNOTICE\n<!\n\n!>\nRULES\n<!\n\n";
    const EXPRESSIONS: &str = "!>\nEXPRESSIONS\n<!\n\n";

    fn validate(rules: &str, expressions: &str) -> Result<()> {
        let source = format!("{HEADER}{rules}{EXPRESSIONS}{expressions}");
        let syntax = Parser::new().parse_source(&source)?;
        Validator::new().validate_syntax(&syntax)
    }

    #[test]
    fn consistent_syntax_passes() {
        let result = validate(
            "Document: Item+\n\nItem: name \"=\" value\n\n",
            "name: LOWER+\n\nvalue: DIGIT+\n",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn undefined_expression_reference_is_named() {
        let error = validate("Document: \"x\"\n\n", "bad: rule\n").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Semantic);
        assert!(error.to_string().contains("expression rule"));
    }

    #[test]
    fn undefined_rule_reference_is_named() {
        let error = validate("Document: Missing\n\n", "value: ANY\n").unwrap_err();
        assert!(error.to_string().contains("The rule Missing is referenced"));
    }

    #[test]
    fn hand_built_tree_with_bad_token_is_rejected() {
        let text = Element::Text(Text::Literal("\"x\"".to_string()));
        let syntax = Syntax::new(
            Notice::new("!>\nN\n<!"),
            "!>\nR\n<!",
            vec![Rule::new(
                "document",
                Definition::Inline(Inline::new(vec![Term::Literal("\"x\"".to_string())], None)),
            )],
            "!>\nE\n<!",
            vec![Expression::new(
                "value",
                Pattern::new(Sequence::new(vec![Repetition::new(text, None)]), vec![]),
                None,
            )],
        );
        let error = Validator::new().validate_syntax(&syntax).unwrap_err();
        assert!(error.to_string().contains("uppercase \"document\""));
    }

    #[test]
    fn decreasing_constraint_is_rejected() {
        let error = validate("Document: value{3..1}\n\n", "value: ANY\n").unwrap_err();
        assert!(error.to_string().contains("{3..1}"));
        assert!(validate("Document: value{1..3}\n\n", "value: ANY\n").is_ok());
    }

    #[test]
    fn excluded_filter_may_not_contain_any() {
        let error = validate("Document: value\n\n", "value: ~[ANY]+\n").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Semantic);
        assert!(error.to_string().contains("excludes ANY"));

        assert!(validate("Document: value\n\n", "value: [ANY]+\n").is_ok());
        assert!(validate("Document: value\n\n", "value: ~[CONTROL] ANY\n").is_ok());
    }

    #[test]
    fn validator_is_reusable() {
        let source = format!("{HEADER}Document: value\n\n{EXPRESSIONS}value: ANY\n");
        let syntax = Parser::new().parse_source(&source).unwrap();
        let mut validator = Validator::new();
        assert!(validator.validate_syntax(&syntax).is_ok());
        assert!(validator.validate_syntax(&syntax).is_ok());
    }
}
