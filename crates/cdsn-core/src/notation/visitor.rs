//! Tree walk over a [`Syntax`] with pluggable hooks
//!
//! The [`Visitor`] knows how the nodes nest; a [`Methodical`] implementation
//! decides what happens at each one. For every node the visitor calls its
//! `preprocess_*` hook, walks the children in grammar order (token leaves
//! trigger `process_*`), then calls its `postprocess_*` hook. Nodes that
//! appear in lists also receive their 1-based index and the list size.
//!
//! Every hook defaults to doing nothing, so an implementation overrides only
//! what it needs. The first hook to return an error ends the walk.

use super::ast::{
    Alternative, Bounded, Bracket, Cardinality, Character, Constrained, Definition, Element,
    Expression, Extent, Filter, Group, Identifier, Inline, Limit, Line, Multiline, Notice,
    Pattern, Reference, Repetition, Rule, Sequence, Syntax, Term, Text,
};
use crate::result::Result;

/// Hooks invoked while a [`Visitor`] walks a syntax tree
#[allow(unused_variables)]
pub trait Methodical {
    // Token leaves

    fn process_comment(&mut self, comment: &str) -> Result<()> {
        Ok(())
    }

    fn process_delimiter(&mut self, delimiter: &str) -> Result<()> {
        Ok(())
    }

    fn process_excluded(&mut self, excluded: &str) -> Result<()> {
        Ok(())
    }

    fn process_glyph(&mut self, glyph: &str) -> Result<()> {
        Ok(())
    }

    fn process_intrinsic(&mut self, intrinsic: &str) -> Result<()> {
        Ok(())
    }

    fn process_literal(&mut self, literal: &str) -> Result<()> {
        Ok(())
    }

    fn process_lowercase(&mut self, lowercase: &str) -> Result<()> {
        Ok(())
    }

    fn process_note(&mut self, note: &str) -> Result<()> {
        Ok(())
    }

    fn process_number(&mut self, number: &str) -> Result<()> {
        Ok(())
    }

    fn process_quantified(&mut self, quantified: &str) -> Result<()> {
        Ok(())
    }

    fn process_uppercase(&mut self, uppercase: &str) -> Result<()> {
        Ok(())
    }

    // Document structure

    fn preprocess_syntax(&mut self, syntax: &Syntax) -> Result<()> {
        Ok(())
    }

    fn postprocess_syntax(&mut self, syntax: &Syntax) -> Result<()> {
        Ok(())
    }

    fn preprocess_notice(&mut self, notice: &Notice) -> Result<()> {
        Ok(())
    }

    fn postprocess_notice(&mut self, notice: &Notice) -> Result<()> {
        Ok(())
    }

    // Rules

    fn preprocess_rule(&mut self, rule: &Rule, index: usize, size: usize) -> Result<()> {
        Ok(())
    }

    fn postprocess_rule(&mut self, rule: &Rule, index: usize, size: usize) -> Result<()> {
        Ok(())
    }

    fn preprocess_definition(&mut self, definition: &Definition) -> Result<()> {
        Ok(())
    }

    fn postprocess_definition(&mut self, definition: &Definition) -> Result<()> {
        Ok(())
    }

    fn preprocess_multiline(&mut self, multiline: &Multiline) -> Result<()> {
        Ok(())
    }

    fn postprocess_multiline(&mut self, multiline: &Multiline) -> Result<()> {
        Ok(())
    }

    fn preprocess_line(&mut self, line: &Line, index: usize, size: usize) -> Result<()> {
        Ok(())
    }

    fn postprocess_line(&mut self, line: &Line, index: usize, size: usize) -> Result<()> {
        Ok(())
    }

    fn preprocess_identifier(&mut self, identifier: &Identifier) -> Result<()> {
        Ok(())
    }

    fn postprocess_identifier(&mut self, identifier: &Identifier) -> Result<()> {
        Ok(())
    }

    fn preprocess_inline(&mut self, inline: &Inline) -> Result<()> {
        Ok(())
    }

    fn postprocess_inline(&mut self, inline: &Inline) -> Result<()> {
        Ok(())
    }

    fn preprocess_term(&mut self, term: &Term, index: usize, size: usize) -> Result<()> {
        Ok(())
    }

    fn postprocess_term(&mut self, term: &Term, index: usize, size: usize) -> Result<()> {
        Ok(())
    }

    fn preprocess_reference(&mut self, reference: &Reference) -> Result<()> {
        Ok(())
    }

    fn postprocess_reference(&mut self, reference: &Reference) -> Result<()> {
        Ok(())
    }

    fn preprocess_bracket(&mut self, bracket: &Bracket) -> Result<()> {
        Ok(())
    }

    fn postprocess_bracket(&mut self, bracket: &Bracket) -> Result<()> {
        Ok(())
    }

    // Expressions

    fn preprocess_expression(
        &mut self,
        expression: &Expression,
        index: usize,
        size: usize,
    ) -> Result<()> {
        Ok(())
    }

    fn postprocess_expression(
        &mut self,
        expression: &Expression,
        index: usize,
        size: usize,
    ) -> Result<()> {
        Ok(())
    }

    fn preprocess_pattern(&mut self, pattern: &Pattern) -> Result<()> {
        Ok(())
    }

    fn postprocess_pattern(&mut self, pattern: &Pattern) -> Result<()> {
        Ok(())
    }

    fn preprocess_alternative(
        &mut self,
        alternative: &Alternative,
        index: usize,
        size: usize,
    ) -> Result<()> {
        Ok(())
    }

    fn postprocess_alternative(
        &mut self,
        alternative: &Alternative,
        index: usize,
        size: usize,
    ) -> Result<()> {
        Ok(())
    }

    fn preprocess_sequence(&mut self, sequence: &Sequence) -> Result<()> {
        Ok(())
    }

    fn postprocess_sequence(&mut self, sequence: &Sequence) -> Result<()> {
        Ok(())
    }

    fn preprocess_repetition(
        &mut self,
        repetition: &Repetition,
        index: usize,
        size: usize,
    ) -> Result<()> {
        Ok(())
    }

    fn postprocess_repetition(
        &mut self,
        repetition: &Repetition,
        index: usize,
        size: usize,
    ) -> Result<()> {
        Ok(())
    }

    fn preprocess_element(&mut self, element: &Element) -> Result<()> {
        Ok(())
    }

    fn postprocess_element(&mut self, element: &Element) -> Result<()> {
        Ok(())
    }

    fn preprocess_group(&mut self, group: &Group) -> Result<()> {
        Ok(())
    }

    fn postprocess_group(&mut self, group: &Group) -> Result<()> {
        Ok(())
    }

    fn preprocess_filter(&mut self, filter: &Filter) -> Result<()> {
        Ok(())
    }

    fn postprocess_filter(&mut self, filter: &Filter) -> Result<()> {
        Ok(())
    }

    fn preprocess_character(
        &mut self,
        character: &Character,
        index: usize,
        size: usize,
    ) -> Result<()> {
        Ok(())
    }

    fn postprocess_character(
        &mut self,
        character: &Character,
        index: usize,
        size: usize,
    ) -> Result<()> {
        Ok(())
    }

    fn preprocess_bounded(&mut self, bounded: &Bounded) -> Result<()> {
        Ok(())
    }

    fn postprocess_bounded(&mut self, bounded: &Bounded) -> Result<()> {
        Ok(())
    }

    fn preprocess_extent(&mut self, extent: &Extent) -> Result<()> {
        Ok(())
    }

    fn postprocess_extent(&mut self, extent: &Extent) -> Result<()> {
        Ok(())
    }

    fn preprocess_text(&mut self, text: &Text) -> Result<()> {
        Ok(())
    }

    fn postprocess_text(&mut self, text: &Text) -> Result<()> {
        Ok(())
    }

    // Cardinality

    fn preprocess_cardinality(&mut self, cardinality: &Cardinality) -> Result<()> {
        Ok(())
    }

    fn postprocess_cardinality(&mut self, cardinality: &Cardinality) -> Result<()> {
        Ok(())
    }

    fn preprocess_constrained(&mut self, constrained: &Constrained) -> Result<()> {
        Ok(())
    }

    fn postprocess_constrained(&mut self, constrained: &Constrained) -> Result<()> {
        Ok(())
    }

    fn preprocess_limit(&mut self, limit: &Limit) -> Result<()> {
        Ok(())
    }

    fn postprocess_limit(&mut self, limit: &Limit) -> Result<()> {
        Ok(())
    }
}

/// Walks a syntax tree in grammar order, calling a processor's hooks
pub struct Visitor<'p, P: Methodical + ?Sized> {
    processor: &'p mut P,
}

impl<'p, P: Methodical + ?Sized> Visitor<'p, P> {
    pub fn new(processor: &'p mut P) -> Self {
        Self { processor }
    }

    pub fn visit_syntax(&mut self, syntax: &Syntax) -> Result<()> {
        self.processor.preprocess_syntax(syntax)?;

        self.visit_notice(syntax.notice())?;
        self.processor.process_comment(syntax.leading_comment())?;

        let size = syntax.rules().len();
        for (index, rule) in syntax.rules().iter().enumerate() {
            self.visit_rule(rule, index + 1, size)?;
        }

        self.processor.process_comment(syntax.trailing_comment())?;

        let size = syntax.expressions().len();
        for (index, expression) in syntax.expressions().iter().enumerate() {
            self.visit_expression(expression, index + 1, size)?;
        }

        self.processor.postprocess_syntax(syntax)
    }

    fn visit_notice(&mut self, notice: &Notice) -> Result<()> {
        self.processor.preprocess_notice(notice)?;
        self.processor.process_comment(notice.comment())?;
        self.processor.postprocess_notice(notice)
    }

    fn visit_rule(&mut self, rule: &Rule, index: usize, size: usize) -> Result<()> {
        self.processor.preprocess_rule(rule, index, size)?;
        self.processor.process_uppercase(rule.uppercase())?;
        self.processor.process_delimiter(":")?;
        self.visit_definition(rule.definition())?;
        self.processor.postprocess_rule(rule, index, size)
    }

    fn visit_definition(&mut self, definition: &Definition) -> Result<()> {
        self.processor.preprocess_definition(definition)?;
        match definition {
            Definition::Multiline(multiline) => self.visit_multiline(multiline)?,
            Definition::Inline(inline) => self.visit_inline(inline)?,
        }
        self.processor.postprocess_definition(definition)
    }

    fn visit_multiline(&mut self, multiline: &Multiline) -> Result<()> {
        self.processor.preprocess_multiline(multiline)?;
        let size = multiline.lines().len();
        for (index, line) in multiline.lines().iter().enumerate() {
            self.visit_line(line, index + 1, size)?;
        }
        self.processor.postprocess_multiline(multiline)
    }

    fn visit_line(&mut self, line: &Line, index: usize, size: usize) -> Result<()> {
        self.processor.preprocess_line(line, index, size)?;
        self.processor.process_delimiter("-")?;
        self.visit_identifier(line.identifier())?;
        if let Some(note) = line.note() {
            self.processor.process_note(note)?;
        }
        self.processor.postprocess_line(line, index, size)
    }

    fn visit_identifier(&mut self, identifier: &Identifier) -> Result<()> {
        self.processor.preprocess_identifier(identifier)?;
        match identifier {
            Identifier::Lowercase(lowercase) => self.processor.process_lowercase(lowercase)?,
            Identifier::Uppercase(uppercase) => self.processor.process_uppercase(uppercase)?,
        }
        self.processor.postprocess_identifier(identifier)
    }

    fn visit_inline(&mut self, inline: &Inline) -> Result<()> {
        self.processor.preprocess_inline(inline)?;
        let size = inline.terms().len();
        for (index, term) in inline.terms().iter().enumerate() {
            self.visit_term(term, index + 1, size)?;
        }
        if let Some(note) = inline.note() {
            self.processor.process_note(note)?;
        }
        self.processor.postprocess_inline(inline)
    }

    fn visit_term(&mut self, term: &Term, index: usize, size: usize) -> Result<()> {
        self.processor.preprocess_term(term, index, size)?;
        match term {
            Term::Reference(reference) => self.visit_reference(reference)?,
            Term::Bracket(bracket) => self.visit_bracket(bracket)?,
            Term::Literal(literal) => self.processor.process_literal(literal)?,
        }
        self.processor.postprocess_term(term, index, size)
    }

    fn visit_reference(&mut self, reference: &Reference) -> Result<()> {
        self.processor.preprocess_reference(reference)?;
        self.visit_identifier(reference.identifier())?;
        if let Some(cardinality) = reference.cardinality() {
            self.visit_cardinality(cardinality)?;
        }
        self.processor.postprocess_reference(reference)
    }

    fn visit_bracket(&mut self, bracket: &Bracket) -> Result<()> {
        self.processor.preprocess_bracket(bracket)?;
        self.processor.process_delimiter("(")?;
        let size = bracket.terms().len();
        for (index, term) in bracket.terms().iter().enumerate() {
            self.visit_term(term, index + 1, size)?;
        }
        self.processor.process_delimiter(")")?;
        if let Some(cardinality) = bracket.cardinality() {
            self.visit_cardinality(cardinality)?;
        }
        self.processor.postprocess_bracket(bracket)
    }

    fn visit_expression(&mut self, expression: &Expression, index: usize, size: usize) -> Result<()> {
        self.processor.preprocess_expression(expression, index, size)?;
        self.processor.process_lowercase(expression.lowercase())?;
        self.processor.process_delimiter(":")?;
        self.visit_pattern(expression.pattern())?;
        if let Some(note) = expression.note() {
            self.processor.process_note(note)?;
        }
        self.processor.postprocess_expression(expression, index, size)
    }

    fn visit_pattern(&mut self, pattern: &Pattern) -> Result<()> {
        self.processor.preprocess_pattern(pattern)?;
        self.visit_sequence(pattern.sequence())?;
        let size = pattern.alternatives().len();
        for (index, alternative) in pattern.alternatives().iter().enumerate() {
            self.visit_alternative(alternative, index + 1, size)?;
        }
        self.processor.postprocess_pattern(pattern)
    }

    fn visit_alternative(&mut self, alternative: &Alternative, index: usize, size: usize) -> Result<()> {
        self.processor.preprocess_alternative(alternative, index, size)?;
        self.processor.process_delimiter("|")?;
        self.visit_sequence(alternative.sequence())?;
        self.processor.postprocess_alternative(alternative, index, size)
    }

    fn visit_sequence(&mut self, sequence: &Sequence) -> Result<()> {
        self.processor.preprocess_sequence(sequence)?;
        let size = sequence.repetitions().len();
        for (index, repetition) in sequence.repetitions().iter().enumerate() {
            self.visit_repetition(repetition, index + 1, size)?;
        }
        self.processor.postprocess_sequence(sequence)
    }

    fn visit_repetition(&mut self, repetition: &Repetition, index: usize, size: usize) -> Result<()> {
        self.processor.preprocess_repetition(repetition, index, size)?;
        self.visit_element(repetition.element())?;
        if let Some(cardinality) = repetition.cardinality() {
            self.visit_cardinality(cardinality)?;
        }
        self.processor.postprocess_repetition(repetition, index, size)
    }

    fn visit_element(&mut self, element: &Element) -> Result<()> {
        self.processor.preprocess_element(element)?;
        match element {
            Element::Group(group) => self.visit_group(group)?,
            Element::Filter(filter) => self.visit_filter(filter)?,
            Element::Text(text) => self.visit_text(text)?,
        }
        self.processor.postprocess_element(element)
    }

    fn visit_group(&mut self, group: &Group) -> Result<()> {
        self.processor.preprocess_group(group)?;
        self.processor.process_delimiter("(")?;
        self.visit_pattern(group.pattern())?;
        self.processor.process_delimiter(")")?;
        self.processor.postprocess_group(group)
    }

    fn visit_filter(&mut self, filter: &Filter) -> Result<()> {
        self.processor.preprocess_filter(filter)?;
        if let Some(excluded) = filter.excluded() {
            self.processor.process_excluded(excluded)?;
        }
        self.processor.process_delimiter("[")?;
        let size = filter.characters().len();
        for (index, character) in filter.characters().iter().enumerate() {
            self.visit_character(character, index + 1, size)?;
        }
        self.processor.process_delimiter("]")?;
        self.processor.postprocess_filter(filter)
    }

    fn visit_character(&mut self, character: &Character, index: usize, size: usize) -> Result<()> {
        self.processor.preprocess_character(character, index, size)?;
        match character {
            Character::Bounded(bounded) => self.visit_bounded(bounded)?,
            Character::Intrinsic(intrinsic) => self.processor.process_intrinsic(intrinsic)?,
        }
        self.processor.postprocess_character(character, index, size)
    }

    fn visit_bounded(&mut self, bounded: &Bounded) -> Result<()> {
        self.processor.preprocess_bounded(bounded)?;
        self.processor.process_glyph(bounded.glyph())?;
        if let Some(extent) = bounded.extent() {
            self.visit_extent(extent)?;
        }
        self.processor.postprocess_bounded(bounded)
    }

    fn visit_extent(&mut self, extent: &Extent) -> Result<()> {
        self.processor.preprocess_extent(extent)?;
        self.processor.process_delimiter("..")?;
        self.processor.process_glyph(extent.glyph())?;
        self.processor.postprocess_extent(extent)
    }

    fn visit_text(&mut self, text: &Text) -> Result<()> {
        self.processor.preprocess_text(text)?;
        match text {
            Text::Bounded(bounded) => self.visit_bounded(bounded)?,
            Text::Intrinsic(intrinsic) => self.processor.process_intrinsic(intrinsic)?,
            Text::Literal(literal) => self.processor.process_literal(literal)?,
            Text::Lowercase(lowercase) => self.processor.process_lowercase(lowercase)?,
        }
        self.processor.postprocess_text(text)
    }

    fn visit_cardinality(&mut self, cardinality: &Cardinality) -> Result<()> {
        self.processor.preprocess_cardinality(cardinality)?;
        match cardinality {
            Cardinality::Constrained(constrained) => self.visit_constrained(constrained)?,
            Cardinality::Quantified(quantified) => self.processor.process_quantified(quantified)?,
        }
        self.processor.postprocess_cardinality(cardinality)
    }

    fn visit_constrained(&mut self, constrained: &Constrained) -> Result<()> {
        self.processor.preprocess_constrained(constrained)?;
        self.processor.process_delimiter("{")?;
        self.processor.process_number(constrained.number())?;
        if let Some(limit) = constrained.limit() {
            self.visit_limit(limit)?;
        }
        self.processor.process_delimiter("}")?;
        self.processor.postprocess_constrained(constrained)
    }

    fn visit_limit(&mut self, limit: &Limit) -> Result<()> {
        self.processor.preprocess_limit(limit)?;
        self.processor.process_delimiter("..")?;
        if let Some(number) = limit.number() {
            self.processor.process_number(number)?;
        }
        self.processor.postprocess_limit(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotationError;
    use crate::notation::parser::Parser;

    const SOURCE: &str = "!>\nNOTICE\n<!\n\n!>\nRULES\n<!\n\nDocument: (Item \",\")* Item\n\nItem:\n  - Name\n  - value\n\nName: value\n\n!>\nEXPRESSIONS\n<!\n\nvalue: '0'..'9'{2} | ~[LOWER]\n";

    /// Records the order of hooks it sees
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Methodical for Recorder {
        fn process_delimiter(&mut self, delimiter: &str) -> Result<()> {
            self.events.push(delimiter.to_string());
            Ok(())
        }

        fn process_uppercase(&mut self, uppercase: &str) -> Result<()> {
            self.events.push(uppercase.to_string());
            Ok(())
        }

        fn preprocess_term(&mut self, _term: &Term, index: usize, size: usize) -> Result<()> {
            self.events.push(format!("term {index}/{size}"));
            Ok(())
        }

        fn preprocess_line(&mut self, _line: &Line, index: usize, size: usize) -> Result<()> {
            self.events.push(format!("line {index}/{size}"));
            Ok(())
        }
    }

    #[test]
    fn hooks_follow_grammar_order() {
        let syntax = Parser::new().parse_source(SOURCE).unwrap();
        let mut recorder = Recorder::default();
        Visitor::new(&mut recorder).visit_syntax(&syntax).unwrap();

        let expected = [
            "Document", ":", "term 1/2", "(", "term 1/2", "Item", "term 2/2", ")", "term 2/2",
            "Item", "Item", ":", "line 1/2", "-", "Name", "line 2/2", "-", "Name", ":",
            "term 1/1", ":", "..", "{", "}", "|", "[", "]",
        ];
        assert_eq!(recorder.events, expected);
    }

    /// Fails on the first literal it sees
    struct Failing {
        literals: usize,
    }

    impl Methodical for Failing {
        fn process_literal(&mut self, _literal: &str) -> Result<()> {
            self.literals += 1;
            Err(NotationError::semantic_error("no literals"))
        }
    }

    #[test]
    fn first_error_stops_the_walk() {
        let syntax = Parser::new().parse_source(SOURCE).unwrap();
        let mut failing = Failing { literals: 0 };
        let error = Visitor::new(&mut failing).visit_syntax(&syntax).unwrap_err();
        assert!(error.to_string().contains("no literals"));
        assert_eq!(failing.literals, 1);
    }
}
