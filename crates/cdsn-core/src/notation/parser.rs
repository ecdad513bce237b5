//! Recursive-descent parser for the notation
//!
//! Each production returns `Ok(None)` when its first token does not match,
//! after putting that token back so a sibling alternative can try it. Once a
//! production has matched its first token, any later mismatch is a syntax
//! error and parsing stops.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use tracing::debug;

use super::ast::{
    Alternative, Bounded, Bracket, Cardinality, Character, Constrained, Definition, Element,
    Expression, Extent, Filter, Group, Identifier, Inline, Limit, Line, Multiline, Notice,
    Pattern, Reference, Repetition, Rule, Sequence, Syntax, Term, Text,
};
use super::grammar::definition_of;
use super::scanner::{DEFAULT_QUEUE_CAPACITY, Scanner};
use super::token::{Token, TokenType};
use crate::diagnostics::render_excerpt;
use crate::error::NotationError;
use crate::result::Result;

/// Parses notation source text into a [`Syntax`] tree
#[derive(Debug, Clone)]
pub struct Parser {
    queue_capacity: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Use a token channel of `capacity` slots (at least one)
    pub fn with_queue_capacity(capacity: usize) -> Self {
        Self {
            queue_capacity: capacity.max(1),
        }
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Parse a complete notation document
    ///
    /// Expressions in the returned tree are sorted by name.
    pub fn parse_source(&self, source: &str) -> Result<Syntax> {
        let source: Arc<str> = Arc::from(source);
        let (sender, receiver) = mpsc::sync_channel(self.queue_capacity);
        let handle = Scanner::spawn(Arc::clone(&source), sender);

        let result = {
            let mut session = ParseSession {
                source: &source,
                tokens: receiver,
                next: Vec::new(),
            };
            session.parse_syntax()
        };

        // The session, and with it the receiver, is gone, so a scanner blocked
        // on a full channel wakes up and exits.
        handle
            .join()
            .map_err(|_| NotationError::internal_error("The scanner thread panicked."))?;

        let syntax = result?;
        debug!(
            "Parsed {} rules and {} expressions",
            syntax.rules().len(),
            syntax.expressions().len()
        );
        Ok(syntax)
    }
}

/// Token cursor for one parse: the channel head plus a put-back stack
struct ParseSession<'s> {
    source: &'s str,
    tokens: Receiver<Token>,
    next: Vec<Token>,
}

impl ParseSession<'_> {
    fn get_next_token(&mut self) -> Result<Token> {
        if let Some(token) = self.next.pop() {
            return Ok(token);
        }
        let token = self.tokens.recv().map_err(|_| {
            NotationError::internal_error("The token stream ended before the end of the input.")
        })?;
        if token.token_type() == TokenType::Error {
            let excerpt = render_excerpt(self.source, &token);
            return Err(NotationError::lexical_error(token, excerpt));
        }
        Ok(token)
    }

    fn put_back(&mut self, token: Token) {
        self.next.push(token);
    }

    /// Consume the next token if it has the given type
    fn parse_token(&mut self, token_type: TokenType) -> Result<Option<String>> {
        let token = self.get_next_token()?;
        if token.token_type() == token_type {
            return Ok(Some(token.value().to_string()));
        }
        self.put_back(token);
        Ok(None)
    }

    /// Consume the next token if it is the given delimiter
    fn parse_delimiter(&mut self, delimiter: &str) -> Result<bool> {
        let token = self.get_next_token()?;
        if token.token_type() == TokenType::Delimiter && token.value() == delimiter {
            return Ok(true);
        }
        self.put_back(token);
        Ok(false)
    }

    fn parse_newlines(&mut self) -> Result<usize> {
        let mut count = 0;
        while self.parse_token(TokenType::Newline)?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    /// Report the next token as unexpected while parsing `rule`
    fn fail<T>(&mut self, rule: &str) -> Result<T> {
        let token = self.get_next_token()?;
        let excerpt = render_excerpt(self.source, &token);
        Err(NotationError::syntax_error(
            token,
            rule,
            definition_of(rule),
            excerpt,
        ))
    }

    fn parse_syntax(&mut self) -> Result<Syntax> {
        let Some(notice) = self.parse_notice()? else {
            return self.fail("Syntax");
        };
        self.parse_newlines()?;

        let Some(leading_comment) = self.parse_token(TokenType::Comment)? else {
            return self.fail("Syntax");
        };
        self.parse_newlines()?;

        let mut rules = Vec::new();
        while let Some(rule) = self.parse_rule()? {
            rules.push(rule);
        }
        if rules.is_empty() {
            return self.fail("Syntax");
        }

        let Some(trailing_comment) = self.parse_token(TokenType::Comment)? else {
            return self.fail("Syntax");
        };
        self.parse_newlines()?;

        let mut expressions = Vec::new();
        while let Some(expression) = self.parse_expression()? {
            expressions.push(expression);
        }
        if expressions.is_empty() {
            return self.fail("Syntax");
        }

        if self.parse_token(TokenType::Eof)?.is_none() {
            return self.fail("Syntax");
        }

        expressions.sort_by(|left, right| left.lowercase().cmp(right.lowercase()));
        Ok(Syntax::new(
            notice,
            leading_comment,
            rules,
            trailing_comment,
            expressions,
        ))
    }

    fn parse_notice(&mut self) -> Result<Option<Notice>> {
        Ok(self.parse_token(TokenType::Comment)?.map(Notice::new))
    }

    fn parse_rule(&mut self) -> Result<Option<Rule>> {
        let Some(uppercase) = self.parse_token(TokenType::Uppercase)? else {
            return Ok(None);
        };
        if !self.parse_delimiter(":")? {
            return self.fail("Rule");
        }
        let Some(definition) = self.parse_definition()? else {
            return self.fail("Rule");
        };
        if self.parse_newlines()? == 0 {
            return self.fail("Rule");
        }
        Ok(Some(Rule::new(uppercase, definition)))
    }

    fn parse_definition(&mut self) -> Result<Option<Definition>> {
        if let Some(multiline) = self.parse_multiline()? {
            return Ok(Some(Definition::Multiline(multiline)));
        }
        Ok(self.parse_inline()?.map(Definition::Inline))
    }

    fn parse_multiline(&mut self) -> Result<Option<Multiline>> {
        let mut lines = Vec::new();
        while let Some(line) = self.parse_line()? {
            lines.push(line);
        }
        if lines.is_empty() {
            return Ok(None);
        }
        Ok(Some(Multiline::new(lines)))
    }

    fn parse_line(&mut self) -> Result<Option<Line>> {
        let newline = self.get_next_token()?;
        if newline.token_type() != TokenType::Newline {
            self.put_back(newline);
            return Ok(None);
        }
        // A newline not followed by a dash ends the rule instead.
        let dash = self.get_next_token()?;
        if dash.token_type() != TokenType::Delimiter || dash.value() != "-" {
            self.put_back(dash);
            self.put_back(newline);
            return Ok(None);
        }
        let Some(identifier) = self.parse_identifier()? else {
            return self.fail("Line");
        };
        let note = self.parse_token(TokenType::Note)?;
        Ok(Some(Line::new(identifier, note)))
    }

    fn parse_identifier(&mut self) -> Result<Option<Identifier>> {
        if let Some(lowercase) = self.parse_token(TokenType::Lowercase)? {
            return Ok(Some(Identifier::Lowercase(lowercase)));
        }
        Ok(self
            .parse_token(TokenType::Uppercase)?
            .map(Identifier::Uppercase))
    }

    fn parse_inline(&mut self) -> Result<Option<Inline>> {
        let mut terms = Vec::new();
        while let Some(term) = self.parse_term()? {
            terms.push(term);
        }
        if terms.is_empty() {
            return Ok(None);
        }
        let note = self.parse_token(TokenType::Note)?;
        Ok(Some(Inline::new(terms, note)))
    }

    fn parse_term(&mut self) -> Result<Option<Term>> {
        if let Some(reference) = self.parse_reference()? {
            return Ok(Some(Term::Reference(reference)));
        }
        if let Some(bracket) = self.parse_bracket()? {
            return Ok(Some(Term::Bracket(bracket)));
        }
        Ok(self.parse_token(TokenType::Literal)?.map(Term::Literal))
    }

    fn parse_reference(&mut self) -> Result<Option<Reference>> {
        let Some(identifier) = self.parse_identifier()? else {
            return Ok(None);
        };
        let cardinality = self.parse_cardinality()?;
        Ok(Some(Reference::new(identifier, cardinality)))
    }

    fn parse_bracket(&mut self) -> Result<Option<Bracket>> {
        if !self.parse_delimiter("(")? {
            return Ok(None);
        }
        let mut terms = Vec::new();
        while let Some(term) = self.parse_term()? {
            terms.push(term);
        }
        if terms.is_empty() {
            return self.fail("Bracket");
        }
        if !self.parse_delimiter(")")? {
            return self.fail("Bracket");
        }
        let cardinality = self.parse_cardinality()?;
        Ok(Some(Bracket::new(terms, cardinality)))
    }

    fn parse_expression(&mut self) -> Result<Option<Expression>> {
        let Some(lowercase) = self.parse_token(TokenType::Lowercase)? else {
            return Ok(None);
        };
        if !self.parse_delimiter(":")? {
            return self.fail("Expression");
        }
        let Some(pattern) = self.parse_pattern()? else {
            return self.fail("Expression");
        };
        let note = self.parse_token(TokenType::Note)?;
        if self.parse_newlines()? == 0 {
            return self.fail("Expression");
        }
        Ok(Some(Expression::new(lowercase, pattern, note)))
    }

    fn parse_pattern(&mut self) -> Result<Option<Pattern>> {
        let Some(sequence) = self.parse_sequence()? else {
            return Ok(None);
        };
        let mut alternatives = Vec::new();
        while let Some(alternative) = self.parse_alternative()? {
            alternatives.push(alternative);
        }
        Ok(Some(Pattern::new(sequence, alternatives)))
    }

    fn parse_alternative(&mut self) -> Result<Option<Alternative>> {
        if !self.parse_delimiter("|")? {
            return Ok(None);
        }
        let Some(sequence) = self.parse_sequence()? else {
            return self.fail("Alternative");
        };
        Ok(Some(Alternative::new(sequence)))
    }

    fn parse_sequence(&mut self) -> Result<Option<Sequence>> {
        let mut repetitions = Vec::new();
        while let Some(repetition) = self.parse_repetition()? {
            repetitions.push(repetition);
        }
        if repetitions.is_empty() {
            return Ok(None);
        }
        Ok(Some(Sequence::new(repetitions)))
    }

    fn parse_repetition(&mut self) -> Result<Option<Repetition>> {
        let Some(element) = self.parse_element()? else {
            return Ok(None);
        };
        let cardinality = self.parse_cardinality()?;
        Ok(Some(Repetition::new(element, cardinality)))
    }

    fn parse_element(&mut self) -> Result<Option<Element>> {
        if let Some(group) = self.parse_group()? {
            return Ok(Some(Element::Group(group)));
        }
        if let Some(filter) = self.parse_filter()? {
            return Ok(Some(Element::Filter(filter)));
        }
        Ok(self.parse_text()?.map(Element::Text))
    }

    fn parse_group(&mut self) -> Result<Option<Group>> {
        if !self.parse_delimiter("(")? {
            return Ok(None);
        }
        let Some(pattern) = self.parse_pattern()? else {
            return self.fail("Group");
        };
        if !self.parse_delimiter(")")? {
            return self.fail("Group");
        }
        Ok(Some(Group::new(pattern)))
    }

    fn parse_filter(&mut self) -> Result<Option<Filter>> {
        let excluded = self.parse_token(TokenType::Excluded)?;
        if !self.parse_delimiter("[")? {
            if excluded.is_some() {
                return self.fail("Filter");
            }
            return Ok(None);
        }
        let mut characters = Vec::new();
        while let Some(character) = self.parse_character()? {
            characters.push(character);
        }
        if characters.is_empty() {
            return self.fail("Filter");
        }
        if !self.parse_delimiter("]")? {
            return self.fail("Filter");
        }
        Ok(Some(Filter::new(excluded, characters)))
    }

    fn parse_character(&mut self) -> Result<Option<Character>> {
        if let Some(bounded) = self.parse_bounded()? {
            return Ok(Some(Character::Bounded(bounded)));
        }
        Ok(self
            .parse_token(TokenType::Intrinsic)?
            .map(Character::Intrinsic))
    }

    fn parse_bounded(&mut self) -> Result<Option<Bounded>> {
        let Some(glyph) = self.parse_token(TokenType::Glyph)? else {
            return Ok(None);
        };
        let extent = self.parse_extent()?;
        Ok(Some(Bounded::new(glyph, extent)))
    }

    fn parse_extent(&mut self) -> Result<Option<Extent>> {
        if !self.parse_delimiter("..")? {
            return Ok(None);
        }
        let Some(glyph) = self.parse_token(TokenType::Glyph)? else {
            return self.fail("Extent");
        };
        Ok(Some(Extent::new(glyph)))
    }

    fn parse_text(&mut self) -> Result<Option<Text>> {
        if let Some(bounded) = self.parse_bounded()? {
            return Ok(Some(Text::Bounded(bounded)));
        }
        if let Some(intrinsic) = self.parse_token(TokenType::Intrinsic)? {
            return Ok(Some(Text::Intrinsic(intrinsic)));
        }
        if let Some(literal) = self.parse_token(TokenType::Literal)? {
            return Ok(Some(Text::Literal(literal)));
        }
        Ok(self.parse_token(TokenType::Lowercase)?.map(Text::Lowercase))
    }

    fn parse_cardinality(&mut self) -> Result<Option<Cardinality>> {
        if let Some(constrained) = self.parse_constrained()? {
            return Ok(Some(Cardinality::Constrained(constrained)));
        }
        Ok(self
            .parse_token(TokenType::Quantified)?
            .map(Cardinality::Quantified))
    }

    fn parse_constrained(&mut self) -> Result<Option<Constrained>> {
        if !self.parse_delimiter("{")? {
            return Ok(None);
        }
        let Some(number) = self.parse_token(TokenType::Number)? else {
            return self.fail("Constrained");
        };
        let limit = self.parse_limit()?;
        if !self.parse_delimiter("}")? {
            return self.fail("Constrained");
        }
        Ok(Some(Constrained::new(number, limit)))
    }

    fn parse_limit(&mut self) -> Result<Option<Limit>> {
        if !self.parse_delimiter("..")? {
            return Ok(None);
        }
        let number = self.parse_token(TokenType::Number)?;
        Ok(Some(Limit::new(number)))
    }
}
