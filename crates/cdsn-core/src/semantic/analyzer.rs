//! Semantic analysis for code generators
//!
//! The analyzer reduces a validated syntax to what a generator for the
//! described language needs: the rule and expression names, the attributes
//! each rule holds, which references are plural, and a regular expression
//! for every token type.
//!
//! # Regular expressions
//!
//! Each expression compiles to `(?:pattern)`. Groups become non-capturing
//! groups, filters become character classes and intrinsics become Unicode
//! classes. A repetition whose element contains `ANY` is made lazy so that
//! `"!>" (ANY | EOL)* "<!"` stops at the first closing marker. References to
//! other expressions are replaced by the referenced expression's regex, in
//! dependency order.
//!
//! Inside a filter `ANY` becomes `\s\S`. An excluded filter holding `ANY`
//! would compile to a class matching nothing, so the validator rejects it.
//!
//! Unless the syntax defines its own, a `delimiter` expression is added
//! matching every literal used in the rules, longest first.
//!
//! # Attributes
//!
//! Inline rules repeat some references (`Item ("," Item)*`); repeated
//! references collapse into one plural attribute. The innermost enclosing
//! bracket with a cardinality decides plurality over the reference's own.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::debug;

use super::inflection::{make_lower_case, make_plural, make_singular};
use crate::error::NotationError;
use crate::notation::ast::{
    Alternative, Bounded, Bracket, Cardinality, Constrained, Definition, Expression, Extent,
    Filter, Group, Identifier, Line, Reference, Repetition, Rule, Syntax, Text,
};
use crate::notation::token::{glyph_character, literal_text};
use crate::notation::visitor::{Methodical, Visitor};
use crate::result::Result;

/// Name of the synthesized expression matching rule literals.
pub const DEFAULT_DELIMITER_NAME: &str = "delimiter";

/// How a generated class stores an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// A node produced by another rule
    Instance,
    /// The string value of a token
    Token,
}

/// One attribute of the node a rule produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    name: String,
    identifier: String,
    plural: bool,
    kind: AttributeKind,
}

impl Attribute {
    /// Attribute name: lower-cased, pluralized when plural, numbered on collision
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The referenced rule or expression
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn is_plural(&self) -> bool {
        self.plural
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }
}

/// Everything a generator needs to know about a syntax
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    syntax_name: String,
    notice: String,
    comment: String,
    rule_names: Vec<String>,
    expression_names: Vec<String>,
    plurals: BTreeSet<String>,
    references: IndexMap<String, Vec<Attribute>>,
    regexes: IndexMap<String, String>,
}

impl Analysis {
    /// Name of the first rule
    pub fn syntax_name(&self) -> &str {
        &self.syntax_name
    }

    pub fn notice(&self) -> &str {
        &self.notice
    }

    /// The comment introducing the rules
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Rule names in document order
    pub fn rule_names(&self) -> &[String] {
        &self.rule_names
    }

    /// Expression names in sorted order, including a synthesized delimiter
    pub fn expression_names(&self) -> &[String] {
        &self.expression_names
    }

    pub fn plurals(&self) -> &BTreeSet<String> {
        &self.plurals
    }

    pub fn is_plural(&self, name: &str) -> bool {
        self.plurals.contains(name)
    }

    pub fn references(&self) -> &IndexMap<String, Vec<Attribute>> {
        &self.references
    }

    pub fn references_of(&self, rule: &str) -> Option<&[Attribute]> {
        self.references.get(rule).map(Vec::as_slice)
    }

    pub fn regexes(&self) -> &IndexMap<String, String> {
        &self.regexes
    }

    pub fn regex_of(&self, expression: &str) -> Option<&str> {
        self.regexes.get(expression).map(String::as_str)
    }
}

/// A piece of an expression's regex, or a reference still to be resolved
#[derive(Debug, Clone)]
enum Fragment {
    Text(String),
    Reference(String),
}

/// State of one analysis walk
#[derive(Debug, Default)]
struct Walk {
    syntax_name: Option<String>,
    notice: String,
    comment: String,
    rule_names: Vec<String>,
    expression_names: Vec<String>,
    plurals: BTreeSet<String>,
    references: IndexMap<String, Vec<Attribute>>,
    literals: BTreeSet<String>,
    patterns: IndexMap<String, Vec<Fragment>>,

    occurrences: Vec<(Identifier, bool)>,
    brackets: Vec<Option<bool>>,
    in_expression: bool,
    in_filter: bool,
    fragments: Vec<Fragment>,
    wildcards: Vec<bool>,
}

impl Walk {
    fn push(&mut self, text: impl Into<String>) {
        self.fragments.push(Fragment::Text(text.into()));
    }
}

/// Derives an [`Analysis`] from a validated [`Syntax`]
#[derive(Debug)]
pub struct Analyzer {
    delimiter_name: String,
    walk: Walk,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self::with_delimiter_name(DEFAULT_DELIMITER_NAME)
    }

    /// Use another name for the synthesized delimiter expression
    pub fn with_delimiter_name(name: impl Into<String>) -> Self {
        Self {
            delimiter_name: name.into(),
            walk: Walk::default(),
        }
    }

    pub fn analyze_syntax(&mut self, syntax: &Syntax) -> Result<Analysis> {
        self.walk = Walk::default();
        Visitor::new(&mut *self).visit_syntax(syntax)?;
        let walk = std::mem::take(&mut self.walk);

        let syntax_name = walk
            .syntax_name
            .ok_or_else(|| NotationError::semantic_error("The syntax defines no rules."))?;
        let mut expression_names = walk.expression_names;
        let mut regexes = resolve(&walk.patterns)?;

        if !regexes.contains_key(&self.delimiter_name) && !walk.literals.is_empty() {
            regexes.insert(self.delimiter_name.clone(), delimiter_regex(&walk.literals));
            regexes.sort_keys();
            expression_names.push(self.delimiter_name.clone());
            expression_names.sort();
        }

        debug!(
            "Analyzed {}: {} rules, {} expressions, {} plurals",
            syntax_name,
            walk.rule_names.len(),
            expression_names.len(),
            walk.plurals.len()
        );

        Ok(Analysis {
            syntax_name,
            notice: walk.notice,
            comment: walk.comment,
            rule_names: walk.rule_names,
            expression_names,
            plurals: walk.plurals,
            references: walk.references,
            regexes,
        })
    }
}

/// Whether a cardinality allows more than one occurrence
pub fn is_plural(cardinality: &Cardinality) -> bool {
    let is_one = |number: &str| matches!(number.parse::<u64>(), Ok(1));
    match cardinality {
        Cardinality::Quantified(quantified) => quantified == "*" || quantified == "+",
        Cardinality::Constrained(constrained) => match constrained.limit() {
            None => !is_one(constrained.number()),
            Some(limit) => !(is_one(constrained.number()) && limit.number().is_some_and(is_one)),
        },
    }
}

fn intrinsic_regex(intrinsic: &str, in_filter: bool) -> Option<&'static str> {
    let regex = match (intrinsic, in_filter) {
        ("ANY", false) => ".",
        ("ANY", true) => r"\s\S",
        ("CONTROL", _) => r"\p{Cc}",
        ("DIGIT", _) => r"\p{Nd}",
        ("EOL", false) => r"\r?\n",
        ("EOL", true) => r"\n",
        ("LOWER", _) => r"\p{Ll}",
        ("UPPER", _) => r"\p{Lu}",
        _ => return None,
    };
    Some(regex)
}

/// Merge repeated identifiers into their first occurrence, which becomes plural
fn consolidate(occurrences: Vec<(Identifier, bool)>) -> Vec<(Identifier, bool)> {
    let mut merged: Vec<(Identifier, bool)> = Vec::with_capacity(occurrences.len());
    for (identifier, plural) in occurrences {
        match merged.iter_mut().find(|(existing, _)| *existing == identifier) {
            Some((_, existing)) => *existing = true,
            None => merged.push((identifier, plural)),
        }
    }
    merged
}

fn name_attributes(occurrences: Vec<(Identifier, bool)>) -> Vec<Attribute> {
    let mut stems: HashMap<String, usize> = HashMap::new();
    occurrences
        .into_iter()
        .map(|(identifier, plural)| {
            let lowered = make_lower_case(identifier.name());
            let stem = make_singular(&lowered);
            let count = stems.entry(stem.clone()).or_insert(0);
            *count += 1;
            let base = if *count > 1 {
                format!("{stem}{count}")
            } else {
                lowered
            };
            let kind = match identifier {
                Identifier::Uppercase(_) => AttributeKind::Instance,
                Identifier::Lowercase(_) => AttributeKind::Token,
            };
            Attribute {
                name: if plural { make_plural(&base) } else { base },
                identifier: identifier.name().to_string(),
                plural,
                kind,
            }
        })
        .collect()
}

/// Substitute expression references, referenced expressions first
fn resolve(patterns: &IndexMap<String, Vec<Fragment>>) -> Result<IndexMap<String, String>> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let nodes: HashMap<&str, NodeIndex> = patterns
        .keys()
        .map(|name| (name.as_str(), graph.add_node(name.as_str())))
        .collect();

    for (name, fragments) in patterns {
        for fragment in fragments {
            let Fragment::Reference(target) = fragment else {
                continue;
            };
            let Some(&source) = nodes.get(target.as_str()) else {
                return Err(NotationError::semantic_error(format!(
                    "The expression {target} is referenced but never defined."
                )));
            };
            graph.add_edge(source, nodes[name.as_str()], ());
        }
    }

    let order = toposort(&graph, None).map_err(|_| cycle_error(&graph))?;

    let mut compiled: HashMap<&str, String> = HashMap::new();
    for index in order {
        let name = graph[index];
        let mut regex = String::new();
        for fragment in &patterns[name] {
            match fragment {
                Fragment::Text(text) => regex.push_str(text),
                Fragment::Reference(target) => {
                    let resolved = compiled.get(target.as_str()).ok_or_else(|| {
                        NotationError::internal_error(format!(
                            "The expression {target} was not compiled before {name}."
                        ))
                    })?;
                    regex.push_str(resolved);
                }
            }
        }
        compiled.insert(name, regex);
    }

    Ok(patterns
        .keys()
        .map(|name| {
            let regex = compiled.remove(name.as_str()).unwrap_or_default();
            (name.clone(), regex)
        })
        .collect())
}

fn cycle_error(graph: &DiGraph<&str, ()>) -> NotationError {
    let cycle = tarjan_scc(graph)
        .into_iter()
        .find(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .map(|component| {
            let mut names: Vec<&str> = component.iter().map(|index| graph[*index]).collect();
            names.sort_unstable();
            names.push(names[0]);
            names.join(" → ")
        })
        .unwrap_or_default();
    NotationError::semantic_error(format!("Circular expression reference: {cycle}"))
}

fn delimiter_regex(literals: &BTreeSet<String>) -> String {
    let mut ordered: Vec<&String> = literals.iter().collect();
    // Longest first so `..` is tried before `.`; the set order breaks ties.
    ordered.sort_by_key(|literal| std::cmp::Reverse(literal.chars().count()));
    let alternatives: Vec<String> = ordered
        .into_iter()
        .map(|literal| regex::escape(literal))
        .collect();
    format!("(?:{})", alternatives.join("|"))
}

impl Methodical for Analyzer {
    fn process_glyph(&mut self, glyph: &str) -> Result<()> {
        if !self.walk.in_expression {
            return Ok(());
        }
        let character = glyph_character(glyph).ok_or_else(|| {
            NotationError::semantic_error(format!("The glyph {glyph} does not quote one character."))
        })?;
        self.walk.push(regex::escape(&character.to_string()));
        Ok(())
    }

    fn process_intrinsic(&mut self, intrinsic: &str) -> Result<()> {
        let regex = intrinsic_regex(intrinsic, self.walk.in_filter).ok_or_else(|| {
            NotationError::semantic_error(format!("The intrinsic {intrinsic} is unknown."))
        })?;
        if intrinsic == "ANY"
            && let Some(wildcard) = self.walk.wildcards.last_mut()
        {
            *wildcard = true;
        }
        self.walk.push(regex);
        Ok(())
    }

    fn process_literal(&mut self, literal: &str) -> Result<()> {
        let text = literal_text(literal);
        if self.walk.in_expression {
            self.walk.push(regex::escape(&text));
        } else {
            self.walk.literals.insert(text);
        }
        Ok(())
    }

    fn process_quantified(&mut self, quantified: &str) -> Result<()> {
        if self.walk.in_expression {
            self.walk.push(quantified);
        }
        Ok(())
    }

    fn preprocess_syntax(&mut self, syntax: &Syntax) -> Result<()> {
        self.walk.notice = syntax.notice().comment().to_string();
        self.walk.comment = syntax.leading_comment().to_string();
        Ok(())
    }

    fn preprocess_rule(&mut self, rule: &Rule, _index: usize, _size: usize) -> Result<()> {
        let name = rule.uppercase().to_string();
        self.walk.syntax_name.get_or_insert_with(|| name.clone());
        self.walk.rule_names.push(name);
        self.walk.occurrences.clear();
        Ok(())
    }

    fn postprocess_rule(&mut self, rule: &Rule, _index: usize, _size: usize) -> Result<()> {
        let occurrences = std::mem::take(&mut self.walk.occurrences);
        let occurrences = match rule.definition() {
            Definition::Inline(_) => consolidate(occurrences),
            Definition::Multiline(_) => occurrences,
        };
        self.walk
            .references
            .insert(rule.uppercase().to_string(), name_attributes(occurrences));
        Ok(())
    }

    fn preprocess_line(&mut self, line: &Line, _index: usize, _size: usize) -> Result<()> {
        self.walk.occurrences.push((line.identifier().clone(), false));
        Ok(())
    }

    fn preprocess_reference(&mut self, reference: &Reference) -> Result<()> {
        let own = reference.cardinality().is_some_and(is_plural);
        let plural = self
            .walk
            .brackets
            .iter()
            .rev()
            .find_map(|bracket| *bracket)
            .unwrap_or(own);
        let identifier = reference.identifier();
        if plural {
            self.walk.plurals.insert(identifier.name().to_string());
        }
        self.walk.occurrences.push((identifier.clone(), plural));
        Ok(())
    }

    fn preprocess_bracket(&mut self, bracket: &Bracket) -> Result<()> {
        self.walk.brackets.push(bracket.cardinality().map(is_plural));
        Ok(())
    }

    fn postprocess_bracket(&mut self, _bracket: &Bracket) -> Result<()> {
        self.walk.brackets.pop();
        Ok(())
    }

    fn preprocess_expression(
        &mut self,
        expression: &Expression,
        _index: usize,
        _size: usize,
    ) -> Result<()> {
        self.walk.in_expression = true;
        self.walk.expression_names.push(expression.lowercase().to_string());
        self.walk.fragments.clear();
        self.walk.push("(?:");
        Ok(())
    }

    fn postprocess_expression(
        &mut self,
        expression: &Expression,
        _index: usize,
        _size: usize,
    ) -> Result<()> {
        self.walk.push(")");
        let fragments = std::mem::take(&mut self.walk.fragments);
        self.walk
            .patterns
            .insert(expression.lowercase().to_string(), fragments);
        self.walk.in_expression = false;
        Ok(())
    }

    fn preprocess_alternative(
        &mut self,
        _alternative: &Alternative,
        _index: usize,
        _size: usize,
    ) -> Result<()> {
        self.walk.push("|");
        Ok(())
    }

    fn preprocess_repetition(
        &mut self,
        _repetition: &Repetition,
        _index: usize,
        _size: usize,
    ) -> Result<()> {
        self.walk.wildcards.push(false);
        Ok(())
    }

    fn postprocess_repetition(
        &mut self,
        repetition: &Repetition,
        _index: usize,
        _size: usize,
    ) -> Result<()> {
        let wildcard = self.walk.wildcards.pop().unwrap_or(false);
        if wildcard {
            if let Some(outer) = self.walk.wildcards.last_mut() {
                *outer = true;
            }
            if repetition.cardinality().is_some() {
                self.walk.push("?");
            }
        }
        Ok(())
    }

    fn preprocess_group(&mut self, _group: &Group) -> Result<()> {
        self.walk.push("(?:");
        Ok(())
    }

    fn postprocess_group(&mut self, _group: &Group) -> Result<()> {
        self.walk.push(")");
        Ok(())
    }

    fn preprocess_filter(&mut self, filter: &Filter) -> Result<()> {
        self.walk.in_filter = true;
        self.walk.push(if filter.is_excluded() { "[^" } else { "[" });
        Ok(())
    }

    fn postprocess_filter(&mut self, _filter: &Filter) -> Result<()> {
        self.walk.push("]");
        self.walk.in_filter = false;
        Ok(())
    }

    fn preprocess_bounded(&mut self, bounded: &Bounded) -> Result<()> {
        if !self.walk.in_filter && bounded.extent().is_some() {
            self.walk.push("[");
        }
        Ok(())
    }

    fn postprocess_bounded(&mut self, bounded: &Bounded) -> Result<()> {
        if !self.walk.in_filter && bounded.extent().is_some() {
            self.walk.push("]");
        }
        Ok(())
    }

    fn preprocess_extent(&mut self, _extent: &Extent) -> Result<()> {
        self.walk.push("-");
        Ok(())
    }

    fn preprocess_text(&mut self, text: &Text) -> Result<()> {
        if let Text::Lowercase(name) = text {
            self.walk.fragments.push(Fragment::Reference(name.clone()));
        }
        Ok(())
    }

    fn postprocess_constrained(&mut self, constrained: &Constrained) -> Result<()> {
        if !self.walk.in_expression {
            return Ok(());
        }
        let minimum = constrained.number();
        let quantifier = match constrained.limit() {
            None => format!("{{{minimum}}}"),
            Some(limit) => match limit.number() {
                None => format!("{{{minimum},}}"),
                Some(maximum) => format!("{{{minimum},{maximum}}}"),
            },
        };
        self.walk.push(quantifier);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::ast::Limit;
    use crate::notation::parser::Parser;

    const HEADER: &str = "!>\nNOTICE\n<!\n\n!>\nRULES\n<!\n\n";
    const EXPRESSIONS: &str = "!>\nEXPRESSIONS\n<!\n\n";

    fn analyze(rules: &str, expressions: &str) -> Result<Analysis> {
        let source = format!("{HEADER}{rules}{EXPRESSIONS}{expressions}");
        let syntax = Parser::new().parse_source(&source)?;
        Analyzer::new().analyze_syntax(&syntax)
    }

    #[test]
    fn plurality_of_cardinalities() {
        let quantified = |text: &str| Cardinality::Quantified(text.to_string());
        let constrained = |minimum: &str, maximum: Option<Option<&str>>| {
            Cardinality::Constrained(Constrained::new(
                minimum,
                maximum.map(|number| Limit::new(number.map(str::to_string))),
            ))
        };
        assert!(is_plural(&quantified("*")));
        assert!(is_plural(&quantified("+")));
        assert!(!is_plural(&quantified("?")));
        assert!(!is_plural(&constrained("1", None)));
        assert!(!is_plural(&constrained("1", Some(Some("1")))));
        assert!(is_plural(&constrained("1", Some(None))));
        assert!(is_plural(&constrained("2", None)));
        assert!(is_plural(&constrained("0", Some(Some("1")))));
    }

    #[test]
    fn names_and_header_text() {
        let analysis = analyze("Document: Item\n\nItem: value\n\n", "zeta: ANY\n\nvalue: DIGIT\n").unwrap();
        assert_eq!(analysis.syntax_name(), "Document");
        assert_eq!(analysis.notice(), "!>\nNOTICE\n<!");
        assert_eq!(analysis.comment(), "!>\nRULES\n<!");
        assert_eq!(analysis.rule_names(), ["Document", "Item"]);
        assert_eq!(analysis.expression_names(), ["value", "zeta"]);
    }

    #[test]
    fn repeated_references_collapse_into_a_plural() {
        let analysis = analyze("List: Item (\",\" Item)*\n\nItem: value\n\n", "value: DIGIT+\n").unwrap();
        let attributes = analysis.references_of("List").unwrap();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].name(), "items");
        assert_eq!(attributes[0].identifier(), "Item");
        assert!(attributes[0].is_plural());
        assert_eq!(attributes[0].kind(), AttributeKind::Instance);
        assert!(analysis.is_plural("Item"));
    }

    #[test]
    fn enclosing_bracket_overrides_own_cardinality() {
        let analysis = analyze("Pair: (key value+)?\n\n", "key: LOWER\n\nvalue: DIGIT\n").unwrap();
        let attributes = analysis.references_of("Pair").unwrap();
        assert!(!attributes[0].is_plural());
        assert!(!attributes[1].is_plural());
        assert_eq!(attributes[1].name(), "value");
        assert_eq!(attributes[1].kind(), AttributeKind::Token);
        assert!(!analysis.is_plural("value"));
    }

    #[test]
    fn colliding_stems_are_numbered() {
        let analysis = analyze("Pair: item items\n\n", "item: DIGIT\n\nitems: LOWER\n").unwrap();
        let names: Vec<&str> = analysis
            .references_of("Pair")
            .unwrap()
            .iter()
            .map(Attribute::name)
            .collect();
        assert_eq!(names, vec!["item", "item2"]);
    }

    #[test]
    fn multiline_lines_stay_singular() {
        let analysis = analyze("Value:\n  - Text\n  - Text\n\nText: \"t\"\n\n", "unused: ANY\n").unwrap();
        let attributes = analysis.references_of("Value").unwrap();
        assert_eq!(attributes.len(), 2);
        assert!(attributes.iter().all(|attribute| !attribute.is_plural()));
    }

    #[test]
    fn expression_references_are_substituted() {
        let analysis = analyze(
            "Document: name\n\n",
            "name: letter (letter | digit)*\n\nletter: LOWER | UPPER\n\ndigit: DIGIT\n",
        )
        .unwrap();
        assert_eq!(
            analysis.regex_of("name"),
            Some(r"(?:(?:\p{Ll}|\p{Lu})(?:(?:\p{Ll}|\p{Lu})|(?:\p{Nd}))*)")
        );
    }

    #[test]
    fn circular_references_are_rejected() {
        let error = analyze("Document: a\n\n", "a: \"x\" b\n\nb: a\n").unwrap_err();
        assert!(error.to_string().contains("a → b → a"));
    }

    #[test]
    fn delimiter_is_synthesized_from_rule_literals() {
        let analysis = analyze("Range: \"[\" value \"..\" value \"]\"\n\n", "value: DIGIT+\n").unwrap();
        assert_eq!(analysis.regex_of("delimiter"), Some(r"(?:\.\.|\[|\])"));
        assert_eq!(analysis.expression_names(), ["delimiter", "value"]);
    }

    #[test]
    fn user_delimiter_is_kept() {
        let analysis = analyze("Pair: \":\" value\n\n", "delimiter: \";\"\n\nvalue: DIGIT\n").unwrap();
        assert_eq!(analysis.regex_of("delimiter"), Some("(?:;)"));
    }

    #[test]
    fn delimiter_name_is_configurable() {
        let source = format!("{HEADER}Pair: \":\" value\n\n{EXPRESSIONS}value: DIGIT\n");
        let syntax = Parser::new().parse_source(&source).unwrap();
        let analysis = Analyzer::with_delimiter_name("punctuation")
            .analyze_syntax(&syntax)
            .unwrap();
        assert_eq!(analysis.regex_of("punctuation"), Some("(?::)"));
        assert_eq!(analysis.regex_of("delimiter"), None);
    }
}
