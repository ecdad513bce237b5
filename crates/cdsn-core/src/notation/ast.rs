//! Abstract syntax tree of a notation document
//!
//! Sequence productions are structs whose fields hold the children in
//! grammar order; optional children are `Option`s and repeated children are
//! `Vec`s whose order is significant. Choice productions are enums with
//! exactly one populated alternative.
//!
//! Nodes are built bottom-up by the parser and never change afterwards, so
//! fields are private and only readable through accessors. Token leaves are
//! stored as their raw source text.

/// The root of a document: notice, rules, and lexical expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    notice: Notice,
    leading_comment: String,
    rules: Vec<Rule>,
    trailing_comment: String,
    expressions: Vec<Expression>,
}

impl Syntax {
    pub fn new(
        notice: Notice,
        leading_comment: impl Into<String>,
        rules: Vec<Rule>,
        trailing_comment: impl Into<String>,
        expressions: Vec<Expression>,
    ) -> Self {
        Self {
            notice,
            leading_comment: leading_comment.into(),
            rules,
            trailing_comment: trailing_comment.into(),
            expressions,
        }
    }

    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    /// Comment introducing the rules
    pub fn leading_comment(&self) -> &str {
        &self.leading_comment
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Comment introducing the expressions
    pub fn trailing_comment(&self) -> &str {
        &self.trailing_comment
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }
}

/// The banner comment (copyright, license) at the top of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    comment: String,
}

impl Notice {
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
        }
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

/// `Name: Definition`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    uppercase: String,
    definition: Definition,
}

impl Rule {
    pub fn new(uppercase: impl Into<String>, definition: Definition) -> Self {
        Self {
            uppercase: uppercase.into(),
            definition,
        }
    }

    pub fn uppercase(&self) -> &str {
        &self.uppercase
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    Multiline(Multiline),
    Inline(Inline),
}

/// A bulleted list of alternatives, one identifier per line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multiline {
    lines: Vec<Line>,
}

impl Multiline {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    identifier: Identifier,
    note: Option<String>,
}

impl Line {
    pub fn new(identifier: Identifier, note: Option<String>) -> Self {
        Self { identifier, note }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Lowercase(String),
    Uppercase(String),
}

impl Identifier {
    /// The identifier text, whichever case it is
    pub fn name(&self) -> &str {
        match self {
            Identifier::Lowercase(name) | Identifier::Uppercase(name) => name,
        }
    }
}

/// Terms on the same line as the rule name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inline {
    terms: Vec<Term>,
    note: Option<String>,
}

impl Inline {
    pub fn new(terms: Vec<Term>, note: Option<String>) -> Self {
        Self { terms, note }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Reference(Reference),
    Bracket(Bracket),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    identifier: Identifier,
    cardinality: Option<Cardinality>,
}

impl Reference {
    pub fn new(identifier: Identifier, cardinality: Option<Cardinality>) -> Self {
        Self {
            identifier,
            cardinality,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn cardinality(&self) -> Option<&Cardinality> {
        self.cardinality.as_ref()
    }
}

/// Parenthesized terms sharing one cardinality
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bracket {
    terms: Vec<Term>,
    cardinality: Option<Cardinality>,
}

impl Bracket {
    pub fn new(terms: Vec<Term>, cardinality: Option<Cardinality>) -> Self {
        Self { terms, cardinality }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn cardinality(&self) -> Option<&Cardinality> {
        self.cardinality.as_ref()
    }
}

/// `name: Pattern`, a lexical expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    lowercase: String,
    pattern: Pattern,
    note: Option<String>,
}

impl Expression {
    pub fn new(lowercase: impl Into<String>, pattern: Pattern, note: Option<String>) -> Self {
        Self {
            lowercase: lowercase.into(),
            pattern,
            note,
        }
    }

    pub fn lowercase(&self) -> &str {
        &self.lowercase
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    sequence: Sequence,
    alternatives: Vec<Alternative>,
}

impl Pattern {
    pub fn new(sequence: Sequence, alternatives: Vec<Alternative>) -> Self {
        Self {
            sequence,
            alternatives,
        }
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }
}

/// `| Sequence`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    sequence: Sequence,
}

impl Alternative {
    pub fn new(sequence: Sequence) -> Self {
        Self { sequence }
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }
}

/// One option of a pattern: repetitions matched one after another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    repetitions: Vec<Repetition>,
}

impl Sequence {
    pub fn new(repetitions: Vec<Repetition>) -> Self {
        Self { repetitions }
    }

    pub fn repetitions(&self) -> &[Repetition] {
        &self.repetitions
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repetition {
    element: Element,
    cardinality: Option<Cardinality>,
}

impl Repetition {
    pub fn new(element: Element, cardinality: Option<Cardinality>) -> Self {
        Self {
            element,
            cardinality,
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn cardinality(&self) -> Option<&Cardinality> {
        self.cardinality.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Group(Group),
    Filter(Filter),
    Text(Text),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pattern: Pattern,
}

impl Group {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

/// A character class, `[...]` or `~[...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    excluded: Option<String>,
    characters: Vec<Character>,
}

impl Filter {
    pub fn new(excluded: Option<String>, characters: Vec<Character>) -> Self {
        Self {
            excluded,
            characters,
        }
    }

    pub fn excluded(&self) -> Option<&str> {
        self.excluded.as_deref()
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded.is_some()
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Character {
    Bounded(Bounded),
    Intrinsic(String),
}

/// A glyph, optionally extended to a range: `'a'` or `'a'..'z'`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounded {
    glyph: String,
    extent: Option<Extent>,
}

impl Bounded {
    pub fn new(glyph: impl Into<String>, extent: Option<Extent>) -> Self {
        Self {
            glyph: glyph.into(),
            extent,
        }
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn extent(&self) -> Option<&Extent> {
        self.extent.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extent {
    glyph: String,
}

impl Extent {
    pub fn new(glyph: impl Into<String>) -> Self {
        Self {
            glyph: glyph.into(),
        }
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    Bounded(Bounded),
    Intrinsic(String),
    Literal(String),
    Lowercase(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cardinality {
    Constrained(Constrained),
    Quantified(String),
}

/// `{n}`, `{n..}` or `{n..m}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constrained {
    number: String,
    limit: Option<Limit>,
}

impl Constrained {
    pub fn new(number: impl Into<String>, limit: Option<Limit>) -> Self {
        Self {
            number: number.into(),
            limit,
        }
    }

    /// The minimum count
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn limit(&self) -> Option<&Limit> {
        self.limit.as_ref()
    }
}

/// `..` with an optional maximum count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limit {
    number: Option<String>,
}

impl Limit {
    pub fn new(number: Option<String>) -> Self {
        Self { number }
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }
}
