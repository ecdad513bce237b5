//! Lexical tokens of the syntax notation
//!
//! Every token type except the synthetic `Eof` and `Error` types carries a
//! regular expression. The scanner tries those expressions in declaration
//! order and the first one that matches a non-empty prefix wins, so more
//! specific patterns must be listed before more general ones (intrinsics
//! before uppercase identifiers, comments before notes).

use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// The kinds of lexical unit the scanner produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Error,
    Comment,
    Delimiter,
    Eof,
    Excluded,
    Glyph,
    Intrinsic,
    Literal,
    Lowercase,
    Newline,
    Note,
    Number,
    Quantified,
    Space,
    Uppercase,
}

/// Token types in the order the scanner tries them.
pub const SCAN_ORDER: [TokenType; 13] = [
    TokenType::Comment,
    TokenType::Delimiter,
    TokenType::Excluded,
    TokenType::Glyph,
    TokenType::Intrinsic,
    TokenType::Literal,
    TokenType::Lowercase,
    TokenType::Newline,
    TokenType::Note,
    TokenType::Number,
    TokenType::Quantified,
    TokenType::Space,
    TokenType::Uppercase,
];

/// The fixed set of intrinsic character classes.
pub const INTRINSICS: [&str; 6] = ["ANY", "CONTROL", "DIGIT", "EOL", "LOWER", "UPPER"];

impl TokenType {
    /// Lowercase name used in diagnostics and token dumps
    pub fn name(self) -> &'static str {
        match self {
            TokenType::Error => "error",
            TokenType::Comment => "comment",
            TokenType::Delimiter => "delimiter",
            TokenType::Eof => "eof",
            TokenType::Excluded => "excluded",
            TokenType::Glyph => "glyph",
            TokenType::Intrinsic => "intrinsic",
            TokenType::Literal => "literal",
            TokenType::Lowercase => "lowercase",
            TokenType::Newline => "newline",
            TokenType::Note => "note",
            TokenType::Number => "number",
            TokenType::Quantified => "quantified",
            TokenType::Space => "space",
            TokenType::Uppercase => "uppercase",
        }
    }

    /// Regular expression (unanchored) recognizing this token type
    pub fn pattern(self) -> Option<&'static str> {
        match self {
            TokenType::Comment => Some(r"!>\r?\n(?:(?s:.)*?\r?\n)?<!"),
            TokenType::Delimiter => Some(r"\.\.|[:|()\[\]{}-]"),
            TokenType::Excluded => Some(r"~"),
            TokenType::Glyph => Some(r"'[^\x00-\x1F\x7F]'"),
            TokenType::Intrinsic => Some(r"ANY|CONTROL|DIGIT|EOL|LOWER|UPPER"),
            TokenType::Literal => Some(r#""(?:\\[^\x00-\x1F\x7F]|[^"\\\x00-\x1F\x7F])+""#),
            TokenType::Lowercase => Some(r"[a-z][0-9A-Za-z]*_?"),
            TokenType::Newline => Some(r"\r?\n"),
            TokenType::Note => Some(r"! [^\x00-\x1F\x7F]*"),
            TokenType::Number => Some(r"[0-9]+"),
            TokenType::Quantified => Some(r"[?*+]"),
            TokenType::Space => Some(r"[ \t]+"),
            TokenType::Uppercase => Some(r"[A-Z][0-9A-Za-z]*_?"),
            TokenType::Eof | TokenType::Error => None,
        }
    }

    /// Implicit token types are recognized but never emitted.
    pub fn is_implicit(self) -> bool {
        matches!(self, TokenType::Space)
    }

    /// Check that `text` is exactly one token of this type
    pub fn matches(self, text: &str) -> bool {
        MATCHERS
            .iter()
            .find(|(token_type, _)| *token_type == self)
            .is_some_and(|(_, regex)| regex.is_match(text))
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Prefix-anchored expressions, in scan order
pub(crate) static SCANNERS: LazyLock<Vec<(TokenType, Regex)>> =
    LazyLock::new(|| compile(|pattern| format!("^(?:{pattern})")));

/// Fully-anchored expressions used to check token values
static MATCHERS: LazyLock<Vec<(TokenType, Regex)>> =
    LazyLock::new(|| compile(|pattern| format!("^(?:{pattern})$")));

fn compile(anchor: impl Fn(&str) -> String) -> Vec<(TokenType, Regex)> {
    SCAN_ORDER
        .iter()
        .filter_map(|token_type| {
            let pattern = token_type.pattern()?;
            // The patterns are compile-time constants covered by the unit tests below.
            let regex = Regex::new(&anchor(pattern)).expect("token pattern is a valid regex");
            Some((*token_type, regex))
        })
        .collect()
}

/// One lexical unit: its type, its text, and where it starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    token_type: TokenType,
    value: String,
    line: usize,
    position: usize,
}

impl Token {
    pub fn new(token_type: TokenType, value: impl Into<String>, line: usize, position: usize) -> Self {
        Self {
            token_type,
            value: value.into(),
            line,
            position,
        }
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// 1-based line number
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column, counted in characters
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token [type: {}, line: {}, position: {}]: {:?}",
            self.token_type, self.line, self.position, self.value
        )
    }
}

/// Characters that may continue an identifier.
pub(crate) fn is_identifier_character(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_'
}

/// The character quoted by a glyph such as `'a'`
pub fn glyph_character(glyph: &str) -> Option<char> {
    let mut characters = glyph.chars();
    match (characters.next(), characters.next(), characters.next(), characters.next()) {
        (Some('\''), Some(character), Some('\''), None) => Some(character),
        _ => None,
    }
}

/// The text between the quotes of a literal, with escapes resolved
pub fn literal_text(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(literal);

    let mut text = String::with_capacity(inner.len());
    let mut characters = inner.chars();
    while let Some(character) = characters.next() {
        if character != '\\' {
            text.push(character);
            continue;
        }
        match characters.next() {
            Some('n') => text.push('\n'),
            Some('r') => text.push('\r'),
            Some('t') => text.push('\t'),
            Some(other) => text.push(other),
            None => text.push('\\'),
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scanned_type_has_a_pattern() {
        assert_eq!(SCANNERS.len(), SCAN_ORDER.len());
        assert!(TokenType::Eof.pattern().is_none());
        assert!(TokenType::Error.pattern().is_none());
    }

    #[test]
    fn matches_requires_the_whole_text() {
        assert!(TokenType::Lowercase.matches("base16"));
        assert!(!TokenType::Lowercase.matches("base16 "));
        assert!(TokenType::Uppercase.matches("Syntax"));
        assert!(!TokenType::Uppercase.matches("syntax"));
        assert!(TokenType::Number.matches("42"));
        assert!(!TokenType::Number.matches("4a"));
    }

    #[test]
    fn comment_spans_lines() {
        assert!(TokenType::Comment.matches("!>\nsome words\nmore words\n<!"));
        assert!(TokenType::Comment.matches("!>\n<!"));
        assert!(!TokenType::Comment.matches("!> inline <!"));
    }

    #[test]
    fn glyphs_and_literals() {
        assert!(TokenType::Glyph.matches("'a'"));
        assert!(TokenType::Glyph.matches("'''"));
        assert!(TokenType::Glyph.matches("'\\'"));
        assert!(!TokenType::Glyph.matches("'ab'"));
        assert!(TokenType::Literal.matches(r#""x""#));
        assert!(TokenType::Literal.matches(r#""\"""#));
        assert!(!TokenType::Literal.matches(r#""""#));
    }

    #[test]
    fn delimiters() {
        for delimiter in ["..", ":", "|", "(", ")", "[", "]", "{", "}", "-"] {
            assert!(TokenType::Delimiter.matches(delimiter), "{delimiter}");
        }
        assert!(!TokenType::Delimiter.matches("."));
    }

    #[test]
    fn glyph_character_extracts_the_quoted_character() {
        assert_eq!(glyph_character("'a'"), Some('a'));
        assert_eq!(glyph_character("'''"), Some('\''));
        assert_eq!(glyph_character("'ab'"), None);
    }

    #[test]
    fn literal_text_resolves_escapes() {
        assert_eq!(literal_text(r#""x""#), "x");
        assert_eq!(literal_text(r#""a\"b""#), "a\"b");
        assert_eq!(literal_text(r#""\\""#), "\\");
        assert_eq!(literal_text(r#""\n""#), "\n");
    }

    #[test]
    fn token_display_names_type_and_location() {
        let token = Token::new(TokenType::Delimiter, ":", 3, 7);
        assert_eq!(
            token.to_string(),
            "Token [type: delimiter, line: 3, position: 7]: \":\""
        );
    }
}
