//! Rule definitions of the notation, as written in the notation itself
//!
//! The parser quotes these when it reports a syntax error so the message
//! shows what the failing production expected.

/// Each parser production with its right-hand side.
pub const RULES: &[(&str, &str)] = &[
    ("Syntax", "Syntax: Notice comment Rule+ comment Expression+ EOF"),
    ("Notice", "Notice: comment"),
    ("Rule", "Rule: uppercase \":\" Definition newline+"),
    ("Definition", "Definition:\n  - Multiline\n  - Inline"),
    ("Multiline", "Multiline: Line+"),
    ("Line", "Line: newline \"-\" Identifier note?"),
    ("Identifier", "Identifier:\n  - lowercase\n  - uppercase"),
    ("Inline", "Inline: Term+ note?"),
    ("Term", "Term:\n  - Reference\n  - Bracket\n  - literal"),
    ("Reference", "Reference: Identifier Cardinality?"),
    ("Bracket", "Bracket: \"(\" Term+ \")\" Cardinality?"),
    ("Expression", "Expression: lowercase \":\" Pattern note? newline+"),
    ("Pattern", "Pattern: Sequence Alternative*"),
    ("Alternative", "Alternative: \"|\" Sequence"),
    ("Sequence", "Sequence: Repetition+"),
    ("Repetition", "Repetition: Element Cardinality?"),
    ("Element", "Element:\n  - Group\n  - Filter\n  - Text"),
    ("Group", "Group: \"(\" Pattern \")\""),
    ("Filter", "Filter: excluded? \"[\" Character+ \"]\""),
    ("Character", "Character:\n  - Bounded\n  - intrinsic"),
    ("Bounded", "Bounded: glyph Extent?"),
    ("Extent", "Extent: \"..\" glyph"),
    (
        "Text",
        "Text:\n  - Bounded\n  - intrinsic\n  - literal\n  - lowercase",
    ),
    ("Cardinality", "Cardinality:\n  - Constrained\n  - quantified"),
    ("Constrained", "Constrained: \"{\" number Limit? \"}\""),
    ("Limit", "Limit: \"..\" number?"),
];

/// The definition of `rule`, or an empty string for an unknown name
pub fn definition_of(rule: &str) -> &'static str {
    RULES
        .iter()
        .find(|(name, _)| *name == rule)
        .map(|(_, definition)| *definition)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_definition_starts_with_its_name() {
        for (name, definition) in RULES {
            assert!(definition.starts_with(&format!("{name}:")), "{name}");
        }
    }

    #[test]
    fn unknown_rules_have_no_definition() {
        assert_eq!(definition_of("Nonsense"), "");
        assert_eq!(definition_of("Limit"), "Limit: \"..\" number?");
    }
}
