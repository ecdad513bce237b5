//! Round-trip tests: canonical documents survive parse and format unchanged

use cdsn_core::{FormatOptions, Formatter, Parser, RoundTripValidator, Validator, format_source};

const SELF_DESCRIPTION: &str = include_str!("fixtures/cdsn.cdsn");

const HEADER: &str = "!>\nNOTICE\n<!\n\n!>\nRULES\n<!\n\n";

/// The notation's description of itself is canonical
#[test]
fn test_self_description_round_trips() {
    let syntax = Parser::new().parse_source(SELF_DESCRIPTION).unwrap();
    Validator::new().validate_syntax(&syntax).unwrap();
    let formatted = Formatter::new().format_syntax(&syntax).unwrap();

    assert_eq!(formatted, SELF_DESCRIPTION);
}

#[test]
fn test_self_description_report() {
    let report = RoundTripValidator::new().check(SELF_DESCRIPTION).unwrap();

    assert!(report.is_canonical());
    assert!(report.is_idempotent());
    assert_eq!(report.first_difference(), None);
}

/// Sloppy layout converges after one pass
#[test]
fn test_formatting_is_idempotent() {
    let sloppy = "!>\nNOTICE\n<!\n!>\nRULES\n<!\nList:Item(\",\"   Item)*\nItem:\n - name\n - Nested\n\n\nNested: \"(\"List\")\"\n!>\nEXPRESSIONS\n<!\nname:LOWER+|'_'   {1..}\n";

    let once = format_source(sloppy).unwrap();
    let twice = format_source(&once).unwrap();

    assert_ne!(once, sloppy);
    assert_eq!(once, twice);
    assert!(once.starts_with(HEADER));
    assert!(once.contains("List: Item (\",\" Item)*\n\n"));
    assert!(once.contains("Item:\n  - name\n  - Nested\n\n"));
    assert!(once.ends_with("name: LOWER+ | '_'{1..}\n"));
}

#[test]
fn test_expression_order_is_normalized() {
    let source = format!(
        "{HEADER}Document: b a\n\n!>\nEXPRESSIONS\n<!\n\nb: \"b\"\n\na: \"a\"\n"
    );
    let report = RoundTripValidator::new().check(&source).unwrap();

    assert!(!report.is_canonical());
    assert!(report.is_idempotent());
    assert!(report.formatted.ends_with("a: \"a\"\n\nb: \"b\"\n"));
    assert_eq!(report.first_difference(), Some((15, 1)));
}

#[test]
fn test_wider_indentation_round_trips() {
    let source = format!(
        "{HEADER}Value:\n    - Text\n    - number\n\nText: \"t\"\n\n!>\nEXPRESSIONS\n<!\n\nnumber: DIGIT+\n"
    );
    let validator =
        RoundTripValidator::with_options(Parser::new(), FormatOptions { indent_size: 4 });
    let report = validator.check(&source).unwrap();

    assert!(report.is_canonical());
}
