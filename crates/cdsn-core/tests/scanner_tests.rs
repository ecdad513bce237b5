//! Scanner behavior observed through the token stream

use std::sync::Arc;
use std::sync::mpsc;

use cdsn_core::notation::DEFAULT_QUEUE_CAPACITY;
use cdsn_core::{Scanner, Token, TokenType, scan};

#[test]
fn test_tokens_arrive_in_document_order() {
    let tokens = scan("a: \"x\"\nb: \"y\"\n").unwrap();
    let positions: Vec<(usize, usize)> = tokens
        .iter()
        .map(|token| (token.line(), token.position()))
        .collect();

    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(tokens.len(), 9);
    assert_eq!(tokens.last().map(Token::token_type), Some(TokenType::Eof));
}

#[test]
fn test_error_token_ends_the_stream() {
    let tokens = scan("a: \"x\"\n\u{1}b: \"y\"\n").unwrap();
    let errors: Vec<&Token> = tokens
        .iter()
        .filter(|token| token.token_type() == TokenType::Error)
        .collect();

    assert_eq!(errors.len(), 1);
    assert_eq!(tokens.last().map(Token::token_type), Some(TokenType::Error));
    assert_eq!((errors[0].line(), errors[0].position()), (2, 1));
    assert!(tokens.iter().all(|token| token.token_type() != TokenType::Eof));
}

#[test]
fn test_scanner_runs_ahead_of_a_slow_consumer() {
    let source: Arc<str> = Arc::from("word ".repeat(100).as_str());
    let (sender, receiver) = mpsc::sync_channel(DEFAULT_QUEUE_CAPACITY);
    let handle = Scanner::spawn(source, sender);

    let mut count = 0;
    for token in receiver.iter() {
        assert_eq!(token.token_type() == TokenType::Eof, count == 100);
        count += 1;
    }

    assert_eq!(count, 101);
    assert!(handle.join().is_ok());
}

#[test]
fn test_every_token_kind_is_recognized() {
    let tokens = scan("!>\nc\n<!\nName: .. ~ 'a' ANY \"lit\" lower ! note\n42 ? Upper").unwrap();
    let kinds: Vec<TokenType> = tokens.iter().map(Token::token_type).collect();

    assert_eq!(
        kinds,
        vec![
            TokenType::Comment,
            TokenType::Newline,
            TokenType::Uppercase,
            TokenType::Delimiter,
            TokenType::Delimiter,
            TokenType::Excluded,
            TokenType::Glyph,
            TokenType::Intrinsic,
            TokenType::Literal,
            TokenType::Lowercase,
            TokenType::Note,
            TokenType::Newline,
            TokenType::Number,
            TokenType::Quantified,
            TokenType::Uppercase,
            TokenType::Eof,
        ]
    );
}

#[test]
fn test_crlf_line_endings() {
    let tokens = scan("a\r\nb").unwrap();

    assert_eq!(tokens[1].token_type(), TokenType::Newline);
    assert_eq!(tokens[1].value(), "\r\n");
    assert_eq!((tokens[2].line(), tokens[2].position()), (2, 1));
}
