//! Background scanner feeding tokens to the parser
//!
//! The scanner runs on its own thread and publishes tokens into a bounded
//! channel. A full channel blocks the scanner until the parser catches up.
//! The stream always ends with exactly one `Eof` or `Error` token, after
//! which the sending half is dropped.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, trace};

use super::token::{SCANNERS, Token, TokenType, is_identifier_character};
use crate::error::NotationError;
use crate::result::Result;

/// Default capacity of the token channel.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Converts source text into a stream of tokens
pub struct Scanner {
    source: Arc<str>,
    offset: usize,
    line: usize,
    position: usize,
    tokens: SyncSender<Token>,
}

impl Scanner {
    /// Start scanning `source` on a new thread
    ///
    /// Tokens are sent to `tokens`. If the receiving half is dropped the
    /// scanner stops at the next send.
    pub fn spawn(source: Arc<str>, tokens: SyncSender<Token>) -> JoinHandle<()> {
        let scanner = Scanner {
            source,
            offset: 0,
            line: 1,
            position: 1,
            tokens,
        };
        thread::spawn(move || scanner.run())
    }

    fn run(mut self) {
        let mut count = 0usize;
        while self.offset < self.source.len() {
            let Some((token_type, length)) = self.match_next() else {
                let rest = &self.source[self.offset..];
                let character = rest.chars().next().map(String::from).unwrap_or_default();
                let token = Token::new(TokenType::Error, character, self.line, self.position);
                debug!("Scanner stopped at {}", token);
                let _ = self.tokens.send(token);
                return;
            };

            let value = &self.source[self.offset..self.offset + length];
            if !token_type.is_implicit() {
                let token = Token::new(token_type, value, self.line, self.position);
                trace!("{}", token);
                if self.tokens.send(token).is_err() {
                    debug!("Token receiver dropped, scanner stopping");
                    return;
                }
                count += 1;
            }
            self.advance(length);
        }

        let _ = self
            .tokens
            .send(Token::new(TokenType::Eof, "", self.line, self.position));
        debug!("Scanned {} tokens", count);
    }

    /// The first token pattern matching a non-empty prefix of the remaining input
    fn match_next(&self) -> Option<(TokenType, usize)> {
        let rest = &self.source[self.offset..];
        for (token_type, regex) in SCANNERS.iter() {
            let Some(found) = regex.find(rest) else {
                continue;
            };
            let length = found.end();
            if length == 0 {
                continue;
            }
            // `ANYTHING` is an uppercase identifier, not the intrinsic `ANY`.
            if *token_type == TokenType::Intrinsic
                && rest[length..].chars().next().is_some_and(is_identifier_character)
            {
                continue;
            }
            return Some((*token_type, length));
        }
        None
    }

    fn advance(&mut self, length: usize) {
        let consumed = &self.source[self.offset..self.offset + length];
        let newlines = consumed.matches('\n').count();
        if newlines > 0 {
            self.line += newlines;
            let tail = consumed.rsplit('\n').next().unwrap_or_default();
            self.position = tail.chars().count() + 1;
        } else {
            self.position += consumed.chars().count();
        }
        self.offset += length;
    }
}

/// Scan `source` to completion and collect every token, including the final
/// `Eof` or `Error` token
pub fn scan(source: &str) -> Result<Vec<Token>> {
    let (sender, receiver) = mpsc::sync_channel(DEFAULT_QUEUE_CAPACITY);
    let handle = Scanner::spawn(Arc::from(source), sender);
    drain(receiver, handle)
}

/// Collect a token stream until it closes, then reap the thread feeding it
fn drain(tokens: Receiver<Token>, handle: JoinHandle<()>) -> Result<Vec<Token>> {
    let tokens: Vec<Token> = tokens.iter().collect();
    handle.join().map_err(|_| {
        error!("Scanner thread panicked after {} tokens", tokens.len());
        NotationError::internal_error("The scanner thread panicked.")
    })?;
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(Token::token_type).collect()
    }

    #[test]
    fn spaces_are_not_emitted() {
        let tokens = scan("Name: Term+\n").unwrap();
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Uppercase,
                TokenType::Delimiter,
                TokenType::Uppercase,
                TokenType::Quantified,
                TokenType::Newline,
                TokenType::Eof,
            ]
        );
        assert_eq!(tokens[2].value(), "Term");
        assert_eq!(tokens[2].position(), 7);
    }

    #[test]
    fn intrinsic_requires_a_word_boundary() {
        let tokens = scan("ANY ANYTHING UPPER_").unwrap();
        assert_eq!(tokens[0].token_type(), TokenType::Intrinsic);
        assert_eq!(tokens[1].token_type(), TokenType::Uppercase);
        assert_eq!(tokens[1].value(), "ANYTHING");
        assert_eq!(tokens[2].token_type(), TokenType::Uppercase);
        assert_eq!(tokens[2].value(), "UPPER_");
    }

    #[test]
    fn lines_and_positions_follow_newlines() {
        let tokens = scan("!>\nhello\n<!\nrule").unwrap();
        assert_eq!(tokens[0].token_type(), TokenType::Comment);
        assert_eq!((tokens[1].line(), tokens[1].position()), (3, 3));
        assert_eq!(tokens[2].token_type(), TokenType::Lowercase);
        assert_eq!((tokens[2].line(), tokens[2].position()), (4, 1));
    }

    #[test]
    fn positions_count_characters() {
        let tokens = scan("\"é\" x").unwrap();
        assert_eq!(tokens[1].value(), "x");
        assert_eq!(tokens[1].position(), 5);
    }

    #[test]
    fn illegal_character_ends_the_stream() {
        let tokens = scan("a: $ b").unwrap();
        let last = tokens.last().unwrap();
        assert_eq!(last.token_type(), TokenType::Error);
        assert_eq!(last.value(), "$");
        assert_eq!(last.position(), 4);
        assert_eq!(
            tokens
                .iter()
                .filter(|token| token.token_type() == TokenType::Error)
                .count(),
            1
        );
    }

    #[test]
    fn empty_source_yields_only_eof() {
        let tokens = scan("").unwrap();
        assert_eq!(types(&tokens), vec![TokenType::Eof]);
        assert_eq!((tokens[0].line(), tokens[0].position()), (1, 1));
    }

    #[test]
    fn dropped_receiver_stops_the_scanner() {
        let (sender, receiver) = mpsc::sync_channel(1);
        let handle = Scanner::spawn(Arc::from("a b c d e f g h"), sender);
        drop(receiver);
        assert!(handle.join().is_ok());
    }

    #[test]
    fn panicked_scanner_is_an_internal_error() {
        let (sender, receiver) = mpsc::sync_channel(1);
        let handle = thread::spawn(move || {
            let _ = sender.send(Token::new(TokenType::Uppercase, "Name", 1, 1));
            panic!("scanner failure");
        });

        let error = drain(receiver, handle).unwrap_err();
        assert_eq!(error.kind(), crate::error::ErrorKind::Internal);
        assert!(!error.is_recoverable());
    }
}
