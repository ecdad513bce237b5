//! Error types for notation processing

use crate::notation::token::Token;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scanning, parsing, validating, formatting and analyzing
#[derive(Debug, Error)]
pub enum NotationError {
    /// The scanner found no token pattern matching the input
    #[error("Lexical error: no token matches {token}\n{excerpt}")]
    LexicalError { token: Box<Token>, excerpt: String },

    /// The parser committed to a rule and then found an unexpected token
    #[error("Syntax error: unexpected {token} while parsing {rule}\n{excerpt}\nExpected:\n{expected}")]
    SyntaxError {
        token: Box<Token>,
        rule: String,
        expected: String,
        excerpt: String,
    },

    /// The syntax parsed but is inconsistent
    #[error("Semantic error: {message}")]
    SemanticError { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Broken invariants; these indicate a bug rather than bad input
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
    Config,
    Io,
    Internal,
}

impl NotationError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotationError::LexicalError { .. } => ErrorKind::Lexical,
            NotationError::SyntaxError { .. } => ErrorKind::Syntax,
            NotationError::SemanticError { .. } => ErrorKind::Semantic,
            NotationError::ConfigError { .. } => ErrorKind::Config,
            NotationError::IoError { .. } => ErrorKind::Io,
            NotationError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Errors caused by the input file rather than the environment or a bug.
    ///
    /// A caller processing many files may report these and move on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Lexical | ErrorKind::Syntax | ErrorKind::Semantic
        )
    }

    /// The offending token of a lexical or syntax error
    pub fn token(&self) -> Option<&Token> {
        match self {
            NotationError::LexicalError { token, .. } | NotationError::SyntaxError { token, .. } => {
                Some(token.as_ref())
            }
            _ => None,
        }
    }

    /// Create a lexical error
    pub fn lexical_error(token: Token, excerpt: impl Into<String>) -> Self {
        Self::LexicalError {
            token: Box::new(token),
            excerpt: excerpt.into(),
        }
    }

    /// Create a syntax error
    pub fn syntax_error(
        token: Token,
        rule: impl Into<String>,
        expected: impl Into<String>,
        excerpt: impl Into<String>,
    ) -> Self {
        Self::SyntaxError {
            token: Box::new(token),
            rule: rule.into(),
            expected: expected.into(),
            excerpt: excerpt.into(),
        }
    }

    /// Create a semantic error
    pub fn semantic_error(message: impl Into<String>) -> Self {
        Self::SemanticError {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for NotationError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
