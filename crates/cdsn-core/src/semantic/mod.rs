//! Semantic passes over a parsed syntax

pub mod analyzer;
pub mod inflection;
pub mod validator;

pub use analyzer::{Analysis, Analyzer, Attribute, AttributeKind, DEFAULT_DELIMITER_NAME};
pub use validator::Validator;
