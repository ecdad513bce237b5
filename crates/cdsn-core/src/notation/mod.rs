//! Notation front end: tokens, scanning, parsing, tree walking and formatting

pub mod ast;
pub mod formatter;
pub mod grammar;
pub mod parser;
pub mod processor;
pub mod round_trip;
pub mod scanner;
pub mod token;
pub mod visitor;

pub use ast::*;
pub use formatter::{FormatOptions, Formatter};
pub use parser::Parser;
pub use processor::Processor;
pub use round_trip::{RoundTripReport, RoundTripValidator};
pub use scanner::{DEFAULT_QUEUE_CAPACITY, Scanner, scan};
pub use token::{Token, TokenType};
pub use visitor::{Methodical, Visitor};
