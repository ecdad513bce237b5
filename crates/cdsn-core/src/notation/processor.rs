//! No-op processor

use super::visitor::Methodical;

/// A [`Methodical`] implementation that does nothing at every hook
///
/// Walking a tree with it checks that the walk itself succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Processor;

impl Processor {
    pub fn new() -> Self {
        Self
    }
}

impl Methodical for Processor {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parser::Parser;
    use crate::notation::visitor::Visitor;

    #[test]
    fn walks_without_side_effects() {
        let syntax = Parser::new()
            .parse_source("!>\nN\n<!\n\n!>\nR\n<!\n\nDocument: item+\n\n!>\nE\n<!\n\nitem: ANY\n")
            .unwrap();
        let mut processor = Processor::new();
        assert!(Visitor::new(&mut processor).visit_syntax(&syntax).is_ok());
    }
}
