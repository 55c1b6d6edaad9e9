use crate::operation::{self, Operation};

/// Selectors that end the session. Not part of the registry.
pub const QUIT_SELECTORS: [char; 2] = ['q', 'Q'];

static STANDARD_OPERATIONS: [Operation; 12] = [
    Operation::binary('+', "Addition", operation::add),
    Operation::binary('-', "Subtraction", operation::subtract),
    Operation::binary('*', "Multiplication", operation::multiply),
    Operation::binary('/', "Division", operation::divide),
    Operation::binary('%', "Modulus", operation::modulus),
    Operation::binary('^', "Power", operation::power),
    Operation::unary('a', "Absolute value", operation::absolute),
    Operation::unary('s', "Square", operation::square),
    Operation::unary('r', "Square root", operation::square_root),
    Operation::unary('l', "Natural logarithm", operation::natural_log),
    Operation::unary('L', "Logarithm base 10", operation::log10),
    Operation::unary('f', "Factorial", operation::factorial),
];

/// Immutable selector → operation table, in menu order.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    operations: &'static [Operation],
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl Registry {
    pub fn standard() -> Self {
        Self {
            operations: &STANDARD_OPERATIONS,
        }
    }

    /// Selectors are case-sensitive: `l` and `L` are different operations.
    pub fn lookup(&self, selector: char) -> Option<&'static Operation> {
        self.operations.iter().find(|op| op.selector == selector)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Operation> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn is_quit(selector: char) -> bool {
        QUIT_SELECTORS.contains(&selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Arity;
    use std::collections::HashSet;

    #[test]
    fn test_selectors_are_unique() {
        let registry = Registry::standard();
        let selectors: HashSet<char> = registry.iter().map(|op| op.selector).collect();
        assert_eq!(selectors.len(), registry.len());
        for quit in QUIT_SELECTORS {
            assert!(!selectors.contains(&quit));
        }
    }

    #[test]
    fn test_lookup() {
        let registry = Registry::standard();

        let div = registry.lookup('/').unwrap();
        assert_eq!(div.name, "Division");
        assert_eq!(div.arity(), Arity::Binary);

        let fact = registry.lookup('f').unwrap();
        assert_eq!(fact.arity(), Arity::Unary);
        assert_eq!(fact.apply(4.0, None).unwrap(), 24.0);

        assert!(registry.lookup('x').is_none());
        assert!(registry.lookup('q').is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = Registry::standard();
        assert_eq!(registry.lookup('l').unwrap().name, "Natural logarithm");
        assert_eq!(registry.lookup('L').unwrap().name, "Logarithm base 10");
        assert!(registry.lookup('A').is_none());
    }

    #[test]
    fn test_arity_table() {
        let registry = Registry::standard();
        let binary: String = registry
            .iter()
            .filter(|op| op.arity() == Arity::Binary)
            .map(|op| op.selector)
            .collect();
        assert_eq!(binary, "+-*/%^");
        assert_eq!(registry.len(), 12);
    }

    #[test]
    fn test_quit() {
        assert!(Registry::is_quit('q'));
        assert!(Registry::is_quit('Q'));
        assert!(!Registry::is_quit('+'));
    }
}
