//! Generic SQL dialects.

use super::{Dialect, PlaceholderStyle};

/// A generic SQL dialect using ANSI SQL standards.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}

/// ANSI quoting with `{0}`-style placeholders.
///
/// Produces text that a caller can hand to a driver which performs its own
/// positional formatting.
#[derive(Debug, Default, Clone, Copy)]
pub struct PositionalDialect;

impl PositionalDialect {
    /// Creates a new positional dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PositionalDialect {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Braced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_dialect() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.name(), "generic");
        assert_eq!(dialect.identifier_quotes(), ('"', '"'));
        assert_eq!(dialect.placeholder(1), "?");
    }

    #[test]
    fn test_positional_dialect() {
        let dialect = PositionalDialect::new();
        assert_eq!(dialect.placeholder(1), "{0}");
        assert_eq!(dialect.placeholder(4), "{3}");
    }
}
