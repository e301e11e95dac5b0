//! SQL Server dialect.

use super::{Dialect, PlaceholderStyle};

/// SQL Server: `[ident]` and `@p0` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServerDialect;

impl SqlServerDialect {
    /// Creates a new SQL Server dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::AtP
    }
}
