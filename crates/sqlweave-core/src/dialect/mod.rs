//! SQL dialect descriptors.
//!
//! A dialect is a small capability descriptor: how identifiers are
//! delimited and how parameter placeholders are spelled. Everything else
//! about rendering is shared, so one [`SqlFragment`](crate::SqlFragment)
//! renders for every database.

mod generic;
mod postgres;
mod sqlite;
mod sqlserver;

pub use generic::{GenericDialect, PositionalDialect};
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;

/// How a bound parameter is referenced from command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, ... (PostgreSQL).
    Dollar,
    /// `?` for every parameter (SQLite, MySQL, ODBC).
    QuestionMark,
    /// `{0}`, `{1}`, ... for callers that re-format with positional arguments.
    Braced,
    /// `@p0`, `@p1`, ... (SQL Server).
    AtP,
}

impl PlaceholderStyle {
    /// Spells the placeholder for the parameter at 1-based `position`.
    #[must_use]
    pub fn placeholder(self, position: usize) -> String {
        match self {
            Self::Dollar => format!("${position}"),
            Self::QuestionMark => String::from("?"),
            Self::Braced => format!("{{{}}}", position - 1),
            Self::AtP => format!("@p{}", position - 1),
        }
    }
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the opening and closing identifier delimiters.
    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    /// Returns the parameter placeholder style.
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::QuestionMark
    }

    /// Wraps `name` in delimiters, doubling any closing delimiter inside it.
    ///
    /// This is the only protection identifiers get; only pass names drawn
    /// from trusted schema metadata.
    fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.identifier_quotes();
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(open);
        for c in name.chars() {
            if c == close {
                quoted.push(close);
            }
            quoted.push(c);
        }
        quoted.push(close);
        quoted
    }

    /// Single-quotes `value` as a string literal, doubling inner quotes.
    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Spells the placeholder for the parameter at 1-based `position`.
    fn placeholder(&self, position: usize) -> String {
        self.placeholder_style().placeholder(position)
    }
}
