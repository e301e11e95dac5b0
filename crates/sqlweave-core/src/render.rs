//! Fragment rendering.
//!
//! Rendering walks a fragment depth-first and produces the final command
//! text plus the ordered parameter list. Nested fragments share their
//! parent's parameter list, so numbering continues across nesting levels.

use serde::Serialize;
use tracing::trace;

use crate::dialect::Dialect;
use crate::fragment::{Argument, Identifier, Piece, SqlFragment};
use crate::value::SqlValue;

/// Command text and its bound parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    /// SQL text with dialect-specific placeholders.
    pub sql: String,
    /// Parameters in placeholder order.
    pub params: Vec<SqlValue>,
}

impl Rendered {
    /// Splits into `(sql, params)`.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}

struct Parameterizer<'d, D: ?Sized> {
    dialect: &'d D,
    sql: String,
    params: Vec<SqlValue>,
}

impl<D: Dialect + ?Sized> Parameterizer<'_, D> {
    fn write_fragment(&mut self, fragment: &SqlFragment) {
        for piece in fragment.pieces() {
            match piece {
                Piece::Text(text) => self.sql.push_str(text),
                Piece::Argument(argument) => self.write_argument(argument),
            }
        }
    }

    fn write_argument(&mut self, argument: &Argument) {
        match argument {
            Argument::Identifier(ident) => self.write_identifier(ident),
            Argument::Literal(literal) => {
                let quoted = self.dialect.quote_literal(literal.value());
                self.sql.push_str(&quoted);
            }
            Argument::Nested(nested) => self.write_fragment(nested),
            Argument::Scalar(value) => {
                self.params.push(value.clone());
                let placeholder = self.dialect.placeholder(self.params.len());
                self.sql.push_str(&placeholder);
            }
        }
    }

    fn write_identifier(&mut self, ident: &Identifier) {
        if let Some(prefix) = ident.prefix() {
            let quoted = self.dialect.quote_identifier(prefix);
            self.sql.push_str(&quoted);
            self.sql.push('.');
        }
        if ident.is_wildcard() {
            self.sql.push('*');
        } else {
            let quoted = self.dialect.quote_identifier(ident.value());
            self.sql.push_str(&quoted);
        }
    }
}

/// Renders `fragment` for `dialect`.
pub fn render<D: Dialect + ?Sized>(fragment: &SqlFragment, dialect: &D) -> Rendered {
    let mut parameterizer = Parameterizer {
        dialect,
        sql: String::new(),
        params: Vec::new(),
    };
    parameterizer.write_fragment(fragment);
    trace!(
        dialect = dialect.name(),
        params = parameterizer.params.len(),
        sql = %parameterizer.sql,
        "rendered fragment"
    );
    Rendered {
        sql: parameterizer.sql,
        params: parameterizer.params,
    }
}

impl SqlFragment {
    /// Renders this fragment for `dialect`. See [`render`].
    #[must_use]
    pub fn render<D: Dialect + ?Sized>(&self, dialect: &D) -> Rendered {
        render(self, dialect)
    }
}
