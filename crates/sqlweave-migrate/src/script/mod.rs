//! DDL scripting.
//!
//! A [`Scripter`] turns [`Alteration`]s into DDL statements for one
//! database. Statements are [`SqlFragment`]s, so names are quoted by the
//! same renderer that handles queries.

mod postgres;

pub use postgres::PostgresScripter;

use sqlweave_core::{Dialect, SqlFragment};
use tracing::debug;

use crate::alteration::Alteration;

/// Trait for database-specific DDL generation.
pub trait Scripter {
    /// Returns the scripter name.
    fn name(&self) -> &'static str;

    /// Returns the dialect statements are rendered with.
    fn dialect(&self) -> &dyn Dialect;

    /// Generates the statements for one alteration.
    fn script(&self, alteration: &Alteration) -> Vec<SqlFragment>;

    /// Generates the statements for a batch, preserving order.
    fn script_all(&self, alterations: &[Alteration]) -> Vec<SqlFragment> {
        let statements: Vec<SqlFragment> =
            alterations.iter().flat_map(|a| self.script(a)).collect();
        debug!(
            scripter = self.name(),
            alterations = alterations.len(),
            statements = statements.len(),
            "scripted batch"
        );
        statements
    }

    /// Renders a batch as a `;`-terminated script, one statement per line.
    fn render_script(&self, alterations: &[Alteration]) -> String {
        self.script_all(alterations)
            .iter()
            .map(|statement| format!("{};\n", statement.render(self.dialect()).sql))
            .collect()
    }
}
