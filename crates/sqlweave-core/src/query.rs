//! CRUD statements composed from translated lambdas.
//!
//! The lambda parameter name becomes the table alias, so
//! `u => u.Active == true` against `public.users` selects from
//! `"public"."users" AS "u"`.

use crate::error::TranslateError;
use crate::expr::{translate, Expr};
use crate::fragment::SqlFragment;
use crate::sql;

/// A schema-qualified table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    schema: String,
    name: String,
}

impl TableRef {
    /// Creates a table reference.
    #[must_use]
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Returns the schema name.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `"schema"."name"`.
    #[must_use]
    pub fn fragment(&self) -> SqlFragment {
        SqlFragment::qualified(&self.schema, &self.name)
    }
}

fn split_lambda(expr: &Expr) -> Result<(&str, &Expr), TranslateError> {
    match expr {
        Expr::Lambda { parameter, body } => Ok((parameter.as_str(), body.as_ref())),
        other => Err(TranslateError::unsupported(other.kind())),
    }
}

/// Splits a predicate lambda and translates it; projections are rejected.
fn predicate_condition(predicate: &Expr) -> Result<(&str, SqlFragment), TranslateError> {
    let (alias, body) = split_lambda(predicate)?;
    if matches!(body, Expr::MemberInit { .. }) {
        return Err(TranslateError::unsupported(body.kind()));
    }
    Ok((alias, translate(predicate)?))
}

fn with_where(statement: SqlFragment, condition: SqlFragment) -> SqlFragment {
    if condition.is_empty() {
        statement
    } else {
        statement.append(sql!(" WHERE {0}", condition))
    }
}

/// Statement constructors.
#[derive(Debug, Clone, Copy)]
pub struct Query;

impl Query {
    /// `SELECT "u".* FROM table AS "u" WHERE ...`.
    ///
    /// A predicate whose body is the bare parameter selects every row.
    pub fn select(table: &TableRef, predicate: &Expr) -> Result<SqlFragment, TranslateError> {
        let (alias, condition) = predicate_condition(predicate)?;
        let statement = sql!(
            "SELECT {0} FROM {1} AS {2}",
            SqlFragment::qualified(alias, "*"),
            table.fragment(),
            SqlFragment::identifier(alias)
        );
        Ok(with_where(statement, condition))
    }

    /// `UPDATE table AS "u" SET ... WHERE ...`.
    ///
    /// `projection` must be a lambda whose body is a member initialization
    /// and whose parameter has the same name as the predicate's.
    pub fn update(
        table: &TableRef,
        projection: &Expr,
        predicate: &Expr,
    ) -> Result<SqlFragment, TranslateError> {
        let (parameter, assignments) = split_lambda(projection)?;
        if !matches!(assignments, Expr::MemberInit { .. }) {
            return Err(TranslateError::unsupported(assignments.kind()));
        }
        let (alias, condition) = predicate_condition(predicate)?;
        if parameter != alias {
            return Err(TranslateError::UnboundParameter {
                parameter: String::from(parameter),
                expected: String::from(alias),
            });
        }
        let statement = sql!(
            "UPDATE {0} AS {1} SET {2}",
            table.fragment(),
            SqlFragment::identifier(alias),
            translate(projection)?
        );
        Ok(with_where(statement, condition))
    }

    /// `DELETE FROM table AS "u" WHERE ...`.
    pub fn delete(table: &TableRef, predicate: &Expr) -> Result<SqlFragment, TranslateError> {
        let (alias, condition) = predicate_condition(predicate)?;
        let statement = sql!(
            "DELETE FROM {0} AS {1}",
            table.fragment(),
            SqlFragment::identifier(alias)
        );
        Ok(with_where(statement, condition))
    }
}
