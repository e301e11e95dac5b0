//! # sqlweave-core
//!
//! Composable, parameterized SQL fragments.
//!
//! This crate provides:
//! - [`SqlFragment`]: an immutable template plus arguments, composed by
//!   nesting and joining
//! - Typed argument wrappers distinguishing identifiers and literals from
//!   bound values
//! - A renderer that turns a fragment into command text plus an ordered
//!   parameter list for a given [`Dialect`]
//! - A translator from a restricted expression AST to fragments
//!
//! ## SQL Injection Prevention
//!
//! Scalars are always bound as parameters:
//!
//! ```rust
//! use sqlweave_core::{sql, SqlFragment, SqlValue, SqliteDialect};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let query = sql!(
//!     "SELECT {0} FROM {1} WHERE {2} = {3}",
//!     SqlFragment::identifier("id"),
//!     SqlFragment::identifier("users"),
//!     SqlFragment::identifier("name"),
//!     user_input
//! );
//! let (sql, params) = query.render(&SqliteDialect).into_parts();
//!
//! assert_eq!(sql, r#"SELECT "id" FROM "users" WHERE "name" = ?"#);
//! assert_eq!(params, vec![SqlValue::Text(String::from(user_input))]);
//! ```
//!
//! Identifiers and literals are quoted, never bound. Only pass names that
//! come from trusted schema metadata.

pub mod dialect;
pub mod error;
pub mod expr;
pub mod fragment;
pub mod query;
pub mod render;
pub mod value;

pub use dialect::{
    Dialect, GenericDialect, PlaceholderStyle, PositionalDialect, PostgresDialect, SqlServerDialect,
    SqliteDialect,
};
pub use error::{FragmentError, TranslateError};
pub use expr::{translate, Expr};
pub use fragment::{Argument, Identifier, Literal, SqlFragment};
pub use query::{Query, TableRef};
pub use render::{render, Rendered};
pub use value::{SqlValue, ToSqlValue};
