#![allow(dead_code)]

use sqlweave_core::{Dialect, PostgresDialect, SqlFragment, SqlValue};

pub fn pg(fragment: &SqlFragment) -> (String, Vec<SqlValue>) {
    fragment.render(&PostgresDialect).into_parts()
}

pub fn pg_sql(fragment: &SqlFragment) -> String {
    pg(fragment).0
}

pub fn render_with(fragment: &SqlFragment, dialect: &dyn Dialect) -> (String, Vec<SqlValue>) {
    fragment.render(dialect).into_parts()
}

pub fn text(value: &str) -> SqlValue {
    SqlValue::Text(String::from(value))
}
