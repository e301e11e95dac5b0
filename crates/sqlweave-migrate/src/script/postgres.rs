//! PostgreSQL DDL generation.

use std::collections::BTreeSet;

use sqlweave_core::{sql, Dialect, PostgresDialect, SqlFragment};

use super::Scripter;
use crate::alteration::{Alteration, ColumnModification};
use crate::schema::{Column, ForeignKey, IndexType, Table, TableIndex};

/// PostgreSQL scripter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresScripter {
    dialect: PostgresDialect,
}

impl PostgresScripter {
    /// Creates a new PostgreSQL scripter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dialect: PostgresDialect::new(),
        }
    }

    /// `"name" type [GENERATED ALWAYS AS (..) STORED] [NOT NULL] [DEFAULT ..]`.
    #[must_use]
    pub fn column_definition(&self, column: &Column) -> SqlFragment {
        let mut definition = sql!(
            "{0} {1}",
            SqlFragment::identifier(&column.name),
            SqlFragment::raw(&column.store_type)
        );
        if let Some(computed) = &column.computed_column_sql {
            definition = definition.append(sql!(
                " GENERATED ALWAYS AS ({0}) STORED",
                SqlFragment::raw(computed)
            ));
        }
        if !column.is_nullable {
            definition = definition.append(SqlFragment::raw(" NOT NULL"));
        }
        if let (Some(default), None) = (&column.default_value_sql, &column.computed_column_sql) {
            definition = definition.append(sql!(" DEFAULT {0}", SqlFragment::raw(default)));
        }
        definition
    }

    fn create_table(
        &self,
        schema: &str,
        table: &Table,
        primary_key: &[String],
    ) -> Vec<SqlFragment> {
        let name = SqlFragment::qualified(schema, &table.name);

        let mut elements: Vec<SqlFragment> = table
            .columns
            .iter()
            .map(|c| self.column_definition(c))
            .collect();
        if !primary_key.is_empty() {
            let constraint = table
                .primary_key()
                .map_or_else(|| format!("pk_{}", table.name), |pk| pk.name.clone());
            elements.push(sql!(
                "CONSTRAINT {0} PRIMARY KEY ({1})",
                SqlFragment::identifier(constraint),
                SqlFragment::identifier_list(primary_key)
            ));
        }

        let mut statements = vec![sql!(
            "CREATE TABLE {0} ({1})",
            name.clone(),
            SqlFragment::join(", ", elements)
        )];
        if let Some(owner) = table.owner.as_deref().filter(|o| !o.is_empty()) {
            statements.push(owner_to(name, owner));
        }
        statements.extend(
            table
                .indexes
                .iter()
                .filter(|i| i.index_type != IndexType::PrimaryKey)
                .map(|i| create_index(schema, &table.name, i)),
        );
        statements.extend(
            table
                .foreign_keys
                .iter()
                .map(|fk| add_foreign_key(schema, &table.name, fk)),
        );
        statements
    }

    fn alter_column(
        &self,
        schema: &str,
        table: &str,
        current: &Column,
        goal: &Column,
        modifications: &BTreeSet<ColumnModification>,
    ) -> Vec<SqlFragment> {
        let target = SqlFragment::qualified(schema, table);
        let column = SqlFragment::identifier(&goal.name);

        if modifications.contains(&ColumnModification::Generated) && goal.is_computed() {
            return vec![
                sql!("ALTER TABLE {0} DROP COLUMN {1}", target.clone(), column),
                sql!(
                    "ALTER TABLE {0} ADD COLUMN {1}",
                    target,
                    self.column_definition(goal)
                ),
            ];
        }

        let alter = |action: SqlFragment| {
            sql!(
                "ALTER TABLE {0} ALTER COLUMN {1} {2}",
                target.clone(),
                column.clone(),
                action
            )
        };

        let mut statements = Vec::new();
        if modifications.contains(&ColumnModification::Generated) && current.is_computed() {
            statements.push(alter(SqlFragment::raw("DROP EXPRESSION")));
        }
        if modifications.contains(&ColumnModification::Type) {
            statements.push(alter(sql!(
                "TYPE {0} USING {1}::{2}",
                SqlFragment::raw(&goal.store_type),
                SqlFragment::identifier(&goal.name),
                SqlFragment::raw(&goal.store_type)
            )));
        }
        if modifications.contains(&ColumnModification::Default) {
            statements.push(alter(match &goal.default_value_sql {
                Some(default) => sql!("SET DEFAULT {0}", SqlFragment::raw(default)),
                None => SqlFragment::raw("DROP DEFAULT"),
            }));
        }
        if modifications.contains(&ColumnModification::Nullability) {
            statements.push(alter(SqlFragment::raw(if goal.is_nullable {
                "DROP NOT NULL"
            } else {
                "SET NOT NULL"
            })));
        }
        statements
    }
}

fn owner_to(target: SqlFragment, owner: &str) -> SqlFragment {
    sql!(
        "ALTER TABLE {0} OWNER TO {1}",
        target,
        SqlFragment::identifier(owner)
    )
}

fn create_index(schema: &str, table: &str, index: &TableIndex) -> SqlFragment {
    let target = SqlFragment::qualified(schema, table);
    let name = SqlFragment::identifier(&index.name);
    let columns = SqlFragment::identifier_list(&index.columns);
    match index.index_type {
        IndexType::PrimaryKey => sql!(
            "ALTER TABLE {0} ADD CONSTRAINT {1} PRIMARY KEY ({2})",
            target,
            name,
            columns
        ),
        IndexType::UniqueConstraint => sql!(
            "ALTER TABLE {0} ADD CONSTRAINT {1} UNIQUE ({2})",
            target,
            name,
            columns
        ),
        IndexType::Index => sql!("CREATE INDEX {0} ON {1} ({2})", name, target, columns),
    }
}

// Column drops run before index drops and PostgreSQL removes an index
// together with its columns, so the index may already be gone.
fn drop_index(schema: &str, table: &str, index: &TableIndex) -> SqlFragment {
    match index.index_type {
        IndexType::PrimaryKey | IndexType::UniqueConstraint => sql!(
            "ALTER TABLE {0} DROP CONSTRAINT IF EXISTS {1}",
            SqlFragment::qualified(schema, table),
            SqlFragment::identifier(&index.name)
        ),
        IndexType::Index => sql!(
            "DROP INDEX IF EXISTS {0}",
            SqlFragment::qualified(schema, &index.name)
        ),
    }
}

fn add_foreign_key(schema: &str, table: &str, fk: &ForeignKey) -> SqlFragment {
    sql!(
        "ALTER TABLE {0} ADD CONSTRAINT {1} FOREIGN KEY ({2}) REFERENCES {3} ({4}) ON DELETE {5} ON UPDATE {6}",
        SqlFragment::qualified(schema, table),
        SqlFragment::identifier(&fk.name),
        SqlFragment::identifier_list(&fk.columns),
        SqlFragment::qualified(&fk.referenced_schema, &fk.referenced_table),
        SqlFragment::identifier_list(&fk.referenced_columns),
        SqlFragment::raw(fk.on_delete.to_sql()),
        SqlFragment::raw(fk.on_update.to_sql())
    )
}

impl Scripter for PostgresScripter {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn script(&self, alteration: &Alteration) -> Vec<SqlFragment> {
        match alteration {
            Alteration::CreateSchema { schema, owner } => {
                let mut statement =
                    sql!("CREATE SCHEMA IF NOT EXISTS {0}", SqlFragment::identifier(schema));
                if let Some(owner) = owner.as_deref().filter(|o| !o.is_empty()) {
                    statement = statement
                        .append(sql!(" AUTHORIZATION {0}", SqlFragment::identifier(owner)));
                }
                vec![statement]
            }
            Alteration::CreateTable {
                schema,
                table,
                primary_key,
            } => self.create_table(schema, table, primary_key),
            Alteration::RenameTable { schema, from, to } => vec![sql!(
                "ALTER TABLE {0} RENAME TO {1}",
                SqlFragment::qualified(schema, from),
                SqlFragment::identifier(to)
            )],
            Alteration::ChangeTableOwner {
                schema,
                table,
                owner,
            } => vec![owner_to(SqlFragment::qualified(schema, table), owner)],
            Alteration::CreateColumn {
                schema,
                table,
                column,
            } => vec![sql!(
                "ALTER TABLE {0} ADD COLUMN {1}",
                SqlFragment::qualified(schema, table),
                self.column_definition(column)
            )],
            Alteration::AlterColumn {
                schema,
                table,
                current,
                goal,
                modifications,
            } => self.alter_column(schema, table, current, goal, modifications),
            Alteration::DropColumn {
                schema,
                table,
                column,
            } => vec![sql!(
                "ALTER TABLE {0} DROP COLUMN {1}",
                SqlFragment::qualified(schema, table),
                SqlFragment::identifier(column)
            )],
            Alteration::CreateIndex {
                schema,
                table,
                index,
            } => vec![create_index(schema, table, index)],
            Alteration::AlterIndex {
                schema,
                table,
                current,
                goal,
            } => vec![
                drop_index(schema, table, current),
                create_index(schema, table, goal),
            ],
            Alteration::DropIndex {
                schema,
                table,
                index,
            } => vec![drop_index(schema, table, index)],
        }
    }
}
