//! Alterations produced by the differ.
//!
//! Alterations are pure data. Each one carries the names and goal-state
//! payload a script renderer needs; none of them knows how to print SQL.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::schema::{Column, Table, TableIndex};

/// One changed attribute of an existing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColumnModification {
    /// `is_nullable` differs.
    Nullability,
    /// `default_value_sql` differs.
    Default,
    /// `store_type` differs.
    Type,
    /// `computed_column_sql` differs.
    Generated,
}

/// A single schema change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Alteration {
    /// Create a schema.
    CreateSchema {
        /// Schema name.
        schema: String,
        /// Owning role.
        owner: Option<String>,
    },

    /// Create a table with its columns, indexes and foreign keys.
    CreateTable {
        /// Schema name.
        schema: String,
        /// Goal table definition.
        table: Table,
        /// Columns of the primary key constraint.
        primary_key: Vec<String>,
    },

    /// Rename a table.
    RenameTable {
        /// Schema name.
        schema: String,
        /// Current table name.
        from: String,
        /// Goal table name.
        to: String,
    },

    /// Change a table's owner.
    ChangeTableOwner {
        /// Schema name.
        schema: String,
        /// Table name.
        table: String,
        /// New owning role.
        owner: String,
    },

    /// Add a column.
    CreateColumn {
        /// Schema name.
        schema: String,
        /// Table name.
        table: String,
        /// Goal column definition.
        column: Column,
    },

    /// Change attributes of an existing column.
    AlterColumn {
        /// Schema name.
        schema: String,
        /// Table name.
        table: String,
        /// Current column definition.
        current: Column,
        /// Goal column definition.
        goal: Column,
        /// Changed attributes, never empty.
        modifications: BTreeSet<ColumnModification>,
    },

    /// Drop a column.
    DropColumn {
        /// Schema name.
        schema: String,
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// Create an index or key constraint.
    CreateIndex {
        /// Schema name.
        schema: String,
        /// Table name.
        table: String,
        /// Goal index definition.
        index: TableIndex,
    },

    /// Replace an index whose definition changed.
    AlterIndex {
        /// Schema name.
        schema: String,
        /// Table name.
        table: String,
        /// Current index definition.
        current: TableIndex,
        /// Goal index definition.
        goal: TableIndex,
    },

    /// Drop an index or key constraint.
    DropIndex {
        /// Schema name.
        schema: String,
        /// Table name.
        table: String,
        /// Current index definition.
        index: TableIndex,
    },
}

impl Alteration {
    /// Returns the variant name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CreateSchema { .. } => "CreateSchema",
            Self::CreateTable { .. } => "CreateTable",
            Self::RenameTable { .. } => "RenameTable",
            Self::ChangeTableOwner { .. } => "ChangeTableOwner",
            Self::CreateColumn { .. } => "CreateColumn",
            Self::AlterColumn { .. } => "AlterColumn",
            Self::DropColumn { .. } => "DropColumn",
            Self::CreateIndex { .. } => "CreateIndex",
            Self::AlterIndex { .. } => "AlterIndex",
            Self::DropIndex { .. } => "DropIndex",
        }
    }

    /// Returns a human-readable description of this alteration.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateSchema { schema, .. } => format!("Create schema '{schema}'"),
            Self::CreateTable { schema, table, .. } => {
                format!("Create table '{schema}.{}'", table.name)
            }
            Self::RenameTable { schema, from, to } => {
                format!("Rename table '{schema}.{from}' to '{to}'")
            }
            Self::ChangeTableOwner {
                schema,
                table,
                owner,
            } => format!("Change owner of table '{schema}.{table}' to '{owner}'"),
            Self::CreateColumn {
                schema,
                table,
                column,
            } => format!("Add column '{}' to table '{schema}.{table}'", column.name),
            Self::AlterColumn {
                schema,
                table,
                goal,
                modifications,
                ..
            } => format!(
                "Alter column '{}' in table '{schema}.{table}' ({modifications:?})",
                goal.name
            ),
            Self::DropColumn {
                schema,
                table,
                column,
            } => format!("Drop column '{column}' from table '{schema}.{table}'"),
            Self::CreateIndex {
                schema,
                table,
                index,
            } => format!("Create index '{}' on table '{schema}.{table}'", index.name),
            Self::AlterIndex {
                schema,
                table,
                goal,
                ..
            } => format!("Alter index '{}' on table '{schema}.{table}'", goal.name),
            Self::DropIndex {
                schema,
                table,
                index,
            } => format!("Drop index '{}' from table '{schema}.{table}'", index.name),
        }
    }
}
