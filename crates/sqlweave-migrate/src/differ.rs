//! Table and database differ.
//!
//! [`diff_table`] compares a current table (or its absence) with a goal
//! table and returns the alterations that move one to the other. Columns
//! and indexes are matched strictly by name: a renamed column is a drop
//! plus a create, never an alter.
//!
//! Emission order is fixed: table rename and owner change, column
//! creates, column alters, column drops, then index creates, alters and
//! drops. Script renderers rely on it.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::alteration::{Alteration, ColumnModification};
use crate::schema::{Column, Database, IndexType, Table, TableIndex};

/// Compares `current` with `goal` within `schema`.
///
/// `None` means the table does not exist yet and yields a single
/// [`Alteration::CreateTable`]. An empty result means no drift.
#[must_use]
pub fn diff_table(schema: &str, current: Option<&Table>, goal: &Table) -> Vec<Alteration> {
    let Some(current) = current else {
        debug!(schema, table = %goal.name, "table absent, creating");
        return vec![Alteration::CreateTable {
            schema: schema.to_string(),
            table: goal.clone(),
            primary_key: primary_key_columns(goal),
        }];
    };

    let mut alterations = Vec::new();
    let table = &goal.name;

    if current.name != goal.name {
        alterations.push(Alteration::RenameTable {
            schema: schema.to_string(),
            from: current.name.clone(),
            to: goal.name.clone(),
        });
    }

    if let Some(owner) = goal.owner.as_deref().filter(|o| !o.is_empty()) {
        if current.owner.as_deref() != Some(owner) {
            alterations.push(Alteration::ChangeTableOwner {
                schema: schema.to_string(),
                table: table.clone(),
                owner: owner.to_string(),
            });
        }
    }

    alterations.extend(diff_columns(schema, table, &current.columns, &goal.columns));
    alterations.extend(diff_indexes(schema, table, &current.indexes, &goal.indexes));

    debug!(
        schema,
        table = %goal.name,
        alterations = alterations.len(),
        "diffed table"
    );
    alterations
}

/// Primary key columns of `table`, falling back to its first column.
fn primary_key_columns(table: &Table) -> Vec<String> {
    table.primary_key().map_or_else(
        || table.columns.first().map(|c| c.name.clone()).into_iter().collect(),
        |pk| pk.columns.clone(),
    )
}

fn diff_columns(schema: &str, table: &str, current: &[Column], goal: &[Column]) -> Vec<Alteration> {
    let current_cols: HashMap<&str, &Column> =
        current.iter().map(|c| (c.name.as_str(), c)).collect();
    let goal_cols: HashMap<&str, &Column> = goal.iter().map(|c| (c.name.as_str(), c)).collect();

    let mut creates = Vec::new();
    let mut alters = Vec::new();

    for column in goal {
        match current_cols.get(column.name.as_str()) {
            None => creates.push(Alteration::CreateColumn {
                schema: schema.to_string(),
                table: table.to_string(),
                column: column.clone(),
            }),
            Some(existing) => {
                let modifications = column_modifications(existing, column);
                if !modifications.is_empty() {
                    alters.push(Alteration::AlterColumn {
                        schema: schema.to_string(),
                        table: table.to_string(),
                        current: (*existing).clone(),
                        goal: column.clone(),
                        modifications,
                    });
                }
            }
        }
    }

    let drops = current
        .iter()
        .filter(|c| !goal_cols.contains_key(c.name.as_str()))
        .map(|c| Alteration::DropColumn {
            schema: schema.to_string(),
            table: table.to_string(),
            column: c.name.clone(),
        });

    creates.into_iter().chain(alters).chain(drops).collect()
}

/// The attributes that differ between two same-named columns.
///
/// Attributes this model doesn't track (such as `position`) never
/// contribute, so reordered columns produce no modifications.
#[must_use]
pub fn column_modifications(current: &Column, goal: &Column) -> BTreeSet<ColumnModification> {
    let mut modifications = BTreeSet::new();
    if current.is_nullable != goal.is_nullable {
        modifications.insert(ColumnModification::Nullability);
    }
    if current.default_value_sql != goal.default_value_sql {
        modifications.insert(ColumnModification::Default);
    }
    if current.store_type != goal.store_type {
        modifications.insert(ColumnModification::Type);
    }
    if current.computed_column_sql != goal.computed_column_sql {
        modifications.insert(ColumnModification::Generated);
    }
    modifications
}

/// Structural index equality: same type and same ordered column list.
///
/// Names are the matching key and are not compared.
#[must_use]
pub fn index_equals(a: &TableIndex, b: &TableIndex) -> bool {
    a.index_type == b.index_type && a.columns == b.columns
}

fn diff_indexes(
    schema: &str,
    table: &str,
    current: &[TableIndex],
    goal: &[TableIndex],
) -> Vec<Alteration> {
    let current_map: HashMap<&str, &TableIndex> =
        current.iter().map(|i| (i.name.as_str(), i)).collect();
    let goal_map: HashMap<&str, &TableIndex> = goal.iter().map(|i| (i.name.as_str(), i)).collect();

    let mut creates = Vec::new();
    let mut alters = Vec::new();

    for index in goal {
        match current_map.get(index.name.as_str()) {
            None => creates.push(Alteration::CreateIndex {
                schema: schema.to_string(),
                table: table.to_string(),
                index: index.clone(),
            }),
            Some(existing) if !index_equals(existing, index) => {
                alters.push(Alteration::AlterIndex {
                    schema: schema.to_string(),
                    table: table.to_string(),
                    current: (*existing).clone(),
                    goal: index.clone(),
                });
            }
            Some(_) => {}
        }
    }

    let drops = current
        .iter()
        .filter(|i| !goal_map.contains_key(i.name.as_str()))
        .map(|i| Alteration::DropIndex {
            schema: schema.to_string(),
            table: table.to_string(),
            index: i.clone(),
        });

    creates.into_iter().chain(alters).chain(drops).collect()
}

/// Compares two databases schema by schema.
///
/// Goal schemas missing from `current` get a [`Alteration::CreateSchema`]
/// first; goal tables are then diffed against the same-named current
/// table. Schemas and tables only present in `current` are left alone.
#[must_use]
pub fn diff_database(current: &Database, goal: &Database) -> Vec<Alteration> {
    let mut alterations = Vec::new();

    for goal_schema in &goal.schemas {
        let current_schema = current.find_schema(&goal_schema.name);
        if current_schema.is_none() {
            alterations.push(Alteration::CreateSchema {
                schema: goal_schema.name.clone(),
                owner: goal_schema.owner.clone(),
            });
        }

        for goal_table in &goal_schema.tables {
            let current_table = current_schema.and_then(|s| s.find_table(&goal_table.name));
            alterations.extend(diff_table(&goal_schema.name, current_table, goal_table));
        }
    }

    debug!(
        schemas = goal.schemas.len(),
        alterations = alterations.len(),
        "diffed database"
    );
    alterations
}

/// Number of primary key indexes declared on `table`.
pub(crate) fn primary_key_count(table: &Table) -> usize {
    table
        .indexes
        .iter()
        .filter(|i| i.index_type == IndexType::PrimaryKey)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn table() -> Table {
        Table::new("users")
            .owner("app")
            .column(Column::new("id", "integer").not_null())
            .column(Column::new("name", "text"))
            .index(TableIndex::primary_key("pk_users", ["id"]))
    }

    fn kinds(alterations: &[Alteration]) -> Vec<&'static str> {
        alterations.iter().map(Alteration::kind).collect()
    }

    #[test]
    fn absent_table_is_created() {
        let goal = table();
        let alterations = diff_table("public", None, &goal);
        assert_eq!(alterations.len(), 1);
        let Alteration::CreateTable {
            schema,
            table,
            primary_key,
        } = &alterations[0]
        else {
            panic!("expected CreateTable");
        };
        assert_eq!(schema, "public");
        assert_eq!(table, &goal);
        assert_eq!(primary_key, &vec![String::from("id")]);
    }

    #[test]
    fn primary_key_falls_back_to_first_column() {
        let goal = Table::new("log")
            .column(Column::new("at", "timestamptz"))
            .column(Column::new("line", "text"));
        let alterations = diff_table("public", None, &goal);
        assert!(matches!(
            &alterations[0],
            Alteration::CreateTable { primary_key, .. } if primary_key == &vec![String::from("at")]
        ));
    }

    #[test]
    fn identical_tables_produce_nothing() {
        assert!(diff_table("public", Some(&table()), &table()).is_empty());
    }

    #[test]
    fn nullability_only() {
        let goal = Table {
            columns: vec![
                Column::new("id", "integer").not_null(),
                Column::new("name", "text").not_null(),
            ],
            ..table()
        };
        let alterations = diff_table("public", Some(&table()), &goal);
        assert_eq!(alterations.len(), 1);
        let Alteration::AlterColumn { modifications, .. } = &alterations[0] else {
            panic!("expected AlterColumn");
        };
        assert_eq!(
            modifications.iter().copied().collect::<Vec<_>>(),
            vec![ColumnModification::Nullability]
        );
    }

    #[test]
    fn every_modification_is_detected() {
        let current = Column::new("c", "integer");
        let goal = Column::new("c", "bigint")
            .not_null()
            .default_sql("0")
            .computed("a + b");
        assert_eq!(column_modifications(&current, &goal).len(), 4);
    }

    #[test]
    fn position_is_ignored() {
        let mut moved = Column::new("c", "integer");
        moved.position = 9;
        assert!(column_modifications(&Column::new("c", "integer"), &moved).is_empty());
    }

    #[test]
    fn rename_and_owner_come_first() {
        let current = table();
        let goal = Table {
            name: String::from("people"),
            owner: Some(String::from("admin")),
            ..table().column(Column::new("age", "integer"))
        };
        let alterations = diff_table("public", Some(&current), &goal);
        assert_eq!(
            kinds(&alterations),
            vec!["RenameTable", "ChangeTableOwner", "CreateColumn"]
        );
        assert!(matches!(
            &alterations[2],
            Alteration::CreateColumn { table, .. } if table == "people"
        ));
    }

    #[test]
    fn empty_goal_owner_is_ignored() {
        let goal = Table {
            owner: Some(String::new()),
            ..table()
        };
        assert!(diff_table("public", Some(&table()), &goal).is_empty());

        let goal = Table {
            owner: None,
            ..table()
        };
        assert!(diff_table("public", Some(&table()), &goal).is_empty());
    }

    #[test]
    fn emission_order() {
        let current = Table::new("t")
            .column(Column::new("keep", "text"))
            .column(Column::new("gone", "text"))
            .index(TableIndex::index("ix_old", ["gone"]))
            .index(TableIndex::index("ix_keep", ["keep"]));
        let goal = Table::new("t")
            .column(Column::new("keep", "varchar(10)"))
            .column(Column::new("new", "text"))
            .index(TableIndex::index("ix_keep", ["keep", "new"]))
            .index(TableIndex::unique("uq_new", ["new"]));

        let alterations = diff_table("public", Some(&current), &goal);
        assert_eq!(
            kinds(&alterations),
            vec![
                "CreateColumn",
                "AlterColumn",
                "DropColumn",
                "CreateIndex",
                "AlterIndex",
                "DropIndex",
            ]
        );
    }

    #[test]
    fn index_column_order_matters() {
        let a = TableIndex::index("ix", ["a", "b"]);
        let b = TableIndex::index("ix", ["b", "a"]);
        assert!(!index_equals(&a, &b));
        assert!(index_equals(&a, &TableIndex::index("other", ["a", "b"])));
        assert!(!index_equals(&a, &TableIndex::unique("ix", ["a", "b"])));
    }

    #[test]
    fn database_creates_missing_schema_first() {
        let current = Database::new().schema(Schema::new("public").table(table()));
        let goal = Database::new()
            .schema(Schema::new("public").table(table()))
            .schema(
                Schema::new("audit")
                    .owner("auditor")
                    .table(Table::new("events").column(Column::new("id", "bigint"))),
            );

        let alterations = diff_database(&current, &goal);
        assert_eq!(kinds(&alterations), vec!["CreateSchema", "CreateTable"]);
        assert!(matches!(
            &alterations[0],
            Alteration::CreateSchema { schema, owner }
                if schema == "audit" && owner.as_deref() == Some("auditor")
        ));
    }

    #[test]
    fn database_leaves_extra_tables_alone() {
        let current = Database::new().schema(
            Schema::new("public")
                .table(table())
                .table(Table::new("legacy").column(Column::new("id", "integer"))),
        );
        let goal = Database::new().schema(Schema::new("public").table(table()));
        assert!(diff_database(&current, &goal).is_empty());
    }

    #[test]
    fn primary_keys_are_counted() {
        let t = table().index(TableIndex::primary_key("pk_two", ["name"]));
        assert_eq!(primary_key_count(&t), 2);
    }
}
