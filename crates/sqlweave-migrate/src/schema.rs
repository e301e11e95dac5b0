//! Schema model.
//!
//! `Database -> Schema -> Table -> {Column, TableIndex, ForeignKey}`.
//! Instances are read-only snapshots: either introspected from a live
//! database or declared as a goal. The differ always compares two distinct
//! snapshots and never mutates either.

use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

/// Foreign key action (ON DELETE, ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyAction {
    /// No action (error if referenced row is deleted/updated).
    #[default]
    NoAction,
    /// Restrict (same as NoAction but checked immediately).
    Restrict,
    /// Cascade the delete/update to referencing rows.
    Cascade,
    /// Set the foreign key column to NULL.
    SetNull,
    /// Set the foreign key column to its default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of this action.
    #[must_use]
    pub const fn to_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Database type as spelled by the store, e.g. `integer` or `varchar(80)`.
    pub store_type: String,
    /// Whether the column allows NULL values.
    #[serde(default = "default_true")]
    pub is_nullable: bool,
    /// Default value expression.
    #[serde(default)]
    pub default_value_sql: Option<String>,
    /// Generation expression for stored computed columns.
    #[serde(default)]
    pub computed_column_sql: Option<String>,
    /// 1-based ordinal position. Informational; never diffed.
    #[serde(default)]
    pub position: usize,
}

impl Column {
    /// Creates a nullable column with no default.
    #[must_use]
    pub fn new(name: impl Into<String>, store_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store_type: store_type.into(),
            is_nullable: true,
            default_value_sql: None,
            computed_column_sql: None,
            position: 0,
        }
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    /// Sets the default value expression.
    #[must_use]
    pub fn default_sql(mut self, sql: impl Into<String>) -> Self {
        self.default_value_sql = Some(sql.into());
        self
    }

    /// Makes the column a stored generated column.
    #[must_use]
    pub fn computed(mut self, sql: impl Into<String>) -> Self {
        self.computed_column_sql = Some(sql.into());
        self
    }

    /// Returns `true` for generated columns.
    #[must_use]
    pub const fn is_computed(&self) -> bool {
        self.computed_column_sql.is_some()
    }
}

/// Kind of table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    /// Primary key constraint.
    PrimaryKey,
    /// Unique constraint.
    UniqueConstraint,
    /// Plain, non-unique index.
    Index,
}

/// An index or key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableIndex {
    /// Index name, unique within its table.
    pub name: String,
    /// Index kind.
    pub index_type: IndexType,
    /// Indexed columns, in key order.
    pub columns: Vec<String>,
}

impl TableIndex {
    /// Creates an index of the given kind.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, index_type: IndexType, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            index_type,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// A primary key constraint.
    #[must_use]
    pub fn primary_key<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, IndexType::PrimaryKey, columns)
    }

    /// A unique constraint.
    #[must_use]
    pub fn unique<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, IndexType::UniqueConstraint, columns)
    }

    /// A plain index.
    #[must_use]
    pub fn index<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, IndexType::Index, columns)
    }
}

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Column(s) in the referencing table.
    pub columns: Vec<String>,
    /// Schema of the referenced table.
    pub referenced_schema: String,
    /// Referenced table name.
    pub referenced_table: String,
    /// Referenced column(s).
    pub referenced_columns: Vec<String>,
    /// Action on delete.
    #[serde(default)]
    pub on_delete: ForeignKeyAction,
    /// Action on update.
    #[serde(default)]
    pub on_update: ForeignKeyAction,
}

impl ForeignKey {
    /// Creates a single-column foreign key with `NO ACTION` semantics.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        column: impl Into<String>,
        referenced_schema: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            columns: vec![column.into()],
            referenced_schema: referenced_schema.into(),
            referenced_table: referenced_table.into(),
            referenced_columns: vec![referenced_column.into()],
            on_delete: ForeignKeyAction::NoAction,
            on_update: ForeignKeyAction::NoAction,
        }
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub const fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.on_delete = action;
        self
    }

    /// Sets the ON UPDATE action.
    #[must_use]
    pub const fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.on_update = action;
        self
    }
}

/// A grant on a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privilege {
    /// Role receiving the grant.
    pub grantee: String,
    /// Granted privileges, e.g. `USAGE`.
    pub privileges: Vec<String>,
}

/// A default grant applied to objects created later in a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPrivilege {
    /// Role receiving the grant.
    pub grantee: String,
    /// Object class, e.g. `TABLES` or `SEQUENCES`.
    pub object_type: String,
    /// Granted privileges.
    pub privileges: Vec<String>,
}

/// A table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Owning role.
    #[serde(default)]
    pub owner: Option<String>,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Indexes and key constraints.
    #[serde(default)]
    pub indexes: Vec<TableIndex>,
    /// Foreign key constraints.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            columns: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Sets the owning role.
    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Appends a column, assigning its ordinal position.
    #[must_use]
    pub fn column(mut self, mut column: Column) -> Self {
        column.position = self.columns.len() + 1;
        self.columns.push(column);
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: TableIndex) -> Self {
        self.indexes.push(index);
        self
    }

    /// Adds a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Looks up an index by name.
    #[must_use]
    pub fn find_index(&self, name: &str) -> Option<&TableIndex> {
        self.indexes.iter().find(|i| i.name == name)
    }

    /// Returns the first primary key index, if any.
    #[must_use]
    pub fn primary_key(&self) -> Option<&TableIndex> {
        self.indexes
            .iter()
            .find(|i| i.index_type == IndexType::PrimaryKey)
    }
}

/// A schema (namespace) definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name.
    pub name: String,
    /// Owning role.
    #[serde(default)]
    pub owner: Option<String>,
    /// Tables in the schema.
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Default privileges.
    #[serde(default)]
    pub default_privileges: Vec<DefaultPrivilege>,
    /// Schema privileges.
    #[serde(default)]
    pub privileges: Vec<Privilege>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            tables: Vec::new(),
            default_privileges: Vec::new(),
            privileges: Vec::new(),
        }
    }

    /// Sets the owning role.
    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Adds a table.
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Adds a schema privilege.
    #[must_use]
    pub fn privilege(mut self, privilege: Privilege) -> Self {
        self.privileges.push(privilege);
        self
    }

    /// Adds a default privilege.
    #[must_use]
    pub fn default_privilege(mut self, privilege: DefaultPrivilege) -> Self {
        self.default_privileges.push(privilege);
        self
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// A whole database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Schemas in the database.
    #[serde(default)]
    pub schemas: Vec<Schema>,
}

impl Database {
    /// Creates an empty database.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            schemas: Vec::new(),
        }
    }

    /// Adds a schema.
    #[must_use]
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Looks up a schema by name.
    #[must_use]
    pub fn find_schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Table {
        Table::new("users")
            .owner("app")
            .column(Column::new("id", "integer").not_null())
            .column(Column::new("email", "text").not_null())
            .column(Column::new("created", "timestamptz").default_sql("now()"))
            .index(TableIndex::primary_key("pk_users", ["id"]))
            .index(TableIndex::unique("uq_users_email", ["email"]))
    }

    #[test]
    fn column_builder() {
        let col = Column::new("total", "numeric")
            .not_null()
            .computed("price * qty");
        assert!(!col.is_nullable);
        assert!(col.is_computed());
        assert_eq!(col.default_value_sql, None);
    }

    #[test]
    fn table_assigns_positions() {
        let table = users();
        let positions: Vec<usize> = table.columns.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn lookups() {
        let table = users();
        assert_eq!(table.find_column("email").map(|c| c.store_type.as_str()), Some("text"));
        assert!(table.find_column("missing").is_none());
        assert_eq!(table.primary_key().map(|i| i.name.as_str()), Some("pk_users"));
        assert_eq!(
            table.find_index("uq_users_email").map(|i| i.index_type),
            Some(IndexType::UniqueConstraint)
        );

        let db = Database::new().schema(Schema::new("public").table(table));
        assert!(db.find_schema("public").and_then(|s| s.find_table("users")).is_some());
        assert!(db.find_schema("other").is_none());
    }

    #[test]
    fn foreign_key_builder() {
        let fk = ForeignKey::new("fk_posts_author", "author_id", "public", "users", "id")
            .on_delete(ForeignKeyAction::Cascade);
        assert_eq!(fk.on_delete.to_sql(), "CASCADE");
        assert_eq!(fk.on_update.to_sql(), "NO ACTION");
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "schemas": [{
                "name": "public",
                "tables": [{
                    "name": "t",
                    "columns": [{"name": "id", "store_type": "integer", "is_nullable": false},
                                {"name": "note", "store_type": "text"}],
                    "indexes": [{"name": "pk_t", "index_type": "primary_key", "columns": ["id"]}]
                }]
            }]
        }"#;
        let db: Database = serde_json::from_str(json).unwrap();
        let table = &db.schemas[0].tables[0];
        assert!(!table.columns[0].is_nullable);
        assert!(table.columns[1].is_nullable);
        assert_eq!(table.owner, None);
        assert!(table.foreign_keys.is_empty());
        assert_eq!(table.indexes[0].index_type, IndexType::PrimaryKey);
    }
}
