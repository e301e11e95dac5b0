//! Statically declared goal schemas.
//!
//! Each persisted type implements [`Entity`] and is listed explicitly in a
//! [`Registry`]. The registry produces the goal [`Database`] for the
//! differ and the [`TableRef`]s the query composer needs.
//!
//! ```rust
//! use sqlweave_migrate::registry::{Entity, Registry};
//! use sqlweave_migrate::schema::{Column, TableIndex};
//!
//! struct User;
//!
//! impl Entity for User {
//!     const TABLE: &'static str = "users";
//!
//!     fn columns() -> Vec<Column> {
//!         vec![
//!             Column::new("id", "bigint").not_null(),
//!             Column::new("email", "text").not_null(),
//!         ]
//!     }
//!
//!     fn indexes() -> Vec<TableIndex> {
//!         vec![TableIndex::primary_key("pk_users", ["id"])]
//!     }
//! }
//!
//! let goal = Registry::new().entity::<User>().database();
//! assert_eq!(goal.schemas[0].name, "public");
//! assert_eq!(goal.schemas[0].tables[0].columns.len(), 2);
//! ```

use sqlweave_core::TableRef;

use crate::schema::{Column, Database, ForeignKey, Schema, Table, TableIndex};

/// A persisted type with a declared table shape.
pub trait Entity {
    /// Schema holding the table.
    const SCHEMA: &'static str = "public";
    /// Table name.
    const TABLE: &'static str;
    /// Owning role, if any.
    const OWNER: Option<&'static str> = None;

    /// Columns in declaration order.
    fn columns() -> Vec<Column>;

    /// Indexes and key constraints.
    fn indexes() -> Vec<TableIndex> {
        Vec::new()
    }

    /// Foreign key constraints.
    fn foreign_keys() -> Vec<ForeignKey> {
        Vec::new()
    }

    /// The declared table.
    #[must_use]
    fn table() -> Table {
        let mut table = Table::new(Self::TABLE);
        if let Some(owner) = Self::OWNER {
            table = table.owner(owner);
        }
        let table = Self::columns().into_iter().fold(table, Table::column);
        let table = Self::indexes().into_iter().fold(table, Table::index);
        Self::foreign_keys().into_iter().fold(table, Table::foreign_key)
    }

    /// Reference for building statements against this table.
    #[must_use]
    fn table_ref() -> TableRef {
        TableRef::new(Self::SCHEMA, Self::TABLE)
    }
}

/// Explicit list of entities making up the goal schema.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    schemas: Vec<Schema>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            schemas: Vec::new(),
        }
    }

    /// Declares a schema owner. The schema is created if not yet known.
    #[must_use]
    pub fn schema_owner(mut self, schema: &str, owner: impl Into<String>) -> Self {
        let owner = owner.into();
        match self.schemas.iter_mut().find(|s| s.name == schema) {
            Some(existing) => existing.owner = Some(owner),
            None => self.schemas.push(Schema::new(schema).owner(owner)),
        }
        self
    }

    /// Registers an entity. Schemas appear in first-registration order.
    #[must_use]
    pub fn entity<E: Entity>(mut self) -> Self {
        let table = E::table();
        match self.schemas.iter_mut().find(|s| s.name == E::SCHEMA) {
            Some(schema) => schema.tables.push(table),
            None => self.schemas.push(Schema::new(E::SCHEMA).table(table)),
        }
        self
    }

    /// Returns the goal database.
    #[must_use]
    pub fn database(&self) -> Database {
        Database {
            schemas: self.schemas.clone(),
        }
    }

    /// Looks up a registered table by name.
    #[must_use]
    pub fn table_ref(&self, table: &str) -> Option<TableRef> {
        self.schemas.iter().find_map(|s| {
            s.find_table(table)
                .map(|t| TableRef::new(s.name.as_str(), t.name.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ForeignKeyAction;

    struct User;

    impl Entity for User {
        const TABLE: &'static str = "users";
        const OWNER: Option<&'static str> = Some("app");

        fn columns() -> Vec<Column> {
            vec![Column::new("id", "bigint").not_null(), Column::new("name", "text")]
        }

        fn indexes() -> Vec<TableIndex> {
            vec![TableIndex::primary_key("pk_users", ["id"])]
        }
    }

    struct Post;

    impl Entity for Post {
        const SCHEMA: &'static str = "blog";
        const TABLE: &'static str = "posts";

        fn columns() -> Vec<Column> {
            vec![Column::new("id", "bigint").not_null(), Column::new("author_id", "bigint")]
        }

        fn foreign_keys() -> Vec<ForeignKey> {
            vec![ForeignKey::new("fk_posts_author", "author_id", "public", "users", "id")
                .on_delete(ForeignKeyAction::Cascade)]
        }
    }

    #[test]
    fn entity_table() {
        let table = User::table();
        assert_eq!(table.name, "users");
        assert_eq!(table.owner.as_deref(), Some("app"));
        assert_eq!(table.columns[1].position, 2);
        assert_eq!(table.indexes.len(), 1);
    }

    #[test]
    fn registry_groups_by_schema() {
        let registry = Registry::new()
            .schema_owner("blog", "writer")
            .entity::<User>()
            .entity::<Post>();
        let db = registry.database();
        let names: Vec<&str> = db.schemas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["blog", "public"]);
        assert_eq!(db.schemas[0].owner.as_deref(), Some("writer"));
        assert_eq!(db.schemas[0].tables[0].foreign_keys.len(), 1);
    }

    #[test]
    fn table_refs() {
        let registry = Registry::new().entity::<User>().entity::<Post>();
        assert_eq!(registry.table_ref("posts"), Some(TableRef::new("blog", "posts")));
        assert_eq!(registry.table_ref("missing"), None);
        assert_eq!(User::table_ref(), TableRef::new("public", "users"));
    }
}
