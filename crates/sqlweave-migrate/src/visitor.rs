//! Preorder traversal of the schema model.
//!
//! Order: the database, then for each schema the schema itself, its
//! default privileges, its privileges, and for each table the table, its
//! columns and its indexes. Every node is visited exactly once.

use crate::schema::{Column, Database, DefaultPrivilege, Privilege, Schema, Table, TableIndex};

/// A node handed to a [`SchemaVisitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaNode<'a> {
    /// The root.
    Database(&'a Database),
    /// A schema.
    Schema(&'a Schema),
    /// A default privilege of the enclosing schema.
    DefaultPrivilege(&'a Schema, &'a DefaultPrivilege),
    /// A privilege of the enclosing schema.
    Privilege(&'a Schema, &'a Privilege),
    /// A table of the enclosing schema.
    Table(&'a Schema, &'a Table),
    /// A column of the enclosing table.
    Column(&'a Table, &'a Column),
    /// An index of the enclosing table.
    Index(&'a Table, &'a TableIndex),
}

/// Callback invoked once per node.
pub trait SchemaVisitor {
    /// Visits a node.
    fn visit(&mut self, node: SchemaNode<'_>);
}

impl<F> SchemaVisitor for F
where
    F: FnMut(SchemaNode<'_>),
{
    fn visit(&mut self, node: SchemaNode<'_>) {
        self(node);
    }
}

/// Walks `database` in preorder.
pub fn walk<V: SchemaVisitor + ?Sized>(database: &Database, visitor: &mut V) {
    visitor.visit(SchemaNode::Database(database));
    for schema in &database.schemas {
        visitor.visit(SchemaNode::Schema(schema));
        for privilege in &schema.default_privileges {
            visitor.visit(SchemaNode::DefaultPrivilege(schema, privilege));
        }
        for privilege in &schema.privileges {
            visitor.visit(SchemaNode::Privilege(schema, privilege));
        }
        for table in &schema.tables {
            visitor.visit(SchemaNode::Table(schema, table));
            for column in &table.columns {
                visitor.visit(SchemaNode::Column(table, column));
            }
            for index in &table.indexes {
                visitor.visit(SchemaNode::Index(table, index));
            }
        }
    }
}
