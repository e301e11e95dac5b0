//! Schema model, table differ and DDL scripting.
//!
//! `sqlweave-migrate` compares a current database snapshot with a declared
//! goal and produces the alterations that close the gap:
//!
//! - **Schema** - `Database -> Schema -> Table -> {Column, TableIndex, ForeignKey}`
//! - **Differ** - Name-matched comparison producing ordered [`Alteration`]s
//! - **Visitor** - Fixed preorder traversal of a snapshot
//! - **Registry** - Goal schemas declared by explicitly listed entities
//! - **Snapshot** - JSON loading and uniqueness validation
//! - **Script** - Dialect-specific DDL rendering of alterations
//!
//! # Example
//!
//! ```rust
//! use sqlweave_migrate::prelude::*;
//!
//! let current = Table::new("users")
//!     .column(Column::new("id", "integer").not_null())
//!     .column(Column::new("name", "text"));
//! let goal = Table::new("users")
//!     .column(Column::new("id", "integer").not_null())
//!     .column(Column::new("name", "text").not_null());
//!
//! let alterations = diff_table("public", Some(&current), &goal);
//! let script = PostgresScripter::new().render_script(&alterations);
//! assert_eq!(
//!     script,
//!     "ALTER TABLE \"public\".\"users\" ALTER COLUMN \"name\" SET NOT NULL;\n"
//! );
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the DDL that moves current.json to goal.json
//! sqlweave-migrate diff --current current.json --goal goal.json
//!
//! # Same, as a JSON alteration list
//! sqlweave-migrate diff --current current.json --goal goal.json --format json
//!
//! # Outline and validate a snapshot
//! sqlweave-migrate tree --snapshot goal.json
//! sqlweave-migrate check --snapshot goal.json
//! ```

pub mod alteration;
pub mod differ;
pub mod error;
pub mod registry;
pub mod schema;
pub mod script;
pub mod snapshot;
pub mod visitor;

pub use alteration::{Alteration, ColumnModification};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::alteration::{Alteration, ColumnModification};
    pub use crate::differ::{column_modifications, diff_database, diff_table, index_equals};
    pub use crate::error::{MigrateError, Result};
    pub use crate::registry::{Entity, Registry};
    pub use crate::schema::{
        Column, Database, DefaultPrivilege, ForeignKey, ForeignKeyAction, IndexType, Privilege,
        Schema, Table, TableIndex,
    };
    pub use crate::script::{PostgresScripter, Scripter};
    pub use crate::snapshot::{load_database, save_database, validate};
    pub use crate::visitor::{walk, SchemaNode, SchemaVisitor};
}
