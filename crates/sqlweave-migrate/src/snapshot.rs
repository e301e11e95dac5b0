//! JSON snapshots and model validation.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::differ::primary_key_count;
use crate::error::{MigrateError, Result};
use crate::schema::Database;

/// Reads a [`Database`] snapshot from a JSON file.
pub fn load_database(path: impl AsRef<Path>) -> Result<Database> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let database: Database =
        serde_json::from_str(&contents).map_err(|source| MigrateError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), schemas = database.schemas.len(), "loaded snapshot");
    Ok(database)
}

/// Writes a [`Database`] snapshot as pretty-printed JSON.
pub fn save_database(path: impl AsRef<Path>, database: &Database) -> Result<()> {
    let json = serde_json::to_string_pretty(database)?;
    fs::write(path, json)?;
    Ok(())
}

/// Checks the uniqueness rules the model itself doesn't enforce.
///
/// Column and index names must be unique within a table and a table may
/// declare at most one primary key. All violations are reported together.
pub fn validate(database: &Database) -> Result<()> {
    let mut errors = Vec::new();

    for schema in &database.schemas {
        for table in &schema.tables {
            let mut columns = HashSet::new();
            for column in &table.columns {
                if !columns.insert(column.name.as_str()) {
                    errors.push(MigrateError::DuplicateColumn {
                        schema: schema.name.clone(),
                        table: table.name.clone(),
                        column: column.name.clone(),
                    });
                }
            }

            let mut indexes = HashSet::new();
            for index in &table.indexes {
                if !indexes.insert(index.name.as_str()) {
                    errors.push(MigrateError::DuplicateIndex {
                        schema: schema.name.clone(),
                        table: table.name.clone(),
                        index: index.name.clone(),
                    });
                }
            }

            let count = primary_key_count(table);
            if count > 1 {
                errors.push(MigrateError::MultiplePrimaryKeys {
                    schema: schema.name.clone(),
                    table: table.name.clone(),
                    count,
                });
            }
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(MigrateError::Multiple(errors)),
    }
}
