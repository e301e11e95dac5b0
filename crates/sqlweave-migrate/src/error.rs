//! Error types for snapshot loading and validation.

use std::path::PathBuf;

/// Errors that can occur while loading or validating schema snapshots.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// IO error (reading snapshot files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read a snapshot file.
    #[error("Failed to read snapshot '{path}': {source}")]
    Snapshot {
        /// Path to the snapshot file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Two columns of one table share a name.
    #[error("Duplicate column '{column}' in table '{schema}.{table}'")]
    DuplicateColumn {
        /// Schema name.
        schema: String,
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// Two indexes of one table share a name.
    #[error("Duplicate index '{index}' in table '{schema}.{table}'")]
    DuplicateIndex {
        /// Schema name.
        schema: String,
        /// Table name.
        table: String,
        /// Index name.
        index: String,
    },

    /// A table declares more than one primary key.
    #[error("Table '{schema}.{table}' has {count} primary keys")]
    MultiplePrimaryKeys {
        /// Schema name.
        schema: String,
        /// Table name.
        table: String,
        /// Number of primary key indexes found.
        count: usize,
    },

    /// Multiple errors occurred.
    #[error("Multiple errors occurred:\n{}", .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n"))]
    Multiple(Vec<MigrateError>),
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
