//! Snapshot export - persists the merged tables for external consumers
//!
//! Routes writes to either a CSV or SQLite backend based on configuration.
//! Rows are (category, subcategory, metric) for stats and (advancement id)
//! for advancements; columns are display names; cells are numeric, 0 where
//! a player had no value.

pub mod csv_writer;
pub mod sqlite_writer;

pub use csv_writer::CsvExporter;
pub use sqlite_writer::SqliteExporter;

use crate::aggregate::ServerSnapshot;
use crate::config::BackendType;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Database(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<rusqlite::Error> for ExportError {
    fn from(err: rusqlite::Error) -> Self {
        ExportError::Database(err.to_string())
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "IO error: {}", e),
            ExportError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

/// Backend trait for persisting a snapshot.
pub trait ExportBackend {
    /// Write the full snapshot (stats, advancements, economy).
    fn write_snapshot(&mut self, snapshot: &ServerSnapshot) -> Result<(), ExportError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}

/// Unified writer that routes to either the CSV or SQLite backend.
pub enum SnapshotWriter {
    Csv(CsvExporter),
    Sqlite(SqliteExporter),
}

impl SnapshotWriter {
    /// Create a snapshot writer for the configured backend. `path` is the
    /// output directory for CSV and the database file for SQLite.
    pub fn new(backend: BackendType, path: PathBuf) -> Result<Self, ExportError> {
        match backend {
            BackendType::Csv => Ok(SnapshotWriter::Csv(CsvExporter::new(path)?)),
            BackendType::Sqlite => Ok(SnapshotWriter::Sqlite(SqliteExporter::new(path)?)),
        }
    }

    pub fn write_snapshot(&mut self, snapshot: &ServerSnapshot) -> Result<(), ExportError> {
        match self {
            SnapshotWriter::Csv(w) => w.write_snapshot(snapshot),
            SnapshotWriter::Sqlite(w) => w.write_snapshot(snapshot),
        }
    }

    pub fn backend_type(&self) -> &'static str {
        match self {
            SnapshotWriter::Csv(w) => w.backend_type(),
            SnapshotWriter::Sqlite(w) => w.backend_type(),
        }
    }
}
