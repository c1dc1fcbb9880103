//! SQLite export backend

use super::{ExportBackend, ExportError};
use crate::aggregate::ServerSnapshot;
use rusqlite::{params, Connection};
use std::path::PathBuf;

/// Writes every run into one database, keyed by a row in `runs` so
/// consumers can diff consecutive snapshots.
pub struct SqliteExporter {
    conn: Connection,
}

impl SqliteExporter {
    pub fn new(db_path: PathBuf) -> Result<Self, ExportError> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS runs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                exported_at INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS stat_values (
                run_id INTEGER NOT NULL REFERENCES runs(id),
                category TEXT NOT NULL,
                subcategory TEXT NOT NULL,
                metric TEXT NOT NULL,
                player TEXT NOT NULL,
                value INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS advancement_values (
                run_id INTEGER NOT NULL REFERENCES runs(id),
                advancement TEXT NOT NULL,
                player TEXT NOT NULL,
                achieved INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS economy_values (
                run_id INTEGER NOT NULL REFERENCES runs(id),
                player TEXT NOT NULL,
                money INTEGER NOT NULL,
                waystones INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_stat_lookup
             ON stat_values(category, subcategory, metric)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_advancement_player
             ON advancement_values(player)",
            [],
        )?;

        log::info!("✅ SQLite export database initialized: {}", db_path.display());
        Ok(Self { conn })
    }
}

impl ExportBackend for SqliteExporter {
    fn write_snapshot(&mut self, snapshot: &ServerSnapshot) -> Result<(), ExportError> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO runs (exported_at) VALUES (?1)",
            params![chrono::Utc::now().timestamp()],
        )?;
        let run_id = tx.last_insert_rowid();

        for (key, cells) in snapshot.stats.rows() {
            let segments = key.segments();
            for column in snapshot.stats.columns() {
                tx.execute(
                    "INSERT INTO stat_values (run_id, category, subcategory, metric, player, value)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        run_id,
                        segments.first().map(String::as_str).unwrap_or(""),
                        segments.get(1).map(String::as_str).unwrap_or(""),
                        segments.get(2).map(String::as_str).unwrap_or(""),
                        column,
                        cells.get(column).copied().unwrap_or(0),
                    ],
                )?;
            }
        }

        for (key, cells) in snapshot.advancements.rows() {
            for column in snapshot.advancements.columns() {
                tx.execute(
                    "INSERT INTO advancement_values (run_id, advancement, player, achieved)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        run_id,
                        key.to_string(),
                        column,
                        cells.get(column).copied().unwrap_or(0),
                    ],
                )?;
            }
        }

        for (player, money) in snapshot.economy.money() {
            let waystones = snapshot
                .economy
                .waystones()
                .get(player)
                .copied()
                .unwrap_or(0);
            tx.execute(
                "INSERT INTO economy_values (run_id, player, money, waystones)
                 VALUES (?1, ?2, ?3, ?4)",
                params![run_id, player, money, waystones as i64],
            )?;
        }

        tx.commit()?;
        log::debug!("✅ snapshot persisted as run {}", run_id);
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{merge_stats, AggregateTable, EconomyLedger};
    use crate::decode::{RowKey, StatRecord};
    use std::collections::BTreeMap;

    fn create_test_snapshot() -> ServerSnapshot {
        let mut stats = AggregateTable::new();
        let mut record = StatRecord::default();
        record.values = BTreeMap::from([(RowKey::from_dotted("stats.cat.m"), 7)]);
        merge_stats(&mut stats, &record, "Alice");
        stats.fill_missing(0);

        ServerSnapshot {
            stats,
            advancements: AggregateTable::new(),
            economy: EconomyLedger::new(),
        }
    }

    #[test]
    fn test_sqlite_snapshot_write() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("export.db");

        let mut exporter = SqliteExporter::new(db_path.clone()).unwrap();
        exporter.write_snapshot(&create_test_snapshot()).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let value: i64 = conn
            .query_row(
                "SELECT value FROM stat_values WHERE player = ?1 AND metric = ?2",
                params!["Alice", "m"],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(value, 7);

        let runs: i64 = conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(runs, 1);
    }
}
