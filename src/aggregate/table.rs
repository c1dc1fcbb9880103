//! Outer-join accumulator for per-player record columns

use crate::decode::RowKey;
use std::collections::{BTreeMap, HashMap};

/// Union of one record kind across all players.
///
/// Rows are composite keys, columns are display names in first-merge
/// order, cells are integers. Merging is an outer join: the row-key set
/// grows to the union of both sides and one-sided cells stay unset until
/// a single [`fill_missing`](AggregateTable::fill_missing) pass runs after
/// the last merge. Because rows are keyed and cells are keyed by column
/// name, the fully merged table is identical regardless of the order
/// players were merged in (up to column order).
#[derive(Debug, Clone, Default)]
pub struct AggregateTable {
    columns: Vec<String>,
    rows: BTreeMap<RowKey, HashMap<String, i64>>,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one player's values as a new column (outer join on row keys).
    ///
    /// Re-merging an existing column name overwrites its cells; with
    /// unique display names this does not happen.
    pub fn merge(&mut self, values: &BTreeMap<RowKey, i64>, column: &str) {
        if !self.columns.iter().any(|c| c == column) {
            self.columns.push(column.to_string());
        }
        for (key, value) in values {
            self.rows
                .entry(key.clone())
                .or_default()
                .insert(column.to_string(), *value);
        }
    }

    /// Define every unset cell at the intersection of the current rows and
    /// columns. Run once, after the last merge.
    pub fn fill_missing(&mut self, default: i64) {
        for cells in self.rows.values_mut() {
            for column in &self.columns {
                cells.entry(column.clone()).or_insert(default);
            }
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn cell(&self, key: &RowKey, column: &str) -> Option<i64> {
        self.rows.get(key).and_then(|cells| cells.get(column)).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&RowKey, &HashMap<String, i64>)> {
        self.rows.iter()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
