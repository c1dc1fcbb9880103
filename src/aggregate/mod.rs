//! Aggregation engine - folds decoded records into unified tables
//!
//! ```text
//! StatRecord ────────┐
//! AdvancementRecord ─┼─ merge_* (outer join per player) ─→ ServerSnapshot
//! EconomyRecord ─────┘        then one fill_missing(0) pass
//! ```

pub mod economy;
pub mod table;

pub use economy::EconomyLedger;
pub use table::AggregateTable;

use crate::decode::{AdvancementRecord, EconomyRecord, RowKey, StatRecord};
use std::collections::BTreeMap;

/// Merge one player's stat counters into the stats table.
pub fn merge_stats(table: &mut AggregateTable, record: &StatRecord, name: &str) {
    table.merge(&record.values, name);
}

/// Merge one player's advancements into the advancements table. Achieved
/// entries become 1, known-but-unachieved entries become 0; absent cells
/// are left for the fill pass.
pub fn merge_advancements(table: &mut AggregateTable, record: &AdvancementRecord, name: &str) {
    let values: BTreeMap<RowKey, i64> = record
        .achieved
        .iter()
        .map(|(id, done)| (RowKey::new(vec![id.clone()]), i64::from(*done)))
        .collect();
    table.merge(&values, name);
}

/// Merge one player's economy figures into the ledger.
pub fn merge_economy(ledger: &mut EconomyLedger, record: &EconomyRecord, name: &str) {
    ledger.record(name, record);
}

/// The fully merged output of one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct ServerSnapshot {
    pub stats: AggregateTable,
    pub advancements: AggregateTable,
    pub economy: EconomyLedger,
}
